use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::PaginationParams;
use crate::models::{AgeCategory, BowType, Gender};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RankingFilter {
    #[serde(rename = "type")]
    pub bow_type: Option<BowType>,
    pub gender: Option<Gender>,
    pub category: Option<AgeCategory>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl RankingFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Public ranking row joined with athlete and region names.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub ranking_entry_id: Uuid,
    pub athlete_id: Uuid,
    pub athlete_name: String,
    pub athlete_slug: String,
    pub region_name: Option<String>,
    pub category: AgeCategory,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub bow_type: BowType,
    pub points: i32,
    pub rank: i32,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RecalculateQuery {
    /// Calendar year to recompute; defaults to the current year.
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateResponse {
    pub success: bool,
    pub updated_count: usize,
    pub year: i32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter: RankingFilter = serde_json::from_value(serde_json::json!({
            "type": "Recurve",
            "gender": "M"
        }))
        .unwrap();

        assert_eq!(filter.bow_type, Some(BowType::Recurve));
        assert_eq!(filter.gender, Some(Gender::Male));
        assert_eq!(filter.category, None);
        assert_eq!(filter.pagination().offset(), 0);
        assert_eq!(filter.pagination().limit(), 10);
    }
}
