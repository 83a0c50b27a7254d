use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginationMeta, PaginationParams};
use crate::models::ProtocolEntry;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProtocolRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub event_date: NaiveDate,
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,
    #[validate(length(max = 255))]
    pub location_kk: Option<String>,
    #[validate(length(max = 255))]
    pub location_en: Option<String>,
    #[validate(length(max = 500))]
    pub file_url: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_published")]
    pub is_published: bool,
    pub tournament_category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProtocolRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub event_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 255))]
    pub location_kk: Option<String>,
    #[validate(length(max = 255))]
    pub location_en: Option<String>,
    #[validate(length(max = 500))]
    pub file_url: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub sort_order: Option<i32>,
    pub is_published: Option<bool>,
    pub tournament_category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolFilter {
    pub year: Option<i32>,
    /// Any division of this tournament.
    pub tournament_id: Option<Uuid>,
    pub tournament_category_id: Option<Uuid>,
    /// Staff only: include unpublished protocols.
    #[serde(default)]
    pub include_unpublished: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ProtocolFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// One page of protocols, also bucketed by year for the archive view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolListResponse {
    pub data: Vec<ProtocolEntry>,
    pub grouped_by_year: BTreeMap<i32, Vec<ProtocolEntry>>,
    pub pagination: PaginationMeta,
}

impl ProtocolListResponse {
    pub fn new(data: Vec<ProtocolEntry>, params: &PaginationParams, total_items: i64) -> Self {
        let mut grouped_by_year: BTreeMap<i32, Vec<ProtocolEntry>> = BTreeMap::new();
        for entry in &data {
            grouped_by_year
                .entry(entry.protocol.year)
                .or_default()
                .push(entry.clone());
        }

        Self {
            data,
            grouped_by_year,
            pagination: PaginationMeta::new(params.page, params.limit, total_items),
        }
    }
}

fn default_published() -> bool {
    true
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
    use crate::models::Protocol;

    fn entry(year: i32, title: &str) -> ProtocolEntry {
        ProtocolEntry {
            protocol: Protocol {
                protocol_id: Uuid::new_v4(),
                tournament_category_id: None,
                title: title.to_string(),
                title_kk: None,
                title_en: None,
                event_date: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
                location: "Astana".to_string(),
                location_kk: None,
                location_en: None,
                file_url: None,
                year,
                sort_order: 0,
                is_published: true,
                created_at: chrono::NaiveDateTime::default(),
            },
            tournament_id: None,
            tournament_title: None,
            category: None,
            gender: None,
            bow_type: None,
        }
    }

    #[test]
    fn test_protocols_grouped_by_year_keep_page_order() {
        let page = vec![entry(2024, "Cup"), entry(2024, "League"), entry(2023, "Open")];
        let params = PaginationParams { page: 1, limit: 10 };

        let response = ProtocolListResponse::new(page, &params, 3);

        assert_eq!(response.data.len(), 3);
        assert_eq!(response.grouped_by_year.len(), 2);
        let titles: Vec<_> = response.grouped_by_year[&2024]
            .iter()
            .map(|e| e.protocol.title.as_str())
            .collect();
        assert_eq!(titles, ["Cup", "League"]);
        assert_eq!(response.pagination.total_items, 3);
    }

    #[test]
    fn test_protocol_year_must_be_plausible() {
        let req: CreateProtocolRequest = serde_json::from_value(serde_json::json!({
            "title": "Cup",
            "eventDate": "2024-06-01",
            "location": "Astana",
            "year": 24
        }))
        .unwrap();

        assert!(req.is_published);
        assert!(req.validate().is_err());
    }
}
