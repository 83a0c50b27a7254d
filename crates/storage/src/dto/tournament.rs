use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use crate::models::{AgeCategory, BowType, Gender, Tournament, TournamentCategory, TournamentStatus};

/// A (category, gender, bow type) combination offered by a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionInput {
    pub category: AgeCategory,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub bow_type: BowType,
}

/// Request payload for creating a new tournament
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_registration_open: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub organizing_region_id: Option<Uuid>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub categories: Vec<DivisionInput>,
}

impl CreateTournamentRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        validate_schedule(self.start_date, self.end_date)
    }
}

/// Request payload for updating an existing tournament
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_registration_open: Option<bool>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub organizing_region_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    /// When present, the tournament's divisions are reconciled against this set.
    pub categories: Option<Vec<DivisionInput>>,
}

pub fn validate_schedule(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), &'static str> {
    if end < start {
        return Err("End date must be on or after start date");
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TournamentResponse {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub status: TournamentStatus,
    pub categories: Vec<TournamentCategory>,
}

impl TournamentResponse {
    pub fn new(
        tournament: Tournament,
        categories: Vec<TournamentCategory>,
        now: DateTime<Utc>,
    ) -> Self {
        let status = tournament.status_at(now);
        Self {
            tournament,
            status,
            categories,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TournamentFilter {
    /// REGISTRATION_OPEN, REGISTRATION_CLOSED, IN_PROGRESS or COMPLETED
    pub status: Option<String>,
    pub category: Option<AgeCategory>,
    pub gender: Option<Gender>,
    #[serde(rename = "type")]
    pub bow_type: Option<BowType>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl TournamentFilter {
    pub fn validate(&self) -> Result<Option<TournamentStatus>, String> {
        self.pagination().validate()?;
        match self.status.as_deref() {
            None => Ok(None),
            Some(raw) => TournamentStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| format!("Unknown tournament status '{}'", raw)),
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn default_true() -> bool {
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
    use chrono::Duration;

    #[test]
    fn test_end_before_start_rejected() {
        let start = Utc::now();
        assert!(validate_schedule(start, start).is_ok());
        assert!(validate_schedule(start, start + Duration::days(2)).is_ok());
        assert!(validate_schedule(start, start - Duration::hours(1)).is_err());
    }

    #[test]
    fn test_division_uses_type_on_the_wire() {
        let division: DivisionInput = serde_json::from_value(serde_json::json!({
            "category": "Youth",
            "gender": "F",
            "type": "Compound"
        }))
        .unwrap();

        assert_eq!(division.category, AgeCategory::Youth);
        assert_eq!(division.gender, Gender::Female);
        assert_eq!(division.bow_type, BowType::Compound);
    }

    #[test]
    fn test_filter_rejects_unknown_status() {
        let filter = TournamentFilter {
            status: Some("soon".to_string()),
            page: 1,
            limit: 10,
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }
}
