use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::PaginationParams;
use crate::models::{Athlete, AthleteCoach, Gender, RankingEntry};

/// Request payload for creating a new athlete
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAthleteRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[validate(length(max = 255))]
    pub name_kk: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,

    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Gender,

    /// Ignored for regional representatives, who always write into their own region.
    pub region_id: Option<Uuid>,

    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,

    #[validate(length(max = 100))]
    pub sports_rank: Option<String>,
    #[validate(length(max = 100))]
    pub medical_status: Option<String>,
    pub medical_certificate_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub insurance_number: Option<String>,

    /// Coaches to link; the first one is marked primary.
    #[serde(default)]
    pub coach_ids: Vec<Uuid>,
}

/// Request payload for updating an existing athlete
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAthleteRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub name_kk: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub region_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    #[validate(length(max = 100))]
    pub sports_rank: Option<String>,
    #[validate(length(max = 100))]
    pub medical_status: Option<String>,
    pub medical_certificate_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub insurance_number: Option<String>,
    /// When present, replaces the full set of coach links.
    pub coach_ids: Option<Vec<Uuid>>,
}

/// Athlete with coaches and current ranking positions
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AthleteDetailResponse {
    #[serde(flatten)]
    pub athlete: Athlete,
    pub coaches: Vec<AthleteCoach>,
    pub rankings: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RegistryFilter {
    pub region_id: Option<Uuid>,
    pub gender: Option<Gender>,
    pub is_active: Option<bool>,
    /// Judge category (judges only).
    pub category: Option<String>,
    /// Dashboard view: representatives only see their own region.
    #[serde(default)]
    pub admin: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl RegistryFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Request payload for creating a coach
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoachRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub name_kk: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub region_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoachRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub region_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Request payload for creating a judge
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJudgeRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub name_kk: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    pub region_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJudgeRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub region_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

// Validation helpers
pub(crate) fn validate_iin(iin: &str) -> Result<(), validator::ValidationError> {
    if iin.len() == 12 && iin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("invalid_iin");
        error.message = Some("IIN must be 12 digits".into());
        Err(error)
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

    #[test]
    fn test_iin_format() {
        assert!(validate_iin("990101300123").is_ok());
        assert!(validate_iin("99010130012").is_err());
        assert!(validate_iin("99010130012a").is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_iin() {
        let req: CreateAthleteRequest = serde_json::from_value(serde_json::json!({
            "name": "Иван Петров",
            "gender": "M",
            "iin": "123"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("iin"));
        assert!(req.is_active);
        assert!(req.coach_ids.is_empty());
    }
}
