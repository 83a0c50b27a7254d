use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::athlete::validate_iin;
use super::common::PaginationParams;
use crate::models::{
    AthleteRegistration, Gender, Registration, RegistrationDocument, RegistrationJudge,
    RegistrationStatus, Tournament, TournamentCategory,
};

/// Inline judge data supplied when the judge is not yet in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJudgeInput {
    #[validate(length(min = 1, max = 255, message = "Judge name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100, message = "Judge category is required"))]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JudgeEntry {
    pub judge_id: Option<Uuid>,
    #[validate(nested)]
    pub new_judge: Option<NewJudgeInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAthleteInput {
    #[validate(length(min = 1, max = 255, message = "Athlete name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    #[validate(length(max = 100))]
    pub sports_rank: Option<String>,
    #[validate(length(max = 100))]
    pub medical_status: Option<String>,
    pub medical_certificate_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub insurance_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCoachInput {
    #[validate(length(min = 1, max = 255, message = "Coach name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_iin"))]
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
}

/// One athlete of the roster together with their coach; each side is either an
/// existing registry id or inline data for a new row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    pub athlete_id: Option<Uuid>,
    #[validate(nested)]
    pub new_athlete: Option<NewAthleteInput>,
    pub coach_id: Option<Uuid>,
    #[validate(nested)]
    pub new_coach: Option<NewCoachInput>,
}

impl ParticipantEntry {
    pub fn has_athlete(&self) -> bool {
        self.athlete_id.is_some() || self.new_athlete.is_some()
    }

    pub fn has_coach(&self) -> bool {
        self.coach_id.is_some() || self.new_coach.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DocumentInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub url: String,
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRegistrationRequest {
    pub tournament_category_id: Option<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub judges: Vec<JudgeEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub participants: Vec<ParticipantEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub documents: Vec<DocumentInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRegistrationResponse {
    pub success: bool,
    pub registration_id: Uuid,
    pub registration_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationStatusRequest {
    pub status: RegistrationStatus,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRegistrationAthleteRequest {
    pub athlete_id: Uuid,
    pub coach_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationAthleteRequest {
    pub athlete_registration_id: Uuid,
    pub coach_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RemoveRegistrationAthleteQuery {
    /// AthleteRegistration id to remove.
    pub id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFilter {
    pub tournament_id: Option<Uuid>,
    pub status: Option<RegistrationStatus>,
    pub region_id: Option<Uuid>,
    /// Staff only: restrict to registrations submitted by the caller.
    #[serde(default)]
    pub my: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl RegistrationFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Registration row plus the tournament division it was filed against.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub registration: Registration,
    pub tournament_id: Uuid,
    pub tournament_title: String,
    pub athlete_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetailResponse {
    #[serde(flatten)]
    pub registration: Registration,
    pub tournament: Tournament,
    pub category: TournamentCategory,
    pub athletes: Vec<AthleteRegistration>,
    pub judges: Vec<RegistrationJudge>,
    pub documents: Vec<RegistrationDocument>,
    /// Whether the caller may still change the roster.
    pub can_edit: bool,
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
    fn test_submission_wire_format() {
        let req: SubmitRegistrationRequest = serde_json::from_value(serde_json::json!({
            "tournamentCategoryId": "6f1c1a8e-2f0b-4f7e-9c3a-1d2e3f4a5b6c",
            "judges": [{ "newJudge": { "name": "Арман", "category": "National" } }],
            "participants": [
                { "athleteId": "0e8a2c4b-6d1f-4a3b-8c9d-0e1f2a3b4c5d", "newCoach": { "name": "Coach" } }
            ]
        }))
        .unwrap();

        assert!(req.tournament_category_id.is_some());
        assert!(req.documents.is_empty());
        assert!(req.participants[0].has_athlete());
        assert!(req.participants[0].has_coach());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_nested_inline_data_is_validated() {
        let req: SubmitRegistrationRequest = serde_json::from_value(serde_json::json!({
            "participants": [
                { "newAthlete": { "name": "", "gender": "F", "iin": "12" } }
            ]
        }))
        .unwrap();

        assert!(req.validate().is_err());
        assert!(!req.participants[0].has_coach());
    }
}
