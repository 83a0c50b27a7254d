use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AuditAction, Gender, RegistrationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub registration_id: Uuid,
    pub registration_number: String,
    pub user_id: Uuid,
    pub region_id: Uuid,
    pub region_name: String,
    pub tournament_category_id: Uuid,
    pub status: RegistrationStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// Athlete row inside a registration, joined with athlete and coach names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AthleteRegistration {
    pub athlete_registration_id: Uuid,
    pub registration_id: Uuid,
    pub athlete_id: Uuid,
    pub athlete_name: String,
    pub athlete_iin: Option<String>,
    pub athlete_dob: Option<NaiveDate>,
    pub athlete_gender: Gender,
    pub coach_id: Option<Uuid>,
    pub coach_name: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationJudge {
    pub registration_id: Uuid,
    pub judge_id: Uuid,
    pub judge_name: String,
    pub judge_category: String,
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDocument {
    pub document_id: Uuid,
    pub registration_id: Uuid,
    pub name: String,
    pub url: String,
    pub created_at: chrono::NaiveDateTime,
}

/// Append-only history entry for nested edits of a registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAuditLog {
    pub audit_log_id: Uuid,
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    #[schema(value_type = Option<Object>)]
    pub previous_data: Option<sqlx::types::Json<serde_json::Value>>,
    #[schema(value_type = Option<Object>)]
    pub new_data: Option<sqlx::types::Json<serde_json::Value>>,
    pub description: String,
    pub created_at: chrono::NaiveDateTime,
}
