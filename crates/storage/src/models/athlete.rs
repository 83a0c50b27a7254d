use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub slug: String,
    pub name: String,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    pub region_id: Option<Uuid>,
    pub is_active: bool,
    pub sort_order: i32,
    pub sports_rank: Option<String>,
    pub medical_status: Option<String>,
    pub medical_certificate_date: Option<NaiveDate>,
    pub insurance_number: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// Link between an athlete and one of their coaches.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AthleteCoach {
    pub athlete_id: Uuid,
    pub coach_id: Uuid,
    pub coach_name: String,
    pub is_primary: bool,
}
