use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub coach_id: Uuid,
    pub name: String,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    pub iin: Option<String>,
    pub dob: Option<NaiveDate>,
    pub region_id: Option<Uuid>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: chrono::NaiveDateTime,
}
