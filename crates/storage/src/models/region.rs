use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: Uuid,
    pub name: String,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    pub director: String,
    pub director_kk: Option<String>,
    pub director_en: Option<String>,
    pub address: String,
    pub address_kk: Option<String>,
    pub address_en: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// Number of rows owned by a region; a region can only be deleted when all are zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionCounts {
    pub athletes: i64,
    pub coaches: i64,
    pub judges: i64,
    pub users: i64,
}

impl RegionCounts {
    pub fn total(&self) -> i64 {
        self.athletes + self.coaches + self.judges + self.users
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub region_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}
