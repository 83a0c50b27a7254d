use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Region, RegionCounts, Role};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub name_kk: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Director is required"))]
    pub director: String,
    pub director_kk: Option<String>,
    pub director_en: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,
    pub address_kk: Option<String>,
    pub address_en: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Phone is required"))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub director: Option<String>,
    pub director_kk: Option<String>,
    pub director_en: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    pub address_kk: Option<String>,
    pub address_en: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetailResponse {
    #[serde(flatten)]
    pub region: Region,
    pub counts: RegionCounts,
    pub users: Vec<UserResponse>,
}

/// Request payload for creating a regional representative account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionUserRequest {
    #[validate(length(min = 3, max = 100, message = "Username must be between 3 and 100 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    pub region_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<crate::models::User> for UserResponse {
    fn from(user: crate::models::User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            role: user.role,
            region_id: user.region_id,
            created_at: user.created_at,
        }
    }
}

fn default_true() -> bool {
    true
}
