use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AgeCategory, BowType, Gender};

/// A national-team roster slot, unique per (athlete, category, gender, bow type).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NationalTeamMembership {
    pub membership_id: Uuid,
    pub athlete_id: Uuid,
    pub athlete_name: String,
    pub athlete_slug: String,
    pub category: AgeCategory,
    pub gender: Gender,
    pub bow_type: BowType,
    pub is_active: bool,
    pub sort_order: i32,
}
