use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{AgeCategory, BowType, Gender};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMembershipRequest {
    pub athlete_id: Uuid,
    pub category: AgeCategory,
    pub gender: Gender,
    #[serde(rename = "type")]
    pub bow_type: BowType,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NationalTeamFilter {
    pub category: Option<AgeCategory>,
    pub gender: Option<Gender>,
    #[serde(rename = "type")]
    pub bow_type: Option<BowType>,
    /// Defaults to active slots only.
    pub is_active: Option<bool>,
}
