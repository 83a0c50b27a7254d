use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AgeCategory, BowType, Gender};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TournamentResult {
    pub result_id: Uuid,
    pub tournament_category_id: Uuid,
    pub athlete_id: Uuid,
    pub athlete_name: String,
    pub region_name: Option<String>,
    pub place: i32,
    pub points: i32,
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub ranking_entry_id: Uuid,
    pub athlete_id: Uuid,
    pub category: AgeCategory,
    pub gender: Gender,
    pub bow_type: BowType,
    pub points: i32,
    pub rank: i32,
    pub updated_at: chrono::NaiveDateTime,
}
