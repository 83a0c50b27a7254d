use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    pub athlete_id: Uuid,
    #[validate(range(min = 1, message = "Place must be a positive number"))]
    pub place: i32,
    pub score: Option<i32>,
    /// Accepted for compatibility and ignored; points are derived from the place.
    pub points: Option<i32>,
}

/// Full result set for one category of a tournament.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultsRequest {
    pub category_id: Uuid,
    #[validate(nested)]
    pub results: Vec<ResultInput>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ResultsQuery {
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultsResponse {
    pub success: bool,
    pub count: usize,
}
