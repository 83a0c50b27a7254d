use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        ranking::{RankingFilter, RankingRow, RecalculateQuery, RecalculateResponse},
    },
};

use crate::audit::{self, trace_denial};
use crate::error::WebError;
use crate::extract::{Json, Query};
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings",
    params(RankingFilter),
    responses(
        (status = 200, description = "Ranking retrieved successfully", body = PaginatedResponse<RankingRow>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "rankings"
)]
pub async fn list_rankings(
    State(db): State<Database>,
    Query(filter): Query<RankingFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let (rows, total_items) = services::list_rankings(db.pool(), &filter).await?;

    Ok(Json(PaginatedResponse::new(rows, &pagination, total_items)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/rankings/recalculate",
    params(RecalculateQuery),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Rankings recomputed for the season", body = RecalculateResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "rankings"
)]
pub async fn recalculate(
    State(db): State<Database>,
    Actor(actor): Actor,
    Query(query): Query<RecalculateQuery>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "recalculate_rankings", actor.require_staff())?;

    let now = Utc::now();
    let year = services::season(query.year, now);
    let updated_count = services::recalculate(db.pool(), year, now).await?;
    audit::log_rankings_recomputed(&actor, year, updated_count);

    Ok(Json(RecalculateResponse {
        success: true,
        updated_count,
        year,
    })
    .into_response())
}
