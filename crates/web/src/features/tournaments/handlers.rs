use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        result::{ResultsQuery, SubmitResultsRequest, SubmitResultsResponse},
        tournament::{
            CreateTournamentRequest, TournamentFilter, TournamentResponse, UpdateTournamentRequest,
        },
    },
    models::TournamentResult,
};
use uuid::Uuid;
use validator::Validate;

use crate::audit::{self, trace_denial};
use crate::error::WebError;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tournaments",
    params(TournamentFilter),
    responses(
        (status = 200, description = "Tournaments with derived status", body = PaginatedResponse<TournamentResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "tournaments"
)]
pub async fn list_tournaments(
    State(db): State<Database>,
    Query(filter): Query<TournamentFilter>,
) -> Result<Response, WebError> {
    let status = filter.validate().map_err(WebError::BadRequest)?;
    let pagination = filter.pagination();

    let (tournaments, total) =
        services::list_tournaments(db.pool(), &filter, status, Utc::now()).await?;

    Ok(Json(PaginatedResponse::new(tournaments, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/featured",
    responses(
        (status = 200, description = "Featured tournament, or null when none is set", body = TournamentResponse)
    ),
    tag = "tournaments"
)]
pub async fn get_featured(State(db): State<Database>) -> Result<Response, WebError> {
    let tournament = services::get_featured(db.pool(), Utc::now()).await?;

    Ok(Json(tournament).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament id")
    ),
    responses(
        (status = 200, description = "Tournament with categories and derived status", body = TournamentResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), id, Utc::now()).await?;

    Ok(Json(tournament).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments",
    request_body = CreateTournamentRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Tournament created", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_tournament", actor.require_staff())?;
    req.validate()?;
    req.validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let tournament = services::create_tournament(db.pool(), &req, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(tournament)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament id")
    ),
    request_body = UpdateTournamentRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Tournament updated", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn update_tournament(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTournamentRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_tournament", actor.require_staff())?;
    req.validate()?;

    let tournament = services::update_tournament(db.pool(), id, &req, Utc::now()).await?;

    Ok(Json(tournament).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/tournaments/{id}",
    params(
        ("id" = Uuid, Path, description = "Tournament id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Tournament deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn delete_tournament(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_tournament", actor.require_admin())?;

    services::delete_tournament(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{id}/results",
    params(
        ("id" = Uuid, Path, description = "Tournament id"),
        ResultsQuery
    ),
    responses(
        (status = 200, description = "Results ordered by division and place", body = Vec<TournamentResult>),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn list_results(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, WebError> {
    let results = services::list_results(db.pool(), id, query.category_id).await?;

    Ok(Json(results).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{id}/results",
    params(
        ("id" = Uuid, Path, description = "Tournament id")
    ),
    request_body = SubmitResultsRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Results replaced for the category", body = SubmitResultsResponse),
        (status = 400, description = "Invalid places"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Category not found in this tournament")
    ),
    tag = "tournaments"
)]
pub async fn submit_results(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitResultsRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "submit_results", actor.require_staff())?;
    req.validate()?;

    let count = services::submit_results(db.pool(), id, &req).await?;
    audit::log_results_replaced(&actor, req.category_id, count);

    Ok(Json(SubmitResultsResponse {
        success: true,
        count,
    })
    .into_response())
}
