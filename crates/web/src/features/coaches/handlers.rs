use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        athlete::{CreateCoachRequest, RegistryFilter, UpdateCoachRequest},
        common::PaginatedResponse,
    },
    models::Coach,
};
use uuid::Uuid;
use validator::Validate;

use crate::audit::trace_denial;
use crate::error::WebError;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    get,
    path = "/api/coaches",
    params(RegistryFilter),
    responses(
        (status = 200, description = "Coaches retrieved successfully", body = PaginatedResponse<Coach>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "coaches"
)]
pub async fn list_coaches(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<RegistryFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (coaches, total) = services::list_coaches(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(coaches, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/coaches/{id}",
    params(
        ("id" = Uuid, Path, description = "Coach id")
    ),
    responses(
        (status = 200, description = "Coach retrieved successfully", body = Coach),
        (status = 404, description = "Coach not found")
    ),
    tag = "coaches"
)]
pub async fn get_coach(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let coach = services::get_coach(db.pool(), id).await?;

    Ok(Json(coach).into_response())
}

#[utoipa::path(
    post,
    path = "/api/coaches",
    request_body = CreateCoachRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Coach created successfully", body = Coach),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "coaches"
)]
pub async fn create_coach(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateCoachRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let coach = trace_denial(
        &actor,
        "create_coach",
        services::create_coach(db.pool(), &actor, &req).await,
    )?;

    Ok((StatusCode::CREATED, Json(coach)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/coaches/{id}",
    params(
        ("id" = Uuid, Path, description = "Coach id")
    ),
    request_body = UpdateCoachRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Coach updated successfully", body = Coach),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Coach belongs to another region"),
        (status = 404, description = "Coach not found")
    ),
    tag = "coaches"
)]
pub async fn update_coach(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCoachRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let coach = trace_denial(
        &actor,
        "update_coach",
        services::update_coach(db.pool(), &actor, id, req).await,
    )?;

    Ok(Json(coach).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/coaches/{id}",
    params(
        ("id" = Uuid, Path, description = "Coach id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Coach deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Coach belongs to another region"),
        (status = 404, description = "Coach not found")
    ),
    tag = "coaches"
)]
pub async fn delete_coach(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(
        &actor,
        "delete_coach",
        services::delete_coach(db.pool(), &actor, id).await,
    )?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
