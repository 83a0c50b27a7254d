use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        athlete::{CreateJudgeRequest, RegistryFilter, UpdateJudgeRequest},
        common::PaginatedResponse,
    },
    models::Judge,
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
    path = "/api/judges",
    params(RegistryFilter),
    responses(
        (status = 200, description = "Judges retrieved successfully", body = PaginatedResponse<Judge>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "judges"
)]
pub async fn list_judges(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<RegistryFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (judges, total) = services::list_judges(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(judges, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/judges/{id}",
    params(
        ("id" = Uuid, Path, description = "Judge id")
    ),
    responses(
        (status = 200, description = "Judge retrieved successfully", body = Judge),
        (status = 404, description = "Judge not found")
    ),
    tag = "judges"
)]
pub async fn get_judge(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let judge = services::get_judge(db.pool(), id).await?;

    Ok(Json(judge).into_response())
}

#[utoipa::path(
    post,
    path = "/api/judges",
    request_body = CreateJudgeRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Judge created successfully", body = Judge),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "judges"
)]
pub async fn create_judge(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateJudgeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let judge = trace_denial(
        &actor,
        "create_judge",
        services::create_judge(db.pool(), &actor, &req).await,
    )?;

    Ok((StatusCode::CREATED, Json(judge)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/judges/{id}",
    params(
        ("id" = Uuid, Path, description = "Judge id")
    ),
    request_body = UpdateJudgeRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Judge updated successfully", body = Judge),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Judge belongs to another region"),
        (status = 404, description = "Judge not found")
    ),
    tag = "judges"
)]
pub async fn update_judge(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJudgeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let judge = trace_denial(
        &actor,
        "update_judge",
        services::update_judge(db.pool(), &actor, id, req).await,
    )?;

    Ok(Json(judge).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/judges/{id}",
    params(
        ("id" = Uuid, Path, description = "Judge id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Judge deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Judge belongs to another region"),
        (status = 404, description = "Judge not found")
    ),
    tag = "judges"
)]
pub async fn delete_judge(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(
        &actor,
        "delete_judge",
        services::delete_judge(db.pool(), &actor, id).await,
    )?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
