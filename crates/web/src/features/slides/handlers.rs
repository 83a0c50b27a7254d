use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        content::{CreateSlideRequest, ActiveFilter, UpdateSlideRequest},
    },
    models::Slide,
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
    path = "/api/slides",
    params(ActiveFilter),
    responses(
        (status = 200, description = "Active carousel slides in display order", body = PaginatedResponse<Slide>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "slides"
)]
pub async fn list_slides(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<ActiveFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (items, total) = services::list_slides(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/slides/{id}",
    params(
        ("id" = Uuid, Path, description = "Slide id")
    ),
    responses(
        (status = 200, description = "Slide found", body = Slide),
        (status = 404, description = "Slide not found")
    ),
    tag = "slides"
)]
pub async fn get_slide(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let item = services::get_slide(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    post,
    path = "/api/slides",
    request_body = CreateSlideRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Slide created", body = Slide),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "slides"
)]
pub async fn create_slide(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateSlideRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_slide", actor.require_staff())?;
    req.validate()?;

    let item = services::create_slide(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/slides/{id}",
    params(
        ("id" = Uuid, Path, description = "Slide id")
    ),
    request_body = UpdateSlideRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Slide updated", body = Slide),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Slide not found")
    ),
    tag = "slides"
)]
pub async fn update_slide(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSlideRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_slide", actor.require_staff())?;
    req.validate()?;

    let item = services::update_slide(db.pool(), id, &req).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/slides/{id}",
    params(
        ("id" = Uuid, Path, description = "Slide id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Slide deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Slide not found")
    ),
    tag = "slides"
)]
pub async fn delete_slide(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_slide", actor.require_admin())?;

    services::delete_slide(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
