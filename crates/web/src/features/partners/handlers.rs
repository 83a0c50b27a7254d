use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        content::{CreatePartnerRequest, ActiveFilter, UpdatePartnerRequest},
    },
    models::Partner,
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
    path = "/api/partners",
    params(ActiveFilter),
    responses(
        (status = 200, description = "Active partners in display order", body = PaginatedResponse<Partner>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "partners"
)]
pub async fn list_partners(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<ActiveFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (items, total) = services::list_partners(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/partners/{id}",
    params(
        ("id" = Uuid, Path, description = "Partner id")
    ),
    responses(
        (status = 200, description = "Partner found", body = Partner),
        (status = 404, description = "Partner not found")
    ),
    tag = "partners"
)]
pub async fn get_partner(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let item = services::get_partner(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    post,
    path = "/api/partners",
    request_body = CreatePartnerRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Partner created", body = Partner),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "partners"
)]
pub async fn create_partner(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreatePartnerRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_partner", actor.require_admin())?;
    req.validate()?;

    let item = services::create_partner(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/partners/{id}",
    params(
        ("id" = Uuid, Path, description = "Partner id")
    ),
    request_body = UpdatePartnerRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Partner updated", body = Partner),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Partner not found")
    ),
    tag = "partners"
)]
pub async fn update_partner(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePartnerRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_partner", actor.require_admin())?;
    req.validate()?;

    let item = services::update_partner(db.pool(), id, &req).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/partners/{id}",
    params(
        ("id" = Uuid, Path, description = "Partner id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Partner deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Partner not found")
    ),
    tag = "partners"
)]
pub async fn delete_partner(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_partner", actor.require_admin())?;

    services::delete_partner(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
