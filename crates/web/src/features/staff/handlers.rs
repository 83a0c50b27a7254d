use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        content::{CreateStaffMemberRequest, StaffFilter, UpdateStaffMemberRequest},
    },
    models::StaffMember,
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
    path = "/api/staff",
    params(StaffFilter),
    responses(
        (status = 200, description = "Active staff members in display order", body = PaginatedResponse<StaffMember>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "staff"
)]
pub async fn list_staff(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<StaffFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (items, total) = services::list_staff(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(
        ("id" = Uuid, Path, description = "Staff member id")
    ),
    responses(
        (status = 200, description = "Staff member found", body = StaffMember),
        (status = 404, description = "Staff member not found")
    ),
    tag = "staff"
)]
pub async fn get_staff_member(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let item = services::get_staff_member(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = CreateStaffMemberRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Staff member created", body = StaffMember),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "staff"
)]
pub async fn create_staff_member(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateStaffMemberRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_staff_member", actor.require_admin())?;
    req.validate()?;

    let item = services::create_staff_member(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/staff/{id}",
    params(
        ("id" = Uuid, Path, description = "Staff member id")
    ),
    request_body = UpdateStaffMemberRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Staff member updated", body = StaffMember),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Staff member not found")
    ),
    tag = "staff"
)]
pub async fn update_staff_member(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStaffMemberRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_staff_member", actor.require_admin())?;
    req.validate()?;

    let item = services::update_staff_member(db.pool(), id, &req).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    params(
        ("id" = Uuid, Path, description = "Staff member id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Staff member deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Staff member not found")
    ),
    tag = "staff"
)]
pub async fn delete_staff_member(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_staff_member", actor.require_admin())?;

    services::delete_staff_member(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
