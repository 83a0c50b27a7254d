use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::protocol::{
        CreateProtocolRequest, ProtocolFilter, ProtocolListResponse, UpdateProtocolRequest,
    },
    models::{Protocol, ProtocolEntry},
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
    path = "/api/protocols",
    params(ProtocolFilter),
    responses(
        (status = 200, description = "Published protocols, newest year first, also grouped by year", body = ProtocolListResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "protocols"
)]
pub async fn list_protocols(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<ProtocolFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (entries, total) = services::list_protocols(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(ProtocolListResponse::new(entries, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/protocols/{id}",
    params(
        ("id" = Uuid, Path, description = "Protocol id")
    ),
    responses(
        (status = 200, description = "Protocol with its tournament division", body = ProtocolEntry),
        (status = 404, description = "Protocol not found")
    ),
    tag = "protocols"
)]
pub async fn get_protocol(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let entry = services::get_protocol(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(entry).into_response())
}

#[utoipa::path(
    post,
    path = "/api/protocols",
    request_body = CreateProtocolRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Protocol created", body = Protocol),
        (status = 400, description = "Validation error or unknown tournament category"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "protocols"
)]
pub async fn create_protocol(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateProtocolRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_protocol", actor.require_staff())?;
    req.validate()?;

    let protocol = services::create_protocol(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(protocol)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/protocols/{id}",
    params(
        ("id" = Uuid, Path, description = "Protocol id")
    ),
    request_body = UpdateProtocolRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Protocol updated", body = Protocol),
        (status = 400, description = "Validation error or unknown tournament category"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Protocol not found")
    ),
    tag = "protocols"
)]
pub async fn update_protocol(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProtocolRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_protocol", actor.require_staff())?;
    req.validate()?;

    let protocol = services::update_protocol(db.pool(), id, &req).await?;

    Ok(Json(protocol).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/protocols/{id}",
    params(
        ("id" = Uuid, Path, description = "Protocol id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Protocol deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Protocol not found")
    ),
    tag = "protocols"
)]
pub async fn delete_protocol(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_protocol", actor.require_admin())?;

    services::delete_protocol(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
