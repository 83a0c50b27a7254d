use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        content::{CreateGalleryItemRequest, GalleryFilter, UpdateGalleryItemRequest},
    },
    models::GalleryItem,
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
    path = "/api/gallery",
    params(GalleryFilter),
    responses(
        (status = 200, description = "Published photos and videos, newest event first", body = PaginatedResponse<GalleryItem>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "gallery"
)]
pub async fn list_gallery(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<GalleryFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (items, total) = services::list_gallery(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/gallery/{id}",
    params(
        ("id" = Uuid, Path, description = "Gallery item id")
    ),
    responses(
        (status = 200, description = "Gallery item found", body = GalleryItem),
        (status = 404, description = "Gallery item not found")
    ),
    tag = "gallery"
)]
pub async fn get_gallery_item(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let item = services::get_gallery_item(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    post,
    path = "/api/gallery",
    request_body = CreateGalleryItemRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Gallery item created", body = GalleryItem),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "gallery"
)]
pub async fn create_gallery_item(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateGalleryItemRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_gallery_item", actor.require_staff())?;
    req.validate()?;

    let item = services::create_gallery_item(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/gallery/{id}",
    params(
        ("id" = Uuid, Path, description = "Gallery item id")
    ),
    request_body = UpdateGalleryItemRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Gallery item updated", body = GalleryItem),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Gallery item not found")
    ),
    tag = "gallery"
)]
pub async fn update_gallery_item(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGalleryItemRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_gallery_item", actor.require_staff())?;
    req.validate()?;

    let item = services::update_gallery_item(db.pool(), id, &req).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/gallery/{id}",
    params(
        ("id" = Uuid, Path, description = "Gallery item id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Gallery item deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Gallery item not found")
    ),
    tag = "gallery"
)]
pub async fn delete_gallery_item(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_gallery_item", actor.require_admin())?;

    services::delete_gallery_item(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
