use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        content::{CreateDocumentRequest, DocumentFilter, UpdateDocumentRequest},
    },
    models::Document,
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
    path = "/api/documents",
    params(DocumentFilter),
    responses(
        (status = 200, description = "Published documents, newest year first", body = PaginatedResponse<Document>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "documents"
)]
pub async fn list_documents(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (items, total) = services::list_documents(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(
        ("id" = Uuid, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "Document found", body = Document),
        (status = 404, description = "Document not found")
    ),
    tag = "documents"
)]
pub async fn get_document(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let item = services::get_document(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Document created", body = Document),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "documents"
)]
pub async fn create_document(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_document", actor.require_staff())?;
    req.validate()?;

    let item = services::create_document(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/documents/{id}",
    params(
        ("id" = Uuid, Path, description = "Document id")
    ),
    request_body = UpdateDocumentRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Document updated", body = Document),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents"
)]
pub async fn update_document(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_document", actor.require_staff())?;
    req.validate()?;

    let item = services::update_document(db.pool(), id, &req).await?;

    Ok(Json(item).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(
        ("id" = Uuid, Path, description = "Document id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents"
)]
pub async fn delete_document(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_document", actor.require_admin())?;

    services::delete_document(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
