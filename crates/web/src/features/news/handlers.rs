use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        news::{CreateNewsRequest, NewsFilter, UpdateNewsRequest},
    },
    models::News,
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
    path = "/api/news",
    params(NewsFilter),
    responses(
        (status = 200, description = "Published news, newest first", body = PaginatedResponse<News>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "news"
)]
pub async fn list_news(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<NewsFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (items, total) = services::list_news(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/news/{slug}",
    params(
        ("slug" = String, Path, description = "News slug")
    ),
    responses(
        (status = 200, description = "News item", body = News),
        (status = 404, description = "News not found")
    ),
    tag = "news"
)]
pub async fn get_news(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let news = services::get_news(db.pool(), actor.as_ref(), &slug).await?;

    Ok(Json(news).into_response())
}

#[utoipa::path(
    post,
    path = "/api/news",
    request_body = CreateNewsRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "News created", body = News),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "news"
)]
pub async fn create_news(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateNewsRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_news", actor.require_staff())?;
    req.validate()?;

    let news = services::create_news(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(news)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "News id")
    ),
    request_body = UpdateNewsRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "News updated", body = News),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "News not found")
    ),
    tag = "news"
)]
pub async fn update_news(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNewsRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_news", actor.require_staff())?;
    req.validate()?;

    let news = services::update_news(db.pool(), id, &req).await?;

    Ok(Json(news).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "News id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "News deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "News not found")
    ),
    tag = "news"
)]
pub async fn delete_news(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_news", actor.require_staff())?;

    services::delete_news(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
