use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        athlete::{AthleteDetailResponse, CreateAthleteRequest, RegistryFilter, UpdateAthleteRequest},
        common::PaginatedResponse,
    },
    models::Athlete,
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
    path = "/api/athletes",
    params(RegistryFilter),
    responses(
        (status = 200, description = "Athletes retrieved successfully", body = PaginatedResponse<Athlete>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "athletes"
)]
pub async fn list_athletes(
    State(db): State<Database>,
    actor: Option<Actor>,
    Query(filter): Query<RegistryFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let actor = actor.map(|Actor(a)| a);
    let (athletes, total) = services::list_athletes(db.pool(), actor.as_ref(), &filter).await?;

    Ok(Json(PaginatedResponse::new(athletes, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes/{slug}",
    params(
        ("slug" = String, Path, description = "Athlete slug")
    ),
    responses(
        (status = 200, description = "Athlete with coaches and ranking positions", body = AthleteDetailResponse),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn get_athlete(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let athlete = services::get_athlete_detailed(db.pool(), &slug).await?;

    Ok(Json(athlete).into_response())
}

#[utoipa::path(
    post,
    path = "/api/athletes",
    request_body = CreateAthleteRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Athlete created successfully", body = Athlete),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "IIN already registered")
    ),
    tag = "athletes"
)]
pub async fn create_athlete(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateAthleteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let athlete = trace_denial(
        &actor,
        "create_athlete",
        services::create_athlete(db.pool(), &actor, &req).await,
    )?;

    Ok((StatusCode::CREATED, Json(athlete)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    request_body = UpdateAthleteRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Athlete updated successfully", body = Athlete),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Athlete belongs to another region"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn update_athlete(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAthleteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let athlete = trace_denial(
        &actor,
        "update_athlete",
        services::update_athlete(db.pool(), &actor, id, req).await,
    )?;

    Ok(Json(athlete).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Athlete deleted successfully"),
        (status = 400, description = "Athlete is part of a registration"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Athlete belongs to another region"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn delete_athlete(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(
        &actor,
        "delete_athlete",
        services::delete_athlete(db.pool(), &actor, id).await,
    )?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
