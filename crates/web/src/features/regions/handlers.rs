use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::region::{
        CreateRegionRequest, CreateRegionUserRequest, RegionDetailResponse, UpdateRegionRequest,
        UserResponse,
    },
    models::Region,
};
use uuid::Uuid;
use validator::Validate;

use crate::audit::trace_denial;
use crate::error::WebError;
use crate::extract::{Json, Path};
use crate::features::auth::services::hash_password;
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    get,
    path = "/api/regions",
    responses(
        (status = 200, description = "Regions ordered by sort order", body = Vec<Region>)
    ),
    tag = "regions"
)]
pub async fn list_regions(
    State(db): State<Database>,
    actor: Option<Actor>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let regions = services::list_regions(db.pool(), actor.as_ref()).await?;

    Ok(Json(regions).into_response())
}

#[utoipa::path(
    get,
    path = "/api/regions/{id}",
    params(
        ("id" = Uuid, Path, description = "Region id")
    ),
    responses(
        (status = 200, description = "Region with owned-entity counts", body = RegionDetailResponse),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn get_region(
    State(db): State<Database>,
    actor: Option<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let actor = actor.map(|Actor(a)| a);
    let region = services::get_region(db.pool(), actor.as_ref(), id).await?;

    Ok(Json(region).into_response())
}

#[utoipa::path(
    post,
    path = "/api/regions",
    request_body = CreateRegionRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Region created", body = Region),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "regions"
)]
pub async fn create_region(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<CreateRegionRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_region", actor.require_staff())?;
    req.validate()?;

    let region = services::create_region(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(region)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/regions/{id}",
    params(
        ("id" = Uuid, Path, description = "Region id")
    ),
    request_body = UpdateRegionRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Region updated", body = Region),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn update_region(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRegionRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "update_region", actor.require_staff())?;
    req.validate()?;

    let region = services::update_region(db.pool(), id, &req).await?;

    Ok(Json(region).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/regions/{id}",
    params(
        ("id" = Uuid, Path, description = "Region id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Region deleted"),
        (status = 400, description = "Region still owns records"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn delete_region(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_region", actor.require_admin())?;

    services::delete_region(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/regions/{id}/users",
    params(
        ("id" = Uuid, Path, description = "Region id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Accounts bound to the region", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only")
    ),
    tag = "regions"
)]
pub async fn list_users(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "list_region_users", actor.require_staff())?;

    let users = services::list_users(db.pool(), id).await?;

    Ok(Json(users).into_response())
}

#[utoipa::path(
    post,
    path = "/api/regions/{id}/users",
    params(
        ("id" = Uuid, Path, description = "Region id")
    ),
    request_body = CreateRegionUserRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Representative account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Username already exists")
    ),
    tag = "regions"
)]
pub async fn create_user(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateRegionUserRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "create_region_user", actor.require_admin())?;
    req.validate()?;

    let password_hash = hash_password(&req.password)?;
    let user = services::create_user(db.pool(), id, &req, &password_hash).await?;

    tracing::info!(
        target: "audit",
        event = "user_created",
        user_id = %actor.user_id,
        created_user_id = %user.user_id,
        region_id = %id,
        "Representative {} created by {}",
        user.username,
        actor.username
    );

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/regions/{id}/users/{user_id}",
    params(
        ("id" = Uuid, Path, description = "Region id"),
        ("user_id" = Uuid, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found in this region")
    ),
    tag = "regions"
)]
pub async fn delete_user(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "delete_region_user", actor.require_admin())?;

    services::delete_user(db.pool(), id, user_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
