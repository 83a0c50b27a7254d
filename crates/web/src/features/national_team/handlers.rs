use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::national_team::{NationalTeamFilter, UpsertMembershipRequest},
    models::NationalTeamMembership,
};
use uuid::Uuid;

use crate::audit::trace_denial;
use crate::error::WebError;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    get,
    path = "/api/national-team",
    params(NationalTeamFilter),
    responses(
        (status = 200, description = "National team roster", body = Vec<NationalTeamMembership>)
    ),
    tag = "national-team"
)]
pub async fn list_members(
    State(db): State<Database>,
    Query(filter): Query<NationalTeamFilter>,
) -> Result<Response, WebError> {
    let members = services::list_members(db.pool(), &filter).await?;

    Ok(Json(members).into_response())
}

#[utoipa::path(
    post,
    path = "/api/national-team",
    request_body = UpsertMembershipRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Roster slot created or re-activated", body = NationalTeamMembership),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Athlete not found")
    ),
    tag = "national-team"
)]
pub async fn upsert_member(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<UpsertMembershipRequest>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "upsert_national_team", actor.require_staff())?;

    let member = services::upsert_member(db.pool(), &req).await?;

    Ok(Json(member).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/national-team/{id}",
    params(
        ("id" = Uuid, Path, description = "Membership id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Membership deactivated"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Membership not found")
    ),
    tag = "national-team"
)]
pub async fn remove_member(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(&actor, "remove_national_team", actor.require_staff())?;

    services::remove_member(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
