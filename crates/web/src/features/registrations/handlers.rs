use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    Database,
    dto::{
        common::PaginatedResponse,
        registration::{
            AddRegistrationAthleteRequest, RegistrationDetailResponse, RegistrationFilter,
            RegistrationSummary, RemoveRegistrationAthleteQuery, SubmitRegistrationRequest,
            SubmitRegistrationResponse, UpdateRegistrationAthleteRequest,
            UpdateRegistrationStatusRequest,
        },
    },
    models::{AthleteRegistration, Registration, RegistrationAuditLog},
};
use uuid::Uuid;

use crate::audit::{self, trace_denial};
use crate::error::WebError;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::Actor;

use super::export::{self, DOCX_CONTENT_TYPE, RegistrationExport, XLSX_CONTENT_TYPE};
use super::services;

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = SubmitRegistrationRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Registration stored as PENDING", body = SubmitRegistrationResponse),
        (status = 400, description = "Roster, quota, window or duplicate check failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User is not bound to a region")
    ),
    tag = "registrations"
)]
pub async fn submit_registration(
    State(db): State<Database>,
    Actor(actor): Actor,
    Json(req): Json<SubmitRegistrationRequest>,
) -> Result<Response, WebError> {
    let response = trace_denial(
        &actor,
        "submit_registration",
        services::submit(db.pool(), &actor, &req, Utc::now()).await,
    )?;
    audit::log_registration_submitted(
        &actor,
        response.registration_id,
        &response.registration_number,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    params(RegistrationFilter),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Registrations visible to the caller", body = PaginatedResponse<RegistrationSummary>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "registrations"
)]
pub async fn list_registrations(
    State(db): State<Database>,
    Actor(actor): Actor,
    Query(filter): Query<RegistrationFilter>,
) -> Result<Response, WebError> {
    let pagination = filter.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let (items, total) = services::list(db.pool(), &actor, &filter).await?;

    Ok(Json(PaginatedResponse::new(items, &pagination, total)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Registration with roster and documents", body = RegistrationDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Neither staff nor owner"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn get_registration(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = trace_denial(
        &actor,
        "view_registration",
        services::detail(db.pool(), &actor, id).await,
    )?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/registrations/{id}",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    request_body = UpdateRegistrationStatusRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Status changed", body = Registration),
        (status = 400, description = "Transition not allowed from the current status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not perform this transition"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn update_registration_status(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRegistrationStatusRequest>,
) -> Result<Response, WebError> {
    let registration = trace_denial(
        &actor,
        "update_registration_status",
        services::update_status(db.pool(), &actor, id, &req, Utc::now()).await,
    )?;
    audit::log_registration_status(&actor, id, registration.status);

    Ok(Json(registration).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn delete_registration(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    trace_denial(
        &actor,
        "delete_registration",
        services::delete(db.pool(), &actor, id).await,
    )?;
    audit::log_registration_deleted(&actor, id);

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}/athletes",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Roster with coaches", body = Vec<AthleteRegistration>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Neither staff nor owner"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn list_registration_athletes(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let athletes = trace_denial(
        &actor,
        "view_registration",
        services::athletes(db.pool(), &actor, id).await,
    )?;

    Ok(Json(athletes).into_response())
}

#[utoipa::path(
    post,
    path = "/api/registrations/{id}/athletes",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    request_body = AddRegistrationAthleteRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 201, description = "Athlete added to the roster", body = AthleteRegistration),
        (status = 400, description = "Duplicate athlete or quota reached"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Cannot edit this registration"),
        (status = 404, description = "Registration or athlete not found")
    ),
    tag = "registrations"
)]
pub async fn add_registration_athlete(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<AddRegistrationAthleteRequest>,
) -> Result<Response, WebError> {
    let entry = trace_denial(
        &actor,
        "edit_registration",
        services::add_athlete(db.pool(), &actor, id, &req).await,
    )?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/registrations/{id}/athletes",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    request_body = UpdateRegistrationAthleteRequest,
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Coach changed", body = AthleteRegistration),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Cannot edit this registration"),
        (status = 404, description = "Roster entry not found")
    ),
    tag = "registrations"
)]
pub async fn update_registration_athlete(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRegistrationAthleteRequest>,
) -> Result<Response, WebError> {
    let entry = trace_denial(
        &actor,
        "edit_registration",
        services::update_athlete(db.pool(), &actor, id, &req).await,
    )?;

    Ok(Json(entry).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}/athletes",
    params(
        ("id" = Uuid, Path, description = "Registration id"),
        RemoveRegistrationAthleteQuery
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 204, description = "Athlete removed from the roster"),
        (status = 400, description = "Minimum 1 athlete required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Cannot edit this registration"),
        (status = 404, description = "Roster entry not found")
    ),
    tag = "registrations"
)]
pub async fn remove_registration_athlete(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Query(query): Query<RemoveRegistrationAthleteQuery>,
) -> Result<Response, WebError> {
    trace_denial(
        &actor,
        "edit_registration",
        services::remove_athlete(db.pool(), &actor, id, query.id).await,
    )?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Roster edit history, newest first", body = Vec<RegistrationAuditLog>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Neither staff nor owner"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn registration_history(
    State(db): State<Database>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let logs = trace_denial(
        &actor,
        "view_registration",
        services::history(db.pool(), &actor, id).await,
    )?;

    Ok(Json(logs).into_response())
}

fn attachment(content_type: &str, file_name: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn load_export(db: &Database, actor: &Actor, id: Uuid) -> Result<RegistrationExport, WebError> {
    let Actor(actor) = actor;
    let export = trace_denial(
        actor,
        "export_registration",
        services::export(db.pool(), actor, id).await,
    )?;
    Ok(export)
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}/export/excel",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "XLSX workbook with Info, Athletes and Judges sheets", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Neither staff nor owner"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn export_excel(
    State(db): State<Database>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let snapshot = load_export(&db, &actor, id).await?;
    let bytes = export::to_xlsx(&snapshot)?;

    Ok(attachment(XLSX_CONTENT_TYPE, snapshot.file_name("xlsx"), bytes))
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}/export/doc",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "DOCX document with the roster tables", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Neither staff nor owner"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn export_doc(
    State(db): State<Database>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let snapshot = load_export(&db, &actor, id).await?;
    let bytes = export::to_docx(&snapshot)?;

    Ok(attachment(DOCX_CONTENT_TYPE, snapshot.file_name("docx"), bytes))
}
