use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::registration::{
        AddRegistrationAthleteRequest, RegistrationDetailResponse, RegistrationFilter,
        RegistrationSummary, SubmitRegistrationRequest, SubmitRegistrationResponse,
        UpdateRegistrationAthleteRequest, UpdateRegistrationStatusRequest,
    },
    error::Result,
    models::{ActorContext, AthleteRegistration, Registration, RegistrationAuditLog},
    repository::{
        region::UserRepository,
        registration::{RegistrationRepository, RegistrationScope},
    },
    services::registration_rules::ensure_can_view,
};
use uuid::Uuid;

use super::export::RegistrationExport;

pub async fn submit(
    pool: &PgPool,
    actor: &ActorContext,
    req: &SubmitRegistrationRequest,
    now: DateTime<Utc>,
) -> Result<SubmitRegistrationResponse> {
    RegistrationRepository::new(pool).submit(actor, req, now).await
}

pub async fn list(
    pool: &PgPool,
    actor: &ActorContext,
    filter: &RegistrationFilter,
) -> Result<(Vec<RegistrationSummary>, i64)> {
    let scope = RegistrationScope::for_actor(actor, filter);
    RegistrationRepository::new(pool).list(filter, scope).await
}

pub async fn detail(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
) -> Result<RegistrationDetailResponse> {
    RegistrationRepository::new(pool).detail(actor, id).await
}

pub async fn update_status(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    req: &UpdateRegistrationStatusRequest,
    now: DateTime<Utc>,
) -> Result<Registration> {
    RegistrationRepository::new(pool)
        .update_status(actor, id, req, now)
        .await
}

pub async fn delete(pool: &PgPool, actor: &ActorContext, id: Uuid) -> Result<()> {
    actor.require_admin()?;
    RegistrationRepository::new(pool).delete(id).await
}

pub async fn athletes(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
) -> Result<Vec<AthleteRegistration>> {
    let repo = RegistrationRepository::new(pool);
    let registration = repo.find_by_id(id).await?;
    ensure_can_view(actor, &registration)?;

    repo.athletes(id).await
}

pub async fn add_athlete(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    req: &AddRegistrationAthleteRequest,
) -> Result<AthleteRegistration> {
    RegistrationRepository::new(pool).add_athlete(actor, id, req).await
}

pub async fn update_athlete(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    req: &UpdateRegistrationAthleteRequest,
) -> Result<AthleteRegistration> {
    RegistrationRepository::new(pool)
        .update_athlete(actor, id, req)
        .await
}

pub async fn remove_athlete(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    athlete_registration_id: Uuid,
) -> Result<()> {
    RegistrationRepository::new(pool)
        .remove_athlete(actor, id, athlete_registration_id)
        .await
}

pub async fn history(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
) -> Result<Vec<RegistrationAuditLog>> {
    RegistrationRepository::new(pool).history(actor, id).await
}

/// Snapshot for the document exports; same visibility as `detail`.
pub async fn export(pool: &PgPool, actor: &ActorContext, id: Uuid) -> Result<RegistrationExport> {
    let detail = detail(pool, actor, id).await?;

    let submitted_by = UserRepository::new(pool)
        .find_by_id(detail.registration.user_id)
        .await?
        .map(|user| user.username)
        .unwrap_or_default();

    Ok(RegistrationExport {
        detail,
        submitted_by,
    })
}
