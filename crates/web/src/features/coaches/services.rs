use sqlx::PgPool;
use storage::{
    dto::athlete::{CreateCoachRequest, RegistryFilter, UpdateCoachRequest},
    error::Result,
    models::{ActorContext, Coach},
    repository::coach::CoachRepository,
};
use uuid::Uuid;

use crate::features::athletes::services::registry_region;

pub async fn list_coaches(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &RegistryFilter,
) -> Result<(Vec<Coach>, i64)> {
    let region_id = registry_region(actor, filter);
    CoachRepository::new(pool).list(filter, region_id).await
}

pub async fn get_coach(pool: &PgPool, id: Uuid) -> Result<Coach> {
    CoachRepository::new(pool).find_by_id(id).await
}

pub async fn create_coach(
    pool: &PgPool,
    actor: &ActorContext,
    req: &CreateCoachRequest,
) -> Result<Coach> {
    let region_id = actor.scope_region(req.region_id)?;
    CoachRepository::new(pool).create(req, region_id).await
}

pub async fn update_coach(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    req: UpdateCoachRequest,
) -> Result<Coach> {
    let repo = CoachRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    actor.ensure_region_access(existing.region_id)?;

    let req = UpdateCoachRequest {
        region_id: if actor.is_staff() { req.region_id } else { None },
        ..req
    };

    repo.update(&existing, &req).await
}

pub async fn delete_coach(pool: &PgPool, actor: &ActorContext, id: Uuid) -> Result<()> {
    let repo = CoachRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    actor.ensure_region_access(existing.region_id)?;

    repo.delete(id).await
}
