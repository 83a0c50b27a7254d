use sqlx::PgPool;
use storage::{
    dto::athlete::{CreateJudgeRequest, RegistryFilter, UpdateJudgeRequest},
    error::Result,
    models::{ActorContext, Judge},
    repository::judge::JudgeRepository,
};
use uuid::Uuid;

use crate::features::athletes::services::registry_region;

pub async fn list_judges(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &RegistryFilter,
) -> Result<(Vec<Judge>, i64)> {
    let region_id = registry_region(actor, filter);
    JudgeRepository::new(pool).list(filter, region_id).await
}

pub async fn get_judge(pool: &PgPool, id: Uuid) -> Result<Judge> {
    JudgeRepository::new(pool).find_by_id(id).await
}

pub async fn create_judge(
    pool: &PgPool,
    actor: &ActorContext,
    req: &CreateJudgeRequest,
) -> Result<Judge> {
    let region_id = actor.scope_region(req.region_id)?;
    JudgeRepository::new(pool).create(req, region_id).await
}

pub async fn update_judge(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    req: UpdateJudgeRequest,
) -> Result<Judge> {
    let repo = JudgeRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    actor.ensure_region_access(existing.region_id)?;

    let req = UpdateJudgeRequest {
        region_id: if actor.is_staff() { req.region_id } else { None },
        ..req
    };

    repo.update(&existing, &req).await
}

pub async fn delete_judge(pool: &PgPool, actor: &ActorContext, id: Uuid) -> Result<()> {
    let repo = JudgeRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    actor.ensure_region_access(existing.region_id)?;

    repo.delete(id).await
}
