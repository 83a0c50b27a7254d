use sqlx::PgPool;
use storage::{
    dto::content::{CreateSlideRequest, ActiveFilter, UpdateSlideRequest},
    error::{Result, StorageError},
    models::{ActorContext, Slide},
    repository::slide::SlideRepository,
};
use uuid::Uuid;

pub async fn list_slides(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &ActiveFilter,
) -> Result<(Vec<Slide>, i64)> {
    let include_inactive = ActorContext::sees_hidden(actor, filter.include_inactive);
    SlideRepository::new(pool)
        .list(include_inactive, &filter.pagination())
        .await
}

pub async fn get_slide(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<Slide> {
    let item = SlideRepository::new(pool).find_by_id(id).await?;

    if !item.is_active && !ActorContext::sees_hidden(actor, true) {
        return Err(StorageError::NotFound);
    }

    Ok(item)
}

pub async fn create_slide(pool: &PgPool, req: &CreateSlideRequest) -> Result<Slide> {
    SlideRepository::new(pool).create(req).await
}

pub async fn update_slide(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateSlideRequest,
) -> Result<Slide> {
    let repo = SlideRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_slide(pool: &PgPool, id: Uuid) -> Result<()> {
    SlideRepository::new(pool).delete(id).await
}
