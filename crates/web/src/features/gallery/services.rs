use sqlx::PgPool;
use storage::{
    dto::content::{CreateGalleryItemRequest, GalleryFilter, UpdateGalleryItemRequest},
    error::{Result, StorageError},
    models::{ActorContext, GalleryItem},
    repository::gallery::GalleryRepository,
};
use uuid::Uuid;

pub async fn list_gallery(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &GalleryFilter,
) -> Result<(Vec<GalleryItem>, i64)> {
    let include_unpublished = ActorContext::sees_hidden(actor, filter.include_unpublished);
    GalleryRepository::new(pool)
        .list(filter, include_unpublished)
        .await
}

pub async fn get_gallery_item(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<GalleryItem> {
    let item = GalleryRepository::new(pool).find_by_id(id).await?;

    if !item.is_published && !ActorContext::sees_hidden(actor, true) {
        return Err(StorageError::NotFound);
    }

    Ok(item)
}

pub async fn create_gallery_item(pool: &PgPool, req: &CreateGalleryItemRequest) -> Result<GalleryItem> {
    GalleryRepository::new(pool).create(req).await
}

pub async fn update_gallery_item(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateGalleryItemRequest,
) -> Result<GalleryItem> {
    let repo = GalleryRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_gallery_item(pool: &PgPool, id: Uuid) -> Result<()> {
    GalleryRepository::new(pool).delete(id).await
}
