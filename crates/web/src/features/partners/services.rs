use sqlx::PgPool;
use storage::{
    dto::content::{CreatePartnerRequest, ActiveFilter, UpdatePartnerRequest},
    error::{Result, StorageError},
    models::{ActorContext, Partner},
    repository::partner::PartnerRepository,
};
use uuid::Uuid;

pub async fn list_partners(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &ActiveFilter,
) -> Result<(Vec<Partner>, i64)> {
    let include_inactive = ActorContext::sees_hidden(actor, filter.include_inactive);
    PartnerRepository::new(pool)
        .list(include_inactive, &filter.pagination())
        .await
}

pub async fn get_partner(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<Partner> {
    let item = PartnerRepository::new(pool).find_by_id(id).await?;

    if !item.is_active && !ActorContext::sees_hidden(actor, true) {
        return Err(StorageError::NotFound);
    }

    Ok(item)
}

pub async fn create_partner(pool: &PgPool, req: &CreatePartnerRequest) -> Result<Partner> {
    PartnerRepository::new(pool).create(req).await
}

pub async fn update_partner(
    pool: &PgPool,
    id: Uuid,
    req: &UpdatePartnerRequest,
) -> Result<Partner> {
    let repo = PartnerRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_partner(pool: &PgPool, id: Uuid) -> Result<()> {
    PartnerRepository::new(pool).delete(id).await
}
