use sqlx::PgPool;
use storage::{
    dto::protocol::{CreateProtocolRequest, ProtocolFilter, UpdateProtocolRequest},
    error::Result,
    models::{ActorContext, Protocol, ProtocolEntry},
    repository::protocol::ProtocolRepository,
};
use uuid::Uuid;

pub async fn list_protocols(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &ProtocolFilter,
) -> Result<(Vec<ProtocolEntry>, i64)> {
    let include_unpublished = ActorContext::sees_hidden(actor, filter.include_unpublished);
    ProtocolRepository::new(pool)
        .list(filter, include_unpublished)
        .await
}

pub async fn get_protocol(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<ProtocolEntry> {
    let include_unpublished = ActorContext::sees_hidden(actor, true);
    ProtocolRepository::new(pool)
        .find_entry(id, include_unpublished)
        .await
}

pub async fn create_protocol(pool: &PgPool, req: &CreateProtocolRequest) -> Result<Protocol> {
    ProtocolRepository::new(pool).create(req).await
}

pub async fn update_protocol(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateProtocolRequest,
) -> Result<Protocol> {
    let repo = ProtocolRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_protocol(pool: &PgPool, id: Uuid) -> Result<()> {
    ProtocolRepository::new(pool).delete(id).await
}
