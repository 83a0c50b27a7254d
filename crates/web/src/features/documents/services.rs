use sqlx::PgPool;
use storage::{
    dto::content::{CreateDocumentRequest, DocumentFilter, UpdateDocumentRequest},
    error::{Result, StorageError},
    models::{ActorContext, Document},
    repository::document::DocumentRepository,
};
use uuid::Uuid;

pub async fn list_documents(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &DocumentFilter,
) -> Result<(Vec<Document>, i64)> {
    let include_unpublished = ActorContext::sees_hidden(actor, filter.include_unpublished);
    DocumentRepository::new(pool)
        .list(filter, include_unpublished)
        .await
}

pub async fn get_document(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<Document> {
    let item = DocumentRepository::new(pool).find_by_id(id).await?;

    if !item.is_published && !ActorContext::sees_hidden(actor, true) {
        return Err(StorageError::NotFound);
    }

    Ok(item)
}

pub async fn create_document(pool: &PgPool, req: &CreateDocumentRequest) -> Result<Document> {
    DocumentRepository::new(pool).create(req).await
}

pub async fn update_document(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateDocumentRequest,
) -> Result<Document> {
    let repo = DocumentRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_document(pool: &PgPool, id: Uuid) -> Result<()> {
    DocumentRepository::new(pool).delete(id).await
}
