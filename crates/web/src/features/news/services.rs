use sqlx::PgPool;
use storage::{
    dto::news::{CreateNewsRequest, NewsFilter, UpdateNewsRequest},
    error::Result,
    models::{ActorContext, News},
    repository::news::NewsRepository,
};
use uuid::Uuid;

pub async fn list_news(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &NewsFilter,
) -> Result<(Vec<News>, i64)> {
    let include_drafts = ActorContext::sees_hidden(actor, filter.include_drafts);
    NewsRepository::new(pool)
        .list(include_drafts, &filter.pagination())
        .await
}

pub async fn get_news(pool: &PgPool, actor: Option<&ActorContext>, slug: &str) -> Result<News> {
    let include_drafts = ActorContext::sees_hidden(actor, true);
    NewsRepository::new(pool).find_by_slug(slug, include_drafts).await
}

pub async fn create_news(pool: &PgPool, req: &CreateNewsRequest) -> Result<News> {
    NewsRepository::new(pool).create(req).await
}

pub async fn update_news(pool: &PgPool, id: Uuid, req: &UpdateNewsRequest) -> Result<News> {
    let repo = NewsRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_news(pool: &PgPool, id: Uuid) -> Result<()> {
    NewsRepository::new(pool).delete(id).await
}
