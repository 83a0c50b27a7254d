use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::news::{CreateNewsRequest, UpdateNewsRequest};
use crate::error::{Result, StorageError, map_unique};
use crate::models::News;
use crate::services::slug::{slugify, with_suffix};

const SLUG_TAKEN: &str = "Another article with this title was saved at the same time, please retry";

pub struct NewsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        include_drafts: bool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<News>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM news WHERE is_published OR $1",
        )
        .bind(include_drafts)
        .fetch_one(self.pool)
        .await?;

        let items = sqlx::query_as::<_, News>(
            r#"
            SELECT * FROM news
            WHERE is_published OR $1
            ORDER BY published_at DESC NULLS LAST, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(include_drafts)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((items, total))
    }

    pub async fn find_by_slug(&self, slug: &str, include_drafts: bool) -> Result<News> {
        sqlx::query_as::<_, News>("SELECT * FROM news WHERE slug = $1 AND (is_published OR $2)")
            .bind(slug)
            .bind(include_drafts)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<News> {
        sqlx::query_as::<_, News>("SELECT * FROM news WHERE news_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateNewsRequest) -> Result<News> {
        let mut conn = self.pool.acquire().await?;
        let slug = unique_slug(&mut conn, &req.title, None).await?;

        let published_at = match (req.is_published, req.published_at) {
            (true, None) => Some(chrono::Utc::now()),
            (_, at) => at,
        };

        let news = sqlx::query_as::<_, News>(
            r#"
            INSERT INTO news (slug, title, title_kk, title_en, excerpt, content, image_url, is_published, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&slug)
        .bind(&req.title)
        .bind(&req.title_kk)
        .bind(&req.title_en)
        .bind(&req.excerpt)
        .bind(&req.content)
        .bind(&req.image_url)
        .bind(req.is_published)
        .bind(published_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "news_slug_key", SLUG_TAKEN))?;

        Ok(news)
    }

    pub async fn update(&self, existing: &News, req: &UpdateNewsRequest) -> Result<News> {
        let mut conn = self.pool.acquire().await?;

        let title = req.title.as_ref().unwrap_or(&existing.title);
        let slug = if title != &existing.title {
            unique_slug(&mut conn, title, Some(existing.news_id)).await?
        } else {
            existing.slug.clone()
        };

        let is_published = req.is_published.unwrap_or(existing.is_published);
        let published_at = match req.published_at.or(existing.published_at) {
            None if is_published => Some(chrono::Utc::now()),
            at => at,
        };

        sqlx::query_as::<_, News>(
            r#"
            UPDATE news
            SET slug = $2, title = $3, title_kk = $4, title_en = $5, excerpt = $6,
                content = $7, image_url = $8, is_published = $9, published_at = $10
            WHERE news_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.news_id)
        .bind(&slug)
        .bind(title)
        .bind(req.title_kk.as_ref().or(existing.title_kk.as_ref()))
        .bind(req.title_en.as_ref().or(existing.title_en.as_ref()))
        .bind(req.excerpt.as_ref().or(existing.excerpt.as_ref()))
        .bind(req.content.as_ref().unwrap_or(&existing.content))
        .bind(req.image_url.as_ref().or(existing.image_url.as_ref()))
        .bind(is_published)
        .bind(published_at)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "news_slug_key", SLUG_TAKEN))?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM news WHERE news_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

async fn unique_slug(conn: &mut PgConnection, title: &str, own_id: Option<Uuid>) -> Result<String> {
    let base = slugify(title, "news");
    let mut attempt = 1;

    loop {
        let candidate = with_suffix(&base, attempt);
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM news WHERE slug = $1 AND ($2::uuid IS NULL OR news_id <> $2))",
        )
        .bind(&candidate)
        .bind(own_id)
        .fetch_one(&mut *conn)
        .await?;

        if !taken {
            return Ok(candidate);
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> CreateNewsRequest {
        CreateNewsRequest {
            title: title.to_string(),
            title_kk: None,
            title_en: None,
            excerpt: None,
            content: "Текст".to_string(),
            image_url: None,
            is_published: true,
            published_at: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_same_title_gets_a_suffixed_slug(pool: PgPool) {
        let repo = NewsRepository::new(&pool);

        let first = repo.create(&article("Season results")).await.unwrap();
        let second = repo.create(&article("Season results")).await.unwrap();

        assert_eq!(first.slug, "season-results");
        assert_eq!(second.slug, "season-results-2");
        assert!(second.published_at.is_some());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_slug_collision_is_a_conflict(pool: PgPool) {
        let repo = NewsRepository::new(&pool);
        let existing = repo.create(&article("Season results")).await.unwrap();

        let err = sqlx::query("INSERT INTO news (slug, title, content) VALUES ($1, 'Other', 'Текст')")
            .bind(&existing.slug)
            .execute(&pool)
            .await
            .map(|_| ())
            .map_err(|e| map_unique(e, "news_slug_key", SLUG_TAKEN))
            .unwrap_err();

        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }
}
