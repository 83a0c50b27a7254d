use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::content::{CreateSlideRequest, UpdateSlideRequest};
use crate::error::{Result, StorageError};
use crate::models::Slide;

pub struct SlideRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SlideRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Carousel order: `sort_order`, then oldest first.
    pub async fn list(
        &self,
        include_inactive: bool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Slide>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM slides WHERE is_active OR $1")
                .bind(include_inactive)
                .fetch_one(self.pool)
                .await?;

        let slides = sqlx::query_as::<_, Slide>(
            r#"
            SELECT * FROM slides
            WHERE is_active OR $1
            ORDER BY sort_order, created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(include_inactive)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((slides, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Slide> {
        sqlx::query_as::<_, Slide>("SELECT * FROM slides WHERE slide_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateSlideRequest) -> Result<Slide> {
        let slide = sqlx::query_as::<_, Slide>(
            r#"
            INSERT INTO slides (
                title, title_kk, title_en, description, description_kk, description_en,
                image_url, link_url, sort_order, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.title_kk)
        .bind(&req.title_en)
        .bind(&req.description)
        .bind(&req.description_kk)
        .bind(&req.description_en)
        .bind(&req.image_url)
        .bind(&req.link_url)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(slide)
    }

    pub async fn update(&self, existing: &Slide, req: &UpdateSlideRequest) -> Result<Slide> {
        sqlx::query_as::<_, Slide>(
            r#"
            UPDATE slides
            SET title = $2, title_kk = $3, title_en = $4, description = $5,
                description_kk = $6, description_en = $7, image_url = $8, link_url = $9,
                sort_order = $10, is_active = $11
            WHERE slide_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.slide_id)
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.title_kk.as_ref().or(existing.title_kk.as_ref()))
        .bind(req.title_en.as_ref().or(existing.title_en.as_ref()))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.description_kk.as_ref().or(existing.description_kk.as_ref()))
        .bind(req.description_en.as_ref().or(existing.description_en.as_ref()))
        .bind(req.image_url.as_ref().unwrap_or(&existing.image_url))
        .bind(req.link_url.as_ref().or(existing.link_url.as_ref()))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM slides WHERE slide_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
