use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::content::{CreateGalleryItemRequest, GalleryFilter, UpdateGalleryItemRequest};
use crate::error::{Result, StorageError};
use crate::models::GalleryItem;

pub struct GalleryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GalleryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &GalleryFilter,
        include_unpublished: bool,
    ) -> Result<(Vec<GalleryItem>, i64)> {
        let pagination = filter.pagination();

        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM gallery_items WHERE 1=1");
        push_filters(&mut count, filter, include_unpublished);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM gallery_items WHERE 1=1");
        push_filters(&mut query, filter, include_unpublished);
        query.push(" ORDER BY event_date DESC NULLS LAST, sort_order LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let items = query
            .build_query_as::<GalleryItem>()
            .fetch_all(self.pool)
            .await?;

        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<GalleryItem> {
        sqlx::query_as::<_, GalleryItem>("SELECT * FROM gallery_items WHERE gallery_item_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateGalleryItemRequest) -> Result<GalleryItem> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            INSERT INTO gallery_items (
                title, title_kk, title_en, description, description_kk, description_en,
                media_type, url, thumbnail_url, album_name, event_date, sort_order, is_published
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.title_kk)
        .bind(&req.title_en)
        .bind(&req.description)
        .bind(&req.description_kk)
        .bind(&req.description_en)
        .bind(req.media_type)
        .bind(&req.url)
        .bind(&req.thumbnail_url)
        .bind(&req.album_name)
        .bind(req.event_date)
        .bind(req.sort_order)
        .bind(req.is_published)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    pub async fn update(
        &self,
        existing: &GalleryItem,
        req: &UpdateGalleryItemRequest,
    ) -> Result<GalleryItem> {
        sqlx::query_as::<_, GalleryItem>(
            r#"
            UPDATE gallery_items
            SET title = $2, title_kk = $3, title_en = $4, description = $5,
                description_kk = $6, description_en = $7, media_type = $8, url = $9,
                thumbnail_url = $10, album_name = $11, event_date = $12,
                sort_order = $13, is_published = $14
            WHERE gallery_item_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.gallery_item_id)
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.title_kk.as_ref().or(existing.title_kk.as_ref()))
        .bind(req.title_en.as_ref().or(existing.title_en.as_ref()))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.description_kk.as_ref().or(existing.description_kk.as_ref()))
        .bind(req.description_en.as_ref().or(existing.description_en.as_ref()))
        .bind(req.media_type.unwrap_or(existing.media_type))
        .bind(req.url.as_ref().unwrap_or(&existing.url))
        .bind(req.thumbnail_url.as_ref().or(existing.thumbnail_url.as_ref()))
        .bind(req.album_name.as_ref().or(existing.album_name.as_ref()))
        .bind(req.event_date.or(existing.event_date))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_published.unwrap_or(existing.is_published))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE gallery_item_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &GalleryFilter,
    include_unpublished: bool,
) {
    if !include_unpublished {
        query.push(" AND is_published");
    }

    if let Some(media_type) = filter.media_type {
        query.push(" AND media_type = ");
        query.push_bind(media_type);
    }

    if let Some(album) = &filter.album {
        query.push(" AND album_name = ");
        query.push_bind(album.clone());
    }
}
