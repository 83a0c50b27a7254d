use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::content::{CreateDocumentRequest, DocumentFilter, UpdateDocumentRequest};
use crate::error::{Result, StorageError};
use crate::models::Document;

pub struct DocumentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &DocumentFilter,
        include_unpublished: bool,
    ) -> Result<(Vec<Document>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE 1=1");
        push_filters(&mut count, filter, include_unpublished);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM documents WHERE 1=1");
        push_filters(&mut query, filter, include_unpublished);
        query.push(" ORDER BY year DESC NULLS LAST, sort_order LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let documents = query
            .build_query_as::<Document>()
            .fetch_all(self.pool)
            .await?;

        Ok((documents, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Document> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE document_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateDocumentRequest) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                title, title_kk, title_en, section, file_url, file_type, file_size,
                year, sort_order, is_published
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.title_kk)
        .bind(&req.title_en)
        .bind(req.section)
        .bind(&req.file_url)
        .bind(&req.file_type)
        .bind(req.file_size)
        .bind(req.year)
        .bind(req.sort_order)
        .bind(req.is_published)
        .fetch_one(self.pool)
        .await?;

        Ok(document)
    }

    pub async fn update(&self, existing: &Document, req: &UpdateDocumentRequest) -> Result<Document> {
        sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET title = $2, title_kk = $3, title_en = $4, section = $5, file_url = $6,
                file_type = $7, file_size = $8, year = $9, sort_order = $10, is_published = $11
            WHERE document_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.document_id)
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.title_kk.as_ref().or(existing.title_kk.as_ref()))
        .bind(req.title_en.as_ref().or(existing.title_en.as_ref()))
        .bind(req.section.unwrap_or(existing.section))
        .bind(req.file_url.as_ref().unwrap_or(&existing.file_url))
        .bind(req.file_type.as_ref().or(existing.file_type.as_ref()))
        .bind(req.file_size.or(existing.file_size))
        .bind(req.year.or(existing.year))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_published.unwrap_or(existing.is_published))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM documents WHERE document_id = $1")
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
    filter: &DocumentFilter,
    include_unpublished: bool,
) {
    if !include_unpublished {
        query.push(" AND is_published");
    }

    if let Some(section) = filter.section {
        query.push(" AND section = ");
        query.push_bind(section);
    }

    if let Some(year) = filter.year {
        query.push(" AND year = ");
        query.push_bind(year);
    }
}
