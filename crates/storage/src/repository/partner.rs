use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::content::{CreatePartnerRequest, UpdatePartnerRequest};
use crate::error::{Result, StorageError};
use crate::models::Partner;

pub struct PartnerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PartnerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        include_inactive: bool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Partner>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM partners WHERE is_active OR $1")
                .bind(include_inactive)
                .fetch_one(self.pool)
                .await?;

        let partners = sqlx::query_as::<_, Partner>(
            r#"
            SELECT * FROM partners
            WHERE is_active OR $1
            ORDER BY sort_order, name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(include_inactive)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((partners, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Partner> {
        sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE partner_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreatePartnerRequest) -> Result<Partner> {
        let partner = sqlx::query_as::<_, Partner>(
            r#"
            INSERT INTO partners (
                name, logo_url, website_url, instagram_url, facebook_url,
                description, description_kk, description_en, sort_order, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.logo_url)
        .bind(&req.website_url)
        .bind(&req.instagram_url)
        .bind(&req.facebook_url)
        .bind(&req.description)
        .bind(&req.description_kk)
        .bind(&req.description_en)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(partner)
    }

    pub async fn update(&self, existing: &Partner, req: &UpdatePartnerRequest) -> Result<Partner> {
        sqlx::query_as::<_, Partner>(
            r#"
            UPDATE partners
            SET name = $2, logo_url = $3, website_url = $4, instagram_url = $5,
                facebook_url = $6, description = $7, description_kk = $8,
                description_en = $9, sort_order = $10, is_active = $11
            WHERE partner_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.partner_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.logo_url.as_ref().or(existing.logo_url.as_ref()))
        .bind(req.website_url.as_ref().or(existing.website_url.as_ref()))
        .bind(req.instagram_url.as_ref().or(existing.instagram_url.as_ref()))
        .bind(req.facebook_url.as_ref().or(existing.facebook_url.as_ref()))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.description_kk.as_ref().or(existing.description_kk.as_ref()))
        .bind(req.description_en.as_ref().or(existing.description_en.as_ref()))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM partners WHERE partner_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
