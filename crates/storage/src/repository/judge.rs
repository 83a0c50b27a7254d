use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::athlete::{CreateJudgeRequest, RegistryFilter, UpdateJudgeRequest};
use crate::error::{Result, StorageError, map_foreign_key};
use crate::models::Judge;

pub struct JudgeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> JudgeRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &RegistryFilter,
        region_id: Option<Uuid>,
    ) -> Result<(Vec<Judge>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM judges WHERE 1=1");
        push_filters(&mut count, filter, region_id);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM judges WHERE 1=1");
        push_filters(&mut query, filter, region_id);
        query.push(" ORDER BY sort_order, name LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let judges = query.build_query_as::<Judge>().fetch_all(self.pool).await?;

        Ok((judges, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Judge> {
        sqlx::query_as::<_, Judge>("SELECT * FROM judges WHERE judge_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateJudgeRequest, region_id: Option<Uuid>) -> Result<Judge> {
        let judge = sqlx::query_as::<_, Judge>(
            r#"
            INSERT INTO judges (name, name_kk, name_en, iin, dob, category, region_id, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.name_kk)
        .bind(&req.name_en)
        .bind(&req.iin)
        .bind(req.dob)
        .bind(&req.category)
        .bind(region_id)
        .bind(req.is_active)
        .bind(req.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(judge)
    }

    pub async fn update(&self, existing: &Judge, req: &UpdateJudgeRequest) -> Result<Judge> {
        sqlx::query_as::<_, Judge>(
            r#"
            UPDATE judges
            SET name = $2, name_kk = $3, name_en = $4, iin = $5, dob = $6,
                category = $7, region_id = $8, is_active = $9, sort_order = $10
            WHERE judge_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.judge_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.name_kk.as_ref().or(existing.name_kk.as_ref()))
        .bind(req.name_en.as_ref().or(existing.name_en.as_ref()))
        .bind(req.iin.as_ref().or(existing.iin.as_ref()))
        .bind(req.dob.or(existing.dob))
        .bind(req.category.as_ref().unwrap_or(&existing.category))
        .bind(req.region_id.or(existing.region_id))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM judges WHERE judge_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| map_foreign_key(e, "Judge is part of a registration"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &RegistryFilter, region_id: Option<Uuid>) {
    if let Some(region_id) = region_id {
        query.push(" AND region_id = ");
        query.push_bind(region_id);
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }

    if let Some(category) = &filter.category {
        query.push(" AND category = ");
        query.push_bind(category.clone());
    }
}
