use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::athlete::{CreateCoachRequest, RegistryFilter, UpdateCoachRequest};
use crate::error::{Result, StorageError, map_foreign_key};
use crate::models::Coach;

pub struct CoachRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CoachRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &RegistryFilter,
        region_id: Option<Uuid>,
    ) -> Result<(Vec<Coach>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM coaches WHERE 1=1");
        push_filters(&mut count, filter, region_id);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM coaches WHERE 1=1");
        push_filters(&mut query, filter, region_id);
        query.push(" ORDER BY sort_order, name LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let coaches = query.build_query_as::<Coach>().fetch_all(self.pool).await?;

        Ok((coaches, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Coach> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE coach_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateCoachRequest, region_id: Option<Uuid>) -> Result<Coach> {
        let coach = sqlx::query_as::<_, Coach>(
            r#"
            INSERT INTO coaches (name, name_kk, name_en, iin, dob, region_id, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.name_kk)
        .bind(&req.name_en)
        .bind(&req.iin)
        .bind(req.dob)
        .bind(region_id)
        .bind(req.is_active)
        .bind(req.sort_order)
        .fetch_one(self.pool)
        .await?;

        Ok(coach)
    }

    pub async fn update(&self, existing: &Coach, req: &UpdateCoachRequest) -> Result<Coach> {
        sqlx::query_as::<_, Coach>(
            r#"
            UPDATE coaches
            SET name = $2, name_kk = $3, name_en = $4, iin = $5, dob = $6,
                region_id = $7, is_active = $8, sort_order = $9
            WHERE coach_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.coach_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.name_kk.as_ref().or(existing.name_kk.as_ref()))
        .bind(req.name_en.as_ref().or(existing.name_en.as_ref()))
        .bind(req.iin.as_ref().or(existing.iin.as_ref()))
        .bind(req.dob.or(existing.dob))
        .bind(req.region_id.or(existing.region_id))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM coaches WHERE coach_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| map_foreign_key(e, "Coach is still referenced"))?;

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
}
