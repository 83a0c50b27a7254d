use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::content::{CreateStaffMemberRequest, StaffFilter, UpdateStaffMemberRequest};
use crate::error::{Result, StorageError};
use crate::models::StaffMember;

pub struct StaffRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &StaffFilter,
        include_inactive: bool,
    ) -> Result<(Vec<StaffMember>, i64)> {
        let pagination = filter.pagination();

        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM staff_members WHERE 1=1");
        push_filters(&mut count, filter, include_inactive);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM staff_members WHERE 1=1");
        push_filters(&mut query, filter, include_inactive);
        query.push(" ORDER BY sort_order, name LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let members = query
            .build_query_as::<StaffMember>()
            .fetch_all(self.pool)
            .await?;

        Ok((members, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<StaffMember> {
        sqlx::query_as::<_, StaffMember>("SELECT * FROM staff_members WHERE staff_member_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateStaffMemberRequest) -> Result<StaffMember> {
        let member = sqlx::query_as::<_, StaffMember>(
            r#"
            INSERT INTO staff_members (
                name, name_kk, name_en, role, role_title, role_title_kk, role_title_en,
                description, description_kk, description_en, department, image_url,
                sort_order, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.name_kk)
        .bind(&req.name_en)
        .bind(&req.role)
        .bind(&req.role_title)
        .bind(&req.role_title_kk)
        .bind(&req.role_title_en)
        .bind(&req.description)
        .bind(&req.description_kk)
        .bind(&req.description_en)
        .bind(req.department)
        .bind(&req.image_url)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(member)
    }

    pub async fn update(
        &self,
        existing: &StaffMember,
        req: &UpdateStaffMemberRequest,
    ) -> Result<StaffMember> {
        sqlx::query_as::<_, StaffMember>(
            r#"
            UPDATE staff_members
            SET name = $2, name_kk = $3, name_en = $4, role = $5, role_title = $6,
                role_title_kk = $7, role_title_en = $8, description = $9,
                description_kk = $10, description_en = $11, department = $12,
                image_url = $13, sort_order = $14, is_active = $15
            WHERE staff_member_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.staff_member_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.name_kk.as_ref().or(existing.name_kk.as_ref()))
        .bind(req.name_en.as_ref().or(existing.name_en.as_ref()))
        .bind(req.role.as_ref().unwrap_or(&existing.role))
        .bind(req.role_title.as_ref().unwrap_or(&existing.role_title))
        .bind(req.role_title_kk.as_ref().or(existing.role_title_kk.as_ref()))
        .bind(req.role_title_en.as_ref().or(existing.role_title_en.as_ref()))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.description_kk.as_ref().or(existing.description_kk.as_ref()))
        .bind(req.description_en.as_ref().or(existing.description_en.as_ref()))
        .bind(req.department.unwrap_or(existing.department))
        .bind(req.image_url.as_ref().or(existing.image_url.as_ref()))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM staff_members WHERE staff_member_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &StaffFilter, include_inactive: bool) {
    if !include_inactive {
        query.push(" AND is_active");
    }

    if let Some(department) = filter.department {
        query.push(" AND department = ");
        query.push_bind(department);
    }
}
