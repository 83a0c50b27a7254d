use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::region::{CreateRegionRequest, UpdateRegionRequest};
use crate::error::{Result, StorageError, map_foreign_key, map_unique};
use crate::models::{Region, RegionCounts, Role, User};

pub struct RegionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Region>> {
        let regions = sqlx::query_as::<_, Region>(
            r#"
            SELECT * FROM regions
            WHERE is_active OR $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(self.pool)
        .await?;

        Ok(regions)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Region> {
        sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE region_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Rows that still reference the region.
    pub async fn counts(&self, id: Uuid) -> Result<RegionCounts> {
        let counts = sqlx::query_as::<_, RegionCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM athletes WHERE region_id = $1) AS athletes,
                (SELECT COUNT(*) FROM coaches WHERE region_id = $1) AS coaches,
                (SELECT COUNT(*) FROM judges WHERE region_id = $1) AS judges,
                (SELECT COUNT(*) FROM users WHERE region_id = $1) AS users
            "#,
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn create(&self, req: &CreateRegionRequest) -> Result<Region> {
        let region = sqlx::query_as::<_, Region>(
            r#"
            INSERT INTO regions (
                name, name_kk, name_en, director, director_kk, director_en,
                address, address_kk, address_en, phone, email, sort_order, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.name_kk)
        .bind(&req.name_en)
        .bind(&req.director)
        .bind(&req.director_kk)
        .bind(&req.director_en)
        .bind(&req.address)
        .bind(&req.address_kk)
        .bind(&req.address_en)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(region)
    }

    pub async fn update(&self, existing: &Region, req: &UpdateRegionRequest) -> Result<Region> {
        let region = sqlx::query_as::<_, Region>(
            r#"
            UPDATE regions
            SET name = $2, name_kk = $3, name_en = $4,
                director = $5, director_kk = $6, director_en = $7,
                address = $8, address_kk = $9, address_en = $10,
                phone = $11, email = $12, sort_order = $13, is_active = $14
            WHERE region_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.region_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.name_kk.as_ref().or(existing.name_kk.as_ref()))
        .bind(req.name_en.as_ref().or(existing.name_en.as_ref()))
        .bind(req.director.as_ref().unwrap_or(&existing.director))
        .bind(req.director_kk.as_ref().or(existing.director_kk.as_ref()))
        .bind(req.director_en.as_ref().or(existing.director_en.as_ref()))
        .bind(req.address.as_ref().unwrap_or(&existing.address))
        .bind(req.address_kk.as_ref().or(existing.address_kk.as_ref()))
        .bind(req.address_en.as_ref().or(existing.address_en.as_ref()))
        .bind(req.phone.as_ref().unwrap_or(&existing.phone))
        .bind(req.email.as_ref().or(existing.email.as_ref()))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(region)
    }

    /// Deletes a region that owns no athletes, coaches, judges or users.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.find_by_id(id).await?;

        let total = self.counts(id).await?.total();
        if total > 0 {
            return Err(StorageError::validation(format!(
                "Cannot delete region with {} associated records",
                total
            )));
        }

        sqlx::query("DELETE FROM regions WHERE region_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Case-insensitive lookup used by login.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list_for_region(&self, region_id: Uuid) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE region_id = $1 ORDER BY username",
        )
        .bind(region_id)
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
        region_id: Option<Uuid>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, region_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(region_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique(e, "users_username_lower_key", "Username already exists"))?;

        Ok(user)
    }

    pub async fn delete_from_region(&self, region_id: Uuid, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1 AND region_id = $2")
            .bind(user_id)
            .bind(region_id)
            .execute(self.pool)
            .await
            .map_err(|e| map_foreign_key(e, "Cannot delete a user who has submitted registrations"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
