use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::national_team::{NationalTeamFilter, UpsertMembershipRequest};
use crate::error::{Result, StorageError, map_foreign_key};
use crate::models::NationalTeamMembership;

const SELECT_MEMBERSHIPS: &str = r#"
    SELECT m.membership_id, m.athlete_id, a.name AS athlete_name, a.slug AS athlete_slug,
           m.category, m.gender, m.bow_type, m.is_active, m.sort_order
    FROM national_team_memberships m
    JOIN athletes a ON a.athlete_id = m.athlete_id
"#;

pub struct NationalTeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NationalTeamRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &NationalTeamFilter) -> Result<Vec<NationalTeamMembership>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_MEMBERSHIPS);
        query.push(" WHERE m.is_active = ");
        query.push_bind(filter.is_active.unwrap_or(true));

        if let Some(category) = filter.category {
            query.push(" AND m.category = ");
            query.push_bind(category);
        }
        if let Some(gender) = filter.gender {
            query.push(" AND m.gender = ");
            query.push_bind(gender);
        }
        if let Some(bow_type) = filter.bow_type {
            query.push(" AND m.bow_type = ");
            query.push_bind(bow_type);
        }

        query.push(" ORDER BY m.category, m.gender, m.bow_type, m.sort_order, a.name");

        let members = query
            .build_query_as::<NationalTeamMembership>()
            .fetch_all(self.pool)
            .await?;

        Ok(members)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<NationalTeamMembership> {
        sqlx::query_as::<_, NationalTeamMembership>(&format!(
            "{} WHERE m.membership_id = $1",
            SELECT_MEMBERSHIPS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Adds the athlete to the roster slot, re-activating it if it was soft-removed.
    pub async fn upsert(&self, req: &UpsertMembershipRequest) -> Result<NationalTeamMembership> {
        let membership_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO national_team_memberships (athlete_id, category, gender, bow_type, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT ON CONSTRAINT national_team_slot_key
            DO UPDATE SET is_active = TRUE, sort_order = EXCLUDED.sort_order
            RETURNING membership_id
            "#,
        )
        .bind(req.athlete_id)
        .bind(req.category)
        .bind(req.gender)
        .bind(req.bow_type)
        .bind(req.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key(e, "Athlete not found"))?;

        self.find_by_id(membership_id).await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE national_team_memberships SET is_active = FALSE WHERE membership_id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
