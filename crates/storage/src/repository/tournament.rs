use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::tournament::{
    CreateTournamentRequest, DivisionInput, TournamentFilter, UpdateTournamentRequest,
    validate_schedule,
};
use crate::error::{Result, StorageError};
use crate::models::{Tournament, TournamentCategory, TournamentStatus};

pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &TournamentFilter,
        status: Option<TournamentStatus>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Tournament>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tournaments t WHERE 1=1");
        push_filters(&mut count, filter, status, now);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT t.* FROM tournaments t WHERE 1=1");
        push_filters(&mut query, filter, status, now);
        query.push(" ORDER BY t.start_date DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let tournaments = query
            .build_query_as::<Tournament>()
            .fetch_all(self.pool)
            .await?;

        Ok((tournaments, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Tournament> {
        sqlx::query_as::<_, Tournament>("SELECT * FROM tournaments WHERE tournament_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn featured(&self) -> Result<Option<Tournament>> {
        let tournament = sqlx::query_as::<_, Tournament>(
            "SELECT * FROM tournaments WHERE is_featured ORDER BY start_date DESC LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(tournament)
    }

    pub async fn categories(&self, tournament_id: Uuid) -> Result<Vec<TournamentCategory>> {
        let categories = sqlx::query_as::<_, TournamentCategory>(
            r#"
            SELECT * FROM tournament_categories
            WHERE tournament_id = $1
            ORDER BY category, gender, bow_type
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Categories of several tournaments in one round trip.
    pub async fn categories_for(&self, tournament_ids: &[Uuid]) -> Result<Vec<TournamentCategory>> {
        let categories = sqlx::query_as::<_, TournamentCategory>(
            r#"
            SELECT * FROM tournament_categories
            WHERE tournament_id = ANY($1)
            ORDER BY category, gender, bow_type
            "#,
        )
        .bind(tournament_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// A category together with its parent tournament, if the id resolves.
    pub async fn find_category(
        &self,
        category_id: Uuid,
    ) -> Result<Option<(TournamentCategory, Tournament)>> {
        let category = sqlx::query_as::<_, TournamentCategory>(
            "SELECT * FROM tournament_categories WHERE tournament_category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(category) = category else {
            return Ok(None);
        };

        let tournament = self.find_by_id(category.tournament_id).await?;
        Ok(Some((category, tournament)))
    }

    pub async fn create(&self, req: &CreateTournamentRequest) -> Result<Tournament> {
        let mut tx = self.pool.begin().await?;

        if req.is_featured {
            unset_featured(&mut tx, None).await?;
        }

        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            INSERT INTO tournaments (
                title, title_kk, title_en, description, location, start_date, end_date,
                is_registration_open, registration_deadline, organizing_region_id, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.title_kk)
        .bind(&req.title_en)
        .bind(&req.description)
        .bind(&req.location)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_registration_open)
        .bind(req.registration_deadline)
        .bind(req.organizing_region_id)
        .bind(req.is_featured)
        .fetch_one(&mut *tx)
        .await?;

        reconcile_categories(&mut tx, tournament.tournament_id, &req.categories).await?;

        tx.commit().await?;

        Ok(tournament)
    }

    pub async fn update(&self, existing: &Tournament, req: &UpdateTournamentRequest) -> Result<Tournament> {
        let start_date = req.start_date.unwrap_or(existing.start_date);
        let end_date = req.end_date.unwrap_or(existing.end_date);
        validate_schedule(start_date, end_date).map_err(StorageError::validation)?;

        let is_featured = req.is_featured.unwrap_or(existing.is_featured);

        let mut tx = self.pool.begin().await?;

        if is_featured {
            unset_featured(&mut tx, Some(existing.tournament_id)).await?;
        }

        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            UPDATE tournaments
            SET title = $2, title_kk = $3, title_en = $4, description = $5, location = $6,
                start_date = $7, end_date = $8, is_registration_open = $9,
                registration_deadline = $10, organizing_region_id = $11, is_featured = $12
            WHERE tournament_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.tournament_id)
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.title_kk.as_ref().or(existing.title_kk.as_ref()))
        .bind(req.title_en.as_ref().or(existing.title_en.as_ref()))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.location.as_ref().unwrap_or(&existing.location))
        .bind(start_date)
        .bind(end_date)
        .bind(req.is_registration_open.unwrap_or(existing.is_registration_open))
        .bind(req.registration_deadline.or(existing.registration_deadline))
        .bind(req.organizing_region_id.or(existing.organizing_region_id))
        .bind(is_featured)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        if let Some(categories) = &req.categories {
            reconcile_categories(&mut tx, tournament.tournament_id, categories).await?;
        }

        tx.commit().await?;

        Ok(tournament)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tournaments WHERE tournament_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

/// Mirrors `TournamentStatus::derive` so status filters run in the database.
fn push_status(query: &mut QueryBuilder<'_, Postgres>, status: TournamentStatus, now: DateTime<Utc>) {
    match status {
        TournamentStatus::Completed => {
            query.push(" AND t.end_date < ");
            query.push_bind(now);
        }
        TournamentStatus::InProgress => {
            query.push(" AND t.start_date <= ");
            query.push_bind(now);
            query.push(" AND t.end_date >= ");
            query.push_bind(now);
        }
        TournamentStatus::RegistrationOpen | TournamentStatus::RegistrationClosed => {
            query.push(" AND t.start_date > ");
            query.push_bind(now);
            if status == TournamentStatus::RegistrationOpen {
                query.push(" AND ");
            } else {
                query.push(" AND NOT ");
            }
            query.push("(t.is_registration_open AND (t.registration_deadline IS NULL OR t.registration_deadline >= ");
            query.push_bind(now);
            query.push("))");
        }
    }
}

fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &TournamentFilter,
    status: Option<TournamentStatus>,
    now: DateTime<Utc>,
) {
    if let Some(status) = status {
        push_status(query, status, now);
    }

    if filter.category.is_none() && filter.gender.is_none() && filter.bow_type.is_none() {
        return;
    }

    query.push(
        " AND EXISTS (SELECT 1 FROM tournament_categories tc WHERE tc.tournament_id = t.tournament_id",
    );
    if let Some(category) = filter.category {
        query.push(" AND tc.category = ");
        query.push_bind(category);
    }
    if let Some(gender) = filter.gender {
        query.push(" AND tc.gender = ");
        query.push_bind(gender);
    }
    if let Some(bow_type) = filter.bow_type {
        query.push(" AND tc.bow_type = ");
        query.push_bind(bow_type);
    }
    query.push(")");
}

async fn unset_featured(conn: &mut PgConnection, keep: Option<Uuid>) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE tournaments SET is_featured = FALSE
        WHERE is_featured AND ($1::uuid IS NULL OR tournament_id <> $1)
        "#,
    )
    .bind(keep)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Brings the tournament's divisions in line with `desired`.
///
/// Existing divisions keep their ids; removed divisions are deleted unless a
/// registration already references them.
async fn reconcile_categories(
    conn: &mut PgConnection,
    tournament_id: Uuid,
    desired: &[DivisionInput],
) -> Result<()> {
    let existing = sqlx::query_as::<_, TournamentCategory>(
        "SELECT * FROM tournament_categories WHERE tournament_id = $1",
    )
    .bind(tournament_id)
    .fetch_all(&mut *conn)
    .await?;

    for category in &existing {
        let still_wanted = desired.iter().any(|d| {
            d.category == category.category
                && d.gender == category.gender
                && d.bow_type == category.bow_type
        });
        if still_wanted {
            continue;
        }

        sqlx::query(
            r#"
            DELETE FROM tournament_categories tc
            WHERE tc.tournament_category_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM registrations r
                  WHERE r.tournament_category_id = tc.tournament_category_id
              )
            "#,
        )
        .bind(category.tournament_category_id)
        .execute(&mut *conn)
        .await?;
    }

    for division in desired {
        sqlx::query(
            r#"
            INSERT INTO tournament_categories (tournament_id, category, gender, bow_type)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT tournament_categories_division_key DO NOTHING
            "#,
        )
        .bind(tournament_id)
        .bind(division.category)
        .bind(division.gender)
        .bind(division.bow_type)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
