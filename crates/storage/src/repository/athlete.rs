use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::athlete::{
    AthleteDetailResponse, CreateAthleteRequest, RegistryFilter, UpdateAthleteRequest,
};
use crate::error::{Result, StorageError, map_foreign_key};
use crate::models::{Athlete, AthleteCoach, RankingEntry};
use crate::services::slug::{slugify, with_suffix};

const IIN_TAKEN: &str = "Athlete with this IIN already exists";
const SLUG_TAKEN: &str = "Another athlete with this name was saved at the same time, please retry";

pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Filtered page of athletes plus the total number of matches.
    pub async fn list(
        &self,
        filter: &RegistryFilter,
        region_id: Option<Uuid>,
    ) -> Result<(Vec<Athlete>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM athletes WHERE 1=1");
        push_filters(&mut count, filter, region_id);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM athletes WHERE 1=1");
        push_filters(&mut query, filter, region_id);
        query.push(" ORDER BY sort_order, name LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let athletes = query
            .build_query_as::<Athlete>()
            .fetch_all(self.pool)
            .await?;

        Ok((athletes, total))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Athlete> {
        sqlx::query_as::<_, Athlete>("SELECT * FROM athletes WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        sqlx::query_as::<_, Athlete>("SELECT * FROM athletes WHERE athlete_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn coaches(&self, athlete_id: Uuid) -> Result<Vec<AthleteCoach>> {
        let coaches = sqlx::query_as::<_, AthleteCoach>(
            r#"
            SELECT ac.athlete_id, ac.coach_id, c.name AS coach_name, ac.is_primary
            FROM athlete_coaches ac
            JOIN coaches c ON c.coach_id = ac.coach_id
            WHERE ac.athlete_id = $1
            ORDER BY ac.is_primary DESC, c.name
            "#,
        )
        .bind(athlete_id)
        .fetch_all(self.pool)
        .await?;

        Ok(coaches)
    }

    pub async fn rankings(&self, athlete_id: Uuid) -> Result<Vec<RankingEntry>> {
        let rankings = sqlx::query_as::<_, RankingEntry>(
            r#"
            SELECT * FROM ranking_entries
            WHERE athlete_id = $1
            ORDER BY category, gender, bow_type
            "#,
        )
        .bind(athlete_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rankings)
    }

    pub async fn find_by_slug_detailed(&self, slug: &str) -> Result<AthleteDetailResponse> {
        let athlete = self.find_by_slug(slug).await?;
        let coaches = self.coaches(athlete.athlete_id).await?;
        let rankings = self.rankings(athlete.athlete_id).await?;

        Ok(AthleteDetailResponse {
            athlete,
            coaches,
            rankings,
        })
    }

    /// Creates the athlete and its coach links; `region_id` is already scoped to the caller.
    pub async fn create(&self, req: &CreateAthleteRequest, region_id: Option<Uuid>) -> Result<Athlete> {
        let mut tx = self.pool.begin().await?;

        let slug = unique_slug(&mut tx, &req.name, None).await?;

        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            INSERT INTO athletes (
                slug, name, name_kk, name_en, iin, dob, gender, region_id, is_active, sort_order,
                sports_rank, medical_status, medical_certificate_date, insurance_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&slug)
        .bind(&req.name)
        .bind(&req.name_kk)
        .bind(&req.name_en)
        .bind(&req.iin)
        .bind(req.dob)
        .bind(req.gender)
        .bind(region_id)
        .bind(req.is_active)
        .bind(req.sort_order)
        .bind(&req.sports_rank)
        .bind(&req.medical_status)
        .bind(req.medical_certificate_date)
        .bind(&req.insurance_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(athlete_conflict)?;

        replace_coach_links(&mut tx, athlete.athlete_id, &req.coach_ids).await?;

        tx.commit().await?;

        Ok(athlete)
    }

    pub async fn update(&self, existing: &Athlete, req: &UpdateAthleteRequest) -> Result<Athlete> {
        let mut tx = self.pool.begin().await?;

        let name = req.name.as_ref().unwrap_or(&existing.name);
        let slug = if name != &existing.name {
            unique_slug(&mut tx, name, Some(existing.athlete_id)).await?
        } else {
            existing.slug.clone()
        };

        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            UPDATE athletes
            SET slug = $2, name = $3, name_kk = $4, name_en = $5, iin = $6, dob = $7,
                gender = $8, region_id = $9, is_active = $10, sort_order = $11,
                sports_rank = $12, medical_status = $13, medical_certificate_date = $14,
                insurance_number = $15
            WHERE athlete_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.athlete_id)
        .bind(&slug)
        .bind(name)
        .bind(req.name_kk.as_ref().or(existing.name_kk.as_ref()))
        .bind(req.name_en.as_ref().or(existing.name_en.as_ref()))
        .bind(req.iin.as_ref().or(existing.iin.as_ref()))
        .bind(req.dob.or(existing.dob))
        .bind(req.gender.unwrap_or(existing.gender))
        .bind(req.region_id.or(existing.region_id))
        .bind(req.is_active.unwrap_or(existing.is_active))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.sports_rank.as_ref().or(existing.sports_rank.as_ref()))
        .bind(req.medical_status.as_ref().or(existing.medical_status.as_ref()))
        .bind(req.medical_certificate_date.or(existing.medical_certificate_date))
        .bind(req.insurance_number.as_ref().or(existing.insurance_number.as_ref()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(athlete_conflict)?
        .ok_or(StorageError::NotFound)?;

        if let Some(coach_ids) = &req.coach_ids {
            replace_coach_links(&mut tx, athlete.athlete_id, coach_ids).await?;
        }

        tx.commit().await?;

        Ok(athlete)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM athletes WHERE athlete_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| map_foreign_key(e, "Athlete is part of a registration"))?;

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

    if let Some(gender) = filter.gender {
        query.push(" AND gender = ");
        query.push_bind(gender);
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }
}

/// Turns unique violations on the IIN or slug into conflicts.
///
/// The slug is picked before the insert, so two concurrent saves of the same name
/// can still collide on `athletes_slug_key`.
pub(crate) fn athlete_conflict(error: sqlx::Error) -> StorageError {
    let error = StorageError::from(error);
    let message = match error.constraint_name() {
        Some("athletes_iin_key") => IIN_TAKEN,
        Some("athletes_slug_key") => SLUG_TAKEN,
        _ => return error,
    };

    if error.is_unique_violation() {
        StorageError::ConstraintViolation(message.to_string())
    } else {
        error
    }
}

/// First free slug derived from `name`, ignoring the row `own_id` when renaming.
pub(crate) async fn unique_slug(
    conn: &mut PgConnection,
    name: &str,
    own_id: Option<Uuid>,
) -> Result<String> {
    let base = slugify(name, "athlete");
    let mut attempt = 1;

    loop {
        let candidate = with_suffix(&base, attempt);
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM athletes
                WHERE slug = $1 AND ($2::uuid IS NULL OR athlete_id <> $2)
            )
            "#,
        )
        .bind(&candidate)
        .bind(own_id)
        .fetch_one(&mut *conn)
        .await?;

        if !taken {
            return Ok(candidate);
        }
        attempt += 1;
    }
}

/// Replaces the athlete's coach links; the first coach in `coach_ids` is primary.
async fn replace_coach_links(
    conn: &mut PgConnection,
    athlete_id: Uuid,
    coach_ids: &[Uuid],
) -> Result<()> {
    sqlx::query("DELETE FROM athlete_coaches WHERE athlete_id = $1")
        .bind(athlete_id)
        .execute(&mut *conn)
        .await?;

    for (position, coach_id) in coach_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO athlete_coaches (athlete_id, coach_id, is_primary)
            VALUES ($1, $2, $3)
            ON CONFLICT (athlete_id, coach_id) DO NOTHING
            "#,
        )
        .bind(athlete_id)
        .bind(coach_id)
        .bind(position == 0)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_foreign_key(e, "Coach not found"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert_with_slug(pool: &PgPool, slug: &str, iin: Option<&str>) -> Result<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO athletes (slug, name, iin, gender) VALUES ($1, 'Аружан', $2, 'F') RETURNING athlete_id",
        )
        .bind(slug)
        .bind(iin)
        .fetch_one(pool)
        .await
        .map_err(athlete_conflict)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_slug_collision_is_a_conflict(pool: PgPool) {
        insert_with_slug(&pool, "aruzhan", None).await.unwrap();

        let err = insert_with_slug(&pool, "aruzhan", None).await.unwrap_err();

        assert!(matches!(&err, StorageError::ConstraintViolation(msg) if msg == SLUG_TAKEN));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_iin_collision_is_a_conflict(pool: PgPool) {
        insert_with_slug(&pool, "aruzhan", Some("990101400123")).await.unwrap();

        let err = insert_with_slug(&pool, "aruzhan-2", Some("990101400123"))
            .await
            .unwrap_err();

        assert!(matches!(&err, StorageError::ConstraintViolation(msg) if msg == IIN_TAKEN));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unique_slug_skips_taken_candidates(pool: PgPool) {
        insert_with_slug(&pool, "aruzhan", None).await.unwrap();
        insert_with_slug(&pool, "aruzhan-2", None).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let slug = unique_slug(&mut conn, "Aruzhan", None).await.unwrap();

        assert_eq!(slug, "aruzhan-3");
    }
}
