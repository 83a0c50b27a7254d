use chrono::{DateTime, TimeZone, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::ranking::{RankingFilter, RankingRow};
use crate::error::{Result, StorageError};
use crate::services::ranking_computation::{QualifyingResult, compute_rankings};

pub struct RankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RankingFilter) -> Result<(Vec<RankingRow>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ranking_entries re WHERE 1=1");
        push_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT re.ranking_entry_id, re.athlete_id, a.name AS athlete_name, a.slug AS athlete_slug,
                   r.name AS region_name, re.category, re.gender, re.bow_type, re.points, re.rank
            FROM ranking_entries re
            JOIN athletes a ON a.athlete_id = re.athlete_id
            LEFT JOIN regions r ON r.region_id = a.region_id
            WHERE 1=1
            "#,
        );
        push_filters(&mut query, filter);
        query.push(" ORDER BY re.rank ASC, re.points DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let rows = query.build_query_as::<RankingRow>().fetch_all(self.pool).await?;

        Ok((rows, total))
    }

    /// Recomputes points and ranks from the results of tournaments held in `year`
    /// that had already ended at `now`. Returns the number of entries written.
    ///
    /// Entries of athletes without qualifying results are not touched.
    pub async fn recompute(&self, year: i32, now: DateTime<Utc>) -> Result<usize> {
        let (from, until) = year_bounds(year)?;

        let mut tx = self.pool.begin().await?;

        let results = sqlx::query_as::<_, QualifyingResult>(
            r#"
            SELECT tr.athlete_id, tc.category, tc.gender, tc.bow_type, tr.points
            FROM tournament_results tr
            JOIN tournament_categories tc ON tc.tournament_category_id = tr.tournament_category_id
            JOIN tournaments t ON t.tournament_id = tc.tournament_id
            WHERE t.start_date >= $1 AND t.start_date < $2 AND t.end_date < $3
            ORDER BY t.start_date, tr.created_at, tr.place
            "#,
        )
        .bind(from)
        .bind(until)
        .bind(now)
        .fetch_all(&mut *tx)
        .await?;

        let rankings = compute_rankings(&results);

        for entry in &rankings {
            sqlx::query(
                r#"
                INSERT INTO ranking_entries (athlete_id, category, gender, bow_type, points, rank, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                ON CONFLICT ON CONSTRAINT ranking_entries_division_key
                DO UPDATE SET points = EXCLUDED.points, rank = EXCLUDED.rank, updated_at = NOW()
                "#,
            )
            .bind(entry.athlete_id)
            .bind(entry.category)
            .bind(entry.gender)
            .bind(entry.bow_type)
            .bind(entry.points)
            .bind(entry.rank)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(rankings.len())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &RankingFilter) {
    if let Some(bow_type) = filter.bow_type {
        query.push(" AND re.bow_type = ");
        query.push_bind(bow_type);
    }
    if let Some(gender) = filter.gender {
        query.push(" AND re.gender = ");
        query.push_bind(gender);
    }
    if let Some(category) = filter.category {
        query.push(" AND re.category = ");
        query.push_bind(category);
    }
}

/// Half-open UTC range covering the calendar year.
fn year_bounds(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    let end = year
        .checked_add(1)
        .and_then(|next| Utc.with_ymd_and_hms(next, 1, 1, 0, 0, 0).single());

    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(StorageError::validation(format!("Invalid year {}", year))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_year_bounds() {
        let (from, until) = year_bounds(2024).unwrap();
        assert_eq!((from.year(), from.month(), from.day()), (2024, 1, 1));
        assert_eq!((until.year(), until.month(), until.day()), (2025, 1, 1));
    }

    #[test]
    fn test_year_bounds_rejects_out_of_range() {
        assert!(year_bounds(i32::MAX).is_err());
    }
}
