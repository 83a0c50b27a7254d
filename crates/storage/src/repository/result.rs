use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, map_foreign_key};
use crate::models::TournamentResult;
use crate::services::results::ScoredResult;

pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Results of a tournament, optionally narrowed to one category.
    pub async fn list(
        &self,
        tournament_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Vec<TournamentResult>> {
        let results = sqlx::query_as::<_, TournamentResult>(
            r#"
            SELECT tr.result_id, tr.tournament_category_id, tr.athlete_id,
                   a.name AS athlete_name, r.name AS region_name,
                   tr.place, tr.points, tr.score
            FROM tournament_results tr
            JOIN tournament_categories tc ON tc.tournament_category_id = tr.tournament_category_id
            JOIN athletes a ON a.athlete_id = tr.athlete_id
            LEFT JOIN regions r ON r.region_id = a.region_id
            WHERE tc.tournament_id = $1
              AND ($2::uuid IS NULL OR tr.tournament_category_id = $2)
            ORDER BY tc.category, tc.gender, tc.bow_type, tr.place
            "#,
        )
        .bind(tournament_id)
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(results)
    }

    /// Replaces every result of the category with `results` in one transaction.
    pub async fn replace(&self, category_id: Uuid, results: &[ScoredResult]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tournament_results WHERE tournament_category_id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        for result in results {
            sqlx::query(
                r#"
                INSERT INTO tournament_results (tournament_category_id, athlete_id, place, points, score)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(category_id)
            .bind(result.athlete_id)
            .bind(result.place)
            .bind(result.points)
            .bind(result.score)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_foreign_key(e, "Athlete not found"))?;
        }

        tx.commit().await?;

        Ok(results.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_division(pool: &PgPool, athletes: usize) -> (Uuid, Uuid, Vec<Uuid>) {
        let tournament_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tournaments (title, location, start_date, end_date) VALUES ('Чемпионат РК', 'Шымкент', NOW(), NOW() + INTERVAL '2 days') RETURNING tournament_id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let category_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tournament_categories (tournament_id, category, gender, bow_type) VALUES ($1, 'Juniors', 'M', 'Compound') RETURNING tournament_category_id",
        )
        .bind(tournament_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let mut athlete_ids = Vec::with_capacity(athletes);
        for i in 0..athletes {
            let athlete_id: Uuid = sqlx::query_scalar(
                "INSERT INTO athletes (slug, name, gender) VALUES ($1, $2, 'M') RETURNING athlete_id",
            )
            .bind(format!("archer-{}", i))
            .bind(format!("Лучник {}", i))
            .fetch_one(pool)
            .await
            .unwrap();
            athlete_ids.push(athlete_id);
        }

        (tournament_id, category_id, athlete_ids)
    }

    fn scored(athlete_id: Uuid, place: i32, points: i32) -> ScoredResult {
        ScoredResult {
            athlete_id,
            place,
            points,
            score: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_replace_discards_previous_results(pool: PgPool) {
        let (tournament_id, category_id, athletes) = seed_division(&pool, 3).await;
        let repo = ResultRepository::new(&pool);

        repo.replace(
            category_id,
            &[scored(athletes[0], 1, 10), scored(athletes[1], 2, 8)],
        )
        .await
        .unwrap();

        let written = repo.replace(category_id, &[scored(athletes[2], 1, 10)]).await.unwrap();
        assert_eq!(written, 1);

        let results = repo.list(tournament_id, Some(category_id)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].athlete_id, athletes[2]);
        assert_eq!(results[0].place, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_failed_replace_keeps_previous_results(pool: PgPool) {
        let (tournament_id, category_id, athletes) = seed_division(&pool, 1).await;
        let repo = ResultRepository::new(&pool);

        repo.replace(category_id, &[scored(athletes[0], 1, 10)])
            .await
            .unwrap();

        let err = repo
            .replace(category_id, &[scored(Uuid::new_v4(), 1, 10)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Athlete not found");

        let results = repo.list(tournament_id, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].athlete_id, athletes[0]);
    }
}
