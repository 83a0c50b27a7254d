use chrono::{DateTime, Datelike, Utc};
use sqlx::PgPool;
use storage::{
    dto::ranking::{RankingFilter, RankingRow},
    error::Result,
    repository::ranking::RankingRepository,
};

pub async fn list_rankings(pool: &PgPool, filter: &RankingFilter) -> Result<(Vec<RankingRow>, i64)> {
    RankingRepository::new(pool).list(filter).await
}

/// Season to recompute; defaults to the current calendar year.
pub fn season(requested: Option<i32>, now: DateTime<Utc>) -> i32 {
    requested.unwrap_or_else(|| now.year())
}

pub async fn recalculate(pool: &PgPool, year: i32, now: DateTime<Utc>) -> Result<usize> {
    RankingRepository::new(pool).recompute(year, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_season_defaults_to_current_year() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(season(None, now), 2025);
        assert_eq!(season(Some(2023), now), 2023);
    }
}
