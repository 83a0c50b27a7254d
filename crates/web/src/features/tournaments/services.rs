use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::{
        result::SubmitResultsRequest,
        tournament::{
            CreateTournamentRequest, TournamentFilter, TournamentResponse, UpdateTournamentRequest,
        },
    },
    error::{Result, StorageError},
    models::{TournamentCategory, TournamentResult, TournamentStatus},
    repository::{result::ResultRepository, tournament::TournamentRepository},
    services::results::score_results,
};
use uuid::Uuid;

pub async fn list_tournaments(
    pool: &PgPool,
    filter: &TournamentFilter,
    status: Option<TournamentStatus>,
    now: DateTime<Utc>,
) -> Result<(Vec<TournamentResponse>, i64)> {
    let repo = TournamentRepository::new(pool);
    let (tournaments, total) = repo.list(filter, status, now).await?;

    let ids: Vec<Uuid> = tournaments.iter().map(|t| t.tournament_id).collect();
    let mut by_tournament = group_categories(repo.categories_for(&ids).await?);

    let responses = tournaments
        .into_iter()
        .map(|t| {
            let categories = by_tournament.remove(&t.tournament_id).unwrap_or_default();
            TournamentResponse::new(t, categories, now)
        })
        .collect();

    Ok((responses, total))
}

fn group_categories(categories: Vec<TournamentCategory>) -> HashMap<Uuid, Vec<TournamentCategory>> {
    let mut grouped: HashMap<Uuid, Vec<TournamentCategory>> = HashMap::new();
    for category in categories {
        grouped.entry(category.tournament_id).or_default().push(category);
    }
    grouped
}

pub async fn get_tournament(pool: &PgPool, id: Uuid, now: DateTime<Utc>) -> Result<TournamentResponse> {
    let repo = TournamentRepository::new(pool);
    let tournament = repo.find_by_id(id).await?;
    let categories = repo.categories(id).await?;

    Ok(TournamentResponse::new(tournament, categories, now))
}

pub async fn get_featured(pool: &PgPool, now: DateTime<Utc>) -> Result<Option<TournamentResponse>> {
    let repo = TournamentRepository::new(pool);
    let Some(tournament) = repo.featured().await? else {
        return Ok(None);
    };
    let categories = repo.categories(tournament.tournament_id).await?;

    Ok(Some(TournamentResponse::new(tournament, categories, now)))
}

pub async fn create_tournament(
    pool: &PgPool,
    req: &CreateTournamentRequest,
    now: DateTime<Utc>,
) -> Result<TournamentResponse> {
    let tournament = TournamentRepository::new(pool).create(req).await?;
    get_tournament(pool, tournament.tournament_id, now).await
}

pub async fn update_tournament(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateTournamentRequest,
    now: DateTime<Utc>,
) -> Result<TournamentResponse> {
    let repo = TournamentRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await?;
    get_tournament(pool, id, now).await
}

pub async fn delete_tournament(pool: &PgPool, id: Uuid) -> Result<()> {
    TournamentRepository::new(pool).delete(id).await
}

pub async fn list_results(
    pool: &PgPool,
    tournament_id: Uuid,
    category_id: Option<Uuid>,
) -> Result<Vec<TournamentResult>> {
    TournamentRepository::new(pool).find_by_id(tournament_id).await?;
    ResultRepository::new(pool).list(tournament_id, category_id).await
}

/// Replaces the division's results; points come from the place table only.
pub async fn submit_results(
    pool: &PgPool,
    tournament_id: Uuid,
    req: &SubmitResultsRequest,
) -> Result<usize> {
    let (category, _) = TournamentRepository::new(pool)
        .find_category(req.category_id)
        .await?
        .filter(|(category, _)| category.tournament_id == tournament_id)
        .ok_or(StorageError::NotFound)?;

    let scored = score_results(category.category, &req.results)?;

    ResultRepository::new(pool)
        .replace(category.tournament_category_id, &scored)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::{AgeCategory, BowType, Gender};

    fn category(tournament_id: Uuid, gender: Gender) -> TournamentCategory {
        TournamentCategory {
            tournament_category_id: Uuid::new_v4(),
            tournament_id,
            category: AgeCategory::Adults,
            gender,
            bow_type: BowType::Recurve,
        }
    }

    #[test]
    fn test_categories_grouped_per_tournament() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let grouped = group_categories(vec![
            category(first, Gender::Male),
            category(second, Gender::Male),
            category(first, Gender::Female),
        ]);

        assert_eq!(grouped[&first].len(), 2);
        assert_eq!(grouped[&first][1].gender, Gender::Female);
        assert_eq!(grouped[&second].len(), 1);
    }
}
