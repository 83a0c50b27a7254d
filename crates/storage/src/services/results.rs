use std::collections::HashSet;

use uuid::Uuid;

use super::points::points_for_place;
use crate::dto::result::ResultInput;
use crate::error::{Result, StorageError};
use crate::models::AgeCategory;

/// Result row ready to insert, with points taken from the place table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredResult {
    pub athlete_id: Uuid,
    pub place: i32,
    pub points: i32,
    pub score: Option<i32>,
}

/// Validates a full result set for one division and assigns points.
///
/// Client-supplied points are discarded.
pub fn score_results(category: AgeCategory, results: &[ResultInput]) -> Result<Vec<ScoredResult>> {
    let mut places = HashSet::new();
    let mut athletes = HashSet::new();

    for result in results {
        if result.place < 1 {
            return Err(StorageError::validation("Place must be a positive number"));
        }
        if !places.insert(result.place) {
            return Err(StorageError::validation(format!(
                "Duplicate place {} in results",
                result.place
            )));
        }
        if !athletes.insert(result.athlete_id) {
            return Err(StorageError::validation("Duplicate athlete in results"));
        }
    }

    Ok(results
        .iter()
        .map(|r| ScoredResult {
            athlete_id: r.athlete_id,
            place: r.place,
            points: points_for_place(r.place, category),
            score: r.score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(athlete_id: Uuid, place: i32) -> ResultInput {
        ResultInput {
            athlete_id,
            place,
            score: None,
            points: Some(999),
        }
    }

    #[test]
    fn test_points_follow_category_table() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let batch = [input(a, 1), input(b, 2)];

        let adults: Vec<i32> = score_results(AgeCategory::Adults, &batch)
            .unwrap()
            .iter()
            .map(|r| r.points)
            .collect();
        assert_eq!(adults, vec![100, 90]);

        let youth: Vec<i32> = score_results(AgeCategory::Youth, &batch)
            .unwrap()
            .iter()
            .map(|r| r.points)
            .collect();
        assert_eq!(youth, vec![70, 60]);
    }

    #[test]
    fn test_rejects_duplicates() {
        let a = Uuid::new_v4();
        assert!(score_results(AgeCategory::Adults, &[input(a, 1), input(Uuid::new_v4(), 1)]).is_err());
        assert!(score_results(AgeCategory::Adults, &[input(a, 1), input(a, 2)]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_place() {
        assert!(score_results(AgeCategory::Cadets, &[input(Uuid::new_v4(), 0)]).is_err());
    }

    #[test]
    fn test_places_beyond_table_score_zero() {
        let scored = score_results(AgeCategory::Adults, &[input(Uuid::new_v4(), 12)]).unwrap();
        assert_eq!(scored[0].points, 0);
        assert_eq!(scored[0].place, 12);
    }

    #[test]
    fn test_empty_batch_clears_results() {
        assert!(score_results(AgeCategory::Adults, &[]).unwrap().is_empty());
    }
}
