use std::collections::HashMap;

use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{AgeCategory, BowType, Gender};

/// Grouping key of a ranking table.
pub type Division = (AgeCategory, Gender, BowType);

/// A result row counted towards the rankings, keyed by the tournament division it was earned in.
#[derive(Debug, Clone, FromRow)]
pub struct QualifyingResult {
    pub athlete_id: Uuid,
    pub category: AgeCategory,
    pub gender: Gender,
    pub bow_type: BowType,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedRanking {
    pub athlete_id: Uuid,
    pub category: AgeCategory,
    pub gender: Gender,
    pub bow_type: BowType,
    pub points: i32,
    pub rank: i32,
}

/// Sums points per (athlete, division) and ranks every division from 1.
///
/// Athletes with equal totals keep the order in which they first appear in
/// `results`, so callers control tie order through the input ordering.
pub fn compute_rankings(results: &[QualifyingResult]) -> Vec<ComputedRanking> {
    let mut totals: Vec<(Uuid, Division, i32)> = Vec::new();
    let mut index: HashMap<(Uuid, Division), usize> = HashMap::new();

    for result in results {
        let division = (result.category, result.gender, result.bow_type);
        match index.get(&(result.athlete_id, division)).copied() {
            Some(pos) => totals[pos].2 += result.points,
            None => {
                index.insert((result.athlete_id, division), totals.len());
                totals.push((result.athlete_id, division, result.points));
            }
        }
    }

    let mut divisions: Vec<Division> = Vec::new();
    let mut grouped: HashMap<Division, Vec<(Uuid, i32)>> = HashMap::new();
    for (athlete_id, division, points) in totals {
        grouped
            .entry(division)
            .or_insert_with(|| {
                divisions.push(division);
                Vec::new()
            })
            .push((athlete_id, points));
    }

    let mut rankings = Vec::new();
    for division in divisions {
        let Some(mut entries) = grouped.remove(&division) else {
            continue;
        };
        // sort_by is stable
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        let (category, gender, bow_type) = division;
        rankings.extend(entries.into_iter().enumerate().map(|(i, (athlete_id, points))| {
            ComputedRanking {
                athlete_id,
                category,
                gender,
                bow_type,
                points,
                rank: i32::try_from(i + 1).unwrap_or(i32::MAX),
            }
        }));
    }

    rankings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(athlete_id: Uuid, category: AgeCategory, points: i32) -> QualifyingResult {
        QualifyingResult {
            athlete_id,
            category,
            gender: Gender::Male,
            bow_type: BowType::Recurve,
            points,
        }
    }

    #[test]
    fn test_points_are_summed_per_division() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let rankings = compute_rankings(&[
            result(a, AgeCategory::Adults, 90),
            result(b, AgeCategory::Adults, 100),
            result(a, AgeCategory::Adults, 100),
            result(a, AgeCategory::Youth, 70),
        ]);

        let adults: Vec<_> = rankings
            .iter()
            .filter(|r| r.category == AgeCategory::Adults)
            .collect();
        assert_eq!(adults.len(), 2);
        assert_eq!((adults[0].athlete_id, adults[0].points, adults[0].rank), (a, 190, 1));
        assert_eq!((adults[1].athlete_id, adults[1].points, adults[1].rank), (b, 100, 2));

        let youth: Vec<_> = rankings
            .iter()
            .filter(|r| r.category == AgeCategory::Youth)
            .collect();
        assert_eq!(youth.len(), 1);
        assert_eq!((youth[0].athlete_id, youth[0].points, youth[0].rank), (a, 70, 1));
    }

    #[test]
    fn test_ranks_have_no_gaps() {
        let athletes: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
        let input: Vec<_> = athletes
            .iter()
            .zip([30, 100, 60, 60, 5, 90])
            .map(|(id, pts)| result(*id, AgeCategory::Adults, pts))
            .collect();

        let rankings = compute_rankings(&input);
        let ranks: Vec<i32> = rankings.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);

        let points: Vec<i32> = rankings.iter().map(|r| r.points).collect();
        assert!(points.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let rankings = compute_rankings(&[
            result(first, AgeCategory::Adults, 80),
            result(second, AgeCategory::Adults, 80),
        ]);

        assert_eq!(rankings[0].athlete_id, first);
        assert_eq!(rankings[0].rank, 1);
        assert_eq!(rankings[1].athlete_id, second);
        assert_eq!(rankings[1].rank, 2);
    }

    #[test]
    fn test_gender_and_type_split_divisions() {
        let a = Uuid::new_v4();
        let mut female = result(a, AgeCategory::Adults, 50);
        female.gender = Gender::Female;
        let mut compound = result(a, AgeCategory::Adults, 40);
        compound.bow_type = BowType::Compound;

        let rankings = compute_rankings(&[female, compound]);
        assert_eq!(rankings.len(), 2);
        assert!(rankings.iter().all(|r| r.rank == 1));
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_rankings(&[]).is_empty());
    }
}
