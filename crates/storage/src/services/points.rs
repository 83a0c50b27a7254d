use crate::models::AgeCategory;

const ADULT_POINTS: [i32; 8] = [100, 90, 80, 70, 60, 50, 40, 30];
const JUNIOR_POINTS: [i32; 8] = [70, 60, 50, 40, 30, 20, 10, 5];

/// Ranking points awarded for finishing at `place` in a division of `category`.
/// Places outside 1..=8 score nothing.
pub fn points_for_place(place: i32, category: AgeCategory) -> i32 {
    let table = match category {
        AgeCategory::Adults => &ADULT_POINTS,
        AgeCategory::Youth | AgeCategory::Juniors | AgeCategory::Cadets | AgeCategory::Cubs => {
            &JUNIOR_POINTS
        }
    };

    usize::try_from(place)
        .ok()
        .and_then(|p| p.checked_sub(1))
        .and_then(|idx| table.get(idx))
        .copied()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adult_table() {
        let points: Vec<i32> = (1..=8)
            .map(|place| points_for_place(place, AgeCategory::Adults))
            .collect();
        assert_eq!(points, vec![100, 90, 80, 70, 60, 50, 40, 30]);
    }

    #[test]
    fn test_every_other_category_uses_junior_table() {
        for category in [
            AgeCategory::Youth,
            AgeCategory::Juniors,
            AgeCategory::Cadets,
            AgeCategory::Cubs,
        ] {
            assert_eq!(points_for_place(1, category), 70);
            assert_eq!(points_for_place(2, category), 60);
            assert_eq!(points_for_place(8, category), 5);
        }
    }

    #[test]
    fn test_out_of_table_places_score_zero() {
        assert_eq!(points_for_place(9, AgeCategory::Adults), 0);
        assert_eq!(points_for_place(0, AgeCategory::Adults), 0);
        assert_eq!(points_for_place(-3, AgeCategory::Youth), 0);
    }
}
