use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AgeCategory, BowType, Gender};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub title: String,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub location: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_registration_open: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub organizing_region_id: Option<Uuid>,
    pub is_featured: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl Tournament {
    pub fn status_at(&self, now: DateTime<Utc>) -> TournamentStatus {
        TournamentStatus::derive(
            self.start_date,
            self.end_date,
            self.is_registration_open,
            self.registration_deadline,
            now,
        )
    }
}

/// One (age category, gender, bow type) division of a tournament.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TournamentCategory {
    pub tournament_category_id: Uuid,
    pub tournament_id: Uuid,
    pub category: AgeCategory,
    pub gender: Gender,
    pub bow_type: BowType,
}

impl TournamentCategory {
    pub fn label(&self) -> String {
        format!(
            "{} {} - {}",
            self.category.as_str(),
            self.gender.code(),
            self.bow_type.as_str()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Completed,
}

impl TournamentStatus {
    /// Classifies a tournament at `now`.
    ///
    /// Completion wins over everything, then the running window; only a tournament
    /// that has not started looks at the registration flag and deadline.
    pub fn derive(
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        is_registration_open: bool,
        registration_deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        if now > end_date {
            return Self::Completed;
        }

        if now >= start_date {
            return Self::InProgress;
        }

        let deadline_passed = registration_deadline.is_some_and(|deadline| now > deadline);

        if is_registration_open && !deadline_passed {
            Self::RegistrationOpen
        } else {
            Self::RegistrationClosed
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "registration_open" | "upcoming" => Some(Self::RegistrationOpen),
            "registration_closed" => Some(Self::RegistrationClosed),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_completed_takes_precedence() {
        let now = now();
        let status = TournamentStatus::derive(
            now - Duration::days(10),
            now - Duration::days(8),
            true,
            None,
            now,
        );
        assert_eq!(status, TournamentStatus::Completed);
    }

    #[test]
    fn test_in_progress_ignores_registration_flags() {
        let now = now();
        for open in [true, false] {
            for deadline in [None, Some(now + Duration::days(1)), Some(now - Duration::days(1))] {
                let status = TournamentStatus::derive(
                    now - Duration::hours(1),
                    now + Duration::days(2),
                    open,
                    deadline,
                    now,
                );
                assert_eq!(status, TournamentStatus::InProgress);
            }
        }
    }

    #[test]
    fn test_boundaries_are_inclusive_for_in_progress() {
        let now = now();
        assert_eq!(
            TournamentStatus::derive(now, now + Duration::days(1), true, None, now),
            TournamentStatus::InProgress
        );
        assert_eq!(
            TournamentStatus::derive(now - Duration::days(1), now, true, None, now),
            TournamentStatus::InProgress
        );
    }

    #[test]
    fn test_open_before_start() {
        let now = now();
        let start = now + Duration::days(5);
        let end = now + Duration::days(7);

        assert_eq!(
            TournamentStatus::derive(start, end, true, None, now),
            TournamentStatus::RegistrationOpen
        );
        assert_eq!(
            TournamentStatus::derive(start, end, true, Some(now), now),
            TournamentStatus::RegistrationOpen
        );
        assert_eq!(
            TournamentStatus::derive(start, end, true, Some(now + Duration::days(1)), now),
            TournamentStatus::RegistrationOpen
        );
    }

    #[test]
    fn test_closed_before_start() {
        let now = now();
        let start = now + Duration::days(5);
        let end = now + Duration::days(7);

        assert_eq!(
            TournamentStatus::derive(start, end, false, None, now),
            TournamentStatus::RegistrationClosed
        );
        assert_eq!(
            TournamentStatus::derive(start, end, true, Some(now - Duration::seconds(1)), now),
            TournamentStatus::RegistrationClosed
        );
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(
            TournamentStatus::parse("REGISTRATION_OPEN"),
            Some(TournamentStatus::RegistrationOpen)
        );
        assert_eq!(
            TournamentStatus::parse("upcoming"),
            Some(TournamentStatus::RegistrationOpen)
        );
        assert_eq!(
            TournamentStatus::parse("in_progress"),
            Some(TournamentStatus::InProgress)
        );
        assert_eq!(TournamentStatus::parse("later"), None);
    }
}
