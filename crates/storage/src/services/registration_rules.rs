use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::dto::registration::SubmitRegistrationRequest;
use crate::error::{Result, StorageError};
use crate::models::{ActorContext, Registration, RegistrationStatus, Role, Tournament};

const HOST_REGION_QUOTA: usize = 6;
const DEFAULT_QUOTA: usize = 4;
const MAX_SEQUENCE: i32 = 9999;

/// Maximum roster size for `region_id` in a tournament; the organizing region gets more slots.
pub fn participant_quota(region_id: Uuid, organizing_region_id: Option<Uuid>) -> usize {
    if organizing_region_id == Some(region_id) {
        HOST_REGION_QUOTA
    } else {
        DEFAULT_QUOTA
    }
}

pub fn check_registration_window(tournament: &Tournament, now: DateTime<Utc>) -> Result<()> {
    if now >= tournament.start_date {
        return Err(StorageError::validation("Tournament has already started"));
    }

    if !tournament.is_registration_open {
        return Err(StorageError::validation(
            "Registration is closed for this tournament",
        ));
    }

    if let Some(deadline) = tournament.registration_deadline {
        if now > deadline {
            return Err(StorageError::validation("Registration deadline has passed"));
        }
    }

    Ok(())
}

pub fn check_roster(request: &SubmitRegistrationRequest) -> Result<()> {
    if request.judges.is_empty() {
        return Err(StorageError::validation("At least one judge is required"));
    }

    if request.participants.is_empty() {
        return Err(StorageError::validation("At least one participant is required"));
    }

    if request
        .judges
        .iter()
        .any(|judge| judge.judge_id.is_none() && judge.new_judge.is_none())
    {
        return Err(StorageError::validation(
            "Each judge must reference an existing judge or provide new judge data",
        ));
    }

    for (index, participant) in request.participants.iter().enumerate() {
        if !participant.has_athlete() {
            return Err(StorageError::validation(format!(
                "Participant {} is missing an athlete",
                index + 1
            )));
        }
        if !participant.has_coach() {
            return Err(StorageError::validation(format!(
                "Participant {} is missing a coach",
                index + 1
            )));
        }
    }

    Ok(())
}

pub fn check_quota(participants: usize, quota: usize) -> Result<()> {
    if participants > quota {
        return Err(StorageError::validation(format!(
            "Maximum {} participants allowed for this region",
            quota
        )));
    }
    Ok(())
}

/// `existing` holds the statuses of every registration the region already filed for the category.
pub fn check_no_active_registration(existing: &[RegistrationStatus]) -> Result<()> {
    if existing.iter().any(|status| status.is_active()) {
        return Err(StorageError::validation(
            "Your region already has a registration for this category",
        ));
    }
    Ok(())
}

/// Everything the submission checks need, loaded before the write transaction opens.
pub struct SubmissionContext<'a> {
    /// `None` when the category id did not resolve.
    pub tournament: Option<&'a Tournament>,
    pub region_id: Uuid,
    pub existing_statuses: &'a [RegistrationStatus],
    pub now: DateTime<Utc>,
}

/// Runs the submission checks in order and stops at the first failure.
///
/// Field-level checks on inline athlete, coach and judge data run only once the
/// category and roster shape are known to be sound.
pub fn validate_submission(
    request: &SubmitRegistrationRequest,
    context: &SubmissionContext<'_>,
) -> Result<()> {
    if request.tournament_category_id.is_none() {
        return Err(StorageError::validation("tournamentCategoryId is required"));
    }

    let tournament = context
        .tournament
        .ok_or_else(|| StorageError::validation("Tournament category not found"))?;

    check_registration_window(tournament, context.now)?;
    check_roster(request)?;
    request.validate()?;
    check_quota(
        request.participants.len(),
        participant_quota(context.region_id, tournament.organizing_region_id),
    )?;
    check_no_active_registration(context.existing_statuses)
}

pub fn is_owner(actor: &ActorContext, registration: &Registration) -> bool {
    registration.user_id == actor.user_id
}

pub fn ensure_can_view(actor: &ActorContext, registration: &Registration) -> Result<()> {
    if actor.is_staff() || is_owner(actor, registration) {
        Ok(())
    } else {
        Err(StorageError::forbidden("Forbidden"))
    }
}

/// Staff may always change the roster; the owner only while the registration is pending.
pub fn can_edit(actor: &ActorContext, registration: &Registration) -> bool {
    actor.is_staff()
        || (is_owner(actor, registration) && registration.status == RegistrationStatus::Pending)
}

pub fn ensure_can_edit(actor: &ActorContext, registration: &Registration) -> Result<()> {
    ensure_can_view(actor, registration)?;
    if can_edit(actor, registration) {
        Ok(())
    } else {
        Err(StorageError::forbidden("Cannot edit this registration"))
    }
}

/// Checks a requested status change against the moderation rules.
///
/// Staff approve or reject pending registrations; the owning representative may
/// only withdraw while pending.
pub fn authorize_transition(
    actor: &ActorContext,
    registration: &Registration,
    target: RegistrationStatus,
    rejection_reason: Option<&str>,
) -> Result<()> {
    match actor.role {
        Role::RegionalRepresentative => {
            if !is_owner(actor, registration) {
                return Err(StorageError::forbidden("Forbidden: Not your registration"));
            }
            if target != RegistrationStatus::Withdrawn {
                return Err(StorageError::forbidden(
                    "Forbidden: You can only withdraw registrations",
                ));
            }
            if registration.status != RegistrationStatus::Pending {
                return Err(StorageError::validation(
                    "Cannot withdraw: registration is not pending",
                ));
            }
            Ok(())
        }
        Role::Admin | Role::Editor => match target {
            RegistrationStatus::Withdrawn => Err(StorageError::forbidden(
                "Only the submitting region can withdraw a registration",
            )),
            RegistrationStatus::Pending => Err(StorageError::validation(
                "Registration cannot be moved back to pending",
            )),
            RegistrationStatus::Approved | RegistrationStatus::Rejected => {
                if registration.status != RegistrationStatus::Pending {
                    return Err(StorageError::validation(
                        "Only pending registrations can be moderated",
                    ));
                }
                let has_reason = rejection_reason.is_some_and(|r| !r.trim().is_empty());
                if target == RegistrationStatus::Rejected && !has_reason {
                    return Err(StorageError::validation("Rejection reason is required"));
                }
                Ok(())
            }
        },
    }
}

/// Rejects removing an athlete when `current_count` is already at the floor of one.
pub fn check_min_athletes(current_count: i64) -> Result<()> {
    if current_count <= 1 {
        return Err(StorageError::validation("Minimum 1 athlete required"));
    }
    Ok(())
}

pub fn check_can_add_athlete(current_count: i64, quota: usize) -> Result<()> {
    if usize::try_from(current_count).unwrap_or(usize::MAX) >= quota {
        return Err(StorageError::validation(format!(
            "Maximum {} athletes allowed",
            quota
        )));
    }
    Ok(())
}

/// `REG-<year>-<seq>` with the sequence zero-padded to four digits.
pub fn format_registration_number(year: i32, sequence: i32) -> Result<String> {
    if !(1..=MAX_SEQUENCE).contains(&sequence) {
        return Err(StorageError::validation(format!(
            "Registration number sequence for {} is exhausted",
            year
        )));
    }
    Ok(format!("REG-{}-{:04}", year, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::registration::{JudgeEntry, NewAthleteInput, ParticipantEntry};
    use crate::models::Gender;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn tournament(organizing_region_id: Option<Uuid>) -> Tournament {
        Tournament {
            tournament_id: Uuid::new_v4(),
            title: "Чемпионат РК".to_string(),
            title_kk: None,
            title_en: None,
            description: None,
            location: "Астана".to_string(),
            start_date: now() + Duration::days(30),
            end_date: now() + Duration::days(33),
            is_registration_open: true,
            registration_deadline: Some(now() + Duration::days(20)),
            organizing_region_id,
            is_featured: false,
            created_at: now().naive_utc(),
        }
    }

    fn participant() -> ParticipantEntry {
        ParticipantEntry {
            athlete_id: Some(Uuid::new_v4()),
            new_athlete: None,
            coach_id: Some(Uuid::new_v4()),
            new_coach: None,
        }
    }

    fn request(participants: usize) -> SubmitRegistrationRequest {
        SubmitRegistrationRequest {
            tournament_category_id: Some(Uuid::new_v4()),
            judges: vec![JudgeEntry {
                judge_id: Some(Uuid::new_v4()),
                new_judge: None,
            }],
            participants: (0..participants).map(|_| participant()).collect(),
            documents: Vec::new(),
        }
    }

    fn actor(role: Role) -> ActorContext {
        ActorContext {
            user_id: Uuid::new_v4(),
            username: "user".to_string(),
            role,
            region_id: Some(Uuid::new_v4()),
        }
    }

    fn registration(owner: &ActorContext, status: RegistrationStatus) -> Registration {
        Registration {
            registration_id: Uuid::new_v4(),
            registration_number: "REG-2025-0001".to_string(),
            user_id: owner.user_id,
            region_id: owner.region_id.unwrap_or_else(Uuid::new_v4),
            region_name: "Алматы".to_string(),
            tournament_category_id: Uuid::new_v4(),
            status,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
            created_at: now().naive_utc(),
        }
    }

    fn submit(
        request: &SubmitRegistrationRequest,
        tournament: &Tournament,
        region_id: Uuid,
        existing: &[RegistrationStatus],
    ) -> Result<()> {
        validate_submission(
            request,
            &SubmissionContext {
                tournament: Some(tournament),
                region_id,
                existing_statuses: existing,
                now: now(),
            },
        )
    }

    #[test]
    fn test_quota_depends_on_organizing_region() {
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let t = tournament(Some(host));

        assert!(submit(&request(5), &t, host, &[]).is_ok());
        assert!(submit(&request(6), &t, host, &[]).is_ok());
        assert!(submit(&request(7), &t, host, &[]).is_err());

        let err = submit(&request(5), &t, guest, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 4 participants allowed for this region");
        assert!(submit(&request(4), &t, guest, &[]).is_ok());
    }

    #[test]
    fn test_no_organizing_region_means_default_quota() {
        assert_eq!(participant_quota(Uuid::new_v4(), None), 4);
    }

    #[test]
    fn test_active_registration_blocks_resubmission() {
        let region = Uuid::new_v4();
        let t = tournament(None);

        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::Approved,
            RegistrationStatus::Withdrawn,
        ] {
            assert!(submit(&request(2), &t, region, &[status]).is_err());
        }

        assert!(submit(&request(2), &t, region, &[RegistrationStatus::Rejected]).is_ok());
        assert!(
            submit(
                &request(2),
                &t,
                region,
                &[RegistrationStatus::Rejected, RegistrationStatus::Rejected]
            )
            .is_ok()
        );
    }

    #[test]
    fn test_window_checks_in_order() {
        let mut t = tournament(None);
        t.start_date = now();
        t.is_registration_open = false;
        let err = check_registration_window(&t, now()).unwrap_err();
        assert_eq!(err.to_string(), "Tournament has already started");

        let mut t = tournament(None);
        t.is_registration_open = false;
        let err = check_registration_window(&t, now()).unwrap_err();
        assert_eq!(err.to_string(), "Registration is closed for this tournament");

        let mut t = tournament(None);
        t.registration_deadline = Some(now() - Duration::minutes(1));
        let err = check_registration_window(&t, now()).unwrap_err();
        assert_eq!(err.to_string(), "Registration deadline has passed");

        let mut t = tournament(None);
        t.registration_deadline = Some(now());
        assert!(check_registration_window(&t, now()).is_ok());
    }

    #[test]
    fn test_missing_category_reported_first() {
        let mut req = request(9);
        req.judges.clear();
        let err = validate_submission(
            &req,
            &SubmissionContext {
                tournament: None,
                region_id: Uuid::new_v4(),
                existing_statuses: &[],
                now: now(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Tournament category not found");

        req.tournament_category_id = None;
        let err = submit(&req, &tournament(None), Uuid::new_v4(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "tournamentCategoryId is required");
    }

    #[test]
    fn test_missing_category_wins_over_bad_inline_data() {
        let mut req = request(1);
        req.tournament_category_id = None;
        req.participants[0] = ParticipantEntry {
            athlete_id: None,
            new_athlete: Some(NewAthleteInput {
                name: String::new(),
                iin: Some("12".to_string()),
                dob: None,
                gender: Gender::Female,
                sports_rank: None,
                medical_status: None,
                medical_certificate_date: None,
                insurance_number: None,
            }),
            coach_id: Some(Uuid::new_v4()),
            new_coach: None,
        };

        let err = submit(&req, &tournament(None), Uuid::new_v4(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "tournamentCategoryId is required");

        req.tournament_category_id = Some(Uuid::new_v4());
        let err = submit(&req, &tournament(None), Uuid::new_v4(), &[]).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFields(_)));
    }

    #[test]
    fn test_roster_requirements() {
        let t = tournament(None);
        let region = Uuid::new_v4();

        let mut no_judges = request(1);
        no_judges.judges.clear();
        assert!(submit(&no_judges, &t, region, &[]).is_err());

        assert!(submit(&request(0), &t, region, &[]).is_err());

        let mut no_coach = request(1);
        no_coach.participants[0].coach_id = None;
        let err = submit(&no_coach, &t, region, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Participant 1 is missing a coach");

        let mut no_athlete = request(2);
        no_athlete.participants[1].athlete_id = None;
        let err = submit(&no_athlete, &t, region, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Participant 2 is missing an athlete");
    }

    #[test]
    fn test_roster_checked_before_quota_and_duplicates() {
        let t = tournament(None);
        let mut req = request(8);
        req.judges.clear();
        let err = submit(&req, &t, Uuid::new_v4(), &[RegistrationStatus::Pending]).unwrap_err();
        assert_eq!(err.to_string(), "At least one judge is required");
    }

    const ALL_STATUSES: [RegistrationStatus; 4] = [
        RegistrationStatus::Pending,
        RegistrationStatus::Approved,
        RegistrationStatus::Rejected,
        RegistrationStatus::Withdrawn,
    ];

    #[test]
    fn test_transition_matrix_for_staff() {
        for role in [Role::Admin, Role::Editor] {
            let staff = actor(role);
            let owner = actor(Role::RegionalRepresentative);

            for current in ALL_STATUSES {
                let reg = registration(&owner, current);

                let approve =
                    authorize_transition(&staff, &reg, RegistrationStatus::Approved, None);
                let reject = authorize_transition(
                    &staff,
                    &reg,
                    RegistrationStatus::Rejected,
                    Some("Incomplete documents"),
                );
                let withdraw =
                    authorize_transition(&staff, &reg, RegistrationStatus::Withdrawn, None);

                if current == RegistrationStatus::Pending {
                    assert!(approve.is_ok());
                    assert!(reject.is_ok());
                } else {
                    assert!(matches!(approve, Err(StorageError::Validation(_))));
                    assert!(matches!(reject, Err(StorageError::Validation(_))));
                }
                assert!(matches!(withdraw, Err(StorageError::Forbidden(_))));
            }
        }
    }

    #[test]
    fn test_transition_matrix_for_representatives() {
        let owner = actor(Role::RegionalRepresentative);
        let stranger = actor(Role::RegionalRepresentative);

        for current in ALL_STATUSES {
            let reg = registration(&owner, current);

            let withdraw =
                authorize_transition(&owner, &reg, RegistrationStatus::Withdrawn, None);
            if current == RegistrationStatus::Pending {
                assert!(withdraw.is_ok());
            } else {
                assert!(matches!(withdraw, Err(StorageError::Validation(_))));
            }

            for target in [RegistrationStatus::Approved, RegistrationStatus::Rejected] {
                assert!(matches!(
                    authorize_transition(&owner, &reg, target, Some("reason")),
                    Err(StorageError::Forbidden(_))
                ));
            }

            for target in [RegistrationStatus::Withdrawn, RegistrationStatus::Approved] {
                assert!(matches!(
                    authorize_transition(&stranger, &reg, target, None),
                    Err(StorageError::Forbidden(_))
                ));
            }
        }
    }

    #[test]
    fn test_reject_requires_reason() {
        let admin = actor(Role::Admin);
        let reg = registration(&actor(Role::RegionalRepresentative), RegistrationStatus::Pending);

        for reason in [None, Some(""), Some("   ")] {
            let err = authorize_transition(&admin, &reg, RegistrationStatus::Rejected, reason)
                .unwrap_err();
            assert_eq!(err.to_string(), "Rejection reason is required");
        }
    }

    #[test]
    fn test_can_edit() {
        let owner = actor(Role::RegionalRepresentative);
        let editor = actor(Role::Editor);
        let stranger = actor(Role::RegionalRepresentative);

        for status in ALL_STATUSES {
            let reg = registration(&owner, status);
            assert!(can_edit(&editor, &reg));
            assert_eq!(can_edit(&owner, &reg), status == RegistrationStatus::Pending);
            assert!(!can_edit(&stranger, &reg));
        }

        let reg = registration(&owner, RegistrationStatus::Pending);
        assert!(matches!(
            ensure_can_edit(&stranger, &reg),
            Err(StorageError::Forbidden(_))
        ));
        assert!(ensure_can_view(&stranger, &reg).is_err());
        assert!(ensure_can_view(&owner, &reg).is_ok());
    }

    #[test]
    fn test_minimum_athlete_floor() {
        let err = check_min_athletes(1).unwrap_err();
        assert_eq!(err.to_string(), "Minimum 1 athlete required");
        assert!(check_min_athletes(0).is_err());
        assert!(check_min_athletes(2).is_ok());
    }

    #[test]
    fn test_adding_athletes_respects_quota() {
        assert!(check_can_add_athlete(3, 4).is_ok());
        assert!(check_can_add_athlete(4, 4).is_err());
        assert!(check_can_add_athlete(5, 6).is_ok());
        assert!(check_can_add_athlete(6, 6).is_err());
    }

    #[test]
    fn test_registration_number_format() {
        let numbers: Vec<String> = (1..=12)
            .map(|seq| format_registration_number(2025, seq).unwrap())
            .collect();

        for number in &numbers {
            let (prefix, rest) = number.split_at(4);
            assert_eq!(prefix, "REG-");
            let parts: Vec<&str> = rest.split('-').collect();
            assert_eq!(parts.len(), 2);
            assert_eq!(parts[0].len(), 4);
            assert_eq!(parts[1].len(), 4);
            assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
        }

        let suffixes: Vec<u32> = numbers
            .iter()
            .map(|n| n.rsplit('-').next().unwrap().parse().unwrap())
            .collect();
        assert!(suffixes.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(format_registration_number(2025, 7).unwrap(), "REG-2025-0007");
        assert!(format_registration_number(2025, 10_000).is_err());
        assert!(format_registration_number(2025, 0).is_err());
    }
}
