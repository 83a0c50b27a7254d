use chrono::{DateTime, Datelike, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::athlete::{athlete_conflict, unique_slug};
use super::tournament::TournamentRepository;
use crate::dto::registration::{
    AddRegistrationAthleteRequest, JudgeEntry, ParticipantEntry, RegistrationDetailResponse,
    RegistrationFilter, RegistrationSummary, SubmitRegistrationRequest,
    SubmitRegistrationResponse, UpdateRegistrationAthleteRequest, UpdateRegistrationStatusRequest,
};
use crate::error::{Result, StorageError, map_foreign_key, map_unique};
use crate::models::{
    ActorContext, AthleteRegistration, AuditAction, Registration, RegistrationAuditLog,
    RegistrationDocument, RegistrationJudge, RegistrationStatus,
};
use crate::services::registration_rules::{
    self, SubmissionContext, authorize_transition, check_can_add_athlete, check_min_athletes,
    ensure_can_edit, ensure_can_view, format_registration_number, participant_quota,
};

const DUPLICATE_REGISTRATION: &str = "Your region already has a registration for this category";

const SELECT_ATHLETES: &str = r#"
    SELECT ar.athlete_registration_id, ar.registration_id, ar.athlete_id,
           a.name AS athlete_name, a.iin AS athlete_iin, a.dob AS athlete_dob,
           a.gender AS athlete_gender, ar.coach_id, c.name AS coach_name, ar.created_at
    FROM athlete_registrations ar
    JOIN athletes a ON a.athlete_id = ar.athlete_id
    LEFT JOIN coaches c ON c.coach_id = ar.coach_id
"#;

/// Where a listing is allowed to look.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationScope {
    pub user_id: Option<Uuid>,
    pub region_id: Option<Uuid>,
}

impl RegistrationScope {
    /// Representatives only ever see their own submissions; staff can narrow with `my`.
    pub fn for_actor(actor: &ActorContext, filter: &RegistrationFilter) -> Self {
        if actor.is_staff() {
            Self {
                user_id: filter.my.then_some(actor.user_id),
                region_id: filter.region_id,
            }
        } else {
            Self {
                user_id: Some(actor.user_id),
                region_id: None,
            }
        }
    }
}

pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Registration> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE registration_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn list(
        &self,
        filter: &RegistrationFilter,
        scope: RegistrationScope,
    ) -> Result<(Vec<RegistrationSummary>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*)
            FROM registrations r
            JOIN tournament_categories tc ON tc.tournament_category_id = r.tournament_category_id
            WHERE 1=1
            "#,
        );
        push_filters(&mut count, filter, scope);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT r.*, t.tournament_id, t.title AS tournament_title,
                   (SELECT COUNT(*) FROM athlete_registrations ar
                    WHERE ar.registration_id = r.registration_id) AS athlete_count
            FROM registrations r
            JOIN tournament_categories tc ON tc.tournament_category_id = r.tournament_category_id
            JOIN tournaments t ON t.tournament_id = tc.tournament_id
            WHERE 1=1
            "#,
        );
        push_filters(&mut query, filter, scope);
        query.push(" ORDER BY r.created_at DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let items = query
            .build_query_as::<RegistrationSummary>()
            .fetch_all(self.pool)
            .await?;

        Ok((items, total))
    }

    pub async fn athletes(&self, registration_id: Uuid) -> Result<Vec<AthleteRegistration>> {
        let athletes = sqlx::query_as::<_, AthleteRegistration>(&format!(
            "{} WHERE ar.registration_id = $1 ORDER BY ar.created_at, a.name",
            SELECT_ATHLETES
        ))
        .bind(registration_id)
        .fetch_all(self.pool)
        .await?;

        Ok(athletes)
    }

    pub async fn judges(&self, registration_id: Uuid) -> Result<Vec<RegistrationJudge>> {
        let judges = sqlx::query_as::<_, RegistrationJudge>(
            r#"
            SELECT rj.registration_id, rj.judge_id, j.name AS judge_name,
                   j.category AS judge_category, rg.name AS region_name
            FROM registration_judges rj
            JOIN judges j ON j.judge_id = rj.judge_id
            LEFT JOIN regions rg ON rg.region_id = j.region_id
            WHERE rj.registration_id = $1
            ORDER BY j.name
            "#,
        )
        .bind(registration_id)
        .fetch_all(self.pool)
        .await?;

        Ok(judges)
    }

    pub async fn documents(&self, registration_id: Uuid) -> Result<Vec<RegistrationDocument>> {
        let documents = sqlx::query_as::<_, RegistrationDocument>(
            "SELECT * FROM registration_documents WHERE registration_id = $1 ORDER BY created_at",
        )
        .bind(registration_id)
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    /// Full registration as seen by `actor`; only staff and the owner may read it.
    pub async fn detail(&self, actor: &ActorContext, id: Uuid) -> Result<RegistrationDetailResponse> {
        let registration = self.find_by_id(id).await?;
        ensure_can_view(actor, &registration)?;

        let (category, tournament) = TournamentRepository::new(self.pool)
            .find_category(registration.tournament_category_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let athletes = self.athletes(id).await?;
        let judges = self.judges(id).await?;
        let documents = self.documents(id).await?;
        let can_edit = registration_rules::can_edit(actor, &registration);

        Ok(RegistrationDetailResponse {
            registration,
            tournament,
            category,
            athletes,
            judges,
            documents,
            can_edit,
        })
    }

    /// Statuses of every registration `region_id` filed for the category.
    pub async fn statuses_for(&self, category_id: Uuid, region_id: Uuid) -> Result<Vec<RegistrationStatus>> {
        let statuses = sqlx::query_scalar::<_, RegistrationStatus>(
            r#"
            SELECT status FROM registrations
            WHERE tournament_category_id = $1 AND region_id = $2
            "#,
        )
        .bind(category_id)
        .bind(region_id)
        .fetch_all(self.pool)
        .await?;

        Ok(statuses)
    }

    /// Validates and stores a region's roster for a tournament category.
    ///
    /// All checks run before the transaction opens; everything after is written
    /// atomically, including the registration number.
    pub async fn submit(
        &self,
        actor: &ActorContext,
        request: &SubmitRegistrationRequest,
        now: DateTime<Utc>,
    ) -> Result<SubmitRegistrationResponse> {
        let region_id = actor
            .region_id
            .ok_or_else(|| StorageError::forbidden("User is not bound to a region"))?;

        let resolved = match request.tournament_category_id {
            Some(category_id) => {
                TournamentRepository::new(self.pool)
                    .find_category(category_id)
                    .await?
            }
            None => None,
        };

        let existing = match &resolved {
            Some((category, _)) => {
                self.statuses_for(category.tournament_category_id, region_id)
                    .await?
            }
            None => Vec::new(),
        };

        registration_rules::validate_submission(
            request,
            &SubmissionContext {
                tournament: resolved.as_ref().map(|(_, tournament)| tournament),
                region_id,
                existing_statuses: &existing,
                now,
            },
        )?;

        let Some((category, _)) = resolved else {
            return Err(StorageError::validation("Tournament category not found"));
        };

        let region_name = sqlx::query_scalar::<_, String>("SELECT name FROM regions WHERE region_id = $1")
            .bind(region_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        let mut tx = self.pool.begin().await?;

        let registration_number = next_registration_number(&mut tx, now.year()).await?;

        let mut judge_ids = Vec::with_capacity(request.judges.len());
        for entry in &request.judges {
            let judge_id = resolve_judge(&mut tx, entry, region_id).await?;
            if !judge_ids.contains(&judge_id) {
                judge_ids.push(judge_id);
            }
        }

        let registration_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO registrations (
                registration_number, user_id, region_id, region_name, tournament_category_id, status
            )
            VALUES ($1, $2, $3, $4, $5, 'PENDING')
            RETURNING registration_id
            "#,
        )
        .bind(&registration_number)
        .bind(actor.user_id)
        .bind(region_id)
        .bind(&region_name)
        .bind(category.tournament_category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation()
                && error.constraint_name() == Some("registrations_active_region_key")
            {
                StorageError::validation(DUPLICATE_REGISTRATION)
            } else {
                error
            }
        })?;

        for judge_id in &judge_ids {
            sqlx::query("INSERT INTO registration_judges (registration_id, judge_id) VALUES ($1, $2)")
                .bind(registration_id)
                .bind(judge_id)
                .execute(&mut *tx)
                .await?;
        }

        for participant in &request.participants {
            let athlete_id = resolve_athlete(&mut tx, participant, region_id).await?;
            let coach_id = resolve_coach(&mut tx, participant, region_id).await?;

            sqlx::query(
                r#"
                INSERT INTO athlete_registrations (athlete_id, registration_id, coach_id)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(athlete_id)
            .bind(registration_id)
            .bind(coach_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_unique(
                    e,
                    "athlete_registrations_athlete_key",
                    "The same athlete is listed more than once",
                )
            })?;
        }

        for document in &request.documents {
            sqlx::query(
                "INSERT INTO registration_documents (registration_id, name, url) VALUES ($1, $2, $3)",
            )
            .bind(registration_id)
            .bind(&document.name)
            .bind(&document.url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(SubmitRegistrationResponse {
            success: true,
            registration_id,
            registration_number,
        })
    }

    /// Applies a moderation or withdrawal transition after checking it against the actor.
    pub async fn update_status(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &UpdateRegistrationStatusRequest,
        now: DateTime<Utc>,
    ) -> Result<Registration> {
        let mut tx = self.pool.begin().await?;

        let current = lock_registration(&mut tx, id).await?;
        authorize_transition(actor, &current, req.status, req.rejection_reason.as_deref())?;

        let (approved_at, approved_by, rejection_reason) = match req.status {
            RegistrationStatus::Approved => (Some(now), Some(actor.username.clone()), None),
            RegistrationStatus::Rejected => (None, None, req.rejection_reason.clone()),
            _ => (
                current.approved_at,
                current.approved_by.clone(),
                current.rejection_reason.clone(),
            ),
        };

        let updated = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2, approved_at = $3, approved_by = $4, rejection_reason = $5
            WHERE registration_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.status)
        .bind(approved_at)
        .bind(approved_by)
        .bind(rejection_reason)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM registrations WHERE registration_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn add_athlete(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &AddRegistrationAthleteRequest,
    ) -> Result<AthleteRegistration> {
        let mut tx = self.pool.begin().await?;

        let registration = lock_registration(&mut tx, id).await?;
        ensure_can_edit(actor, &registration)?;

        let already_listed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM athlete_registrations
                WHERE registration_id = $1 AND athlete_id = $2
            )
            "#,
        )
        .bind(id)
        .bind(req.athlete_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_listed {
            return Err(StorageError::validation("Athlete already in this registration"));
        }

        let organizing_region_id = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            SELECT t.organizing_region_id
            FROM tournament_categories tc
            JOIN tournaments t ON t.tournament_id = tc.tournament_id
            WHERE tc.tournament_category_id = $1
            "#,
        )
        .bind(registration.tournament_category_id)
        .fetch_one(&mut *tx)
        .await?;

        let current_count = count_athletes(&mut tx, id).await?;
        check_can_add_athlete(
            current_count,
            participant_quota(registration.region_id, organizing_region_id),
        )?;

        let athlete_name = sqlx::query_scalar::<_, String>("SELECT name FROM athletes WHERE athlete_id = $1")
            .bind(req.athlete_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        let athlete_registration_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO athlete_registrations (athlete_id, registration_id, coach_id)
            VALUES ($1, $2, $3)
            RETURNING athlete_registration_id
            "#,
        )
        .bind(req.athlete_id)
        .bind(id)
        .bind(req.coach_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_foreign_key(e, "Coach not found"))?;

        insert_audit_log(
            &mut tx,
            AuditEntry {
                registration_id: id,
                user_id: actor.user_id,
                action: AuditAction::Create,
                entity_id: Some(athlete_registration_id),
                previous_data: None,
                new_data: Some(json!({
                    "athleteId": req.athlete_id,
                    "athleteName": athlete_name,
                    "coachId": req.coach_id,
                })),
                description: format!("Добавлен спортсмен: {}", athlete_name),
            },
        )
        .await?;

        let added = find_athlete_registration(&mut tx, id, athlete_registration_id).await?;

        tx.commit().await?;

        Ok(added)
    }

    /// Changes the coach assigned to an athlete of the registration.
    pub async fn update_athlete(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &UpdateRegistrationAthleteRequest,
    ) -> Result<AthleteRegistration> {
        let mut tx = self.pool.begin().await?;

        let registration = lock_registration(&mut tx, id).await?;
        ensure_can_edit(actor, &registration)?;

        let current = find_athlete_registration(&mut tx, id, req.athlete_registration_id).await?;

        let new_coach_name = match req.coach_id {
            Some(coach_id) => Some(
                sqlx::query_scalar::<_, String>("SELECT name FROM coaches WHERE coach_id = $1")
                    .bind(coach_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(StorageError::NotFound)?,
            ),
            None => None,
        };

        sqlx::query("UPDATE athlete_registrations SET coach_id = $2 WHERE athlete_registration_id = $1")
            .bind(req.athlete_registration_id)
            .bind(req.coach_id)
            .execute(&mut *tx)
            .await?;

        let unassigned = "не назначен";
        insert_audit_log(
            &mut tx,
            AuditEntry {
                registration_id: id,
                user_id: actor.user_id,
                action: AuditAction::Update,
                entity_id: Some(req.athlete_registration_id),
                previous_data: Some(json!({
                    "coachId": current.coach_id,
                    "coachName": current.coach_name,
                })),
                new_data: Some(json!({
                    "coachId": req.coach_id,
                    "coachName": new_coach_name,
                })),
                description: format!(
                    "Изменён тренер для {}: {} → {}",
                    current.athlete_name,
                    current.coach_name.as_deref().unwrap_or(unassigned),
                    new_coach_name.as_deref().unwrap_or(unassigned)
                ),
            },
        )
        .await?;

        let updated = find_athlete_registration(&mut tx, id, req.athlete_registration_id).await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Removes an athlete, keeping at least one on the roster.
    pub async fn remove_athlete(
        &self,
        actor: &ActorContext,
        id: Uuid,
        athlete_registration_id: Uuid,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let registration = lock_registration(&mut tx, id).await?;
        ensure_can_edit(actor, &registration)?;

        let current = find_athlete_registration(&mut tx, id, athlete_registration_id).await?;

        check_min_athletes(count_athletes(&mut tx, id).await?)?;

        sqlx::query("DELETE FROM athlete_registrations WHERE athlete_registration_id = $1")
            .bind(athlete_registration_id)
            .execute(&mut *tx)
            .await?;

        insert_audit_log(
            &mut tx,
            AuditEntry {
                registration_id: id,
                user_id: actor.user_id,
                action: AuditAction::Delete,
                entity_id: Some(athlete_registration_id),
                previous_data: Some(json!({
                    "athleteId": current.athlete_id,
                    "athleteName": current.athlete_name,
                    "coachId": current.coach_id,
                    "coachName": current.coach_name,
                })),
                new_data: None,
                description: format!("Удалён спортсмен: {}", current.athlete_name),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Audit trail of the registration, newest first.
    pub async fn history(&self, actor: &ActorContext, id: Uuid) -> Result<Vec<RegistrationAuditLog>> {
        let registration = self.find_by_id(id).await?;
        ensure_can_view(actor, &registration)?;

        let logs = sqlx::query_as::<_, RegistrationAuditLog>(
            r#"
            SELECT l.*, u.username
            FROM registration_audit_logs l
            LEFT JOIN users u ON u.user_id = l.user_id
            WHERE l.registration_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &RegistrationFilter, scope: RegistrationScope) {
    if let Some(user_id) = scope.user_id {
        query.push(" AND r.user_id = ");
        query.push_bind(user_id);
    }
    if let Some(region_id) = scope.region_id {
        query.push(" AND r.region_id = ");
        query.push_bind(region_id);
    }
    if let Some(tournament_id) = filter.tournament_id {
        query.push(" AND tc.tournament_id = ");
        query.push_bind(tournament_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND r.status = ");
        query.push_bind(status);
    }
}

/// Reserves the next number of `year` through the per-year counter row.
///
/// The upsert holds the counter's row lock until the surrounding transaction ends,
/// so concurrent submissions in one year are numbered one after another.
pub async fn next_registration_number(conn: &mut PgConnection, year: i32) -> Result<String> {
    let sequence = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO registration_sequences (year, last_value)
        VALUES ($1, 1)
        ON CONFLICT (year) DO UPDATE SET last_value = registration_sequences.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(year)
    .fetch_one(&mut *conn)
    .await?;

    format_registration_number(year, sequence)
}

/// Returns the id of an existing judge, or of the judge created from inline data.
/// Inline judges with a known IIN reuse the registry row.
pub async fn resolve_judge(conn: &mut PgConnection, entry: &JudgeEntry, region_id: Uuid) -> Result<Uuid> {
    if let Some(judge_id) = entry.judge_id {
        return sqlx::query_scalar::<_, Uuid>("SELECT judge_id FROM judges WHERE judge_id = $1")
            .bind(judge_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StorageError::NotFound);
    }

    let new_judge = entry
        .new_judge
        .as_ref()
        .ok_or_else(|| StorageError::validation("Judge data is missing"))?;

    if let Some(iin) = &new_judge.iin {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT judge_id FROM judges WHERE iin = $1 LIMIT 1")
            .bind(iin)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(judge_id) = existing {
            return Ok(judge_id);
        }
    }

    let judge_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO judges (name, iin, dob, category, region_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING judge_id
        "#,
    )
    .bind(&new_judge.name)
    .bind(&new_judge.iin)
    .bind(new_judge.dob)
    .bind(&new_judge.category)
    .bind(region_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(judge_id)
}

/// Returns the participant's athlete id, creating the athlete when only inline data
/// was given. An inline athlete whose IIN is already registered reuses that row.
pub async fn resolve_athlete(
    conn: &mut PgConnection,
    participant: &ParticipantEntry,
    region_id: Uuid,
) -> Result<Uuid> {
    if let Some(athlete_id) = participant.athlete_id {
        return sqlx::query_scalar::<_, Uuid>("SELECT athlete_id FROM athletes WHERE athlete_id = $1")
            .bind(athlete_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StorageError::NotFound);
    }

    let new_athlete = participant
        .new_athlete
        .as_ref()
        .ok_or_else(|| StorageError::validation("Athlete data is missing"))?;

    if let Some(iin) = &new_athlete.iin {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT athlete_id FROM athletes WHERE iin = $1")
            .bind(iin)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(athlete_id) = existing {
            return Ok(athlete_id);
        }
    }

    let slug = unique_slug(conn, &new_athlete.name, None).await?;

    let athlete_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO athletes (
            slug, name, iin, dob, gender, region_id,
            sports_rank, medical_status, medical_certificate_date, insurance_number
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING athlete_id
        "#,
    )
    .bind(&slug)
    .bind(&new_athlete.name)
    .bind(&new_athlete.iin)
    .bind(new_athlete.dob)
    .bind(new_athlete.gender)
    .bind(region_id)
    .bind(&new_athlete.sports_rank)
    .bind(&new_athlete.medical_status)
    .bind(new_athlete.medical_certificate_date)
    .bind(&new_athlete.insurance_number)
    .fetch_one(&mut *conn)
    .await
    .map_err(athlete_conflict)?;

    Ok(athlete_id)
}

pub async fn resolve_coach(
    conn: &mut PgConnection,
    participant: &ParticipantEntry,
    region_id: Uuid,
) -> Result<Uuid> {
    if let Some(coach_id) = participant.coach_id {
        return sqlx::query_scalar::<_, Uuid>("SELECT coach_id FROM coaches WHERE coach_id = $1")
            .bind(coach_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StorageError::NotFound);
    }

    let new_coach = participant
        .new_coach
        .as_ref()
        .ok_or_else(|| StorageError::validation("Coach data is missing"))?;

    if let Some(iin) = &new_coach.iin {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT coach_id FROM coaches WHERE iin = $1 LIMIT 1")
            .bind(iin)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(coach_id) = existing {
            return Ok(coach_id);
        }
    }

    let coach_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO coaches (name, iin, dob, region_id)
        VALUES ($1, $2, $3, $4)
        RETURNING coach_id
        "#,
    )
    .bind(&new_coach.name)
    .bind(&new_coach.iin)
    .bind(new_coach.dob)
    .bind(region_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(coach_id)
}

/// Loads the registration and locks it so roster edits on it run one at a time.
async fn lock_registration(conn: &mut PgConnection, id: Uuid) -> Result<Registration> {
    sqlx::query_as::<_, Registration>(
        "SELECT * FROM registrations WHERE registration_id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(StorageError::NotFound)
}

async fn count_athletes(conn: &mut PgConnection, registration_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM athlete_registrations WHERE registration_id = $1",
    )
    .bind(registration_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

async fn find_athlete_registration(
    conn: &mut PgConnection,
    registration_id: Uuid,
    athlete_registration_id: Uuid,
) -> Result<AthleteRegistration> {
    sqlx::query_as::<_, AthleteRegistration>(&format!(
        "{} WHERE ar.registration_id = $1 AND ar.athlete_registration_id = $2",
        SELECT_ATHLETES
    ))
    .bind(registration_id)
    .bind(athlete_registration_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(StorageError::NotFound)
}

struct AuditEntry {
    registration_id: Uuid,
    user_id: Uuid,
    action: AuditAction,
    entity_id: Option<Uuid>,
    previous_data: Option<serde_json::Value>,
    new_data: Option<serde_json::Value>,
    description: String,
}

async fn insert_audit_log(conn: &mut PgConnection, entry: AuditEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO registration_audit_logs (
            registration_id, user_id, action, entity_type, entity_id,
            previous_data, new_data, description
        )
        VALUES ($1, $2, $3, 'athlete', $4, $5, $6, $7)
        "#,
    )
    .bind(entry.registration_id)
    .bind(entry.user_id)
    .bind(entry.action)
    .bind(entry.entity_id)
    .bind(entry.previous_data.map(Json))
    .bind(entry.new_data.map(Json))
    .bind(&entry.description)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn actor(role: Role) -> ActorContext {
        ActorContext {
            user_id: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
            region_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_representative_scope_ignores_filters() {
        let rep = actor(Role::RegionalRepresentative);
        let filter = RegistrationFilter {
            region_id: Some(Uuid::new_v4()),
            my: false,
            ..Default::default()
        };

        let scope = RegistrationScope::for_actor(&rep, &filter);
        assert_eq!(scope.user_id, Some(rep.user_id));
        assert_eq!(scope.region_id, None);
    }

    #[test]
    fn test_staff_scope_follows_filters() {
        let admin = actor(Role::Admin);
        let region = Uuid::new_v4();

        let all = RegistrationScope::for_actor(
            &admin,
            &RegistrationFilter {
                region_id: Some(region),
                ..Default::default()
            },
        );
        assert_eq!(all.user_id, None);
        assert_eq!(all.region_id, Some(region));

        let mine = RegistrationScope::for_actor(
            &admin,
            &RegistrationFilter {
                my: true,
                ..Default::default()
            },
        );
        assert_eq!(mine.user_id, Some(admin.user_id));
    }

    struct Seeded {
        actor: ActorContext,
        category_id: Uuid,
        judge_id: Uuid,
        coach_id: Uuid,
        athlete_ids: Vec<Uuid>,
    }

    /// One region with its representative, an open tournament division and a small registry.
    async fn seed(pool: &PgPool, athletes: usize) -> Seeded {
        let region_id: Uuid = sqlx::query_scalar(
            "INSERT INTO regions (name, director, address, phone) VALUES ('Алматы', 'Директор', 'ул. Абая 1', '+7 727 000 0000') RETURNING region_id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash, role, region_id) VALUES ('almaty', 'hash', 'RegionalRepresentative', $1) RETURNING user_id",
        )
        .bind(region_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let tournament_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tournaments (title, location, start_date, end_date) VALUES ('Кубок РК', 'Астана', NOW() + INTERVAL '30 days', NOW() + INTERVAL '32 days') RETURNING tournament_id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let category_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tournament_categories (tournament_id, category, gender, bow_type) VALUES ($1, 'Adults', 'F', 'Recurve') RETURNING tournament_category_id",
        )
        .bind(tournament_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let judge_id: Uuid = sqlx::query_scalar(
            "INSERT INTO judges (name, category, region_id) VALUES ('Судья', 'National', $1) RETURNING judge_id",
        )
        .bind(region_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let coach_id: Uuid = sqlx::query_scalar(
            "INSERT INTO coaches (name, region_id) VALUES ('Тренер', $1) RETURNING coach_id",
        )
        .bind(region_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let mut athlete_ids = Vec::with_capacity(athletes);
        for i in 0..athletes {
            let athlete_id: Uuid = sqlx::query_scalar(
                "INSERT INTO athletes (slug, name, gender, region_id) VALUES ($1, $2, 'F', $3) RETURNING athlete_id",
            )
            .bind(format!("athlete-{}", i))
            .bind(format!("Спортсменка {}", i))
            .bind(region_id)
            .fetch_one(pool)
            .await
            .unwrap();
            athlete_ids.push(athlete_id);
        }

        Seeded {
            actor: ActorContext {
                user_id,
                username: "almaty".to_string(),
                role: Role::RegionalRepresentative,
                region_id: Some(region_id),
            },
            category_id,
            judge_id,
            coach_id,
            athlete_ids,
        }
    }

    fn roster(seeded: &Seeded) -> SubmitRegistrationRequest {
        SubmitRegistrationRequest {
            tournament_category_id: Some(seeded.category_id),
            judges: vec![JudgeEntry {
                judge_id: Some(seeded.judge_id),
                new_judge: None,
            }],
            participants: seeded
                .athlete_ids
                .iter()
                .map(|&athlete_id| ParticipantEntry {
                    athlete_id: Some(athlete_id),
                    new_athlete: None,
                    coach_id: Some(seeded.coach_id),
                    new_coach: None,
                })
                .collect(),
            documents: Vec::new(),
        }
    }

    async fn audit_rows(pool: &PgPool, registration_id: Uuid, action: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM registration_audit_logs WHERE registration_id = $1 AND action::text = $2",
        )
        .bind(registration_id)
        .bind(action)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_remove_athlete_keeps_one_and_logs_once(pool: PgPool) {
        let seeded = seed(&pool, 2).await;
        let repo = RegistrationRepository::new(&pool);
        let submitted = repo
            .submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap();

        let before = repo.athletes(submitted.registration_id).await.unwrap();
        assert_eq!(before.len(), 2);

        repo.remove_athlete(
            &seeded.actor,
            submitted.registration_id,
            before[0].athlete_registration_id,
        )
        .await
        .unwrap();

        let after = repo.athletes(submitted.registration_id).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_ne!(after[0].athlete_registration_id, before[0].athlete_registration_id);
        assert_eq!(audit_rows(&pool, submitted.registration_id, "DELETE").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_last_athlete_cannot_be_removed(pool: PgPool) {
        let seeded = seed(&pool, 1).await;
        let repo = RegistrationRepository::new(&pool);
        let submitted = repo
            .submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap();

        let athletes = repo.athletes(submitted.registration_id).await.unwrap();
        let err = repo
            .remove_athlete(
                &seeded.actor,
                submitted.registration_id,
                athletes[0].athlete_registration_id,
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Minimum 1 athlete required");
        assert_eq!(repo.athletes(submitted.registration_id).await.unwrap().len(), 1);
        assert_eq!(audit_rows(&pool, submitted.registration_id, "DELETE").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resubmission_allowed_only_after_rejection(pool: PgPool) {
        let seeded = seed(&pool, 1).await;
        let repo = RegistrationRepository::new(&pool);
        let first = repo
            .submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap();

        let err = repo
            .submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert_eq!(err.to_string(), DUPLICATE_REGISTRATION);

        sqlx::query("UPDATE registrations SET status = 'REJECTED' WHERE registration_id = $1")
            .bind(first.registration_id)
            .execute(&pool)
            .await
            .unwrap();

        let second = repo
            .submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap();
        assert_ne!(second.registration_number, first.registration_number);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_active_registration_index_backs_the_duplicate_check(pool: PgPool) {
        let seeded = seed(&pool, 1).await;
        let repo = RegistrationRepository::new(&pool);
        repo.submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap();

        let err = sqlx::query(
            r#"
            INSERT INTO registrations (
                registration_number, user_id, region_id, region_name, tournament_category_id
            )
            VALUES ('REG-1999-0001', $1, $2, 'Алматы', $3)
            "#,
        )
        .bind(seeded.actor.user_id)
        .bind(seeded.actor.region_id)
        .bind(seeded.category_id)
        .execute(&pool)
        .await
        .map(|_| ())
        .map_err(StorageError::from)
        .unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(err.constraint_name(), Some("registrations_active_region_key"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_registration_numbers_increase_per_year(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();

        let mut numbers = Vec::new();
        for _ in 0..3 {
            numbers.push(next_registration_number(&mut conn, 2031).await.unwrap());
        }
        assert_eq!(numbers, ["REG-2031-0001", "REG-2031-0002", "REG-2031-0003"]);

        let other_year = next_registration_number(&mut conn, 2032).await.unwrap();
        assert_eq!(other_year, "REG-2032-0001");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_audit_log_is_append_only(pool: PgPool) {
        let seeded = seed(&pool, 2).await;
        let repo = RegistrationRepository::new(&pool);
        let submitted = repo
            .submit(&seeded.actor, &roster(&seeded), Utc::now())
            .await
            .unwrap();
        let athletes = repo.athletes(submitted.registration_id).await.unwrap();
        repo.remove_athlete(
            &seeded.actor,
            submitted.registration_id,
            athletes[0].athlete_registration_id,
        )
        .await
        .unwrap();

        let update = sqlx::query("UPDATE registration_audit_logs SET description = 'edited'")
            .execute(&pool)
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM registration_audit_logs")
            .execute(&pool)
            .await;
        assert!(delete.is_err());

        assert_eq!(audit_rows(&pool, submitted.registration_id, "DELETE").await, 1);
    }
}
