use sqlx::PgPool;
use storage::{
    dto::national_team::{NationalTeamFilter, UpsertMembershipRequest},
    error::Result,
    models::NationalTeamMembership,
    repository::{athlete::AthleteRepository, national_team::NationalTeamRepository},
};
use uuid::Uuid;

pub async fn list_members(
    pool: &PgPool,
    filter: &NationalTeamFilter,
) -> Result<Vec<NationalTeamMembership>> {
    NationalTeamRepository::new(pool).list(filter).await
}

pub async fn upsert_member(
    pool: &PgPool,
    req: &UpsertMembershipRequest,
) -> Result<NationalTeamMembership> {
    AthleteRepository::new(pool).find_by_id(req.athlete_id).await?;
    NationalTeamRepository::new(pool).upsert(req).await
}

pub async fn remove_member(pool: &PgPool, id: Uuid) -> Result<()> {
    NationalTeamRepository::new(pool).deactivate(id).await
}
