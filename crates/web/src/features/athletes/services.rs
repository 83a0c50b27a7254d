use sqlx::PgPool;
use storage::{
    dto::athlete::{
        AthleteDetailResponse, CreateAthleteRequest, RegistryFilter, UpdateAthleteRequest,
    },
    error::Result,
    models::{ActorContext, Athlete},
    repository::athlete::AthleteRepository,
};
use uuid::Uuid;

/// Region filter for registry listings.
///
/// The public view honours `regionId`; the dashboard view (`admin=true`) pins
/// representatives to their own region.
pub fn registry_region(actor: Option<&ActorContext>, filter: &RegistryFilter) -> Option<Uuid> {
    match actor {
        Some(actor) if filter.admin => actor.listing_region(filter.region_id),
        _ => filter.region_id,
    }
}

pub async fn list_athletes(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &RegistryFilter,
) -> Result<(Vec<Athlete>, i64)> {
    let region_id = registry_region(actor, filter);
    AthleteRepository::new(pool).list(filter, region_id).await
}

pub async fn get_athlete_detailed(pool: &PgPool, slug: &str) -> Result<AthleteDetailResponse> {
    AthleteRepository::new(pool).find_by_slug_detailed(slug).await
}

pub async fn create_athlete(
    pool: &PgPool,
    actor: &ActorContext,
    req: &CreateAthleteRequest,
) -> Result<Athlete> {
    let region_id = actor.scope_region(req.region_id)?;
    AthleteRepository::new(pool).create(req, region_id).await
}

pub async fn update_athlete(
    pool: &PgPool,
    actor: &ActorContext,
    id: Uuid,
    req: UpdateAthleteRequest,
) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    actor.ensure_region_access(existing.region_id)?;

    let req = UpdateAthleteRequest {
        region_id: if actor.is_staff() { req.region_id } else { None },
        ..req
    };

    repo.update(&existing, &req).await
}

pub async fn delete_athlete(pool: &PgPool, actor: &ActorContext, id: Uuid) -> Result<()> {
    let repo = AthleteRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    actor.ensure_region_access(existing.region_id)?;

    repo.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::Role;

    fn filter(admin: bool, region_id: Option<Uuid>) -> RegistryFilter {
        RegistryFilter {
            admin,
            region_id,
            ..RegistryFilter::default()
        }
    }

    #[test]
    fn test_dashboard_pins_representative_to_own_region() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let rep = ActorContext {
            user_id: Uuid::new_v4(),
            username: "rep".into(),
            role: Role::RegionalRepresentative,
            region_id: Some(own),
        };

        assert_eq!(registry_region(Some(&rep), &filter(true, Some(other))), Some(own));
        assert_eq!(registry_region(Some(&rep), &filter(false, Some(other))), Some(other));
    }

    #[test]
    fn test_public_and_staff_views_use_requested_region() {
        let requested = Some(Uuid::new_v4());
        let editor = ActorContext {
            user_id: Uuid::new_v4(),
            username: "editor".into(),
            role: Role::Editor,
            region_id: None,
        };

        assert_eq!(registry_region(None, &filter(true, requested)), requested);
        assert_eq!(registry_region(Some(&editor), &filter(true, requested)), requested);
        assert_eq!(registry_region(Some(&editor), &filter(true, None)), None);
    }
}
