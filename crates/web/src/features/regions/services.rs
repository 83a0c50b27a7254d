use sqlx::PgPool;
use storage::{
    dto::region::{
        CreateRegionRequest, CreateRegionUserRequest, RegionDetailResponse, UpdateRegionRequest,
        UserResponse,
    },
    error::Result,
    models::{ActorContext, Region, Role},
    repository::region::{RegionRepository, UserRepository},
};
use uuid::Uuid;

/// Staff also see deactivated regions.
pub async fn list_regions(pool: &PgPool, actor: Option<&ActorContext>) -> Result<Vec<Region>> {
    let include_inactive = actor.is_some_and(ActorContext::is_staff);
    RegionRepository::new(pool).list(include_inactive).await
}

/// Region with owned-entity counts; the user list is only filled in for staff.
pub async fn get_region(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<RegionDetailResponse> {
    let repo = RegionRepository::new(pool);
    let region = repo.find_by_id(id).await?;
    let counts = repo.counts(id).await?;

    let users = if actor.is_some_and(ActorContext::is_staff) {
        list_users(pool, id).await?
    } else {
        Vec::new()
    };

    Ok(RegionDetailResponse {
        region,
        counts,
        users,
    })
}

pub async fn create_region(pool: &PgPool, req: &CreateRegionRequest) -> Result<Region> {
    RegionRepository::new(pool).create(req).await
}

pub async fn update_region(pool: &PgPool, id: Uuid, req: &UpdateRegionRequest) -> Result<Region> {
    let repo = RegionRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_region(pool: &PgPool, id: Uuid) -> Result<()> {
    RegionRepository::new(pool).delete(id).await
}

pub async fn list_users(pool: &PgPool, region_id: Uuid) -> Result<Vec<UserResponse>> {
    let users = UserRepository::new(pool).list_for_region(region_id).await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

/// Creates a regional representative bound to `region_id`.
pub async fn create_user(
    pool: &PgPool,
    region_id: Uuid,
    req: &CreateRegionUserRequest,
    password_hash: &str,
) -> Result<UserResponse> {
    RegionRepository::new(pool).find_by_id(region_id).await?;

    let user = UserRepository::new(pool)
        .create(
            req.username.trim(),
            password_hash,
            Role::RegionalRepresentative,
            Some(region_id),
        )
        .await?;

    Ok(UserResponse::from(user))
}

pub async fn delete_user(pool: &PgPool, region_id: Uuid, user_id: Uuid) -> Result<()> {
    UserRepository::new(pool)
        .delete_from_region(region_id, user_id)
        .await
}
