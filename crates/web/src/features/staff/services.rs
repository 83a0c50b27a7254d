use sqlx::PgPool;
use storage::{
    dto::content::{CreateStaffMemberRequest, StaffFilter, UpdateStaffMemberRequest},
    error::{Result, StorageError},
    models::{ActorContext, StaffMember},
    repository::staff::StaffRepository,
};
use uuid::Uuid;

pub async fn list_staff(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    filter: &StaffFilter,
) -> Result<(Vec<StaffMember>, i64)> {
    let include_inactive = ActorContext::sees_hidden(actor, filter.include_inactive);
    StaffRepository::new(pool)
        .list(filter, include_inactive)
        .await
}

pub async fn get_staff_member(
    pool: &PgPool,
    actor: Option<&ActorContext>,
    id: Uuid,
) -> Result<StaffMember> {
    let item = StaffRepository::new(pool).find_by_id(id).await?;

    if !item.is_active && !ActorContext::sees_hidden(actor, true) {
        return Err(StorageError::NotFound);
    }

    Ok(item)
}

pub async fn create_staff_member(pool: &PgPool, req: &CreateStaffMemberRequest) -> Result<StaffMember> {
    StaffRepository::new(pool).create(req).await
}

pub async fn update_staff_member(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateStaffMemberRequest,
) -> Result<StaffMember> {
    let repo = StaffRepository::new(pool);
    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, req).await
}

pub async fn delete_staff_member(pool: &PgPool, id: Uuid) -> Result<()> {
    StaffRepository::new(pool).delete(id).await
}
