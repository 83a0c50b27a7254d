use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Role;
use crate::error::{Result, StorageError};

/// The authenticated caller, passed explicitly into every service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    pub region_id: Option<Uuid>,
}

impl ActorContext {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn require_staff(&self) -> Result<()> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(StorageError::forbidden("Forbidden"))
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(StorageError::forbidden("Forbidden"))
        }
    }

    /// Region a write should be attributed to. Representatives always write into
    /// their own region, whatever the payload says.
    pub fn scope_region(&self, requested: Option<Uuid>) -> Result<Option<Uuid>> {
        match self.role {
            Role::RegionalRepresentative => self
                .region_id
                .map(Some)
                .ok_or_else(|| StorageError::forbidden("User is not bound to a region")),
            Role::Admin | Role::Editor => Ok(requested),
        }
    }

    /// Rejects representatives touching an entity owned by another region.
    pub fn ensure_region_access(&self, target_region_id: Option<Uuid>) -> Result<()> {
        if self.is_staff() {
            return Ok(());
        }

        match (self.region_id, target_region_id) {
            (Some(own), Some(target)) if own == target => Ok(()),
            _ => Err(StorageError::forbidden("Forbidden: entity belongs to another region")),
        }
    }

    /// Region filter applied to list queries made from the admin dashboard.
    pub fn listing_region(&self, requested: Option<Uuid>) -> Option<Uuid> {
        if self.is_staff() {
            requested
        } else {
            self.region_id
        }
    }

    /// Drafts and inactive entries are shown to staff only, and only when asked for.
    pub fn sees_hidden(actor: Option<&ActorContext>, requested: bool) -> bool {
        requested && actor.is_some_and(ActorContext::is_staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, region_id: Option<Uuid>) -> ActorContext {
        ActorContext {
            user_id: Uuid::new_v4(),
            username: "tester".to_string(),
            role,
            region_id,
        }
    }

    #[test]
    fn test_representative_region_overrides_payload() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let rep = actor(Role::RegionalRepresentative, Some(own));

        assert_eq!(rep.scope_region(Some(other)).unwrap(), Some(own));
        assert_eq!(rep.scope_region(None).unwrap(), Some(own));
    }

    #[test]
    fn test_staff_keeps_requested_region() {
        let requested = Uuid::new_v4();
        let editor = actor(Role::Editor, None);

        assert_eq!(editor.scope_region(Some(requested)).unwrap(), Some(requested));
        assert_eq!(editor.scope_region(None).unwrap(), None);
    }

    #[test]
    fn test_unbound_representative_cannot_write() {
        let rep = actor(Role::RegionalRepresentative, None);
        assert!(matches!(
            rep.scope_region(None),
            Err(StorageError::Forbidden(_))
        ));
    }

    #[test]
    fn test_region_access_checks() {
        let own = Uuid::new_v4();
        let rep = actor(Role::RegionalRepresentative, Some(own));

        assert!(rep.ensure_region_access(Some(own)).is_ok());
        assert!(rep.ensure_region_access(Some(Uuid::new_v4())).is_err());
        assert!(rep.ensure_region_access(None).is_err());

        let admin = actor(Role::Admin, None);
        assert!(admin.ensure_region_access(Some(Uuid::new_v4())).is_ok());
        assert!(admin.ensure_region_access(None).is_ok());
    }

    #[test]
    fn test_role_gates() {
        assert!(actor(Role::Admin, None).require_admin().is_ok());
        assert!(actor(Role::Editor, None).require_admin().is_err());
        assert!(actor(Role::Editor, None).require_staff().is_ok());
        assert!(
            actor(Role::RegionalRepresentative, Some(Uuid::new_v4()))
                .require_staff()
                .is_err()
        );
    }

    #[test]
    fn test_only_staff_sees_hidden_content() {
        let editor = actor(Role::Editor, None);
        let rep = actor(Role::RegionalRepresentative, Some(Uuid::new_v4()));

        assert!(ActorContext::sees_hidden(Some(&editor), true));
        assert!(!ActorContext::sees_hidden(Some(&editor), false));
        assert!(!ActorContext::sees_hidden(Some(&rep), true));
        assert!(!ActorContext::sees_hidden(None, true));
    }
}
