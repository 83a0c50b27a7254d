use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    Admin,
    Editor,
    RegionalRepresentative,
}

impl Role {
    /// Admins and editors moderate content and are not bound to a region.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    #[sqlx(rename = "M")]
    #[serde(rename = "M")]
    Male,
    #[sqlx(rename = "F")]
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// Age division of a tournament category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "age_category")]
pub enum AgeCategory {
    Adults,
    Youth,
    Juniors,
    Cadets,
    Cubs,
}

impl AgeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AgeCategory::Adults => "Adults",
            AgeCategory::Youth => "Youth",
            AgeCategory::Juniors => "Juniors",
            AgeCategory::Cadets => "Cadets",
            AgeCategory::Cubs => "Cubs",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "bow_type")]
pub enum BowType {
    Recurve,
    Compound,
}

impl BowType {
    pub fn as_str(self) -> &'static str {
        match self {
            BowType::Recurve => "Recurve",
            BowType::Compound => "Compound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
}

impl RegistrationStatus {
    /// Every status except `Rejected` occupies the region's slot in a category.
    pub fn is_active(self) -> bool {
        !matches!(self, RegistrationStatus::Rejected)
    }

    pub fn label_ru(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "На проверке",
            RegistrationStatus::Approved => "Одобрено",
            RegistrationStatus::Rejected => "Отклонено",
            RegistrationStatus::Withdrawn => "Отозвано",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "audit_action", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Editor.is_staff());
        assert!(!Role::RegionalRepresentative.is_staff());
    }

    #[test]
    fn test_only_rejected_frees_the_slot() {
        assert!(RegistrationStatus::Pending.is_active());
        assert!(RegistrationStatus::Approved.is_active());
        assert!(RegistrationStatus::Withdrawn.is_active());
        assert!(!RegistrationStatus::Rejected.is_active());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"F\"");
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Withdrawn).unwrap(),
            "\"WITHDRAWN\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"RegionalRepresentative\"").unwrap(),
            Role::RegionalRepresentative
        );
    }
}
