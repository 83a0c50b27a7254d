use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A business rule rejected the request before anything was written.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    InvalidFields(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Name of the violated constraint or index, when the database reported one.
    pub fn constraint_name(&self) -> Option<&str> {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.constraint(),
            _ => None,
        }
    }
}

/// Turns a unique violation on `constraint` into a `ConstraintViolation` carrying `msg`.
pub fn map_unique(error: sqlx::Error, constraint: &str, msg: &str) -> StorageError {
    let error = StorageError::from(error);
    if error.is_unique_violation() && error.constraint_name() == Some(constraint) {
        return StorageError::ConstraintViolation(msg.to_string());
    }
    error
}

/// Turns a foreign key violation into a `Validation` error carrying `msg`.
pub fn map_foreign_key(error: sqlx::Error, msg: &str) -> StorageError {
    let error = StorageError::from(error);
    if error.is_foreign_key_violation() {
        return StorageError::validation(msg);
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_not_database_errors() {
        let err = StorageError::validation("Minimum 1 athlete required");
        assert!(!err.is_unique_violation());
        assert!(!err.is_foreign_key_violation());
        assert_eq!(err.constraint_name(), None);
        assert_eq!(err.to_string(), "Minimum 1 athlete required");
    }

    #[test]
    fn test_map_unique_passes_through_other_errors() {
        let mapped = map_unique(sqlx::Error::RowNotFound, "athletes_slug_key", "Slug taken");
        assert!(matches!(mapped, StorageError::Database(sqlx::Error::RowNotFound)));
    }
}
