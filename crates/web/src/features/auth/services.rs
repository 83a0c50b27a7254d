use sqlx::PgPool;
use storage::{
    dto::auth::LoginRequest, error::Result, models::ActorContext,
    repository::region::UserRepository,
};

use crate::error::WebError;

/// Verified when the username is unknown so both paths cost one bcrypt round.
const DUMMY_HASH: &str = "$2b$12$LJ3m4ys3Lg2VBe.LBsDMzuCdNhJFUJShHTzu/hNRccWFEMOAb.Kze";

/// Checks credentials; `None` means the username or password is wrong.
pub async fn authenticate(pool: &PgPool, req: &LoginRequest) -> Result<Option<ActorContext>> {
    let user = UserRepository::new(pool)
        .find_by_username(req.username.trim())
        .await?;

    let Some(user) = user else {
        let _ = bcrypt::verify(req.password.as_bytes(), DUMMY_HASH);
        return Ok(None);
    };

    let valid = bcrypt::verify(req.password.as_bytes(), &user.password_hash).unwrap_or_else(|e| {
        tracing::error!(user_id = %user.user_id, "Stored password hash is unreadable: {}", e);
        false
    });

    if !valid {
        return Ok(None);
    }

    Ok(Some(ActorContext {
        user_id: user.user_id,
        username: user.username,
        role: user.role,
        region_id: user.region_id,
    }))
}

pub fn hash_password(password: &str) -> std::result::Result<String, WebError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| WebError::InternalServerError(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_hash_is_a_valid_bcrypt_hash() {
        assert!(matches!(bcrypt::verify("anything", DUMMY_HASH), Ok(false)));
    }

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(bcrypt::verify("correct horse", &hash).unwrap());
        assert!(!bcrypt::verify("wrong horse", &hash).unwrap());
    }
}
