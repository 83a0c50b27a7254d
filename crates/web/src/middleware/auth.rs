use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use storage::{Database, models::ActorContext, repository::region::UserRepository};

use crate::error::WebError;
use crate::session::{SessionKeys, token_from_headers};

/// Authenticated caller.
///
/// The token only proves who the caller is; role and region are re-read from the
/// user row so a deleted or re-assigned account loses access immediately.
pub struct Actor(pub ActorContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
    Database: FromRef<S>,
    SessionKeys: FromRef<S>,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(WebError::Unauthorized)?;

        let keys = SessionKeys::from_ref(state);
        let claims = keys.verify(&token)?;

        let db = Database::from_ref(state);
        let user = UserRepository::new(db.pool())
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.sub, "Session refers to a deleted user");
                WebError::Unauthorized
            })?;

        Ok(Actor(ActorContext {
            user_id: user.user_id,
            username: user.username,
            role: user.role,
            region_id: user.region_id,
        }))
    }
}
