use std::sync::Arc;

use axum::http::{HeaderMap, header};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use storage::models::{ActorContext, Role};
use uuid::Uuid;

use crate::error::WebError;

pub const SESSION_COOKIE: &str = "session";

/// Payload of a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub region_id: Option<Uuid>,
    pub exp: usize,
}

impl Claims {
    pub fn new(actor: &ActorContext, ttl_hours: i64) -> Self {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;

        Self {
            sub: actor.user_id,
            username: actor.username.clone(),
            role: actor.role,
            region_id: actor.region_id,
            exp,
        }
    }
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Arc<str>,
    ttl_hours: i64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            ttl_hours,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_hours * 3600
    }

    pub fn issue(&self, actor: &ActorContext) -> Result<String, WebError> {
        let claims = Claims::new(actor, self.ttl_hours);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| WebError::InternalServerError(format!("Failed to create token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, WebError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            WebError::Unauthorized
        })
    }

    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.ttl_seconds()
        )
    }
}

pub fn expired_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Token from `Authorization: Bearer` or, failing that, the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn actor() -> ActorContext {
        ActorContext {
            user_id: Uuid::new_v4(),
            username: "almaty_rep".to_string(),
            role: Role::RegionalRepresentative,
            region_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let keys = SessionKeys::new("test-secret", 1);
        let actor = actor();

        let token = keys.issue(&actor).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, actor.user_id);
        assert_eq!(claims.username, actor.username);
        assert_eq!(claims.role, Role::RegionalRepresentative);
        assert_eq!(claims.region_id, actor.region_id);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::new("one", 1).issue(&actor()).unwrap();
        assert!(matches!(
            SessionKeys::new("two", 1).verify(&token),
            Err(WebError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = SessionKeys::new("test-secret", -2);
        let token = keys.issue(&actor()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_token_lookup_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=from-cookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-cookie"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_cleared_cookie_is_not_a_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = SessionKeys::new("s", 2).cookie("abc");
        assert!(cookie.starts_with("session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(expired_cookie().contains("Max-Age=0"));
    }
}
