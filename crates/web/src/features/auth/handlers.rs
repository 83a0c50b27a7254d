use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        auth::{LoginRequest, LoginResponse},
        common::MessageResponse,
    },
    models::ActorContext,
};
use validator::Validate;

use crate::audit;
use crate::error::WebError;
use crate::extract::Json;
use crate::middleware::auth::Actor;
use crate::session::{SessionKeys, expired_cookie};

use super::services;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued; token also set as the `session` cookie", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(db): State<Database>,
    State(keys): State<SessionKeys>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let Some(user) = services::authenticate(db.pool(), &req).await? else {
        audit::log_login(&req.username, false);
        return Err(WebError::Unauthorized);
    };

    audit::log_login(&user.username, true);

    let token = keys.issue(&user)?;
    let cookie = keys.cookie(&token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { token, user }),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(actor: Option<Actor>) -> Result<Response, WebError> {
    if let Some(Actor(actor)) = &actor {
        audit::log_logout(actor);
    }

    Ok((
        [(header::SET_COOKIE, expired_cookie())],
        Json(MessageResponse::new("Logged out")),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = ActorContext),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn me(Actor(actor): Actor) -> Result<Response, WebError> {
    Ok(Json(actor).into_response())
}
