use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{login, logout, me};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
