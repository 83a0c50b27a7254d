use axum::{
    Router,
    routing::{delete, get},
};

use super::handlers::{list_members, remove_member, upsert_member};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(upsert_member))
        .route("/:id", delete(remove_member))
}
