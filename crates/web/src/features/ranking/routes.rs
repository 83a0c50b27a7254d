use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{list_rankings, recalculate};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rankings))
        .route("/recalculate", post(recalculate))
}
