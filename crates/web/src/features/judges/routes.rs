use axum::{Router, routing::get};

use super::handlers::{create_judge, delete_judge, get_judge, list_judges, update_judge};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_judges).post(create_judge))
        .route("/:id", get(get_judge).patch(update_judge).delete(delete_judge))
}
