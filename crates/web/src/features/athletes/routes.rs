use axum::{Router, routing::get};

use super::handlers::{create_athlete, delete_athlete, get_athlete, list_athletes, update_athlete};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // Reads address athletes by slug, writes by id; the segment is shared.
    Router::new()
        .route("/", get(list_athletes).post(create_athlete))
        .route(
            "/:key",
            get(get_athlete).patch(update_athlete).delete(delete_athlete),
        )
}
