use axum::{Router, routing::get};

use super::handlers::{
    create_tournament, delete_tournament, get_featured, get_tournament, list_results,
    list_tournaments, submit_results, update_tournament,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tournaments).post(create_tournament))
        .route("/featured", get(get_featured))
        .route(
            "/:id",
            get(get_tournament)
                .patch(update_tournament)
                .delete(delete_tournament),
        )
        .route("/:id/results", get(list_results).post(submit_results))
}
