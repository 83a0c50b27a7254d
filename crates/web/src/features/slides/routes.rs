use axum::{Router, routing::get};

use super::handlers::{
    create_slide, delete_slide, get_slide, list_slides, update_slide,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_slides).post(create_slide))
        .route(
            "/:id",
            get(get_slide)
                .patch(update_slide)
                .delete(delete_slide),
        )
}
