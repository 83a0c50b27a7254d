use axum::{Router, routing::get};

use super::handlers::{
    create_gallery_item, delete_gallery_item, get_gallery_item, list_gallery, update_gallery_item,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gallery).post(create_gallery_item))
        .route(
            "/:id",
            get(get_gallery_item)
                .patch(update_gallery_item)
                .delete(delete_gallery_item),
        )
}
