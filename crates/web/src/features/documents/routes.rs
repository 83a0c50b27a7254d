use axum::{Router, routing::get};

use super::handlers::{
    create_document, delete_document, get_document, list_documents, update_document,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route(
            "/:id",
            get(get_document)
                .patch(update_document)
                .delete(delete_document),
        )
}
