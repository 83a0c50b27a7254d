use axum::{Router, routing::get};

use super::handlers::{create_news, delete_news, get_news, list_news, update_news};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news).post(create_news))
        .route("/:key", get(get_news).patch(update_news).delete(delete_news))
}
