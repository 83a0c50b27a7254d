use axum::{Router, routing::get};

use super::handlers::{
    create_protocol, delete_protocol, get_protocol, list_protocols, update_protocol,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_protocols).post(create_protocol))
        .route(
            "/:id",
            get(get_protocol)
                .patch(update_protocol)
                .delete(delete_protocol),
        )
}
