use axum::{Router, routing::get};

use super::handlers::{
    create_partner, delete_partner, get_partner, list_partners, update_partner,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_partners).post(create_partner))
        .route(
            "/:id",
            get(get_partner)
                .patch(update_partner)
                .delete(delete_partner),
        )
}
