use axum::{
    Router,
    routing::{delete, get},
};

use super::handlers::{
    create_region, create_user, delete_region, delete_user, get_region, list_regions, list_users,
    update_region,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_regions).post(create_region))
        .route(
            "/:id",
            get(get_region).patch(update_region).delete(delete_region),
        )
        .route("/:id/users", get(list_users).post(create_user))
        .route("/:id/users/:user_id", delete(delete_user))
}
