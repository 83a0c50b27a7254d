use axum::{Router, routing::get};

use super::handlers::{
    create_staff_member, delete_staff_member, get_staff_member, list_staff, update_staff_member,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff_member))
        .route(
            "/:id",
            get(get_staff_member)
                .patch(update_staff_member)
                .delete(delete_staff_member),
        )
}
