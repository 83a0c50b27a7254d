use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    add_registration_athlete, delete_registration, export_doc, export_excel, get_registration,
    list_registration_athletes, list_registrations, registration_history,
    remove_registration_athlete, submit_registration, update_registration_athlete,
    update_registration_status,
};
use crate::state::AppState;

/// Mounted at `/api/register`.
pub fn submit_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_registration))
}

/// Mounted at `/api/registrations`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registrations))
        .route(
            "/:id",
            get(get_registration)
                .patch(update_registration_status)
                .delete(delete_registration),
        )
        .route(
            "/:id/athletes",
            get(list_registration_athletes)
                .post(add_registration_athlete)
                .patch(update_registration_athlete)
                .delete(remove_registration_athlete),
        )
        .route("/:id/history", get(registration_history))
        .route("/:id/export/excel", get(export_excel))
        .route("/:id/export/doc", get(export_doc))
}
