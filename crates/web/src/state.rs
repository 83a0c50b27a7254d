use axum::extract::FromRef;
use storage::Database;

use crate::session::SessionKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionKeys,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
