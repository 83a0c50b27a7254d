//! Structured audit events for security-relevant actions.
//!
//! Emitted under the `audit` target so they can be routed separately from
//! request logs. Roster edits are additionally persisted by the storage layer.

use storage::models::{ActorContext, RegistrationStatus};
use uuid::Uuid;

pub fn log_login(username: &str, success: bool) {
    if success {
        tracing::info!(
            target: "audit",
            event = "login",
            username = username,
            success = success,
            "Login succeeded for {}",
            username
        );
    } else {
        tracing::warn!(
            target: "audit",
            event = "login",
            username = username,
            success = success,
            "Login failed for {}",
            username
        );
    }
}

pub fn log_logout(actor: &ActorContext) {
    tracing::info!(
        target: "audit",
        event = "logout",
        user_id = %actor.user_id,
        "Logout by {}",
        actor.username
    );
}

pub fn log_registration_submitted(actor: &ActorContext, registration_id: Uuid, number: &str) {
    tracing::info!(
        target: "audit",
        event = "registration_submitted",
        user_id = %actor.user_id,
        region_id = ?actor.region_id,
        registration_id = %registration_id,
        registration_number = number,
        "Registration {} submitted by {}",
        number,
        actor.username
    );
}

pub fn log_registration_status(
    actor: &ActorContext,
    registration_id: Uuid,
    status: RegistrationStatus,
) {
    tracing::info!(
        target: "audit",
        event = "registration_status",
        user_id = %actor.user_id,
        registration_id = %registration_id,
        status = ?status,
        "Registration {} moved to {:?} by {}",
        registration_id,
        status,
        actor.username
    );
}

pub fn log_registration_deleted(actor: &ActorContext, registration_id: Uuid) {
    tracing::info!(
        target: "audit",
        event = "registration_deleted",
        user_id = %actor.user_id,
        registration_id = %registration_id,
        "Registration {} deleted by {}",
        registration_id,
        actor.username
    );
}

pub fn log_results_replaced(actor: &ActorContext, category_id: Uuid, count: usize) {
    tracing::info!(
        target: "audit",
        event = "results_replaced",
        user_id = %actor.user_id,
        tournament_category_id = %category_id,
        count = count,
        "{} results stored for category {} by {}",
        count,
        category_id,
        actor.username
    );
}

pub fn log_rankings_recomputed(actor: &ActorContext, year: i32, updated: usize) {
    tracing::info!(
        target: "audit",
        event = "rankings_recomputed",
        user_id = %actor.user_id,
        year = year,
        updated = updated,
        "Rankings for {} recomputed by {} ({} rows)",
        year,
        actor.username,
        updated
    );
}

/// A representative tried to act outside their region or role.
pub fn log_access_denied(actor: &ActorContext, action: &str, reason: &str) {
    tracing::warn!(
        target: "audit",
        event = "access_denied",
        user_id = %actor.user_id,
        role = ?actor.role,
        region_id = ?actor.region_id,
        action = action,
        "Denied {} for {}: {}",
        action,
        actor.username,
        reason
    );
}

/// Passes `result` through, recording an access denial when it is a `Forbidden`.
pub fn trace_denial<T>(
    actor: &ActorContext,
    action: &str,
    result: storage::Result<T>,
) -> storage::Result<T> {
    if let Err(storage::StorageError::Forbidden(reason)) = &result {
        log_access_denied(actor, action, reason);
    }
    result
}
