use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use aeroclub_domain::conflict::Conflict;
use aeroclub_scheduling::ledger::LedgerError;

use crate::auth::ActorContext;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ConflictsQuery {
    booking_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct ConflictActionResponse {
    conflict_id: Uuid,
    is_resolved: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/conflicts", get(list_conflicts))
        .route("/v1/conflicts/{id}/resolve", post(resolve_conflict))
        .route("/v1/conflicts/{id}/notify", post(notify_conflict))
}

async fn list_conflicts(
    State(state): State<AppState>,
    _actor: ActorContext,
    Query(query): Query<ConflictsQuery>,
) -> Json<Vec<Conflict>> {
    let ledger = state.ledger.read().await;
    let rows = match query.booking_id {
        Some(booking_id) => ledger.list_unresolved_for_booking(booking_id),
        None => ledger.list_unresolved(),
    };
    Json(rows.into_iter().cloned().collect())
}

/// Dismiss from the maintenance board. Repeating the action is fine; the
/// first resolution timestamp stands.
async fn resolve_conflict(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ConflictActionResponse>, AppError> {
    require_privileged(&actor)?;

    let mut ledger = state.ledger.write().await;
    ledger.resolve(id).map_err(not_found)?;

    info!(conflict_id = %id, actor = %actor.actor_id, "Conflict resolved");
    Ok(Json(ConflictActionResponse {
        conflict_id: id,
        is_resolved: true,
    }))
}

async fn notify_conflict(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ConflictActionResponse>, AppError> {
    require_privileged(&actor)?;

    let mut ledger = state.ledger.write().await;
    ledger.mark_notified(id).map_err(not_found)?;

    let is_resolved = ledger.get(id).map(|c| c.is_resolved).unwrap_or(false);
    Ok(Json(ConflictActionResponse {
        conflict_id: id,
        is_resolved,
    }))
}

fn require_privileged(actor: &ActorContext) -> Result<(), AppError> {
    if actor.role.can_override_conflicts() {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(
            "Only instructors and admins manage conflicts".to_string(),
        ))
    }
}

fn not_found(err: LedgerError) -> AppError {
    AppError::NotFoundError(err.to_string())
}
