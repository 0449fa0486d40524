use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use aeroclub_domain::booking::{Booking, BookingRequest, BookingStatus, Role};
use aeroclub_domain::conflict::Conflict;
use aeroclub_domain::repository::BookingRepository;
use aeroclub_domain::timerange::{clamp_slot_hour, normalize_to_granularity};
use aeroclub_scheduling::ValidationError;
use aeroclub_store::{load_context, StoreError};

use crate::auth::ActorContext;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking: Booking,
    /// Non-empty only when a privileged role proceeded past conflicts
    conflicts: Vec<Conflict>,
}

#[derive(Debug, Deserialize)]
struct StatusChangeRequest {
    status: BookingStatus,
}

#[derive(Debug, Serialize)]
struct StatusChangeResponse {
    booking_id: Uuid,
    status: BookingStatus,
}

#[derive(Debug, Deserialize)]
struct SlotsQuery {
    date: NaiveDate,
    granularity: Option<u32>,
    from_hour: Option<i64>,
    to_hour: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SlotsResponse {
    granularity_minutes: u32,
    slots: Vec<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct FieldPolicyView {
    field: &'static str,
    required: bool,
    visible: bool,
}

/// Everything the booking form can render; the per-role policy decides what
/// actually shows up and what blocks submission.
const FORM_FIELDS: [&str; 7] = [
    "student_id",
    "instructor_id",
    "aircraft_id",
    "start",
    "end",
    "payment_type",
    "notes",
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}/status", post(change_status))
        .route("/v1/form-policy", get(form_policy))
        .route("/v1/slots", get(list_slots))
}

/// Validate-then-commit. Validation runs against a snapshot; the store's
/// conditional insert re-checks under its write lock, so a lost-update race
/// between two users surfaces as 409 and the client retries with a fresh
/// validation instead of trusting the stale decision.
async fn create_booking(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let context = load_context(
        state.bookings.as_ref(),
        state.aircraft.as_ref(),
        state.maintenance.as_ref(),
    )
    .await
    .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?;

    let validated = match state.validator.validate(&request, actor.role, &context) {
        Ok(validated) => validated,
        Err(errors) => {
            record_rejected_conflicts(&state, &errors).await;
            return Err(AppError::ValidationFailed(errors));
        }
    };

    // An override acknowledges the collisions: they are recorded, marked
    // resolved, and never erased
    if !validated.conflicts.is_empty() {
        let mut ledger = state.ledger.write().await;
        for conflict in validated.conflicts.iter().cloned() {
            let id = ledger.record(conflict);
            ledger.resolve(id)?;
        }
    }

    // The commit only fails on rows that raced in after this snapshot
    let snapshot_ids: HashSet<Uuid> = context.bookings.iter().map(|b| b.id).collect();

    match state
        .bookings
        .insert_if_free(validated.booking.clone(), &snapshot_ids)
        .await
    {
        Ok(id) => {
            info!(booking_id = %id, role = ?actor.role, "Booking confirmed");
            Ok((
                StatusCode::CREATED,
                Json(BookingResponse {
                    booking: validated.booking,
                    conflicts: validated.conflicts,
                }),
            ))
        }
        Err(StoreError::SlotTaken(other)) => Err(AppError::ConflictError(format!(
            "Slot taken by booking {} since validation; re-validate and retry",
            other
        ))),
        Err(e) => Err(AppError::Anyhow(e.into())),
    }
}

/// A rejected request still leaves its detected collisions on the ledger so
/// the maintenance board sees what the requester ran into.
async fn record_rejected_conflicts(state: &AppState, errors: &[ValidationError]) {
    for error in errors {
        if let ValidationError::SchedulingConflict { conflicts } = error {
            let mut ledger = state.ledger.write().await;
            ledger.record_all(conflicts.clone());
        }
    }
}

async fn list_bookings(
    State(state): State<AppState>,
    _actor: ActorContext,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .bookings
        .list()
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?;
    Ok(Json(bookings))
}

async fn change_status(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<StatusChangeResponse>, AppError> {
    let booking = state
        .bookings
        .get(id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))?;

    // Students may only cancel, and only their own slot; completion and
    // no-show calls are an instructor/admin action
    if actor.role == Role::Student
        && (booking.student_id != actor.actor_id || request.status != BookingStatus::Cancelled)
    {
        return Err(AppError::AuthorizationError(
            "Students may only cancel their own bookings".to_string(),
        ));
    }

    state
        .bookings
        .set_status(id, request.status)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => AppError::NotFoundError(e.to_string()),
            StoreError::InvalidTransition { .. } => AppError::ConflictError(e.to_string()),
            other => AppError::Anyhow(other.into()),
        })?;

    info!(booking_id = %id, status = %request.status, "Booking status changed");
    Ok(Json(StatusChangeResponse {
        booking_id: id,
        status: request.status,
    }))
}

/// What the requesting role's booking form should show and require.
async fn form_policy(
    State(state): State<AppState>,
    actor: ActorContext,
) -> Json<Vec<FieldPolicyView>> {
    let policies = state.validator.policies();
    let view = FORM_FIELDS
        .iter()
        .map(|&field| FieldPolicyView {
            field,
            required: policies.is_field_required(field, actor.role),
            visible: policies.is_field_visible(field, actor.role),
        })
        .collect();
    Json(view)
}

/// Granularity-aligned slot boundaries for one day, for the booking form's
/// time pickers.
async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let granularity = match query.granularity {
        Some(0) | None => state.rules.slot_granularity_minutes.max(1),
        Some(g) => g,
    };

    let from = clamp_slot_hour(query.from_hour.unwrap_or(8));
    let to = clamp_slot_hour(query.to_hour.unwrap_or(18));
    let (from, to) = if from <= to { (from, to) } else { (to, from) };

    let day_start = query
        .date
        .and_hms_opt(from, 0, 0)
        .ok_or_else(|| AppError::BadRequestError("Invalid slot window".to_string()))?
        .and_utc();
    let day_end = query
        .date
        .and_hms_opt(to, 0, 0)
        .ok_or_else(|| AppError::BadRequestError("Invalid slot window".to_string()))?
        .and_utc();

    let mut slots = Vec::new();
    let mut slot = normalize_to_granularity(day_start, granularity);
    while slot <= day_end {
        slots.push(slot);
        slot = slot + Duration::minutes(i64::from(granularity));
    }

    Ok(Json(SlotsResponse {
        granularity_minutes: granularity,
        slots,
    }))
}
