use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use aeroclub_domain::aircraft::{Aircraft, AircraftStatus, MaintenanceWindow};
use aeroclub_domain::booking::Role;
use aeroclub_domain::repository::{AircraftRepository, MaintenanceSchedule};
use aeroclub_domain::timerange::TimeRange;

use crate::auth::ActorContext;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct AddAircraftRequest {
    registration: String,
    status: Option<AircraftStatus>,
}

#[derive(Debug, Deserialize)]
struct SetStatusRequest {
    status: AircraftStatus,
}

#[derive(Debug, Deserialize)]
struct PublishWindowRequest {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    remark: Option<String>,
}

#[derive(Debug, Serialize)]
struct AircraftResponse {
    id: Uuid,
    registration: String,
    status: AircraftStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/aircraft", get(list_aircraft).post(add_aircraft))
        .route("/v1/aircraft/{id}/status", put(set_status))
        .route(
            "/v1/aircraft/{id}/maintenance",
            get(list_windows).post(publish_window),
        )
}

async fn list_aircraft(
    State(state): State<AppState>,
    _actor: ActorContext,
) -> Result<Json<Vec<Aircraft>>, AppError> {
    let roster = state
        .aircraft
        .list()
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?;
    Ok(Json(roster))
}

async fn add_aircraft(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(request): Json<AddAircraftRequest>,
) -> Result<(StatusCode, Json<AircraftResponse>), AppError> {
    require_admin(&actor)?;

    let aircraft = Aircraft {
        id: Uuid::new_v4(),
        registration: request.registration,
        status: request.status.unwrap_or(AircraftStatus::Serviceable),
    };
    let response = AircraftResponse {
        id: aircraft.id,
        registration: aircraft.registration.clone(),
        status: aircraft.status,
    };

    state
        .aircraft
        .upsert(aircraft)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?;

    info!(aircraft_id = %response.id, registration = %response.registration, "Aircraft added to roster");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Grounding an aircraft blocks new bookings only; existing bookings stay
/// valid and surface through the re-validation worker instead.
async fn set_status(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<AircraftResponse>, AppError> {
    require_admin(&actor)?;

    state
        .aircraft
        .set_status(id, request.status)
        .await
        .map_err(|_| AppError::NotFoundError(format!("Aircraft not found: {}", id)))?;

    let aircraft = state
        .aircraft
        .get(id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?
        .ok_or_else(|| AppError::NotFoundError(format!("Aircraft not found: {}", id)))?;

    Ok(Json(AircraftResponse {
        id: aircraft.id,
        registration: aircraft.registration,
        status: aircraft.status,
    }))
}

async fn list_windows(
    State(state): State<AppState>,
    _actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MaintenanceWindow>>, AppError> {
    let windows = state
        .maintenance
        .windows_for(id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?;
    Ok(Json(windows))
}

async fn publish_window(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(request): Json<PublishWindowRequest>,
) -> Result<StatusCode, AppError> {
    require_admin(&actor)?;

    let range = TimeRange::new(request.start, request.end)
        .map_err(|e| AppError::BadRequestError(e.to_string()))?;

    state
        .maintenance
        .publish(MaintenanceWindow {
            aircraft_id: id,
            range,
            remark: request.remark,
        })
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e)))?;

    info!(aircraft_id = %id, "Maintenance window published");
    Ok(StatusCode::CREATED)
}

fn require_admin(actor: &ActorContext) -> Result<(), AppError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(
            "Roster changes require the admin role".to_string(),
        ))
    }
}
