use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aircraft::AircraftStatus;

/// A detected scheduling collision. Rows are append-only: resolution and
/// notification are tracked on the record, never by deleting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub conflict_type: ConflictType,
    pub details: ConflictDetails,
    pub is_resolved: bool,
    pub notified_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    InstructorUnavailable,
    AircraftGrounded,
    DoubleBooking,
    AircraftMaintenance,
}

/// Typed payload per conflict type, carried to the UI so the calendar can
/// link to the colliding booking or the grounding status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictDetails {
    AircraftGrounded {
        aircraft_id: Uuid,
        status: AircraftStatus,
    },
    DoubleBooking {
        aircraft_id: Uuid,
        other_booking_id: Uuid,
    },
    InstructorUnavailable {
        instructor_id: Uuid,
        other_booking_id: Uuid,
    },
    AircraftMaintenance {
        aircraft_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    },
}

impl ConflictDetails {
    pub fn conflict_type(&self) -> ConflictType {
        match self {
            ConflictDetails::AircraftGrounded { .. } => ConflictType::AircraftGrounded,
            ConflictDetails::DoubleBooking { .. } => ConflictType::DoubleBooking,
            ConflictDetails::InstructorUnavailable { .. } => ConflictType::InstructorUnavailable,
            ConflictDetails::AircraftMaintenance { .. } => ConflictType::AircraftMaintenance,
        }
    }
}

impl Conflict {
    /// The conflict type is derived from the details payload so the two can
    /// never disagree.
    pub fn new(booking_id: Uuid, details: ConflictDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            conflict_type: details.conflict_type(),
            details,
            is_resolved: false,
            notified_at: None,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }
}
