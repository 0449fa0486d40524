use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timerange::TimeRange;

/// Scheduling-relevant view of an aircraft. Airframe records, hours and
/// maintenance logs live with the maintenance collaborator; the scheduler
/// only needs the registration and the serviceability state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Uuid,
    pub registration: String,
    pub status: AircraftStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AircraftStatus {
    Serviceable,
    Unserviceable,
    Maintenance,
}

impl AircraftStatus {
    /// Serviceability gates new bookings only. An existing booking stays
    /// valid when the aircraft is grounded afterwards.
    pub fn is_serviceable(&self) -> bool {
        matches!(self, AircraftStatus::Serviceable)
    }
}

impl std::fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AircraftStatus::Serviceable => "SERVICEABLE",
            AircraftStatus::Unserviceable => "UNSERVICEABLE",
            AircraftStatus::Maintenance => "MAINTENANCE",
        };
        write!(f, "{}", s)
    }
}

/// A planned downtime window published by the maintenance board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub aircraft_id: Uuid,
    pub range: TimeRange,
    pub remark: Option<String>,
}
