pub mod aircraft_store;
pub mod app_config;
pub mod booking_store;

pub use aircraft_store::{InMemoryAircraftStore, InMemoryMaintenanceBoard};
pub use booking_store::{InMemoryBookingStore, StoreError};

use aeroclub_domain::repository::{AircraftRepository, BookingRepository, MaintenanceSchedule};
use aeroclub_scheduling::ValidationContext;
use std::error::Error;

/// Reads one point-in-time snapshot of the bookings, roster and maintenance
/// windows for a validation pass. The snapshot can go stale the moment it is
/// read; the commit path re-checks under the store's write lock.
pub async fn load_context(
    bookings: &dyn BookingRepository,
    aircraft: &dyn AircraftRepository,
    maintenance: &dyn MaintenanceSchedule,
) -> Result<ValidationContext, Box<dyn Error + Send + Sync>> {
    let roster = aircraft
        .list()
        .await?
        .into_iter()
        .map(|a| (a.id, a.status))
        .collect();

    Ok(ValidationContext {
        bookings: bookings.list().await?,
        aircraft: roster,
        maintenance: maintenance.list().await?,
    })
}
