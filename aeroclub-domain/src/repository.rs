use async_trait::async_trait;
use std::error::Error;
use uuid::Uuid;

use crate::aircraft::{Aircraft, AircraftStatus, MaintenanceWindow};
use crate::booking::{Booking, BookingStatus};

/// Repository trait for the booking collection
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, Box<dyn Error + Send + Sync>>;

    async fn insert(&self, booking: Booking) -> Result<Uuid, Box<dyn Error + Send + Sync>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Repository trait for the aircraft roster
#[async_trait]
pub trait AircraftRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Aircraft>, Box<dyn Error + Send + Sync>>;

    async fn get(&self, id: Uuid) -> Result<Option<Aircraft>, Box<dyn Error + Send + Sync>>;

    async fn upsert(&self, aircraft: Aircraft) -> Result<Uuid, Box<dyn Error + Send + Sync>>;

    async fn set_status(
        &self,
        id: Uuid,
        status: AircraftStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Maintenance planning is a separate collaborator; the scheduler only reads
/// the published downtime windows.
#[async_trait]
pub trait MaintenanceSchedule: Send + Sync {
    async fn list(&self) -> Result<Vec<MaintenanceWindow>, Box<dyn Error + Send + Sync>>;

    async fn windows_for(
        &self,
        aircraft_id: Uuid,
    ) -> Result<Vec<MaintenanceWindow>, Box<dyn Error + Send + Sync>>;

    async fn publish(
        &self,
        window: MaintenanceWindow,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
