use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use aeroclub_domain::aircraft::{Aircraft, AircraftStatus, MaintenanceWindow};
use aeroclub_domain::repository::{AircraftRepository, MaintenanceSchedule};

use crate::booking_store::StoreError;

/// In-memory aircraft roster
pub struct InMemoryAircraftStore {
    aircraft: RwLock<HashMap<Uuid, Aircraft>>,
}

impl InMemoryAircraftStore {
    pub fn new() -> Self {
        Self {
            aircraft: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAircraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AircraftRepository for InMemoryAircraftStore {
    async fn list(&self) -> Result<Vec<Aircraft>, Box<dyn Error + Send + Sync>> {
        let aircraft = self.aircraft.read().await;
        Ok(aircraft.values().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Aircraft>, Box<dyn Error + Send + Sync>> {
        let aircraft = self.aircraft.read().await;
        Ok(aircraft.get(&id).cloned())
    }

    async fn upsert(&self, row: Aircraft) -> Result<Uuid, Box<dyn Error + Send + Sync>> {
        let id = row.id;
        let mut aircraft = self.aircraft.write().await;
        aircraft.insert(id, row);
        Ok(id)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AircraftStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut aircraft = self.aircraft.write().await;
        let row = aircraft.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        tracing::info!(aircraft_id = %id, registration = %row.registration, %status, "Aircraft status change");
        row.status = status;
        Ok(())
    }
}

/// In-memory stand-in for the maintenance board's published schedule
pub struct InMemoryMaintenanceBoard {
    windows: RwLock<Vec<MaintenanceWindow>>,
}

impl InMemoryMaintenanceBoard {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMaintenanceBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MaintenanceSchedule for InMemoryMaintenanceBoard {
    async fn list(&self) -> Result<Vec<MaintenanceWindow>, Box<dyn Error + Send + Sync>> {
        let windows = self.windows.read().await;
        Ok(windows.clone())
    }

    async fn windows_for(
        &self,
        aircraft_id: Uuid,
    ) -> Result<Vec<MaintenanceWindow>, Box<dyn Error + Send + Sync>> {
        let windows = self.windows.read().await;
        Ok(windows
            .iter()
            .filter(|w| w.aircraft_id == aircraft_id)
            .cloned()
            .collect())
    }

    async fn publish(
        &self,
        window: MaintenanceWindow,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut windows = self.windows.write().await;
        windows.push(window);
        Ok(())
    }
}
