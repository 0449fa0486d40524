use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use aeroclub_domain::booking::{Booking, BookingStatus};
use aeroclub_domain::events::BookingChangedEvent;
use aeroclub_domain::repository::BookingRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Slot taken: overlapping confirmed booking {0}")]
    SlotTaken(Uuid),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// In-memory booking collection with change notification. Stands in for the
/// hosted row store: list/insert/update plus a subscription feed, nothing
/// smarter.
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
    tx: broadcast::Sender<BookingChangedEvent>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            bookings: RwLock::new(HashMap::new()),
            tx,
        }
    }

    /// Change feed used by the re-validation worker and the calendar view.
    pub fn subscribe(&self) -> broadcast::Receiver<BookingChangedEvent> {
        self.tx.subscribe()
    }

    /// Conditional commit for the optimistic-concurrency path: validation ran
    /// against a snapshot, so this re-checks, under the write lock, for
    /// confirmed overlapping rows (same aircraft, or same instructor) that
    /// were NOT in that snapshot. A collision the validator already ruled on
    /// (or a privileged role overrode) must not block the write, only one
    /// that raced in after the snapshot was read. The caller re-reads and
    /// re-validates on rejection; a rejected insert leaves the store
    /// untouched.
    pub async fn insert_if_free(
        &self,
        booking: Booking,
        snapshot_ids: &HashSet<Uuid>,
    ) -> Result<Uuid, StoreError> {
        let mut bookings = self.bookings.write().await;

        for other in bookings.values() {
            if other.id == booking.id
                || other.status != BookingStatus::Confirmed
                || snapshot_ids.contains(&other.id)
            {
                continue;
            }
            if !other.range.overlaps(&booking.range) {
                continue;
            }
            let same_aircraft = other.aircraft_id == booking.aircraft_id;
            let same_instructor = booking.instructor_id.is_some()
                && other.instructor_id == booking.instructor_id;
            if same_aircraft || same_instructor {
                tracing::warn!(
                    booking_id = %booking.id,
                    blocked_by = %other.id,
                    "Commit rejected: slot taken since validation snapshot"
                );
                return Err(StoreError::SlotTaken(other.id));
            }
        }

        let id = booking.id;
        let status = booking.status;
        bookings.insert(id, booking);
        drop(bookings);

        self.publish(id, status);
        Ok(id)
    }

    /// Guarded lifecycle transition; only CONFIRMED rows move, and only to a
    /// terminal state.
    pub async fn set_status(&self, id: Uuid, status: BookingStatus) -> Result<(), StoreError> {
        {
            let mut bookings = self.bookings.write().await;
            let booking = bookings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            let from = booking.status;
            booking
                .transition_to(status, Utc::now())
                .map_err(|_| StoreError::InvalidTransition {
                    from: from.to_string(),
                    to: status.to_string(),
                })?;
        }
        self.publish(id, status);
        Ok(())
    }

    fn publish(&self, booking_id: Uuid, status: BookingStatus) {
        // No receivers is fine; the feed is best-effort
        let _ = self.tx.send(BookingChangedEvent {
            booking_id,
            status,
            changed_at: Utc::now().timestamp(),
        });
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn list(&self) -> Result<Vec<Booking>, Box<dyn Error + Send + Sync>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.values().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, Box<dyn Error + Send + Sync>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&id).cloned())
    }

    async fn insert(&self, booking: Booking) -> Result<Uuid, Box<dyn Error + Send + Sync>> {
        let id = booking.id;
        let status = booking.status;
        {
            let mut bookings = self.bookings.write().await;
            bookings.insert(id, booking);
        }
        self.publish(id, status);
        Ok(id)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.set_status(id, status).await?;
        Ok(())
    }
}
