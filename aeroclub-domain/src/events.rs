use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::BookingStatus;
use crate::conflict::ConflictType;

/// Published by the booking store whenever a row is inserted or its status
/// changes; subscribers re-run conflict detection against the fresh set.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookingChangedEvent {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub changed_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConflictDetectedEvent {
    pub booking_id: Uuid,
    pub conflict_type: ConflictType,
    pub detected_at: i64,
}
