use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use aeroclub_domain::conflict::{Conflict, ConflictDetails, ConflictType};

/// Durable record of detected conflicts with a resolution workflow, decoupled
/// from detection. Detection re-runs on every change tick, so recording is
/// idempotent on (booking, type, details): the same collision never produces
/// two rows.
pub struct ConflictLedger {
    conflicts: HashMap<Uuid, Conflict>,
    index: HashMap<DedupKey, Uuid>,
}

type DedupKey = (Uuid, ConflictType, [u8; 32]);

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Conflict not found: {0}")]
    NotFound(Uuid),
}

impl ConflictLedger {
    pub fn new() -> Self {
        Self {
            conflicts: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Records a conflict, returning the ledger id. Re-recording the same
    /// (booking, type, details) returns the existing row's id untouched, so
    /// resolution state survives re-detection.
    pub fn record(&mut self, conflict: Conflict) -> Uuid {
        let key = dedup_key(&conflict);
        if let Some(existing_id) = self.index.get(&key) {
            return *existing_id;
        }

        let id = conflict.id;
        tracing::info!(
            conflict_id = %id,
            booking_id = %conflict.booking_id,
            conflict_type = ?conflict.conflict_type,
            "Recording conflict"
        );
        self.index.insert(key, id);
        self.conflicts.insert(id, conflict);
        id
    }

    pub fn record_all(&mut self, conflicts: Vec<Conflict>) -> Vec<Uuid> {
        conflicts.into_iter().map(|c| self.record(c)).collect()
    }

    /// Sets notified_at the first time; later calls are a no-op.
    pub fn mark_notified(&mut self, id: Uuid) -> Result<(), LedgerError> {
        let conflict = self.conflicts.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if conflict.notified_at.is_none() {
            conflict.notified_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Idempotent: resolving an already-resolved conflict keeps the original
    /// resolved_at. Dismiss actions from the UI may repeat.
    pub fn resolve(&mut self, id: Uuid) -> Result<(), LedgerError> {
        let conflict = self.conflicts.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if !conflict.is_resolved {
            conflict.is_resolved = true;
            conflict.resolved_at = Some(Utc::now());
        }
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<&Conflict> {
        self.conflicts.get(&id)
    }

    pub fn list_unresolved_for_booking(&self, booking_id: Uuid) -> Vec<&Conflict> {
        self.unresolved(|c| c.booking_id == booking_id)
    }

    pub fn list_unresolved(&self) -> Vec<&Conflict> {
        self.unresolved(|_| true)
    }

    fn unresolved(&self, filter: impl Fn(&Conflict) -> bool) -> Vec<&Conflict> {
        let mut rows: Vec<&Conflict> = self
            .conflicts
            .values()
            .filter(|c| !c.is_resolved && filter(c))
            .collect();
        // HashMap iteration order is arbitrary; keep the listing stable
        rows.sort_by_key(|c| (c.created_at, c.id));
        rows
    }
}

impl Default for ConflictLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn dedup_key(conflict: &Conflict) -> DedupKey {
    (
        conflict.booking_id,
        conflict.conflict_type,
        details_hash(&conflict.details),
    )
}

fn details_hash(details: &ConflictDetails) -> [u8; 32] {
    let bytes = serde_json::to_vec(details).unwrap_or_default();
    *blake3::hash(&bytes).as_bytes()
}
