use std::sync::Arc;
use tokio::sync::RwLock;

use aeroclub_scheduling::{BookingValidator, ConflictLedger, FieldPolicySet};
use aeroclub_store::app_config::SchedulingRules;
use aeroclub_store::{InMemoryAircraftStore, InMemoryBookingStore, InMemoryMaintenanceBoard};

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<InMemoryBookingStore>,
    pub aircraft: Arc<InMemoryAircraftStore>,
    pub maintenance: Arc<InMemoryMaintenanceBoard>,
    pub ledger: Arc<RwLock<ConflictLedger>>,
    pub validator: Arc<BookingValidator>,
    pub rules: SchedulingRules,
}

impl AppState {
    pub fn new(rules: SchedulingRules) -> Self {
        let policies = if rules.field_policies.is_empty() {
            FieldPolicySet::default()
        } else {
            FieldPolicySet::with_overrides(rules.field_policies.clone())
        };

        Self {
            bookings: Arc::new(InMemoryBookingStore::new()),
            aircraft: Arc::new(InMemoryAircraftStore::new()),
            maintenance: Arc::new(InMemoryMaintenanceBoard::new()),
            ledger: Arc::new(RwLock::new(ConflictLedger::new())),
            validator: Arc::new(BookingValidator::new(policies)),
            rules,
        }
    }
}
