use std::error::Error;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use aeroclub_domain::booking::BookingStatus;
use aeroclub_scheduling::detect_conflicts;
use aeroclub_store::load_context;

use crate::state::AppState;

/// Reactive re-validation: every booking-set change re-runs conflict
/// detection over the confirmed bookings and records findings on the ledger.
/// Idempotent recording makes the re-runs free of duplicates, and nothing
/// here ever mutates a booking: a grounded aircraft surfaces as a ledger
/// row, not as a retroactive invalidation.
pub async fn start_revalidation_worker(state: AppState) {
    let mut rx = state.bookings.subscribe();

    info!("Re-validation worker started, watching booking changes...");

    loop {
        match rx.recv().await {
            Ok(event) => {
                debug!(booking_id = %event.booking_id, "Processing booking change");
                if let Err(e) = revalidate(&state).await {
                    error!("Re-validation pass failed: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                // Fine to drop ticks; the next pass covers the whole set
                warn!(skipped, "Re-validation worker lagged behind change feed");
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Re-validation worker stopped");
}

async fn revalidate(state: &AppState) -> Result<(), Box<dyn Error + Send + Sync>> {
    let context = load_context(
        state.bookings.as_ref(),
        state.aircraft.as_ref(),
        state.maintenance.as_ref(),
    )
    .await?;

    let mut detected = Vec::new();
    for booking in context
        .bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
    {
        detected.extend(detect_conflicts(
            booking,
            &context.bookings,
            &context.aircraft,
            &context.maintenance,
        ));
    }

    if !detected.is_empty() {
        let mut ledger = state.ledger.write().await;
        let recorded = ledger.record_all(detected);
        debug!(count = recorded.len(), "Re-validation recorded conflicts");
    }

    Ok(())
}
