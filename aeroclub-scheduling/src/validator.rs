use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use aeroclub_domain::aircraft::{AircraftStatus, MaintenanceWindow};
use aeroclub_domain::booking::{Booking, BookingRequest, BookingStatus, Role};
use aeroclub_domain::conflict::Conflict;
use aeroclub_domain::timerange::TimeRange;
use chrono::Utc;

use crate::detector::detect_conflicts;
use crate::policy::FieldPolicySet;

/// Point-in-time snapshot the validator checks against. The caller owns
/// freshness: re-read and re-validate immediately before committing a write.
#[derive(Debug, Default)]
pub struct ValidationContext {
    pub bookings: Vec<Booking>,
    pub aircraft: HashMap<Uuid, AircraftStatus>,
    pub maintenance: Vec<MaintenanceWindow>,
}

#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },

    #[error("Invalid time range: end must be after start")]
    InvalidRange,

    #[error("Aircraft {aircraft_id} is not serviceable ({status})")]
    AircraftUnserviceable {
        aircraft_id: Uuid,
        status: AircraftStatus,
    },

    #[error("Aircraft {aircraft_id} is not on the roster")]
    UnknownAircraft { aircraft_id: Uuid },

    #[error("Scheduling conflicts detected ({})", .conflicts.len())]
    SchedulingConflict { conflicts: Vec<Conflict> },
}

/// A request that passed validation: the booking to persist, plus any
/// conflicts a privileged role chose to proceed past. Callers must record
/// those conflicts in the ledger; overriding acknowledges them, it does not
/// erase them.
#[derive(Debug, Serialize)]
pub struct ValidatedBooking {
    pub booking: Booking,
    pub conflicts: Vec<Conflict>,
}

/// Single entry point for turning a booking draft into a confirmed booking.
/// Field errors accumulate so the form can highlight every problem in one
/// pass; structural failures stop before conflict detection runs.
pub struct BookingValidator {
    policies: FieldPolicySet,
}

/// A booking row cannot exist without these, no matter how the policy table
/// is configured.
const STRUCTURAL_FIELDS: [&str; 4] = ["student_id", "aircraft_id", "start", "end"];

impl BookingValidator {
    pub fn new(policies: FieldPolicySet) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &FieldPolicySet {
        &self.policies
    }

    pub fn validate(
        &self,
        request: &BookingRequest,
        role: Role,
        context: &ValidationContext,
    ) -> Result<ValidatedBooking, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut required: Vec<&str> = STRUCTURAL_FIELDS.to_vec();
        for field in self.policies.required_fields(role) {
            if !required.contains(&field) {
                required.push(field);
            }
        }
        for field in required {
            if !request.has_field(field) {
                errors.push(ValidationError::MissingRequiredField {
                    field: field.to_string(),
                });
            }
        }

        // No conflict check against an invalid range
        let range = match (request.start, request.end) {
            (Some(start), Some(end)) => match TimeRange::new(start, end) {
                Ok(range) => Some(range),
                Err(_) => {
                    errors.push(ValidationError::InvalidRange);
                    return Err(errors);
                }
            },
            _ => None,
        };

        if let Some(aircraft_id) = request.aircraft_id {
            match context.aircraft.get(&aircraft_id) {
                Some(status) if !status.is_serviceable() => {
                    errors.push(ValidationError::AircraftUnserviceable {
                        aircraft_id,
                        status: *status,
                    });
                }
                None => {
                    errors.push(ValidationError::UnknownAircraft { aircraft_id });
                }
                Some(_) => {}
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let (Some(student_id), Some(aircraft_id), Some(range)) =
            (request.student_id, request.aircraft_id, range)
        else {
            // Unreachable while the structural fields stay required above
            return Err(errors);
        };

        let now = Utc::now();
        let booking = Booking {
            id: request.id.unwrap_or_else(Uuid::new_v4),
            student_id,
            instructor_id: request.instructor_id,
            aircraft_id,
            range,
            payment_type: request.payment_type.unwrap_or_default(),
            notes: request.notes.clone(),
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        let conflicts = detect_conflicts(
            &booking,
            &context.bookings,
            &context.aircraft,
            &context.maintenance,
        );

        if conflicts.is_empty() {
            return Ok(ValidatedBooking {
                booking,
                conflicts,
            });
        }

        if role.can_override_conflicts() {
            tracing::warn!(
                booking_id = %booking.id,
                role = ?role,
                count = conflicts.len(),
                "Accepting booking with open conflicts (privileged override)"
            );
            Ok(ValidatedBooking { booking, conflicts })
        } else {
            Err(vec![ValidationError::SchedulingConflict { conflicts }])
        }
    }
}

impl Default for BookingValidator {
    fn default() -> Self {
        Self::new(FieldPolicySet::default())
    }
}
