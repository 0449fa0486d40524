use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timerange::TimeRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub student_id: Uuid,
    pub instructor_id: Option<Uuid>,
    pub aircraft_id: Uuid,
    pub range: TimeRange,
    pub payment_type: PaymentType,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::NoShow => "NO_SHOW",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Prepaid,
    Payg,
    #[default]
    Account,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// The one asymmetry between actors: privileged roles may commit a
    /// booking despite scheduling conflicts, students are hard-blocked.
    pub fn can_override_conflicts(&self) -> bool {
        matches!(self, Role::Admin | Role::Instructor)
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            _ => Err(()),
        }
    }
}

/// Immutable booking draft as assembled by the booking form. Every field the
/// field policy can require is optional here; the validator decides what is
/// actually missing for the requesting role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Set when editing an existing booking, so conflict detection can
    /// exclude the booking's own prior version.
    pub id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub aircraft_id: Option<Uuid>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub payment_type: Option<PaymentType>,
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Whether the draft carries a value for a policy-governed field name.
    /// Unknown field names count as present so a stray policy row can never
    /// make every request fail.
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            "student_id" => self.student_id.is_some(),
            "instructor_id" => self.instructor_id.is_some(),
            "aircraft_id" => self.aircraft_id.is_some(),
            "start" => self.start.is_some(),
            "end" => self.end.is_some(),
            "payment_type" => self.payment_type.is_some(),
            "notes" => self.notes.is_some(),
            _ => true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl Booking {
    /// Lifecycle guard: a booking only ever leaves the CONFIRMED state, and
    /// the terminal states never transition again. Rows are never deleted
    /// while training records reference them, so cancellation is a status
    /// change.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.status == BookingStatus::Confirmed && next != BookingStatus::Confirmed
    }

    pub fn transition_to(&mut self, next: BookingStatus, at: DateTime<Utc>) -> Result<(), BookingError> {
        if !self.can_transition_to(next) {
            return Err(BookingError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_booking() -> Booking {
        let start = Utc.with_ymd_and_hms(2025, 6, 14, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 14, 11, 0, 0).unwrap();
        Booking {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            instructor_id: None,
            aircraft_id: Uuid::new_v4(),
            range: TimeRange::new(start, end).unwrap(),
            payment_type: PaymentType::Prepaid,
            notes: None,
            status: BookingStatus::Confirmed,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_transition_out_of_confirmed() {
        let mut booking = sample_booking();
        booking
            .transition_to(BookingStatus::Cancelled, Utc::now())
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);

        // Terminal states stay terminal
        let result = booking.transition_to(BookingStatus::Completed, Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_request_field_presence() {
        let request = BookingRequest {
            student_id: Some(Uuid::new_v4()),
            ..Default::default()
        };

        assert!(request.has_field("student_id"));
        assert!(!request.has_field("instructor_id"));
        assert!(!request.has_field("payment_type"));
        assert!(request.has_field("unknown_future_field"));
    }

    #[test]
    fn test_role_override_asymmetry() {
        assert!(Role::Admin.can_override_conflicts());
        assert!(Role::Instructor.can_override_conflicts());
        assert!(!Role::Student.can_override_conflicts());
    }
}
