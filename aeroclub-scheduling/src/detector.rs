use std::collections::HashMap;
use uuid::Uuid;

use aeroclub_domain::aircraft::{AircraftStatus, MaintenanceWindow};
use aeroclub_domain::booking::{Booking, BookingStatus};
use aeroclub_domain::conflict::{Conflict, ConflictDetails};

/// Pure collision check of one candidate booking against a point-in-time
/// snapshot of the booking set, the aircraft roster and the published
/// maintenance windows. Emission order is fixed so the form shows grounding
/// before scheduling overlaps:
///
/// 1. aircraft_grounded
/// 2. double_booking (one per colliding booking)
/// 3. instructor_unavailable (one per colliding booking)
/// 4. aircraft_maintenance (one per intersecting window)
///
/// Persisting the returned conflicts is the caller's job; running this twice
/// over the same snapshot yields the same set.
pub fn detect_conflicts(
    candidate: &Booking,
    existing: &[Booking],
    roster: &HashMap<Uuid, AircraftStatus>,
    maintenance: &[MaintenanceWindow],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    // Roster rows can be a partial view; unknown ids are the validator's
    // problem, not a grounding.
    if let Some(status) = roster.get(&candidate.aircraft_id) {
        if !status.is_serviceable() {
            conflicts.push(Conflict::new(
                candidate.id,
                ConflictDetails::AircraftGrounded {
                    aircraft_id: candidate.aircraft_id,
                    status: *status,
                },
            ));
        }
    }

    for other in colliding(candidate, existing) {
        if other.aircraft_id == candidate.aircraft_id {
            conflicts.push(Conflict::new(
                candidate.id,
                ConflictDetails::DoubleBooking {
                    aircraft_id: candidate.aircraft_id,
                    other_booking_id: other.id,
                },
            ));
        }
    }

    if let Some(instructor_id) = candidate.instructor_id {
        for other in colliding(candidate, existing) {
            if other.instructor_id == Some(instructor_id) {
                conflicts.push(Conflict::new(
                    candidate.id,
                    ConflictDetails::InstructorUnavailable {
                        instructor_id,
                        other_booking_id: other.id,
                    },
                ));
            }
        }
    }

    for window in maintenance {
        if window.aircraft_id == candidate.aircraft_id && window.range.overlaps(&candidate.range) {
            conflicts.push(Conflict::new(
                candidate.id,
                ConflictDetails::AircraftMaintenance {
                    aircraft_id: candidate.aircraft_id,
                    window_start: window.range.start(),
                    window_end: window.range.end(),
                },
            ));
        }
    }

    if !conflicts.is_empty() {
        tracing::debug!(
            booking_id = %candidate.id,
            count = conflicts.len(),
            "Detected scheduling conflicts"
        );
    }

    conflicts
}

/// Confirmed bookings overlapping the candidate's range. Cancellation frees
/// the slot, and an edit never collides with its own prior version (excluded
/// by id, not object identity).
fn colliding<'a>(candidate: &'a Booking, existing: &'a [Booking]) -> impl Iterator<Item = &'a Booking> {
    existing.iter().filter(move |b| {
        b.id != candidate.id
            && b.status == BookingStatus::Confirmed
            && b.range.overlaps(&candidate.range)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeroclub_domain::booking::PaymentType;
    use aeroclub_domain::conflict::ConflictType;
    use aeroclub_domain::timerange::TimeRange;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, hour, minute, 0).unwrap()
    }

    fn booking(aircraft_id: Uuid, start_h: u32, end_h: u32) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            instructor_id: None,
            aircraft_id,
            range: TimeRange::new(at(start_h, 0), at(end_h, 0)).unwrap(),
            payment_type: PaymentType::Prepaid,
            notes: None,
            status: BookingStatus::Confirmed,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        }
    }

    fn serviceable_roster(aircraft_id: Uuid) -> HashMap<Uuid, AircraftStatus> {
        HashMap::from([(aircraft_id, AircraftStatus::Serviceable)])
    }

    #[test]
    fn test_double_booking_references_existing_booking() {
        let aircraft_id = Uuid::new_v4();
        let existing = booking(aircraft_id, 9, 11);
        let candidate = booking(aircraft_id, 10, 12);

        let conflicts = detect_conflicts(
            &candidate,
            &[existing.clone()],
            &serviceable_roster(aircraft_id),
            &[],
        );

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::DoubleBooking);
        assert_eq!(conflicts[0].booking_id, candidate.id);
        match conflicts[0].details {
            ConflictDetails::DoubleBooking { other_booking_id, .. } => {
                assert_eq!(other_booking_id, existing.id)
            }
            _ => panic!("expected double booking details"),
        }
    }

    #[test]
    fn test_cancelled_booking_frees_the_slot() {
        let aircraft_id = Uuid::new_v4();
        let mut existing = booking(aircraft_id, 9, 11);
        existing.status = BookingStatus::Cancelled;
        let candidate = booking(aircraft_id, 10, 12);

        let conflicts = detect_conflicts(
            &candidate,
            &[existing],
            &serviceable_roster(aircraft_id),
            &[],
        );

        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_back_to_back_bookings_do_not_conflict() {
        let aircraft_id = Uuid::new_v4();
        let existing = booking(aircraft_id, 9, 11);
        let candidate = booking(aircraft_id, 11, 13);

        let conflicts = detect_conflicts(
            &candidate,
            &[existing],
            &serviceable_roster(aircraft_id),
            &[],
        );

        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_editing_excludes_own_prior_version_by_id() {
        let aircraft_id = Uuid::new_v4();
        let stored = booking(aircraft_id, 9, 11);

        // Same id, shifted an hour: the edit must not collide with itself
        let mut edited = booking(aircraft_id, 10, 12);
        edited.id = stored.id;

        let conflicts = detect_conflicts(
            &edited,
            &[stored],
            &serviceable_roster(aircraft_id),
            &[],
        );

        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_instructor_double_booked_across_aircraft() {
        let instructor_id = Uuid::new_v4();
        let mut existing = booking(Uuid::new_v4(), 9, 10);
        existing.range = TimeRange::new(at(9, 0), at(10, 30)).unwrap();
        existing.instructor_id = Some(instructor_id);

        let mut candidate = booking(Uuid::new_v4(), 10, 11);
        candidate.instructor_id = Some(instructor_id);

        let conflicts = detect_conflicts(
            &candidate,
            &[existing.clone()],
            &serviceable_roster(candidate.aircraft_id),
            &[],
        );

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::InstructorUnavailable);
        match conflicts[0].details {
            ConflictDetails::InstructorUnavailable { other_booking_id, .. } => {
                assert_eq!(other_booking_id, existing.id)
            }
            _ => panic!("expected instructor details"),
        }
    }

    #[test]
    fn test_grounded_aircraft_emitted_before_overlaps() {
        let aircraft_id = Uuid::new_v4();
        let existing = booking(aircraft_id, 9, 11);
        let candidate = booking(aircraft_id, 10, 12);
        let roster = HashMap::from([(aircraft_id, AircraftStatus::Unserviceable)]);

        let conflicts = detect_conflicts(&candidate, &[existing], &roster, &[]);

        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].conflict_type, ConflictType::AircraftGrounded);
        assert_eq!(conflicts[1].conflict_type, ConflictType::DoubleBooking);
    }

    #[test]
    fn test_maintenance_window_intersection() {
        let aircraft_id = Uuid::new_v4();
        let candidate = booking(aircraft_id, 10, 12);
        let windows = vec![MaintenanceWindow {
            aircraft_id,
            range: TimeRange::new(at(11, 0), at(14, 0)).unwrap(),
            remark: Some("50h check".to_string()),
        }];

        let conflicts = detect_conflicts(
            &candidate,
            &[],
            &serviceable_roster(aircraft_id),
            &windows,
        );

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::AircraftMaintenance);
    }

    #[test]
    fn test_detection_is_idempotent_over_a_snapshot() {
        let aircraft_id = Uuid::new_v4();
        let existing = vec![booking(aircraft_id, 9, 11), booking(aircraft_id, 11, 13)];
        let candidate = booking(aircraft_id, 10, 12);
        let roster = serviceable_roster(aircraft_id);

        let first = detect_conflicts(&candidate, &existing, &roster, &[]);
        let second = detect_conflicts(&candidate, &existing, &roster, &[]);

        let types = |cs: &[Conflict]| cs.iter().map(|c| c.conflict_type).collect::<Vec<_>>();
        assert_eq!(types(&first), types(&second));
        assert_eq!(first.len(), 2);
    }
}
