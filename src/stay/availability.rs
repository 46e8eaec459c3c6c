use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};
use crate::types::BookingId;

/// an existing reservation's occupied range, half-open `[start, end)` so a
/// check-out day can be another booking's check-in day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInterval {
    pub booking_id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingInterval {
    /// whether `[start, end)` overlaps this interval
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && self.start < end
    }
}

/// whether the requested range is free of existing reservations
pub fn is_available(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    existing: &[BookingInterval],
) -> bool {
    !existing.iter().any(|b| b.overlaps(check_in, check_out))
}

/// reject a requested range that overlaps an existing reservation
///
/// this guard runs before pricing; the rate calculator itself does not
/// know about other bookings
pub fn check_availability(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    existing: &[BookingInterval],
) -> Result<()> {
    match existing.iter().find(|b| b.overlaps(check_in, check_out)) {
        Some(conflict) => Err(BillingError::BookingConflict {
            booking_id: conflict.booking_id,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn booking(start: &str, end: &str) -> BookingInterval {
        BookingInterval {
            booking_id: Uuid::new_v4(),
            start: utc(start),
            end: utc(end),
        }
    }

    #[test]
    fn test_no_bookings_is_available() {
        assert!(is_available(
            utc("2026-06-01T00:00:00Z"),
            utc("2026-06-05T00:00:00Z"),
            &[],
        ));
    }

    #[test]
    fn test_overlap_detected() {
        let existing = vec![booking("2026-06-03T00:00:00Z", "2026-06-07T00:00:00Z")];

        assert!(!is_available(
            utc("2026-06-01T00:00:00Z"),
            utc("2026-06-05T00:00:00Z"),
            &existing,
        ));
        assert!(matches!(
            check_availability(
                utc("2026-06-01T00:00:00Z"),
                utc("2026-06-05T00:00:00Z"),
                &existing,
            ),
            Err(BillingError::BookingConflict { .. })
        ));
    }

    #[test]
    fn test_containing_range_conflicts() {
        let existing = vec![booking("2026-06-03T00:00:00Z", "2026-06-05T00:00:00Z")];

        assert!(!is_available(
            utc("2026-06-01T00:00:00Z"),
            utc("2026-06-10T00:00:00Z"),
            &existing,
        ));
    }

    #[test]
    fn test_back_to_back_bookings_allowed() {
        // checkout day doubles as the next check-in day
        let existing = vec![booking("2026-06-01T00:00:00Z", "2026-06-05T00:00:00Z")];

        assert!(is_available(
            utc("2026-06-05T00:00:00Z"),
            utc("2026-06-09T00:00:00Z"),
            &existing,
        ));
        assert!(check_availability(
            utc("2026-06-05T00:00:00Z"),
            utc("2026-06-09T00:00:00Z"),
            &existing,
        )
        .is_ok());
    }

    #[test]
    fn test_conflict_reports_the_overlapping_booking() {
        let first = booking("2026-06-01T00:00:00Z", "2026-06-05T00:00:00Z");
        let second = booking("2026-06-10T00:00:00Z", "2026-06-15T00:00:00Z");
        let id = second.booking_id;

        let err = check_availability(
            utc("2026-06-12T00:00:00Z"),
            utc("2026-06-20T00:00:00Z"),
            &[first, second],
        )
        .unwrap_err();

        match err {
            BillingError::BookingConflict { booking_id } => assert_eq!(booking_id, id),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
