use chrono::NaiveDate;

use crate::domain::availability::UnitAvailability;
use crate::domain::catalog::{BookingReservation, UnitRecord};
use crate::domain::overlap::{DateRange, OverlapPolicy};
use crate::error::{BookingError, Result};

/// Decide whether a stay `[start_date, end_date]` on `unit` can be admitted given the
/// reservations already persisted for it. Pure: nothing is written.
///
/// Checks run in order and stop at the first failure: a crossed range is
/// `InvalidDateRange` whatever the capacity, then a unit with no free room left for
/// the range is `InsufficientCapacity`.
pub fn validate_reservation(
    unit: &UnitRecord,
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[BookingReservation],
    policy: OverlapPolicy,
) -> Result<DateRange> {
    let range = DateRange::new(start_date, end_date)?;
    let availability = UnitAvailability::compute(unit, existing, &range, policy);
    if !availability.is_available() {
        return Err(BookingError::InsufficientCapacity { unit_id: unit.id() });
    }
    Ok(range)
}
