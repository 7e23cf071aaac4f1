use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::catalog::{BookingReservation, UnitId, UnitRecord, UnitTarget};
use crate::domain::overlap::{DateRange, OverlapPolicy, overlaps};

/// Interchangeable rooms backing a unit: 1 for an apartment, the room count for a
/// hotel room type. A room type with no rooms has capacity 0 and is never available.
pub fn total_rooms(unit: &UnitRecord) -> u32 {
    match unit.info.target {
        UnitTarget::Apartment(_) => 1,
        UnitTarget::HotelRoomType(_) => unit.room_count,
    }
}

/// Number of distinct reservations of `unit_id` that overlap `range`.
///
/// Reservations belonging to other units are ignored, and a reservation seen more
/// than once (same id) is counted once.
pub fn reserved_count(
    unit_id: UnitId,
    reservations: &[BookingReservation],
    range: &DateRange,
    policy: OverlapPolicy,
) -> u32 {
    let distinct: BTreeSet<_> = reservations
        .iter()
        .filter(|r| r.booking_info_id == unit_id)
        .filter(|r| overlaps(r.start_date, r.end_date, range.start(), range.end(), policy))
        .map(|r| r.id)
        .collect();
    u32::try_from(distinct.len()).unwrap_or(u32::MAX)
}

/// Free rooms for `range`. May be zero or negative; callers test `> 0`.
pub fn available_rooms(
    unit: &UnitRecord,
    reservations: &[BookingReservation],
    range: &DateRange,
    policy: OverlapPolicy,
) -> i64 {
    UnitAvailability::compute(unit, reservations, range, policy).available
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitAvailability {
    pub unit_id: UnitId,
    pub total_rooms: u32,
    pub reserved: u32,
    pub available: i64,
}

impl UnitAvailability {
    pub fn compute(
        unit: &UnitRecord,
        reservations: &[BookingReservation],
        range: &DateRange,
        policy: OverlapPolicy,
    ) -> Self {
        let total = total_rooms(unit);
        let reserved = reserved_count(unit.id(), reservations, range, policy);
        let available = i64::from(total) - i64::from(reserved);
        tracing::debug!(
            unit_id = unit.id(),
            total_rooms = total,
            reserved,
            available,
            range = %range,
            "computed unit availability"
        );
        Self {
            unit_id: unit.id(),
            total_rooms: total,
            reserved,
            available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available > 0
    }
}

impl std::fmt::Display for UnitAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unit {}: {} of {} rooms free ({} reserved)",
            self.unit_id,
            self.available.max(0),
            self.total_rooms,
            self.reserved
        )
    }
}
