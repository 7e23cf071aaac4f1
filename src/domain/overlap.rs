use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// How the last day of a stay is counted when comparing two stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// The checkout day is occupied: a stay ending on day D and one starting on D collide.
    #[default]
    Inclusive,
    /// A stay holds the nights `[start, end)`, so the checkout day can be let again.
    /// A single-day stay (`start == end`) still holds its one day.
    ExclusiveCheckout,
}

/// Returns true iff the stays `[a_start, a_end]` and `[b_start, b_end]` share a day
/// under `policy`. Both ranges must be ordered (`start <= end`).
pub fn overlaps(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
    policy: OverlapPolicy,
) -> bool {
    debug_assert!(a_start <= a_end, "first range is crossed");
    debug_assert!(b_start <= b_end, "second range is crossed");
    match policy {
        OverlapPolicy::Inclusive => a_start <= b_end && b_start <= a_end,
        OverlapPolicy::ExclusiveCheckout => {
            a_start < night_end(b_start, b_end) && b_start < night_end(a_start, a_end)
        }
    }
}

// End of the half-open night span; a zero-night stay is widened to one day.
fn night_end(start: NaiveDate, end: NaiveDate) -> NaiveDate {
    if start < end {
        end
    } else {
        start.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)
    }
}

/// An ordered pair of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BookingError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn overlaps(&self, other: &DateRange, policy: OverlapPolicy) -> bool {
        overlaps(self.start, self.end, other.start, other.end, policy)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
