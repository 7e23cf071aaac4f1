use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::domain::availability::UnitAvailability;
use crate::domain::catalog::{BookingReservation, UnitRecord};
use crate::domain::overlap::{DateRange, OverlapPolicy};
use crate::error::{BookingError, Result};

/// Filters for the unit listing. `check_in` and `check_out` go together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitQuery {
    pub max_price: Option<BigDecimal>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

impl UnitQuery {
    /// Build a query from raw request values (`YYYY-MM-DD` dates, decimal price).
    pub fn parse(
        max_price: Option<&str>,
        check_in: Option<&str>,
        check_out: Option<&str>,
    ) -> Result<Self> {
        let max_price = max_price
            .map(|raw| {
                BigDecimal::from_str(raw.trim()).map_err(|_| BookingError::InvalidParams {
                    reason: format!("invalid max_price '{raw}', expected a decimal number"),
                })
            })
            .transpose()?;
        Ok(Self {
            max_price,
            check_in: check_in.map(|raw| parse_date("check_in", raw)).transpose()?,
            check_out: check_out.map(|raw| parse_date("check_out", raw)).transpose()?,
        })
    }

    /// The requested stay, if any. Exactly one date is `MissingDateParameter`; a
    /// check-in after the check-out is `InvalidDateRange` (equal dates are a valid
    /// one-day stay).
    pub fn validate(&self) -> Result<Option<DateRange>> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => DateRange::new(check_in, check_out).map(Some),
            (Some(_), None) => Err(BookingError::MissingDateParameter {
                missing: "check_out",
            }),
            (None, Some(_)) => Err(BookingError::MissingDateParameter {
                missing: "check_in",
            }),
            (None, None) => Ok(None),
        }
    }

    pub fn within_price(&self, unit: &UnitRecord) -> bool {
        self.max_price
            .as_ref()
            .is_none_or(|max_price| unit.price() <= max_price)
    }
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| BookingError::InvalidParams {
        reason: format!("invalid {field} date format '{raw}', expected YYYY-MM-DD"),
    })
}

/// Apply `query` to `units`: drop units above the price ceiling, then, when a stay is
/// requested, units without a free room for it. The result is ordered by ascending
/// price, ties broken by unit id.
///
/// `reservations` may span several units; each unit only counts its own.
pub fn filter_units(
    units: Vec<UnitRecord>,
    reservations: &[BookingReservation],
    query: &UnitQuery,
    policy: OverlapPolicy,
) -> Result<Vec<UnitRecord>> {
    let stay = query.validate()?;
    let mut kept: Vec<UnitRecord> = units
        .into_iter()
        .filter(|unit| query.within_price(unit))
        .filter(|unit| {
            stay.as_ref().is_none_or(|range| {
                UnitAvailability::compute(unit, reservations, range, policy).is_available()
            })
        })
        .collect();
    kept.sort_by(|a, b| a.price().cmp(b.price()).then(a.id().cmp(&b.id())));
    Ok(kept)
}
