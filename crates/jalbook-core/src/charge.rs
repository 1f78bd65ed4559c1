//! # Charge Calculation
//!
//! Turns a supply session (start, end, crop) into a billable charge.
//!
//! ## The Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start: 06:00  end: 08:30  crop: Rice                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  duration_hours = (end - start) / 3600s = 2.5                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rate = RateTable["Rice"] = ₹200/hr                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  amount = round(2.5 × 200) = ₹500                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions routinely cross midnight (a pump turned on at 22:00 and off at
//! 04:00 is a 6 hour session). The arithmetic is on absolute instants, so
//! day boundaries need no special handling.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::rates::RateTable;

/// Seconds per billing hour.
const SECS_PER_HOUR: f64 = 3600.0;

/// The outcome of charging a supply session: how long it ran and what it
/// costs. Both values are persisted on the ledger entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    /// Session length in fractional hours, always > 0.
    pub duration_hours: f64,
    /// Billed amount in whole rupees, rounded once.
    pub amount: Money,
}

/// Calculates the charge for one supply session.
///
/// ## Errors
/// - [`CoreError::InvalidSupplyRange`] if `end <= start`.
/// - [`CoreError::UnknownRate`] if the crop has no configured rate and the
///   table has no default rate.
///
/// No side effects. The caller decides what to do with the result.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use jalbook_core::charge::calculate;
/// use jalbook_core::rates::RateTable;
///
/// let rates = RateTable::standard();
/// let start = Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 6, 1, 8, 30, 0).unwrap();
///
/// let charge = calculate(start, end, "Rice", &rates).unwrap();
/// assert_eq!(charge.duration_hours, 2.5);
/// assert_eq!(charge.amount.rupees(), 500);
/// ```
pub fn calculate(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    crop: &str,
    rates: &RateTable,
) -> CoreResult<Charge> {
    if end <= start {
        return Err(CoreError::InvalidSupplyRange { start, end });
    }

    let rate = rates
        .rate_for(crop)
        .ok_or_else(|| CoreError::UnknownRate {
            crop: crop.trim().to_string(),
        })?;

    let duration_hours = (end - start).num_seconds() as f64 / SECS_PER_HOUR;
    let amount = rate.for_hours(duration_hours);

    Ok(Charge {
        duration_hours,
        amount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_rice_two_and_half_hours_is_500() {
        let charge = calculate(at(6, 0), at(8, 30), "Rice", &RateTable::standard()).unwrap();
        assert_eq!(charge.duration_hours, 2.5);
        assert_eq!(charge.amount.rupees(), 500);
    }

    #[test]
    fn test_end_equal_to_start_is_rejected() {
        let err = calculate(at(6, 0), at(6, 0), "Rice", &RateTable::standard()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSupplyRange { .. }));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = calculate(at(8, 0), at(6, 0), "Rice", &RateTable::standard()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSupplyRange { .. }));
    }

    #[test]
    fn test_session_crossing_midnight() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 22, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 2, 4, 0, 0).unwrap();

        let charge = calculate(start, end, "Rice", &RateTable::standard()).unwrap();
        assert_eq!(charge.duration_hours, 6.0);
        assert_eq!(charge.amount.rupees(), 1200);
    }

    #[test]
    fn test_unknown_crop_without_default_fails() {
        let rates = RateTable::new().with_rate("Rice", 200);
        let err = calculate(at(6, 0), at(7, 0), "Turmeric", &rates).unwrap_err();
        assert!(matches!(err, CoreError::UnknownRate { .. }));
    }

    #[test]
    fn test_unknown_crop_with_default_bills_at_default() {
        let rates = RateTable::new().with_default_rate(180);
        let charge = calculate(at(6, 0), at(8, 0), "Turmeric", &rates).unwrap();
        assert_eq!(charge.amount.rupees(), 360);
    }

    #[test]
    fn test_fractional_duration_rounds_amount() {
        // 100 minutes of Rice: 1.666..h * 200 = 333.33.. rounds to 333
        let charge = calculate(at(6, 0), at(7, 40), "Rice", &RateTable::standard()).unwrap();
        assert_eq!(charge.amount.rupees(), 333);
    }
}
