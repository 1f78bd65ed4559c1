//! # Rate Table
//!
//! Maps crop types to hourly water-supply rates.
//!
//! Irrigation is billed per hour of supplied water, and the hourly rate
//! depends on what the field grows: paddy takes standing water for long
//! stretches, vegetables take short frequent turns. The rate table is plain
//! configuration data with one lookup operation and a default-rate fallback
//! for crops the schedule does not name.

use std::collections::HashMap;

use crate::money::Money;

/// Crop type to hourly charge schedule.
///
/// ## Lookup Rules
/// - Crop names are matched case-insensitively with surrounding whitespace
///   trimmed ("  rice " finds the "Rice" rate).
/// - An unrecognized crop falls back to the default rate, if one is set.
/// - No match and no default means the charge cannot be computed; callers
///   receive [`CoreError::UnknownRate`](crate::error::CoreError::UnknownRate).
///
/// ## Example
/// ```rust
/// use jalbook_core::rates::RateTable;
///
/// let rates = RateTable::new()
///     .with_rate("Rice", 200)
///     .with_default_rate(180);
///
/// assert_eq!(rates.rate_for("rice").unwrap().rupees(), 200);
/// assert_eq!(rates.rate_for("Turmeric").unwrap().rupees(), 180);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, Money>,
    default_rate: Option<Money>,
}

impl RateTable {
    /// Creates an empty rate table with no default rate.
    pub fn new() -> Self {
        RateTable {
            rates: HashMap::new(),
            default_rate: None,
        }
    }

    /// The business's standard schedule, in rupees per hour.
    ///
    /// Named crops carry their own rate; anything else bills at the default.
    pub fn standard() -> Self {
        RateTable::new()
            .with_rate("Rice", 200)
            .with_rate("Wheat", 180)
            .with_rate("Sugarcane", 250)
            .with_rate("Cotton", 220)
            .with_rate("Maize", 160)
            .with_rate("Vegetables", 150)
            .with_default_rate(180)
    }

    /// Adds or replaces the rate for a crop type.
    pub fn with_rate(mut self, crop: &str, rupees_per_hour: i64) -> Self {
        self.rates
            .insert(normalize(crop), Money::from_rupees(rupees_per_hour));
        self
    }

    /// Sets the fallback rate applied to crops the schedule does not name.
    pub fn with_default_rate(mut self, rupees_per_hour: i64) -> Self {
        self.default_rate = Some(Money::from_rupees(rupees_per_hour));
        self
    }

    /// Looks up the hourly rate for a crop type.
    ///
    /// Returns the configured rate, else the default rate, else `None`.
    pub fn rate_for(&self, crop: &str) -> Option<Money> {
        self.rates
            .get(&normalize(crop))
            .copied()
            .or(self.default_rate)
    }

    /// Whether the schedule names this crop explicitly (default excluded).
    pub fn has_rate(&self, crop: &str) -> bool {
        self.rates.contains_key(&normalize(crop))
    }
}

/// Lookup key: trimmed, lowercased.
fn normalize(crop: &str) -> String {
    crop.trim().to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let rates = RateTable::new().with_rate("Rice", 200);
        assert_eq!(rates.rate_for("Rice").unwrap().rupees(), 200);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        let rates = RateTable::new().with_rate("Rice", 200);
        assert_eq!(rates.rate_for("rice").unwrap().rupees(), 200);
        assert_eq!(rates.rate_for("  RICE ").unwrap().rupees(), 200);
    }

    #[test]
    fn test_unknown_crop_falls_back_to_default() {
        let rates = RateTable::new()
            .with_rate("Rice", 200)
            .with_default_rate(180);
        assert_eq!(rates.rate_for("Turmeric").unwrap().rupees(), 180);
    }

    #[test]
    fn test_unknown_crop_without_default_is_none() {
        let rates = RateTable::new().with_rate("Rice", 200);
        assert!(rates.rate_for("Turmeric").is_none());
    }

    #[test]
    fn test_standard_schedule_covers_rice() {
        let rates = RateTable::standard();
        assert_eq!(rates.rate_for("Rice").unwrap().rupees(), 200);
        assert!(rates.has_rate("Sugarcane"));
        // Unlisted crops bill at the default, never fail
        assert!(rates.rate_for("Banana").is_some());
    }

    #[test]
    fn test_with_rate_replaces() {
        let rates = RateTable::new().with_rate("Rice", 200).with_rate("rice", 210);
        assert_eq!(rates.rate_for("Rice").unwrap().rupees(), 210);
    }
}
