//! # Repository Implementations
//!
//! Data access objects for the two record collections:
//!
//! - [`customer`] - Customer account store (balances, profile fields)
//! - [`entry`] - Ledger entry store (per-session supply records)
//!
//! ## Read-Repair Policy
//! Both stores decode rows defensively: a row that cannot be decoded (a
//! timestamp that does not parse, a column of the wrong type) is logged at
//! `warn` and dropped from the result set. A corrupt row must never make a
//! listing or a report unreadable. Point lookups treat an undecodable row
//! as absent.
//!
//! ## Timestamp Format
//! All timestamps are stored as RFC 3339 UTC text with whole-second
//! precision (`2026-06-01T06:00:00Z`). The format is fixed-width, so SQLite
//! string comparison orders rows chronologically and date-window filters
//! are plain `>=` / `<=` on text.

use chrono::{DateTime, SecondsFormat, Utc};

pub mod customer;
pub mod entry;

/// Formats a timestamp for storage.
pub(crate) fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a stored timestamp. `None` means the column is corrupt.
pub(crate) fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Utc.with_ymd_and_hms(2026, 6, 1, 22, 30, 0).unwrap();
        let raw = fmt_ts(ts);
        assert_eq!(raw, "2026-06-01T22:30:00Z");
        assert_eq!(parse_ts(&raw), Some(ts));
    }

    #[test]
    fn test_corrupt_timestamp_is_none() {
        assert_eq!(parse_ts("not-a-date"), None);
        assert_eq!(parse_ts(""), None);
    }

    #[test]
    fn test_lexicographic_order_matches_time_order() {
        let earlier = fmt_ts(Utc.with_ymd_and_hms(2026, 6, 1, 23, 59, 59).unwrap());
        let later = fmt_ts(Utc.with_ymd_and_hms(2026, 6, 2, 0, 0, 0).unwrap());
        assert!(earlier < later);
    }
}
