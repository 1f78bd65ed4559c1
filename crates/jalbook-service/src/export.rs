//! # CSV Export
//!
//! Renders a filtered entry report as a CSV byte blob suitable for opening
//! directly in spreadsheet software.
//!
//! ## Format
//! - UTF-8 with a leading byte-order mark (Excel needs the BOM to pick the
//!   right encoding for non-ASCII names)
//! - Fixed header row, comma separated
//! - Dates as `DD-MM-YYYY`, times as `HH:MM` (24h), duration with two
//!   decimals, amounts in whole INR
//! - Fields containing delimiters or quotes are quoted per RFC 4180

use csv::WriterBuilder;

use crate::error::ServiceError;
use jalbook_core::SupplyEntry;

/// Leading byte-order mark for spreadsheet compatibility.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Column headers, in output order.
pub const EXPORT_HEADER: [&str; 9] = [
    "Start Date",
    "End Date",
    "Customer",
    "Start Time",
    "End Time",
    "Duration (hrs)",
    "Crop Type",
    "Amount (INR)",
    "Status",
];

/// Renders entries to CSV bytes. The caller is responsible for rejecting an
/// empty entry set before rendering.
pub fn render_csv(entries: &[SupplyEntry]) -> Result<Vec<u8>, ServiceError> {
    let mut buf = Vec::with_capacity(64 + entries.len() * 96);
    buf.extend_from_slice(UTF8_BOM);

    let mut writer = WriterBuilder::new().from_writer(buf);

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| ServiceError::internal(format!("CSV write failed: {e}")))?;

    for entry in entries {
        writer
            .write_record(&[
                entry.start_at.format("%d-%m-%Y").to_string(),
                entry.end_at.format("%d-%m-%Y").to_string(),
                entry.customer_name.clone(),
                entry.start_at.format("%H:%M").to_string(),
                entry.end_at.format("%H:%M").to_string(),
                format!("{:.2}", entry.duration_hours),
                entry.crop_type.clone(),
                entry.amount.rupees().to_string(),
                entry.status_label().to_string(),
            ])
            .map_err(|e| ServiceError::internal(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| ServiceError::internal(format!("CSV flush failed: {e}")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use jalbook_core::Money;

    fn entry(name: &str) -> SupplyEntry {
        SupplyEntry {
            id: "e1".to_string(),
            customer_id: "c1".to_string(),
            customer_name: name.to_string(),
            start_at: Utc.with_ymd_and_hms(2026, 6, 1, 22, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2026, 6, 2, 0, 30, 0).unwrap(),
            duration_hours: 2.5,
            crop_type: "Rice".to_string(),
            amount: Money::from_rupees(500),
            is_paid: false,
            created_at: Utc.with_ymd_and_hms(2026, 6, 2, 0, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_starts_with_bom_and_header() {
        let bytes = render_csv(&[entry("Ramesh Patil")]).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "Start Date,End Date,Customer,Start Time,End Time,Duration (hrs),Crop Type,Amount (INR),Status"
        );
    }

    #[test]
    fn test_row_formatting_across_midnight() {
        let bytes = render_csv(&[entry("Ramesh Patil")]).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "01-06-2026,02-06-2026,Ramesh Patil,22:00,00:30,2.50,Rice,500,Unpaid"
        );
    }

    #[test]
    fn test_name_with_comma_is_quoted() {
        let bytes = render_csv(&[entry("Patil, Ramesh")]).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("\"Patil, Ramesh\""));
    }
}
