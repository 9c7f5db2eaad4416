//! Parsed event records and value coercion.
//!
//! Each input row is parsed exactly once into an [`EventRecord`]. All
//! coercion is lossy-but-total: values that fail to parse become `None`
//! and are logged at debug level, they never abort the run.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One parsed row of the per-asset event log.
///
/// The raw cells stay in the owning table; this struct only carries the
/// typed fields the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Asset identifier, `None` when the cell is empty.
    pub asset_id: Option<String>,
    /// Event timestamp, `None` after a parse failure.
    pub timestamp: Option<NaiveDateTime>,
    /// Transaction identifier; presence distinguishes a dispense from a
    /// proof record.
    pub transaction_id: Option<String>,
    /// Usage metric (SMR hours or kilometers), `None` when absent or
    /// non-numeric.
    pub usage_amount: Option<f64>,
    /// Data source the row came from.
    pub source: Option<String>,
}

/// Timestamp formats accepted by the log, year-first variants first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Date-only formats, parsed as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Normalizes a raw cell: trims whitespace, maps empty to `None`.
pub(crate) fn normalize_cell(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Parses a timestamp cell, returning `None` on failure.
pub fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let value = normalize_cell(cell)?;

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.into());
        }
    }

    tracing::debug!(value, "unparseable timestamp, coercing to null");
    None
}

/// Parses a numeric usage cell, returning `None` when absent or
/// non-numeric.
pub fn parse_usage(cell: &str) -> Option<f64> {
    let value = normalize_cell(cell)?;
    match value.parse::<f64>() {
        Ok(amount) => Some(amount),
        Err(_) => {
            tracing::debug!(value, "non-numeric usage amount, coercing to null");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_year_first() {
        assert_eq!(
            parse_timestamp("2025-05-01 10:30:00"),
            Some(dt(2025, 5, 1, 10, 30))
        );
        assert_eq!(
            parse_timestamp("2025/05/01 10:30"),
            Some(dt(2025, 5, 1, 10, 30))
        );
        assert_eq!(
            parse_timestamp("2025-05-01T10:30:00"),
            Some(dt(2025, 5, 1, 10, 30))
        );
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2025-05-01"), Some(dt(2025, 5, 1, 0, 0)));
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let parsed = parse_timestamp("2025-05-01 10:30:00.500").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage_is_none() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
    }

    #[test]
    fn test_parse_usage() {
        assert_eq!(parse_usage("5"), Some(5.0));
        assert_eq!(parse_usage(" 3.25 "), Some(3.25));
        assert_eq!(parse_usage("-1.5"), Some(-1.5));
    }

    #[test]
    fn test_parse_usage_non_numeric_is_none() {
        assert_eq!(parse_usage("n/a"), None);
        assert_eq!(parse_usage(""), None);
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("  x  "), Some("x"));
        assert_eq!(normalize_cell("   "), None);
    }
}
