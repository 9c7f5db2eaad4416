//! Report projection: the hand-off to the external renderer.
//!
//! The projector merges the computed columns onto the original column
//! order and derives the three boolean row decorations the renderer
//! needs. It computes, it never styles. Rows can be projected one at a
//! time, so the boundary is free to stream instead of materializing
//! the whole report.

use serde::Serialize;

use crate::compliance::NO_PROOF_ASSET_TEXT;
use crate::review::Review;

/// Computed column: asset-level no-proof flag.
pub const NO_POA_COLUMN: &str = "No POA Asset";
/// Computed column: proof records per session.
pub const PROOF_COUNT_COLUMN: &str = "Count of proof before transaction";
/// Computed column: hours since the asset's last proof record.
pub const ACTIVITY_GAP_COLUMN: &str = "Time since last activity";
/// Computed column: usage sum per session.
pub const USAGE_TOTAL_COLUMN: &str = "total smr";
/// Computed column: transaction-level dispense-without-proof flag.
pub const DISPENSE_COLUMN: &str = "Dispense with no proof";

/// The five computed columns, in their fixed output order.
pub const COMPUTED_COLUMNS: &[&str] = &[
    NO_POA_COLUMN,
    PROOF_COUNT_COLUMN,
    ACTIVITY_GAP_COLUMN,
    USAGE_TOTAL_COLUMN,
    DISPENSE_COLUMN,
];

/// Default report column order, used when the caller does not supply
/// the original column order of its source file.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "Date & Time",
    "Transaction ID",
    "Asset Description",
    "Asset Number",
    "Asset Group",
    "Asset Tank Size (L)",
    "Asset Meter Type (Hr/Km)",
    "Storage Tank",
    "Fuel Pump",
    "Litres",
    "Total Fuel Used (L)",
    "Operation Description / Comment",
    "Refund Eligibility",
    "Opening SMR",
    "Closing SMR",
    "Total SMR Usage",
    "Material",
    "Location",
    "Loads / Tonnes",
    "Activity",
    "Comments",
    "Source",
    "Custom Attribute",
];

/// Boolean row decorations for the external renderer.
///
/// The renderer decides what the booleans look like; this module only
/// states the facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowDecorations {
    /// Data row with a valid timestamp. Rows without one are section
    /// headers and get bold text; this flag suppresses that.
    pub data_row: bool,
    /// Transaction row with a valid timestamp (compliance highlight).
    pub transaction: bool,
    /// Missing or zero usage on a valid-timestamp row (warning
    /// highlight on the usage cell).
    pub usage_warning: bool,
}

/// One projected output row.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub cells: Vec<String>,
    #[serde(flatten)]
    pub decorations: RowDecorations,
}

/// Row-by-row projection of a [`Review`] onto an output column order.
#[derive(Debug)]
pub struct Projection<'a> {
    review: &'a Review,
    columns: Vec<String>,
}

impl<'a> Projection<'a> {
    /// Builds a projection over the caller's original column order, or
    /// the default fixed list when `columns` is `None`. The computed
    /// columns are always appended at the end, exactly once; internal
    /// columns (session labels) are never included.
    #[must_use]
    pub fn new(review: &'a Review, columns: Option<&[String]>) -> Self {
        let base: Vec<String> = match columns {
            Some(cols) => cols.iter().map(|c| c.trim().to_string()).collect(),
            None => DEFAULT_COLUMNS.iter().map(ToString::to_string).collect(),
        };
        let mut columns: Vec<String> = base
            .into_iter()
            .filter(|c| !COMPUTED_COLUMNS.contains(&c.as_str()))
            .collect();
        columns.extend(COMPUTED_COLUMNS.iter().map(ToString::to_string));

        Self { review, columns }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.review.table().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.review.table().is_empty()
    }

    /// Projects a single row.
    #[must_use]
    pub fn row(&self, row: usize) -> ReportRow {
        let cells = self
            .columns
            .iter()
            .map(|column| self.cell(row, column))
            .collect();
        ReportRow {
            cells,
            decorations: self.decorations(row),
        }
    }

    /// Projects all rows. The streaming boundary should prefer
    /// iterating [`Self::row`] instead.
    #[must_use]
    pub fn rows(&self) -> Vec<ReportRow> {
        (0..self.len()).map(|row| self.row(row)).collect()
    }

    fn cell(&self, row: usize, column: &str) -> String {
        let review = self.review;
        match column {
            NO_POA_COLUMN => {
                if review.no_proof_asset()[row] {
                    NO_PROOF_ASSET_TEXT.to_string()
                } else {
                    String::new()
                }
            }
            PROOF_COUNT_COLUMN => review.proof_counts()[row]
                .map(|count| count.to_string())
                .unwrap_or_default(),
            ACTIVITY_GAP_COLUMN => review.activity_gaps()[row]
                .map(|hours| hours.to_string())
                .unwrap_or_default(),
            USAGE_TOTAL_COLUMN => review.usage_totals()[row]
                .map(|total| total.to_string())
                .unwrap_or_default(),
            DISPENSE_COLUMN => {
                if review.dispense_without_proof()[row] {
                    "Yes".to_string()
                } else {
                    String::new()
                }
            }
            _ => review.table().cell(row, column).to_string(),
        }
    }

    fn decorations(&self, row: usize) -> RowDecorations {
        let table = self.review.table();
        let record = table.record(row);
        let has_timestamp = record.timestamp.is_some();
        let missing_usage =
            record.usage_amount.is_none() && record.transaction_id.is_none();
        let zero_usage = record.usage_amount == Some(0.0);

        RowDecorations {
            data_row: has_timestamp,
            transaction: has_timestamp && table.role(row).is_transaction(),
            usage_warning: has_timestamp && (missing_usage || zero_usage),
        }
    }
}
