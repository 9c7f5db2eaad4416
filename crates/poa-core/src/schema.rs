//! Input column resolution with alias matching.
//!
//! Source systems export the same log with slightly different headers
//! ("DateTime", "Txn ID", ...), so required columns are resolved
//! case- and spacing-insensitively against known alias lists. A missing
//! required column is the one fatal error of the engine: it aborts the
//! run before any stage executes.

use thiserror::Error;

/// Canonical header of the timestamp column.
pub const TIMESTAMP_COLUMN: &str = "Date & Time";
/// Canonical header of the transaction-id column.
pub const TRANSACTION_ID_COLUMN: &str = "Transaction ID";
/// Canonical header of the asset-id column.
pub const ASSET_ID_COLUMN: &str = "Asset Number";
/// Canonical header of the optional source column.
pub const SOURCE_COLUMN: &str = "Source";
/// Canonical header of the optional usage column.
pub const USAGE_COLUMN: &str = "Total SMR Usage";

const TIMESTAMP_ALIASES: &[&str] = &["date & time", "date and time", "datetime", "date", "timestamp"];
const TRANSACTION_ID_ALIASES: &[&str] = &["transaction id", "transactionid", "txn id", "txnid"];
const ASSET_ID_ALIASES: &[&str] = &["asset number", "assetnumber", "asset no", "assetno"];
const SOURCE_ALIASES: &[&str] = &["source"];
const USAGE_ALIASES: &[&str] = &["total smr usage"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required column is absent after alias resolution.
    #[error("missing required column '{column}' (available: {})", available.join(", "))]
    MissingColumn {
        column: &'static str,
        available: Vec<String>,
    },
}

/// Resolved column positions for one input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Index of the timestamp column.
    pub timestamp: usize,
    /// Index of the transaction-id column.
    pub transaction_id: usize,
    /// Index of the asset-id column.
    pub asset_id: usize,
    /// Index of the source column, if present.
    pub source: Option<usize>,
    /// Index of the usage column, if present.
    pub usage: Option<usize>,
    /// Original header text of the transaction-id column, used for the
    /// re-ingested-header guard.
    pub transaction_header: String,
    /// Original header text of the asset-id column, same guard.
    pub asset_header: String,
}

impl Schema {
    /// Resolves the schema against a header row.
    pub fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let timestamp = find_column(headers, TIMESTAMP_ALIASES).ok_or_else(|| missing(TIMESTAMP_COLUMN, headers))?;
        let transaction_id =
            find_column(headers, TRANSACTION_ID_ALIASES).ok_or_else(|| missing(TRANSACTION_ID_COLUMN, headers))?;
        let asset_id = find_column(headers, ASSET_ID_ALIASES).ok_or_else(|| missing(ASSET_ID_COLUMN, headers))?;

        let schema = Self {
            timestamp,
            transaction_id,
            asset_id,
            source: find_column(headers, SOURCE_ALIASES),
            usage: find_column(headers, USAGE_ALIASES),
            transaction_header: headers[transaction_id].trim().to_string(),
            asset_header: headers[asset_id].trim().to_string(),
        };
        tracing::debug!(?schema, "resolved input schema");
        Ok(schema)
    }
}

fn missing(column: &'static str, headers: &[String]) -> SchemaError {
    SchemaError::MissingColumn {
        column,
        available: headers.iter().map(|h| h.trim().to_string()).collect(),
    }
}

/// Normalizes a header for matching: trimmed, lowercased, internal
/// whitespace runs collapsed to single spaces.
fn normalize(header: &str) -> String {
    header.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Spreadsheet exports pad ragged sheets with "Unnamed: N" headers.
fn is_filler(normalized: &str) -> bool {
    normalized.starts_with("unnamed:")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = normalize(header);
        !is_filler(&normalized) && aliases.contains(&normalized.as_str())
    })
}
