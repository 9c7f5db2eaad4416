//! Core review engine for proof-of-activity compliance.
//!
//! This crate reconciles two interleaved event streams recorded in one
//! per-asset log — fuel-dispense transactions and proof-of-activity
//! records — to determine refund-eligibility compliance:
//! - Session labeling: partitioning each asset's transactions with a
//!   one-hour gap rule and linking proof records to the session that
//!   follows them
//! - Per-session metrics: proof counts, time since last activity,
//!   usage sums filtered by source
//! - Compliance flags and the final report projection
//!
//! The engine is synchronous and batch-oriented: one input table in,
//! one augmented table out. It performs no I/O; sourcing rows and
//! rendering the report belong to the boundary.

pub mod compliance;
pub mod label;
pub mod metrics;
pub mod record;
pub mod report;
pub mod review;
pub mod role;
pub mod schema;
pub mod table;

pub use compliance::NO_PROOF_ASSET_TEXT;
pub use record::EventRecord;
pub use report::{COMPUTED_COLUMNS, DEFAULT_COLUMNS, Projection, ReportRow, RowDecorations};
pub use review::Review;
pub use role::Role;
pub use schema::{Schema, SchemaError};
pub use table::ReviewTable;
