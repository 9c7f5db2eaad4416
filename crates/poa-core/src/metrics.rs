//! Per-session metrics: proof counts, activity gaps, usage totals.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::table::ReviewTable;

/// Seconds per hour, for gap conversion.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Counts proof rows per session label and projects the count onto
/// every transaction row sharing the label.
///
/// Transactions whose label has no proof rows get `Some(0)`, never
/// null; non-transaction rows get `None`. Pure function of labels and
/// roles, no ordering dependency.
#[must_use]
pub fn proof_counts(table: &ReviewTable, labels: &[Option<String>]) -> Vec<Option<u32>> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for row in 0..table.len() {
        if table.role(row).is_proof() {
            if let Some(label) = labels[row].as_deref() {
                *counts.entry(label).or_insert(0) += 1;
            }
        }
    }

    (0..table.len())
        .map(|row| {
            if table.role(row).is_transaction() {
                let count = labels[row]
                    .as_deref()
                    .and_then(|label| counts.get(label).copied())
                    .unwrap_or(0);
                Some(count)
            } else {
                None
            }
        })
        .collect()
}

/// Hours elapsed since the most recent proof record for the row's
/// asset, for every transaction-or-proof row.
///
/// A forward scan per asset carries the last proof timestamp; a proof
/// row fills itself first, so its own gap is always 0. Rows before the
/// asset's first proof, and rows without a usable timestamp, are null.
#[must_use]
pub fn activity_gaps(table: &ReviewTable) -> Vec<Option<f64>> {
    let mut last_proof: HashMap<&str, NaiveDateTime> = HashMap::new();

    (0..table.len())
        .map(|row| {
            let role = table.role(row);
            if !role.is_transaction() && !role.is_proof() {
                return None;
            }
            let record = table.record(row);
            let asset = record.asset_id.as_deref()?;

            if role.is_proof() {
                if let Some(ts) = record.timestamp {
                    last_proof.insert(asset, ts);
                }
            }

            let ts = record.timestamp?;
            let last = last_proof.get(asset)?;
            #[expect(
                clippy::cast_precision_loss,
                reason = "gap durations are far below f64's exact integer range"
            )]
            let seconds = (ts - *last).num_seconds() as f64;
            Some(seconds / SECONDS_PER_HOUR)
        })
        .collect()
}

/// Sums the usage metric per session label over rows whose source is in
/// the allowed set, and projects the sum onto transaction rows.
///
/// Null usage values count as 0; transactions whose label has no
/// matching usage get `Some(0.0)`.
#[must_use]
pub fn usage_totals(
    table: &ReviewTable,
    labels: &[Option<String>],
    sources: &[String],
) -> Vec<Option<f64>> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for row in 0..table.len() {
        let record = table.record(row);
        let allowed = record
            .source
            .as_deref()
            .is_some_and(|source| sources.iter().any(|s| s == source));
        if !allowed {
            continue;
        }
        if let Some(label) = labels[row].as_deref() {
            *totals.entry(label).or_insert(0.0) += record.usage_amount.unwrap_or(0.0);
        }
    }
    tracing::debug!(labels = totals.len(), "summed usage per session");

    (0..table.len())
        .map(|row| {
            if table.role(row).is_transaction() {
                let total = labels[row]
                    .as_deref()
                    .and_then(|label| totals.get(label).copied())
                    .unwrap_or(0.0);
                Some(total)
            } else {
                None
            }
        })
        .collect()
}
