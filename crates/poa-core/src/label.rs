//! Session labeling.
//!
//! Transactions for one asset that occur in quick succession are one
//! dispensing session; proof records support the session that follows
//! them. Labels `"{asset}-{n}"` are the join key between the two.
//!
//! The inter-transaction gap is measured between consecutive
//! transaction rows in file order across all assets, matching the
//! source system's behavior. Session numbering is scoped per asset.

use std::collections::HashMap;

use chrono::Duration;

use crate::table::ReviewTable;

/// Assigns a session label to every transaction and proof row.
///
/// Transactions get `"{asset_id}-{sequence}"` where `sequence` is the
/// asset's 1-based running count of session starts. Proof rows inherit
/// the label of the nearest following transaction for the same asset;
/// a proof with no later transaction stays unlabeled. `Other` rows and
/// transactions without an asset id are always `None`.
#[must_use]
pub fn label_sessions(table: &ReviewTable) -> Vec<Option<String>> {
    let mut labels: Vec<Option<String>> = vec![None; table.len()];
    let session_gap = Duration::hours(1);

    // Pass 1: label transactions. A transaction continues the current
    // session only when the gap to the previous transaction row is
    // strictly inside (0, 1h); zero, negative, missing, or >= 1h gaps
    // all start a new session. The first transaction an asset ever has
    // always starts its session 1, keeping labels 1-based.
    let mut previous_ts = None;
    let mut sequence_by_asset: HashMap<String, u32> = HashMap::new();

    for row in 0..table.len() {
        if !table.role(row).is_transaction() {
            continue;
        }
        let record = table.record(row);

        let continues = match (previous_ts, record.timestamp) {
            (Some(prev), Some(ts)) => {
                let delta = ts - prev;
                delta > Duration::zero() && delta < session_gap
            }
            _ => false,
        };
        previous_ts = record.timestamp;

        let Some(asset) = record.asset_id.as_deref() else {
            tracing::debug!(row, "transaction without asset id, left unlabeled");
            continue;
        };

        let sequence = sequence_by_asset.entry(asset.to_string()).or_insert(0);
        if !continues || *sequence == 0 {
            *sequence += 1;
        }
        labels[row] = Some(format!("{asset}-{sequence}"));
    }

    // Pass 2: backward-fill onto proof rows, partitioned by asset. A
    // reverse scan carries each asset's next transaction label down to
    // the proof rows that precede it.
    let mut carried: HashMap<&str, &str> = HashMap::new();
    let mut filled: Vec<(usize, String)> = Vec::new();

    for row in (0..table.len()).rev() {
        let role = table.role(row);
        let Some(asset) = table.record(row).asset_id.as_deref() else {
            continue;
        };
        if role.is_transaction() {
            if let Some(label) = labels[row].as_deref() {
                carried.insert(asset, label);
            }
        } else if role.is_proof() {
            if let Some(label) = carried.get(asset) {
                filled.push((row, (*label).to_string()));
            }
        }
    }
    for (row, label) in filled {
        labels[row] = Some(label);
    }

    labels
}
