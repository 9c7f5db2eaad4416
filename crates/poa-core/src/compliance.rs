//! Compliance flag derivations.

use std::collections::HashSet;

use crate::table::ReviewTable;

/// Text attached to every row of an asset with no proof records.
pub const NO_PROOF_ASSET_TEXT: &str = "No Proof of Use Asset";

/// Flags every row of an asset that never appears among proof records.
///
/// Rows with a null asset id, or whose asset cell is a re-ingested
/// header, are never flagged. The flag applies to all roles, not just
/// transactions: the whole asset is non-compliant.
#[must_use]
pub fn no_proof_asset_flags(table: &ReviewTable) -> Vec<bool> {
    let proof_assets: HashSet<&str> = (0..table.len())
        .filter(|&row| table.role(row).is_proof())
        .filter_map(|row| table.record(row).asset_id.as_deref())
        .collect();

    let asset_header = table.schema().asset_header.as_str();
    (0..table.len())
        .map(|row| {
            table.record(row).asset_id.as_deref().is_some_and(|asset| {
                asset != asset_header && !proof_assets.contains(asset)
            })
        })
        .collect()
}

/// Flags transaction rows dispensed without any supporting proof.
///
/// True exactly when the row's projected proof count is zero.
#[must_use]
pub fn dispense_without_proof_flags(
    table: &ReviewTable,
    proof_counts: &[Option<u32>],
) -> Vec<bool> {
    (0..table.len())
        .map(|row| table.role(row).is_transaction() && proof_counts[row] == Some(0))
        .collect()
}
