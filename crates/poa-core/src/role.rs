//! Row role classification.

use serde::{Deserialize, Serialize};

/// Derived role of an event row.
///
/// Roles are disjoint: a row is never both a transaction and a proof
/// record. `Other` rows are ignored by every downstream stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Fuel dispense with a real transaction identifier.
    Transaction,
    /// Proof-of-activity record: no transaction id, but an asset id.
    Proof,
    /// Neither, e.g. a section header or an empty filler row.
    #[default]
    Other,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Proof => "proof",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn is_transaction(self) -> bool {
        matches!(self, Self::Transaction)
    }

    #[must_use]
    pub const fn is_proof(self) -> bool {
        matches!(self, Self::Proof)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a row from its trimmed transaction-id and asset-id cells.
///
/// A transaction id literally equal to the column's own header text is a
/// re-ingested header row, which counts as neither role.
#[must_use]
pub fn classify(
    transaction_id: Option<&str>,
    asset_id: Option<&str>,
    transaction_header: &str,
) -> Role {
    match transaction_id {
        Some(id) if id != transaction_header => Role::Transaction,
        Some(_) => Role::Other,
        None if asset_id.is_some() => Role::Proof,
        None => Role::Other,
    }
}
