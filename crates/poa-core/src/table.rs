//! The in-memory event table.
//!
//! One batch run operates on exactly one [`ReviewTable`]: the raw
//! row-column grid plus the per-row [`EventRecord`]s and [`Role`]s
//! derived from it. The grid is never mutated after construction;
//! every pipeline stage returns its results as a separate column.

use std::collections::HashMap;

use crate::record::{EventRecord, normalize_cell, parse_timestamp, parse_usage};
use crate::role::{Role, classify};
use crate::schema::{Schema, SchemaError};

/// Raw event table with derived per-row records and roles.
#[derive(Debug, Clone)]
pub struct ReviewTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    schema: Schema,
    records: Vec<EventRecord>,
    roles: Vec<Role>,
    /// Header name -> column index, for projection lookups.
    header_index: HashMap<String, usize>,
}

impl ReviewTable {
    /// Builds the table from a header row and raw data rows.
    ///
    /// Resolves the schema (the only fatal error), then parses each row
    /// once. Rows shorter than the header are padded with empty cells;
    /// all value coercion failures become nulls.
    pub fn from_grid(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, SchemaError> {
        let schema = Schema::resolve(&headers)?;

        let records: Vec<EventRecord> = rows.iter().map(|row| parse_row(row, &schema)).collect();
        let roles: Vec<Role> = records
            .iter()
            .map(|record| {
                classify(
                    record.transaction_id.as_deref(),
                    record.asset_id.as_deref(),
                    &schema.transaction_header,
                )
            })
            .collect();

        let header_index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();

        tracing::debug!(
            rows = rows.len(),
            transactions = roles.iter().filter(|r| r.is_transaction()).count(),
            proofs = roles.iter().filter(|r| r.is_proof()).count(),
            "built review table"
        );

        Ok(Self {
            headers,
            rows,
            schema,
            records,
            roles,
            header_index,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[must_use]
    pub fn record(&self, row: usize) -> &EventRecord {
        &self.records[row]
    }

    #[must_use]
    pub fn role(&self, row: usize) -> Role {
        self.roles[row]
    }

    /// Raw cell by header name, empty string when the column or cell is
    /// absent.
    #[must_use]
    pub fn cell(&self, row: usize, header: &str) -> &str {
        self.header_index
            .get(header)
            .and_then(|&col| self.rows.get(row).and_then(|r| r.get(col)))
            .map_or("", String::as_str)
    }
}

fn parse_row(row: &[String], schema: &Schema) -> EventRecord {
    let cell = |index: usize| row.get(index).map_or("", String::as_str);

    EventRecord {
        asset_id: normalize_cell(cell(schema.asset_id)).map(String::from),
        timestamp: parse_timestamp(cell(schema.timestamp)),
        transaction_id: normalize_cell(cell(schema.transaction_id)).map(String::from),
        usage_amount: schema.usage.and_then(|i| parse_usage(cell(i))),
        source: schema
            .source
            .and_then(|i| normalize_cell(cell(i)))
            .map(String::from),
    }
}
