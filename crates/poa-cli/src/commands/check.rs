//! Implementation of the `poa check` command.
//!
//! Resolves the input schema and prints row/role counts without
//! producing a report. Useful for verifying an export before a run.

use std::path::Path;

use anyhow::{Context, Result, bail};
use poa_core::ReviewTable;

use crate::csv;

/// Run the check command.
pub fn run(input: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input file: {}", input.display()))?;

    let mut records = csv::parse(&text);
    if records.is_empty() {
        bail!("input file has no header row: {}", input.display());
    }
    let headers = records.remove(0);
    let table = ReviewTable::from_grid(headers, records)?;

    let schema = table.schema();
    let header = |index: usize| table.headers()[index].trim();

    println!("schema");
    println!("  date & time     {}", header(schema.timestamp));
    println!("  transaction id  {}", header(schema.transaction_id));
    println!("  asset number    {}", header(schema.asset_id));
    println!(
        "  source          {}",
        schema.source.map_or("(absent)", header)
    );
    println!(
        "  usage           {}",
        schema.usage.map_or("(absent)", header)
    );

    let transactions = table.roles().iter().filter(|r| r.is_transaction()).count();
    let proofs = table.roles().iter().filter(|r| r.is_proof()).count();
    println!();
    println!("rows");
    println!("  total           {}", table.len());
    println!("  transactions    {transactions}");
    println!("  proof records   {proofs}");
    println!("  other           {}", table.len() - transactions - proofs);

    Ok(())
}
