//! Implementation of the `poa review` command.
//!
//! Reads a CSV event log, runs the review engine, and writes the
//! projected report. Output is either a CSV file or, with `--json`, a
//! JSON-lines stream on stdout that also carries the per-row renderer
//! decorations.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use poa_core::{Projection, Review, ReviewTable};

use crate::config::Config;
use crate::csv;

/// Options for one review run.
#[derive(Debug)]
pub struct Options {
    /// Output path; derived from the input when absent.
    pub output: Option<PathBuf>,
    /// Allowed-source override; empty means use the configured list.
    pub sources: Vec<String>,
    /// Use the fixed default column list instead of the input order.
    pub fixed_columns: bool,
    /// Emit JSON lines on stdout instead of a CSV file.
    pub json: bool,
}

/// Run the review command.
pub fn run(input: &Path, options: &Options, config: &Config) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input file: {}", input.display()))?;

    let mut records = csv::parse(&text);
    if records.is_empty() {
        bail!("input file has no header row: {}", input.display());
    }
    let headers = records.remove(0);
    let rows = records;

    if rows.len() > config.max_rows {
        bail!(
            "input has {} rows, maximum {} supported; split the file (e.g. by month) and review each part",
            rows.len(),
            config.max_rows
        );
    }

    let table = ReviewTable::from_grid(headers.clone(), rows)?;
    let transactions = table.roles().iter().filter(|r| r.is_transaction()).count();
    let proofs = table.roles().iter().filter(|r| r.is_proof()).count();

    let sources = if options.sources.is_empty() {
        &config.sources
    } else {
        &options.sources
    };
    tracing::debug!(?sources, transactions, proofs, "running review");

    let review = Review::run(table, sources);
    let columns = if options.fixed_columns {
        None
    } else {
        Some(headers.as_slice())
    };
    let projection = Projection::new(&review, columns);

    if options.json {
        write_json(&projection)?;
    } else {
        let output = options
            .output
            .clone()
            .unwrap_or_else(|| derive_output_path(input));
        write_csv(&projection, &output, config.stream_threshold)?;
        println!(
            "review written to {} ({} rows, {transactions} transactions, {proofs} proof records)",
            output.display(),
            projection.len()
        );
    }

    Ok(())
}

/// `input.csv` -> `input_review.csv`, next to the input.
fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("review");
    input.with_file_name(format!("{stem}_review.csv"))
}

fn write_csv(projection: &Projection<'_>, output: &Path, stream_threshold: usize) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    csv::write_record(&mut writer, projection.columns()).context("failed to write header")?;

    if projection.len() > stream_threshold {
        // Large batch: project and write one row at a time instead of
        // materializing the full report.
        tracing::debug!(rows = projection.len(), "streaming report rows");
        for row in 0..projection.len() {
            csv::write_record(&mut writer, &projection.row(row).cells)
                .with_context(|| format!("failed to write row {row}"))?;
        }
    } else {
        for row in projection.rows() {
            csv::write_record(&mut writer, &row.cells).context("failed to write row")?;
        }
    }

    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn write_json(projection: &Projection<'_>) -> Result<()> {
    let stdout = stdout();
    let mut writer = BufWriter::new(stdout.lock());

    serde_json::to_writer(
        &mut writer,
        &serde_json::json!({ "columns": projection.columns() }),
    )
    .context("failed to serialize columns")?;
    writeln!(writer)?;

    for row in 0..projection.len() {
        // Handle broken pipe gracefully (e.g., when piped to `head`)
        if let Err(err) = serde_json::to_writer(&mut writer, &projection.row(row)) {
            if err.io_error_kind() == Some(ErrorKind::BrokenPipe) {
                break;
            }
            return Err(err).context("failed to serialize row");
        }
        if writeln!(writer).is_err() {
            break;
        }
    }

    writer.flush().ok();
    Ok(())
}
