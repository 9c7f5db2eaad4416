//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Proof-of-activity review tool.
///
/// Reconciles fuel-dispense transactions with proof-of-activity records
/// from a per-asset event log and produces a compliance review report.
#[derive(Debug, Parser)]
#[command(name = "poa", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the review over a CSV event log and write the report.
    Review {
        /// Input CSV file.
        input: PathBuf,

        /// Output path; defaults to `<input stem>_review.csv` next to
        /// the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Allowed source for usage totals; repeat for several.
        /// Overrides the configured list.
        #[arg(long = "source")]
        sources: Vec<String>,

        /// Use the fixed default report column list instead of the
        /// input file's column order.
        #[arg(long)]
        fixed_columns: bool,

        /// Write the report as JSON lines on stdout (columns first,
        /// then one object per row with its renderer decorations)
        /// instead of a CSV file.
        #[arg(long)]
        json: bool,
    },

    /// Resolve the input schema and report row/role counts without
    /// producing a report.
    Check {
        /// Input CSV file.
        input: PathBuf,
    },
}
