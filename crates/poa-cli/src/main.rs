use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use poa_cli::commands::{check, review};
use poa_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Review {
            input,
            output,
            sources,
            fixed_columns,
            json,
        }) => {
            let config = Config::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            let options = review::Options {
                output: output.clone(),
                sources: sources.clone(),
                fixed_columns: *fixed_columns,
                json: *json,
            };
            review::run(input, &options, &config)?;
        }
        Some(Commands::Check { input }) => {
            check::run(input)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
