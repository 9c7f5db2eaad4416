//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default allowed-source set for the usage aggregation.
const DEFAULT_SOURCES: &[&str] = &["Inmine: Daily Diesel Issues"];

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source values whose usage rows count toward session totals.
    pub sources: Vec<String>,
    /// Maximum accepted input rows; larger files are rejected outright.
    pub max_rows: usize,
    /// Row count above which the report is written row by row instead
    /// of materializing the full projected grid.
    pub stream_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(ToString::to_string).collect(),
            max_rows: 400_000,
            stream_threshold: 100_000,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Layering: defaults, then the platform config file, then the
    /// explicit `--config` file, then `POA_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("POA_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for poa.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("poa"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let config = Config::default();
        assert_eq!(config.sources, vec!["Inmine: Daily Diesel Issues"]);
    }

    #[test]
    fn test_default_limits() {
        let config = Config::default();
        assert_eq!(config.max_rows, 400_000);
        assert!(config.stream_threshold < config.max_rows);
    }
}
