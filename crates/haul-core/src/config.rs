//! Report and import configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/haul/config/haul.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Fuel item numbers and the reward rate are fixed by the merchant's
//! catalog and are not read from this file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ingest::BatchPolicy;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/haul.toml");

/// Row limits for the ranked report views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLimits {
    /// Most expensive / top spend / most purchased tables
    pub top_items: usize,
    /// Price increase / price drop tables
    pub price_changes: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            top_items: 10,
            price_changes: 50,
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub reports: ReportLimits,
    pub batch_policy: BatchPolicy,
}

impl Config {
    /// Load from an explicit path if given, else the user override, else
    /// the embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => read_config(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };
        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("haul").join("config").join("haul.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!("Reading config from {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        Error::InvalidData(format!("Failed to read config {}: {}", path.display(), e))
    })
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    reports: Option<RawReports>,
    import: Option<RawImport>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    top_items: Option<usize>,
    price_changes: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    strict: Option<bool>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(reports) = raw.reports {
        if let Some(top_items) = reports.top_items {
            config.reports.top_items = top_items;
        }
        if let Some(price_changes) = reports.price_changes {
            config.reports.price_changes = price_changes;
        }
    }

    if let Some(import) = raw.import {
        if let Some(strict) = import.strict {
            config.batch_policy = if strict {
                BatchPolicy::FailFast
            } else {
                BatchPolicy::SkipInvalid
            };
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reports.top_items, 10);
        assert_eq!(config.reports.price_changes, 50);
        assert_eq!(config.batch_policy, BatchPolicy::SkipInvalid);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[reports]\ntop_items = 5\n").unwrap();
        assert_eq!(config.reports.top_items, 5);
        assert_eq!(config.reports.price_changes, 50);
    }

    #[test]
    fn test_strict_import() {
        let config = parse_config("[import]\nstrict = true\n").unwrap();
        assert_eq!(config.batch_policy, BatchPolicy::FailFast);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[reports]\ntop_items = \"many\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reports]\nprice_changes = 7").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.reports.price_changes, 7);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
