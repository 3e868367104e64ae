//! Configuration types for an ecoledger instance.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result, constants};

/// Top-level ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Cost charged to the meter for every processed credit entry.
    pub gas_cost_per_entry: u64,
    /// Log output configuration.
    pub logging: LoggingConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gas_cost_per_entry: constants::DEFAULT_GAS_COST_PER_ENTRY,
            logging: LoggingConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`LedgerError::Configuration`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LedgerError::Configuration(e.to_string()))
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info"` or
    /// `"ecoledger_protocol=debug"`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: constants::DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Pretty,
        }
    }
}
