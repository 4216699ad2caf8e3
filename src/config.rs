//! Ledger configuration
//!
//! Configuration lives in a JSON file owned by the embedding
//! application. The core consumes `default_balance` and `tax_rate`;
//! the remaining fields steer the CLI adapter. Loading rewrites the
//! file with the effective values, so fields added in newer versions
//! show up on disk with their defaults after the first run.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunables for a ledger deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Config schema version, bumped when fields change meaning
    pub version: u32,

    /// Balance granted to an account on first access
    pub default_balance: i64,

    /// Fraction of a peer transfer withheld and burned (0.0 to 1.0)
    pub tax_rate: f32,

    /// Whether the balance ranking command is available
    pub enable_ranking: bool,

    /// Symbol prefixed to rendered balances
    pub currency_symbol: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            version: 1,
            default_balance: 0,
            tax_rate: 0.0,
            enable_ranking: true,
            currency_symbol: "$".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Loads the config at `path`, creating it with defaults first if
    /// it does not exist.
    ///
    /// An out-of-range `tax_rate` is clamped into `0.0..=1.0` with a
    /// warning. The sanitized config is written back so the on-disk
    /// file always reflects what is actually in effect.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the file cannot be read, parsed, or
    /// rewritten.
    pub fn load_or_init(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            let config = LedgerConfig::default();
            config.write(path)?;
            return Ok(config);
        }

        let text = fs::read_to_string(path)?;
        let mut config: LedgerConfig = serde_json::from_str(&text)
            .map_err(|cause| io::Error::new(io::ErrorKind::InvalidData, cause))?;

        let sanitized = sanitize_tax_rate(config.tax_rate);
        if sanitized != config.tax_rate {
            warn!(
                configured = config.tax_rate,
                effective = sanitized,
                "tax_rate outside 0.0..=1.0, clamping"
            );
            config.tax_rate = sanitized;
        }

        config.write(path)?;
        Ok(config)
    }

    fn write(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|cause| io::Error::new(io::ErrorKind::InvalidData, cause))?;
        fs::write(path, text)
    }
}

fn sanitize_tax_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
