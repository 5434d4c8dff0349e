use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::logger::{self, LogTag};

/// Tracker configuration
///
/// All fields have working defaults; a config file only needs the keys it
/// wants to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Dust threshold: a lot whose remaining quantity falls at or below this
    /// value counts as fully consumed and is removed from its queue.
    pub quantity_epsilon: f64,

    /// Emit a warning when the single-wallet entry point receives trades
    /// spanning more than one wallet address without a wallet filter.
    pub warn_on_mixed_wallets: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            quantity_epsilon: 1e-9,
            warn_on_mixed_wallets: true,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TrackerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;

        logger::info(
            LogTag::Config,
            &format!("Loaded tracker config from {}", path.display()),
        );

        Ok(config)
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<()> {
        if !self.quantity_epsilon.is_finite() || self.quantity_epsilon < 0.0 {
            anyhow::bail!(
                "quantity_epsilon must be a non-negative finite number, got {}",
                self.quantity_epsilon
            );
        }
        if self.quantity_epsilon >= 1.0 {
            anyhow::bail!(
                "quantity_epsilon {} is too large to be a dust threshold",
                self.quantity_epsilon
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.warn_on_mixed_wallets);
    }

    #[test]
    fn loads_partial_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "quantity_epsilon = 0.0001").expect("write config");

        let config = TrackerConfig::load_from_file(file.path()).expect("load config");
        assert_eq!(config.quantity_epsilon, 0.0001);
        // Unspecified keys keep their defaults
        assert!(config.warn_on_mixed_wallets);
    }

    #[test]
    fn rejects_invalid_epsilon() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "quantity_epsilon = -1.0").expect("write config");

        assert!(TrackerConfig::load_from_file(file.path()).is_err());
    }
}
