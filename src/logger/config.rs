/// Logger configuration held in global lazily-initialized state
///
/// The host application can raise or lower the threshold at runtime
/// (`set_logger_config`) without touching the tracker's call sites.

use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level threshold; messages above it are dropped (errors always pass)
    pub min_level: LogLevel,
    /// Tags with debug output enabled (debug keys, e.g. "fifo")
    pub debug_tags: HashSet<String>,
    /// If non-empty, only these tags are logged at all
    pub enabled_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|config| config.clone())
        .unwrap_or_default()
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

/// Apply a mutation to the logger configuration in place
pub fn update_logger_config(updater: impl FnOnce(&mut LoggerConfig)) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        updater(&mut current);
    }
}

/// Whether debug output is enabled for a tag
pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.min_level >= LogLevel::Debug || config.debug_tags.contains(&tag.to_debug_key())
}
