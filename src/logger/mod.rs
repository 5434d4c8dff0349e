//! Structured logging for the position tracker
//!
//! Provides a clean, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-subsystem tags with per-tag debug control
//! - Colored, aligned console output
//!
//! ## Usage
//!
//! ```rust
//! use positiontracker::logger::{self, LogTag};
//!
//! logger::info(LogTag::Tracker, "Calculation started");
//! logger::warning(LogTag::Fifo, "Oversold inventory detected");
//! logger::debug(LogTag::Fifo, "Consumed lot ...");
//! ```
//!
//! The default configuration (Info threshold, all tags) works without any
//! initialization. Hosts that want debug output for a subsystem enable it
//! through `update_logger_config`.

mod config;
mod core;
mod format;
mod levels;
mod tags;

// Re-export public types
pub use config::{
    get_logger_config, is_debug_enabled_for_tag, set_logger_config, update_logger_config,
    LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics, gated per tag)
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
