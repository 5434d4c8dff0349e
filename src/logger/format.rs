//! Log formatting and output with ANSI colors
//!
//! Produces the aligned `[time] [TAG] [LEVEL] message` console line. Output
//! goes to stdout; broken pipes (piped consumers going away) are swallowed
//! instead of panicking.

use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let time = Local::now().format("%H:%M:%S").to_string();

    let line = format!(
        "{} [{}] [{}] {}",
        time.dimmed(),
        format_tag(&tag),
        format_level(level),
        message
    );

    print_stdout_safe(&line);
}

/// Format a tag with appropriate color
fn format_tag(tag: &LogTag) -> ColoredString {
    let padded = format!("{:<width$}", tag.as_str(), width = TAG_WIDTH);
    match tag {
        LogTag::Tracker => padded.bright_green().bold(),
        LogTag::Fifo => padded.bright_cyan().bold(),
        LogTag::Wallets => padded.bright_magenta().bold(),
        LogTag::Validator => padded.bright_yellow().bold(),
        LogTag::Config => padded.bright_blue().bold(),
    }
}

/// Format a level with appropriate color
fn format_level(level: LogLevel) -> ColoredString {
    let padded = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => padded.bright_red().bold(),
        LogLevel::Warning => padded.bright_yellow(),
        LogLevel::Info => padded.normal(),
        LogLevel::Debug => padded.dimmed(),
        LogLevel::Verbose => padded.dimmed(),
    }
}

/// Write a line to stdout, ignoring broken pipes
fn print_stdout_safe(line: &str) {
    let mut out = stdout();
    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() != ErrorKind::BrokenPipe {
            // Nothing sensible left to do if stdout itself is failing
        }
    }
}
