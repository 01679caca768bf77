// Copyright (C) 2026  Sandstorm Web Admin Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Logging settings.
//!
//! One [`LogConfig`] describes the console stream and, optionally, the
//! directory that receives a plain-text copy of every event. The server
//! fills it from the `ADMIN_LOG_*` keys and its command line.

use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Logging setup failures
#[derive(Error, Debug)]
pub enum LogError {
    /// Unknown console layout name
    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    /// Unknown console stream name
    #[error("Invalid log output: {0}")]
    InvalidLogOutput(String),

    /// Log directory or file could not be opened
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Bad filter directives or a subscriber already installed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Console event layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, for a terminal
    #[default]
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LogError::InvalidLogFormat(format!(
                "'{s}', expected pretty, compact or json"
            ))),
        }
    }
}

/// Console stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// Standard error
    #[default]
    Stderr,
    /// Standard output
    Stdout,
}

impl FromStr for LogOutput {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stderr" => Ok(LogOutput::Stderr),
            "stdout" => Ok(LogOutput::Stdout),
            _ => Err(LogError::InvalidLogOutput(format!(
                "'{s}', expected stderr or stdout"
            ))),
        }
    }
}

/// What the console layer prints around each message. The log file
/// ignores these and is always plain, timestamped and targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleStyle {
    /// ANSI colors, ignored by the JSON layout
    pub color: bool,
    /// Event timestamps
    pub timestamps: bool,
    /// Thread ids
    pub thread_ids: bool,
    /// Module path of each event
    pub targets: bool,
}

impl Default for ConsoleStyle {
    fn default() -> Self {
        ConsoleStyle {
            color: true,
            timestamps: true,
            thread_ids: false,
            targets: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Console layout
    pub format: LogFormat,

    /// Filter directives; `None` falls back to `RUST_LOG`, then `info`
    pub level: Option<String>,

    /// Console stream
    pub output: LogOutput,

    /// Console decorations
    pub style: ConsoleStyle,

    /// Directory for the `YYYY_MM_DDTHH_MM_SS.log` copy, `None` for console only
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    /// Pretty console on stderr, no file
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the console layout
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directives
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Set the console stream
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Enable or disable ANSI colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.style.color = color;
        self
    }

    /// Enable or disable timestamps
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.style.timestamps = timestamps;
        self
    }

    /// Enable or disable thread ids
    pub fn with_thread_ids(mut self, thread_ids: bool) -> Self {
        self.style.thread_ids = thread_ids;
        self
    }

    /// Enable or disable event targets
    pub fn with_targets(mut self, targets: bool) -> Self {
        self.style.targets = targets;
        self
    }

    /// Also write events to a file in `dir`
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Filter directives actually installed
    pub fn get_effective_level(&self) -> String {
        self.level
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!(matches!("text".parse::<LogFormat>(), Err(LogError::InvalidLogFormat(_))));
    }

    #[test]
    fn test_log_output_parsing() {
        assert_eq!("stderr".parse::<LogOutput>().unwrap(), LogOutput::Stderr);
        assert_eq!("STDOUT".parse::<LogOutput>().unwrap(), LogOutput::Stdout);
        assert!(matches!("syslog".parse::<LogOutput>(), Err(LogError::InvalidLogOutput(_))));
    }

    #[test]
    fn test_style_setters_touch_only_their_flag() {
        let config = LogConfig::new().with_thread_ids(true);
        assert_eq!(
            config.style,
            ConsoleStyle {
                thread_ids: true,
                ..ConsoleStyle::default()
            }
        );

        let config = LogConfig::new().with_color(false).with_targets(false);
        assert!(!config.style.color);
        assert!(!config.style.targets);
        assert!(config.style.timestamps);
    }

    #[test]
    fn test_explicit_level_wins() {
        let config = LogConfig::new().with_level("webadmin_tls=debug,warn");
        assert_eq!(config.get_effective_level(), "webadmin_tls=debug,warn");
    }

    #[test]
    fn test_console_only_by_default() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.log_dir, None);
    }
}
