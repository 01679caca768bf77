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
//! Logging initialization and setup.
//!
//! This module provides functions to initialize the tracing system with
//! different configurations and output formats, optionally mirroring every
//! event into a timestamped log file.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Initialize tracing with the specified format and optional log level.
///
/// This is a convenience function that uses default configuration except
/// for the format and log level.
///
/// # Example
///
/// ```ignore
/// use webadmin_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Pretty, Some("debug")).unwrap();
/// tracing::info!("Application started");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let config = LogConfig::new()
        .with_format(format)
        .with_level(level.unwrap_or("info"));
    init_tracing_with_config(config).map(|_| ())
}

/// Initialize tracing with a detailed configuration.
///
/// Returns the path of the log file when `config.log_dir` is set.
///
/// # Example
///
/// ```ignore
/// use webadmin_observability::{init_tracing_with_config, LogConfig, LogFormat};
///
/// let config = LogConfig::new()
///     .with_format(LogFormat::Json)
///     .with_level("debug")
///     .with_log_dir("./logs");
///
/// let log_file = init_tracing_with_config(config).unwrap();
/// tracing::info!(?log_file, "Application started");
/// ```
pub fn init_tracing_with_config(config: LogConfig) -> Result<Option<PathBuf>, LogError> {
    let filter = build_env_filter(&config)?;
    let mut layers: Vec<BoxedLayer> = vec![console_layer(&config)];

    let log_file = match &config.log_dir {
        Some(dir) => {
            let (file, path) = open_log_file(dir, &Local::now())?;
            layers.push(file_layer(file));
            Some(path)
        }
        None => None,
    };

    Registry::default()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| LogError::ConfigError(format!("Failed to install subscriber: {}", e)))?;

    Ok(log_file)
}

/// Log file name for a start time, `YYYY_MM_DDTHH_MM_SS.log`
pub fn log_file_name<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%Y_%m_%dT%H_%M_%S.log").to_string()
}

/// Create `dir` if needed and open the log file for `timestamp` for appending
pub fn open_log_file<Tz>(dir: &Path, timestamp: &DateTime<Tz>) -> Result<(File, PathBuf), LogError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(timestamp));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

fn console_layer(config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(get_writer(&config.output))
        .with_target(config.style.targets)
        .with_thread_ids(config.style.thread_ids);

    match config.format {
        LogFormat::Pretty => {
            let layer = layer
                .with_thread_names(true)
                .with_span_events(FmtSpan::ACTIVE)
                .with_ansi(config.style.color)
                .pretty();
            if config.style.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Compact => {
            let layer = layer
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(config.style.color)
                .compact();
            if config.style.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Json => {
            let layer = layer.with_thread_names(true).with_span_events(FmtSpan::FULL).json();
            if config.style.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// Plain text, no colors, always timestamped
fn file_layer(file: File) -> BoxedLayer {
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .boxed()
}

/// Get the writer for the specified output
fn get_writer(output: &LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

/// Build an environment filter for the given configuration
fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let level_str = config.get_effective_level();

    EnvFilter::try_new(&level_str).map_err(|e| {
        LogError::ConfigError(format!("Failed to parse log filter '{}': {}", level_str, e))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    // Installing the global subscriber is covered by the integration tests;
    // it can only happen once per process.

    #[test]
    fn test_env_filter_parsing() {
        let result = build_env_filter(&LogConfig::new().with_level("debug"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_filter_directives() {
        let result = build_env_filter(&LogConfig::new().with_level("webadmin_tls=trace,info"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_log_file_name() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(log_file_name(&timestamp), "2024_03_07T09_05_01.log");
    }

    #[test]
    fn test_open_log_file_creates_dir() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        let timestamp = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();

        let (_file, path) = open_log_file(&logs, &timestamp).unwrap();

        assert_eq!(path, logs.join("2024_12_31T23_59_59.log"));
        assert!(path.is_file());
    }

    #[test]
    fn test_open_log_file_appends() {
        use std::io::Write;

        let dir = TempDir::new().unwrap();
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let (mut file, path) = open_log_file(dir.path(), &timestamp).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);
        let (mut file, _) = open_log_file(dir.path(), &timestamp).unwrap();
        writeln!(file, "second").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }
}
