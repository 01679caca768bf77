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
//! Server configuration: the loaded `.env` plus command line overrides.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use webadmin_config::{Config, ConfigLoader};
use webadmin_observability::{LogConfig, LogFormat, LogOutput};
use webadmin_tls::TlsPolicy;

/// Logging values given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOverrides<'a> {
    /// `--log-format`
    pub format: Option<&'a str>,
    /// `--log-level`
    pub level: Option<&'a str>,
    /// `--log-output`
    pub output: Option<&'a str>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// File the configuration was read from
    pub source: PathBuf,

    /// Parsed configuration
    pub config: Config,
}

impl ServerConfig {
    /// Load configuration from `path`, writing a default `.env` if it is missing
    pub async fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, &ConfigLoader::new()).await
    }

    /// Load configuration with a custom loader
    pub async fn load_with(path: &Path, loader: &ConfigLoader) -> Result<Self> {
        let config = loader
            .load_file(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        Ok(Self {
            source: path.to_path_buf(),
            config,
        })
    }

    /// Get the full bind address
    pub fn bind_addr(&self) -> String {
        self.config.web_admin.bind_addr()
    }

    /// TLS policy for the bootstrap
    pub fn tls_policy(&self) -> Result<TlsPolicy> {
        self.config
            .web_admin
            .tls_policy()
            .context("Invalid TLS settings")
    }

    /// Logging setup, with command line values taking precedence
    pub fn log_config(&self, cli: &LogOverrides<'_>) -> Result<LogConfig> {
        let logging = &self.config.logging;
        let format: LogFormat = cli
            .format
            .unwrap_or(&logging.format)
            .parse()
            .context("Invalid log format")?;
        let output: LogOutput = cli
            .output
            .unwrap_or(&logging.output)
            .parse()
            .context("Invalid log output")?;
        let level = cli.level.unwrap_or(&logging.level);

        let mut log_config = LogConfig::new()
            .with_format(format)
            .with_level(level)
            .with_output(output)
            .with_color(logging.color)
            .with_timestamps(logging.timestamps)
            .with_thread_ids(logging.thread_ids)
            .with_targets(logging.targets);
        if let Some(dir) = self.config.log_dir() {
            log_config = log_config.with_log_dir(dir);
        }
        Ok(log_config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use webadmin_config::ConfigFormat;

    fn from_env(content: &str) -> ServerConfig {
        let config = ConfigLoader::new()
            .ignore_process_env()
            .load_from_string(content, ConfigFormat::Env)
            .unwrap();
        ServerConfig {
            source: PathBuf::from(".env"),
            config,
        }
    }

    #[test]
    fn test_bind_addr_from_env() {
        let config = from_env("ADMIN_ADDRESS=0.0.0.0\nADMIN_PORT=9443\n");
        assert_eq!(config.bind_addr(), "0.0.0.0:9443");
    }

    #[test]
    fn test_cli_overrides_logging() {
        let config = from_env("ADMIN_LOG_LEVEL=warn\nADMIN_LOG_FORMAT=json\nADMIN_LOG_FILE=false\n");

        let from_file = config.log_config(&LogOverrides::default()).unwrap();
        assert_eq!(from_file.format, LogFormat::Json);
        assert_eq!(from_file.level.as_deref(), Some("warn"));
        assert!(from_file.log_dir.is_none());

        let overridden = config
            .log_config(&LogOverrides {
                format: Some("compact"),
                level: Some("debug"),
                output: None,
            })
            .unwrap();
        assert_eq!(overridden.format, LogFormat::Compact);
        assert_eq!(overridden.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_bad_cli_format_is_rejected() {
        let config = from_env("");
        let format = LogOverrides {
            format: Some("xml"),
            ..Default::default()
        };
        let output = LogOverrides {
            output: Some("syslog"),
            ..Default::default()
        };
        assert!(config.log_config(&format).is_err());
        assert!(config.log_config(&output).is_err());
    }

    #[test]
    fn test_log_dir_follows_admin_logs() {
        let config = from_env("ADMIN_LOGS=/var/log/webadmin\n");
        let log_config = config.log_config(&LogOverrides::default()).unwrap();
        assert_eq!(log_config.log_dir, Some(PathBuf::from("/var/log/webadmin")));
    }

    #[test]
    fn test_console_style_follows_env() {
        let config = from_env(
            "ADMIN_LOG_OUTPUT=stdout\nADMIN_LOG_COLOR=false\nADMIN_LOG_TIMESTAMPS=false\n\
             ADMIN_LOG_THREAD_IDS=true\nADMIN_LOG_TARGETS=false\n",
        );

        let log_config = config.log_config(&LogOverrides::default()).unwrap();
        assert_eq!(log_config.output, LogOutput::Stdout);
        assert!(!log_config.style.color);
        assert!(!log_config.style.timestamps);
        assert!(log_config.style.thread_ids);
        assert!(!log_config.style.targets);

        let stderr = LogOverrides {
            output: Some("stderr"),
            ..Default::default()
        };
        assert_eq!(config.log_config(&stderr).unwrap().output, LogOutput::Stderr);
    }

    #[test]
    fn test_console_style_defaults() {
        let log_config = from_env("").log_config(&LogOverrides::default()).unwrap();
        assert_eq!(log_config.output, LogOutput::Stderr);
        assert_eq!(log_config.style, webadmin_observability::ConsoleStyle::default());
    }

    #[test]
    fn test_tls_policy_follows_env() {
        let config = from_env("ADMIN_SSL_USE=true\nADMIN_SSL_VERIFY=yes\nADMIN_CONFIG_DIR=/srv/certs\n");
        let policy = config.tls_policy().unwrap();
        assert!(policy.ssl_enabled);
        assert!(policy.strict_verify);
    }
}
