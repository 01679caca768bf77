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
//! Configuration schema.
//!
//! Defaults mirror a fresh installation: the admin listens on loopback
//! without TLS and keeps certificates in `./config` and logs in `./logs`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use webadmin_tls::{EcdsaCurve, TlsPolicy};

use crate::error::{ConfigError, ConfigResult};

/// Complete web admin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Listener, credentials and TLS settings
    #[serde(default)]
    pub web_admin: WebAdminConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web admin listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebAdminConfig {
    /// Bind address
    #[serde(default = "default_address")]
    pub address: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Admin password
    #[serde(default)]
    pub password: String,

    /// Serve HTTPS
    #[serde(default)]
    pub ssl_use: bool,

    /// Missing or invalid certificates are fatal instead of regenerated
    #[serde(default)]
    pub ssl_verify: bool,

    /// Certificate path, empty for the default location
    #[serde(default)]
    pub ssl_cert: String,

    /// Private key path, empty for the default location
    #[serde(default)]
    pub ssl_key: String,

    /// Curve for generated keys (P256, P384, P521)
    #[serde(default = "default_curve")]
    pub ssl_curve: String,

    /// Apply admin updates automatically
    #[serde(default = "default_true")]
    pub automatic_updates: bool,

    /// Installation directory
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Directory holding certificates
    #[serde(default = "default_config_dir")]
    pub config_dir: String,

    /// Log file directory
    #[serde(default = "default_logs")]
    pub logs: String,
}

impl Default for WebAdminConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            password: String::new(),
            ssl_use: false,
            ssl_verify: false,
            ssl_cert: String::new(),
            ssl_key: String::new(),
            ssl_curve: default_curve(),
            automatic_updates: true,
            dir: default_dir(),
            config_dir: default_config_dir(),
            logs: default_logs(),
        }
    }
}

impl WebAdminConfig {
    /// `address:port` for the listener
    pub fn bind_addr(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }

    /// Parsed key curve
    pub fn curve(&self) -> ConfigResult<EcdsaCurve> {
        self.ssl_curve
            .parse()
            .map_err(|e: webadmin_tls::UnknownCurve| {
                ConfigError::invalid_value("web_admin.ssl_curve", e.to_string())
            })
    }

    /// TLS policy for the bootstrap
    pub fn tls_policy(&self) -> ConfigResult<TlsPolicy> {
        let mut policy = TlsPolicy::enabled(&self.config_dir)
            .strict(self.ssl_verify)
            .with_cert_path(&self.ssl_cert)
            .with_key_path(&self.ssl_key)
            .with_curve(self.curve()?);
        policy.ssl_enabled = self.ssl_use;
        Ok(policy)
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// pretty, compact or json
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Also write to a timestamped file under `web_admin.logs`
    #[serde(default = "default_true")]
    pub to_file: bool,

    /// Console stream, stderr or stdout
    #[serde(default = "default_log_output")]
    pub output: String,

    /// ANSI colors on the console
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_true")]
    pub timestamps: bool,

    #[serde(default)]
    pub thread_ids: bool,

    /// Module path of each event
    #[serde(default = "default_true")]
    pub targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            to_file: true,
            output: default_log_output(),
            color: true,
            timestamps: true,
            thread_ids: false,
            targets: true,
        }
    }
}

impl Config {
    /// Directory for log files, when file logging is on
    pub fn log_dir(&self) -> Option<PathBuf> {
        (self.logging.to_file && !self.web_admin.logs.is_empty())
            .then(|| PathBuf::from(&self.web_admin.logs))
    }
}

fn default_true() -> bool {
    true
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_curve() -> String {
    "P521".to_string()
}

fn default_dir() -> String {
    ".".to_string()
}

fn default_config_dir() -> String {
    "./config".to_string()
}

fn default_logs() -> String {
    "./logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_output() -> String {
    "stderr".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.web_admin.bind_addr(), "127.0.0.1:8080");
        assert!(!config.web_admin.ssl_use);
        assert!(config.web_admin.automatic_updates);
        assert_eq!(config.web_admin.curve().unwrap(), EcdsaCurve::P521);
        assert_eq!(config.log_dir(), Some(PathBuf::from("./logs")));
    }

    #[test]
    fn test_ipv6_bind_addr() {
        let config = WebAdminConfig {
            address: "::".to_string(),
            ..Default::default()
        };
        assert_eq!(config.bind_addr(), "[::]:8080");
    }

    #[test]
    fn test_tls_policy_mapping() {
        let config = WebAdminConfig {
            ssl_use: true,
            ssl_verify: true,
            ssl_key: "/etc/admin/key.pem".to_string(),
            ssl_curve: "p-384".to_string(),
            ..Default::default()
        };

        let policy = config.tls_policy().unwrap();
        assert!(policy.ssl_enabled);
        assert!(policy.strict_verify);
        assert_eq!(policy.cert_path, None);
        assert_eq!(policy.key_path.as_deref(), Some(Path::new("/etc/admin/key.pem")));
        assert_eq!(policy.materials_dir, PathBuf::from("./config"));
        assert_eq!(policy.curve, EcdsaCurve::P384);
    }

    #[test]
    fn test_disabled_policy_keeps_materials_dir() {
        let policy = WebAdminConfig::default().tls_policy().unwrap();
        assert!(!policy.ssl_enabled);
        assert_eq!(policy.materials_dir, PathBuf::from("./config"));
    }

    #[test]
    fn test_unknown_curve() {
        let config = WebAdminConfig {
            ssl_curve: "curve25519".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.tls_policy(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_file_logging_off() {
        let mut config = Config::default();
        config.logging.to_file = false;
        assert_eq!(config.log_dir(), None);
    }
}
