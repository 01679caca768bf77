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
use crate::error::{ConfigError, ConfigResult};
use crate::schema::{Config, LoggingConfig, WebAdminConfig};
use std::net::IpAddr;

/// Log levels accepted by the subscriber
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by the subscriber
pub const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Console streams
pub const VALID_LOG_OUTPUTS: [&str; 2] = ["stderr", "stdout"];

/// Configuration validation trait
pub trait Validator {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.web_admin.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Validator for WebAdminConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::invalid_value(
                "web_admin.port",
                format!("port must be between 1 and 65535, got {}", self.port),
            ));
        }

        if self.address.is_empty() {
            return Err(ConfigError::MissingRequired("web_admin.address".to_string()));
        }

        if self.address.parse::<IpAddr>().is_err() && !is_valid_hostname(&self.address) {
            return Err(ConfigError::invalid_value(
                "web_admin.address",
                format!("'{}' is neither an ip address nor a host name", self.address),
            ));
        }

        if self.ssl_use && self.config_dir.is_empty() {
            return Err(ConfigError::validation_error(
                "web_admin.config_dir must be set when ssl is enabled",
            ));
        }

        self.curve()?;

        Ok(())
    }
}

impl Validator for LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.format",
                format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            ));
        }

        if !VALID_LOG_OUTPUTS.contains(&self.output.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.output",
                format!("must be one of: {}", VALID_LOG_OUTPUTS.join(", ")),
            ));
        }

        Ok(())
    }
}

fn is_valid_hostname(host: &str) -> bool {
    host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
