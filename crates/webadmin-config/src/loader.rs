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
use crate::schema::Config;
use crate::validation::Validator;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// Keys understood in env files and the process environment
pub const ENV_KEYS: [&str; 20] = [
    "ADMIN_ADDRESS",
    "ADMIN_PORT",
    "ADMIN_PASSWORD",
    "ADMIN_SSL_USE",
    "ADMIN_SSL_VERIFY",
    "ADMIN_SSL_CERT",
    "ADMIN_SSL_KEY",
    "ADMIN_SSL_CURVE",
    "ADMIN_AUTOMATIC_UPDATES",
    "ADMIN_DIR",
    "ADMIN_CONFIG_DIR",
    "ADMIN_LOGS",
    "ADMIN_LOG_LEVEL",
    "ADMIN_LOG_FORMAT",
    "ADMIN_LOG_FILE",
    "ADMIN_LOG_OUTPUT",
    "ADMIN_LOG_COLOR",
    "ADMIN_LOG_TIMESTAMPS",
    "ADMIN_LOG_THREAD_IDS",
    "ADMIN_LOG_TARGETS",
];

const DEFAULT_ENV_HEADER: &str = "\
# Sandstorm Web Admin configuration
#
# Written with default values because no configuration file was found.
# Empty ADMIN_SSL_CERT / ADMIN_SSL_KEY use web_admin_cert.pem and
# web_admin_key.pem inside ADMIN_CONFIG_DIR.

";

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `KEY=value` lines
    Env,
    /// TOML document with `[web_admin]` and `[logging]` tables
    Toml,
}

impl ConfigFormat {
    /// Detect format from the file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConfigError::InvalidPath(path.to_path_buf()))?;

        if name == ".env" || name.starts_with(".env.") {
            return Ok(ConfigFormat::Env);
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("env") => Ok(ConfigFormat::Env),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Env => "env",
            ConfigFormat::Toml => "TOML",
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    validate: bool,
    process_env: bool,
    create_missing: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader {
            validate: true,
            process_env: true,
            create_missing: true,
        }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader {
            validate: false,
            ..Self::new()
        }
    }

    /// Do not let process environment variables override file values
    pub fn ignore_process_env(mut self) -> Self {
        self.process_env = false;
        self
    }

    /// Fail on a missing env file instead of writing one with defaults
    pub fn without_default_file(mut self) -> Self {
        self.create_missing = false;
        self
    }

    /// Load configuration from a file, then apply environment overrides
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        let format = ConfigFormat::from_path(path)?;

        if !path.exists() {
            if format != ConfigFormat::Env || !self.create_missing {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            warn!(
                "Configuration file {} not found, writing defaults",
                path.display()
            );
            write_default_env(path).await?;
        }

        let content = fs::read_to_string(path).await?;

        info!(
            "Loaded {} configuration file: {}",
            format.name(),
            path.display()
        );

        let mut config = parse(&content, format)?;

        if self.process_env {
            self.apply_env_overrides(&mut config)?;
        }

        if self.validate {
            config.validate()?;
            info!("Configuration validated successfully");
        }

        Ok(config)
    }

    /// Load configuration from a string, without environment overrides
    pub fn load_from_string(&self, content: &str, format: ConfigFormat) -> ConfigResult<Config> {
        let config = parse(content, format)?;

        debug!("Configuration loaded from {}", format.name());

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        for key in ENV_KEYS {
            if let Ok(value) = std::env::var(key) {
                debug!(key, "Configuration value overridden from environment");
                apply_key(config, key, &value)?;
            }
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Write an env file holding every key with its default value
pub async fn write_default_env(path: &Path) -> ConfigResult<Config> {
    let config = Config::default();
    let write_error = |source| ConfigError::DefaultFileError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    fs::write(path, render_env(&config)).await.map_err(write_error)?;

    Ok(config)
}

/// Render a configuration as an env file
pub fn render_env(config: &Config) -> String {
    let web = &config.web_admin;
    let logging = &config.logging;

    let entries = [
        ("ADMIN_ADDRESS", web.address.clone()),
        ("ADMIN_PORT", web.port.to_string()),
        ("ADMIN_PASSWORD", web.password.clone()),
        ("ADMIN_SSL_USE", web.ssl_use.to_string()),
        ("ADMIN_SSL_VERIFY", web.ssl_verify.to_string()),
        ("ADMIN_SSL_CERT", web.ssl_cert.clone()),
        ("ADMIN_SSL_KEY", web.ssl_key.clone()),
        ("ADMIN_SSL_CURVE", web.ssl_curve.clone()),
        ("ADMIN_AUTOMATIC_UPDATES", web.automatic_updates.to_string()),
        ("ADMIN_DIR", web.dir.clone()),
        ("ADMIN_CONFIG_DIR", web.config_dir.clone()),
        ("ADMIN_LOGS", web.logs.clone()),
        ("ADMIN_LOG_LEVEL", logging.level.clone()),
        ("ADMIN_LOG_FORMAT", logging.format.clone()),
        ("ADMIN_LOG_FILE", logging.to_file.to_string()),
        ("ADMIN_LOG_OUTPUT", logging.output.clone()),
        ("ADMIN_LOG_COLOR", logging.color.to_string()),
        ("ADMIN_LOG_TIMESTAMPS", logging.timestamps.to_string()),
        ("ADMIN_LOG_THREAD_IDS", logging.thread_ids.to_string()),
        ("ADMIN_LOG_TARGETS", logging.targets.to_string()),
    ];

    let mut out = String::from(DEFAULT_ENV_HEADER);
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_env_value(&value));
        out.push('\n');
    }
    out
}

fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Config> {
    match format {
        ConfigFormat::Toml => Ok(toml::from_str(content)?),
        ConfigFormat::Env => parse_env(content),
    }
}

fn parse_env(content: &str) -> ConfigResult<Config> {
    let mut config = Config::default();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        let (key, value) = item?;
        if !apply_key(&mut config, &key, &value)? {
            debug!(key = %key, "Ignoring unknown configuration key");
        }
    }
    Ok(config)
}

/// Apply one key. Empty values keep the default, except for the fields
/// where empty is meaningful. Returns false for unknown keys.
fn apply_key(config: &mut Config, key: &str, value: &str) -> ConfigResult<bool> {
    let web = &mut config.web_admin;
    match key {
        "ADMIN_SSL_CERT" => web.ssl_cert = value.to_string(),
        "ADMIN_SSL_KEY" => web.ssl_key = value.to_string(),
        "ADMIN_PASSWORD" => web.password = value.to_string(),
        _ if value.is_empty() => return Ok(ENV_KEYS.contains(&key)),
        "ADMIN_ADDRESS" => web.address = value.to_string(),
        "ADMIN_PORT" => {
            web.port = value.parse().map_err(|_| {
                ConfigError::env_var_parsing_error(
                    key,
                    value,
                    "expected valid port number (1-65535)",
                )
            })?
        }
        "ADMIN_SSL_USE" => web.ssl_use = parse_bool(key, value)?,
        "ADMIN_SSL_VERIFY" => web.ssl_verify = parse_bool(key, value)?,
        "ADMIN_SSL_CURVE" => web.ssl_curve = value.to_string(),
        "ADMIN_AUTOMATIC_UPDATES" => web.automatic_updates = parse_bool(key, value)?,
        "ADMIN_DIR" => web.dir = value.to_string(),
        "ADMIN_CONFIG_DIR" => web.config_dir = value.to_string(),
        "ADMIN_LOGS" => web.logs = value.to_string(),
        "ADMIN_LOG_LEVEL" => config.logging.level = value.to_string(),
        "ADMIN_LOG_FORMAT" => config.logging.format = value.to_string(),
        "ADMIN_LOG_FILE" => config.logging.to_file = parse_bool(key, value)?,
        "ADMIN_LOG_OUTPUT" => config.logging.output = value.to_string(),
        "ADMIN_LOG_COLOR" => config.logging.color = parse_bool(key, value)?,
        "ADMIN_LOG_TIMESTAMPS" => config.logging.timestamps = parse_bool(key, value)?,
        "ADMIN_LOG_THREAD_IDS" => config.logging.thread_ids = parse_bool(key, value)?,
        "ADMIN_LOG_TARGETS" => config.logging.targets = parse_bool(key, value)?,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Parse boolean from string (accepts: true, false, yes, no, on, off, 1, 0, t, f)
fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" | "t" => Ok(true),
        "false" | "no" | "0" | "off" | "f" => Ok(false),
        _ => Err(ConfigError::env_var_parsing_error(
            key,
            value,
            "expected 'true', 'false', 'yes', 'no', '1', '0', 'on', or 'off'",
        )),
    }
}

/// Quote a value so dotenvy reads it back verbatim
fn quote_env_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "./:_-@+,".contains(c));
    if plain {
        value.to_string()
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$");
        format!("\"{escaped}\"")
    }
}
