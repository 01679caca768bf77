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
//! Configuration management for the Sandstorm web admin
//!
//! Settings come from a `.env` file (or a TOML file with the same fields),
//! with process environment variables taking precedence over file values.
//!
//! # Features
//!
//! - `.env` parsing with `dotenvy`, TOML with `toml`
//! - `ADMIN_*` environment variable overrides
//! - A default `.env` is written when none exists
//! - Validation with field-level error messages
//! - [`WebAdminConfig::tls_policy`] builds the TLS bootstrap input
//!
//! # Example
//!
//! ```no_run
//! use webadmin_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load_file("./.env").await?;
//!
//!     println!("Listening on: {}", config.web_admin.bind_addr());
//!     println!("TLS: {}", config.web_admin.ssl_use);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use error::{ConfigError, ConfigResult};
pub use loader::{render_env, write_default_env, ConfigFormat, ConfigLoader, ENV_KEYS};
pub use schema::*;
pub use validation::Validator;
