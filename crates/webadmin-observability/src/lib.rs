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
//! Web admin observability
//!
//! Provides structured logging for the admin service.
//!
//! # Features
//!
//! - **Multiple Output Formats**: Pretty, JSON, and compact console output
//! - **Environment-based Filtering**: explicit level, else `RUST_LOG`, else `info`
//! - **Log Files**: optional plain-text copy in a `YYYY_MM_DDTHH_MM_SS.log` file
//! - **Console Style**: stream and decorations set per deployment
//!
//! # Example
//!
//! ```ignore
//! use webadmin_observability::{init_tracing_with_config, LogConfig, LogFormat};
//!
//! fn main() -> Result<(), webadmin_observability::LogError> {
//!     init_tracing_with_config(LogConfig::new().with_log_dir("./logs"))?;
//!
//!     tracing::info!("Application started");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod initialization;

pub use config::{ConsoleStyle, LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config, log_file_name, open_log_file};
