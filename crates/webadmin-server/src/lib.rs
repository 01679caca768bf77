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
//! Sandstorm web admin server.
//!
//! The binary loads the `.env` configuration, installs logging, runs the TLS
//! bootstrap and then serves the admin API over HTTP or HTTPS. The pieces are
//! exported so integration tests can assemble the same server.

pub mod config;
pub mod handlers;
pub mod serve;
pub mod state;

pub use config::{LogOverrides, ServerConfig};
pub use serve::{install_crypto_provider, resolve_bind_addr, rustls_config, serve};
pub use state::{AppState, TlsStatus};

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use webadmin_tls::{BootstrapOutcome, TlsBootstrapper, TlsPolicy};

/// Create the axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::banner))
        .route("/api/login", get(handlers::login))
        .route("/api/submit", get(handlers::submit))
        .route("/api/read", get(handlers::read))
        .route("/api/tls", get(handlers::tls_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the TLS bootstrap off the async runtime.
///
/// Key generation and file I/O are blocking, so the pass runs on the
/// blocking pool.
pub async fn bootstrap_tls(policy: TlsPolicy) -> Result<BootstrapOutcome> {
    tokio::task::spawn_blocking(move || TlsBootstrapper::new(policy).run())
        .await
        .context("TLS bootstrap task panicked")?
        .context("TLS bootstrap failed")
}
