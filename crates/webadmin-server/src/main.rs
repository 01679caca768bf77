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
//! `webadmin-server` binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use webadmin_observability::init_tracing_with_config;
use webadmin_server::{
    bootstrap_tls, create_router, install_crypto_provider, serve, AppState, LogOverrides,
    ServerConfig, TlsStatus,
};

/// Sandstorm web admin server
#[derive(Parser, Debug)]
#[command(name = "webadmin-server", version, about)]
struct Args {
    /// Configuration file (.env or .toml); a missing .env is created with defaults
    #[arg(long, default_value = "./.env")]
    env_file: PathBuf,

    /// Log format: pretty, compact or json
    #[arg(long)]
    log_format: Option<String>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,

    /// Console log stream: stderr or stdout
    #[arg(long)]
    log_output: Option<String>,

    /// Prepare TLS materials, print the outcome and exit
    #[arg(long)]
    bootstrap_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = ServerConfig::load(&args.env_file).await?;

    // Setup tracing
    let log_config = config.log_config(&LogOverrides {
        format: args.log_format.as_deref(),
        level: args.log_level.as_deref(),
        output: args.log_output.as_deref(),
    })?;
    let log_file = init_tracing_with_config(log_config).context("Failed to initialize logging")?;
    info!(
        source = %config.source.display(),
        log_file = ?log_file,
        "Configuration loaded"
    );

    install_crypto_provider();

    // TLS bootstrap, before any socket is bound
    let policy = config.tls_policy()?;
    info!(
        ssl = policy.ssl_enabled,
        strict = policy.strict_verify,
        materials_dir = %policy.materials_dir.display(),
        "Preparing TLS"
    );
    let outcome = bootstrap_tls(policy).await?;

    if args.bootstrap_only {
        let status = TlsStatus::from(&outcome);
        println!(
            "{}",
            serde_json::to_string_pretty(&status).context("Failed to render TLS status")?
        );
        return Ok(());
    }

    let state = Arc::new(AppState::new(&outcome));
    let app = create_router(state);

    serve(&config.bind_addr(), app, outcome.materials()).await
}
