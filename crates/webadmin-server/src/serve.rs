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
//! Listeners: plain HTTP, or HTTPS over the bootstrapped certificate pair.

use anyhow::{Context, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use tracing::{debug, info};
use webadmin_tls::TlsMaterials;

/// Install aws-lc-rs as the process-wide rustls provider.
///
/// Harmless when a provider is already installed.
pub fn install_crypto_provider() {
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// Build axum-server RustlsConfig from the certificate and key files
pub async fn rustls_config(materials: &TlsMaterials) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(&materials.cert_path, &materials.key_path)
        .await
        .with_context(|| {
            format!(
                "Failed to load TLS materials from {} and {}",
                materials.cert_path.display(),
                materials.key_path.display()
            )
        })
}

/// Resolve `host:port` to the first socket address
pub async fn resolve_bind_addr(bind_addr: &str) -> Result<SocketAddr> {
    tokio::net::lookup_host(bind_addr)
        .await
        .with_context(|| format!("Failed to resolve bind address {bind_addr}"))?
        .next()
        .with_context(|| format!("Bind address {bind_addr} resolved to nothing"))
}

/// Serve `router` until the listener fails.
///
/// With materials the listener speaks HTTPS only; without, plain HTTP.
pub async fn serve(bind_addr: &str, router: Router, materials: Option<&TlsMaterials>) -> Result<()> {
    match materials {
        Some(materials) => {
            let addr = resolve_bind_addr(bind_addr).await?;
            let config = rustls_config(materials).await?;

            info!(
                addr = %addr,
                cert = %materials.cert_path.display(),
                origin = %materials.origin,
                "Web admin listening on https://{}",
                addr
            );
            axum_server::bind_rustls(addr, config)
                .serve(router.into_make_service())
                .await
                .context("HTTPS server failed")
        }
        None => {
            let listener = tokio::net::TcpListener::bind(bind_addr)
                .await
                .with_context(|| format!("Failed to bind {bind_addr}"))?;

            info!(addr = %bind_addr, "Web admin listening on http://{}", bind_addr);
            axum::serve(listener, router)
                .await
                .context("HTTP server failed")
        }
    }
}
