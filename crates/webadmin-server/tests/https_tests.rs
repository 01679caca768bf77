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
//! HTTPS/TLS integration tests
//!
//! Serves the router over a freshly bootstrapped certificate pair and talks
//! to it with a real client.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use webadmin_server::{create_router, install_crypto_provider, serve, AppState};
use webadmin_test_utils::TestMaterials;
use webadmin_tls::{
    BootstrapOutcome, CertificateGenerator, EcdsaCurve, StaticAddresses, TlsBootstrapper,
    TlsPolicy,
};

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Spawn the server and wait until it answers
async fn spawn_server(outcome: BootstrapOutcome, client: &reqwest::Client, scheme: &str) -> String {
    install_crypto_provider();
    let bind_addr = format!("127.0.0.1:{}", free_port());
    let base_url = format!("{scheme}://{bind_addr}");

    let app = create_router(Arc::new(AppState::new(&outcome)));
    let addr = bind_addr.clone();
    tokio::spawn(async move {
        serve(&addr, app, outcome.materials()).await.ok();
    });

    for _ in 0..50 {
        if client.get(&base_url).send().await.is_ok() {
            return base_url;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("server at {base_url} never came up");
}

#[tokio::test]
async fn test_https_round_trip_with_generated_pair() {
    let materials = TestMaterials::new();
    // P-256 keeps the handshake within every rustls provider's verifier set
    let policy = TlsPolicy::enabled(materials.materials_dir()).with_curve(EcdsaCurve::P256);
    let generator = CertificateGenerator::new()
        .with_collector(StaticAddresses::new(["10.0.0.5".parse().unwrap()]));
    let outcome = TlsBootstrapper::with_generator(policy, generator)
        .run()
        .unwrap();

    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap();
    let base_url = spawn_server(outcome, &client, "https").await;

    let status: Value = client
        .get(format!("{base_url}/api/tls"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["enabled"], true);
    assert_eq!(status["origin"], "generated");

    let login: Value = client
        .get(format!("{base_url}/api/login"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(login["path"], "/api/login");
}

#[tokio::test]
async fn test_plain_http_when_disabled() {
    let client = reqwest::Client::new();
    let base_url = spawn_server(BootstrapOutcome::Disabled, &client, "http").await;

    let banner: Value = client.get(&base_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(banner["tls"], false);
}
