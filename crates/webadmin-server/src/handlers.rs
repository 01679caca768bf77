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
//! HTTP handlers for the admin API.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::{AppState, TlsStatus};

/// Name reported by the banner
pub const SERVICE_NAME: &str = "sandstorm-web-admin";

/// GET / - Service banner
pub async fn banner(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "tls": state.tls.enabled,
    }))
}

/// GET /api/login
pub async fn login() -> Json<Value> {
    route_path("/api/login")
}

/// GET /api/submit
pub async fn submit() -> Json<Value> {
    route_path("/api/submit")
}

/// GET /api/read
pub async fn read() -> Json<Value> {
    route_path("/api/read")
}

/// GET /api/tls - Bootstrap outcome and certificate details
pub async fn tls_status(State(state): State<Arc<AppState>>) -> Json<TlsStatus> {
    Json(state.tls.clone())
}

fn route_path(path: &str) -> Json<Value> {
    Json(json!({ "path": path }))
}
