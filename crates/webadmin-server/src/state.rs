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
//! Shared state handed to every handler.

use serde::Serialize;
use webadmin_tls::{BootstrapOutcome, BootstrapState, TlsMaterials};

/// TLS status reported by `/api/tls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsStatus {
    /// HTTPS is being served
    pub enabled: bool,

    /// Final bootstrap state
    pub state: BootstrapState,

    /// Certificate pair in use, when enabled
    #[serde(flatten)]
    pub materials: Option<TlsMaterials>,
}

impl TlsStatus {
    /// Status of a plain HTTP server
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            state: BootstrapState::Disabled,
            materials: None,
        }
    }
}

impl From<&BootstrapOutcome> for TlsStatus {
    fn from(outcome: &BootstrapOutcome) -> Self {
        match outcome {
            BootstrapOutcome::Disabled => Self::disabled(),
            BootstrapOutcome::Ready(materials) => Self {
                enabled: true,
                state: BootstrapState::Ready,
                materials: Some(materials.clone()),
            },
        }
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Result of the TLS bootstrap this server started with
    pub tls: TlsStatus,
}

impl AppState {
    /// Create new app state from a finished bootstrap
    pub fn new(outcome: &BootstrapOutcome) -> Self {
        Self {
            tls: TlsStatus::from(outcome),
        }
    }

    /// App state for a server without TLS
    pub fn plain() -> Self {
        Self {
            tls: TlsStatus::disabled(),
        }
    }
}
