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
//! Startup orchestration of the TLS materials.
//!
//! ```text
//! Disabled                                  (ssl off, no filesystem access)
//! SeekingExisting ─┬─ both found ──────────► Validating ─┬─ ok ──► Ready
//!                  │                                      └─ err ─► Failed
//!                  ├─ missing, strict ─────► Failed
//!                  └─ missing, permissive ─► Generating ─┬─ ok ──► Ready
//!                                                        └─ err ─► Failed
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use crate::error::{TlsError, TlsResult};
use crate::generator::{CertificateGenerator, MaterialGenerator};
use crate::inspect::CertificateInfo;
use crate::policy::TlsPolicy;
use crate::store::CertificateStore;
use crate::validator::CertificateValidator;

/// States of a bootstrap pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    /// SSL is off
    Disabled,
    /// Looking for an existing pair
    SeekingExisting,
    /// Checking an existing pair
    Validating,
    /// Creating a new pair
    Generating,
    /// Materials are usable
    Ready,
    /// The pass ended with an error
    Failed,
}

impl BootstrapState {
    /// True for states that end a pass
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BootstrapState::Disabled | BootstrapState::Ready | BootstrapState::Failed
        )
    }
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapState::Disabled => "disabled",
            BootstrapState::SeekingExisting => "seeking_existing",
            BootstrapState::Validating => "validating",
            BootstrapState::Generating => "generating",
            BootstrapState::Ready => "ready",
            BootstrapState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Where the ready materials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialOrigin {
    /// Found on disk and validated
    Existing,
    /// Generated during this pass
    Generated,
}

impl fmt::Display for MaterialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialOrigin::Existing => f.write_str("existing"),
            MaterialOrigin::Generated => f.write_str("generated"),
        }
    }
}

/// A validated certificate pair ready for the listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsMaterials {
    /// Certificate file
    pub cert_path: PathBuf,
    /// Private key file
    pub key_path: PathBuf,
    /// Found or generated
    pub origin: MaterialOrigin,
    /// Parsed certificate
    pub info: CertificateInfo,
}

/// Successful end of a bootstrap pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// SSL is off, serve plain HTTP
    Disabled,
    /// Serve HTTPS with these materials
    Ready(TlsMaterials),
}

impl BootstrapOutcome {
    /// Materials when TLS is on
    pub fn materials(&self) -> Option<&TlsMaterials> {
        match self {
            BootstrapOutcome::Disabled => None,
            BootstrapOutcome::Ready(materials) => Some(materials),
        }
    }
}

/// Drives one policy through locate, validate and generate
pub struct TlsBootstrapper<G = CertificateGenerator> {
    policy: TlsPolicy,
    store: CertificateStore,
    validator: CertificateValidator,
    generator: G,
    visited: Vec<BootstrapState>,
}

impl TlsBootstrapper<CertificateGenerator> {
    /// Bootstrapper backed by live interface addresses
    pub fn new(policy: TlsPolicy) -> Self {
        Self::with_generator(policy, CertificateGenerator::new())
    }
}

impl<G: MaterialGenerator> TlsBootstrapper<G> {
    /// Bootstrapper with a custom generator
    pub fn with_generator(policy: TlsPolicy, generator: G) -> Self {
        Self {
            policy,
            store: CertificateStore,
            validator: CertificateValidator,
            generator,
            visited: Vec::new(),
        }
    }

    /// Policy this bootstrapper applies
    pub fn policy(&self) -> &TlsPolicy {
        &self.policy
    }

    /// The generator used when materials are missing
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// States visited by the last [`run`](Self::run), in order
    pub fn visited(&self) -> &[BootstrapState] {
        &self.visited
    }

    /// Current state, `None` before the first run
    pub fn state(&self) -> Option<BootstrapState> {
        self.visited.last().copied()
    }

    /// Run one pass to a terminal state
    pub fn run(&mut self) -> TlsResult<BootstrapOutcome> {
        self.visited.clear();

        let result = self.drive();
        if let Err(e) = &result {
            self.enter(BootstrapState::Failed);
            error!(error = %e, "tls bootstrap failed");
        }
        result
    }

    fn drive(&mut self) -> TlsResult<BootstrapOutcome> {
        if !self.policy.ssl_enabled {
            self.enter(BootstrapState::Disabled);
            info!("ssl is disabled, serving plain http");
            return Ok(BootstrapOutcome::Disabled);
        }

        self.enter(BootstrapState::SeekingExisting);
        let located = self.store.locate(&self.policy);

        let materials = match located.pair() {
            Some((cert_path, key_path)) => {
                info!(
                    cert = %cert_path.display(),
                    key = %key_path.display(),
                    "found existing certificates"
                );
                self.enter(BootstrapState::Validating);
                let info = self.validator.validate(cert_path, key_path)?;
                info!("existing certificates are valid");

                TlsMaterials {
                    cert_path: cert_path.to_path_buf(),
                    key_path: key_path.to_path_buf(),
                    origin: MaterialOrigin::Existing,
                    info,
                }
            }
            None if self.policy.strict_verify => {
                return Err(TlsError::MaterialsRequired {
                    missing: located.describe_missing(),
                });
            }
            None => {
                info!(missing = %located.describe_missing(), "no usable certificates found");
                self.enter(BootstrapState::Generating);
                let pair = self.generator.generate(&self.policy)?;
                let info = self.validator.validate(&pair.cert_path, &pair.key_path)?;

                TlsMaterials {
                    cert_path: pair.cert_path,
                    key_path: pair.key_path,
                    origin: MaterialOrigin::Generated,
                    info,
                }
            }
        };

        self.enter(BootstrapState::Ready);
        Ok(BootstrapOutcome::Ready(materials))
    }

    fn enter(&mut self, state: BootstrapState) {
        self.visited.push(state);
    }
}
