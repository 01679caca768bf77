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
//! TLS policy handed to the bootstrap by the configuration layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::key::KeyAlgorithm;

/// File name of the certificate inside the materials directory
pub const CERT_FILE_NAME: &str = "web_admin_cert.pem";

/// File name of the private key inside the materials directory
pub const KEY_FILE_NAME: &str = "web_admin_key.pem";

/// Subject organization written into generated certificates
pub const DEFAULT_ORGANIZATION: &str = "Sandstorm Web Admin";

/// NIST curve used for generated ECDSA keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EcdsaCurve {
    /// P-256 with SHA-256
    P256,
    /// P-384 with SHA-384
    P384,
    /// P-521 with SHA-512
    #[default]
    P521,
}

impl EcdsaCurve {
    /// All supported curves, weakest first
    pub const ALL: [EcdsaCurve; 3] = [EcdsaCurve::P256, EcdsaCurve::P384, EcdsaCurve::P521];

    /// rcgen signature algorithm for keys on this curve
    pub fn signature_algorithm(self) -> &'static rcgen::SignatureAlgorithm {
        match self {
            EcdsaCurve::P256 => &rcgen::PKCS_ECDSA_P256_SHA256,
            EcdsaCurve::P384 => &rcgen::PKCS_ECDSA_P384_SHA384,
            EcdsaCurve::P521 => &rcgen::PKCS_ECDSA_P521_SHA512,
        }
    }

    /// Key algorithm a key generated on this curve decodes as
    pub fn key_algorithm(self) -> KeyAlgorithm {
        match self {
            EcdsaCurve::P256 => KeyAlgorithm::EcdsaP256,
            EcdsaCurve::P384 => KeyAlgorithm::EcdsaP384,
            EcdsaCurve::P521 => KeyAlgorithm::EcdsaP521,
        }
    }

    /// Canonical short name (`P256`, `P384`, `P521`)
    pub fn name(self) -> &'static str {
        match self {
            EcdsaCurve::P256 => "P256",
            EcdsaCurve::P384 => "P384",
            EcdsaCurve::P521 => "P521",
        }
    }
}

impl fmt::Display for EcdsaCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a curve name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ecdsa curve '{0}', expected one of: P256, P384, P521")]
pub struct UnknownCurve(pub String);

impl FromStr for EcdsaCurve {
    type Err = UnknownCurve;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "p256" | "prime256v1" | "secp256r1" => Ok(EcdsaCurve::P256),
            "p384" | "secp384r1" => Ok(EcdsaCurve::P384),
            "p521" | "secp521r1" => Ok(EcdsaCurve::P521),
            _ => Err(UnknownCurve(s.to_string())),
        }
    }
}

/// Immutable input to the TLS bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsPolicy {
    /// Serve over TLS at all
    pub ssl_enabled: bool,

    /// Missing or invalid materials are fatal instead of triggering generation
    pub strict_verify: bool,

    /// Explicit certificate path, overrides the materials directory
    pub cert_path: Option<PathBuf>,

    /// Explicit key path, overrides the materials directory
    pub key_path: Option<PathBuf>,

    /// Directory holding the conventional certificate and key files
    pub materials_dir: PathBuf,

    /// Curve used when a new key has to be generated
    pub curve: EcdsaCurve,
}

impl Default for TlsPolicy {
    fn default() -> Self {
        Self {
            ssl_enabled: false,
            strict_verify: false,
            cert_path: None,
            key_path: None,
            materials_dir: PathBuf::from("./config"),
            curve: EcdsaCurve::default(),
        }
    }
}

impl TlsPolicy {
    /// Policy with TLS switched off
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Permissive TLS policy rooted at `materials_dir`
    pub fn enabled(materials_dir: impl Into<PathBuf>) -> Self {
        Self {
            ssl_enabled: true,
            materials_dir: materials_dir.into(),
            ..Self::default()
        }
    }

    /// Set strict verification
    pub fn strict(mut self, strict_verify: bool) -> Self {
        self.strict_verify = strict_verify;
        self
    }

    /// Set an explicit certificate path; an empty path clears it
    pub fn with_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cert_path = non_empty(path.into());
        self
    }

    /// Set an explicit key path; an empty path clears it
    pub fn with_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = non_empty(path.into());
        self
    }

    /// Set the generation curve
    pub fn with_curve(mut self, curve: EcdsaCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Conventional certificate location inside the materials directory
    pub fn default_cert_path(&self) -> PathBuf {
        self.materials_dir.join(CERT_FILE_NAME)
    }

    /// Conventional key location inside the materials directory
    pub fn default_key_path(&self) -> PathBuf {
        self.materials_dir.join(KEY_FILE_NAME)
    }

    /// Where a generated certificate is written
    pub fn target_cert_path(&self) -> PathBuf {
        explicit(self.cert_path.as_deref()).unwrap_or_else(|| self.default_cert_path())
    }

    /// Where a generated key is written
    pub fn target_key_path(&self) -> PathBuf {
        explicit(self.key_path.as_deref()).unwrap_or_else(|| self.default_key_path())
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    (!path.as_os_str().is_empty()).then_some(path)
}

pub(crate) fn explicit(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
