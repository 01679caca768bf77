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
//! Error types for the TLS bootstrap.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while enumerating local interface addresses
#[derive(Debug, Error)]
pub enum AddressError {
    /// The interface query itself failed (permissions, no network stack)
    #[error("failed to enumerate network interfaces: {0}")]
    InterfaceEnumeration(#[source] std::io::Error),

    /// Enumeration worked but produced no usable non-loopback address
    #[error("no non-loopback ip addresses found on any network interface")]
    NoAddressesFound,
}

/// TLS bootstrap errors
///
/// Every variant is terminal for a bootstrap pass; nothing in this crate
/// retries.
#[derive(Debug, Error)]
pub enum TlsError {
    /// No SAN entries could be collected for a new certificate
    #[error("cannot collect host addresses for the certificate: {0}")]
    AddressCollection(#[from] AddressError),

    /// Key pair, serial number or certificate signing failed
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A certificate or key file could not be written
    #[error("failed to persist '{}': {source}", path.display())]
    Persistence {
        /// File or directory that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Existing materials are present but unusable
    #[error("invalid certificate pair ('{}', '{}'): {reason}", cert_path.display(), key_path.display())]
    InvalidKeyPair {
        /// Certificate file that was checked
        cert_path: PathBuf,
        /// Key file that was checked
        key_path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Strict mode is on and the certificate or key is missing
    #[error("ssl verification is enabled and no certificate pair was found ({missing})")]
    MaterialsRequired {
        /// Human-readable list of the missing files
        missing: String,
    },

    /// A certificate file could not be parsed for inspection
    #[error("cannot inspect certificate '{}': {reason}", path.display())]
    Inspection {
        /// Certificate file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

impl TlsError {
    /// Build an [`TlsError::InvalidKeyPair`] for the given files
    pub fn invalid_key_pair(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        reason: impl Into<String>,
    ) -> Self {
        TlsError::InvalidKeyPair {
            cert_path: cert_path.as_ref().to_path_buf(),
            key_path: key_path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Build a [`TlsError::Persistence`] for the given path
    pub fn persistence(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        TlsError::Persistence {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a [`TlsError::KeyGeneration`] from any displayable cause
    pub fn key_generation(cause: impl std::fmt::Display) -> Self {
        TlsError::KeyGeneration(cause.to_string())
    }
}

/// Result alias used throughout the crate
pub type TlsResult<T> = Result<T, TlsError>;
