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
//! Certificate pair validation.
//!
//! A pair is valid when both files decode, the certificate's public key is
//! the private key's public half, and rustls accepts the pair as a server
//! credential. The key may be PKCS#8, SEC1 or PKCS#1. Nothing here writes
//! to disk.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{TlsError, TlsResult};
use crate::inspect::{read_certificates, CertificateInfo};
use crate::key::LoadedKey;

/// Checks that a certificate and key form one usable TLS credential
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateValidator;

impl CertificateValidator {
    /// Validate the pair, returning the parsed certificate on success
    pub fn validate(
        &self,
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> TlsResult<CertificateInfo> {
        let cert_path = cert_path.as_ref();
        let key_path = key_path.as_ref();
        let invalid = |reason: String| TlsError::invalid_key_pair(cert_path, key_path, reason);

        let cert_pem = std::fs::read(cert_path)
            .map_err(|e| invalid(format!("cannot read certificate: {e}")))?;
        let key_pem = std::fs::read(key_path)
            .map_err(|e| invalid(format!("cannot read private key: {e}")))?;

        let chain = read_certificates(&cert_pem).map_err(|e| invalid(format!("certificate: {e}")))?;
        let info = CertificateInfo::from_der(&chain[0])
            .map_err(|e| invalid(format!("certificate: {e}")))?;

        let key =
            LoadedKey::from_pem(&key_pem).map_err(|e| invalid(format!("private key: {e}")))?;

        match key.public_key() {
            Some(public_key) if public_key != info.public_key => {
                return Err(invalid(format!(
                    "certificate public key does not match the {} private key",
                    key.algorithm()
                )));
            }
            Some(_) => {}
            None => debug!(
                key = %key_path.display(),
                "public key not derivable from private key, leaving the match to rustls"
            ),
        }

        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        rustls::ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| invalid(format!("tls provider: {e}")))?
            .with_no_client_auth()
            .with_single_cert(chain, key.der())
            .map_err(|e| invalid(format!("rejected as a tls server credential: {e}")))?;

        if info.is_expired() {
            warn!(
                cert = %cert_path.display(),
                not_after = info.not_after,
                "certificate has expired"
            );
        }

        debug!(
            cert = %cert_path.display(),
            key = %key_path.display(),
            algorithm = %key.algorithm(),
            encoding = key.encoding(),
            "certificate pair validated"
        );

        Ok(info)
    }
}
