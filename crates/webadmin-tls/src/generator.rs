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
//! Self-signed certificate generation
//!
//! Produces a CA-flagged, server-auth certificate whose SAN list is the set
//! of host addresses at generation time, and writes it next to a PKCS#8 key
//! readable only by the owner.
//!
//! # Certificate profile
//! - **Key**: ECDSA on the policy curve (P-521 unless configured)
//! - **Serial**: 128 random bits from the OS RNG, never zero
//! - **Validity**: 365 days from generation, whole seconds
//! - **Key usage**: digitalSignature, keyEncipherment, keyCertSign
//! - **Extended key usage**: serverAuth
//! - **Basic constraints**: cA = true

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyUsagePurpose, SanType, SerialNumber,
};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::addresses::{AddressCollector, SystemAddresses};
use crate::error::{TlsError, TlsResult};
use crate::key::PrivateKey;
use crate::policy::{EcdsaCurve, TlsPolicy, DEFAULT_ORGANIZATION};

/// Lifetime of a generated certificate
pub const VALIDITY_DAYS: i64 = 365;

/// Size of the random serial number in bytes (128 bits)
const SERIAL_BYTES: usize = 16;

/// Certificate and key files written together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedPair {
    /// PEM `CERTIFICATE` file
    pub cert_path: PathBuf,
    /// PEM `PRIVATE KEY` file
    pub key_path: PathBuf,
}

/// Anything able to produce a fresh certificate pair for a policy
pub trait MaterialGenerator {
    /// Create and persist a new pair
    fn generate(&self, policy: &TlsPolicy) -> TlsResult<PersistedPair>;
}

/// Generates self-signed certificates for the admin service
pub struct CertificateGenerator {
    collector: Box<dyn AddressCollector>,
    organization: String,
    curve: Option<EcdsaCurve>,
}

impl Default for CertificateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateGenerator {
    /// Generator using live interface addresses
    pub fn new() -> Self {
        Self {
            collector: Box::new(SystemAddresses),
            organization: DEFAULT_ORGANIZATION.to_string(),
            curve: None,
        }
    }

    /// Always use `curve`, whatever the policy asks for
    pub fn with_curve(mut self, curve: EcdsaCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Replace the SAN address source
    pub fn with_collector(mut self, collector: impl AddressCollector + 'static) -> Self {
        self.collector = Box::new(collector);
        self
    }

    /// Set the subject organization
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    fn certificate_params(
        &self,
        serial: SerialNumber,
        not_before: OffsetDateTime,
        addresses: &[IpAddr],
    ) -> CertificateParams {
        let mut params = CertificateParams::default();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, self.organization.as_str());
        params.distinguished_name = dn;

        params.serial_number = Some(serial);
        params.not_before = not_before;
        params.not_after = not_before + Duration::days(VALIDITY_DAYS);

        params.subject_alt_names = addresses.iter().copied().map(SanType::IpAddress).collect();

        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
            KeyUsagePurpose::KeyCertSign,
        ];
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];

        params
    }
}

impl MaterialGenerator for CertificateGenerator {
    fn generate(&self, policy: &TlsPolicy) -> TlsResult<PersistedPair> {
        let curve = self.curve.unwrap_or(policy.curve);
        info!(%curve, "generating self signed certificates");

        let key = PrivateKey::generate(curve)?;
        let serial = random_serial()?;
        let not_before = now_whole_seconds()?;
        let addresses = self.collector.collect()?;
        debug!(?addresses, "certificate subject alternative names");

        let cert = self
            .certificate_params(serial, not_before, &addresses)
            .self_signed(key.key_pair())
            .map_err(|e| TlsError::key_generation(format!("signing certificate: {e}")))?;

        let cert_pem = cert.pem();
        let key_pem = key.to_pkcs8_pem();
        drop(key);

        let pair = PersistedPair {
            cert_path: policy.target_cert_path(),
            key_path: policy.target_key_path(),
        };

        // Certificate first, then key: a crash in between leaves a pair the
        // validator rejects.
        write_pem(&pair.cert_path, cert_pem.as_bytes(), false)?;
        write_pem(&pair.key_path, key_pem.as_bytes(), true)?;

        info!(
            cert = %pair.cert_path.display(),
            key = %pair.key_path.display(),
            "certificates generated successfully"
        );

        Ok(pair)
    }
}

fn random_serial() -> TlsResult<SerialNumber> {
    let mut bytes = [0u8; SERIAL_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TlsError::key_generation(format!("serial number: {e}")))?;

    if bytes.iter().all(|b| *b == 0) {
        return Err(TlsError::key_generation("serial number: rng returned all zero bytes"));
    }

    Ok(SerialNumber::from_slice(&bytes))
}

fn now_whole_seconds() -> TlsResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(OffsetDateTime::now_utc().unix_timestamp())
        .map_err(|e| TlsError::key_generation(format!("validity window: {e}")))
}

fn write_pem(path: &Path, contents: &[u8], private: bool) -> TlsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TlsError::persistence(parent, e))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    if private {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| TlsError::persistence(path, e))?;

    // mode() only applies on creation; an overwritten key keeps its old mode
    #[cfg(unix)]
    if private {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| TlsError::persistence(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = private;

    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .map_err(|e| TlsError::persistence(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::addresses::StaticAddresses;
    use crate::error::AddressError;
    use crate::inspect::inspect_certificate;
    use crate::key::{KeyAlgorithm, LoadedKey};
    use crate::validator::CertificateValidator;
    use tempfile::TempDir;

    fn generator(addresses: &[&str]) -> CertificateGenerator {
        CertificateGenerator::new().with_collector(StaticAddresses::new(
            addresses.iter().map(|a| a.parse::<IpAddr>().unwrap()),
        ))
    }

    #[test]
    fn test_random_serial_is_not_repeated() {
        let a = random_serial().unwrap();
        let b = random_serial().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_pair_validates() {
        let dir = TempDir::new().unwrap();
        let policy = TlsPolicy::enabled(dir.path()).with_curve(EcdsaCurve::P256);

        let pair = generator(&["10.0.0.5"]).generate(&policy).unwrap();
        assert_eq!(pair.cert_path, policy.default_cert_path());
        assert_eq!(pair.key_path, policy.default_key_path());
        assert!(CertificateValidator.validate(&pair.cert_path, &pair.key_path).is_ok());
    }

    #[test]
    fn test_certificate_profile() {
        let dir = TempDir::new().unwrap();
        let policy = TlsPolicy::enabled(dir.path()).with_curve(EcdsaCurve::P384);

        let pair = generator(&["10.0.0.5", "fd00::5"])
            .with_organization("Profile Test")
            .generate(&policy)
            .unwrap();
        let info = inspect_certificate(&pair.cert_path).unwrap();

        assert_eq!(info.organization.as_deref(), Some("Profile Test"));
        assert!(info.basic_constraints);
        assert!(info.is_ca);
        assert!(info.self_issued);
        assert!(info.key_usage.digital_signature);
        assert!(info.key_usage.key_encipherment);
        assert!(info.key_usage.key_cert_sign);
        assert!(info.server_auth);
        assert_eq!(info.validity_seconds(), VALIDITY_DAYS * 24 * 60 * 60);
        assert!(info.serial_bytes.iter().any(|b| *b != 0));
    }

    #[test]
    fn test_curve_override_beats_policy() {
        let dir = TempDir::new().unwrap();
        let policy = TlsPolicy::enabled(dir.path()).with_curve(EcdsaCurve::P521);

        let pair = generator(&["10.0.0.5"])
            .with_curve(EcdsaCurve::P256)
            .generate(&policy)
            .unwrap();
        let key = LoadedKey::from_pem(&fs::read(&pair.key_path).unwrap()).unwrap();
        assert_eq!(key.algorithm(), KeyAlgorithm::EcdsaP256);
    }

    #[test]
    fn test_no_addresses_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let policy = TlsPolicy::enabled(dir.path()).with_curve(EcdsaCurve::P256);

        let result = generator(&["127.0.0.1"]).generate(&policy);
        assert!(matches!(
            result,
            Err(TlsError::AddressCollection(AddressError::NoAddressesFound))
        ));
        assert!(!policy.default_cert_path().exists());
        assert!(!policy.default_key_path().exists());
    }

    #[test]
    fn test_creates_missing_materials_dir() {
        let dir = TempDir::new().unwrap();
        let materials = dir.path().join("nested").join("config");
        let policy = TlsPolicy::enabled(&materials).with_curve(EcdsaCurve::P256);

        let pair = generator(&["192.168.0.2"]).generate(&policy).unwrap();
        assert!(pair.cert_path.starts_with(&materials));
        assert!(pair.key_path.is_file());
    }

    #[test]
    fn test_explicit_paths_are_targets() {
        let dir = TempDir::new().unwrap();
        let cert_path = dir.path().join("custom-cert.pem");
        let key_path = dir.path().join("keys").join("custom-key.pem");
        let policy = TlsPolicy::enabled(dir.path().join("unused"))
            .with_cert_path(&cert_path)
            .with_key_path(&key_path)
            .with_curve(EcdsaCurve::P256);

        let pair = generator(&["192.168.0.2"]).generate(&policy).unwrap();
        assert_eq!(pair.cert_path, cert_path);
        assert_eq!(pair.key_path, key_path);
        assert!(!dir.path().join("unused").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_overwritten_key_is_restricted() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let policy = TlsPolicy::enabled(dir.path()).with_curve(EcdsaCurve::P256);
        fs::write(policy.default_key_path(), "old").unwrap();
        fs::set_permissions(policy.default_key_path(), fs::Permissions::from_mode(0o644)).unwrap();

        let pair = generator(&["192.168.0.2"]).generate(&policy).unwrap();
        let mode = fs::metadata(&pair.key_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_dir_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the materials directory should be
        let blocker = dir.path().join("config");
        fs::write(&blocker, "not a directory").unwrap();
        let policy = TlsPolicy::enabled(&blocker).with_curve(EcdsaCurve::P256);

        let result = generator(&["192.168.0.2"]).generate(&policy);
        assert!(matches!(result, Err(TlsError::Persistence { .. })));
    }
}
