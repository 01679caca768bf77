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
//! Read-only certificate inspection with x509-parser.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use rustls::pki_types::CertificateDer;
use serde::Serialize;
use x509_parser::extensions::GeneralName;
use x509_parser::parse_x509_certificate;

use crate::error::{TlsError, TlsResult};

/// Key usage bits relevant to the admin certificate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyUsageFlags {
    /// digitalSignature
    pub digital_signature: bool,
    /// keyEncipherment
    pub key_encipherment: bool,
    /// keyCertSign
    pub key_cert_sign: bool,
}

/// Summary of a parsed X.509 certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// First subject O= attribute
    pub organization: Option<String>,
    /// Serial number as colon separated hex
    pub serial: String,
    /// Raw serial number bytes
    #[serde(skip)]
    pub serial_bytes: Vec<u8>,
    /// notBefore, unix seconds
    pub not_before: i64,
    /// notAfter, unix seconds
    pub not_after: i64,
    /// IP address SAN entries, in certificate order
    pub san_ips: Vec<IpAddr>,
    /// basicConstraints extension present
    pub basic_constraints: bool,
    /// basicConstraints cA flag
    pub is_ca: bool,
    /// Issuer and subject are the same name
    pub self_issued: bool,
    /// Key usage extension bits
    pub key_usage: KeyUsageFlags,
    /// Extended key usage contains serverAuth
    pub server_auth: bool,
    /// Raw subjectPublicKey bits
    #[serde(skip)]
    pub public_key: Vec<u8>,
}

impl CertificateInfo {
    /// Parse a DER certificate
    pub fn from_der(der: &[u8]) -> Result<Self, String> {
        let (_, cert) =
            parse_x509_certificate(der).map_err(|e| format!("not a valid X.509 certificate: {e}"))?;

        let san_ips = match cert.subject_alternative_name() {
            Ok(Some(san)) => san
                .value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::IPAddress(bytes) => ip_from_bytes(bytes),
                    _ => None,
                })
                .collect(),
            Ok(None) => Vec::new(),
            Err(e) => return Err(format!("invalid subjectAltName extension: {e}")),
        };

        let (basic_constraints, is_ca) = match cert.basic_constraints() {
            Ok(Some(bc)) => (true, bc.value.ca),
            Ok(None) => (false, false),
            Err(e) => return Err(format!("invalid basicConstraints extension: {e}")),
        };

        let key_usage = match cert.key_usage() {
            Ok(Some(ku)) => KeyUsageFlags {
                digital_signature: ku.value.digital_signature(),
                key_encipherment: ku.value.key_encipherment(),
                key_cert_sign: ku.value.key_cert_sign(),
            },
            Ok(None) => KeyUsageFlags::default(),
            Err(e) => return Err(format!("invalid keyUsage extension: {e}")),
        };

        let server_auth = match cert.extended_key_usage() {
            Ok(Some(eku)) => eku.value.server_auth,
            Ok(None) => false,
            Err(e) => return Err(format!("invalid extendedKeyUsage extension: {e}")),
        };

        let organization = cert
            .subject()
            .iter_organization()
            .next()
            .and_then(|attr| attr.as_str().ok())
            .map(str::to_string);

        Ok(Self {
            organization,
            serial: cert.raw_serial_as_string(),
            serial_bytes: cert.raw_serial().to_vec(),
            not_before: cert.validity().not_before.timestamp(),
            not_after: cert.validity().not_after.timestamp(),
            san_ips,
            basic_constraints,
            is_ca,
            self_issued: cert.issuer().as_raw() == cert.subject().as_raw(),
            key_usage,
            server_auth,
            public_key: cert.public_key().subject_public_key.data.to_vec(),
        })
    }

    /// Length of the validity window in seconds
    pub fn validity_seconds(&self) -> i64 {
        self.not_after - self.not_before
    }

    /// True once notAfter has passed
    pub fn is_expired(&self) -> bool {
        time::OffsetDateTime::now_utc().unix_timestamp() >= self.not_after
    }
}

/// Read every `CERTIFICATE` block of a PEM document
pub fn read_certificates(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, String> {
    let mut reader = pem;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("malformed PEM: {e}"))?;

    if certs.is_empty() {
        return Err("no CERTIFICATE block found".to_string());
    }

    Ok(certs)
}

/// Parse the leaf certificate stored at `path`
pub fn inspect_certificate(path: impl AsRef<Path>) -> TlsResult<CertificateInfo> {
    let path = path.as_ref();
    let inspection_error = |reason: String| TlsError::Inspection {
        path: path.to_path_buf(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| inspection_error(e.to_string()))?;
    let certs = read_certificates(&pem).map_err(inspection_error)?;
    CertificateInfo::from_der(&certs[0]).map_err(inspection_error)
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(|o| IpAddr::V4(Ipv4Addr::from(o))),
        16 => <[u8; 16]>::try_from(bytes).ok().map(|o| IpAddr::V6(Ipv6Addr::from(o))),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, DnType, KeyPair, SanType};

    fn sample_cert() -> rcgen::Certificate {
        let mut params = CertificateParams::default();
        params.distinguished_name.push(DnType::OrganizationName, "Inspect Test");
        params.subject_alt_names = vec![
            SanType::IpAddress("192.168.1.20".parse().unwrap()),
            SanType::DnsName("admin.local".try_into().unwrap()),
            SanType::IpAddress("fd00::20".parse().unwrap()),
        ];
        let key_pair = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).unwrap();
        params.self_signed(&key_pair).unwrap()
    }

    #[test]
    fn test_reads_ip_sans_only() {
        let cert = sample_cert();
        let info = CertificateInfo::from_der(cert.der()).unwrap();
        assert_eq!(
            info.san_ips,
            vec![
                "192.168.1.20".parse::<IpAddr>().unwrap(),
                "fd00::20".parse::<IpAddr>().unwrap()
            ]
        );
        assert_eq!(info.organization.as_deref(), Some("Inspect Test"));
        assert!(info.self_issued);
        assert!(!info.is_ca);
    }

    #[test]
    fn test_read_certificates_rejects_key_only_pem() {
        let key_pair = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).unwrap();
        let err = read_certificates(key_pair.serialize_pem().as_bytes()).unwrap_err();
        assert!(err.contains("no CERTIFICATE"));
    }

    #[test]
    fn test_from_der_rejects_garbage() {
        assert!(CertificateInfo::from_der(b"\x30\x03\x02\x01\x00").is_err());
    }

    #[test]
    fn test_inspect_missing_file() {
        let err = inspect_certificate("/nonexistent/web_admin_cert.pem").unwrap_err();
        assert!(matches!(err, TlsError::Inspection { .. }));
    }

    #[test]
    fn test_ip_from_bytes_lengths() {
        assert_eq!(ip_from_bytes(&[10, 0, 0, 5]), Some("10.0.0.5".parse().unwrap()));
        assert_eq!(ip_from_bytes(&[1, 2, 3]), None);
    }
}
