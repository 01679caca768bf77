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
//! Custom assertions for certificate materials.

use std::collections::BTreeSet;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use x509_parser::extensions::GeneralName;
use x509_parser::pem::parse_x509_pem;

/// Assert that a PEM file starts with the given block label.
pub fn assert_pem_label(path: &Path, label: &str) {
    let content = fs::read_to_string(path).expect("Failed to read PEM file");
    let header = format!("-----BEGIN {label}-----");
    assert!(
        content.starts_with(&header),
        "{:?} should start with {}",
        path,
        header
    );
}

/// Assert that only the owner can read or write the file.
///
/// On non-Unix platforms this only checks that the file exists.
pub fn assert_key_file_private(path: &Path) {
    let metadata = fs::metadata(path).expect("Failed to stat key file");
    assert!(metadata.is_file(), "{:?} should be a regular file", path);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "{:?} should have mode 0600, has {:o}", path, mode);
    }
}

/// Assert that the certificate's IP SAN entries are exactly `expected`,
/// ignoring order.
pub fn assert_san_ips(cert_path: &Path, expected: &[IpAddr]) {
    let actual: BTreeSet<IpAddr> = certificate_san_ips(cert_path).into_iter().collect();
    let expected: BTreeSet<IpAddr> = expected.iter().copied().collect();
    assert_eq!(actual, expected, "SAN IP entries of {:?}", cert_path);
}

/// Assert the length of the certificate's validity window in days.
pub fn assert_validity_days(cert_path: &Path, days: i64) {
    let pem = fs::read(cert_path).expect("Failed to read certificate");
    let (_, pem) = parse_x509_pem(&pem).expect("Certificate is not PEM");
    let cert = pem.parse_x509().expect("Certificate is not X.509");
    let validity = cert.validity();
    let seconds = validity.not_after.timestamp() - validity.not_before.timestamp();
    assert_eq!(seconds, days * 24 * 60 * 60, "validity window of {:?}", cert_path);
}

/// IP SAN entries of a PEM certificate, in certificate order.
pub fn certificate_san_ips(cert_path: &Path) -> Vec<IpAddr> {
    let pem = fs::read(cert_path).expect("Failed to read certificate");
    let (_, pem) = parse_x509_pem(&pem).expect("Certificate is not PEM");
    let cert = pem.parse_x509().expect("Certificate is not X.509");

    let Some(san) = cert
        .subject_alternative_name()
        .expect("Invalid subjectAltName extension")
    else {
        return Vec::new();
    };

    san.value
        .general_names
        .iter()
        .filter_map(|name| match name {
            GeneralName::IPAddress(bytes) => match bytes.len() {
                4 => <[u8; 4]>::try_from(*bytes).ok().map(|o| IpAddr::V4(Ipv4Addr::from(o))),
                16 => <[u8; 16]>::try_from(*bytes).ok().map(|o| IpAddr::V6(Ipv6Addr::from(o))),
                _ => None,
            },
            _ => None,
        })
        .collect()
}
