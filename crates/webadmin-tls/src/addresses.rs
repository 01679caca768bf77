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
//! Host address collection for certificate SAN entries.
//!
//! Addresses are collected fresh every time a certificate is generated and
//! never cached.

use std::net::IpAddr;

use tracing::debug;

use crate::error::AddressError;

/// Source of the IP addresses a generated certificate is issued for
pub trait AddressCollector: Send + Sync {
    /// Collect the non-loopback addresses of this host.
    ///
    /// Never returns an empty list: an empty result is
    /// [`AddressError::NoAddressesFound`].
    fn collect(&self) -> Result<Vec<IpAddr>, AddressError>;
}

/// Live interface enumeration
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAddresses;

impl AddressCollector for SystemAddresses {
    fn collect(&self) -> Result<Vec<IpAddr>, AddressError> {
        let interfaces = if_addrs::get_if_addrs().map_err(AddressError::InterfaceEnumeration)?;

        for iface in &interfaces {
            debug!(interface = %iface.name, ip = %iface.ip(), "found interface address");
        }

        host_addresses(interfaces.iter().map(|iface| iface.ip()))
    }
}

/// Fixed address list, for hosts where interface enumeration is not wanted
#[derive(Debug, Clone, Default)]
pub struct StaticAddresses {
    addresses: Vec<IpAddr>,
}

impl StaticAddresses {
    /// Create a collector that always reports `addresses` (after filtering)
    pub fn new(addresses: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            addresses: addresses.into_iter().collect(),
        }
    }
}

impl AddressCollector for StaticAddresses {
    fn collect(&self) -> Result<Vec<IpAddr>, AddressError> {
        host_addresses(self.addresses.iter().copied())
    }
}

/// Reduce raw interface addresses to the SAN set.
///
/// Drops loopback and unspecified addresses and duplicates, keeping the
/// first-seen order.
pub fn host_addresses(
    addresses: impl IntoIterator<Item = IpAddr>,
) -> Result<Vec<IpAddr>, AddressError> {
    let mut collected: Vec<IpAddr> = Vec::new();

    for ip in addresses {
        if ip.is_loopback() || ip.is_unspecified() || collected.contains(&ip) {
            continue;
        }
        collected.push(ip);
    }

    if collected.is_empty() {
        return Err(AddressError::NoAddressesFound);
    }

    Ok(collected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_loopback_only_is_no_addresses() {
        let result = host_addresses([
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
        ]);
        assert!(matches!(result, Err(AddressError::NoAddressesFound)));
    }

    #[test]
    fn test_empty_is_no_addresses() {
        let result = StaticAddresses::default().collect();
        assert!(matches!(result, Err(AddressError::NoAddressesFound)));
    }

    #[test]
    fn test_keeps_order_and_drops_duplicates() {
        let a: IpAddr = "10.0.0.5".parse().unwrap();
        let b: IpAddr = "fe80::1".parse().unwrap();
        let collector = StaticAddresses::new([a, IpAddr::V4(Ipv4Addr::LOCALHOST), b, a]);
        assert_eq!(collector.collect().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_system_addresses_never_report_loopback() {
        // Sandboxes may have no usable interface, both outcomes are legal.
        match SystemAddresses.collect() {
            Ok(addresses) => {
                assert!(!addresses.is_empty());
                assert!(addresses.iter().all(|ip| !ip.is_loopback()));
            }
            Err(AddressError::NoAddressesFound) | Err(AddressError::InterfaceEnumeration(_)) => {}
        }
    }

    fn any_ip() -> impl Strategy<Value = IpAddr> {
        prop_oneof![
            any::<[u8; 4]>().prop_map(|o| IpAddr::V4(Ipv4Addr::from(o))),
            any::<[u16; 8]>().prop_map(|s| IpAddr::V6(Ipv6Addr::from(s))),
            Just(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            Just(IpAddr::V6(Ipv6Addr::LOCALHOST)),
        ]
    }

    proptest! {
        #[test]
        fn prop_host_addresses_filter(input in proptest::collection::vec(any_ip(), 0..32)) {
            let expected: Vec<IpAddr> = input
                .iter()
                .copied()
                .filter(|ip| !ip.is_loopback() && !ip.is_unspecified())
                .collect();

            match host_addresses(input.clone()) {
                Ok(out) => {
                    prop_assert!(out.iter().all(|ip| !ip.is_loopback() && !ip.is_unspecified()));
                    for (i, ip) in out.iter().enumerate() {
                        prop_assert!(!out[i + 1..].contains(ip));
                    }
                    for ip in &expected {
                        prop_assert!(out.contains(ip));
                    }
                }
                Err(AddressError::NoAddressesFound) => prop_assert!(expected.is_empty()),
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
