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
//! TLS bootstrap for the Sandstorm web admin
//!
//! At startup the admin service either reuses a certificate pair found on
//! disk or, when allowed, generates a self-signed one whose SAN entries are
//! the host's current interface addresses.
//!
//! # Components
//!
//! - [`AddressCollector`]: non-loopback host addresses for SAN entries
//! - [`CertificateStore`]: finds existing materials, read-only
//! - [`CertificateValidator`]: checks a pair parses, matches and loads into rustls
//! - [`CertificateGenerator`]: creates and persists a new self-signed pair
//! - [`TlsBootstrapper`]: the state machine composing the above under a [`TlsPolicy`]
//!
//! # Example
//!
//! ```no_run
//! use webadmin_tls::{BootstrapOutcome, TlsBootstrapper, TlsPolicy};
//!
//! # fn main() -> webadmin_tls::TlsResult<()> {
//! let policy = TlsPolicy::enabled("./config");
//! match TlsBootstrapper::new(policy).run()? {
//!     BootstrapOutcome::Disabled => println!("plain http"),
//!     BootstrapOutcome::Ready(materials) => {
//!         println!("https with {}", materials.cert_path.display())
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod addresses;
pub mod bootstrap;
pub mod error;
pub mod generator;
pub mod inspect;
pub mod key;
pub mod policy;
pub mod store;
pub mod validator;

pub use addresses::{host_addresses, AddressCollector, StaticAddresses, SystemAddresses};
pub use bootstrap::{
    BootstrapOutcome, BootstrapState, MaterialOrigin, TlsBootstrapper, TlsMaterials,
};
pub use error::{AddressError, TlsError, TlsResult};
pub use generator::{CertificateGenerator, MaterialGenerator, PersistedPair, VALIDITY_DAYS};
pub use inspect::{inspect_certificate, CertificateInfo, KeyUsageFlags};
pub use key::{KeyAlgorithm, LoadedKey, PrivateKey};
pub use policy::{
    EcdsaCurve, TlsPolicy, UnknownCurve, CERT_FILE_NAME, DEFAULT_ORGANIZATION, KEY_FILE_NAME,
};
pub use store::{CertificateStore, Located, Presence};
pub use validator::CertificateValidator;
