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
//! Lookup of existing certificate materials. Read-only.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::policy::{explicit, TlsPolicy, CERT_FILE_NAME, KEY_FILE_NAME};

/// Whether one file of the pair was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// The file exists at this path
    Found(PathBuf),
    /// No explicit path and no materials directory to look in
    NotConfigured,
    /// A path was resolved but nothing is there
    NotFound(PathBuf),
}

impl Presence {
    /// Path of a found file
    pub fn path(&self) -> Option<&Path> {
        match self {
            Presence::Found(path) => Some(path),
            Presence::NotConfigured | Presence::NotFound(_) => None,
        }
    }

    /// True for [`Presence::Found`]
    pub fn is_found(&self) -> bool {
        matches!(self, Presence::Found(_))
    }
}

/// Result of looking for both files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Certificate presence
    pub cert: Presence,
    /// Private key presence
    pub key: Presence,
}

impl Located {
    /// Both paths when certificate and key were found
    pub fn pair(&self) -> Option<(&Path, &Path)> {
        Some((self.cert.path()?, self.key.path()?))
    }

    /// Describe what is missing, for error messages
    pub fn describe_missing(&self) -> String {
        let mut missing = Vec::new();
        for (label, presence) in [("certificate", &self.cert), ("key", &self.key)] {
            match presence {
                Presence::Found(_) => {}
                Presence::NotConfigured => missing.push(format!("{label}: no path configured")),
                Presence::NotFound(path) => {
                    missing.push(format!("{label}: '{}' does not exist", path.display()))
                }
            }
        }
        missing.join(", ")
    }
}

/// Finds certificate materials on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateStore;

impl CertificateStore {
    /// Resolve and check both files for `policy`
    pub fn locate(&self, policy: &TlsPolicy) -> Located {
        let located = Located {
            cert: resolve(policy.cert_path.as_deref(), &policy.materials_dir, CERT_FILE_NAME),
            key: resolve(policy.key_path.as_deref(), &policy.materials_dir, KEY_FILE_NAME),
        };
        debug!(cert = ?located.cert, key = ?located.key, "located certificate materials");
        located
    }
}

fn resolve(explicit_path: Option<&Path>, materials_dir: &Path, file_name: &str) -> Presence {
    let candidate = match explicit(explicit_path) {
        Some(path) => path,
        None if materials_dir.as_os_str().is_empty() => return Presence::NotConfigured,
        None => materials_dir.join(file_name),
    };

    if candidate.is_file() {
        Presence::Found(candidate)
    } else {
        Presence::NotFound(candidate)
    }
}
