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
//! Isolated certificate material directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// Conventional certificate file name inside a materials directory
pub const TEST_CERT_FILE: &str = "web_admin_cert.pem";

/// Conventional key file name inside a materials directory
pub const TEST_KEY_FILE: &str = "web_admin_key.pem";

/// A temporary directory laid out like a web admin installation.
///
/// The root holds the `.env` file; certificates go to `config/` below it,
/// which is not created up front.
///
/// # Example
/// ```ignore
/// use webadmin_test_utils::TestMaterials;
///
/// let materials = TestMaterials::new();
/// let env_file = materials.write_env(&[("ADMIN_SSL_USE", "true")]);
/// ```
pub struct TestMaterials {
    temp_dir: TempDir,
}

impl Default for TestMaterials {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMaterials {
    /// Create a new empty installation directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Root of the installation.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory certificates are looked up in and generated into.
    pub fn materials_dir(&self) -> PathBuf {
        self.path().join("config")
    }

    /// Conventional certificate path.
    pub fn cert_path(&self) -> PathBuf {
        self.materials_dir().join(TEST_CERT_FILE)
    }

    /// Conventional key path.
    pub fn key_path(&self) -> PathBuf {
        self.materials_dir().join(TEST_KEY_FILE)
    }

    /// Path of the `.env` file.
    pub fn env_path(&self) -> PathBuf {
        self.path().join(".env")
    }

    /// Log directory inside the installation.
    pub fn logs_dir(&self) -> PathBuf {
        self.path().join("logs")
    }

    /// True when both conventional files exist.
    pub fn has_pair(&self) -> bool {
        self.cert_path().is_file() && self.key_path().is_file()
    }

    /// Write a `.env` file pointing the materials and log directories
    /// into this installation, followed by `entries`.
    pub fn write_env(&self, entries: &[(&str, &str)]) -> PathBuf {
        let mut content = format!(
            "ADMIN_CONFIG_DIR={}\nADMIN_LOGS={}\n",
            self.materials_dir().display(),
            self.logs_dir().display()
        );
        for (key, value) in entries {
            content.push_str(&format!("{key}={value}\n"));
        }

        let path = self.env_path();
        fs::write(&path, content).expect("Failed to write env file");
        path
    }

    /// Write a file relative to the installation root.
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Cut a file down to `keep` of its bytes.
    pub fn truncate(&self, path: &Path, keep: usize) {
        let content = fs::read(path).expect("Failed to read file");
        fs::write(path, &content[..keep.min(content.len())]).expect("Failed to truncate file");
    }

    /// Truncate the conventional key file to half its length.
    pub fn truncate_key(&self) {
        let key_path = self.key_path();
        let len = fs::metadata(&key_path).expect("Failed to stat key").len() as usize;
        self.truncate(&key_path, len / 2);
    }

    /// Replace the conventional certificate with a well-formed PEM block
    /// that does not hold a certificate.
    pub fn corrupt_cert(&self) {
        fs::write(
            self.cert_path(),
            "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
        )
        .expect("Failed to corrupt certificate");
    }

    /// Modification time of a file.
    pub fn modified(path: &Path) -> SystemTime {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .expect("Failed to read modification time")
    }

    /// Read a file's bytes.
    pub fn read(path: &Path) -> Vec<u8> {
        fs::read(path).expect("Failed to read file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let materials = TestMaterials::new();
        assert!(materials.cert_path().starts_with(materials.materials_dir()));
        assert!(!materials.materials_dir().exists());
        assert!(!materials.has_pair());
    }

    #[test]
    fn test_write_env_points_into_installation() {
        let materials = TestMaterials::new();
        let env = materials.write_env(&[("ADMIN_SSL_USE", "true")]);
        let content = fs::read_to_string(env).unwrap();

        assert!(content.contains(&format!("ADMIN_CONFIG_DIR={}", materials.materials_dir().display())));
        assert!(content.ends_with("ADMIN_SSL_USE=true\n"));
    }

    #[test]
    fn test_truncate() {
        let materials = TestMaterials::new();
        let path = materials.write_file("config/x.pem", b"0123456789");
        materials.truncate(&path, 4);
        assert_eq!(TestMaterials::read(&path), b"0123");
    }
}
