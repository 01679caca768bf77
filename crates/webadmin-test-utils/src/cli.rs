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
//! Helpers for running the `webadmin-server` binary.

use assert_cmd::Command;
use std::path::Path;

/// Configuration keys cleared from the child environment so the host's
/// shell cannot leak into a test.
pub const ADMIN_ENV_KEYS: &[&str] = &[
    "ADMIN_ADDRESS",
    "ADMIN_PORT",
    "ADMIN_PASSWORD",
    "ADMIN_SSL_USE",
    "ADMIN_SSL_VERIFY",
    "ADMIN_SSL_CERT",
    "ADMIN_SSL_KEY",
    "ADMIN_SSL_CURVE",
    "ADMIN_AUTOMATIC_UPDATES",
    "ADMIN_DIR",
    "ADMIN_LOGS",
    "ADMIN_CONFIG_DIR",
    "ADMIN_LOG_LEVEL",
    "ADMIN_LOG_FORMAT",
    "ADMIN_LOG_FILE",
    "ADMIN_LOG_OUTPUT",
    "ADMIN_LOG_COLOR",
    "ADMIN_LOG_TIMESTAMPS",
    "ADMIN_LOG_THREAD_IDS",
    "ADMIN_LOG_TARGETS",
    "RUST_LOG",
];

/// Get a Command for the `webadmin-server` binary with a clean environment.
///
/// # Example
/// ```ignore
/// use webadmin_test_utils::webadmin_server;
///
/// webadmin_server()
///     .args(["--env-file", ".env", "--bootstrap-only"])
///     .assert()
///     .success();
/// ```
#[allow(deprecated)] // cargo_bin is deprecated but still works for our use case
pub fn webadmin_server() -> Command {
    let mut cmd = Command::cargo_bin("webadmin-server").expect("webadmin-server binary not found");
    for key in ADMIN_ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

/// Fluent wrapper for the common `--bootstrap-only` invocation.
pub struct ServerCommand {
    cmd: Command,
}

impl ServerCommand {
    /// Run a bootstrap pass with the given `.env` file, from its directory.
    pub fn bootstrap(env_file: &Path) -> Self {
        let mut cmd = webadmin_server();
        cmd.arg("--env-file").arg(env_file).arg("--bootstrap-only");
        if let Some(dir) = env_file.parent() {
            cmd.current_dir(dir);
        }
        Self { cmd }
    }

    /// Add an argument to the command.
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.arg(arg);
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Execute the command and assert success.
    pub fn run_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Execute the command and assert failure.
    pub fn run_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Get the underlying Command for custom assertions.
    pub fn into_inner(self) -> Command {
        self.cmd
    }
}
