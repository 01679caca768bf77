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
//! Log file naming and placement, plus settings parsed the way the server
//! reads them from `ADMIN_LOG_*` values.
//!
//! Nothing here installs the global subscriber; `file_logging.rs` does.

use chrono::{FixedOffset, TimeZone, Utc};
use std::fs;
use std::io::Write;
use tempfile::TempDir;
use webadmin_observability::{
    log_file_name, open_log_file, ConsoleStyle, LogConfig, LogFormat, LogOutput,
};

#[test]
fn test_log_file_name_uses_local_wall_clock() {
    let offset = FixedOffset::east_opt(10 * 3600).unwrap();
    let start = offset.with_ymd_and_hms(2025, 6, 30, 22, 15, 0).unwrap();

    // The name carries the wall clock of the zone, not UTC
    assert_eq!(log_file_name(&start), "2025_06_30T22_15_00.log");
    assert_eq!(
        log_file_name(&start.with_timezone(&Utc)),
        "2025_06_30T12_15_00.log"
    );
}

#[test]
fn test_log_file_names_sort_by_start_time() {
    let earlier = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 59).unwrap();
    let later = Utc.with_ymd_and_hms(2024, 10, 1, 7, 0, 0).unwrap();
    assert!(log_file_name(&earlier) < log_file_name(&later));
}

#[test]
fn test_restarts_get_their_own_file() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("nested").join("logs");
    let first_start = Utc.with_ymd_and_hms(2024, 5, 4, 3, 2, 1).unwrap();
    let second_start = Utc.with_ymd_and_hms(2024, 5, 4, 3, 2, 2).unwrap();

    let (mut first, first_path) = open_log_file(&logs, &first_start).unwrap();
    writeln!(first, "run one").unwrap();
    let (mut second, second_path) = open_log_file(&logs, &second_start).unwrap();
    writeln!(second, "run two").unwrap();

    assert_ne!(first_path, second_path);
    assert_eq!(fs::read_to_string(first_path).unwrap(), "run one\n");
    assert_eq!(fs::read_to_string(second_path).unwrap(), "run two\n");
    assert_eq!(fs::read_dir(&logs).unwrap().count(), 2);
}

#[test]
fn test_log_dir_that_is_a_file_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("logs");
    fs::write(&blocker, "not a directory").unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(open_log_file(&blocker, &start).is_err());
}

#[test]
fn test_settings_from_admin_values() {
    let config = LogConfig::new()
        .with_format("compact".parse::<LogFormat>().unwrap())
        .with_output("stdout".parse::<LogOutput>().unwrap())
        .with_color(false)
        .with_timestamps(false)
        .with_thread_ids(true)
        .with_targets(false)
        .with_log_dir("./logs");

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.output, LogOutput::Stdout);
    assert_eq!(
        config.style,
        ConsoleStyle {
            color: false,
            timestamps: false,
            thread_ids: true,
            targets: false,
        }
    );
    assert!(config.log_dir.is_some());
}
