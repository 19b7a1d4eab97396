//! Shared fixture for CLI integration tests.
//!
//! Clippy cannot track usage across integration test files, hence
//! `allow(dead_code)`.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use ccnotify_index::Database;
use ccnotify_runtime::{CONFIG_FILE_NAME, Config, DB_FILE_NAME, NotifierConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const MISSING_NOTIFIER: &str = "ccnotify-test-missing-notifier";

pub struct TestFixture {
    _temp_dir: TempDir,
    data_dir: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Fixture with notifications disabled.
    pub fn new() -> Self {
        let fixture = Self::bare();
        fixture.write_notifier(NotifierConfig {
            enabled: false,
            ..NotifierConfig::default()
        });
        fixture
    }

    /// Fixture without a config file.
    pub fn bare() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".ccnotify");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            _temp_dir: temp_dir,
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn write_notifier(&self, notifier: NotifierConfig) {
        let config = Config {
            notifier,
            ..Config::default()
        };
        config
            .save_to(&self.data_dir.join(CONFIG_FILE_NAME))
            .expect("Failed to write config");
    }

    pub fn command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ccnotify");
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run one hook event with `payload` on stdin.
    pub fn hook(&self, event: &str, payload: &str) -> assert_cmd::assert::Assert {
        self.command().arg(event).write_stdin(payload).assert()
    }

    pub fn submit(&self, session_id: &str, prompt: &str) -> assert_cmd::assert::Assert {
        self.hook(
            "UserPromptSubmit",
            &format!(
                r#"{{"session_id":"{}","prompt":"{}","cwd":"/home/dev/webapp","hook_event_name":"UserPromptSubmit"}}"#,
                session_id, prompt
            ),
        )
    }

    pub fn stop(&self, session_id: &str) -> assert_cmd::assert::Assert {
        self.hook(
            "Stop",
            &format!(
                r#"{{"session_id":"{}","hook_event_name":"Stop","stop_hook_active":false}}"#,
                session_id
            ),
        )
    }

    pub fn db(&self) -> Database {
        Database::open(&self.data_dir.join(DB_FILE_NAME)).expect("Failed to open ledger")
    }

    pub fn log_contents(&self) -> String {
        fs::read_dir(&self.data_dir)
            .expect("Failed to read data dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.starts_with("ccnotify") && name.ends_with(".log")
            })
            .map(|entry| fs::read_to_string(entry.path()).unwrap_or_default())
            .collect()
    }
}
