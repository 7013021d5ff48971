#![allow(dead_code)]

pub mod fixtures;
pub mod store;

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the leaddesk binary against an isolated config directory.
pub struct LeadDeskTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
}

impl LeadDeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        LeadDeskTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_leaddesk"),
        }
    }

    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    pub fn config_path(&self) -> PathBuf {
        self.home().join("config.yaml")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("LEADDESK_HOME", self.home())
            .env_remove("LEADDESK_TOKEN")
            .env_remove("LEADDESK_LOG")
            .output()
            .expect("Failed to execute leaddesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        fs::create_dir_all(self.home()).expect("Failed to create config directory");
        fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }
}

/// Restores an environment variable to its previous value on drop.
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    /// # Safety
    /// Calls `std::env::set_var`; tests using this must be `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: env::var_os(key),
        };
        unsafe { env::set_var(key, value) };
        guard
    }

    /// # Safety
    /// Calls `std::env::remove_var`; tests using this must be `#[serial]`.
    pub unsafe fn remove(key: &str) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: env::var_os(key),
        };
        unsafe { env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests holding an EnvGuard are marked #[serial]
        match &self.original {
            Some(val) => unsafe { env::set_var(&self.key, val) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
