#![allow(dead_code)]

pub mod mock_asr;
pub mod mock_chat;

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the CLI against a config file inside a private temp dir
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        TestContext {
            temp_dir,
            config_path,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Run `speechscore` with `args` and the isolated config
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_speechscore"))
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .env_remove("RUST_LOG")
            .env("XDG_CONFIG_HOME", self.temp_dir.path())
            .output()
            .expect("Failed to run speechscore")
    }

    /// Run and return stdout, failing the test on a non-zero exit
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "speechscore {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("stdout is not UTF-8")
    }
}
