#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEST_PIN: &str = "1234";

/// A scratch home directory for one test run of the binary.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn secrets_dir(&self) -> PathBuf {
        self.dir.path().join("secrets")
    }

    pub fn dump_path(&self) -> PathBuf {
        self.data_dir().join("database_query.txt")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// The `daybook` binary with a clean environment pointing into this
    /// directory and `DAYBOOK_PIN` set to [`TEST_PIN`].
    pub fn command(&self) -> Command {
        let mut cmd = base_daybook_command(self.dir.path());
        cmd.env("DAYBOOK_DIR", self.data_dir())
            .env("DAYBOOK_SECRETS_DIR", self.secrets_dir())
            .env("DAYBOOK_PIN", TEST_PIN);
        cmd
    }

    /// Runs `daybook pin set` with the test PIN.
    pub fn set_pin(&self) {
        self.command().args(["pin", "set"]).assert().success();
    }
}

/// Creates a `Command` for the `daybook` binary with a clean, non-interactive
/// environment rooted at `home`.
pub fn base_daybook_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("daybook").expect("daybook binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    cmd.env("HOME", home).env("RUST_LOG", "off");
    cmd
}
