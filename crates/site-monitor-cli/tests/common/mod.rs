#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Isolated working area for one CLI invocation sequence.
///
/// The process runs inside `work` with `HOME` and `XDG_CONFIG_HOME` pointed
/// there too, so no config file from the developer machine is picked up.
pub struct Sandbox {
    pub work: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        Self {
            work: tempfile::tempdir().expect("failed to create sandbox"),
        }
    }

    /// Snapshot directory used by [`Sandbox::cmd`]
    pub fn history(&self) -> PathBuf {
        self.work.path().join("history")
    }

    /// A configured `site-monitor` command writing into [`Sandbox::history`].
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--dir").arg(self.history());
        cmd
    }

    /// Same as [`Sandbox::cmd`] without a `--dir` argument.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("site-monitor"));
        cmd.timeout(CMD_TIMEOUT);
        cmd.current_dir(self.work.path());
        cmd.env_remove("SITE_MONITOR_CONFIG");
        cmd.env("HOME", self.work.path());
        cmd.env("XDG_CONFIG_HOME", self.work.path().join(".config"));
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Write a config file with both providers pointed at `api_base`.
    pub fn write_config(&self, api_base: &str, extra: &str) -> PathBuf {
        let path = self.work.path().join("credentials.toml");
        fs::write(&path, provider_config(api_base, extra)).unwrap();
        path
    }

    /// Files currently in the snapshot directory, sorted.
    pub fn snapshots(&self) -> Vec<String> {
        list_files(&self.history())
    }
}

#[allow(dead_code)]
pub fn provider_config(api_base: &str, extra: &str) -> String {
    format!(
        r#"
[sms]
account_id = "AC1"
auth_token = "token"
from_number = "+15550000000"
api_base = "{api_base}"

[email]
api_key = "SG.key"
from_address = "alerts@example.com"
api_base = "{api_base}"
{extra}
"#
    )
}

#[allow(dead_code)]
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
