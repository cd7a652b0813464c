#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// An empty config file so tests never pick up the developer's own settings.
fn config_file() -> std::path::PathBuf {
    static CONFIG_DIR: OnceLock<TempDir> = OnceLock::new();
    let dir = CONFIG_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create config dir for tests"));
    let path = dir.path().join("config.toml");
    if !path.exists() {
        std::fs::write(&path, "").expect("failed to write test config");
    }
    path
}

/// Create a configured `radmon` command suitable for integration tests.
pub fn radmon_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("radmon"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("RADMON_CONFIG", config_file());
    cmd.env_remove("RADMON_READINGS_URL");
    cmd.env_remove("RADMON_NARRATIVE_URL");
    cmd.env_remove("RADMON_CACHE_LIFETIME_SECS");
    cmd.env("NO_COLOR", "1");
    cmd
}
