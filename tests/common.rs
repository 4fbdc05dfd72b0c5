use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

/// Command isolated from the user's config and environment; without an
/// endpoint it runs against the offline backend.
pub fn panelvote(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("panelvote");
    cmd.env("PANELVOTE_CONFIG_DIR", config_dir)
        .env_remove("PANELVOTE_ENDPOINT")
        .env_remove("PANELVOTE_PASSWORD")
        .env_remove("PANELVOTE_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Same isolation as [`panelvote`], as a plain process for long-running
/// commands that the test stops itself
#[allow(dead_code)]
pub fn panelvote_process(config_dir: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_panelvote"));
    cmd.env("PANELVOTE_CONFIG_DIR", config_dir)
        .env_remove("PANELVOTE_ENDPOINT")
        .env_remove("PANELVOTE_PASSWORD")
        .env_remove("PANELVOTE_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a session file as `login` would
pub fn write_session(config_dir: &Path, username: &str, role: &str, name: &str) {
    let session = serde_json::json!({
        "username": username,
        "role": role,
        "name": name,
        "loggedInAt": "2026-01-01T09:00:00Z",
    });
    fs::write(
        config_dir.join("session.json"),
        serde_json::to_string_pretty(&session).unwrap(),
    )
    .unwrap();
}

#[allow(dead_code)]
pub fn login_as_admin(config_dir: &Path) {
    write_session(config_dir, "admin", "admin", "Yönetici");
}

#[allow(dead_code)]
pub fn login_as_panelist(config_dir: &Path) {
    write_session(config_dir, "ayse", "panelist", "Ayşe");
}
