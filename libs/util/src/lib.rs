use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Overrides the directory configuration files are read from.
pub const HOME_ENV: &str = "MAGAZINE_HOME";

/// Directory holding `Config.toml` and `Secrets.toml`: `$MAGAZINE_HOME`
/// when set, else the cargo workspace root, else the current directory.
pub fn workspace_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }

    locate_workspace().unwrap_or_else(|| PathBuf::from("."))
}

fn locate_workspace() -> Option<PathBuf> {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let cargo_path = Path::new(std::str::from_utf8(&output.stdout).ok()?.trim());
    cargo_path.parent().map(Path::to_path_buf)
}

pub fn load_config<T: DeserializeOwned>(config_name: &str) -> anyhow::Result<T> {
    load_from(&workspace_dir(), config_name)
}

pub fn load_from<T: DeserializeOwned>(
    dir: &Path,
    file_name: &str,
) -> anyhow::Result<T> {
    let path = dir.join(file_name);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<T>(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}
