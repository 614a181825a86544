//! Where quire keeps its settings, drafts and logs on disk

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

const APP_DIR: &str = "quire";

/// Overrides the config directory outright (tests, portable installs)
pub const CONFIG_DIR_ENV: &str = "QUIRE_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `$QUIRE_CONFIG_DIR`, else the platform config dir joined with `quire`
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(env::var_os(CONFIG_DIR_ENV), env::var_os("XDG_CONFIG_HOME"))
}

fn resolve_config_dir(explicit: Option<OsString>, xdg: Option<OsString>) -> Option<PathBuf> {
    if let Some(dir) = explicit.filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    // XDG wins on every unix, macOS included
    let base = if cfg!(windows) {
        dirs::config_dir()
    } else {
        xdg.filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
    };
    base.map(|dir| dir.join(APP_DIR))
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.yaml"))
}

/// Draft written by the autosave fallback store
pub fn autosave_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("autosave.html"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn create(path: &Path) -> Result<PathBuf, PathError> {
    fs::create_dir_all(path).map_err(|source| PathError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Create the logs directory (and its parents) if missing
pub fn ensure_logs_dir() -> Result<PathBuf, PathError> {
    let logs = logs_dir().ok_or(PathError::NoConfigDir)?;
    create(&logs)
}
