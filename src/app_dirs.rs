//! Application directory helpers anchored to a single `.auralearn` folder.
//!
//! Config, logs, secrets and the feedback/progress tables all live below the
//! OS config directory (e.g., `%APPDATA%` on Windows). `AURALEARN_CONFIG_HOME`
//! overrides the base for tests or portable setups.

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory that lives under the OS config root.
pub const APP_DIR_NAME: &str = ".auralearn";

/// Environment variable that replaces the OS config root.
pub const CONFIG_HOME_ENV: &str = "AURALEARN_CONFIG_HOME";

static CONFIG_BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create the application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Return the root `.auralearn` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    let path = base.join(APP_DIR_NAME);
    ensure_dir(path)
}

/// Return the logs directory inside the `.auralearn` root, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

/// Default location of the feedback and progress tables.
pub fn data_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("data"))
}

/// Directory holding the encrypted credential fallback.
pub fn secrets_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("secrets"))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    if let Some(path) = CONFIG_BASE_OVERRIDE
        .lock()
        .ok()
        .and_then(|guard| guard.clone())
    {
        return Some(path);
    }
    if let Ok(path) = std::env::var(CONFIG_HOME_ENV) {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Scoped override of the config base used by unit tests.
///
/// Holds a process-wide lock so tests touching the override run one at a time.
#[cfg(test)]
pub(crate) struct ConfigBaseGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
static TEST_LOCK: Mutex<()> = Mutex::new(());

#[cfg(test)]
impl ConfigBaseGuard {
    pub(crate) fn set(path: PathBuf) -> Self {
        let lock = TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let mut guard = CONFIG_BASE_OVERRIDE
            .lock()
            .expect("config base override mutex poisoned");
        *guard = Some(path);
        Self { _lock: lock }
    }
}

#[cfg(test)]
impl Drop for ConfigBaseGuard {
    fn drop(&mut self) {
        if let Ok(mut guard) = CONFIG_BASE_OVERRIDE.lock() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn uses_override_for_root_dir() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());
        let root = app_root_dir().unwrap();
        assert_eq!(root, base.path().join(APP_DIR_NAME));
        assert!(root.is_dir());
    }

    #[test]
    fn nested_dirs_are_created_under_root() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());
        let data = data_dir().unwrap();
        let logs = logs_dir().unwrap();
        assert_eq!(data, base.path().join(APP_DIR_NAME).join("data"));
        assert!(data.is_dir());
        assert!(logs.is_dir());
    }
}
