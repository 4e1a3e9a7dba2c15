//! Persisted application settings stored as TOML in the app root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level settings loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub planner: PlannerSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Text-generation endpoint parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// OpenAI-compatible chat completions URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on the response body size.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Where the feedback and progress tables are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Overrides `<app root>/data` when set.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_feedback_file")]
    pub feedback_file: String,
    #[serde(default = "default_progress_file")]
    pub progress_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            feedback_file: default_feedback_file(),
            progress_file: default_progress_file(),
        }
    }
}

/// Initial values for the planner form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Study window start, `HH:MM`.
    #[serde(default = "default_start")]
    pub default_start: String,
    /// Study window end, `HH:MM`.
    #[serde(default = "default_end")]
    pub default_end: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_start: default_start(),
            default_end: default_end(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Keep the API key in the credential store between launches.
    #[serde(default)]
    pub remember_api_key: bool,
}

impl StorageSettings {
    /// Resolve the directory holding the table files.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                    path: dir.clone(),
                    source,
                })?;
                Ok(dir.clone())
            }
            None => app_dirs::data_dir().map_err(ConfigError::from),
        }
    }

    pub fn feedback_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolve_data_dir()?.join(&self.feedback_file))
    }

    pub fn progress_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolve_data_dir()?.join(&self.progress_file))
    }
}

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
}

/// Resolve the configuration file path inside the app root.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    load_from(&config_path()?)
}

/// Persist settings to the default location.
pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openai/gpt-oss-120b".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_response_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_feedback_file() -> String {
    "feedback.csv".to_string()
}

fn default_progress_file() -> String {
    "progress_log.csv".to_string()
}

fn default_start() -> String {
    "18:00".to_string()
}

fn default_end() -> String {
    "21:00".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.service.model, "openai/gpt-oss-120b");
        assert_eq!(settings.storage.progress_file, "progress_log.csv");
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[service]\nmodel = \"llama-3.1-8b-instant\"\n\n[ui]\nremember_api_key = true\n",
        )
        .unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.service.model, "llama-3.1-8b-instant");
        assert_eq!(settings.service.temperature, 0.7);
        assert!(settings.ui.remember_api_key);
        assert_eq!(settings.planner.default_start, "18:00");
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut settings = AppSettings::default();
        settings.storage.data_dir = Some(dir.path().join("tables"));
        settings.planner.default_end = "23:30".to_string();
        save_to_path(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[service\nmodel = 1").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn explicit_data_dir_is_created() {
        let dir = tempdir().unwrap();
        let storage = StorageSettings {
            data_dir: Some(dir.path().join("tables")),
            ..StorageSettings::default()
        };
        let path = storage.feedback_path().unwrap();
        assert_eq!(path, dir.path().join("tables").join("feedback.csv"));
        assert!(dir.path().join("tables").is_dir());
    }
}
