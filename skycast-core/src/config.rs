use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::{Error, Result};

/// Environment variable checked at load time; overrides the config file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key. Absence is a startup fault, not a per-request one.
    pub api_key: Option<String>,
}

impl Config {
    /// Load config from disk (empty default if no file yet), then let the
    /// environment override the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|err| {
                Error::Configuration(format!("Failed to read config file {}: {err}", path.display()))
            })?;

            toml::from_str(&contents).map_err(|err| {
                Error::Configuration(format!("Failed to parse config file {}: {err}", path.display()))
            })?
        } else {
            Self::default()
        };

        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.is_empty() {
                cfg.api_key = Some(key);
            }
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                Error::Configuration(format!(
                    "Failed to create config directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|err| Error::Configuration(format!("Failed to serialize config: {err}")))?;

        fs::write(&path, toml).map_err(|err| {
            Error::Configuration(format!("Failed to write config file {}: {err}", path.display()))
        })?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast").ok_or_else(|| {
            Error::Configuration("Could not determine platform config directory".to_string())
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// The API key, or a `Configuration` error with a setup hint.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `skycast configure` or set {API_KEY_ENV}."
                ))
            })
    }
}
