use std::{fs, path::PathBuf, sync::Mutex};

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config mutex poisoned")]
    Poisoned,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unknown timezone `{0}`")]
    Timezone(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_name: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Base URL with `GIGS_API_URL` taking precedence over the file.
    pub fn effective_base_url(&self) -> String {
        std::env::var("GIGS_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.api_base_url.clone())
    }

    pub fn remembered_name(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn timezone(&self) -> Result<Option<Tz>, ConfigError> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|_| ConfigError::Timezone(name.to_string())),
        }
    }

    /// Today's calendar date in the configured timezone, or the local one.
    pub fn today(&self) -> Result<NaiveDate, ConfigError> {
        Ok(match self.timezone()? {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        })
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: Mutex<AppConfig>,
}

impl ConfigStore {
    pub fn load() -> Self {
        Self::load_from(utils::config_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let data = match read_config(&path) {
            Ok(config) => config,
            Err(err @ ConfigError::Parse { .. }) => {
                // Keep the unreadable file so the next save does not destroy it.
                let backup = path.with_extension("json.bak");
                match fs::rename(&path, &backup) {
                    Ok(()) => log::warn!(
                        "{err}; moved it to {} and using default settings",
                        backup.display()
                    ),
                    Err(rename_err) => log::warn!(
                        "{err}; could not move it aside ({rename_err}), using default settings"
                    ),
                }
                AppConfig::default()
            }
            Err(err) => {
                log::warn!("{err}; falling back to default settings");
                AppConfig::default()
            }
        };
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn read(&self) -> Result<AppConfig, ConfigError> {
        self.data
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| ConfigError::Poisoned)
    }

    pub fn update<F>(&self, transform: F) -> Result<AppConfig, ConfigError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.data.lock().map_err(|_| ConfigError::Poisoned)?;
        transform(&mut guard);
        write_config(&self.path, &guard)?;
        log::debug!("saved settings to {}", self.path.display());
        Ok(guard.clone())
    }

    pub fn remember_name(&self, name: &str) -> Result<AppConfig, ConfigError> {
        let name = name.trim().to_string();
        self.update(|config| config.user_name = Some(name))
    }
}

fn read_config(path: &PathBuf) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })
}

fn write_config(path: &PathBuf, config: &AppConfig) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.clone(),
        source,
    };
    utils::ensure_parent(path).map_err(io_err)?;
    let contents = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    fs::write(path, contents).map_err(io_err)
}
