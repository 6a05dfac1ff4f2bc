use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    assistant::BackendId,
    provider::open_meteo::{FORECAST_URL, GEOCODING_URL},
};

/// Where weather data comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl WeatherSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which answer backends to try, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Example TOML:
    /// backends = ["remote", "rules"]
    pub backends: Vec<String>,

    /// Endpoint speaking the `/api/ai` contract, used by the `remote` backend.
    pub remote_url: Option<String>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self { backends: vec![BackendId::Rules.to_string()], remote_url: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "127.0.0.1:3000".to_string() }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// City used when a command is run without one.
    pub default_city: Option<String>,
    pub weather: WeatherSettings,
    pub assistant: AssistantSettings,
    pub server: ServerSettings,
}

impl Config {
    pub fn default_city_or_err(&self) -> Result<&str> {
        self.default_city.as_deref().filter(|c| !c.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No city given and no default city configured.\n\
                 Hint: pass a city, or run `weathernow configure` to set a default."
            )
        })
    }

    pub fn set_default_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        self.default_city = if city.trim().is_empty() { None } else { Some(city.trim().to_string()) };
    }

    /// Configured backend order as strongly-typed ids.
    pub fn backend_ids(&self) -> Result<Vec<BackendId>> {
        self.assistant.backends.iter().map(|s| BackendId::try_from(s.as_str())).collect()
    }

    pub fn set_backends(&mut self, ids: &[BackendId]) {
        self.assistant.backends = ids.iter().map(ToString::to_string).collect();
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathernow", "weathernow")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
