use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub camera: CameraSettings,
    pub location: LocationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub index: u32,
    pub capture_delay_ms: u64,
    pub preview_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            capture_delay_ms: 5000,
            preview_buffer_size: 4,
        }
    }
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://ipapi.co/json/".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            camera: CameraSettings::default(),
            location: LocationSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `moodtunes.toml` (optional) and `MOODTUNES_*`
    /// environment overrides, on top of the defaults.
    pub fn load() -> Result<Self, AppError> {
        let config = Config::builder()
            .add_source(File::with_name("moodtunes").required(false))
            .add_source(Environment::with_prefix("MOODTUNES").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
