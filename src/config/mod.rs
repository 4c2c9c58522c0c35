//! Configuration module for the sensor collector
//!
//! Configuration is a single TOML document with one table per concern:
//!
//! ```toml
//! [buffer]
//! capacity = 400
//! reset_bounds_on_clear = false
//! subscriber_queue_depth = 16
//!
//! [sensor]
//! rate_hz = 200
//! duration_secs = 5
//!
//! [export]
//! format = "csv"
//! file_prefix = "sensor_data"
//! ```
//!
//! Missing tables and keys fall back to their defaults.
//!
//! # App Data Location
//!
//! Exports without an explicit directory, and the default config file, live in
//! the platform data directory under `dev.sensor-collector`:
//! - **Linux**: `~/.local/share/dev.sensor-collector/`
//! - **macOS**: `~/Library/Application Support/dev.sensor-collector/`
//! - **Windows**: `%APPDATA%\dev.sensor-collector\`

pub mod settings;

pub use settings::*;

use crate::error::{CollectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.sensor-collector";

/// Default config filename inside the app data directory
pub const CONFIG_FILE: &str = "collector.toml";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        CollectorError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            CollectorError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Collector Config ====================

/// Complete collector configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub buffer: BufferConfig,
    pub sensor: SensorConfig,
    pub export: ExportConfig,
}

impl CollectorConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load a config file, returning defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load configuration, using defaults: {}", e);
            Self::default()
        })
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CollectorError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            CollectorError::Serialization(format!("Failed to serialize config: {}", e))
        })
    }

    /// Write the config to `path`, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)
            .map_err(|e| CollectorError::Config(format!("Failed to write config: {}", e)))
    }

    /// Reject values the collector cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.buffer.capacity == 0 {
            return Err(CollectorError::Config(
                "buffer.capacity must be at least 1".to_string(),
            ));
        }
        if self.buffer.subscriber_queue_depth == 0 {
            return Err(CollectorError::Config(
                "buffer.subscriber_queue_depth must be at least 1".to_string(),
            ));
        }
        if self.sensor.rate_hz == 0 {
            return Err(CollectorError::Config(
                "sensor.rate_hz must be at least 1".to_string(),
            ));
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(CollectorError::Config(
                "export.file_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
