//! Settings sections of the collector configuration
//!
//! # Main Types
//!
//! - [`BufferConfig`] - Window capacity, clear semantics, subscriber queues
//! - [`SensorConfig`] - Sampling rate and session length for the sensor pump
//! - [`ExportConfig`] - Export format, destination directory and file naming

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::export::ExportFormat;
use crate::publish::DEFAULT_SUBSCRIBER_QUEUE_DEPTH;
use crate::types::DEFAULT_CAPACITY;

/// Ring buffer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Number of samples kept in the live window
    pub capacity: usize,

    /// Whether `clear()` also resets the running axis bounds
    pub reset_bounds_on_clear: bool,

    /// Events each subscriber may queue before new ones are dropped
    pub subscriber_queue_depth: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            reset_bounds_on_clear: false,
            subscriber_queue_depth: DEFAULT_SUBSCRIBER_QUEUE_DEPTH,
        }
    }
}

/// Sensor pump settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Target sampling rate in Hz
    pub rate_hz: u32,

    /// How long a recording session runs in the collector binary
    pub duration_secs: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            rate_hz: 200,
            duration_secs: 5,
        }
    }
}

impl SensorConfig {
    /// Interval between samples at the configured rate
    pub fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.rate_hz.max(1)))
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format
    pub format: ExportFormat,

    /// Destination directory (None = app data directory)
    pub directory: Option<PathBuf>,

    /// File name prefix; a timestamp and extension are appended
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            directory: None,
            file_prefix: String::from("sensor_data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_period() {
        let sensor = SensorConfig {
            rate_hz: 200,
            ..Default::default()
        };
        assert_eq!(sensor.period(), Duration::from_millis(5));

        let zero = SensorConfig {
            rate_hz: 0,
            ..Default::default()
        };
        assert_eq!(zero.period(), Duration::from_secs(1));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(BufferConfig::default().capacity, 400);
        assert!(!BufferConfig::default().reset_bounds_on_clear);
        assert_eq!(ExportConfig::default().format, ExportFormat::Csv);
    }
}
