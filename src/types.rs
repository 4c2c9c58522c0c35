//! Core data types for the sensor collector
//!
//! This module contains the fundamental data structures shared by the
//! buffer, the producer side and the exporter.
//!
//! # Main Types
//!
//! - [`Sample`] - A single timestamped three-axis reading
//! - [`Axis`] - Selector for one of the three axes
//! - [`AxisBounds`] - Running vertical-axis extrema used as display hints
//! - [`RecordingState`] - Idle/Recording state of the export log
//! - [`IncrementalStats`] - O(1) running min/max/mean

use serde::{Deserialize, Serialize};

/// Default ring capacity, matching the live chart width of the collector app
pub const DEFAULT_CAPACITY: usize = 400;

/// A single three-axis sensor reading
///
/// `timestamp` is in monotonic clock units (nanoseconds for platform sensor
/// events). Values are stored exactly as delivered, including non-finite ones.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic timestamp in nanoseconds
    pub timestamp: i64,
    /// Acceleration along the X axis
    pub x: f32,
    /// Acceleration along the Y axis
    pub y: f32,
    /// Acceleration along the Z axis
    pub z: f32,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp: i64, x: f32, y: f32, z: f32) -> Self {
        Self { timestamp, x, y, z }
    }

    /// Value along a single axis
    #[inline]
    pub fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Axis values as an `(x, y, z)` tuple
    pub fn values(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }

    /// Smallest of the three axis values
    #[inline]
    pub fn min_value(&self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    /// Largest of the three axis values
    #[inline]
    pub fn max_value(&self) -> f32 {
        self.x.max(self.y).max(self.z)
    }
}

/// One of the three sensor axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in display order
    pub fn all() -> &'static [Axis] {
        &[Axis::X, Axis::Y, Axis::Z]
    }

    /// Column/legend label for this axis
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Running vertical-axis extrema across every value written
///
/// Both bounds start at zero and only ever widen until [`AxisBounds::reset`].
/// A sample with a NaN on any axis leaves the bounds unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisBounds {
    /// Smallest value seen (never above zero)
    pub min: f32,
    /// Largest value seen (never below zero)
    pub max: f32,
}

impl AxisBounds {
    /// Widen the bounds to include every axis of `sample`
    #[inline]
    pub fn include(&mut self, sample: &Sample) {
        if sample.x.is_nan() || sample.y.is_nan() || sample.z.is_nan() {
            return;
        }
        self.min = self.min.min(sample.min_value());
        self.max = self.max.max(sample.max_value());
    }

    /// Width of the range, falling back to 1.0 for a degenerate range so
    /// callers can scale without dividing by zero
    pub fn span(&self) -> f32 {
        let span = self.max - self.min;
        if span > 0.0 {
            span
        } else {
            1.0
        }
    }

    /// Reset both bounds to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Recording state of a buffer's export log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordingState {
    /// Samples go to the window only
    #[default]
    Idle,
    /// Samples are also appended to the export log
    Recording,
}

impl RecordingState {
    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordingState::Idle => "Idle",
            RecordingState::Recording => "Recording",
        }
    }
}

/// Incremental statistics tracker
/// This allows O(1) updates for mean, min, and max without iterating all data
#[derive(Debug, Clone)]
pub struct IncrementalStats {
    /// Current count of values
    pub count: u64,
    /// Running sum for average calculation
    pub sum: f64,
    /// Current minimum value
    pub min: f64,
    /// Current maximum value
    pub max: f64,
}

impl Default for IncrementalStats {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalStats {
    /// Create a new empty stats tracker
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    /// Add a new value to the statistics
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Get the current average
    #[inline]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Get statistics as (min, max, avg) tuple
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        if self.count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (self.min, self.max, self.average())
        }
    }

    /// Reset the statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
