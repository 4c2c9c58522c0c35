//! Producer side: sample sources and the pump that feeds a buffer
//!
//! The buffer never talks to a platform sensor service. Instead a
//! [`SampleSource`] is injected into a [`SensorPump`], which polls it on a
//! dedicated thread and writes every sample into a shared
//! [`SampleRingBuffer`](crate::buffer::SampleRingBuffer).
//!
//! - [`SimulatedSensor`] - deterministic three-axis signal generator
//! - [`CadenceStats`] - inter-event interval tracking (effective sample rate)
//! - [`SensorPump`] / [`PumpHandle`] - threaded driver with a stop flag

pub mod pump;
pub mod simulated;

pub use pump::{PumpHandle, PumpReport, SensorPump};
pub use simulated::{SignalPattern, SimulatedSensor};

use crate::error::Result;
use crate::types::{IncrementalStats, Sample};

/// A producer of timestamped three-axis samples
#[cfg_attr(test, mockall::automock)]
pub trait SampleSource: Send {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Produce the next sample
    ///
    /// `Ok(None)` means the source is exhausted and the pump should stop.
    fn next_sample(&mut self) -> Result<Option<Sample>>;
}

/// Tracks the interval between consecutive sensor event timestamps
#[derive(Debug, Clone, Default)]
pub struct CadenceStats {
    last_timestamp: Option<i64>,
    intervals: IncrementalStats,
    non_monotonic: u64,
}

impl CadenceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for an event at `timestamp`
    ///
    /// Timestamps that do not advance are counted and otherwise ignored.
    pub fn record(&mut self, timestamp: i64) {
        match self.last_timestamp {
            Some(prev) if timestamp <= prev => {
                self.non_monotonic += 1;
                tracing::trace!("Non-monotonic timestamp {} after {}", timestamp, prev);
            }
            Some(prev) => {
                let delta = timestamp - prev;
                tracing::trace!("Diff in nanoseconds: {}", delta);
                self.intervals.push(delta as f64);
                self.last_timestamp = Some(timestamp);
            }
            None => self.last_timestamp = Some(timestamp),
        }
    }

    /// Number of measured intervals
    pub fn interval_count(&self) -> u64 {
        self.intervals.count
    }

    /// Events whose timestamp did not advance
    pub fn non_monotonic(&self) -> u64 {
        self.non_monotonic
    }

    pub fn min_interval_ns(&self) -> Option<f64> {
        (self.intervals.count > 0).then_some(self.intervals.min)
    }

    pub fn max_interval_ns(&self) -> Option<f64> {
        (self.intervals.count > 0).then_some(self.intervals.max)
    }

    pub fn mean_interval_ns(&self) -> Option<f64> {
        (self.intervals.count > 0).then(|| self.intervals.average())
    }

    /// Effective event rate derived from the mean interval
    pub fn rate_hz(&self) -> Option<f64> {
        self.mean_interval_ns()
            .filter(|mean| *mean > 0.0)
            .map(|mean| 1e9 / mean)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
