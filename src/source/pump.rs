//! Threaded driver that moves samples from a source into a buffer

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::{CadenceStats, SampleSource};
use crate::buffer::SampleRingBuffer;
use crate::error::{CollectorError, Result};

/// Summary of a finished pump run
#[derive(Debug, Clone, Default)]
pub struct PumpReport {
    /// Samples written into the buffer
    pub samples_written: u64,
    /// Event cadence observed from sample timestamps
    pub cadence: CadenceStats,
    /// Error that ended the run, if any
    pub error: Option<String>,
}

/// Polls a [`SampleSource`] and writes each sample into a shared buffer
pub struct SensorPump<S: SampleSource> {
    source: S,
    buffer: Arc<SampleRingBuffer>,
    period: Option<Duration>,
}

impl<S: SampleSource + 'static> SensorPump<S> {
    /// Pump that polls as fast as the source delivers
    pub fn new(source: S, buffer: Arc<SampleRingBuffer>) -> Self {
        Self {
            source,
            buffer,
            period: None,
        }
    }

    /// Sleep `period` after each sample, pacing sources that never block
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    /// Run on the calling thread until the source ends or `running` clears
    pub fn run_blocking(&mut self, running: &AtomicBool) -> PumpReport {
        let mut report = PumpReport::default();
        tracing::debug!("Sensor pump started for source '{}'", self.source.name());

        while running.load(Ordering::Relaxed) {
            match self.source.next_sample() {
                Ok(Some(sample)) => {
                    report.cadence.record(sample.timestamp);
                    self.buffer.write(sample);
                    report.samples_written += 1;
                    if let Some(period) = self.period {
                        std::thread::sleep(period);
                    }
                }
                Ok(None) => {
                    tracing::debug!("Source '{}' exhausted", self.source.name());
                    break;
                }
                Err(e) => {
                    tracing::error!("Source '{}' failed: {}", self.source.name(), e);
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }

        tracing::debug!(
            "Sensor pump stopped after {} samples (rate {:?} Hz)",
            report.samples_written,
            report.cadence.rate_hz()
        );
        report
    }

    /// Move the pump onto its own thread
    pub fn spawn(mut self) -> Result<PumpHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let handle = std::thread::Builder::new()
            .name("sensor-pump".to_string())
            .spawn(move || self.run_blocking(&running_clone))
            .map_err(|e| CollectorError::Thread(format!("Failed to spawn sensor pump: {}", e)))?;
        Ok(PumpHandle {
            running,
            handle: Some(handle),
        })
    }
}

/// Owner-side handle of a spawned pump
///
/// Dropping the handle signals the pump to stop without waiting for it.
#[derive(Debug)]
pub struct PumpHandle {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<PumpReport>>,
}

impl PumpHandle {
    /// Whether the pump thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal the pump to stop and wait for its report
    pub fn stop(mut self) -> Result<PumpReport> {
        self.running.store(false, Ordering::Relaxed);
        self.join_inner()
    }

    /// Wait for the pump to end on its own (finite sources)
    pub fn join(mut self) -> Result<PumpReport> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<PumpReport> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| CollectorError::Thread("Sensor pump already joined".to_string()))?;
        handle
            .join()
            .map_err(|_| CollectorError::Thread("Sensor pump thread panicked".to_string()))
    }
}

impl Drop for PumpHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MockSampleSource, SimulatedSensor};
    use crate::types::Sample;

    #[test]
    fn test_run_blocking_drains_finite_source() {
        let buffer = Arc::new(SampleRingBuffer::new(4).unwrap());
        let sensor = SimulatedSensor::with_rate(100).with_limit(10);
        let running = AtomicBool::new(true);

        let report = SensorPump::new(sensor, buffer.clone()).run_blocking(&running);

        assert_eq!(report.samples_written, 10);
        assert_eq!(report.cadence.interval_count(), 9);
        assert!((report.cadence.rate_hz().unwrap() - 100.0).abs() < 1e-6);
        assert!(report.error.is_none());
        assert_eq!(buffer.size(), 4);
    }

    #[test]
    fn test_cleared_flag_writes_nothing() {
        let buffer = Arc::new(SampleRingBuffer::new(4).unwrap());
        let running = AtomicBool::new(false);
        let report =
            SensorPump::new(SimulatedSensor::with_rate(100), buffer.clone()).run_blocking(&running);
        assert_eq!(report.samples_written, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_source_error_ends_run() {
        let buffer = Arc::new(SampleRingBuffer::new(4).unwrap());
        let mut source = MockSampleSource::new();
        source.expect_name().return_const("mock");
        let mut calls = 0;
        source.expect_next_sample().times(3).returning(move || {
            calls += 1;
            if calls < 3 {
                Ok(Some(Sample::new(calls, 1.0, 2.0, 3.0)))
            } else {
                Err(CollectorError::Sensor("disconnected".to_string()))
            }
        });

        let running = AtomicBool::new(true);
        let report = SensorPump::new(source, buffer.clone()).run_blocking(&running);

        assert_eq!(report.samples_written, 2);
        assert!(report.error.unwrap().contains("disconnected"));
        assert_eq!(buffer.size(), 2);
    }

    #[test]
    fn test_spawned_pump_stops_on_request() {
        let buffer = Arc::new(SampleRingBuffer::new(16).unwrap());
        let handle = SensorPump::new(SimulatedSensor::with_rate(1000), buffer.clone())
            .with_period(Duration::from_millis(1))
            .spawn()
            .unwrap();

        std::thread::sleep(Duration::from_millis(20));
        let report = handle.stop().unwrap();

        assert!(report.samples_written > 0);
        assert_eq!(buffer.size() as u64, report.samples_written.min(16));
    }

    #[test]
    fn test_spawned_pump_join_finite_source() {
        let buffer = Arc::new(SampleRingBuffer::new(8).unwrap());
        buffer.start_recording();
        let handle = SensorPump::new(SimulatedSensor::with_rate(500).with_limit(25), buffer.clone())
            .spawn()
            .unwrap();

        let report = handle.join().unwrap();
        assert_eq!(report.samples_written, 25);
        assert_eq!(buffer.export_len(), 25);
        assert_eq!(buffer.size(), 8);
    }
}
