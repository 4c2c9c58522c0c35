//! # sensor-collector: windowed accelerometer buffer with recording
//!
//! Collects three-axis linear-acceleration samples at the sensor's fastest
//! rate, keeps a fixed-size window of the most recent samples for live
//! charting, and optionally records a whole session for export as CSV.
//!
//! ## Architecture
//!
//! - **Buffer**: [`SampleRingBuffer`] is a fixed-capacity, mutex-guarded ring
//!   with running axis bounds and an independent recording log
//! - **Publishing**: every write publishes an immutable [`Window`] to
//!   subscribers over crossbeam channels, never blocking the producer
//! - **Source**: a [`SampleSource`](source::SampleSource) is pumped into the
//!   buffer on its own thread by a [`SensorPump`](source::SensorPump)
//! - **Export**: [`ExportController`](export::ExportController) writes the
//!   recording to `timestamp_nano,x,y,z` CSV and resets the buffer
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sensor_collector::{
//!     config::CollectorConfig,
//!     export::ExportController,
//!     source::{SensorPump, SimulatedSensor},
//!     SampleRingBuffer,
//! };
//!
//! fn main() -> sensor_collector::Result<()> {
//!     let config = CollectorConfig::default();
//!     let buffer = Arc::new(SampleRingBuffer::with_config(&config.buffer)?);
//!     let live = buffer.subscribe();
//!
//!     let sensor = SimulatedSensor::with_rate(config.sensor.rate_hz);
//!     let pump = SensorPump::new(sensor, buffer.clone())
//!         .with_period(config.sensor.period())
//!         .spawn()?;
//!
//!     buffer.start_recording();
//!     std::thread::sleep(config.sensor.duration());
//!     if let Some(window) = live.latest_window() {
//!         println!("window holds {} samples", window.len());
//!     }
//!
//!     let outcome = ExportController::new(config.export.clone()).finish_recording(&buffer)?;
//!     println!("wrote {} rows to {:?}", outcome.rows, outcome.path);
//!     pump.stop()?;
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod export;
pub mod publish;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use buffer::{BufferStatus, SampleRingBuffer};
pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use publish::{BufferEvent, Subscription, Window};
pub use types::{Axis, AxisBounds, RecordingState, Sample};
