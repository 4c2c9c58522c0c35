//! Sensor Collector - Main Entry Point
//!
//! Runs a simulated accelerometer into a sample buffer, records one session
//! and exports it. Usage: `sensor-collector [config.toml]`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use sensor_collector::{
    config::{default_config_path, CollectorConfig},
    export::ExportController,
    source::{SensorPump, SimulatedSensor},
    Axis, BufferEvent, SampleRingBuffer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How often the live window is summarized in the log
const STATUS_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sensor_collector=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting sensor collector");

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => CollectorConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => default_config_path()
            .map(|path| CollectorConfig::load_or_default(path))
            .unwrap_or_default(),
    };
    tracing::debug!("Configuration: {:?}", config);

    let buffer = Arc::new(SampleRingBuffer::with_config(&config.buffer)?);
    let live = buffer.subscribe();

    let sensor = SimulatedSensor::with_rate(config.sensor.rate_hz);
    let pump = SensorPump::new(sensor, buffer.clone())
        .with_period(config.sensor.period())
        .spawn()?;

    buffer.start_recording();
    let deadline = Instant::now() + config.sensor.duration();
    while Instant::now() < deadline && !pump.is_finished() {
        let Some(event) = live.recv_timeout(STATUS_INTERVAL) else {
            continue;
        };
        match event {
            BufferEvent::Recording(active) => tracing::info!("Recording: {}", active),
            BufferEvent::Window(first) => {
                // Drain the backlog and only report the newest window
                let window = live
                    .latest_window()
                    .filter(|w| w.generation() > first.generation())
                    .unwrap_or(first);
                if let Some(active) = live.latest_recording() {
                    tracing::info!("Recording: {}", active);
                }
                let latest = window.latest().map_or_else(String::new, |s| {
                    Axis::all()
                        .iter()
                        .map(|&axis| format!("{}={:.3}", axis, s.axis(axis)))
                        .collect::<Vec<_>>()
                        .join(" ")
                });
                let bounds = buffer.axis_bounds();
                tracing::info!(
                    "[{}] Window: {} samples, latest {}, bounds [{:.3}, {:.3}]",
                    buffer.recording_state().display_name(),
                    window.len(),
                    latest,
                    bounds.min,
                    bounds.max
                );
                std::thread::sleep(STATUS_INTERVAL);
            }
        }
    }

    let outcome = ExportController::new(config.export.clone())
        .finish_recording(&buffer)
        .context("Failed to export recording")?;
    tracing::info!("Wrote {} samples to {:?}", outcome.rows, outcome.path);

    let report = pump.stop()?;
    tracing::info!(
        "Pump wrote {} samples at {:.1} Hz effective",
        report.samples_written,
        report.cadence.rate_hz().unwrap_or(0.0)
    );

    Ok(())
}
