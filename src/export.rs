//! Export of recorded samples to CSV or JSON-lines files
//!
//! The buffer hands out an owned copy of its export log, so nothing here can
//! corrupt buffer state: a failed write leaves the recording in place for a
//! retry, and [`ExportController`] clears the buffer only after the file has
//! been flushed.
//!
//! CSV output has a fixed header and one row per sample:
//!
//! ```text
//! timestamp_nano,x,y,z
//! 1000,0.1,-0.25,9.81
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::buffer::SampleRingBuffer;
use crate::config::{ensure_app_data_dir, ExportConfig};
use crate::error::{Result, ResultExt};
use crate::types::Sample;

/// Header row of CSV exports
pub const CSV_HEADER: &str = "timestamp_nano,x,y,z";

/// Export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values with [`CSV_HEADER`]
    #[default]
    Csv,
    /// One JSON object per line
    JsonLines,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::JsonLines => "jsonl",
        }
    }
}

/// Write samples to `writer`, returning the number of data rows written
pub fn write_samples<W: Write>(
    writer: &mut W,
    samples: &[Sample],
    format: ExportFormat,
) -> Result<u64> {
    match format {
        ExportFormat::Csv => {
            writeln!(writer, "{}", CSV_HEADER)?;
            for s in samples {
                writeln!(writer, "{},{},{},{}", s.timestamp, s.x, s.y, s.z)?;
            }
        }
        ExportFormat::JsonLines => {
            for s in samples {
                serde_json::to_writer(&mut *writer, s)?;
                writeln!(writer)?;
            }
        }
    }
    Ok(samples.len() as u64)
}

/// Create (or truncate) `path` and write the samples to it
pub fn export_to_file(
    path: impl AsRef<Path>,
    samples: &[Sample],
    format: ExportFormat,
) -> Result<u64> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let rows = write_samples(&mut writer, samples, format)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    tracing::info!("Exported {} samples to {:?}", rows, path);
    Ok(rows)
}

/// `<prefix>_<YYYYmmdd_HHMMSS_mmm>.<ext>`
pub fn default_file_name<Tz: TimeZone>(
    prefix: &str,
    format: ExportFormat,
    at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}.{}",
        prefix,
        at.format("%Y%m%d_%H%M%S_%3f"),
        format.extension()
    )
}

/// Result of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub rows: u64,
}

/// Ends recording sessions by writing them out and resetting the buffer
#[derive(Debug, Clone, Default)]
pub struct ExportController {
    config: ExportConfig,
}

impl ExportController {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Directory new exports go to, created if missing
    pub fn directory(&self) -> Result<PathBuf> {
        match &self.config.directory {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                Ok(dir.clone())
            }
            None => ensure_app_data_dir(),
        }
    }

    /// Stop recording, export the log to a new time-stamped file and clear
    /// the buffer
    ///
    /// On error the buffer keeps its export log so the caller can retry.
    ///
    /// Callers must not start a new session until this returns. If one was
    /// started anyway while the file was being written, the buffer is left
    /// alone instead of wiping the new session's log.
    pub fn finish_recording(&self, buffer: &SampleRingBuffer) -> Result<ExportOutcome> {
        buffer.stop_recording();
        let samples = buffer.export_snapshot();
        let name = default_file_name(&self.config.file_prefix, self.config.format, &Local::now());
        let path = self.directory()?.join(name);

        let rows = export_to_file(&path, &samples, self.config.format)
            .context("Export failed, recording kept")?;
        if !buffer.clear_unless_recording() {
            tracing::warn!("Recording restarted during export, buffer not cleared");
        }
        Ok(ExportOutcome { path, rows })
    }
}
