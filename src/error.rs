//! Error handling for the sensor collector
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the library. Buffer operations themselves are total; errors
//! come from construction, configuration, the producer side and export I/O.

use thiserror::Error;

/// Main error type for sensor collector operations
#[derive(Error, Debug)]
pub enum CollectorError {
    /// A ring buffer was requested with zero slots
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by a sample source
    #[error("Sensor error: {0}")]
    Sensor(String),

    /// Errors spawning or joining worker threads
    #[error("Thread error: {0}")]
    Thread(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CollectorError>,
    },
}

impl CollectorError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CollectorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::Serialization(err.to_string())
    }
}

/// Result type alias for sensor collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CollectorError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| CollectorError::from(e).with_context(f()))
    }
}
