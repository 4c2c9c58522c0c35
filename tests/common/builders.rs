//! Test data builders for creating test objects

use sensor_collector::config::{BufferConfig, CollectorConfig};
use sensor_collector::{Result, SampleRingBuffer};
use std::path::Path;

/// Builder for creating test buffers
pub struct BufferBuilder {
    config: BufferConfig,
}

impl BufferBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            config: BufferConfig {
                capacity,
                ..BufferConfig::default()
            },
        }
    }

    pub fn reset_bounds_on_clear(mut self, reset: bool) -> Self {
        self.config.reset_bounds_on_clear = reset;
        self
    }

    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.subscriber_queue_depth = depth;
        self
    }

    pub fn build(self) -> SampleRingBuffer {
        SampleRingBuffer::with_config(&self.config).expect("valid test capacity")
    }
}

/// Config that exports into `dir`
pub fn config_exporting_to(dir: &Path) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.export.directory = Some(dir.to_path_buf());
    config
}

/// Build a buffer straight from a config
pub fn buffer_from(config: &CollectorConfig) -> Result<SampleRingBuffer> {
    SampleRingBuffer::with_config(&config.buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_builder() {
        let buffer = BufferBuilder::new(7).queue_depth(2).build();
        assert_eq!(buffer.capacity(), 7);
        assert!(buffer.is_empty());
    }
}
