//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use sensor_collector::Sample;

/// Sample whose axes all carry `i`, so a torn write is detectable
pub fn uniform_sample(i: i64) -> Sample {
    Sample::new(i, i as f32, i as f32, i as f32)
}

/// `n` uniform samples with timestamps starting at `start`
pub fn uniform_samples(start: i64, n: usize) -> Vec<Sample> {
    (start..start + n as i64).map(uniform_sample).collect()
}

/// Timestamps of a sample sequence
pub fn timestamps<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Vec<i64> {
    samples.into_iter().map(|s| s.timestamp).collect()
}
