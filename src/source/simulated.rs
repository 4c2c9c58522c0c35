//! Simulated accelerometer
//!
//! Generates deterministic signals per axis with evenly spaced nanosecond
//! timestamps, so runs without a physical sensor are reproducible.

use std::f64::consts::TAU;
use std::time::Duration;

use super::SampleSource;
use crate::error::Result;
use crate::types::Sample;

/// Pattern for generating one axis of simulated data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalPattern {
    /// Constant value
    Constant(f32),
    /// Sine wave with frequency and amplitude
    Sine {
        frequency_hz: f64,
        amplitude: f32,
        offset: f32,
    },
    /// Square wave alternating between two values
    Square { frequency_hz: f64, low: f32, high: f32 },
    /// Linear ramp from `min` to `max` that resets every period
    Sawtooth { frequency_hz: f64, min: f32, max: f32 },
}

impl SignalPattern {
    /// Value at `t` seconds from the start of the signal
    pub fn value_at(&self, t: f64) -> f32 {
        match *self {
            SignalPattern::Constant(v) => v,
            SignalPattern::Sine {
                frequency_hz,
                amplitude,
                offset,
            } => offset + amplitude * (TAU * frequency_hz * t).sin() as f32,
            SignalPattern::Square {
                frequency_hz,
                low,
                high,
            } => {
                if (t * frequency_hz).fract() < 0.5 {
                    high
                } else {
                    low
                }
            }
            SignalPattern::Sawtooth {
                frequency_hz,
                min,
                max,
            } => min + (max - min) * (t * frequency_hz).fract() as f32,
        }
    }
}

/// Deterministic three-axis sample generator
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    patterns: [SignalPattern; 3],
    period_ns: i64,
    origin_ns: i64,
    emitted: u64,
    limit: Option<u64>,
}

impl SimulatedSensor {
    /// Sensor emitting one sample per `period`, with a gentle default motion
    pub fn new(period: Duration) -> Self {
        Self {
            patterns: [
                SignalPattern::Sine {
                    frequency_hz: 1.0,
                    amplitude: 2.0,
                    offset: 0.0,
                },
                SignalPattern::Sine {
                    frequency_hz: 0.5,
                    amplitude: 1.0,
                    offset: 0.0,
                },
                SignalPattern::Square {
                    frequency_hz: 0.25,
                    low: -0.5,
                    high: 0.5,
                },
            ],
            period_ns: i64::try_from(period.as_nanos()).unwrap_or(i64::MAX).max(1),
            origin_ns: 0,
            emitted: 0,
            limit: None,
        }
    }

    /// Sensor emitting at `rate_hz`
    pub fn with_rate(rate_hz: u32) -> Self {
        Self::new(Duration::from_nanos(1_000_000_000 / u64::from(rate_hz.max(1))))
    }

    /// Set the per-axis patterns (x, y, z)
    pub fn with_patterns(mut self, x: SignalPattern, y: SignalPattern, z: SignalPattern) -> Self {
        self.patterns = [x, y, z];
        self
    }

    /// Timestamp of the first sample
    pub fn with_origin(mut self, origin_ns: i64) -> Self {
        self.origin_ns = origin_ns;
        self
    }

    /// Stop after `count` samples
    pub fn with_limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    /// Number of samples produced so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn sample_at(&self, index: u64) -> Sample {
        let elapsed_ns = self.period_ns.saturating_mul(index as i64);
        let t = elapsed_ns as f64 / 1e9;
        Sample::new(
            self.origin_ns.saturating_add(elapsed_ns),
            self.patterns[0].value_at(t),
            self.patterns[1].value_at(t),
            self.patterns[2].value_at(t),
        )
    }
}

impl SampleSource for SimulatedSensor {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn next_sample(&mut self) -> Result<Option<Sample>> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return Ok(None);
        }
        let sample = self.sample_at(self.emitted);
        self.emitted += 1;
        Ok(Some(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        assert_eq!(SignalPattern::Constant(1.5).value_at(42.0), 1.5);

        let sine = SignalPattern::Sine {
            frequency_hz: 1.0,
            amplitude: 2.0,
            offset: 1.0,
        };
        assert!((sine.value_at(0.25) - 3.0).abs() < 1e-5);

        let square = SignalPattern::Square {
            frequency_hz: 1.0,
            low: -1.0,
            high: 1.0,
        };
        assert_eq!(square.value_at(0.1), 1.0);
        assert_eq!(square.value_at(0.6), -1.0);

        let saw = SignalPattern::Sawtooth {
            frequency_hz: 1.0,
            min: 0.0,
            max: 10.0,
        };
        assert!((saw.value_at(0.5) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_timestamps_evenly_spaced() {
        let mut sensor = SimulatedSensor::new(Duration::from_millis(5)).with_origin(1_000);
        let a = sensor.next_sample().unwrap().unwrap();
        let b = sensor.next_sample().unwrap().unwrap();
        assert_eq!(a.timestamp, 1_000);
        assert_eq!(b.timestamp, 5_001_000);
    }

    #[test]
    fn test_limit_exhausts() {
        let mut sensor = SimulatedSensor::with_rate(100).with_limit(2);
        assert!(sensor.next_sample().unwrap().is_some());
        assert!(sensor.next_sample().unwrap().is_some());
        assert!(sensor.next_sample().unwrap().is_none());
        assert_eq!(sensor.emitted(), 2);
    }

    #[test]
    fn test_deterministic() {
        let mut a = SimulatedSensor::with_rate(200);
        let mut b = SimulatedSensor::with_rate(200);
        for _ in 0..10 {
            assert_eq!(a.next_sample().unwrap(), b.next_sample().unwrap());
        }
    }
}
