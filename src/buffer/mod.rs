//! Thread-safe windowed sample buffer with a recording log
//!
//! [`SampleRingBuffer`] is written by a high-rate producer and read by any
//! number of consumers. It keeps:
//!
//! - a fixed-capacity ring of the most recent samples, exposed as an ordered
//!   [`Window`] that is rebuilt and published after every write;
//! - running [`AxisBounds`] used by charts to scale the vertical axis;
//! - an independent recording sub-state that appends every written sample to
//!   an unbounded export log while active.
//!
//! Every read or mutation of that state happens under one mutex. Writes never
//! wait on consumers: the window is built inside the critical section and
//! broadcast after the lock is released, as an immutable `Arc<[Sample]>`.
//!
//! # Recording
//!
//! ```text
//! Idle --start_recording()--> Recording   (stale export log discarded)
//! Recording --stop_recording()--> Idle    (export log retained)
//! ```
//!
//! Calling [`SampleRingBuffer::start_recording`] while already recording
//! restarts the session and discards the in-progress log.
//!
//! # Example
//!
//! ```
//! use sensor_collector::buffer::SampleRingBuffer;
//!
//! let buffer = SampleRingBuffer::new(3).unwrap();
//! for i in 1..=4 {
//!     buffer.add(i, i as f32, i as f32, i as f32);
//! }
//! let window = buffer.snapshot();
//! assert_eq!(window.len(), 3);
//! assert_eq!(window.as_slice()[0].x, 2.0);
//! ```

pub mod ring;

pub use ring::SampleRing;

use std::sync::{Mutex, MutexGuard};

use crate::config::BufferConfig;
use crate::error::Result;
use crate::publish::{Subscription, Window, WindowPublisher};
use crate::types::{AxisBounds, RecordingState, Sample};

/// Point-in-time summary of a buffer, for status displays and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferStatus {
    pub size: usize,
    pub capacity: usize,
    pub recording: RecordingState,
    pub export_len: usize,
    pub bounds: AxisBounds,
}

#[derive(Debug)]
struct BufferInner {
    ring: SampleRing,
    bounds: AxisBounds,
    state: RecordingState,
    export_log: Vec<Sample>,
    published: Window,
    generation: u64,
}

impl BufferInner {
    fn publish_next(&mut self) -> Window {
        self.generation += 1;
        let window = Window::new(self.generation, self.ring.ordered());
        self.published = window.clone();
        window
    }
}

/// Fixed-capacity, thread-safe ring buffer of three-axis samples
#[derive(Debug)]
pub struct SampleRingBuffer {
    inner: Mutex<BufferInner>,
    publisher: WindowPublisher,
    reset_bounds_on_clear: bool,
}

impl SampleRingBuffer {
    /// Create a buffer with default settings and the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(&BufferConfig {
            capacity,
            ..BufferConfig::default()
        })
    }

    /// Create a buffer from configuration
    pub fn with_config(config: &BufferConfig) -> Result<Self> {
        let ring = SampleRing::new(config.capacity)?;
        tracing::debug!(
            "Created sample buffer (capacity {}, reset_bounds_on_clear {})",
            config.capacity,
            config.reset_bounds_on_clear
        );
        Ok(Self {
            inner: Mutex::new(BufferInner {
                ring,
                bounds: AxisBounds::default(),
                state: RecordingState::Idle,
                export_log: Vec::new(),
                published: Window::empty(0),
                generation: 0,
            }),
            publisher: WindowPublisher::new(config.subscriber_queue_depth),
            reset_bounds_on_clear: config.reset_bounds_on_clear,
        })
    }

    /// Record one sensor event
    pub fn add(&self, timestamp: i64, x: f32, y: f32, z: f32) {
        self.write(Sample::new(timestamp, x, y, z));
    }

    /// Store a sample, update bounds and the export log, and publish the new window
    pub fn write(&self, sample: Sample) {
        let window = {
            let mut inner = self.lock();
            inner.ring.push(sample);
            if inner.state.is_recording() {
                inner.export_log.push(sample);
            }
            inner.bounds.include(&sample);
            inner.publish_next()
        };
        self.publisher.publish_window(window);
    }

    /// Current window, oldest sample first
    pub fn snapshot(&self) -> Window {
        self.lock().published.clone()
    }

    /// Number of valid samples in the window
    pub fn size(&self) -> usize {
        self.lock().ring.len()
    }

    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Running vertical-axis extrema
    pub fn axis_bounds(&self) -> AxisBounds {
        self.lock().bounds
    }

    /// Reset the running extrema to zero
    pub fn reset_axis_bounds(&self) {
        self.lock().bounds.reset();
    }

    pub fn recording_state(&self) -> RecordingState {
        self.lock().state
    }

    pub fn is_recording(&self) -> bool {
        self.recording_state().is_recording()
    }

    /// Begin a recording session, discarding any previous export log
    ///
    /// If a session is already active it restarts: the in-progress log is
    /// discarded as well.
    pub fn start_recording(&self) {
        let mut inner = self.lock();
        if inner.state.is_recording() {
            tracing::warn!(
                "Recording restarted while active, discarding {} samples",
                inner.export_log.len()
            );
        }
        if !inner.export_log.is_empty() {
            inner.export_log.clear();
        }
        inner.state = RecordingState::Recording;
        // Flag changes go out under the lock so subscribers see them in order
        self.publisher.publish_recording(true);
        tracing::debug!("Recording started");
    }

    /// End the recording session; the export log stays available
    pub fn stop_recording(&self) {
        let mut inner = self.lock();
        inner.state = RecordingState::Idle;
        self.publisher.publish_recording(false);
        tracing::debug!("Recording stopped with {} samples", inner.export_log.len());
    }

    /// Copy of the export log in write order
    ///
    /// Intended to be called after [`stop_recording`](Self::stop_recording);
    /// the returned vector is independent of the buffer.
    pub fn export_snapshot(&self) -> Vec<Sample> {
        self.lock().export_log.clone()
    }

    /// Number of samples in the export log
    pub fn export_len(&self) -> usize {
        self.lock().export_log.len()
    }

    /// Empty the window and the export log
    ///
    /// Axis bounds persist unless the buffer was configured with
    /// `reset_bounds_on_clear`. The recording state is unchanged.
    pub fn clear(&self) {
        let window = self.clear_locked(&mut self.lock());
        tracing::debug!("Buffer cleared");
        self.publisher.publish_window(window);
    }

    /// [`clear`](Self::clear) unless a recording session is active
    ///
    /// The check and the clear happen atomically. Returns whether the buffer
    /// was cleared.
    pub fn clear_unless_recording(&self) -> bool {
        let window = {
            let mut inner = self.lock();
            if inner.state.is_recording() {
                return false;
            }
            self.clear_locked(&mut inner)
        };
        tracing::debug!("Buffer cleared");
        self.publisher.publish_window(window);
        true
    }

    fn clear_locked(&self, inner: &mut BufferInner) -> Window {
        inner.ring.clear();
        inner.export_log.clear();
        if self.reset_bounds_on_clear {
            inner.bounds.reset();
        }
        inner.publish_next()
    }

    /// Register an observer for window and recording updates
    pub fn subscribe(&self) -> Subscription {
        self.publisher.subscribe()
    }

    /// Consistent summary of the buffer state
    pub fn status(&self) -> BufferStatus {
        let inner = self.lock();
        BufferStatus {
            size: inner.ring.len(),
            capacity: inner.ring.capacity(),
            recording: inner.state,
            export_len: inner.export_log.len(),
            bounds: inner.bounds,
        }
    }

    // Every critical section leaves the state consistent, so a panic in
    // another thread does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, BufferInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
