//! Fixed-capacity ring of samples
//!
//! Single-threaded core of the window: slots are overwritten oldest-first once
//! the ring is full. Synchronization lives one level up in
//! [`SampleRingBuffer`](super::SampleRingBuffer).

use crate::error::{CollectorError, Result};
use crate::types::Sample;

/// Circular store of the most recent `capacity` samples
#[derive(Debug, Clone)]
pub struct SampleRing {
    slots: Box<[Sample]>,
    write_index: usize,
    len: usize,
}

impl SampleRing {
    /// Create a ring with `capacity` slots
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CollectorError::InvalidCapacity(capacity));
        }
        Ok(Self {
            slots: vec![Sample::default(); capacity].into_boxed_slice(),
            write_index: 0,
            len: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots written at least once since the last clear
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Slot the next push will write
    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Store a sample, overwriting the oldest one once full
    #[inline]
    pub fn push(&mut self, sample: Sample) {
        self.slots[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
    }

    /// Contents oldest-first
    ///
    /// Before the ring wraps the valid slots are `[0, len)`; afterwards the
    /// oldest slot is the one about to be overwritten.
    pub fn ordered(&self) -> Vec<Sample> {
        if !self.is_full() {
            return self.slots[..self.len].to_vec();
        }
        let (newer, older) = self.slots.split_at(self.write_index);
        let mut out = Vec::with_capacity(self.len);
        out.extend_from_slice(older);
        out.extend_from_slice(newer);
        out
    }

    /// Forget all samples; slot contents are left in place and overwritten later
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.len = 0;
    }
}
