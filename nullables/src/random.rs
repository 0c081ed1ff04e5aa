//! Nullable random: deterministic bytes.

use pass_types::RandomSource;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A deterministic randomness source for testing.
///
/// Returns pre-configured bytes in order, wrapping around at the end.
pub struct NullRandom {
    bytes: Vec<u8>,
    index: AtomicUsize,
}

impl NullRandom {
    /// Create with a sequence of deterministic bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        let bytes = if bytes.is_empty() { vec![0] } else { bytes };
        Self {
            bytes,
            index: AtomicUsize::new(0),
        }
    }

    /// Create with a single byte returned for every position.
    pub fn constant(value: u8) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for NullRandom {
    fn fill_bytes(&self, buf: &mut [u8]) {
        for slot in buf.iter_mut() {
            let i = self.index.fetch_add(1, Ordering::Relaxed);
            *slot = self.bytes[i % self.bytes.len()];
        }
    }
}
