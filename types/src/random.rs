//! Randomness source abstraction.

/// Source of random bytes.
///
/// Components that need randomness take a source instead of calling the OS
/// directly, so tests can substitute a deterministic sequence.
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, buf: &mut [u8]);

    /// A single random bit.
    fn next_bool(&self) -> bool {
        let mut byte = [0u8; 1];
        self.fill_bytes(&mut byte);
        byte[0] & 1 == 1
    }
}

impl<R: RandomSource + ?Sized> RandomSource for std::sync::Arc<R> {
    fn fill_bytes(&self, buf: &mut [u8]) {
        (**self).fill_bytes(buf)
    }
}
