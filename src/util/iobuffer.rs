//! # IoBuffer - Bounded Streaming Buffer
//!
//! Appendable byte buffer holding serial data that has not yet been turned into
//! frames. Backed by `BytesMut` so the stream decoder can scan it as one
//! contiguous slice and drop consumed bytes from the front without copying.
//!
//! ## Usage
//!
//! ```rust
//! use mepsan_rs::util::IoBuffer;
//!
//! let mut buffer = IoBuffer::new();
//! buffer.write(&[0x01, 0x02, 0x03]);
//! buffer.discard_front(2);
//! assert_eq!(buffer.as_slice(), &[0x03]);
//! ```

use bytes::{Buf, BytesMut};

/// Streaming buffer for serial reads.
#[derive(Debug, Clone, Default)]
pub struct IoBuffer {
    data: BytesMut,
    bytes_written: u64,
    bytes_consumed: u64,
    bytes_dropped: u64,
}

impl IoBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append data to the end of the buffer.
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.data.extend_from_slice(data);
        self.bytes_written += data.len() as u64;
        data.len()
    }

    /// Contiguous view of everything buffered.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Remove up to `count` bytes from the front as consumed.
    pub fn discard_front(&mut self, count: usize) {
        let count = count.min(self.data.len());
        self.data.advance(count);
        self.bytes_consumed += count as u64;
    }

    /// Keep only the last `keep` bytes, counting the rest as dropped.
    ///
    /// Returns the number of bytes dropped.
    pub fn keep_tail(&mut self, keep: usize) -> usize {
        let dropped = self.data.len().saturating_sub(keep);
        self.data.advance(dropped);
        self.bytes_dropped += dropped as u64;
        dropped
    }

    /// Number of bytes currently buffered.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear all buffered data.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get buffer statistics.
    pub fn stats(&self) -> IoBufferStats {
        IoBufferStats {
            current_len: self.data.len(),
            capacity: self.data.capacity(),
            bytes_written: self.bytes_written,
            bytes_consumed: self.bytes_consumed,
            bytes_dropped: self.bytes_dropped,
        }
    }
}

/// Counters describing buffer usage over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoBufferStats {
    pub current_len: usize,
    pub capacity: usize,
    pub bytes_written: u64,
    pub bytes_consumed: u64,
    pub bytes_dropped: u64,
}
