//! # Frame Synchronization
//!
//! The pump link has no length or type header, so frame boundaries are found by
//! scanning for the `03 FA` terminator. The line is also polluted with 3-byte
//! transport wrapper blocks (`50 XX FA` / `51 XX FA`) which are removed before
//! framing and never appear inside a frame.
//!
//! ## Usage
//!
//! One-shot extraction over a complete capture (a trailing partial frame is
//! returned as the remainder and normally dropped):
//!
//! ```rust
//! use mepsan_rs::protocol::frame::extract_frames;
//!
//! let stream = [0x50, 0x20, 0xFA, 0x01, 0x38, 0x03, 0xFA, 0x01];
//! let (frames, rest) = extract_frames(&stream);
//! assert_eq!(frames[0].as_bytes(), &[0x01, 0x38, 0x03, 0xFA]);
//! assert_eq!(rest, &[0x01]);
//! ```
//!
//! Incremental extraction keeps the unconsumed bytes between calls:
//!
//! ```rust
//! use mepsan_rs::protocol::frame::FrameSynchronizer;
//!
//! let mut sync = FrameSynchronizer::new();
//! assert!(sync.push(&[0x01, 0x38, 0x03]).is_empty());
//! assert_eq!(sync.push(&[0xFA]).len(), 1);
//! ```

use crate::constants::{FRAME_TERMINATOR, WRAPPER_LEN, WRAPPER_MARKERS, WRAPPER_TAIL};
use crate::error::MepsanError;
use crate::util::hex::format_hex_spaced;

/// One complete protocol message, always ending in `03 FA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame(Vec<u8>);

impl Frame {
    /// Build a frame from bytes that already carry the terminator.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, MepsanError> {
        let bytes = bytes.into();
        if !bytes.ends_with(&FRAME_TERMINATOR) {
            return Err(MepsanError::InvalidFrame(format!(
                "missing 03 FA terminator: {}",
                format_hex_spaced(&bytes)
            )));
        }
        Ok(Frame(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a frame holds at least its terminator.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Spaced uppercase hex of the whole frame.
    pub fn hex(&self) -> String {
        format_hex_spaced(&self.0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// True when a full `50|51 XX FA` wrapper block starts at `pos`.
///
/// Fewer than three remaining bytes never form a wrapper.
pub fn is_wrapper_at(bytes: &[u8], pos: usize) -> bool {
    match bytes.get(pos..pos + WRAPPER_LEN) {
        Some(block) => WRAPPER_MARKERS.contains(&block[0]) && block[2] == WRAPPER_TAIL,
        None => false,
    }
}

/// Split a byte stream into complete frames.
///
/// Returns the frames in stream order and the unconsumed tail: everything after
/// the last emitted frame (or after wrapper blocks skipped while no frame was in
/// progress). Feeding the tail back in front of the next chunk yields the same
/// frames as scanning the concatenated stream once.
pub fn extract_frames(bytes: &[u8]) -> (Vec<Frame>, &[u8]) {
    let mut frames = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut consumed = 0;
    let mut i = 0;

    while i < bytes.len() {
        // Wrapper removal wins over accumulation at any position.
        if is_wrapper_at(bytes, i) {
            i += WRAPPER_LEN;
            if current.is_empty() {
                consumed = i;
            }
            continue;
        }

        current.push(bytes[i]);
        i += 1;

        if current.ends_with(&FRAME_TERMINATOR) {
            frames.push(Frame(std::mem::take(&mut current)));
            consumed = i;
        }
    }

    (frames, &bytes[consumed..])
}

/// Stateful synchronizer carrying partial frames across calls.
#[derive(Debug, Default, Clone)]
pub struct FrameSynchronizer {
    carry: Vec<u8>,
}

impl FrameSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.carry.extend_from_slice(chunk);
        let (frames, rest) = extract_frames(&self.carry);
        let consumed = self.carry.len() - rest.len();
        self.carry.drain(..consumed);
        frames
    }

    /// Bytes waiting for the rest of their frame.
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }

    /// Drop the pending partial frame, returning it.
    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.carry)
    }
}
