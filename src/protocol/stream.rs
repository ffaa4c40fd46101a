//! # Streaming Ingestion
//!
//! `StreamDecoder` turns arbitrarily chunked input (serial reads or replayed log
//! lines) into decoded records. Unconsumed bytes are kept between calls in a
//! bounded buffer: after each call only the bytes after the last frame the
//! synchronizer emitted survive (wrapper blocks included, so a `51 03 FA`
//! wrapper never counts as a terminator), and a partial frame that grows past
//! the cap is cut down to its tail.
//!
//! ```rust
//! use mepsan_rs::protocol::StreamDecoder;
//!
//! let mut decoder = StreamDecoder::new();
//! assert!(decoder.ingest(&[0x01, 0x38, 0x01, 0x01]).is_empty());
//! let records = decoder.ingest(&[0x03, 0x00, 0x00, 0x03, 0xFA]);
//! assert_eq!(records[0].kind(), "status");
//! ```

use crate::constants::{STREAM_KEEP_TAIL, STREAM_MAX_UNTERMINATED};
use crate::protocol::classify::{classify_with, DecoderConfig};
use crate::protocol::frame::extract_frames;
use crate::protocol::record::FrameRecord;
use crate::util::iobuffer::IoBuffer;
use crate::util::logging::{log_frame_hex, LogThrottle};
use log::{debug, warn};

/// Counters kept by a [`StreamDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks: u64,
    pub bytes_in: u64,
    pub frames: u64,
    pub heartbeats: u64,
    pub records: u64,
    pub truncations: u64,
    pub bytes_dropped: u64,
}

/// Stateful decoder for a single byte stream.
#[derive(Debug)]
pub struct StreamDecoder {
    buffer: IoBuffer,
    config: DecoderConfig,
    max_unterminated: usize,
    keep_tail: usize,
    stats: StreamStats,
    truncation_log: LogThrottle,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    /// Decoder with the default configuration and buffer limits.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self::with_limits(config, STREAM_MAX_UNTERMINATED, STREAM_KEEP_TAIL)
    }

    /// Decoder that truncates to `keep_tail` bytes once more than
    /// `max_unterminated` bytes are buffered without a terminator.
    pub fn with_limits(config: DecoderConfig, max_unterminated: usize, keep_tail: usize) -> Self {
        StreamDecoder {
            buffer: IoBuffer::with_capacity(max_unterminated),
            config,
            max_unterminated,
            keep_tail,
            stats: StreamStats::default(),
            truncation_log: LogThrottle::new(1000, 5),
        }
    }

    /// Append a chunk and return the records of every frame it completes,
    /// heartbeats excluded, in stream order.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<FrameRecord> {
        self.stats.chunks += 1;
        self.stats.bytes_in += chunk.len() as u64;
        self.buffer.write(chunk);

        let (frames, rest) = extract_frames(self.buffer.as_slice());
        let consumed = self.buffer.len() - rest.len();
        let mut records = Vec::with_capacity(frames.len());
        for frame in &frames {
            self.stats.frames += 1;
            log_frame_hex("frame", frame.as_bytes());
            let record = classify_with(frame, &self.config);
            if record.is_heartbeat() {
                self.stats.heartbeats += 1;
                continue;
            }
            self.stats.records += 1;
            records.push(record);
        }

        self.buffer.discard_front(consumed);
        self.bound_buffer();
        records
    }

    /// Cut a partial frame longer than the cap down to its tail.
    fn bound_buffer(&mut self) {
        if self.buffer.len() > self.max_unterminated {
            let dropped = self.buffer.keep_tail(self.keep_tail);
            self.stats.truncations += 1;
            self.stats.bytes_dropped += dropped as u64;
            if self.truncation_log.allow() {
                warn!(
                    "no frame terminator in {} buffered bytes, dropped {} oldest",
                    dropped + self.keep_tail,
                    dropped
                );
            }
        }
        debug!("{} bytes carried to next chunk", self.buffer.len());
    }

    /// Bytes waiting for more input.
    pub fn pending(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Forget any buffered partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
