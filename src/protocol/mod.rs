//! The protocol module contains the Mepsan pump-link decoding engine: frame
//! synchronization, field decoding, the classification cascade and streaming
//! ingestion, plus the byte sources that feed it.

pub mod classify;
pub mod fields;
pub mod frame;
pub mod record;
pub mod source;
pub mod stream;

pub use classify::{classify_and_decode, classify_with, decode_bytes, DecoderConfig, CASCADE};
pub use fields::{decode_bcd3, decode_be16, try_decode_bcd3};
pub use frame::{extract_frames, Frame, FrameSynchronizer};
pub use record::FrameRecord;
pub use source::{ByteSource, ReaderSource, ReplaySource, SerialConfig, SerialSource};
pub use stream::{StreamDecoder, StreamStats};
