//! # mepsan-rs - A Rust Crate for the Mepsan Fuel-Dispenser Protocol
//!
//! The mepsan-rs crate decodes the serial link between a Mepsan fuel pump and its
//! controller. The protocol has no length or type header: frames are delimited
//! by a `03 FA` terminator, polluted by 3-byte wrapper blocks, and typed by a
//! fixed-priority cascade of byte-pattern checks.
//!
//! ## Features
//!
//! - Frame synchronization with wrapper removal, in one shot or across chunks
//! - Classification of every frame into a typed [`FrameRecord`]
//! - BCD and big-endian field decoding with the device's price/quantity scaling
//! - Bounded streaming ingestion for serial ports and replayed captures
//! - Fueling aggregation (increments and totals) and a live per-pump monitor
//! - JSON decode reports
//!
//! ## Usage
//!
//! ```rust
//! use mepsan_rs::{decode_dump, DecoderConfig, FrameRecord};
//!
//! let capture = "RX DATA: 50 20 FA 01 38 01 01 05 00 00 03 FA";
//! let records = decode_dump(capture, &DecoderConfig::default()).unwrap();
//! assert!(matches!(records[0], FrameRecord::Status(_)));
//! ```

pub mod constants;
pub mod error;
pub mod live;
pub mod logging;
pub mod protocol;
pub mod report;
pub mod session;
pub mod util;

pub use crate::error::MepsanError;
pub use crate::logging::{init_logger, log_error, log_info};

// Core decoding types
pub use protocol::{
    classify_and_decode, classify_with, decode_bytes, extract_frames, DecoderConfig, Frame,
    FrameRecord, FrameSynchronizer, StreamDecoder,
};

// Sessions and reports
pub use report::{decode_dump, DecodeReport};
pub use session::{aggregate_fueling, FuelingReport, IncrementMode, PumpMonitor};
pub use live::run_live;
