//! # Utility Modules
//!
//! Common helpers used throughout the mepsan-rs crate: hex dump parsing and
//! formatting, the streaming carry buffer, and logging patterns.

pub mod hex;
pub mod iobuffer;
pub mod logging;

// Re-export commonly used types and functions
pub use hex::{format_hex_byte, format_hex_spaced, parse_data_line, parse_dump};
pub use iobuffer::{IoBuffer, IoBufferStats};
pub use logging::{log_frame_hex, LogThrottle};
