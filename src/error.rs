//! # Mepsan Error Handling
//!
//! This module defines the MepsanError enum, which represents the different error
//! types that can occur in the mepsan-rs crate.
//!
//! Frame decoding itself never fails: odd or unrecognised frames become
//! `FrameRecord::Unknown`. Errors only come from the edges (hex dump parsing,
//! serial and file I/O, report serialization) and from the checked BCD decoder.

use thiserror::Error;

/// Represents the different error types that can occur in the Mepsan crate.
#[derive(Debug, Error)]
pub enum MepsanError {
    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// A token in a hex dump could not be parsed as a byte.
    #[error("Invalid hex token '{token}' on line {line}")]
    InvalidHexToken { line: usize, token: String },

    /// A byte sequence does not form a complete frame.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// A nibble above 9 was found while decoding BCD.
    #[error("Invalid BCD digits: {0:02X?}")]
    InvalidBcd([u8; 3]),

    /// Underlying I/O failure (file or port).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MepsanError {
    fn from(e: serde_json::Error) -> Self {
        MepsanError::Serialization(e.to_string())
    }
}

impl From<tokio_serial::Error> for MepsanError {
    fn from(e: tokio_serial::Error) -> Self {
        MepsanError::SerialPortError(e.to_string())
    }
}
