//! # Hex Dump Utilities
//!
//! Converts captured serial logs into raw bytes and formats bytes back into the
//! spaced uppercase form used in decode reports.
//!
//! Captures look like this, one read per line, with an optional `DATA:` marker:
//!
//! ```text
//! 12:00:01 RX DATA: 50 20 FA 01 38 02 08 00 00
//! 12:00:01 RX DATA: 00 12 34 00 26 90 5C 03 FA
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mepsan_rs::util::hex::{parse_dump, format_hex_spaced};
//!
//! let bytes = parse_dump("DATA: 01 38 03 FA").unwrap();
//! assert_eq!(bytes, vec![0x01, 0x38, 0x03, 0xFA]);
//! assert_eq!(format_hex_spaced(&bytes), "01 38 03 FA");
//! ```

use crate::constants::DATA_MARKER;
use crate::error::MepsanError;

/// Format bytes as `"01 38 03 FA"`.
pub fn format_hex_spaced(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a single byte as `"0x38"`.
pub fn format_hex_byte(byte: u8) -> String {
    format!("0x{:02x}", byte)
}

/// Convert a single hex token (one or two digits) to u8.
pub fn hex_byte(token: &str) -> Option<u8> {
    let mut out = [0u8; 1];
    let decoded = match token.len() {
        1 => hex::decode_to_slice(format!("0{token}"), &mut out),
        2 => hex::decode_to_slice(token, &mut out),
        _ => return None,
    };
    decoded.ok().map(|_| out[0])
}

/// Parse a whole capture into a byte stream.
///
/// Every line contributes bytes. When a line contains `DATA:`, only the text
/// after the marker is used.
pub fn parse_dump(raw: &str) -> Result<Vec<u8>, MepsanError> {
    let mut bytes = Vec::new();
    for (idx, line) in raw.trim().lines().enumerate() {
        let payload = match line.split_once(DATA_MARKER) {
            Some((_, rest)) => rest,
            None => line,
        };
        parse_tokens(payload, idx + 1, &mut bytes)?;
    }
    Ok(bytes)
}

/// Parse one capture line for replay.
///
/// Returns `None` for lines without a `DATA:` marker; those carry no traffic.
pub fn parse_data_line(line: &str, line_no: usize) -> Option<Result<Vec<u8>, MepsanError>> {
    let (_, payload) = line.split_once(DATA_MARKER)?;
    let mut bytes = Vec::new();
    Some(parse_tokens(payload, line_no, &mut bytes).map(|_| bytes))
}

fn parse_tokens(payload: &str, line_no: usize, out: &mut Vec<u8>) -> Result<(), MepsanError> {
    for token in payload.split_whitespace() {
        let byte = hex_byte(token).ok_or_else(|| MepsanError::InvalidHexToken {
            line: line_no,
            token: token.to_string(),
        })?;
        out.push(byte);
    }
    Ok(())
}
