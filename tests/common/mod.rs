//! Shared builders for integration tests.

#![allow(dead_code)]

/// Bytes from a hex string such as `"01 38 03 FA"`.
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(cleaned).unwrap()
}

/// A 16-byte fueling frame for `pump` with the given BCD liters and money.
pub fn fueling_frame(pump: u8, liters: [u8; 3], money: [u8; 3]) -> Vec<u8> {
    let mut frame = vec![pump, 0x38, 0x02, 0x08, 0x00, 0x00];
    frame.extend_from_slice(&liters);
    frame.extend_from_slice(&money);
    frame.extend_from_slice(&[0xAA, 0x5C, 0x03, 0xFA]);
    frame
}

/// A capture as written by the serial logger: status, two fueling readings on
/// pump 1 split across reads, a single price and idle traffic.
pub const CAPTURE: &str = "\
12:00:00 RX DATA: 50 20 FA 01 38 01 01 05 00 00 03 FA
12:00:00 TX DATA: 51 70 FA
12:00:01 RX DATA: 50 20 FA 01 38 02 08 00 00 00 01 23
12:00:01 RX DATA: 00 04 56 AA 5C 03 FA
12:00:02 RX DATA: 50 20 FA 01 38 02 08 00 00 00 60 00
12:00:02 RX DATA: 00 13 08 AA 5C 03 FA
12:00:03 RX DATA: 01 38 01 01 01 03 04 00 21 80 55 28 4E 03 FA
12:00:03 RX DATA: 20 70 03 FA
";

/// Bytes of the `DATA:` payloads of [`CAPTURE`], one entry per line.
pub fn capture_lines() -> Vec<Vec<u8>> {
    CAPTURE
        .lines()
        .filter_map(|line| line.split_once("DATA:"))
        .map(|(_, payload)| {
            payload
                .split_whitespace()
                .map(|t| u8::from_str_radix(t, 16).unwrap())
                .collect()
        })
        .collect()
}
