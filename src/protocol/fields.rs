//! # Field Decoding
//!
//! Numeric field decoders for Mepsan frames: 3-byte packed BCD for fueling
//! totals and big-endian u16 for prices, plus the fixed scaling divisors.
//!
//! BCD decoding is tolerant by default: a nibble above 9 yields `0` instead of an
//! error, because corrupted frames are routine on the line. Callers that need to
//! tell a real zero from a defaulted one use [`try_decode_bcd3`].

use crate::constants::PRICE_DIVISOR;
use crate::error::MepsanError;
use nom::{
    bytes::complete::take,
    combinator::verify,
    multi::many0,
    number::complete::be_u16,
    IResult,
};

/// Parses three packed BCD bytes (six digits, high nibble first).
pub fn bcd3(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, bytes) = verify(take(3usize), |b: &[u8]| b.iter().all(|&x| is_bcd_byte(x)))(input)?;

    let value = bytes.iter().fold(0u32, |acc, &byte| {
        acc * 100 + u32::from(byte >> 4) * 10 + u32::from(byte & 0x0F)
    });

    Ok((input, value))
}

fn is_bcd_byte(byte: u8) -> bool {
    (byte >> 4) <= 9 && (byte & 0x0F) <= 9
}

/// Decodes three BCD bytes, or reports which bytes were not valid BCD.
pub fn try_decode_bcd3(b1: u8, b2: u8, b3: u8) -> Result<u32, MepsanError> {
    let bytes = [b1, b2, b3];
    bcd3(&bytes)
        .map(|(_, value)| value)
        .map_err(|_| MepsanError::InvalidBcd(bytes))
}

/// Decodes three BCD bytes, returning 0 for any invalid nibble.
pub fn decode_bcd3(b1: u8, b2: u8, b3: u8) -> u32 {
    try_decode_bcd3(b1, b2, b3).unwrap_or(0)
}

/// `(hi << 8) | lo`.
pub fn decode_be16(hi: u8, lo: u8) -> u16 {
    u16::from_be_bytes([hi, lo])
}

/// Reads consecutive big-endian u16 values; a trailing odd byte is ignored.
pub fn be16_values(input: &[u8]) -> Vec<u16> {
    let parsed: IResult<&[u8], Vec<u16>> = many0(be_u16)(input);
    parsed.map(|(_, values)| values).unwrap_or_default()
}

/// Scales a raw price word to SAR per liter, rounded to 4 decimals.
pub fn scale_price(raw: u16) -> f64 {
    round_to(f64::from(raw) / PRICE_DIVISOR, 4)
}

/// Rounds to the given number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
