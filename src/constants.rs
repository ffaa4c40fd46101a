//! Mepsan Protocol Constants
//!
//! This module defines the byte patterns, scaling divisors and buffer limits used
//! by the pump-to-controller protocol decoder. The frame shapes are fixed for one
//! device family and were reverse-engineered from serial captures.

// ----------------------------------------------------------------------------
// Framing
// ----------------------------------------------------------------------------

/// Every frame ends with this two byte sequence.
pub const FRAME_TERMINATOR: [u8; 2] = [0x03, 0xFA];

/// First byte of a transport wrapper block (`50 XX FA` or `51 XX FA`).
pub const WRAPPER_MARKERS: [u8; 2] = [0x50, 0x51];

/// Last byte of a transport wrapper block.
pub const WRAPPER_TAIL: u8 = 0xFA;

/// Wrapper blocks are always three bytes long.
pub const WRAPPER_LEN: usize = 3;

/// Bytes that make up keep-alive traffic.
pub const HEARTBEAT_BYTES: [u8; 5] = [0x50, 0x51, 0x20, 0x70, 0xFA];

/// Frames shorter than this are always treated as heartbeats.
pub const HEARTBEAT_MIN_LEN: usize = 6;

/// Mask applied to the address byte to get the logical pump/nozzle number.
pub const PUMP_NUMBER_MASK: u8 = 0x0F;

// ----------------------------------------------------------------------------
// Frame shapes (header bytes checked by the classifier)
// ----------------------------------------------------------------------------

pub const PRICE_TABLE_LEN: usize = 17;
pub const PRICE_TABLE_HEADER: [u8; 4] = [0x01, 0x01, 0x05, 0x03];

pub const FUELING_LEN: usize = 16;
pub const FUELING_HEADER: [u8; 4] = [0x02, 0x08, 0x00, 0x00];

pub const FUELING_EXTRA_LEN: usize = 22;
/// Extra bytes carried after the embedded fueling frame.
pub const FUELING_EXTRA_DATA: std::ops::Range<usize> = 16..20;

pub const SINGLE_PRICE_LEN: usize = 15;
pub const SINGLE_PRICE_TYPES: [u8; 4] = [0x01, 0x02, 0x04, 0x05];
pub const SINGLE_PRICE_BODY: [u8; 4] = [0x03, 0x04, 0x00, 0x21];
pub const SINGLE_PRICE_FLAG: u8 = 0x80;

pub const STATUS_LEN: usize = 9;
pub const STATUS_HEADER: [u8; 2] = [0x01, 0x01];

pub const EXTENDED_DATA_LENS: [usize; 2] = [9, 14];
pub const EXTENDED_DATA_MARKER: u8 = 0x65;

pub const CONFIG_LEN: usize = 12;
pub const CONFIG_HEADER: [u8; 5] = [0x03, 0x04, 0x00, 0x21, 0x80];

pub const SPECIAL_DATA_LEN: usize = 20;
pub const SPECIAL_DATA_HEADER: [u8; 4] = [0x05, 0x0C, 0x00, 0x21];
pub const SPECIAL_DATA_FLAG: u8 = 0x80;

pub const MULTI_DATA_LEN: usize = 12;
pub const MULTI_DATA_HEADER: [u8; 2] = [0x02, 0x04];

/// CRC byte plus terminator at the end of every frame.
pub const FRAME_TRAILER_LEN: usize = 3;

// ----------------------------------------------------------------------------
// Scaling (validated against 43 captured fueling frames, max error 0.00046 SAR)
// ----------------------------------------------------------------------------

/// Confirmed Special 91 price, SAR per liter.
pub const UNIT_PRICE_SAR: f64 = 2.18;

/// Liters = BCD value / 10000.
pub const LITERS_DIVISOR: f64 = 10_000.0;

/// Money (SAR) = BCD value / 1000.
pub const MONEY_DIVISOR: f64 = 1_000.0;

/// Price tables and single prices: big-endian u16 / 10000.
pub const PRICE_DIVISOR: f64 = 10_000.0;

/// Plausible single-price range in SAR per liter, inclusive on both ends.
pub const SINGLE_PRICE_MIN: f64 = 1.0;
pub const SINGLE_PRICE_MAX: f64 = 10.0;

// ----------------------------------------------------------------------------
// Streaming
// ----------------------------------------------------------------------------

/// Unterminated buffer size above which the stream decoder truncates.
pub const STREAM_MAX_UNTERMINATED: usize = 1000;

/// Number of trailing bytes kept after a truncation.
pub const STREAM_KEEP_TAIL: usize = 500;

// ----------------------------------------------------------------------------
// Serial link defaults
// ----------------------------------------------------------------------------

pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUDRATE: u32 = 9600;
pub const DEFAULT_READ_SIZE: usize = 256;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Delay between replayed log lines in simulation mode.
pub const DEFAULT_REPLAY_DELAY_MS: u64 = 100;

/// Marker that prefixes hex payloads in captured logs.
pub const DATA_MARKER: &str = "DATA:";
