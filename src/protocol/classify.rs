//! # Frame Classification
//!
//! Frames carry no type byte, so their type is inferred from length and fixed
//! header bytes. Several shapes overlap in length or prefix, so classification
//! is an ordered cascade: the first rule whose predicate matches decodes the
//! frame. The order below is part of the protocol contract.
//!
//! | Priority | Record             | Length  | Match                                                       |
//! |----------|--------------------|---------|-------------------------------------------------------------|
//! | 1        | Heartbeat          | any     | `len < 6`, or every byte before `03 FA` in `{50,51,20,70,FA}` |
//! | 2        | PriceTable         | 17      | `[2..6] = 01 01 05 03`                                       |
//! | 3        | FuelingWithExtra   | 22      | `[2..6] = 02 08 00 00`                                       |
//! | 4        | Fueling            | 16      | `[2..6] = 02 08 00 00`                                       |
//! | 5        | SinglePrice        | 15      | `[2..4] = 01 01`, `[4]` in `{01,02,04,05}`, `[5..10] = 03 04 00 21 80`, price in `1.0..=10.0` |
//! | 6        | Status             | 9       | `[2..4] = 01 01`                                             |
//! | 7        | ExtendedData       | 9 or 14 | `[2] = 65`                                                   |
//! | 8        | Config             | 12      | `[2..7] = 03 04 00 21 80`                                    |
//! | 9        | SpecialData        | 20      | `[2..6] = 05 0C 00 21`, `[6] = 80`                           |
//! | 10       | MultiData          | 12      | `[2..4] = 02 04`                                             |
//! | -        | Unknown            | any     | fallback                                                    |
//!
//! A single-price frame whose price falls outside the plausible range is not
//! passed down the cascade; it becomes `Unknown` with a note.

use crate::constants::*;
use crate::protocol::fields::{be16_values, decode_be16, round_to, scale_price, try_decode_bcd3};
use crate::protocol::frame::{extract_frames, Frame};
use crate::protocol::record::*;
use crate::util::hex::format_hex_spaced;
use crate::util::logging::log_frame_hex;
use log::{debug, warn};

/// Decoding parameters that are configured rather than carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderConfig {
    /// Unit price reported with every fueling record, SAR per liter.
    pub unit_price: f64,
    pub liters_divisor: f64,
    pub money_divisor: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            unit_price: UNIT_PRICE_SAR,
            liters_divisor: LITERS_DIVISOR,
            money_divisor: MONEY_DIVISOR,
        }
    }
}

type Matcher = fn(&[u8]) -> bool;
type Decoder = fn(&[u8], &DecoderConfig) -> FrameRecord;

/// One entry of the classification cascade.
#[derive(Clone, Copy)]
pub struct CascadeRule {
    pub name: &'static str,
    pub matches: Matcher,
    pub decode: Decoder,
}

/// The classification cascade in priority order.
pub const CASCADE: [CascadeRule; 10] = [
    CascadeRule { name: "heartbeat", matches: is_heartbeat, decode: decode_heartbeat },
    CascadeRule { name: "price_table", matches: is_price_table, decode: decode_price_table },
    CascadeRule { name: "fueling_with_extra", matches: is_fueling_with_extra, decode: decode_fueling_with_extra },
    CascadeRule { name: "fueling", matches: is_fueling, decode: decode_fueling },
    CascadeRule { name: "single_price", matches: is_single_price, decode: decode_single_price },
    CascadeRule { name: "status", matches: is_status, decode: decode_status },
    CascadeRule { name: "extended_data", matches: is_extended_data, decode: decode_extended_data },
    CascadeRule { name: "config", matches: is_config, decode: decode_config },
    CascadeRule { name: "special_data", matches: is_special_data, decode: decode_special_data },
    CascadeRule { name: "multi_data", matches: is_multi_data, decode: decode_multi_data },
];

/// Classify and decode a frame using the default configuration.
pub fn classify_and_decode(frame: &Frame) -> FrameRecord {
    classify_with(frame, &DecoderConfig::default())
}

/// Classify and decode a frame. Total: every frame maps to exactly one record.
pub fn classify_with(frame: &Frame, config: &DecoderConfig) -> FrameRecord {
    let bytes = frame.as_bytes();
    for rule in CASCADE.iter() {
        if (rule.matches)(bytes) {
            debug!("frame matched rule '{}' ({} bytes)", rule.name, bytes.len());
            return (rule.decode)(bytes, config);
        }
    }
    debug!("frame of {} bytes matched no rule", bytes.len());
    unknown(bytes, None)
}

/// Decode a complete byte stream, dropping heartbeats and any trailing
/// partial frame.
pub fn decode_bytes(bytes: &[u8], config: &DecoderConfig) -> Vec<FrameRecord> {
    let (frames, rest) = extract_frames(bytes);
    if !rest.is_empty() {
        debug!("dropping {} trailing bytes of a partial frame", rest.len());
    }
    frames
        .iter()
        .inspect(|frame| log_frame_hex("frame", frame.as_bytes()))
        .map(|frame| classify_with(frame, config))
        .filter(|record| !record.is_heartbeat())
        .collect()
}

// ----------------------------------------------------------------------------
// Predicates
// ----------------------------------------------------------------------------

pub fn is_heartbeat(frame: &[u8]) -> bool {
    if frame.len() < HEARTBEAT_MIN_LEN {
        return true;
    }
    let body = &frame[..frame.len() - FRAME_TERMINATOR.len()];
    body.iter().all(|b| HEARTBEAT_BYTES.contains(b))
}

pub fn is_price_table(frame: &[u8]) -> bool {
    frame.len() == PRICE_TABLE_LEN && frame[2..6] == PRICE_TABLE_HEADER
}

pub fn is_fueling_with_extra(frame: &[u8]) -> bool {
    frame.len() == FUELING_EXTRA_LEN && frame[2..6] == FUELING_HEADER
}

pub fn is_fueling(frame: &[u8]) -> bool {
    frame.len() == FUELING_LEN
        && frame[2..6] == FUELING_HEADER
        && frame.ends_with(&FRAME_TERMINATOR)
}

/// Shape check only; the price range gate is applied while decoding.
pub fn is_single_price(frame: &[u8]) -> bool {
    frame.len() == SINGLE_PRICE_LEN
        && frame[2..4] == STATUS_HEADER
        && SINGLE_PRICE_TYPES.contains(&frame[4])
        && frame[5..9] == SINGLE_PRICE_BODY
        && frame[9] == SINGLE_PRICE_FLAG
}

pub fn is_status(frame: &[u8]) -> bool {
    frame.len() == STATUS_LEN && frame[2..4] == STATUS_HEADER
}

pub fn is_extended_data(frame: &[u8]) -> bool {
    EXTENDED_DATA_LENS.contains(&frame.len()) && frame[2] == EXTENDED_DATA_MARKER
}

pub fn is_config(frame: &[u8]) -> bool {
    frame.len() == CONFIG_LEN && frame[2..7] == CONFIG_HEADER
}

pub fn is_special_data(frame: &[u8]) -> bool {
    frame.len() == SPECIAL_DATA_LEN
        && frame[2..6] == SPECIAL_DATA_HEADER
        && frame[6] == SPECIAL_DATA_FLAG
}

pub fn is_multi_data(frame: &[u8]) -> bool {
    frame.len() == MULTI_DATA_LEN && frame[2..4] == MULTI_DATA_HEADER
}

// ----------------------------------------------------------------------------
// Decoders
// ----------------------------------------------------------------------------

/// Payload between a header of `start` bytes and the CRC + terminator trailer.
fn payload(frame: &[u8], start: usize) -> &[u8] {
    &frame[start..frame.len() - FRAME_TRAILER_LEN]
}

fn unknown(frame: &[u8], note: Option<String>) -> FrameRecord {
    FrameRecord::Unknown(UnknownRecord {
        raw: format_hex_spaced(frame),
        note,
    })
}

fn decode_heartbeat(_frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    FrameRecord::Heartbeat
}

fn decode_price_table(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    let price = |i: usize| scale_price(decode_be16(frame[i], frame[i + 1]));
    FrameRecord::PriceTable(PriceTableRecord {
        pump: frame[0],
        grade_index: frame[1],
        prices: GradePrices {
            g1: price(7),
            g2: price(9),
            g3: price(11),
            g4: price(13),
        },
    })
}

/// Liters at bytes 6..9, money at 9..12, both cumulative BCD.
fn fueling_reading(frame: &[u8], config: &DecoderConfig) -> FuelingReading {
    let liters_bytes = &frame[6..9];
    let money_bytes = &frame[9..12];
    let liters = try_decode_bcd3(liters_bytes[0], liters_bytes[1], liters_bytes[2]);
    let money = try_decode_bcd3(money_bytes[0], money_bytes[1], money_bytes[2]);
    let bcd_defaulted = liters.is_err() || money.is_err();
    // Invalid BCD reads as zero.
    let liters_raw = liters.unwrap_or(0);
    let money_raw = money.unwrap_or(0);

    FuelingReading {
        money_sar: round_to(f64::from(money_raw) / config.money_divisor, 2),
        liters: round_to(f64::from(liters_raw) / config.liters_divisor, 2),
        unit_price: config.unit_price,
        liters_raw,
        money_raw,
        liters_hex: format_hex_spaced(liters_bytes),
        money_hex: format_hex_spaced(money_bytes),
        bcd_defaulted,
    }
}

fn decode_fueling(frame: &[u8], config: &DecoderConfig) -> FrameRecord {
    FrameRecord::Fueling(FuelingRecord {
        pump: frame[0],
        command: frame[1],
        reading: fueling_reading(frame, config),
        frame_hex: format_hex_spaced(frame),
    })
}

fn decode_fueling_with_extra(frame: &[u8], config: &DecoderConfig) -> FrameRecord {
    let embedded = &frame[..FUELING_LEN];
    let (reading, extra_data) = if is_fueling(embedded) {
        (
            Some(fueling_reading(embedded, config)),
            Some(format_hex_spaced(&frame[FUELING_EXTRA_DATA])),
        )
    } else {
        debug!("embedded fueling frame did not validate, keeping it opaque");
        (None, None)
    };

    FrameRecord::FuelingWithExtra(FuelingWithExtraRecord {
        pump: frame[0],
        command: frame[1],
        reading,
        extra_data,
        frame_hex: format_hex_spaced(frame),
    })
}

fn decode_single_price(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    let price = scale_price(decode_be16(frame[10], frame[11]));
    if !(SINGLE_PRICE_MIN..=SINGLE_PRICE_MAX).contains(&price) {
        warn!(
            "single price {price:.4} outside {SINGLE_PRICE_MIN}..={SINGLE_PRICE_MAX}, frame: {}",
            format_hex_spaced(frame)
        );
        return unknown(
            frame,
            Some(format!(
                "Matched price pattern but decoded value {price:.4} is outside {SINGLE_PRICE_MIN:.1}-{SINGLE_PRICE_MAX:.1} SAR/L"
            )),
        );
    }

    FrameRecord::SinglePrice(SinglePriceRecord {
        pump: frame[0],
        command: frame[1],
        price_type: frame[4],
        price_sar_per_liter: price,
        frame_hex: format_hex_spaced(frame),
    })
}

fn decode_status(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    FrameRecord::Status(StatusRecord {
        pump: frame[0],
        command: frame[1],
        status_byte: frame[4],
    })
}

fn decode_extended_data(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    let data = payload(frame, 4);
    FrameRecord::ExtendedData(ExtendedDataRecord {
        pump: frame[0],
        command: frame[1],
        extended_type: frame[3],
        data_length: data.len(),
        data_hex: format_hex_spaced(data),
    })
}

fn decode_config(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    FrameRecord::Config(ConfigRecord {
        pump: frame[0],
        command: frame[1],
        config_data: format_hex_spaced(payload(frame, 7)),
    })
}

fn decode_special_data(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    let data = payload(frame, 7);
    // Long enough to hold three prices.
    let values = (data.len() >= 6)
        .then(|| be16_values(data).into_iter().map(scale_price).collect());

    FrameRecord::SpecialData(SpecialDataRecord {
        pump: frame[0],
        command: frame[1],
        values,
        data_hex: format_hex_spaced(data),
    })
}

fn decode_multi_data(frame: &[u8], _config: &DecoderConfig) -> FrameRecord {
    let data = payload(frame, 4);
    FrameRecord::MultiData(MultiDataRecord {
        pump: frame[0],
        command: frame[1],
        data_items: data.to_vec(),
        data_hex: format_hex_spaced(data),
    })
}
