//! # Decoded Frame Records
//!
//! `FrameRecord` is the typed result of classifying one frame. Each variant keeps
//! the fields decoded from its fixed byte layout; opaque payloads are kept as
//! spaced uppercase hex. Records serialize with a `"type"` tag in snake_case,
//! which is the shape written to decode reports.

use serde::{Serialize, Serializer};

/// Serializes a byte as `"0x38"`.
fn hex_byte<S: Serializer>(byte: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&crate::util::hex::format_hex_byte(*byte))
}

fn hex_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(bytes.iter().map(|b| crate::util::hex::format_hex_byte(*b)))
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameRecord {
    /// Keep-alive traffic. Filtered before any output is produced.
    Heartbeat,
    PriceTable(PriceTableRecord),
    FuelingWithExtra(FuelingWithExtraRecord),
    Fueling(FuelingRecord),
    SinglePrice(SinglePriceRecord),
    Status(StatusRecord),
    ExtendedData(ExtendedDataRecord),
    Config(ConfigRecord),
    SpecialData(SpecialDataRecord),
    MultiData(MultiDataRecord),
    Unknown(UnknownRecord),
}

impl FrameRecord {
    /// Stable snake_case name of the variant, as used in reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameRecord::Heartbeat => "heartbeat",
            FrameRecord::PriceTable(_) => "price_table",
            FrameRecord::FuelingWithExtra(_) => "fueling_with_extra",
            FrameRecord::Fueling(_) => "fueling",
            FrameRecord::SinglePrice(_) => "single_price",
            FrameRecord::Status(_) => "status",
            FrameRecord::ExtendedData(_) => "extended_data",
            FrameRecord::Config(_) => "config",
            FrameRecord::SpecialData(_) => "special_data",
            FrameRecord::MultiData(_) => "multi_data",
            FrameRecord::Unknown(_) => "unknown",
        }
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self, FrameRecord::Heartbeat)
    }

    /// Fueling or fueling-with-extra.
    pub fn is_fueling(&self) -> bool {
        matches!(self, FrameRecord::Fueling(_) | FrameRecord::FuelingWithExtra(_))
    }

    /// Address byte of the frame, when the variant carries one.
    pub fn pump(&self) -> Option<u8> {
        match self {
            FrameRecord::Heartbeat | FrameRecord::Unknown(_) => None,
            FrameRecord::PriceTable(r) => Some(r.pump),
            FrameRecord::FuelingWithExtra(r) => Some(r.pump),
            FrameRecord::Fueling(r) => Some(r.pump),
            FrameRecord::SinglePrice(r) => Some(r.pump),
            FrameRecord::Status(r) => Some(r.pump),
            FrameRecord::ExtendedData(r) => Some(r.pump),
            FrameRecord::Config(r) => Some(r.pump),
            FrameRecord::SpecialData(r) => Some(r.pump),
            FrameRecord::MultiData(r) => Some(r.pump),
        }
    }

    /// Cumulative reading of a fueling record, if it decoded.
    pub fn fueling_reading(&self) -> Option<&FuelingReading> {
        match self {
            FrameRecord::Fueling(r) => Some(&r.reading),
            FrameRecord::FuelingWithExtra(r) => r.reading.as_ref(),
            _ => None,
        }
    }
}

/// Four grade prices, SAR per liter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradePrices {
    pub g1: f64,
    pub g2: f64,
    pub g3: f64,
    pub g4: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTableRecord {
    pub pump: u8,
    pub grade_index: u8,
    pub prices: GradePrices,
}

/// Cumulative liters and money for the current fueling on a pump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelingReading {
    pub money_sar: f64,
    pub liters: f64,
    pub unit_price: f64,
    pub liters_raw: u32,
    pub money_raw: u32,
    pub liters_hex: String,
    pub money_hex: String,
    /// Either BCD field held an invalid nibble and was read as zero.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bcd_defaulted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelingRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    #[serde(flatten)]
    pub reading: FuelingReading,
    pub frame_hex: String,
}

impl FuelingRecord {
    /// Logical pump/nozzle number (low nibble of the address).
    pub fn pump_number(&self) -> u8 {
        self.pump & crate::constants::PUMP_NUMBER_MASK
    }
}

/// A 22-byte fueling frame. `reading` is `None` when the embedded 16-byte
/// fueling frame did not validate; the record is then opaque.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelingWithExtraRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    #[serde(flatten)]
    pub reading: Option<FuelingReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<String>,
    pub frame_hex: String,
}

impl FuelingWithExtraRecord {
    pub fn pump_number(&self) -> u8 {
        self.pump & crate::constants::PUMP_NUMBER_MASK
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePriceRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    #[serde(serialize_with = "hex_byte")]
    pub price_type: u8,
    pub price_sar_per_liter: f64,
    pub frame_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    pub status_byte: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedDataRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    #[serde(serialize_with = "hex_byte")]
    pub extended_type: u8,
    pub data_length: usize,
    pub data_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    pub config_data: String,
}

/// 20-byte record; `values` holds candidate multi-grade prices when the
/// payload was long enough to read them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialDataRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    pub data_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiDataRecord {
    pub pump: u8,
    #[serde(serialize_with = "hex_byte")]
    pub command: u8,
    #[serde(serialize_with = "hex_bytes")]
    pub data_items: Vec<u8>,
    pub data_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnknownRecord {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
