//! Tests for frame classification and record decoding.

mod common;

use common::hex_to_bytes;
use mepsan_rs::protocol::classify::{classify_and_decode, classify_with, DecoderConfig};
use mepsan_rs::protocol::record::FrameRecord;
use mepsan_rs::Frame;

fn frame(bytes: &[u8]) -> Frame {
    Frame::new(bytes.to_vec()).unwrap()
}

fn classify(bytes: &[u8]) -> FrameRecord {
    classify_and_decode(&frame(bytes))
}

const FUELING: [u8; 16] = [
    0x01, 0x38, 0x02, 0x08, 0x00, 0x00, 0x00, 0x01, 0x23, 0x00, 0x04, 0x56, 0xAA, 0x5C, 0x03, 0xFA,
];

fn single_price(price_hi: u8, price_lo: u8) -> [u8; 15] {
    [
        0x01, 0x38, 0x01, 0x01, 0x01, 0x03, 0x04, 0x00, 0x21, 0x80, price_hi, price_lo, 0x4E, 0x03,
        0xFA,
    ]
}

/// Tests that frames made only of heartbeat bytes are recognized.
#[test]
fn test_heartbeat_frames() {
    assert!(classify(&[0x50, 0x20, 0x70, 0xFA, 0x51, 0x20, 0x03, 0xFA]).is_heartbeat());
    assert!(classify(&[0x01, 0x01, 0x05, 0x03, 0xFA]).is_heartbeat());
    assert!(!classify(&[0x01, 0x38, 0x01, 0x01, 0x05, 0x00, 0x00, 0x03, 0xFA]).is_heartbeat());
}

/// Tests decoding of the 17-byte price table.
#[test]
fn test_price_table() {
    let bytes = [
        0x01, 0x00, 0x01, 0x01, 0x05, 0x03, 0x00, 0x55, 0x28, 0x5B, 0x7C, 0x00, 0x00, 0x27, 0x10,
        0x03, 0xFA,
    ];
    match classify(&bytes) {
        FrameRecord::PriceTable(record) => {
            assert_eq!(record.pump, 0x01);
            assert_eq!(record.grade_index, 0x00);
            assert_eq!(record.prices.g1, 2.18);
            assert_eq!(record.prices.g2, 2.342);
            assert_eq!(record.prices.g3, 0.0);
            assert_eq!(record.prices.g4, 1.0);
        }
        other => panic!("expected price table, got {other:?}"),
    }
}

/// Tests the fueling scenario: liters 00 01 23 and money 00 04 56.
#[test]
fn test_fueling_frame() {
    match classify(&FUELING) {
        FrameRecord::Fueling(record) => {
            assert_eq!(record.pump, 0x01);
            assert_eq!(record.command, 0x38);
            assert_eq!(record.pump_number(), 1);
            assert_eq!(record.reading.liters, 0.01);
            assert_eq!(record.reading.money_sar, 0.46);
            assert_eq!(record.reading.unit_price, 2.18);
            assert_eq!(record.reading.liters_raw, 123);
            assert_eq!(record.reading.money_raw, 456);
            assert_eq!(record.reading.liters_hex, "00 01 23");
            assert_eq!(record.reading.money_hex, "00 04 56");
            assert!(!record.reading.bcd_defaulted);
            assert_eq!(record.frame_hex, "01 38 02 08 00 00 00 01 23 00 04 56 AA 5C 03 FA");
        }
        other => panic!("expected fueling, got {other:?}"),
    }
}

/// Tests that corrupted BCD reads as zero and is flagged.
#[test]
fn test_fueling_with_invalid_bcd() {
    let mut bytes = FUELING;
    bytes[7] = 0x1A;
    match classify(&bytes) {
        FrameRecord::Fueling(record) => {
            assert_eq!(record.reading.liters, 0.0);
            assert_eq!(record.reading.money_sar, 0.46);
            assert!(record.reading.bcd_defaulted);
        }
        other => panic!("expected fueling, got {other:?}"),
    }
}

/// Tests a 22-byte frame whose embedded fueling frame validates.
#[test]
fn test_fueling_with_extra_decoded() {
    let mut bytes = FUELING.to_vec();
    bytes.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x03, 0xFA]);
    match classify(&bytes) {
        FrameRecord::FuelingWithExtra(record) => {
            let reading = record.reading.as_ref().expect("reading");
            assert_eq!(reading.liters, 0.01);
            assert_eq!(reading.money_sar, 0.46);
            assert_eq!(record.extra_data.as_deref(), Some("11 22 33 44"));
            assert_eq!(record.pump_number(), 1);
        }
        other => panic!("expected fueling with extra, got {other:?}"),
    }
}

/// Tests a 22-byte fueling frame whose embedded frame lacks a terminator.
#[test]
fn test_fueling_with_extra_opaque() {
    let mut bytes = FUELING.to_vec();
    bytes[14] = 0x00;
    bytes[15] = 0x00;
    bytes.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x03, 0xFA]);
    let record = classify(&bytes);
    assert!(record.is_fueling());
    assert!(record.fueling_reading().is_none());
    match record {
        FrameRecord::FuelingWithExtra(record) => {
            assert!(record.extra_data.is_none());
            assert!(record.frame_hex.starts_with("01 38 02 08"));
        }
        other => panic!("expected fueling with extra, got {other:?}"),
    }
}

/// Tests a plausible single price.
#[test]
fn test_single_price_accepted() {
    match classify(&single_price(0x55, 0x28)) {
        FrameRecord::SinglePrice(record) => {
            assert_eq!(record.price_type, 0x01);
            assert_eq!(record.price_sar_per_liter, 2.18);
        }
        other => panic!("expected single price, got {other:?}"),
    }
}

/// Tests the lower bound of the price gate: 0.9999 is rejected, 1.0000 is kept.
#[test]
fn test_single_price_lower_bound() {
    match classify(&single_price(0x27, 0x0F)) {
        FrameRecord::Unknown(record) => {
            let note = record.note.expect("note");
            assert!(note.contains("0.9999"), "{note}");
            assert!(note.contains("outside 1.0-10.0 SAR/L"), "{note}");
            assert!(record.raw.starts_with("01 38 01 01 01 03 04 00 21 80 27 0F"));
        }
        other => panic!("expected unknown, got {other:?}"),
    }

    match classify(&single_price(0x27, 0x10)) {
        FrameRecord::SinglePrice(record) => assert_eq!(record.price_sar_per_liter, 1.0),
        other => panic!("expected single price, got {other:?}"),
    }
}

/// Tests that the largest encodable price stays inside the gate.
#[test]
fn test_single_price_largest_word() {
    match classify(&single_price(0xFF, 0xFF)) {
        FrameRecord::SinglePrice(record) => assert_eq!(record.price_sar_per_liter, 6.5535),
        other => panic!("expected single price, got {other:?}"),
    }
}

/// Tests that a gated single price does not fall through to later rules.
#[test]
fn test_single_price_gate_does_not_fall_through() {
    let record = classify(&single_price(0x00, 0x00));
    assert_eq!(record.kind(), "unknown");
}

/// Tests that an unlisted price type leaves a 15-byte frame unknown.
#[test]
fn test_single_price_bad_type() {
    let mut bytes = single_price(0x55, 0x28);
    bytes[4] = 0x03;
    match classify(&bytes) {
        FrameRecord::Unknown(record) => assert!(record.note.is_none()),
        other => panic!("expected unknown, got {other:?}"),
    }
}

/// Tests the 9-byte status frame.
#[test]
fn test_status() {
    match classify(&[0x01, 0x38, 0x01, 0x01, 0x05, 0x00, 0x00, 0x03, 0xFA]) {
        FrameRecord::Status(record) => {
            assert_eq!(record.pump, 0x01);
            assert_eq!(record.command, 0x38);
            assert_eq!(record.status_byte, 0x05);
        }
        other => panic!("expected status, got {other:?}"),
    }
}

/// Tests both extended data lengths.
#[test]
fn test_extended_data() {
    match classify(&[0x02, 0x30, 0x65, 0x07, 0xAA, 0xBB, 0xCC, 0x03, 0xFA]) {
        FrameRecord::ExtendedData(record) => {
            assert_eq!(record.extended_type, 0x07);
            assert_eq!(record.data_length, 2);
            assert_eq!(record.data_hex, "AA BB");
        }
        other => panic!("expected extended data, got {other:?}"),
    }

    let long = [
        0x02, 0x30, 0x65, 0x09, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x00, 0x03, 0xFA,
    ];
    match classify(&long) {
        FrameRecord::ExtendedData(record) => {
            assert_eq!(record.data_length, 7);
            assert_eq!(record.data_hex, "01 02 03 04 05 06 07");
        }
        other => panic!("expected extended data, got {other:?}"),
    }
}

/// Tests the 12-byte configuration frame.
#[test]
fn test_config() {
    let bytes = [0x01, 0x38, 0x03, 0x04, 0x00, 0x21, 0x80, 0x12, 0x34, 0x00, 0x03, 0xFA];
    match classify(&bytes) {
        FrameRecord::Config(record) => assert_eq!(record.config_data, "12 34"),
        other => panic!("expected config, got {other:?}"),
    }
}

/// Tests the 20-byte special data frame and its candidate prices.
#[test]
fn test_special_data() {
    let bytes = [
        0x01, 0x38, 0x05, 0x0C, 0x00, 0x21, 0x80, 0x55, 0x28, 0x5B, 0x7C, 0x27, 0x10, 0x00, 0x00,
        0x00, 0x00, 0x9C, 0x03, 0xFA,
    ];
    match classify(&bytes) {
        FrameRecord::SpecialData(record) => {
            assert_eq!(record.values, Some(vec![2.18, 2.342, 1.0, 0.0, 0.0]));
            assert_eq!(record.data_hex, "55 28 5B 7C 27 10 00 00 00 00");
        }
        other => panic!("expected special data, got {other:?}"),
    }
}

/// Tests the 12-byte multi data frame.
#[test]
fn test_multi_data() {
    let bytes = [0x01, 0x38, 0x02, 0x04, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x00, 0x03, 0xFA];
    match classify(&bytes) {
        FrameRecord::MultiData(record) => {
            assert_eq!(record.data_items, vec![0x0A, 0x0B, 0x0C, 0x0D, 0x0E]);
            assert_eq!(record.data_hex, "0A 0B 0C 0D 0E");
        }
        other => panic!("expected multi data, got {other:?}"),
    }
}

/// Tests that frames matching no rule are kept verbatim as unknown.
#[test]
fn test_unknown_fallback() {
    match classify(&[0x01, 0x38, 0x09, 0x09, 0x09, 0x09, 0x03, 0xFA]) {
        FrameRecord::Unknown(record) => {
            assert_eq!(record.raw, "01 38 09 09 09 09 03 FA");
            assert!(record.note.is_none());
        }
        other => panic!("expected unknown, got {other:?}"),
    }
}

/// Tests cascade boundaries between rules that share a length or prefix.
#[test]
fn test_cascade_boundaries() {
    // Fueling header at 16 vs 22 bytes.
    assert_eq!(classify(&FUELING).kind(), "fueling");
    let mut extra = FUELING.to_vec();
    extra.extend_from_slice(&[0, 0, 0, 0, 0x03, 0xFA]);
    assert_eq!(classify(&extra).kind(), "fueling_with_extra");

    // Fueling header at any other length.
    let mut short = FUELING[..13].to_vec();
    short.extend_from_slice(&[0x03, 0xFA]);
    assert_eq!(classify(&short).kind(), "unknown");

    // 12 bytes: config header vs multi data header.
    let config = [0x01, 0x38, 0x03, 0x04, 0x00, 0x21, 0x80, 0x00, 0x00, 0x00, 0x03, 0xFA];
    let multi = [0x01, 0x38, 0x02, 0x04, 0x00, 0x21, 0x80, 0x00, 0x00, 0x00, 0x03, 0xFA];
    assert_eq!(classify(&config).kind(), "config");
    assert_eq!(classify(&multi).kind(), "multi_data");

    // 9 bytes: status prefix vs extended marker.
    let status = [0x01, 0x38, 0x01, 0x01, 0x65, 0x00, 0x00, 0x03, 0xFA];
    let extended = [0x01, 0x38, 0x65, 0x01, 0x00, 0x00, 0x00, 0x03, 0xFA];
    assert_eq!(classify(&status).kind(), "status");
    assert_eq!(classify(&extended).kind(), "extended_data");

    // Heartbeat wins over everything.
    let idle = [0x50, 0x50, 0x20, 0x70, 0x51, 0x20, 0x70, 0x03, 0xFA];
    assert!(classify(&idle).is_heartbeat());
}

/// Tests that the decoder configuration drives fueling scaling.
#[test]
fn test_custom_divisors() {
    let config = DecoderConfig {
        unit_price: 2.33,
        liters_divisor: 100.0,
        money_divisor: 100.0,
    };
    match classify_with(&frame(&FUELING), &config) {
        FrameRecord::Fueling(record) => {
            assert_eq!(record.reading.liters, 1.23);
            assert_eq!(record.reading.money_sar, 4.56);
            assert_eq!(record.reading.unit_price, 2.33);
        }
        other => panic!("expected fueling, got {other:?}"),
    }
}

/// Tests the address byte reported by each record kind.
#[test]
fn test_record_pump_address() {
    let status = classify(&hex_to_bytes("12 38 01 01 05 00 00 03 FA"));
    assert_eq!(status.pump(), Some(0x12));
    let unknown = classify(&hex_to_bytes("12 38 09 09 09 09 03 FA"));
    assert_eq!(unknown.pump(), None);
    let fueling = classify(&hex_to_bytes("22 38 02 08 00 00 00 01 23 00 04 56 AA 5C 03 FA"));
    assert_eq!(fueling.pump(), Some(0x22));
    assert!(fueling.is_fueling());
}

/// Tests the JSON shape of a decoded record.
#[test]
fn test_record_json_shape() {
    let value = serde_json::to_value(classify(&FUELING)).unwrap();
    assert_eq!(value["type"], "fueling");
    assert_eq!(value["pump"], 1);
    assert_eq!(value["command"], "0x38");
    assert_eq!(value["liters"], 0.01);
    assert_eq!(value["money_sar"], 0.46);
    assert!(value.get("bcd_defaulted").is_none());
}
