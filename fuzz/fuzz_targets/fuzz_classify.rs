#![no_main]

use libfuzzer_sys::fuzz_target;
use mepsan_rs::{classify_and_decode, Frame, FrameRecord};

fuzz_target!(|data: &[u8]| {
    // Any terminated byte string must classify without panicking
    let mut bytes = data.to_vec();
    bytes.extend_from_slice(&[0x03, 0xFA]);
    let Ok(frame) = Frame::new(bytes) else {
        return;
    };

    let record = classify_and_decode(&frame);
    if let FrameRecord::SinglePrice(price) = &record {
        assert!((1.0..=10.0).contains(&price.price_sar_per_liter));
    }
    let _ = record.kind();
});
