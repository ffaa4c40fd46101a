#![no_main]

use libfuzzer_sys::fuzz_target;
use mepsan_rs::protocol::{extract_frames, FrameSynchronizer, StreamDecoder};

fuzz_target!(|data: &[u8]| {
    let (frames, rest) = extract_frames(data);
    for frame in &frames {
        assert!(frame.as_bytes().ends_with(&[0x03, 0xFA]));
    }

    // Splitting the input anywhere must not change the frames found
    if !data.is_empty() {
        let split = data[0] as usize % (data.len() + 1);
        let mut sync = FrameSynchronizer::new();
        let mut chunked = sync.push(&data[..split]);
        chunked.extend(sync.push(&data[split..]));
        assert_eq!(chunked, frames);
        assert_eq!(sync.pending(), rest);
    }

    // The stream buffer never holds more than the cap
    let mut decoder = StreamDecoder::new();
    for chunk in data.chunks(97) {
        let _ = decoder.ingest(chunk);
        assert!(decoder.pending().len() <= 1000);
    }
});
