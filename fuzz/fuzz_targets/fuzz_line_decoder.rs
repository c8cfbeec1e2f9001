//! Fuzz target: `LineDecoder::push`
//!
//! Drives arbitrary byte sequences into the streaming line decoder and
//! asserts that it never panics, never buffers past its capacity, and
//! accepts a clean line after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use cafe_dispenser::serial::{LineDecoder, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    for &byte in data {
        if let Some(line) = decoder.push(byte) {
            assert!(!line.contains('\n'));
        }
        assert!(decoder.pending() <= MAX_LINE_LEN);
    }

    decoder.reset();
    assert_eq!(decoder.pending(), 0);
    for &byte in b"S1\n".iter().take(2) {
        assert!(decoder.push(byte).is_none());
    }
    assert_eq!(decoder.push(b'\n').as_deref(), Some("S1"));
});
