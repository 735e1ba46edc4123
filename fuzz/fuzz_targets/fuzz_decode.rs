#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use zenbmp::{DecodeRequest, Limits, Strictness};

fuzz_target!(|data: &[u8]| {
    // Any input, any strictness: must never panic
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    for strictness in [Strictness::Standard, Strictness::Strict] {
        let _ = DecodeRequest::new(Cursor::new(data))
            .with_limits(&limits)
            .with_strictness(strictness)
            .decode(enough::Unstoppable);
    }
    let _ = zenbmp::read_headers(&mut Cursor::new(data), Strictness::Standard);
});
