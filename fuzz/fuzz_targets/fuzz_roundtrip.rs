#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let Ok(decoded) = decode_bytes(data) else {
        return;
    };

    let Ok(reencoded) = encode_to_vec(&decoded) else {
        panic!("decoded bitmap failed to encode");
    };
    let Ok(decoded2) = decode_bytes(&reencoded) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());

    // A second pass is a fixed point
    let Ok(reencoded2) = encode_to_vec(&decoded2) else {
        panic!("second encode failed");
    };
    assert_eq!(reencoded, reencoded2);
});
