#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: i32, height: i32, file_size: u32) -> Vec<u8> {
    let mut bmp = vec![0u8; 54];
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&file_size.to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&54u32.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // info header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&24u16.to_le_bytes()); // bpp
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1: 3 pixel bytes + 1 padding
    let mut bmp = header(1, 1, 58);
    bmp.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp).unwrap();

    // 2x2: two rows of 6 pixel bytes + 2 padding
    let mut bmp = header(2, 2, 74);
    bmp.extend_from_slice(&[255, 0, 0, 255, 255, 255, 0, 0]);
    bmp.extend_from_slice(&[0, 0, 255, 0, 255, 0, 0, 0]);
    fs::write(format!("{dir}/bmp_2x2.bmp"), bmp).unwrap();

    // 4x1: no padding
    let mut bmp = header(4, 1, 66);
    bmp.extend_from_slice(&[0x10; 12]);
    fs::write(format!("{dir}/bmp_4x1.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/headers_only.bin"), header(3, 3, 90)).unwrap();
    fs::write(format!("{dir}/negative_height.bin"), header(1, -1, 58)).unwrap();

    println!("Generated seed corpus in {dir}/");
}
