//! # zenbmp
//!
//! Reader and writer for uncompressed 24-bit Windows Bitmap (BMP) files,
//! with an in-memory pixel matrix for simple transforms.
//!
//! ## Format
//!
//! - 14-byte `BITMAPFILEHEADER` + 40-byte `BITMAPINFOHEADER`, little-endian
//! - bottom-up rows of blue-green-red pixels, each row zero-padded to a
//!   4-byte boundary
//! - no color table, no compression
//!
//! A bitmap read from a file this crate wrote re-encodes to the same bytes.
//!
//! ## Non-Goals
//!
//! - Compressed BMP (RLE, bitfields), palettes, or any depth but 24 bits
//! - Top-down (negative height) files
//! - Other image formats
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{Bitmap, Pixel};
//!
//! let mut img = Bitmap::from_matrix(vec![
//!     vec![Pixel::from_rgb(255, 0, 0), Pixel::from_rgb(0, 255, 0)],
//!     vec![Pixel::from_rgb(0, 0, 255), Pixel::gray(255)],
//! ])?;
//! img.save("four.bmp")?;
//!
//! let mut loaded = Bitmap::open("four.bmp")?;
//! loaded.grayscale();
//! loaded.mirror_horizontal();
//! println!("{}", loaded.at(0, 0)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

mod bitmap;
mod decode;
mod encode;
mod error;
mod header;
mod limits;
mod pixel;

use std::io::{Cursor, Read, Seek, Write};

// Re-exports
pub use bitmap::Bitmap;
pub use decode::{DecodeRequest, Strictness, read_headers};
pub use encode::EncodeRequest;
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{AccessError, ConstructionError, DecodeError, EncodeError};
pub use header::{
    BITS_PER_PIXEL, FILE_HEADER_SIZE, FileHeader, FileSizeField, INFO_HEADER_SIZE, InfoHeader,
    PIXEL_DATA_OFFSET, SIGNATURE, pixel_plane_size, row_padding, row_stride,
};
pub use limits::Limits;
pub use pixel::Pixel;

/// Decode a BMP from a seekable stream with default settings.
pub fn decode<R: Read + Seek>(reader: R) -> Result<Bitmap, DecodeError> {
    DecodeRequest::new(reader).decode(Unstoppable)
}

/// Decode a BMP held in memory.
pub fn decode_bytes(data: &[u8]) -> Result<Bitmap, DecodeError> {
    decode(Cursor::new(data))
}

/// Encode with default settings.
pub fn encode<W: Write>(bitmap: &Bitmap, writer: W) -> Result<(), EncodeError> {
    EncodeRequest::new().encode(bitmap, writer, Unstoppable)
}

/// Encode into a fresh buffer with default settings.
pub fn encode_to_vec(bitmap: &Bitmap) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode_to_vec(bitmap, Unstoppable)
}
