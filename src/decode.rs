//! Header and pixel-plane decoder.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use enough::Stop;
use log::{debug, trace, warn};

use crate::bitmap::Bitmap;
use crate::error::DecodeError;
use crate::header::{
    self, BITS_PER_PIXEL, COMPRESSION_NONE, FileHeader, FileSizeField, INFO_HEADER_SIZE,
    InfoHeader, PIXEL_DATA_OFFSET, SIGNATURE,
};
use crate::limits::Limits;
use crate::pixel::Pixel;

/// Controls how strictly header fields beyond the essentials are checked.
///
/// Signature, bit depth, compression and dimensions are always enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Accept any header size, plane count, palette count, file-size field
    /// and pixel data offset (at or after the headers). Deviations are
    /// logged at `warn`.
    #[default]
    Standard,

    /// Reject header size != 40, planes != 1, palette count != 0, data
    /// offset != 54, and a file-size field that matches neither
    /// [`FileSizeField`] rule.
    Strict,
}

/// Builder for a decode from a seekable byte stream.
///
/// The stream is borrowed or owned for the duration of [`decode`](Self::decode)
/// only.
pub struct DecodeRequest<'a, R> {
    reader: R,
    limits: Option<&'a Limits>,
    strictness: Strictness,
}

impl<'a, R: Read + Seek> DecodeRequest<'a, R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            limits: None,
            strictness: Strictness::default(),
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Read headers, then the pixel plane.
    pub fn decode(mut self, stop: impl Stop) -> Result<Bitmap, DecodeError> {
        decode_stream(&mut self.reader, self.limits, self.strictness, &stop)
    }
}

/// Read and validate the 54 header bytes, leaving the stream just past them.
pub fn read_headers<R: Read>(
    reader: &mut R,
    strictness: Strictness,
) -> Result<(FileHeader, InfoHeader), DecodeError> {
    let signature = reader.read_u16::<LittleEndian>()?;
    if signature != SIGNATURE {
        return Err(DecodeError::BadSignature(signature));
    }
    let file_header = FileHeader::read_after_signature(signature, reader)?;
    let info_header = InfoHeader::read_from(reader)?;
    trace!("bmp file header: {file_header:?}");
    trace!("bmp info header: {info_header:?}");

    if info_header.bits_per_pixel != BITS_PER_PIXEL {
        return Err(DecodeError::UnsupportedPixelFormat(
            info_header.bits_per_pixel,
        ));
    }
    if info_header.compression_method != COMPRESSION_NONE {
        return Err(DecodeError::UnsupportedCompression(
            info_header.compression_method,
        ));
    }
    if info_header.width_px <= 0 || info_header.height_px <= 0 {
        return Err(DecodeError::InvalidDimensions {
            width: info_header.width_px,
            height: info_header.height_px,
        });
    }
    if file_header.pixel_data_offset < PIXEL_DATA_OFFSET {
        return Err(DecodeError::InvalidHeader(format!(
            "pixel data offset {} overlaps the headers",
            file_header.pixel_data_offset
        )));
    }

    if let Some(problem) = lenient_field_problem(&file_header, &info_header) {
        match strictness {
            Strictness::Strict => return Err(DecodeError::InvalidHeader(problem)),
            Strictness::Standard => warn!("accepting bmp header: {problem}"),
        }
    }

    Ok((file_header, info_header))
}

/// First header field that only [`Strictness::Strict`] rejects.
fn lenient_field_problem(file: &FileHeader, info: &InfoHeader) -> Option<String> {
    if info.header_size != INFO_HEADER_SIZE {
        return Some(format!("info header size {}", info.header_size));
    }
    if info.color_planes != 1 {
        return Some(format!("{} color planes", info.color_planes));
    }
    if info.palette_color_count != 0 {
        return Some(format!(
            "palette of {} colors on a 24-bit image",
            info.palette_color_count
        ));
    }
    if file.pixel_data_offset != PIXEL_DATA_OFFSET {
        return Some(format!("pixel data offset {}", file.pixel_data_offset));
    }
    let (w, h) = (info.width_px as u32, info.height_px as u32);
    let size = u64::from(file.file_size_bytes);
    if size != FileSizeField::Legacy.value(w, h) && size != FileSizeField::Exact.value(w, h) {
        return Some(format!("file size field {size}"));
    }
    None
}

fn decode_stream<R: Read + Seek>(
    reader: &mut R,
    limits: Option<&Limits>,
    strictness: Strictness,
    stop: &dyn Stop,
) -> Result<Bitmap, DecodeError> {
    let (file_header, info_header) = read_headers(reader, strictness)?;
    let width = info_header.width_px as u32;
    let height = info_header.height_px as u32;

    let store_bytes = limits
        .copied()
        .unwrap_or_default()
        .pixel_store_bytes(&info_header)?;

    stop.check()?;

    let padding = header::row_padding(width);
    debug!(
        "decoding {width}x{height} bmp into {store_bytes} bytes, pixel data at {}, {padding} padding bytes per row",
        file_header.pixel_data_offset
    );
    reader.seek(SeekFrom::Start(u64::from(file_header.pixel_data_offset)))?;

    // Rows arrive bottom-up; the store is filled in file order and flipped
    // once at the end. Growth follows the bytes actually read, so a lying
    // header cannot force a large allocation up front.
    let row_bytes = u64::from(width) * 3;
    let mut row = Vec::new();
    let mut pixels = Vec::new();
    for y in 0..height {
        if y % 16 == 0 {
            stop.check()?;
        }
        row.clear();
        let got = reader.by_ref().take(row_bytes).read_to_end(&mut row)?;
        if got as u64 != row_bytes {
            return Err(DecodeError::TruncatedStream);
        }
        pixels.extend(row.chunks_exact(3).map(Pixel::from_bytes));
        if padding > 0 {
            reader.seek_relative(padding as i64)?;
        }
    }

    let mut bitmap = Bitmap::from_decoded(pixels, file_header, info_header);
    bitmap.flip_vertical();
    Ok(bitmap)
}
