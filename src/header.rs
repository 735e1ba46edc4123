//! BITMAPFILEHEADER / BITMAPINFOHEADER layout and row-size arithmetic.
//!
//! Both headers are little-endian and packed: 14 + 40 = 54 bytes precede
//! the pixel plane in every file this crate writes.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// `"BM"` read as a little-endian `u16`.
pub const SIGNATURE: u16 = 0x4D42;
pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
/// Offset of the first pixel row in files written by this crate.
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
pub const BITS_PER_PIXEL: u16 = 24;
/// `BI_RGB`, uncompressed.
pub const COMPRESSION_NONE: u32 = 0;

const BYTES_PER_PIXEL: u64 = 3;

/// The 14-byte file header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: u16,
    pub file_size_bytes: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub pixel_data_offset: u32,
}

impl FileHeader {
    /// Header for a freshly built image with the given size field.
    pub(crate) fn synthesize(file_size_bytes: u32) -> Self {
        Self {
            signature: SIGNATURE,
            file_size_bytes,
            reserved1: 0,
            reserved2: 0,
            pixel_data_offset: PIXEL_DATA_OFFSET,
        }
    }

    /// Read the 12 bytes that follow an already consumed signature.
    pub(crate) fn read_after_signature<R: Read>(signature: u16, r: &mut R) -> io::Result<Self> {
        Ok(Self {
            signature,
            file_size_bytes: r.read_u32::<LittleEndian>()?,
            reserved1: r.read_u16::<LittleEndian>()?,
            reserved2: r.read_u16::<LittleEndian>()?,
            pixel_data_offset: r.read_u32::<LittleEndian>()?,
        })
    }

    pub(crate) fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u16::<LittleEndian>(self.signature)?;
        w.write_u32::<LittleEndian>(self.file_size_bytes)?;
        w.write_u16::<LittleEndian>(self.reserved1)?;
        w.write_u16::<LittleEndian>(self.reserved2)?;
        w.write_u32::<LittleEndian>(self.pixel_data_offset)
    }
}

/// The 40-byte BITMAPINFOHEADER.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width_px: i32,
    /// Positive: rows stored bottom-up.
    pub height_px: i32,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub compression_method: u32,
    /// Informational; 0 is valid for uncompressed data.
    pub image_data_size_bytes: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub palette_color_count: u32,
    pub important_color_count: u32,
}

impl InfoHeader {
    /// Default field values for a constructed image. Callers guarantee
    /// both dimensions fit in `i32`.
    pub(crate) fn synthesize(width: u32, height: u32) -> Self {
        Self {
            header_size: INFO_HEADER_SIZE,
            width_px: width as i32,
            height_px: height as i32,
            color_planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression_method: COMPRESSION_NONE,
            image_data_size_bytes: 0,
            x_pixels_per_meter: 0,
            y_pixels_per_meter: 0,
            palette_color_count: 0,
            important_color_count: 0,
        }
    }

    pub(crate) fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            header_size: r.read_u32::<LittleEndian>()?,
            width_px: r.read_i32::<LittleEndian>()?,
            height_px: r.read_i32::<LittleEndian>()?,
            color_planes: r.read_u16::<LittleEndian>()?,
            bits_per_pixel: r.read_u16::<LittleEndian>()?,
            compression_method: r.read_u32::<LittleEndian>()?,
            image_data_size_bytes: r.read_u32::<LittleEndian>()?,
            x_pixels_per_meter: r.read_i32::<LittleEndian>()?,
            y_pixels_per_meter: r.read_i32::<LittleEndian>()?,
            palette_color_count: r.read_u32::<LittleEndian>()?,
            important_color_count: r.read_u32::<LittleEndian>()?,
        })
    }

    pub(crate) fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.header_size)?;
        w.write_i32::<LittleEndian>(self.width_px)?;
        w.write_i32::<LittleEndian>(self.height_px)?;
        w.write_u16::<LittleEndian>(self.color_planes)?;
        w.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        w.write_u32::<LittleEndian>(self.compression_method)?;
        w.write_u32::<LittleEndian>(self.image_data_size_bytes)?;
        w.write_i32::<LittleEndian>(self.x_pixels_per_meter)?;
        w.write_i32::<LittleEndian>(self.y_pixels_per_meter)?;
        w.write_u32::<LittleEndian>(self.palette_color_count)?;
        w.write_u32::<LittleEndian>(self.important_color_count)
    }
}

/// Filler bytes after a stored row of `width` pixels.
///
/// Written as `width % 4`. Because `3w` is congruent to `-w` modulo 4 this
/// equals the usual `(4 - (3 * width) % 4) % 4`, so every row ends on a
/// 4-byte boundary.
pub fn row_padding(width: u32) -> usize {
    (width % 4) as usize
}

/// Bytes occupied by one stored row, padding included.
pub fn row_stride(width: u32) -> u64 {
    u64::from(width) * BYTES_PER_PIXEL + row_padding(width) as u64
}

/// Bytes of pixel data following the headers.
pub fn pixel_plane_size(width: u32, height: u32) -> u64 {
    row_stride(width).saturating_mul(u64::from(height))
}

/// How the `file_size_bytes` header field is computed on write.
///
/// Only the header field differs between rules; the bytes written are the
/// same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSizeField {
    /// `54 + 3n + (width % 4) * n` for `n` pixels, the value this codec has
    /// always written. Overstates the real size whenever the image has
    /// padded rows and more than one row.
    #[default]
    Legacy,

    /// The number of bytes actually written: `54 + height * stride`.
    Exact,
}

impl FileSizeField {
    /// Field value for a `width` x `height` image. Saturates at
    /// `u64::MAX` for header dimensions no real file can have.
    pub fn value(self, width: u32, height: u32) -> u64 {
        let header = u64::from(PIXEL_DATA_OFFSET);
        match self {
            FileSizeField::Legacy => {
                let n = u64::from(width) * u64::from(height);
                header
                    .saturating_add(n.saturating_mul(BYTES_PER_PIXEL))
                    .saturating_add(u64::from(width % 4).saturating_mul(n))
            }
            FileSizeField::Exact => header.saturating_add(pixel_plane_size(width, height)),
        }
    }
}
