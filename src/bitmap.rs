//! In-memory 24-bit image: a row-major pixel store plus the two headers.
//!
//! Row 0 is the visual top row. Pixels are kept in one flat `Vec`, so a
//! row is the slice `[y * width, (y + 1) * width)`.

use alloc::vec::Vec;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use enough::Unstoppable;

use crate::encode::EncodeRequest;
use crate::error::{AccessError, ConstructionError, DecodeError, EncodeError};
use crate::header::{FileHeader, FileSizeField, InfoHeader};
use crate::pixel::Pixel;

/// A decoded or constructed 24-bit image.
///
/// The default value is the empty bitmap: zero dimensions, no pixels,
/// zeroed headers. It cannot be encoded.
#[derive(Clone, Debug, Default)]
pub struct Bitmap {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
    file_header: FileHeader,
    info_header: InfoHeader,
}

impl Bitmap {
    /// Build from a matrix of rows, taking ownership of it.
    ///
    /// Every row must have the same, nonzero length.
    pub fn from_matrix(matrix: Vec<Vec<Pixel>>) -> Result<Self, ConstructionError> {
        let (width, height) = check_shape(&matrix)?;
        let pixels = matrix.into_iter().flatten().collect();
        Ok(Self::from_parts(pixels, width, height))
    }

    /// Build from borrowed rows, copying them. The caller keeps its matrix.
    pub fn from_rows<R: AsRef<[Pixel]>>(rows: &[R]) -> Result<Self, ConstructionError> {
        let (width, height) = check_shape(rows)?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in rows {
            pixels.extend_from_slice(row.as_ref());
        }
        Ok(Self::from_parts(pixels, width, height))
    }

    /// Wrap an already shaped store and synthesize default headers.
    ///
    /// `pixels.len() == width * height` and both dimensions fit in `i32`.
    pub(crate) fn from_parts(pixels: Vec<Pixel>, width: u32, height: u32) -> Self {
        let file_size = FileSizeField::Legacy.value(width, height);
        Self {
            pixels,
            width,
            height,
            file_header: FileHeader::synthesize(u32::try_from(file_size).unwrap_or(u32::MAX)),
            info_header: InfoHeader::synthesize(width, height),
        }
    }

    /// Wrap a store read from a stream, keeping the headers as read.
    pub(crate) fn from_decoded(
        pixels: Vec<Pixel>,
        file_header: FileHeader,
        info_header: InfoHeader,
    ) -> Self {
        Self {
            pixels,
            width: info_header.width_px as u32,
            height: info_header.height_px as u32,
            file_header,
            info_header,
        }
    }

    /// Read a BMP file. The file is closed before this returns.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let file = File::open(path).map_err(DecodeError::Io)?;
        crate::decode(BufReader::new(file))
    }

    /// Write a BMP file with default encode settings.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        self.save_with(path, &EncodeRequest::new())
    }

    /// Write a BMP file. The file is closed before this returns; on error
    /// it may hold a partial image.
    pub fn save_with(
        &self,
        path: impl AsRef<Path>,
        request: &EncodeRequest,
    ) -> Result<(), EncodeError> {
        if self.is_empty() {
            return Err(EncodeError::EmptyPixelData);
        }
        let mut out = BufWriter::new(File::create(path)?);
        request.encode(self, &mut out, Unstoppable)?;
        out.flush()?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The file-size header field: as read for decoded bitmaps, the legacy
    /// formula for constructed ones.
    pub fn file_size_bytes(&self) -> u32 {
        self.file_header.file_size_bytes
    }

    /// Bytes of pixel data without row padding (`width * height * 3`).
    pub fn data_size(&self) -> usize {
        self.pixels.len() * 3
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    pub fn info_header(&self) -> &InfoHeader {
        &self.info_header
    }

    /// All pixels, top row first.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> + '_ {
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    /// Mutable access to the pixel at column `x`, row `y` (row 0 on top).
    pub fn at(&mut self, x: u32, y: u32) -> Result<&mut Pixel, AccessError> {
        let idx = self.index(x, y)?;
        Ok(&mut self.pixels[idx])
    }

    /// Shared access to the pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Result<&Pixel, AccessError> {
        let idx = self.index(x, y)?;
        Ok(&self.pixels[idx])
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, AccessError> {
        if x >= self.width || y >= self.height {
            return Err(AccessError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Replace every channel with the truncated mean of the three.
    pub fn grayscale(&mut self) {
        for p in &mut self.pixels {
            *p = Pixel::gray(p.luma_mean());
        }
    }

    /// Left-right flip: reverse the pixel order inside each row.
    pub fn mirror_horizontal(&mut self) {
        let w = self.width.max(1) as usize;
        for row in self.pixels.chunks_exact_mut(w) {
            row.reverse();
        }
    }

    /// Top-bottom flip: reverse the row order.
    pub fn flip_vertical(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.pixels.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Half-turn: reverse the whole pixel sequence.
    pub fn rotate_180(&mut self) {
        self.pixels.reverse();
    }

    /// Quarter turn clockwise. Width and height swap.
    pub fn rotate_right(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut out = Vec::with_capacity(self.pixels.len());
        for y in 0..w {
            for x in 0..h {
                out.push(self.pixels[(h - 1 - x) * w + y]);
            }
        }
        self.reshape(out, self.height, self.width);
    }

    /// Quarter turn counter-clockwise. Width and height swap.
    pub fn rotate_left(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut out = Vec::with_capacity(self.pixels.len());
        for y in 0..w {
            for x in 0..h {
                out.push(self.pixels[x * w + (w - 1 - y)]);
            }
        }
        self.reshape(out, self.height, self.width);
    }

    /// Copy out the `width` x `height` region whose top-left corner is
    /// (`x`, `y`). The region must be nonempty and lie inside the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Bitmap, AccessError> {
        let fits = width > 0
            && height > 0
            && x.checked_add(width).is_some_and(|r| r <= self.width)
            && y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(AccessError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in self.rows().skip(y as usize).take(height as usize) {
            pixels.extend_from_slice(&row[x as usize..(x + width) as usize]);
        }
        Ok(Bitmap::from_parts(pixels, width, height))
    }

    /// Swap in a store of a new shape with fresh headers.
    fn reshape(&mut self, pixels: Vec<Pixel>, width: u32, height: u32) {
        *self = Bitmap::from_parts(pixels, width, height);
    }
}

/// Equal when both shape and pixels match; headers are not compared.
impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl Eq for Bitmap {}

fn check_shape<R: AsRef<[Pixel]>>(rows: &[R]) -> Result<(u32, u32), ConstructionError> {
    let width = rows.first().map_or(0, |r| r.as_ref().len());
    let height = rows.len();
    if width == 0 {
        return Err(ConstructionError::EmptyMatrix);
    }
    if let Some((row, r)) = rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.as_ref().len() != width)
    {
        return Err(ConstructionError::RaggedMatrix {
            row,
            expected: width,
            actual: r.as_ref().len(),
        });
    }

    let too_large = ConstructionError::DimensionsTooLarge { width, height };
    let w = i32::try_from(width).map_err(|_| too_large.clone())? as u32;
    let h = i32::try_from(height).map_err(|_| too_large.clone())? as u32;
    if FileSizeField::Legacy.value(w, h) > u64::from(u32::MAX) {
        return Err(too_large);
    }
    Ok((w, h))
}

#[cfg(feature = "imgref")]
impl Bitmap {
    /// Borrowed 2D view of the store. `None` for the empty bitmap.
    pub fn as_imgref(&self) -> Option<imgref::ImgRef<'_, Pixel>> {
        if self.is_empty() {
            return None;
        }
        Some(imgref::ImgRef::new(
            &self.pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Owned 2D copy of the store. `None` for the empty bitmap.
    pub fn to_imgvec(&self) -> Option<imgref::ImgVec<Pixel>> {
        if self.is_empty() {
            return None;
        }
        Some(imgref::ImgVec::new(
            self.pixels.clone(),
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Copy a 2D view (any stride) into a new bitmap.
    pub fn from_imgref(img: imgref::ImgRef<'_, Pixel>) -> Result<Self, ConstructionError> {
        let rows: Vec<&[Pixel]> = img.rows().collect();
        Self::from_rows(&rows)
    }
}
