//! Pixel-plane encoder: canonical 54-byte headers, then bottom-up BGR rows.

use alloc::vec::Vec;
use std::io::Write;

use enough::Stop;
use log::debug;

use crate::bitmap::Bitmap;
use crate::error::EncodeError;
use crate::header::{self, FileHeader, FileSizeField, InfoHeader};

/// Encode settings.
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest {
    file_size_field: FileSizeField,
}

impl EncodeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how the file-size header field is computed. Pixel bytes are
    /// the same either way.
    pub fn with_file_size_field(mut self, rule: FileSizeField) -> Self {
        self.file_size_field = rule;
        self
    }

    /// Headers as they will be written for `bitmap`.
    ///
    /// Built from the pixel store alone: every other field takes its
    /// default, whatever the bitmap's own headers say. Two bitmaps with the
    /// same pixels encode to the same bytes.
    pub fn headers_for(&self, bitmap: &Bitmap) -> Result<(FileHeader, InfoHeader), EncodeError> {
        if bitmap.is_empty() {
            return Err(EncodeError::EmptyPixelData);
        }
        let (width, height) = (bitmap.width(), bitmap.height());
        let too_large = EncodeError::DimensionsTooLarge { width, height };
        let file_size = u32::try_from(self.file_size_field.value(width, height))
            .map_err(|_| too_large)?;
        Ok((
            FileHeader::synthesize(file_size),
            InfoHeader::synthesize(width, height),
        ))
    }

    /// Write `bitmap` to `writer`, flushing it at the end.
    ///
    /// Not transactional: on error the sink may hold a partial image.
    pub fn encode<W: Write>(
        &self,
        bitmap: &Bitmap,
        mut writer: W,
        stop: impl Stop,
    ) -> Result<(), EncodeError> {
        let (file_header, info_header) = self.headers_for(bitmap)?;
        stop.check()?;

        let width = bitmap.width();
        let padding = header::row_padding(width);
        debug!(
            "encoding {width}x{} bmp, {padding} padding bytes per row, size field {}",
            bitmap.height(),
            file_header.file_size_bytes
        );

        file_header.write_to(&mut writer)?;
        info_header.write_to(&mut writer)?;

        let filler = [0u8; 3];
        let mut row_buf = Vec::with_capacity(width as usize * 3 + padding);
        for (i, row) in bitmap.rows().rev().enumerate() {
            if i % 16 == 0 {
                stop.check()?;
            }
            row_buf.clear();
            for p in row {
                row_buf.extend_from_slice(&p.to_bytes());
            }
            row_buf.extend_from_slice(&filler[..padding]);
            writer.write_all(&row_buf)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn encode_to_vec(&self, bitmap: &Bitmap, stop: impl Stop) -> Result<Vec<u8>, EncodeError> {
        let capacity = header::PIXEL_DATA_OFFSET as usize
            + header::pixel_plane_size(bitmap.width(), bitmap.height()) as usize;
        let mut out = Vec::with_capacity(capacity);
        self.encode(bitmap, &mut out, stop)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use enough::Unstoppable;

    fn gradient(w: u32, h: u32) -> Bitmap {
        let rows: Vec<Vec<Pixel>> = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| Pixel::from_rgb(x as u8, y as u8, (x + y) as u8))
                    .collect()
            })
            .collect();
        Bitmap::from_matrix(rows).unwrap()
    }

    #[test]
    fn total_length_is_headers_plus_padded_rows() {
        for (w, h) in [(1, 1), (2, 3), (3, 2), (4, 4), (5, 7)] {
            let out = EncodeRequest::new()
                .encode_to_vec(&gradient(w, h), Unstoppable)
                .unwrap();
            let stride = w as usize * 3 + (w % 4) as usize;
            assert_eq!(out.len(), 54 + h as usize * stride, "{w}x{h}");
        }
    }

    #[test]
    fn bottom_row_written_first_in_bgr() {
        let bmp = gradient(1, 2);
        let out = EncodeRequest::new().encode_to_vec(&bmp, Unstoppable).unwrap();
        // visual bottom (y = 1): r=0 g=1 b=1, then 1 pad byte
        assert_eq!(&out[54..58], &[1, 1, 0, 0]);
        // visual top (y = 0): all zero
        assert_eq!(&out[58..62], &[0, 0, 0, 0]);
    }

    #[test]
    fn padding_bytes_are_zero() {
        let mut bmp = gradient(3, 1);
        for x in 0..3 {
            *bmp.at(x, 0).unwrap() = Pixel::gray(0xFF);
        }
        let out = EncodeRequest::new().encode_to_vec(&bmp, Unstoppable).unwrap();
        assert_eq!(&out[54..63], &[0xFF; 9]);
        assert_eq!(&out[63..66], &[0, 0, 0]);
    }

    #[test]
    fn size_field_follows_rule() {
        let bmp = gradient(3, 2);
        let legacy = EncodeRequest::new().encode_to_vec(&bmp, Unstoppable).unwrap();
        assert_eq!(&legacy[2..6], &90u32.to_le_bytes());
        assert_eq!(legacy.len(), 78);

        let exact = EncodeRequest::new()
            .with_file_size_field(FileSizeField::Exact)
            .encode_to_vec(&bmp, Unstoppable)
            .unwrap();
        assert_eq!(&exact[2..6], &78u32.to_le_bytes());
        assert_eq!(&exact[6..], &legacy[6..]);
    }

    #[test]
    fn headers_as_read_are_not_written_back() {
        let mut file = EncodeRequest::new()
            .encode_to_vec(&gradient(2, 1), Unstoppable)
            .unwrap();
        file[34..38].copy_from_slice(&8u32.to_le_bytes());
        file[38..42].copy_from_slice(&2835i32.to_le_bytes());
        file[42..46].copy_from_slice(&2835i32.to_le_bytes());
        let mut decoded = crate::decode_bytes(&file).unwrap();
        assert_eq!(decoded.info_header().x_pixels_per_meter, 2835);

        let (_, info) = EncodeRequest::new().headers_for(&decoded).unwrap();
        assert_eq!(info, InfoHeader::synthesize(2, 1));

        decoded.rotate_right();
        assert_eq!(*decoded.info_header(), InfoHeader::synthesize(1, 2));
        let roi = decoded.crop(0, 1, 1, 1).unwrap();
        assert_eq!(*roi.info_header(), InfoHeader::synthesize(1, 1));
    }

    #[test]
    fn empty_bitmap_rejected() {
        let err = EncodeRequest::new()
            .encode_to_vec(&Bitmap::default(), Unstoppable)
            .unwrap_err();
        assert!(matches!(err, EncodeError::EmptyPixelData));
    }

    #[test]
    fn failing_sink_reports_io() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::StorageFull.into())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let err = EncodeRequest::new()
            .encode(&gradient(2, 2), Full, Unstoppable)
            .unwrap_err();
        assert!(matches!(err, EncodeError::IoFailure(_)));
    }
}
