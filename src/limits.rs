//! Caps on what a decoded header may ask the decoder to hold in memory.

use alloc::format;
use alloc::string::String;

use crate::error::DecodeError;
use crate::header::InfoHeader;
use crate::pixel::Pixel;

/// Caps applied to the info header before the pixel plane is read.
///
/// `None` means unbounded. Width and height are in pixels, like the header
/// fields; `max_memory_bytes` bounds the in-memory pixel store
/// (`width * height * 3`), not the file on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_pixels: Option<u64>,
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Bytes of pixel store `info` describes, or the first cap it breaks.
    ///
    /// A store that cannot be addressed on this platform is
    /// `DimensionsTooLarge` even when no cap is set.
    pub(crate) fn pixel_store_bytes(&self, info: &InfoHeader) -> Result<usize, DecodeError> {
        let width = info.width_px.unsigned_abs();
        let height = info.height_px.unsigned_abs();

        if let Some(cap) = self.max_width.filter(|&cap| width > cap) {
            return Err(exceeded(format!("width {width} exceeds limit {cap}")));
        }
        if let Some(cap) = self.max_height.filter(|&cap| height > cap) {
            return Err(exceeded(format!("height {height} exceeds limit {cap}")));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(cap) = self.max_pixels.filter(|&cap| pixels > cap) {
            return Err(exceeded(format!("{pixels} pixels exceed limit {cap}")));
        }

        let bytes = pixels
            .checked_mul(core::mem::size_of::<Pixel>() as u64)
            .filter(|&b| usize::try_from(b).is_ok())
            .ok_or(DecodeError::DimensionsTooLarge { width, height })?;
        if let Some(cap) = self.max_memory_bytes.filter(|&cap| bytes > cap) {
            return Err(exceeded(format!(
                "pixel store of {bytes} bytes exceeds limit {cap}"
            )));
        }
        Ok(bytes as usize)
    }
}

fn exceeded(msg: String) -> DecodeError {
    DecodeError::LimitExceeded(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(width: u32, height: u32) -> InfoHeader {
        InfoHeader::synthesize(width, height)
    }

    #[test]
    fn unbounded_reports_store_size() {
        let limits = Limits::default();
        assert_eq!(limits.pixel_store_bytes(&info(4, 3)).unwrap(), 36);
        assert_eq!(limits.pixel_store_bytes(&info(1, 1)).unwrap(), 3);
    }

    #[test]
    fn pixel_cap() {
        let limits = Limits {
            max_pixels: Some(12),
            ..Default::default()
        };
        assert!(limits.pixel_store_bytes(&info(4, 3)).is_ok());
        assert!(matches!(
            limits.pixel_store_bytes(&info(4, 4)),
            Err(DecodeError::LimitExceeded(_))
        ));
    }

    #[test]
    fn width_and_height_caps() {
        let limits = Limits {
            max_width: Some(10),
            max_height: Some(5),
            ..Default::default()
        };
        assert!(limits.pixel_store_bytes(&info(11, 1)).is_err());
        assert!(limits.pixel_store_bytes(&info(1, 6)).is_err());
        assert!(limits.pixel_store_bytes(&info(10, 5)).is_ok());
    }

    #[test]
    fn memory_cap_counts_three_bytes_per_pixel() {
        let limits = Limits {
            max_memory_bytes: Some(300),
            ..Default::default()
        };
        assert_eq!(limits.pixel_store_bytes(&info(10, 10)).unwrap(), 300);
        let err = limits.pixel_store_bytes(&info(10, 11)).unwrap_err();
        assert!(err.to_string().contains("330"), "{err}");
    }

    #[test]
    fn dimension_caps_reported_before_memory() {
        let limits = Limits {
            max_width: Some(2),
            max_memory_bytes: Some(1),
            ..Default::default()
        };
        let err = limits.pixel_store_bytes(&info(3, 1)).unwrap_err();
        assert!(err.to_string().contains("width 3"), "{err}");
    }
}
