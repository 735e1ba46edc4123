use alloc::string::String;
use enough::StopReason;

/// Errors from reading a BMP stream.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("bad signature: expected \"BM\", got {0:#06x}")]
    BadSignature(u16),

    #[error("unsupported pixel format: {0} bits per pixel (only 24 is supported)")]
    UnsupportedPixelFormat(u16),

    #[error("unsupported compression method {0} (only BI_RGB is supported)")]
    UnsupportedCompression(u32),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of stream")]
    TruncatedStream,

    #[error("i/o error")]
    Io(#[source] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            DecodeError::TruncatedStream
        } else {
            DecodeError::Io(e)
        }
    }
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}

/// Errors from writing a BMP stream.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("bitmap has no pixel data")]
    EmptyPixelData,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("i/o error")]
    IoFailure(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for EncodeError {
    fn from(r: StopReason) -> Self {
        EncodeError::Cancelled(r)
    }
}

/// Errors from building a [`crate::Bitmap`] out of a pixel matrix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConstructionError {
    #[error("pixel matrix is empty")]
    EmptyMatrix,

    #[error("row {row} has {actual} pixels, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: usize, height: usize },
}

/// Errors from pixel and region access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AccessError {
    #[error("pixel position ({x}, {y}) outside {width}x{height} image")]
    OutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
