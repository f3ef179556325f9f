use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported for malformed arguments.
///
/// Every check happens before any output is written, so a failed call never
/// leaves partially written blocks or pixels behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The width or height of the image is zero.
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The RGBA8 pixel buffer cannot hold `height` rows of `stride` bytes.
    #[error("Pixel buffer too small: need {needed} bytes, but only {actual} bytes available")]
    PixelBufferTooSmall {
        /// The required size in bytes.
        needed: usize,
        /// The actual size in bytes.
        actual: usize,
    },

    /// The row stride is shorter than one row of pixels.
    #[error("Row stride of {stride} bytes is shorter than a row of {row_bytes} bytes")]
    InvalidStride {
        /// The given stride in bytes.
        stride: usize,
        /// Bytes needed by one row of pixels.
        row_bytes: usize,
    },

    /// The compressed buffer cannot hold every block of the image.
    #[error("Block buffer too small: need {needed} bytes, but only {actual} bytes available")]
    BlockBufferTooSmall {
        /// The required size in bytes.
        needed: usize,
        /// The actual size in bytes.
        actual: usize,
    },

    /// A block window points past the end of its buffer.
    #[error("Block at offset {offset} needs {needed} bytes, but the buffer holds only {actual}")]
    BlockOutOfRange {
        /// Byte offset of the block.
        offset: usize,
        /// Size of one block in bytes.
        needed: usize,
        /// Length of the buffer in bytes.
        actual: usize,
    },

    /// A [`crate::Settings`] field holds an unusable value.
    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSetting {
        /// Name of the offending field.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}
