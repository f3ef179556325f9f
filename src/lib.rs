//! # squish_blocks
//!
//! DXT1/3/5 (S3TC, also known as BC1-3) texture block compression on the CPU.
//!
//! Every 4x4 tile of an RGBA8 image is reduced to a palette of two 5:6:5
//! endpoints plus interpolated colours and packed into a fixed size block.
//! DXT3 and DXT5 add an alpha sub-block in front of the colour block.
//!
//! ## Supported formats
//!
//!  * DXT1 (BC1): 8 bytes per block, optional 1-bit transparency
//!  * DXT3 (BC2): 16 bytes per block, explicit 4-bit alpha
//!  * DXT5 (BC3): 16 bytes per block, interpolated alpha
//!
//! ## Example
//!
//! ```
//! use squish_blocks::{encode::compress_rgba8, decode::decompress_rgba8, Format, Settings};
//!
//! let (width, height) = (17, 9);
//! let rgba = vec![200u8; (width * height * 4) as usize];
//! let format = Format::Dxt5;
//!
//! let mut blocks = vec![0u8; format.blocks_byte_size(width, height)];
//! compress_rgba8(format, &rgba, &mut blocks, width, height, width * 4, &Settings::default())?;
//!
//! let mut decoded = vec![0u8; rgba.len()];
//! decompress_rgba8(format, &blocks, &mut decoded, width, height, width * 4)?;
//! # Ok::<(), squish_blocks::Error>(())
//! ```
//!
//! ## Features
//!
//!  * `rayon` (default): compresses block rows of large images in parallel.
//!    The output is identical to the serial path.

mod block_window;
pub mod decode;
pub mod encode;
mod error;
mod math;
mod settings;

pub use block_window::{BlockWindow, CompressedBlock, Tile};
pub use error::{Error, Result};
pub use settings::{ColourFitMethod, ColourMetric, Settings};

/// Block compression formats supported by this crate.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Format {
    /// DXT1 / BC1 (RGB with optional 1-bit alpha)
    Dxt1,
    /// DXT3 / BC2 with explicit alpha (RGBA)
    Dxt3,
    /// DXT5 / BC3 with interpolated alpha (RGBA)
    Dxt5,
}

impl Format {
    /// Returns the bytes per row for the given width.
    ///
    /// The width is used to calculate how many blocks are needed per row,
    /// which is then multiplied by the block size.
    /// Width is rounded up to the nearest multiple of 4.
    pub const fn bytes_per_row(self, width: u32) -> u32 {
        let blocks_per_row = width.div_ceil(4);
        blocks_per_row * self.block_byte_size()
    }

    /// Returns the byte size required for storing compressed blocks for the given dimensions.
    ///
    /// Width and height are rounded up to the nearest multiple of 4.
    pub const fn blocks_byte_size(self, width: u32, height: u32) -> usize {
        let block_width = (width as usize).div_ceil(4);
        let block_height = (height as usize).div_ceil(4);
        let block_count = block_width * block_height;
        let block_size = self.block_byte_size() as usize;
        block_count * block_size
    }

    /// Size of one compressed block in bytes.
    pub const fn block_byte_size(self) -> u32 {
        match self {
            Format::Dxt1 => 8,
            Format::Dxt3 | Format::Dxt5 => 16,
        }
    }

    /// Byte offset of the colour sub-block inside a block.
    pub(crate) const fn colour_offset(self) -> usize {
        match self {
            Format::Dxt1 => 0,
            Format::Dxt3 | Format::Dxt5 => 8,
        }
    }

    pub(crate) const fn is_dxt1(self) -> bool {
        matches!(self, Format::Dxt1)
    }
}
