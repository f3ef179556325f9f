//! CPU based encoding.

pub(crate) mod alpha;
pub(crate) mod colour_block;
pub(crate) mod colour_set;
pub(crate) mod fit;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{BlockWindow, CompressedBlock, Error, Format, Result, Settings, Tile};

/// Compresses a single 4x4 tile of RGBA8 data.
///
/// Only the pixels whose bit is set in `mask` (bit `4 * y + x`) take part in
/// the fit. Use [`Tile::FULL_MASK`] for tiles that lie completely inside the
/// image.
///
/// # Example
/// ```
/// use squish_blocks::{encode::compress_tile, Format, Settings, Tile};
///
/// let rgba = [128u8; 64];
/// let block = compress_tile(Format::Dxt1, &rgba, Tile::FULL_MASK, &Settings::default())?;
/// assert_eq!(block.as_bytes().len(), 8);
/// # Ok::<(), squish_blocks::Error>(())
/// ```
pub fn compress_tile(
    format: Format,
    rgba: &[u8; 64],
    mask: u16,
    settings: &Settings,
) -> Result<CompressedBlock> {
    let mut block = CompressedBlock::zeroed(format);
    let tile = Tile::new(*rgba, mask);

    BlockWindow::new(block.as_bytes_mut(), format).compress_masked(&tile, settings)?;

    Ok(block)
}

/// Compresses raw RGBA8 data into DXT1, DXT3 or DXT5 blocks.
///
/// # Data Layout Requirements
/// The input data must be in RGBA8 format (8 bits per channel, 32 bits per pixel). The data is
/// expected to be in row-major order, with optional stride for padding between rows.
/// The image does not need to be a multiple of 4 pixels wide or high, edge tiles only take the
/// pixels inside the image into account.
///
/// # Buffer Requirements
/// The destination buffer must have sufficient capacity to store the compressed blocks.
/// The required size can be calculated using [`Format::blocks_byte_size()`].
///
/// # Arguments
/// * `format` - The block compression format to use
/// * `rgba_data` - Source RGBA8 pixel data
/// * `blocks_buffer` - Destination buffer for the compressed blocks
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
/// * `stride` - Number of bytes per row in the source data (for padding).
///   Must be `width * 4` for tightly packed RGBA data.
/// * `settings` - Encoder settings
///
/// # Errors
/// All arguments are checked before anything is written. Fails if a dimension is zero, the
/// stride is shorter than a row, either buffer is too small or the settings are invalid.
///
/// # Example
/// ```
/// use squish_blocks::{encode::compress_rgba8, Format, Settings};
///
/// let rgba_data = vec![0u8; 256 * 256 * 4]; // Your RGBA data
/// let width = 256;
/// let height = 256;
/// let stride = width * 4; // Tightly packed rows
/// let format = Format::Dxt1;
///
/// let mut blocks_buffer = vec![0u8; format.blocks_byte_size(width, height)];
///
/// compress_rgba8(
///     format,
///     &rgba_data,
///     &mut blocks_buffer,
///     width,
///     height,
///     stride,
///     &Settings::default(),
/// )?;
/// # Ok::<(), squish_blocks::Error>(())
/// ```
pub fn compress_rgba8(
    format: Format,
    rgba_data: &[u8],
    blocks_buffer: &mut [u8],
    width: u32,
    height: u32,
    stride: u32,
    settings: &Settings,
) -> Result<()> {
    settings.validate()?;
    check_image(rgba_data.len(), width, height, stride)?;

    let required_size = format.blocks_byte_size(width, height);
    if blocks_buffer.len() < required_size {
        return Err(Error::BlockBufferTooSmall {
            needed: required_size,
            actual: blocks_buffer.len(),
        });
    }

    let (width, height, stride) = (width as usize, height as usize, stride as usize);
    let block_width = width.div_ceil(4);
    let block_height = height.div_ceil(4);
    let row_bytes = format.bytes_per_row(width as u32) as usize;
    let rows = &mut blocks_buffer[..required_size];

    let compress_row = |(block_y, row): (usize, &mut [u8])| -> Result<()> {
        let mut window = BlockWindow::new(row, format);
        for block_x in 0..block_width {
            let tile = Tile::load(rgba_data, width, height, stride, block_x, block_y);
            window.compress_unchecked(&tile, settings)?;
            window.advance();
        }
        Ok(())
    };

    let block_count = block_width * block_height;

    #[cfg(feature = "rayon")]
    if settings.parallel && block_count >= settings.parallel_block_threshold {
        tracing::debug!(?format, width, height, block_count, "compressing in parallel");
        return rows
            .par_chunks_mut(row_bytes)
            .enumerate()
            .try_for_each(compress_row);
    }

    let reason = serial_reason(settings, block_count);
    tracing::debug!(?format, width, height, block_count, reason, "compressing serially");
    rows.chunks_mut(row_bytes).enumerate().try_for_each(compress_row)
}

/// Why an image of `block_count` blocks is compressed on the calling thread.
fn serial_reason(settings: &Settings, block_count: usize) -> &'static str {
    if !cfg!(feature = "rayon") {
        "rayon feature disabled"
    } else if !settings.parallel {
        "parallel compression disabled"
    } else if block_count < settings.parallel_block_threshold {
        "below parallel block threshold"
    } else {
        "parallel compression unavailable"
    }
}

/// Checks the dimensions and the size of an RGBA8 image buffer.
pub(crate) fn check_image(len: usize, width: u32, height: u32, stride: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::ZeroDimension { width, height });
    }

    let row_bytes = width as usize * 4;
    let stride = stride as usize;
    if stride < row_bytes {
        return Err(Error::InvalidStride { stride, row_bytes });
    }

    let needed = stride * (height as usize - 1) + row_bytes;
    if len < needed {
        return Err(Error::PixelBufferTooSmall {
            needed,
            actual: len,
        });
    }

    Ok(())
}
