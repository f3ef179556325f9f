//! CPU based decoding.

pub(crate) mod block;

use crate::{encode::check_image, BlockWindow, Error, Format, Result};

/// Decodes a single compressed block into 16 RGBA8 pixels in row-major order.
///
/// `block` must hold at least [`Format::block_byte_size()`] bytes, only the
/// first block is decoded.
pub fn decompress_block(format: Format, block: &[u8]) -> Result<[u8; 64]> {
    BlockWindow::new(block, format).decompress()
}

/// Decompresses DXT1, DXT3 or DXT5 blocks into RGBA8 data.
///
/// `rgba_data` receives the image in row-major order with `stride` bytes per
/// row. Pixels of edge blocks that lie outside the image are dropped and the
/// padding bytes of each row are left untouched.
///
/// # Errors
/// Fails before writing anything if a dimension is zero, the stride is
/// shorter than a row, or either buffer is too small.
pub fn decompress_rgba8(
    format: Format,
    blocks_buffer: &[u8],
    rgba_data: &mut [u8],
    width: u32,
    height: u32,
    stride: u32,
) -> Result<()> {
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

    let block_count = block_width * block_height;
    tracing::debug!(?format, width, height, block_count, "decompressing");

    let mut window = BlockWindow::new(blocks_buffer, format);

    for block_y in 0..block_height {
        for block_x in 0..block_width {
            let columns = (width - block_x * 4).min(4);
            let rows = (height - block_y * 4).min(4);
            let origin = block_y * 4 * stride + block_x * 16;

            if columns == 4 && rows == 4 {
                window.decompress_into(&mut rgba_data[origin..], stride)?;
            } else {
                let pixels = window.decompress()?;
                for y in 0..rows {
                    let offset = origin + y * stride;
                    rgba_data[offset..offset + columns * 4]
                        .copy_from_slice(&pixels[y * 16..y * 16 + columns * 4]);
                }
            }
            window.advance();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_block_needs_a_full_block() {
        assert_eq!(
            decompress_block(Format::Dxt5, &[0u8; 15]),
            Err(Error::BlockOutOfRange {
                offset: 0,
                needed: 16,
                actual: 15
            })
        );
        assert!(decompress_block(Format::Dxt1, &[0u8; 8]).is_ok());
    }

    #[test]
    fn test_edge_blocks_are_clipped() {
        // 5x5 image in DXT1: 2x2 blocks, solid red everywhere
        let red = [0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00];
        let blocks: Vec<u8> = red.iter().copied().cycle().take(32).collect();

        let stride = 24;
        let mut rgba = vec![0x11u8; stride * 5];
        decompress_rgba8(Format::Dxt1, &blocks, &mut rgba, 5, 5, stride as u32).unwrap();

        for row in rgba.chunks_exact(stride) {
            for pixel in row[..20].chunks_exact(4) {
                assert_eq!(pixel, &[0xFF, 0x00, 0x00, 0xFF]);
            }
            assert_eq!(&row[20..], &[0x11; 4]);
        }
    }

    #[test]
    fn test_interior_blocks_decode_with_row_stride() {
        // 8x4 image in DXT5: two full blocks written straight into padded rows
        let mut blocks = [0u8; 32];
        blocks[..16].copy_from_slice(&[
            0xFF, 0x00, 0x49, 0x92, 0x24, 0x49, 0x92, 0x24, 0x00, 0xF8, 0x1F, 0x00, 0x1B,
            0xE4, 0x1B, 0xE4,
        ]);
        blocks[16..].copy_from_slice(&[
            0x40, 0x80, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xE0, 0x07, 0xE0, 0x07, 0x00,
            0x00, 0x00, 0x00,
        ]);

        let stride = 40;
        let mut rgba = vec![0x5Au8; stride * 4];
        decompress_rgba8(Format::Dxt5, &blocks, &mut rgba, 8, 4, stride as u32).unwrap();

        let left = decompress_block(Format::Dxt5, &blocks[..16]).unwrap();
        let right = decompress_block(Format::Dxt5, &blocks[16..]).unwrap();
        for (y, row) in rgba.chunks_exact(stride).enumerate() {
            assert_eq!(&row[..16], &left[y * 16..y * 16 + 16]);
            assert_eq!(&row[16..32], &right[y * 16..y * 16 + 16]);
            assert_eq!(&row[32..], &[0x5A; 8]);
        }
    }

    #[test]
    fn test_rejects_short_pixel_buffer() {
        let blocks = [0u8; 8];
        let mut rgba = [0u8; 60];
        assert!(matches!(
            decompress_rgba8(Format::Dxt1, &blocks, &mut rgba, 4, 4, 16),
            Err(Error::PixelBufferTooSmall { .. })
        ));
    }
}
