use crate::{
    decode::block::{decode_block_dxt1, decode_block_dxt3, decode_block_dxt5},
    encode::{
        alpha::{compress_alpha_dxt3, compress_alpha_dxt5},
        colour_block,
        colour_set::ColourSet,
        fit::{fit_colours, Codebook, FitResult},
    },
    math::Vec3,
    Error, Format, Result, Settings,
};

/// A 4x4 tile of RGBA8 pixels in row-major order with its coverage mask.
///
/// Bit `4 * y + x` of the mask is set when pixel `(x, y)` lies inside the
/// image. Pixels outside the mask never influence the compressed block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pixels: [[u8; 4]; 16],
    mask: u16,
}

impl Tile {
    /// Mask covering all 16 pixels.
    pub const FULL_MASK: u16 = 0xFFFF;

    /// Creates a tile from 64 bytes of RGBA8 data.
    pub fn new(rgba: [u8; 64], mask: u16) -> Self {
        Self {
            pixels: bytemuck::cast(rgba),
            mask,
        }
    }

    /// Creates a tile from 16 RGBA8 pixels.
    pub const fn from_pixels(pixels: [[u8; 4]; 16], mask: u16) -> Self {
        Self { pixels, mask }
    }

    /// Loads the tile at block position (`block_x`, `block_y`) of an RGBA8
    /// image with `stride` bytes per row.
    ///
    /// Pixels past the right or bottom edge stay zero and are left out of
    /// the mask. The caller guarantees that `rgba_data` holds the image.
    pub(crate) fn load(
        rgba_data: &[u8],
        width: usize,
        height: usize,
        stride: usize,
        block_x: usize,
        block_y: usize,
    ) -> Self {
        let mut tile = Self::from_pixels([[0; 4]; 16], 0);

        for y in 0..4 {
            let pixel_y = block_y * 4 + y;
            if pixel_y >= height {
                break;
            }

            for x in 0..4 {
                let pixel_x = block_x * 4 + x;
                if pixel_x >= width {
                    break;
                }

                let offset = pixel_y * stride + pixel_x * 4;
                tile.pixels[y * 4 + x].copy_from_slice(&rgba_data[offset..offset + 4]);
                tile.mask |= 1 << (y * 4 + x);
            }
        }

        tile
    }

    /// The 16 pixels in row-major order.
    pub const fn pixels(&self) -> &[[u8; 4]; 16] {
        &self.pixels
    }

    /// The pixels as 64 bytes of RGBA8 data.
    pub fn as_bytes(&self) -> &[u8; 64] {
        bytemuck::cast_ref(&self.pixels)
    }

    /// The coverage mask.
    pub const fn mask(&self) -> u16 {
        self.mask
    }
}

/// A single compressed block of 8 (DXT1) or 16 (DXT3, DXT5) bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompressedBlock {
    bytes: [u8; 16],
    format: Format,
}

impl CompressedBlock {
    pub(crate) const fn zeroed(format: Format) -> Self {
        Self {
            bytes: [0; 16],
            format,
        }
    }

    /// The format the block was compressed with.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// The block bytes as stored in a texture.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.format.block_byte_size() as usize]
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.format.block_byte_size() as usize]
    }
}

impl AsRef<[u8]> for CompressedBlock {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// A cursor over a buffer of consecutive compressed blocks.
///
/// The window addresses one block at a time. Reads and writes fail with
/// [`Error::BlockOutOfRange`] when the current block does not fit into the
/// buffer.
#[derive(Debug)]
pub struct BlockWindow<B> {
    buffer: B,
    offset: usize,
    format: Format,
}

impl<B> BlockWindow<B> {
    /// Creates a window positioned on the first block of `buffer`.
    pub const fn new(buffer: B, format: Format) -> Self {
        Self {
            buffer,
            offset: 0,
            format,
        }
    }

    /// Byte offset of the current block.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Format of the blocks in the buffer.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Moves to the next block.
    ///
    /// The offset saturates, a cursor moved past `usize::MAX` stays out of
    /// range.
    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.format.block_byte_size() as usize);
    }

    /// Moves to the block with the given index.
    pub fn seek(&mut self, block_index: usize) {
        self.offset = block_index.saturating_mul(self.format.block_byte_size() as usize);
    }

    /// Returns the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buffer
    }

    fn out_of_range(&self, actual: usize) -> Error {
        Error::BlockOutOfRange {
            offset: self.offset,
            needed: self.format.block_byte_size() as usize,
            actual,
        }
    }
}

impl<B: AsRef<[u8]>> BlockWindow<B> {
    fn block(&self) -> Result<&[u8]> {
        let buffer = self.buffer.as_ref();
        let size = self.format.block_byte_size() as usize;

        self.offset
            .checked_add(size)
            .and_then(|end| buffer.get(self.offset..end))
            .ok_or_else(|| self.out_of_range(buffer.len()))
    }

    /// Decodes the current block into 16 RGBA8 pixels.
    ///
    /// DXT1 blocks with `color0 <= color1` decode index 3 as transparent
    /// black, every other pixel gets an alpha of 255 unless the format
    /// carries an alpha sub-block.
    pub fn decompress(&self) -> Result<[u8; 64]> {
        let mut rgba = [0u8; 64];
        self.decompress_into(&mut rgba, 16)?;
        Ok(rgba)
    }

    /// Decodes the current block straight into an RGBA8 image with `pitch`
    /// bytes per row. `rgba` must hold `3 * pitch + 16` bytes.
    pub(crate) fn decompress_into(&self, rgba: &mut [u8], pitch: usize) -> Result<()> {
        let block = self.block()?;

        match self.format {
            Format::Dxt1 => decode_block_dxt1(block, rgba, pitch),
            Format::Dxt3 => decode_block_dxt3(block, rgba, pitch),
            Format::Dxt5 => decode_block_dxt5(block, rgba, pitch),
        }

        Ok(())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BlockWindow<B> {
    fn block_mut(&mut self) -> Result<&mut [u8]> {
        let size = self.format.block_byte_size() as usize;
        let offset = self.offset;
        let error = self.out_of_range(self.buffer.as_ref().len());
        let buffer = self.buffer.as_mut();

        offset
            .checked_add(size)
            .and_then(|end| buffer.get_mut(offset..end))
            .ok_or(error)
    }

    fn colour_block_mut(&mut self) -> Result<&mut [u8]> {
        let colour_offset = self.format.colour_offset();
        Ok(&mut self.block_mut()?[colour_offset..])
    }

    /// Compresses `tile` into the current block, taking only the pixels
    /// selected by its mask into account.
    pub fn compress_masked(&mut self, tile: &Tile, settings: &Settings) -> Result<()> {
        settings.validate()?;
        self.compress_unchecked(tile, settings)
    }

    /// [`BlockWindow::compress_masked`] for already validated settings.
    pub(crate) fn compress_unchecked(&mut self, tile: &Tile, settings: &Settings) -> Result<()> {
        let format = self.format;
        let block = self.block_mut()?;

        match format {
            Format::Dxt1 => {}
            Format::Dxt3 => compress_alpha_dxt3(tile.pixels(), tile.mask(), &mut block[..8]),
            Format::Dxt5 => compress_alpha_dxt5(tile.pixels(), tile.mask(), &mut block[..8]),
        }

        let colours = ColourSet::new(tile.pixels(), tile.mask(), format.is_dxt1(), settings);
        let fit = fit_colours(&colours, format.is_dxt1(), settings);
        self.write_fit(&fit)
    }

    fn write_fit(&mut self, fit: &FitResult) -> Result<()> {
        match fit.codebook {
            Codebook::Three => self.write_colour_block3(fit.start, fit.end, &fit.indices),
            Codebook::Four => self.write_colour_block4(fit.start, fit.end, &fit.indices),
        }
    }

    /// Writes a three colour block with `color0 <= color1`.
    pub(crate) fn write_colour_block3(
        &mut self,
        start: Vec3,
        end: Vec3,
        indices: &[u8; 16],
    ) -> Result<()> {
        let block = self.colour_block_mut()?;
        colour_block::write_colour_block3(start, end, indices, block);
        Ok(())
    }

    /// Writes a four colour block with `color0 > color1`.
    pub(crate) fn write_colour_block4(
        &mut self,
        start: Vec3,
        end: Vec3,
        indices: &[u8; 16],
    ) -> Result<()> {
        let block = self.colour_block_mut()?;
        colour_block::write_colour_block4(start, end, indices, block);
        Ok(())
    }
}
