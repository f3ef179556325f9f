//! Bit packing of the 8 byte colour block shared by DXT1, DXT3 and DXT5.
//!
//! Layout:
//! - 2 bytes: color0 (RGB565, little-endian)
//! - 2 bytes: color1 (RGB565, little-endian)
//! - 4 bytes: 16 2-bit indices, row-major, least significant bits first

use crate::math::{float_to_int, Vec3};

const GRID: Vec3 = Vec3::new(31.0, 63.0, 31.0);
const HALF: Vec3 = Vec3::splat(0.5);

/// Clamps `colour` to `0.0..=1.0` and snaps it to the nearest 5:6:5 value.
#[inline]
pub(crate) fn snap_to_565(colour: Vec3) -> Vec3 {
    let colour = colour.clamp(Vec3::ZERO, Vec3::ONE);
    colour.multiply_add(GRID, HALF).truncate() * GRID.reciprocal()
}

/// Packs a `0.0..=1.0` colour into RGB565.
#[inline]
pub(crate) fn pack_565(colour: Vec3) -> u16 {
    let r = float_to_int(31.0 * colour.x(), 31) as u16;
    let g = float_to_int(63.0 * colour.y(), 63) as u16;
    let b = float_to_int(31.0 * colour.z(), 31) as u16;

    (r << 11) | (g << 5) | b
}

fn write_colour_block(a: u16, b: u16, indices: &[u8; 16], block: &mut [u8]) {
    block[0..2].copy_from_slice(&a.to_le_bytes());
    block[2..4].copy_from_slice(&b.to_le_bytes());

    let packed = indices
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &index)| acc | (u32::from(index & 0x03) << (2 * i)));
    block[4..8].copy_from_slice(&packed.to_le_bytes());
}

/// Writes a 3-colour block (`color0 <= color1`).
///
/// Indices: 0 = start, 1 = end, 2 = midpoint, 3 = transparent black.
pub(crate) fn write_colour_block3(start: Vec3, end: Vec3, indices: &[u8; 16], block: &mut [u8]) {
    let mut a = pack_565(start);
    let mut b = pack_565(end);

    let mut remapped = *indices;
    if a > b {
        std::mem::swap(&mut a, &mut b);
        for index in remapped.iter_mut() {
            *index = match *index {
                0 => 1,
                1 => 0,
                other => other,
            };
        }
    }

    write_colour_block(a, b, &remapped, block);
}

/// Writes a 4-colour block (`color0 > color1`).
///
/// Indices: 0 = start, 1 = end, 2 = 2/3 start + 1/3 end, 3 = 1/3 start + 2/3 end.
pub(crate) fn write_colour_block4(start: Vec3, end: Vec3, indices: &[u8; 16], block: &mut [u8]) {
    let mut a = pack_565(start);
    let mut b = pack_565(end);

    let mut remapped = *indices;
    if a < b {
        std::mem::swap(&mut a, &mut b);
        for index in remapped.iter_mut() {
            *index ^= 0x01;
        }
    } else if a == b {
        // a single colour, only index 0 decodes to it in every mode
        remapped = [0; 16];
    }

    write_colour_block(a, b, &remapped, block);
}
