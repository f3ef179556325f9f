//! Per-block decoders writing RGBA8 pixels with a caller given row pitch.
//!
//! 5:6:5 endpoints are widened to 8 bits by bit replication and the
//! interpolated palette entries are computed on the widened values with
//! truncating integer division.

/// Decodes a DXT1 block by reading 8 bytes from `compressed_block` and writing
/// the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes
/// per output row.
#[inline(always)]
pub(crate) fn decode_block_dxt1(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_colour_block::<false>(compressed_block, decompressed_block, destination_pitch);
}

/// Decodes a DXT3 block by reading 16 bytes from `compressed_block` and writing
/// the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes
/// per output row.
#[inline(always)]
pub(crate) fn decode_block_dxt3(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_colour_block::<true>(
        &compressed_block[8..],
        decompressed_block,
        destination_pitch,
    );
    decode_explicit_alpha_block(compressed_block, decompressed_block, destination_pitch);
}

/// Decodes a DXT5 block by reading 16 bytes from `compressed_block` and writing
/// the RGBA8 data into `decompressed_block` with `destination_pitch` many bytes
/// per output row.
#[inline(always)]
pub(crate) fn decode_block_dxt5(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    decode_colour_block::<true>(
        &compressed_block[8..],
        decompressed_block,
        destination_pitch,
    );
    decode_interpolated_alpha_block(compressed_block, decompressed_block, destination_pitch);
}

#[inline(always)]
fn unpack_565(packed: u16) -> [u32; 3] {
    let r = u32::from((packed >> 11) & 0x1F);
    let g = u32::from((packed >> 5) & 0x3F);
    let b = u32::from(packed & 0x1F);

    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

#[inline(always)]
fn mix(a: [u32; 3], a_weight: u32, b: [u32; 3], b_weight: u32) -> [u8; 4] {
    let total = a_weight + b_weight;
    let channel = |i: usize| ((a_weight * a[i] + b_weight * b[i]) / total) as u8;
    [channel(0), channel(1), channel(2), 0xFF]
}

/// Decompresses a DXT1 style colour block.
///
/// With `FOUR_COLOUR_ONLY` unset, `color0 <= color1` selects the three
/// colour palette whose fourth entry is transparent black.
#[inline(always)]
fn decode_colour_block<const FOUR_COLOUR_ONLY: bool>(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let c0 = u16::from_le_bytes([compressed_block[0], compressed_block[1]]);
    let c1 = u16::from_le_bytes([compressed_block[2], compressed_block[3]]);

    let a = unpack_565(c0);
    let b = unpack_565(c1);

    let mut palette = [[0u8; 4]; 4];
    palette[0] = mix(a, 1, b, 0);
    palette[1] = mix(a, 0, b, 1);

    if c0 > c1 || FOUR_COLOUR_ONLY {
        // color_2 = 2/3*color_0 + 1/3*color_1
        // color_3 = 1/3*color_0 + 2/3*color_1
        palette[2] = mix(a, 2, b, 1);
        palette[3] = mix(a, 1, b, 2);
    } else {
        // color_2 = 1/2*color_0 + 1/2*color_1
        // color_3 = transparent black
        palette[2] = mix(a, 1, b, 1);
        palette[3] = [0; 4];
    }

    let mut colour_indices = u32::from_le_bytes([
        compressed_block[4],
        compressed_block[5],
        compressed_block[6],
        compressed_block[7],
    ]);

    for i in 0..4 {
        for j in 0..4 {
            let colour = palette[(colour_indices & 0x03) as usize];
            decompressed_block[i * destination_pitch + j * 4..][..4].copy_from_slice(&colour);
            colour_indices >>= 2;
        }
    }
}

/// Decodes a DXT3 alpha block, 4 bits per pixel.
#[inline(always)]
fn decode_explicit_alpha_block(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    for i in 0..4 {
        for j in 0..4 {
            let byte_index = i * 2 + (j / 2);
            let shift = (j % 2) * 4;
            let alpha_value = (compressed_block[byte_index] >> shift) & 0x0F;
            decompressed_block[i * destination_pitch + j * 4 + 3] = alpha_value * 17;
        }
    }
}

/// Decodes a DXT5 alpha block, two endpoints and 3 bits per pixel.
#[inline(always)]
#[rustfmt::skip]
fn decode_interpolated_alpha_block(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&compressed_block[..8]);
    let block = u64::from_le_bytes(bytes);

    let alpha0 = u16::from(bytes[0]);
    let alpha1 = u16::from(bytes[1]);

    let mut alpha = [0u8; 8];
    alpha[0] = bytes[0];
    alpha[1] = bytes[1];

    if alpha0 > alpha1 {
        // 6 interpolated alpha values
        alpha[2] = ((6 * alpha0 +     alpha1) / 7) as u8;   // 6/7*alpha_0 + 1/7*alpha_1
        alpha[3] = ((5 * alpha0 + 2 * alpha1) / 7) as u8;   // 5/7*alpha_0 + 2/7*alpha_1
        alpha[4] = ((4 * alpha0 + 3 * alpha1) / 7) as u8;   // 4/7*alpha_0 + 3/7*alpha_1
        alpha[5] = ((3 * alpha0 + 4 * alpha1) / 7) as u8;   // 3/7*alpha_0 + 4/7*alpha_1
        alpha[6] = ((2 * alpha0 + 5 * alpha1) / 7) as u8;   // 2/7*alpha_0 + 5/7*alpha_1
        alpha[7] = ((    alpha0 + 6 * alpha1) / 7) as u8;   // 1/7*alpha_0 + 6/7*alpha_1
    } else {
        // 4 interpolated alpha values
        alpha[2] = ((4 * alpha0 +     alpha1) / 5) as u8;   // 4/5*alpha_0 + 1/5*alpha_1
        alpha[3] = ((3 * alpha0 + 2 * alpha1) / 5) as u8;   // 3/5*alpha_0 + 2/5*alpha_1
        alpha[4] = ((2 * alpha0 + 3 * alpha1) / 5) as u8;   // 2/5*alpha_0 + 3/5*alpha_1
        alpha[5] = ((    alpha0 + 4 * alpha1) / 5) as u8;   // 1/5*alpha_0 + 4/5*alpha_1
        alpha[6] = 0x00;
        alpha[7] = 0xFF;
    }

    let mut indices = block >> 16;

    for i in 0..4 {
        for j in 0..4 {
            let offset = i * destination_pitch + j * 4 + 3;
            decompressed_block[offset] = alpha[(indices & 0x07) as usize];
            indices >>= 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_block(
        decode_block: fn(&[u8], &mut [u8], usize),
        pitch: usize,
        compressed_block: &[u8],
        expected_output: &[u8],
        name: &str,
    ) {
        let mut decoded = [0u8; 64];
        decode_block(compressed_block, &mut decoded, pitch);

        for y in 0..4 {
            let start = y * pitch;
            let end = start + pitch;
            assert_eq!(
                &decoded[start..end],
                &expected_output[start..end],
                "{}: Mismatch at row {}",
                name,
                y
            );
        }
    }

    fn solid(pixel: [u8; 4]) -> [u8; 64] {
        let mut output = [0u8; 64];
        for chunk in output.chunks_exact_mut(4) {
            chunk.copy_from_slice(&pixel);
        }
        output
    }

    #[test]
    fn test_dxt1_block_black() {
        let compressed_block = [0u8; 8];
        test_block(
            decode_block_dxt1,
            16,
            &compressed_block,
            &solid([0x00, 0x00, 0x00, 0xFF]),
            "Black block",
        );
    }

    #[test]
    fn test_dxt1_block_red() {
        let compressed_block = [0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        test_block(
            decode_block_dxt1,
            16,
            &compressed_block,
            &solid([0xFF, 0x00, 0x00, 0xFF]),
            "Red block",
        );
    }

    #[test]
    fn test_dxt1_block_second_endpoint() {
        let compressed_block = [0x00, 0xF8, 0xE0, 0x07, 0x55, 0x55, 0x55, 0x55];
        test_block(
            decode_block_dxt1,
            16,
            &compressed_block,
            &solid([0x00, 0xFF, 0x00, 0xFF]),
            "Green block",
        );
    }

    #[test]
    fn test_dxt1_four_colour_interpolants() {
        // white > black, row of indices 0, 1, 2, 3
        let compressed_block = [0xFF, 0xFF, 0x00, 0x00, 0xE4, 0xE4, 0xE4, 0xE4];
        let mut decoded = [0u8; 64];
        decode_block_dxt1(&compressed_block, &mut decoded, 16);

        assert_eq!(
            &decoded[..16],
            &[
                0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0xFF, 0xAA, 0xAA, 0xAA, 0xFF, 0x55,
                0x55, 0x55, 0xFF,
            ]
        );
    }

    #[test]
    fn test_dxt1_three_colour_transparency() {
        // black <= white, row of indices 0, 1, 2, 3
        let compressed_block = [0x00, 0x00, 0xFF, 0xFF, 0xE4, 0xE4, 0xE4, 0xE4];
        let mut decoded = [0u8; 64];
        decode_block_dxt1(&compressed_block, &mut decoded, 16);

        assert_eq!(
            &decoded[..16],
            &[
                0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0x7F, 0x7F, 0xFF, 0x00,
                0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn test_dxt3_ignores_three_colour_mode() {
        let mut compressed_block = [0xFFu8; 16];
        compressed_block[8..].copy_from_slice(&[0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        let mut decoded = [0u8; 64];
        decode_block_dxt3(&compressed_block, &mut decoded, 16);

        // index 3 is 1/3 black + 2/3 white instead of transparent
        assert_eq!(solid([0xAA, 0xAA, 0xAA, 0xFF]), decoded);
    }

    #[test]
    fn test_dxt3_alpha_gradient() {
        let compressed_block = [
            0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let expected_output = [
            0xFF, 0x0, 0x0, 0x0, 0xFF, 0x0, 0x0, 0x11, 0xFF, 0x0, 0x0, 0x22, 0xFF, 0x0, 0x0, 0x33,
            0xFF, 0x0, 0x0, 0x44, 0xFF, 0x0, 0x0, 0x55, 0xFF, 0x0, 0x0, 0x66, 0xFF, 0x0, 0x0, 0x77,
            0xFF, 0x0, 0x0, 0x88, 0xFF, 0x0, 0x0, 0x99, 0xFF, 0x0, 0x0, 0xAA, 0xFF, 0x0, 0x0, 0xBB,
            0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0xDD, 0xFF, 0x0, 0x0, 0xEE, 0xFF, 0x0, 0x0, 0xFF,
        ];
        test_block(
            decode_block_dxt3,
            16,
            &compressed_block,
            &expected_output,
            "Alpha gradient",
        );
    }

    #[test]
    fn test_dxt3_alpha_half_transparent() {
        let compressed_block = [
            0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x77, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_dxt3,
            16,
            &compressed_block,
            &solid([0xFF, 0x00, 0x00, 0x77]),
            "Half transparent",
        );
    }

    #[test]
    fn test_dxt5_solid_black() {
        let compressed_block = [0u8; 16];
        test_block(
            decode_block_dxt5,
            16,
            &compressed_block,
            &[0u8; 64],
            "Solid black with zero alpha",
        );
    }

    #[test]
    fn test_dxt5_transparent_red() {
        let compressed_block = [
            0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        test_block(
            decode_block_dxt5,
            16,
            &compressed_block,
            &solid([0xFF, 0x00, 0x00, 0x00]),
            "Transparent red",
        );
    }

    #[test]
    fn test_dxt5_alpha_gradient() {
        let compressed_block = [
            0x00, 0xFF, 0xFF, 0xFF, 0x55, 0x55, 0x55, 0x55, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let expected_output = [
            0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0xFF,
            0xFF, 0x0, 0x0, 0xFF, 0xFF, 0x0, 0x0, 0x66, 0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33,
            0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33, 0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33,
            0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33, 0xFF, 0x0, 0x0, 0xCC, 0xFF, 0x0, 0x0, 0x33,
        ];
        test_block(
            decode_block_dxt5,
            16,
            &compressed_block,
            &expected_output,
            "Red with alpha gradient",
        );
    }

    #[test]
    fn test_dxt5_seven_value_codebook() {
        // alpha0 > alpha1, pixel 0 uses index 2, everything else index 0
        let compressed_block = [
            0xE0, 0x10, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ];
        let mut decoded = [0u8; 64];
        decode_block_dxt5(&compressed_block, &mut decoded, 16);

        assert_eq!(decoded[3], ((6 * 0xE0 + 0x10) / 7) as u8);
        assert_eq!(decoded[7], 0xE0);
        assert_eq!(decoded[63], 0xE0);
    }

    #[test]
    fn test_pitch() {
        let compressed_block = [0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut decoded = [0u8; 128];
        decode_block_dxt1(&compressed_block, &mut decoded, 32);

        for row in decoded.chunks_exact(32) {
            assert_eq!(&row[..16], &solid([0xFF, 0x00, 0x00, 0xFF])[..16]);
            assert_eq!(&row[16..], &[0u8; 16]);
        }
    }
}
