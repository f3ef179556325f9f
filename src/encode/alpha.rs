//! Alpha sub-block encoders for DXT3 (explicit 4 bit) and DXT5 (interpolated).

use crate::math::float_to_int;

#[inline(always)]
fn is_covered(mask: u16, pixel: usize) -> bool {
    mask & (1 << pixel) != 0
}

/// Writes 16 explicit 4-bit alpha values, two per byte, low nibble first.
///
/// Pixels outside `mask` are written as zero.
pub(crate) fn compress_alpha_dxt3(rgba: &[[u8; 4]; 16], mask: u16, block: &mut [u8]) {
    for (i, byte) in block[..8].iter_mut().enumerate() {
        let mut pair = [0u8; 2];
        for (j, quantized) in pair.iter_mut().enumerate() {
            let pixel = 2 * i + j;
            if is_covered(mask, pixel) {
                let alpha = f32::from(rgba[pixel][3]) * (15.0 / 255.0);
                *quantized = float_to_int(alpha, 15) as u8;
            }
        }
        *byte = pair[0] | (pair[1] << 4);
    }
}

/// Widens `min..=max` to span at least `steps` so the interpolated codes
/// stay distinct.
fn fix_range(min: &mut u8, max: &mut u8, steps: u8) {
    if *max - *min < steps {
        *max = min.saturating_add(steps);
    }
    if *max - *min < steps {
        *min = max.saturating_sub(steps);
    }
}

/// Assigns every covered pixel its nearest code and returns the summed
/// squared error. Pixels outside `mask` get index 0.
fn fit_codes(rgba: &[[u8; 4]; 16], mask: u16, codes: &[u8; 8], indices: &mut [u8; 16]) -> u32 {
    let mut error = 0;

    for (i, pixel) in rgba.iter().enumerate() {
        if !is_covered(mask, i) {
            indices[i] = 0;
            continue;
        }

        let value = i32::from(pixel[3]);
        let (index, least) = codes
            .iter()
            .enumerate()
            .map(|(j, &code)| {
                let distance = value - i32::from(code);
                (j, (distance * distance) as u32)
            })
            .fold((0, u32::MAX), |best, candidate| {
                if candidate.1 < best.1 {
                    candidate
                } else {
                    best
                }
            });

        indices[i] = index as u8;
        error += least;
    }

    error
}

fn write_alpha_block(alpha0: u8, alpha1: u8, indices: &[u8; 16], block: &mut [u8]) {
    let packed = indices
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &index)| acc | (u64::from(index & 0x07) << (3 * i)));

    block[0] = alpha0;
    block[1] = alpha1;
    block[2..8].copy_from_slice(&packed.to_le_bytes()[..6]);
}

/// Writes a 5-interpolant block (`alpha0 <= alpha1`).
fn write_alpha_block5(min: u8, max: u8, indices: &[u8; 16], block: &mut [u8]) {
    if min > max {
        let mut swapped = *indices;
        for index in swapped.iter_mut() {
            *index = match *index {
                0 => 1,
                1 => 0,
                inner @ 2..=5 => 7 - inner,
                fixed => fixed,
            };
        }
        write_alpha_block(max, min, &swapped, block);
    } else {
        write_alpha_block(min, max, indices, block);
    }
}

/// Writes a 7-interpolant block (`alpha0 > alpha1`).
fn write_alpha_block7(min: u8, max: u8, indices: &[u8; 16], block: &mut [u8]) {
    if min < max {
        let mut swapped = *indices;
        for index in swapped.iter_mut() {
            *index = match *index {
                0 => 1,
                1 => 0,
                inner => 9 - inner,
            };
        }
        write_alpha_block(max, min, &swapped, block);
    } else {
        write_alpha_block(min, max, indices, block);
    }
}

/// Builds a codebook with `min` and `max` at indices 0 and 1 followed by
/// `steps - 1` evenly spaced interpolants.
fn interpolated_codes(min: u8, max: u8, steps: i32) -> [u8; 8] {
    let mut codes = [0u8; 8];
    codes[0] = min;
    codes[1] = max;
    for i in 1..steps {
        let value = ((steps - i) * i32::from(min) + i * i32::from(max)) / steps;
        codes[1 + i as usize] = value as u8;
    }
    codes
}

/// Fits the alpha channel of the covered pixels to both DXT5 codebooks and
/// writes the one with the lower squared error. Ties favour the 5-interpolant
/// codebook.
pub(crate) fn compress_alpha_dxt5(rgba: &[[u8; 4]; 16], mask: u16, block: &mut [u8]) {
    let mut min5 = u8::MAX;
    let mut max5 = 0u8;
    let mut min7 = u8::MAX;
    let mut max7 = 0u8;

    for (i, pixel) in rgba.iter().enumerate() {
        if !is_covered(mask, i) {
            continue;
        }

        let value = pixel[3];
        min7 = min7.min(value);
        max7 = max7.max(value);

        // 0 and 255 are explicit codes of the 5-interpolant codebook
        if value != 0 {
            min5 = min5.min(value);
        }
        if value != u8::MAX {
            max5 = max5.max(value);
        }
    }

    if min5 > max5 {
        min5 = max5;
    }
    if min7 > max7 {
        min7 = max7;
    }

    fix_range(&mut min5, &mut max5, 5);
    fix_range(&mut min7, &mut max7, 7);

    let mut codes5 = interpolated_codes(min5, max5, 5);
    codes5[6] = 0;
    codes5[7] = u8::MAX;
    let codes7 = interpolated_codes(min7, max7, 7);

    let mut indices5 = [0u8; 16];
    let mut indices7 = [0u8; 16];
    let error5 = fit_codes(rgba, mask, &codes5, &mut indices5);
    let error7 = fit_codes(rgba, mask, &codes7, &mut indices7);

    if error5 <= error7 {
        write_alpha_block5(min5, max5, &indices5, block);
    } else {
        write_alpha_block7(min7, max7, &indices7, block);
    }
}
