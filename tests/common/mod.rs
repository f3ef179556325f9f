#![allow(dead_code)]

pub mod metrics;

use image::{Rgba, RgbaImage};
use squish_blocks::{decode::decompress_rgba8, encode::compress_rgba8, Format, Settings};

/// Horizontal red ramp over a vertical green ramp with constant blue.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let red = (x * 255 / (width - 1).max(1)) as u8;
        let green = (y * 255 / (height - 1).max(1)) as u8;
        Rgba([red, green, 96, 255])
    })
}

/// Deterministic per pixel noise, `opaque` forces alpha to 255.
pub fn noise_image(width: u32, height: u32, seed: u32, opaque: bool) -> RgbaImage {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 24) as u8
    };

    RgbaImage::from_fn(width, height, |_, _| {
        let pixel = [next(), next(), next(), next()];
        Rgba([pixel[0], pixel[1], pixel[2], if opaque { 255 } else { pixel[3] }])
    })
}

/// Colour gradient with an alpha ramp running diagonally across it.
pub fn alpha_ramp_image(width: u32, height: u32) -> RgbaImage {
    let span = (width + height - 2).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let alpha = ((x + y) * 255 / span) as u8;
        Rgba([(x * 8) as u8, 128, (y * 8) as u8, alpha])
    })
}

/// 8x8 checker of two colours, every other square fully transparent.
pub fn cutout_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / 8) + (y / 8)) % 2 == 0 {
            Rgba([220, 180, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

pub fn uniform_image(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(pixel))
}

/// Compresses a tightly packed image and returns the blocks.
pub fn compress_image(format: Format, image: &RgbaImage, settings: &Settings) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let mut blocks = vec![0u8; format.blocks_byte_size(width, height)];

    compress_rgba8(
        format,
        image.as_raw(),
        &mut blocks,
        width,
        height,
        width * 4,
        settings,
    )
    .expect("compression failed");

    blocks
}

pub fn decompress_image(format: Format, blocks: &[u8], width: u32, height: u32) -> RgbaImage {
    let mut rgba = vec![0u8; (width * height * 4) as usize];
    decompress_rgba8(format, blocks, &mut rgba, width, height, width * 4)
        .expect("decompression failed");

    RgbaImage::from_raw(width, height, rgba).expect("buffer matches the dimensions")
}

/// Compresses and decompresses an image with the given settings.
pub fn round_trip(format: Format, image: &RgbaImage, settings: &Settings) -> RgbaImage {
    let blocks = compress_image(format, image, settings);
    decompress_image(format, &blocks, image.width(), image.height())
}

/// Expands a quantized channel of `bits` bits to 8 bits.
pub fn expand(value: u8, bits: u32) -> u8 {
    (value << (8 - bits)) | (value >> (2 * bits - 8))
}

/// The closest value to `value` representable with `bits` bits.
pub fn nearest_representable(value: u8, bits: u32) -> u8 {
    (0..1u8 << bits)
        .map(|q| expand(q, bits))
        .min_by_key(|&e| e.abs_diff(value))
        .unwrap_or(0)
}
