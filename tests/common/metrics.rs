use image::RgbaImage;

#[derive(Debug, Clone)]
pub struct PsnrResult {
    pub overall_psnr: f64,
    pub overall_mse: f64,
    pub channels: [ChannelMetrics; 4],
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelMetrics {
    pub psnr: f64,
    pub mse: f64,
}

impl ChannelMetrics {
    fn from_mse(mse: f64) -> Self {
        Self {
            psnr: psnr(mse),
            mse,
        }
    }
}

/// Compares two images of the same size. Colour channels are compared in
/// linear space, alpha as is.
///
/// `channels` selects how many channels contribute to the overall result,
/// 3 ignores alpha.
pub fn calculate_image_metrics(
    original: &RgbaImage,
    decoded: &RgbaImage,
    channels: usize,
) -> PsnrResult {
    assert_eq!(
        original.dimensions(),
        decoded.dimensions(),
        "images must have the same size"
    );

    let mut channel_mse = [0.0f64; 4];
    for (a, b) in original.pixels().zip(decoded.pixels()) {
        for channel in 0..4 {
            let diff = if channel < 3 {
                srgb_to_linear(a[channel]) - srgb_to_linear(b[channel])
            } else {
                (a[channel] as f64 - b[channel] as f64) / 255.0
            };
            channel_mse[channel] += diff * diff;
        }
    }

    let pixel_count = (original.width() * original.height()) as f64;
    channel_mse.iter_mut().for_each(|mse| *mse /= pixel_count);

    let overall_mse = channel_mse[..channels].iter().sum::<f64>() / channels as f64;

    PsnrResult {
        overall_psnr: psnr(overall_mse),
        overall_mse,
        channels: channel_mse.map(ChannelMetrics::from_mse),
    }
}

/// Mean squared error of the RGB channels measured on the stored 8-bit
/// values, the space the encoder minimizes its error in.
pub fn colour_mse(original: &RgbaImage, decoded: &RgbaImage) -> f64 {
    let sum: f64 = original
        .pixels()
        .zip(decoded.pixels())
        .flat_map(|(a, b)| (0..3).map(move |c| a[c] as f64 - b[c] as f64))
        .map(|diff| diff * diff)
        .sum();

    sum / (original.width() * original.height() * 3) as f64
}

fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (1.0 / mse.sqrt()).log10()
    }
}

#[inline]
fn srgb_to_linear(srgb: u8) -> f64 {
    let v = (srgb as f64) / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
