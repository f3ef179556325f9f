use crate::{
    math::{Vec3, Vec4},
    Settings,
};

/// What a pixel slot of the tile maps to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    /// Outside the coverage mask.
    Unused,
    /// A DXT1 pixel below the transparency threshold, always index 3.
    Transparent,
    /// Index into the unique colour points.
    Point(u8),
}

/// The unique colours of a tile with their accumulated weights.
///
/// Points keep the order in which their colour first appears in the tile.
#[derive(Clone, Debug)]
pub(crate) struct ColourSet {
    points: [Vec3; 16],
    weights: [f32; 16],
    count: usize,
    remap: [Slot; 16],
    transparent: bool,
}

impl ColourSet {
    /// Collects the covered pixels of `rgba` selected by `mask`.
    ///
    /// With `is_dxt1` set, covered pixels whose alpha lies below the
    /// configured threshold are kept out of the points and flagged as
    /// transparent instead.
    pub(crate) fn new(rgba: &[[u8; 4]; 16], mask: u16, is_dxt1: bool, settings: &Settings) -> Self {
        let mut set = Self {
            points: [Vec3::ZERO; 16],
            weights: [0.0; 16],
            count: 0,
            remap: [Slot::Unused; 16],
            transparent: false,
        };

        for (i, pixel) in rgba.iter().enumerate() {
            if mask & (1 << i) == 0 {
                continue;
            }

            if is_dxt1 && pixel[3] < settings.transparent_alpha_threshold {
                set.remap[i] = Slot::Transparent;
                set.transparent = true;
                continue;
            }

            let weight = if settings.weight_colour_by_alpha {
                ((f32::from(pixel[3]) + 1.0) / 256.0).powf(settings.alpha_weight_exponent)
            } else {
                1.0
            };

            let existing = (0..i).find_map(|j| match set.remap[j] {
                Slot::Point(index) if rgba[j][..3] == pixel[..3] => Some(index),
                _ => None,
            });

            match existing {
                Some(index) => {
                    set.weights[index as usize] += weight;
                    set.remap[i] = Slot::Point(index);
                }
                None => {
                    let index = set.count;
                    set.points[index] = Vec4::from_rgba8(*pixel).xyz();
                    set.weights[index] = weight;
                    set.remap[i] = Slot::Point(index as u8);
                    set.count += 1;
                }
            }
        }

        set
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn points(&self) -> &[Vec3] {
        &self.points[..self.count]
    }

    pub(crate) fn weights(&self) -> &[f32] {
        &self.weights[..self.count]
    }

    /// Whether the tile holds pixels that must decode as transparent.
    pub(crate) fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Expands one index per point to one index per pixel slot.
    ///
    /// Transparent slots get index 3, slots outside the mask get index 0.
    pub(crate) fn remap_indices(&self, source: &[u8], target: &mut [u8; 16]) {
        for (target, slot) in target.iter_mut().zip(self.remap.iter()) {
            *target = match *slot {
                Slot::Unused => 0,
                Slot::Transparent => 3,
                Slot::Point(index) => source[index as usize],
            };
        }
    }
}
