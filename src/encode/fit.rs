//! Colour fitting strategies.
//!
//! Every strategy produces a [`FitResult`] per codebook size and the caller
//! keeps the cheaper one through [`BestFit`]. Nothing is written to a block
//! until the winner is known.

mod cluster;
mod range;
mod single;
mod single_lookup;

use self::{cluster::ClusterFit, range::RangeFit, single::SingleColourFit};
use super::colour_set::ColourSet;
use crate::{math::Vec3, ColourFitMethod, Settings};

/// Number of entries of the colour palette a block decodes to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Codebook {
    /// `start`, `end`, their midpoint and transparent black.
    Three,
    /// `start`, `end` and two interpolants at 1/3 and 2/3.
    Four,
}

impl Codebook {
    /// Number of opaque palette entries a fit can choose from.
    pub(crate) const fn len(self) -> usize {
        match self {
            Codebook::Three => 3,
            Codebook::Four => 4,
        }
    }

    /// Palette entries in wire index order.
    pub(crate) fn colours(self, start: Vec3, end: Vec3) -> [Vec3; 4] {
        match self {
            Codebook::Three => [start, end, 0.5 * start + 0.5 * end, Vec3::ZERO],
            Codebook::Four => [
                start,
                end,
                (2.0 / 3.0) * start + (1.0 / 3.0) * end,
                (1.0 / 3.0) * start + (2.0 / 3.0) * end,
            ],
        }
    }
}

/// Outcome of fitting a colour set against one codebook.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FitResult {
    pub(crate) codebook: Codebook,
    pub(crate) start: Vec3,
    pub(crate) end: Vec3,
    /// One index per pixel slot of the tile.
    pub(crate) indices: [u8; 16],
    pub(crate) error: f32,
}

impl FitResult {
    /// Expands one index per colour point into one index per pixel slot.
    pub(crate) fn from_point_indices(
        colours: &ColourSet,
        codebook: Codebook,
        start: Vec3,
        end: Vec3,
        point_indices: &[u8],
        error: f32,
    ) -> Self {
        let mut indices = [0u8; 16];
        colours.remap_indices(point_indices, &mut indices);

        Self {
            codebook,
            start,
            end,
            indices,
            error,
        }
    }
}

/// Keeps the lowest error result offered so far. Ties keep the earlier one.
#[derive(Clone, Debug)]
pub(crate) struct BestFit(FitResult);

impl BestFit {
    pub(crate) fn new(first: FitResult) -> Self {
        Self(first)
    }

    pub(crate) fn offer(&mut self, candidate: FitResult) {
        if candidate.error < self.0.error {
            self.0 = candidate;
        }
    }

    #[cfg(test)]
    pub(crate) fn error(&self) -> f32 {
        self.0.error
    }

    pub(crate) fn into_inner(self) -> FitResult {
        self.0
    }
}

/// A colour fitting strategy bound to one colour set.
pub(crate) trait ColourFit {
    /// Fits the three colour codebook. Transparent pixels map to index 3.
    fn compress3(&self) -> FitResult;

    /// Fits the four colour codebook.
    fn compress4(&self) -> FitResult;
}

/// Assigns every point of `colours` its nearest entry of `codebook` under the
/// per-channel `metric` and returns the point indices and the weighted sum of
/// squared errors.
pub(crate) fn assign_nearest(
    colours: &ColourSet,
    metric: Vec3,
    codebook: Codebook,
    start: Vec3,
    end: Vec3,
) -> ([u8; 16], f32) {
    let entries = codebook.colours(start, end);
    let entries = &entries[..codebook.len()];

    let mut indices = [0u8; 16];
    let mut error = 0.0;

    for (i, (&point, &weight)) in colours.points().iter().zip(colours.weights()).enumerate() {
        let mut best_distance = f32::MAX;
        for (j, &entry) in entries.iter().enumerate() {
            let distance = (metric * (point - entry)).length_squared();
            if distance < best_distance {
                best_distance = distance;
                indices[i] = j as u8;
            }
        }
        error += weight * best_distance;
    }

    (indices, error)
}

fn run_trials(fit: &impl ColourFit, is_dxt1: bool, has_transparency: bool) -> FitResult {
    if !is_dxt1 {
        return fit.compress4();
    }

    let mut best = BestFit::new(fit.compress3());
    if !has_transparency {
        best.offer(fit.compress4());
    }
    best.into_inner()
}

/// Picks the strategy for `colours` and returns its cheapest block.
///
/// DXT1 tries the three colour codebook first and the four colour codebook
/// only when no pixel is transparent. DXT3 and DXT5 only use four colours.
pub(crate) fn fit_colours(colours: &ColourSet, is_dxt1: bool, settings: &Settings) -> FitResult {
    let transparent = colours.is_transparent();

    match colours.count() {
        1 => {
            tracing::trace!(points = 1, "single colour fit");
            run_trials(&SingleColourFit::new(colours), is_dxt1, transparent)
        }
        count if count == 0 || settings.fit == ColourFitMethod::RangeFit => {
            tracing::trace!(points = count, "range fit");
            run_trials(&RangeFit::new(colours, settings), is_dxt1, transparent)
        }
        count => {
            tracing::trace!(points = count, method = ?settings.fit, "cluster fit");
            run_trials(&ClusterFit::new(colours, settings), is_dxt1, transparent)
        }
    }
}
