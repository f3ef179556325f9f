use crate::{Error, Result};

/// Strategy used to fit the RGB part of a block.
///
/// Tiles that contain a single distinct colour always use an exact
/// table-driven fit, whatever is selected here.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColourFitMethod {
    /// Projects the colours onto their principal axis and uses the extremes
    /// as endpoints. Fast, lowest quality.
    RangeFit,
    /// Greedy search over contiguous partitions of the colours along the
    /// principal axis.
    ClusterFit,
    /// Like [`ColourFitMethod::ClusterFit`] with a larger refinement budget.
    IterativeClusterFit,
}

impl ColourFitMethod {
    /// Maximum number of refinement passes of the cluster search.
    pub(crate) const fn refine_iterations(self) -> u32 {
        match self {
            ColourFitMethod::RangeFit => 0,
            ColourFitMethod::ClusterFit => 8,
            ColourFitMethod::IterativeClusterFit => 32,
        }
    }
}

/// Per-channel error weighting used when comparing colours.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColourMetric {
    /// Weights approximating the luminance sensitivity of the eye.
    Perceptual,
    /// All channels weigh the same.
    Uniform,
}

impl ColourMetric {
    pub(crate) const fn weights(self) -> [f32; 3] {
        match self {
            ColourMetric::Perceptual => [0.2126, 0.7152, 0.0722],
            ColourMetric::Uniform => [1.0, 1.0, 1.0],
        }
    }
}

/// Encoding settings for DXT1/3/5.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    pub(crate) fit: ColourFitMethod,
    pub(crate) metric: ColourMetric,
    pub(crate) weight_colour_by_alpha: bool,
    pub(crate) alpha_weight_exponent: f32,
    pub(crate) transparent_alpha_threshold: u8,
    pub(crate) power_iterations: u32,
    pub(crate) parallel: bool,
    pub(crate) parallel_block_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::balanced()
    }
}

impl Settings {
    /// Range fit with the perceptual metric.
    pub const fn fast() -> Self {
        Self::balanced().with_fit(ColourFitMethod::RangeFit)
    }

    /// Cluster fit with the perceptual metric.
    pub const fn balanced() -> Self {
        Self {
            fit: ColourFitMethod::ClusterFit,
            metric: ColourMetric::Perceptual,
            weight_colour_by_alpha: false,
            alpha_weight_exponent: 1.0,
            transparent_alpha_threshold: 1,
            power_iterations: 8,
            parallel: true,
            parallel_block_threshold: 16,
        }
    }

    /// Iterative cluster fit with the perceptual metric.
    pub const fn slow() -> Self {
        Self::balanced().with_fit(ColourFitMethod::IterativeClusterFit)
    }

    /// Selects the colour fitting strategy.
    pub const fn with_fit(mut self, fit: ColourFitMethod) -> Self {
        self.fit = fit;
        self
    }

    /// Selects the colour error metric.
    pub const fn with_metric(mut self, metric: ColourMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Weights every pixel's colour by `((alpha + 1) / 256) ^ exponent`.
    ///
    /// Useful for textures rendered with alpha blending, where the colour of
    /// nearly transparent pixels barely matters.
    pub const fn with_alpha_weighting(mut self, enabled: bool, exponent: f32) -> Self {
        self.weight_colour_by_alpha = enabled;
        self.alpha_weight_exponent = exponent;
        self
    }

    /// In DXT1, covered pixels with an alpha below `threshold` are encoded as
    /// transparent black. A threshold of zero disables DXT1 transparency.
    pub const fn with_transparent_alpha_threshold(mut self, threshold: u8) -> Self {
        self.transparent_alpha_threshold = threshold;
        self
    }

    /// Number of power iterations used to estimate the principal axis.
    pub const fn with_power_iterations(mut self, iterations: u32) -> Self {
        self.power_iterations = iterations;
        self
    }

    /// Enables or disables parallel compression of large images and sets the
    /// block count below which compression always runs on the calling thread.
    ///
    /// Only has an effect with the `rayon` feature. Output is identical
    /// either way.
    pub const fn with_parallel(mut self, enabled: bool, block_threshold: usize) -> Self {
        self.parallel = enabled;
        self.parallel_block_threshold = block_threshold;
        self
    }

    /// The selected colour fitting strategy.
    pub const fn fit(&self) -> ColourFitMethod {
        self.fit
    }

    /// The selected colour error metric.
    pub const fn metric(&self) -> ColourMetric {
        self.metric
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> Result<()> {
        if self.weight_colour_by_alpha
            && !(self.alpha_weight_exponent.is_finite() && self.alpha_weight_exponent > 0.0)
        {
            return Err(Error::InvalidSetting {
                name: "alpha_weight_exponent",
                reason: "must be finite and greater than zero",
            });
        }

        if self.power_iterations == 0 {
            return Err(Error::InvalidSetting {
                name: "power_iterations",
                reason: "must be at least one",
            });
        }

        Ok(())
    }
}
