use super::{assign_nearest, Codebook, ColourFit, FitResult};
use crate::{
    encode::{colour_block::snap_to_565, colour_set::ColourSet},
    math::{Sym3x3, Vec3},
    Settings,
};

/// Uses the colours with the smallest and largest projection onto the
/// principal axis as endpoints.
pub(crate) struct RangeFit<'a> {
    colours: &'a ColourSet,
    metric: Vec3,
    axis: Vec3,
    start: Vec3,
    end: Vec3,
}

impl<'a> RangeFit<'a> {
    pub(crate) fn new(colours: &'a ColourSet, settings: &Settings) -> Self {
        let metric = Vec3::from_array(settings.metric.weights());
        let axis = Sym3x3::weighted_covariance(colours.points(), colours.weights())
            .principal_component(settings.power_iterations);

        let mut start = Vec3::ZERO;
        let mut end = Vec3::ZERO;

        if let Some((&first, rest)) = colours.points().split_first() {
            start = first;
            end = first;
            let mut min = first.dot(axis);
            let mut max = min;

            for &point in rest {
                let projection = point.dot(axis);
                if projection < min {
                    start = point;
                    min = projection;
                } else if projection > max {
                    end = point;
                    max = projection;
                }
            }
        }

        Self {
            colours,
            metric,
            axis,
            start: snap_to_565(start),
            end: snap_to_565(end),
        }
    }

    pub(crate) fn axis(&self) -> Vec3 {
        self.axis
    }

    pub(crate) fn metric(&self) -> Vec3 {
        self.metric
    }

    fn fit(&self, codebook: Codebook) -> FitResult {
        let (indices, error) =
            assign_nearest(self.colours, self.metric, codebook, self.start, self.end);
        FitResult::from_point_indices(self.colours, codebook, self.start, self.end, &indices, error)
    }
}

impl ColourFit for RangeFit<'_> {
    fn compress3(&self) -> FitResult {
        self.fit(Codebook::Three)
    }

    fn compress4(&self) -> FitResult {
        self.fit(Codebook::Four)
    }
}
