use super::{assign_nearest, range::RangeFit, BestFit, Codebook, ColourFit, FitResult};
use crate::{
    encode::{colour_block::snap_to_565, colour_set::ColourSet},
    math::{Vec3, Vec4},
    Settings,
};

/// Weight of `start` for each cluster, ordered from `start` to `end`.
const WEIGHTS_3: [f32; 3] = [1.0, 0.5, 0.0];
const WEIGHTS_4: [f32; 4] = [1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0];

/// Cluster boundaries into the sorted points. `bounds[0]` is always 0 and
/// `bounds[clusters]` the point count.
type Bounds = [usize; 5];

/// Searches contiguous partitions of the points, ordered along the principal
/// axis, for the one whose least squares endpoints give the lowest error.
///
/// The search starts from an even split and greedily moves single cluster
/// boundaries by one point while that lowers the error. The range fit result
/// seeds the best candidate, so this never does worse than [`RangeFit`].
pub(crate) struct ClusterFit<'a> {
    colours: &'a ColourSet,
    range: RangeFit<'a>,
    order: [usize; 16],
    weight_scale: f32,
    iterations: u32,
}

impl<'a> ClusterFit<'a> {
    pub(crate) fn new(colours: &'a ColourSet, settings: &Settings) -> Self {
        let range = RangeFit::new(colours, settings);
        let axis = range.axis();
        let points = colours.points();

        let mut order: [usize; 16] = std::array::from_fn(|i| i);
        order[..points.len()]
            .sort_by(|&a, &b| points[b].dot(axis).total_cmp(&points[a].dot(axis)));

        // the solve works on weights summing to one
        let total: f32 = colours.weights().iter().sum();
        let weight_scale = if total > 0.0 { total.recip() } else { 1.0 };

        Self {
            colours,
            range,
            order,
            weight_scale,
            iterations: settings.fit.refine_iterations(),
        }
    }

    /// Least squares endpoints for the partition, snapped to 5:6:5.
    fn solve(&self, weights: &[f32], bounds: &[usize]) -> (Vec3, Vec3) {
        let points = self.colours.points();
        let point_weights = self.colours.weights();

        let mut alpha2 = 0.0;
        let mut alpha_beta = 0.0;
        let mut beta2 = 0.0;
        let mut alpha_x = Vec3::ZERO;
        let mut beta_x = Vec3::ZERO;
        let mut total = Vec4::ZERO;

        for (cluster, &alpha) in weights.iter().enumerate() {
            let beta = 1.0 - alpha;
            for &i in &self.order[bounds[cluster]..bounds[cluster + 1]] {
                let (x, w) = (points[i], point_weights[i] * self.weight_scale);

                alpha2 += w * alpha * alpha;
                alpha_beta += w * alpha * beta;
                beta2 += w * beta * beta;
                alpha_x += x * (w * alpha);
                beta_x += x * (w * beta);
                total = total + Vec4::weighted(x, w);
            }
        }

        let determinant = alpha2 * beta2 - alpha_beta * alpha_beta;
        if determinant.abs() <= f32::EPSILON {
            // every point sits in one cluster, fall back to their mean
            let mean = if total.w() > 0.0 {
                total.xyz() * total.w().recip()
            } else {
                Vec3::ZERO
            };
            let mean = snap_to_565(mean);
            return (mean, mean);
        }

        let factor = determinant.recip();
        let start = (alpha_x * beta2 - beta_x * alpha_beta) * factor;
        let end = (beta_x * alpha2 - alpha_x * alpha_beta) * factor;

        (snap_to_565(start), snap_to_565(end))
    }

    fn evaluate(&self, codebook: Codebook, weights: &[f32], bounds: &[usize]) -> FitResult {
        let (start, end) = self.solve(weights, bounds);
        let metric = self.range.metric();
        let (indices, error) = assign_nearest(self.colours, metric, codebook, start, end);
        FitResult::from_point_indices(self.colours, codebook, start, end, &indices, error)
    }

    fn fit(&self, codebook: Codebook) -> FitResult {
        let (weights, seed) = match codebook {
            Codebook::Three => (&WEIGHTS_3[..], self.range.compress3()),
            Codebook::Four => (&WEIGHTS_4[..], self.range.compress4()),
        };
        let clusters = weights.len();
        let count = self.colours.count();

        let mut bounds: Bounds = [0; 5];
        for (cluster, bound) in bounds.iter_mut().enumerate().take(clusters + 1) {
            *bound = cluster * count / clusters;
        }

        let mut best = BestFit::new(seed);
        let initial = self.evaluate(codebook, weights, &bounds[..=clusters]);
        let mut current_error = initial.error;
        best.offer(initial);

        for _ in 0..self.iterations {
            let mut improved: Option<(Bounds, FitResult)> = None;

            for boundary in 1..clusters {
                for moved in [bounds[boundary].wrapping_sub(1), bounds[boundary] + 1] {
                    if moved < bounds[boundary - 1] || moved > bounds[boundary + 1] {
                        continue;
                    }

                    let mut candidate = bounds;
                    candidate[boundary] = moved;
                    let result = self.evaluate(codebook, weights, &candidate[..=clusters]);

                    let threshold = improved.as_ref().map_or(current_error, |(_, r)| r.error);
                    if result.error < threshold {
                        improved = Some((candidate, result));
                    }
                }
            }

            let Some((next, result)) = improved else {
                break;
            };
            bounds = next;
            current_error = result.error;
            best.offer(result);
        }

        best.into_inner()
    }
}

impl ColourFit for ClusterFit<'_> {
    fn compress3(&self) -> FitResult {
        self.fit(Codebook::Three)
    }

    fn compress4(&self) -> FitResult {
        self.fit(Codebook::Four)
    }
}
