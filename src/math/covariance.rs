use super::Vec3;

/// Symmetric 3x3 matrix storing only the six independent entries:
/// `[xx, xy, xz, yy, yz, zz]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Sym3x3([f32; 6]);

impl Sym3x3 {
    /// Weighted covariance of `points`, normalised by the total weight.
    ///
    /// Only the relative weights matter, scaling every weight by the same
    /// factor yields the same matrix. Returns the zero matrix when the
    /// weights sum to zero.
    pub(crate) fn weighted_covariance(points: &[Vec3], weights: &[f32]) -> Self {
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return Self::default();
        }
        let scale = total.recip();

        let mut centroid = Vec3::ZERO;
        for (&point, &weight) in points.iter().zip(weights) {
            centroid += point * (weight * scale);
        }

        let mut covariance = [0.0; 6];
        for (&point, &weight) in points.iter().zip(weights) {
            let a = point - centroid;
            let b = a * (weight * scale);

            covariance[0] += a.x() * b.x();
            covariance[1] += a.x() * b.y();
            covariance[2] += a.x() * b.z();
            covariance[3] += a.y() * b.y();
            covariance[4] += a.y() * b.z();
            covariance[5] += a.z() * b.z();
        }

        Self(covariance)
    }

    fn rows(&self) -> [Vec3; 3] {
        let m = &self.0;
        [
            Vec3::new(m[0], m[1], m[2]),
            Vec3::new(m[1], m[3], m[4]),
            Vec3::new(m[2], m[4], m[5]),
        ]
    }

    fn mul_vec(&self, v: Vec3) -> Vec3 {
        let [r0, r1, r2] = self.rows();
        Vec3::new(r0.dot(v), r1.dot(v), r2.dot(v))
    }

    /// Dominant eigenvector, estimated by power iteration.
    ///
    /// The iteration starts from the row with the largest magnitude. A zero
    /// matrix yields the unit X axis.
    pub(crate) fn principal_component(&self, power_iterations: u32) -> Vec3 {
        let mut v = self
            .rows()
            .into_iter()
            .fold(Vec3::ZERO, |best, row| {
                if row.length_squared() > best.length_squared() {
                    row
                } else {
                    best
                }
            });

        if v.max_abs_component() <= f32::MIN_POSITIVE {
            return Vec3::new(1.0, 0.0, 0.0);
        }

        for _ in 0..power_iterations {
            let w = self.mul_vec(v);
            let length_sq = w.length_squared();
            if length_sq <= f32::MIN_POSITIVE {
                break;
            }
            v = w * length_sq.sqrt().recip();
        }

        v * v.length_squared().sqrt().recip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parallel(a: Vec3, b: Vec3) {
        let cos = a.dot(b) / (a.length_squared() * b.length_squared()).sqrt();
        assert!(cos.abs() > 0.999, "{a:?} is not parallel to {b:?}");
    }

    #[test]
    fn test_zero_weight_gives_zero_matrix() {
        let points = [Vec3::new(0.1, 0.2, 0.3), Vec3::new(0.9, 0.8, 0.7)];
        let covariance = Sym3x3::weighted_covariance(&points, &[0.0, 0.0]);
        assert_eq!(covariance, Sym3x3::default());
        assert_eq!(
            covariance.principal_component(8),
            Vec3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_empty_set() {
        let covariance = Sym3x3::weighted_covariance(&[], &[]);
        assert_eq!(covariance, Sym3x3::default());
    }

    #[test]
    fn test_covariance_of_two_points() {
        let points = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let covariance = Sym3x3::weighted_covariance(&points, &[1.0, 1.0]);
        // mean 0.5, deviations of +-0.5 along x
        assert_eq!(covariance.0, [0.25, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_tiny_weights_keep_the_axis() {
        let points = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        let tiny = 2.0f32.powi(-64);

        let covariance = Sym3x3::weighted_covariance(&points, &[tiny, tiny]);
        assert_eq!(
            covariance,
            Sym3x3::weighted_covariance(&points, &[1.0, 1.0])
        );
        assert_parallel(covariance.principal_component(8), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_principal_component_follows_gradient() {
        let points: Vec<Vec3> = (0..8)
            .map(|i| {
                let t = i as f32 / 7.0;
                Vec3::new(t, 0.5 * t, 1.0 - t)
            })
            .collect();
        let weights = [1.0; 8];

        let axis = Sym3x3::weighted_covariance(&points, &weights).principal_component(8);

        assert_parallel(axis, Vec3::new(1.0, 0.5, -1.0));
        assert!((axis.length_squared() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_weights_pull_the_axis() {
        // a heavy pair along y dominates a light pair along x
        let points = [
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(0.5, 1.0, 0.5),
            Vec3::new(0.0, 0.5, 0.5),
            Vec3::new(1.0, 0.5, 0.5),
        ];
        let weights = [8.0, 8.0, 1.0, 1.0];

        let axis = Sym3x3::weighted_covariance(&points, &weights).principal_component(8);

        assert_parallel(axis, Vec3::new(0.0, 1.0, 0.0));
    }
}
