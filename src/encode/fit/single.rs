use super::{
    single_lookup::{LookupTable, SourceBlock, LOOKUP_5_3, LOOKUP_5_4, LOOKUP_6_3, LOOKUP_6_4},
    Codebook, ColourFit, FitResult,
};
use crate::{
    encode::colour_set::ColourSet,
    math::{float_to_int, Vec3},
};

/// Exact fit for tiles that hold a single distinct colour.
///
/// Each channel is looked up independently for the endpoints that reproduce
/// it best, either directly through `start` or through the first interpolant.
pub(crate) struct SingleColourFit<'a> {
    colours: &'a ColourSet,
    colour: [usize; 3],
}

impl<'a> SingleColourFit<'a> {
    pub(crate) fn new(colours: &'a ColourSet) -> Self {
        let point = colours.points().first().copied().unwrap_or(Vec3::ZERO);
        let colour = [
            float_to_int(255.0 * point.x(), 255) as usize,
            float_to_int(255.0 * point.y(), 255) as usize,
            float_to_int(255.0 * point.z(), 255) as usize,
        ];

        Self { colours, colour }
    }

    fn fit(&self, codebook: Codebook, tables: [&LookupTable; 3]) -> FitResult {
        let lookup = |index: usize| {
            let sources: [SourceBlock; 3] =
                std::array::from_fn(|channel| tables[channel][self.colour[channel]].sources[index]);
            let error: u32 = sources
                .iter()
                .map(|source| u32::from(source.error) * u32::from(source.error))
                .sum();
            (sources, error)
        };

        // the first interpolant sits at codebook index 2
        let (direct, direct_error) = lookup(0);
        let (interpolated, interpolated_error) = lookup(1);
        let (sources, index, error) = if interpolated_error < direct_error {
            (interpolated, 2, interpolated_error)
        } else {
            (direct, 0, direct_error)
        };

        let start = Vec3::new(
            f32::from(sources[0].start) / 31.0,
            f32::from(sources[1].start) / 63.0,
            f32::from(sources[2].start) / 31.0,
        );
        let end = Vec3::new(
            f32::from(sources[0].end) / 31.0,
            f32::from(sources[1].end) / 63.0,
            f32::from(sources[2].end) / 31.0,
        );

        FitResult::from_point_indices(self.colours, codebook, start, end, &[index], error as f32)
    }
}

impl ColourFit for SingleColourFit<'_> {
    fn compress3(&self) -> FitResult {
        self.fit(Codebook::Three, [&LOOKUP_5_3, &LOOKUP_6_3, &LOOKUP_5_3])
    }

    fn compress4(&self) -> FitResult {
        self.fit(Codebook::Four, [&LOOKUP_5_4, &LOOKUP_6_4, &LOOKUP_5_4])
    }
}
