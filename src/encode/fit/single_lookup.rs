use std::sync::LazyLock;

/// Endpoint pair of one channel that reproduces a target value through a
/// given codebook index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SourceBlock {
    pub(crate) start: u8,
    pub(crate) end: u8,
    pub(crate) error: u8,
}

/// Best sources for one 8-bit target value.
///
/// `sources[0]` reproduces the target through the `start` endpoint,
/// `sources[1]` through the first interpolant (the midpoint for three
/// colours, `2/3 start + 1/3 end` for four).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SingleColourLookup {
    pub(crate) sources: [SourceBlock; 2],
}

pub(crate) type LookupTable = [SingleColourLookup; 256];

pub(crate) static LOOKUP_5_3: LazyLock<LookupTable> = LazyLock::new(|| build_table(5, 3));
pub(crate) static LOOKUP_6_3: LazyLock<LookupTable> = LazyLock::new(|| build_table(6, 3));
pub(crate) static LOOKUP_5_4: LazyLock<LookupTable> = LazyLock::new(|| build_table(5, 4));
pub(crate) static LOOKUP_6_4: LazyLock<LookupTable> = LazyLock::new(|| build_table(6, 4));

/// Expands a `bits` wide channel to 8 bits by bit replication.
#[inline(always)]
pub(crate) const fn expand(value: u8, bits: u32) -> i32 {
    let value = value as i32;
    (value << (8 - bits)) | (value >> (2 * bits - 8))
}

fn build_table(bits: u32, colours: i32) -> LookupTable {
    let levels = 1u8 << bits;
    let mut table = [SingleColourLookup::default(); 256];

    for (target, entry) in table.iter_mut().enumerate() {
        let target = target as i32;

        // index 0 decodes to `start` itself
        let mut best = (SourceBlock::default(), i32::MAX);
        for start in 0..levels {
            let error = (expand(start, bits) - target).abs();
            if error < best.1 {
                best = (
                    SourceBlock {
                        start,
                        end: start,
                        error: error as u8,
                    },
                    error,
                );
            }
        }
        entry.sources[0] = best.0;

        // index 1 decodes to the first interpolant
        let mut best = (SourceBlock::default(), i32::MAX);
        for start in 0..levels {
            let a = expand(start, bits);
            for end in 0..levels {
                let b = expand(end, bits);
                let value = ((colours - 2) * a + b) / (colours - 1);
                let error = (value - target).abs();
                if error < best.1 {
                    best = (
                        SourceBlock {
                            start,
                            end,
                            error: error as u8,
                        },
                        error,
                    );
                }
            }
        }
        entry.sources[1] = best.0;
    }

    table
}
