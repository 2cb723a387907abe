//! Per-image random sources.

use rand::{SeedableRng, rngs::StdRng};

/// How each image's random generator is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Fresh OS entropy for every image.
    #[default]
    Entropy,
    /// Derive every image's generator from one seed and the image's sequence number.
    Fixed(u64),
}

impl SeedPolicy {
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or(SeedPolicy::Entropy, SeedPolicy::Fixed)
    }

    /// Generator for the image with the given sequence number. With a fixed seed the
    /// result depends only on `(seed, sequence)`, never on worker scheduling.
    pub fn rng_for(&self, sequence: usize) -> StdRng {
        match *self {
            SeedPolicy::Entropy => StdRng::from_os_rng(),
            SeedPolicy::Fixed(seed) => {
                let mixed = seed ^ (sequence as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                StdRng::seed_from_u64(mixed)
            }
        }
    }
}
