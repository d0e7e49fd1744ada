//! Seedable RNG wrapper.
//!
//! Randomness enters the planner in two places: coordinates for locations the
//! street list gives none for (plus durations of untimed segments), and
//! random traffic incidents.  Both take a [`CityRng`] at construction so that
//! tests and replays can pin the seed; production code may use
//! [`CityRng::from_entropy`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// City-level RNG for graph construction and incident generation.
///
/// Used only in single-threaded contexts.  Components that need their own
/// stream derive one with [`child`](Self::child).
#[derive(Debug, Clone)]
pub struct CityRng(SmallRng);

impl CityRng {
    pub fn new(seed: u64) -> Self {
        CityRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from the operating system.  Runs are not reproducible.
    pub fn from_entropy() -> Self {
        CityRng(SmallRng::from_entropy())
    }

    /// Derive a child `CityRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> CityRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        CityRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
