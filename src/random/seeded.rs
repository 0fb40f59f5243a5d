//! Seeded, reproducible RNG source.

use super::RandomSource;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Draws from a `StdRng` seeded once at startup.
///
/// Every handler shares the one generator, so the sequence of draws is
/// reproducible for a given request order.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Create a source from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        self.rng.lock().gen_range(range)
    }
}
