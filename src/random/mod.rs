//! Random sources for gauge deltas.

mod scripted;
mod seeded;
mod thread;

pub use scripted::ScriptedRandom;
pub use seeded::SeededRandom;
pub use thread::ThreadRandom;

use std::ops::RangeInclusive;
use std::sync::Arc;

/// Trait for sources of uniformly distributed integers.
pub trait RandomSource: Send + Sync {
    /// Draw one integer from the closed range.
    ///
    /// Implementations must return a value inside `range`.
    fn draw(&self, range: RangeInclusive<i64>) -> i64;
}

/// Build the random source for a process: seeded when a seed is configured,
/// thread-local otherwise.
pub fn from_seed(seed: Option<u64>) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    }
}
