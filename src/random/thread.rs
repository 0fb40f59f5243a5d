//! Thread-local RNG source.

use super::RandomSource;
use rand::Rng;
use std::ops::RangeInclusive;

/// Draws from `rand`'s thread-local generator. Used when no seed is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        rand::thread_rng().gen_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_stay_in_range() {
        let source = ThreadRandom;
        for _ in 0..1000 {
            let value = source.draw(5..=20);
            assert!((5..=20).contains(&value), "drew {} outside [5, 20]", value);
        }
    }

    #[test]
    fn test_covers_both_bounds() {
        let source = ThreadRandom;
        let draws: Vec<i64> = (0..2000).map(|_| source.draw(1..=5)).collect();
        assert!(draws.contains(&1));
        assert!(draws.contains(&5));
    }

    #[test]
    fn test_single_value_range() {
        assert_eq!(ThreadRandom.draw(3..=3), 3);
    }
}
