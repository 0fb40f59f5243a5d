//! Scripted source for deterministic tests.

use super::RandomSource;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays a fixed sequence of values, cycling when it runs out.
///
/// Values outside the requested range are clamped to its bounds.
pub struct ScriptedRandom {
    values: Vec<i64>,
    cursor: AtomicUsize,
}

impl ScriptedRandom {
    /// Create a source replaying `values`. An empty script always yields the
    /// lower bound of the requested range.
    pub fn new(values: impl Into<Vec<i64>>) -> Self {
        Self {
            values: values.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of draws served so far.
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl RandomSource for ScriptedRandom {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        match self.values.get(idx % self.values.len().max(1)) {
            Some(value) => (*value).clamp(*range.start(), *range.end()),
            None => *range.start(),
        }
    }
}
