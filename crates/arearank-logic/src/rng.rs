//! Seeded linear-congruential generator for level layouts.
//!
//! Every shape decision in the pipeline draws from one `LevelRng`, so a
//! level seed maps to exactly one grid labelling.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// LCG with `state = (state * 9301 + 49297) mod 233280`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRng {
    state: u64,
}

impl LevelRng {
    /// Reducing the seed up front keeps every step below 2^32 and yields
    /// the same sequence as the unreduced recurrence.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % MODULUS,
        }
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "below(0) has no valid result");
        let pick = (self.next_f64() * n as f64).floor() as usize;
        pick.min(n.saturating_sub(1))
    }

    /// Offset in {-1, 0, 1}.
    pub fn jitter(&mut self) -> i64 {
        (self.next_f64() * 3.0).floor() as i64 - 1
    }

    /// Fisher–Yates shuffle, back to front.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}
