//! RNG module - deterministic random draws for level generation
//!
//! Every random decision the generator makes goes through [`RandomSource`], so the
//! caller decides whether a level is reproducible (daily challenge, tests) or fresh
//! (progressive play). There is no ambient randomness anywhere in the core.
//!
//! [`SeededRng`] is a linear congruential generator over `m = 2^31`:
//!
//! ```text
//! state = (1103515245 * state + 12345) mod 2^31
//! float = state / (2^31 - 1)
//! ```

/// LCG multiplier
pub const LCG_MULTIPLIER: u64 = 1_103_515_245;

/// LCG increment
pub const LCG_INCREMENT: u64 = 12_345;

/// LCG modulus (2^31)
pub const LCG_MODULUS: u64 = 1 << 31;

/// Source of uniform floats in `[0, 1)`.
///
/// Only [`next_float`](RandomSource::next_float) must be provided; the range
/// helpers are derived from it so that every implementation consumes exactly one
/// draw per helper call.
pub trait RandomSource {
    /// Next uniform float.
    fn next_float(&mut self) -> f64;

    /// `min + floor(next_float() * (max - min))`, upper bound exclusive.
    ///
    /// Returns `min` when the range is empty.
    fn next_range(&mut self, min: u32, max: u32) -> u32 {
        let f = self.next_float();
        if max <= min {
            return min;
        }
        let span = max - min;
        let offset = (f * span as f64).floor() as u32;
        min + offset.min(span - 1)
    }

    /// Uniform index into a collection of `len` elements.
    fn next_index(&mut self, len: usize) -> usize {
        self.next_range(0, len as u32) as usize
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_float() < p
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}

/// Seeded linear congruential generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        let reduced = (seed as u64 % LCG_MODULUS) as u32;
        // A zero register degrades the sequence quality
        let state = if reduced == 0 { 1 } else { reduced };
        Self { state }
    }

    /// Seed from OS entropy for non-reproducible play.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Advance the register and return it
    pub fn next_u32(&mut self) -> u32 {
        let next = (LCG_MULTIPLIER * self.state as u64 + LCG_INCREMENT) % LCG_MODULUS;
        self.state = next as u32;
        self.state
    }

    /// Current register value
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SeededRng {
    fn next_float(&mut self) -> f64 {
        self.next_u32() as f64 / (LCG_MODULUS - 1) as f64
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(1)
    }
}
