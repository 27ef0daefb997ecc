//! # Lcg
//!
//! A small linear congruential generator used to shuffle the starting tour
//! of every restart. It is deliberately not a `rand` generator: restarts must
//! be reproducible from nothing more than their numeric seed, so the
//! recurrence and its constants are part of the solver's observable
//! behavior.
//!
//! ## Example
//!
//! ```rust
//! use twoopt::rng::Lcg;
//!
//! let mut rng = Lcg::new(0);
//! let value = rng.next_unit();
//! assert!((0.0..=1.0).contains(&value));
//!
//! let index = rng.next_index(100);
//! assert!((1..100).contains(&index));
//! ```

/// Multiplier of the recurrence.
pub const LCG_MULTIPLIER: u32 = 26_757_677;
/// Increment of the recurrence.
pub const LCG_INCREMENT: u32 = 1;
/// Modulus of the recurrence (2^31).
pub const LCG_MODULUS: u32 = 1 << 31;

/// Advances `seed` by one step and returns `(value, new_seed)` where
/// `value = new_seed / 2^31` as an `f32`.
///
/// The multiplication wraps at 32 bits before the modulus is taken.
pub fn next(seed: u32) -> (f32, u32) {
    let seed = LCG_MULTIPLIER
        .wrapping_mul(seed)
        .wrapping_add(LCG_INCREMENT)
        % LCG_MODULUS;
    (seed as f32 / LCG_MODULUS as f32, seed)
}

/// A stateful wrapper around [`next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    /// Creates a generator starting from `seed`.
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Returns the current state.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Draws the next value in `[0, 1)`.
    ///
    /// The `f32` quotient can round up to exactly `1.0` for states just below
    /// the modulus; [`Lcg::next_index`] accounts for that.
    pub fn next_unit(&mut self) -> f32 {
        let (value, seed) = next(self.seed);
        self.seed = seed;
        value
    }

    /// Draws an index in `[1, len - 1]`, used for shuffling every position
    /// except the first.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `len < 2`.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len >= 2, "cannot draw a non-zero index below {}", len);
        let span = (len - 1) as f32;
        let index = (self.next_unit() * span) as usize + 1;
        index.min(len - 1)
    }
}
