//! Deterministic pseudo-random source for the flicker pattern.

use core::num::NonZeroU32;

/// Feedback taps for x^32 + x^31 + x^29 + x + 1 in Galois form.
pub const TAPS: u32 = 0xD000_0001;

/// Seed used when none is configured. Gives the same flicker on every power-up.
pub const DEFAULT_SEED: NonZeroU32 = match NonZeroU32::new(0xBEEF_CACE) {
    Some(seed) => seed,
    None => panic!("default seed must be nonzero"),
};

/// 32-bit Galois linear-feedback shift register.
///
/// The register never reaches zero from a nonzero seed, which is why the
/// constructor only accepts [`NonZeroU32`]. Period is 2^32 - 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lfsr {
    state: u32,
}

impl Lfsr {
    /// Creates a generator seeded with `seed`.
    #[inline]
    pub const fn new(seed: NonZeroU32) -> Self {
        Self { state: seed.get() }
    }

    /// Advances the register one step and returns the new state.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        let feedback = if self.state & 1 != 0 { TAPS } else { 0 };
        self.state = (self.state >> 1) ^ feedback;
        self.state
    }

    /// Current register value without advancing.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_produces_golden_sequence() {
        let mut rng = Lfsr::default();

        assert_eq!(rng.next(), 0x5F77_E567);
        assert_eq!(rng.next(), 0xFFBB_F2B2);
        assert_eq!(rng.next(), 0x7FDD_F959);
        assert_eq!(rng.next(), 0xEFEE_FCAD);
    }

    #[test]
    fn same_seed_repeats_exactly() {
        let mut a = Lfsr::default();
        let mut b = Lfsr::default();

        for _ in 0..10_000 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn never_yields_zero_from_nonzero_seed() {
        let mut rng = Lfsr::new(NonZeroU32::new(1).unwrap());

        for _ in 0..100_000 {
            assert_ne!(rng.next(), 0);
        }
    }

    #[test]
    fn odd_state_applies_taps() {
        let mut rng = Lfsr::new(NonZeroU32::new(1).unwrap());
        assert_eq!(rng.next(), TAPS);
        assert_eq!(rng.state(), TAPS);
    }
}
