#![forbid(unsafe_code)]

//! Random array generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest generated value (shortest bar).
pub const VALUE_MIN: u32 = 20;

/// Largest generated value (tallest bar).
pub const VALUE_MAX: u32 = 319;

/// Produces fresh arrays of bar heights drawn uniformly from
/// `VALUE_MIN..=VALUE_MAX`.
#[derive(Debug, Clone)]
pub struct ArrayGenerator {
    rng: StdRng,
}

impl Default for ArrayGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayGenerator {
    /// Generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and reproducible sessions.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a new array of length `n`. No ordering is implied.
    pub fn generate(&mut self, n: usize) -> Vec<u32> {
        (0..n)
            .map(|_| self.rng.gen_range(VALUE_MIN..=VALUE_MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_has_requested_length() {
        let mut generator = ArrayGenerator::new();
        assert_eq!(generator.generate(1).len(), 1);
        assert_eq!(generator.generate(57).len(), 57);
        assert!(generator.generate(0).is_empty());
    }

    #[test]
    fn values_stay_in_display_range() {
        let mut generator = ArrayGenerator::seeded(7);
        let values = generator.generate(2_000);
        assert!(
            values
                .iter()
                .all(|v| (VALUE_MIN..=VALUE_MAX).contains(v))
        );
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = ArrayGenerator::seeded(42).generate(30);
        let b = ArrayGenerator::seeded(42).generate(30);
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_generate_keeps_length_only() {
        let mut generator = ArrayGenerator::seeded(1);
        let first = generator.generate(40);
        let second = generator.generate(40);
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }
}
