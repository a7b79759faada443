//! Seeded randomness for the engine.
//!
//! Everything stochastic in a game (table leaves, node cosmetics, layer sizes
//! and every per-tick coin flip) is drawn from one [`RandomSource`], so a seed
//! plus the same external inputs replays the same game.

use crate::error::{EngineError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Contract the engine needs from a random generator.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn random(&mut self) -> f64;

    /// Uniform integer in `[min, max]`, both ends inclusive.
    fn int_between(&mut self, min: i64, max: i64) -> Result<i64>;

    /// Weighted coin flip; `prob` outside `[0, 1]` saturates.
    fn bool_with_prob(&mut self, prob: f64) -> bool {
        self.random() < prob
    }

    fn bounded_float(&mut self, lower: f64, upper: f64) -> f64 {
        self.random() * (upper - lower) + lower
    }

    /// Draws `c` in `[0, bound)` and returns `c` or `1 - c` with equal odds.
    ///
    /// Small bounds push the result towards 0 or 1.
    fn correlation(&mut self, bound: f64) -> f64 {
        let corr = self.random() * bound;
        if self.bool_with_prob(0.5) {
            corr
        } else {
            1.0 - corr
        }
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.int_between(0, items.len() as i64 - 1).ok()?;
        items.get(idx as usize)
    }

    /// `k` distinct elements, in draw order.
    fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Result<Vec<T>> {
        let n = items.len();
        if k > n {
            return Err(EngineError::SampleTooLarge {
                requested: k,
                available: n,
            });
        }
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = self.int_between(i as i64, n as i64 - 1)? as usize;
            pool.swap(i, j);
        }
        Ok(pool[..k].iter().map(|&i| items[i].clone()).collect())
    }

    /// Picks from `(value, weight)` pairs; weights need not sum to 1.
    fn multinomial_choice<'a, T>(&mut self, weights: &'a [(T, f64)]) -> Option<&'a T> {
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let threshold = self.bounded_float(0.0, total);
        let mut running = 0.0;
        for (value, weight) in weights {
            running += weight;
            if running >= threshold {
                return Some(value);
            }
        }
        weights.last().map(|(value, _)| value)
    }
}

/// ChaCha-backed [`RandomSource`].
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    #[must_use]
    pub fn from_u64(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from an arbitrary string such as a game name.
    #[must_use]
    pub fn from_seed_str(seed: &str) -> Self {
        Self::from_u64(seed_from_str(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Self::from_u64(seed)
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn random(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn int_between(&mut self, min: i64, max: i64) -> Result<i64> {
        if min > max {
            return Err(EngineError::InvalidRange { min, max });
        }
        Ok(self.rng.gen_range(min..=max))
    }
}

/// First 8 bytes (little endian) of the SHA-256 of `seed`.
#[must_use]
pub fn seed_from_str(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededRandom::from_seed_str("abc123");
        let mut b = SeededRandom::from_seed_str("abc123");
        for _ in 0..64 {
            assert_eq!(a.random().to_bits(), b.random().to_bits());
        }
        assert_eq!(a.seed(), seed_from_str("abc123"));
    }

    #[test]
    fn test_different_seed_strings_diverge() {
        assert_ne!(seed_from_str("abc123"), seed_from_str("abc124"));
    }

    #[test]
    fn test_random_in_unit_interval() {
        let mut rng = SeededRandom::from_u64(7);
        for _ in 0..1000 {
            let r = rng.random();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_int_between_inclusive() {
        let mut rng = SeededRandom::from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let v = rng.int_between(2, 5).expect("valid range");
            assert!((2..=5).contains(&v));
            seen.insert(v);
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(rng.int_between(3, 3), Ok(3));
    }

    #[test]
    fn test_int_between_rejects_empty_range() {
        let mut rng = SeededRandom::from_u64(11);
        assert_eq!(
            rng.int_between(5, 2),
            Err(EngineError::InvalidRange { min: 5, max: 2 })
        );
    }

    #[test]
    fn test_bool_with_prob_extremes() {
        let mut rng = SeededRandom::from_u64(3);
        for _ in 0..200 {
            assert!(rng.bool_with_prob(1.0));
            assert!(!rng.bool_with_prob(0.0));
        }
    }

    #[test]
    fn test_correlation_stays_near_extremes() {
        let mut rng = SeededRandom::from_u64(5);
        for _ in 0..500 {
            let c = rng.correlation(0.1);
            assert!(c < 0.1 || c > 0.9, "correlation {c} escaped the bound");
        }
    }

    #[test]
    fn test_sample_distinct() {
        let mut rng = SeededRandom::from_u64(9);
        let items: Vec<u32> = (0..20).collect();
        let picked = rng.sample(&items, 20).expect("k == n is allowed");
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 20);
        assert!(rng.sample(&items, 0).expect("empty sample").is_empty());
    }

    #[test]
    fn test_sample_too_many_fails() {
        let mut rng = SeededRandom::from_u64(9);
        assert_eq!(
            rng.sample(&[1, 2, 3], 4),
            Err(EngineError::SampleTooLarge {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_multinomial_choice_respects_zero_weight() {
        let mut rng = SeededRandom::from_u64(13);
        let weights = [("never", 0.0), ("always", 1.0)];
        for _ in 0..100 {
            assert_eq!(rng.multinomial_choice(&weights), Some(&"always"));
        }
        let empty: [(&str, f64); 0] = [];
        assert_eq!(rng.multinomial_choice(&empty), None);
    }

    #[test]
    fn test_choice_empty_is_none() {
        let mut rng = SeededRandom::from_u64(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choice(&empty), None);
        assert_eq!(rng.choice(&[42]), Some(&42));
    }
}
