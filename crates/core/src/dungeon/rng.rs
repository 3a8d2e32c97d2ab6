//! Seedable random source threaded through every generation phase.

use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub struct DungeonRng {
    inner: ChaCha8Rng,
}

impl DungeonRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform draw in `0..bound`. Rejection sampling keeps it free of modulo bias.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        let bound = bound as u64;
        let rejected_tail = (u64::MAX - bound + 1) % bound;
        let zone = u64::MAX - rejected_tail;
        loop {
            let value = self.inner.next_u64();
            if value <= zone {
                return (value % bound) as usize;
            }
        }
    }

    pub fn range_inclusive(&mut self, min_value: u32, max_value: u32) -> u32 {
        debug_assert!(min_value <= max_value);
        let span = (max_value - min_value) as usize + 1;
        min_value + self.below(span) as u32
    }

    pub fn coin_flip(&mut self) -> bool {
        self.inner.next_u64() & 1 == 1
    }

    /// Picks an index with probability proportional to its weight. Weights must not all
    /// be zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|&weight| u64::from(weight)).sum();
        debug_assert!(total > 0);
        let mut roll = self.below(total as usize) as u64;
        for (index, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if roll < weight {
                return index;
            }
            roll -= weight;
        }
        weights.len() - 1
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for upper in (1..items.len()).rev() {
            let swap_with = self.below(upper + 1);
            items.swap(upper, swap_with);
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.below(items.len()))
    }
}

/// Where a run's seed came from. A generated seed is kept so the run can be replayed by
/// configuring it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedChoice {
    Configured(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn resolve(configured: Option<u64>) -> Self {
        configured.map_or_else(|| Self::Generated(generate_runtime_seed()), Self::Configured)
    }

    pub fn value(self) -> u64 {
        match self {
            Self::Configured(seed) | Self::Generated(seed) => seed,
        }
    }

    pub fn is_generated(self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

impl fmt::Display for SeedChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured(seed) => write!(f, "{seed}"),
            Self::Generated(seed) => write!(f, "{seed} (generated)"),
        }
    }
}

static RUNTIME_SEEDS_ISSUED: AtomicU64 = AtomicU64::new(0);

fn generate_runtime_seed() -> u64 {
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let issued = RUNTIME_SEEDS_ISSUED.fetch_add(1, Ordering::Relaxed);
    let pid = u64::from(process::id()) << 32;
    splitmix_finalize(splitmix_finalize(clock ^ pid) ^ issued)
}

fn splitmix_finalize(mut value: u64) -> u64 {
    value = (value ^ (value >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn below_stays_inside_requested_bound() {
        let mut rng = DungeonRng::from_seed(12_345);
        for bound in 1..40 {
            for _ in 0..50 {
                assert!(rng.below(bound) < bound);
            }
        }
    }

    #[test]
    fn range_inclusive_hits_both_ends() {
        let mut rng = DungeonRng::from_seed(7);
        let seen: BTreeSet<u32> = (0..500).map(|_| rng.range_inclusive(3, 6)).collect();
        assert_eq!(seen, BTreeSet::from([3, 4, 5, 6]));
    }

    #[test]
    fn range_inclusive_with_equal_bounds_is_constant() {
        let mut rng = DungeonRng::from_seed(1);
        assert!((0..20).all(|_| rng.range_inclusive(4, 4) == 4));
    }

    #[test]
    fn weighted_index_never_picks_zero_weight() {
        let mut rng = DungeonRng::from_seed(99);
        for _ in 0..500 {
            assert_ne!(rng.weighted_index(&[3, 0, 1, 2]), 1);
        }
    }

    #[test]
    fn shuffle_is_a_permutation_and_seed_stable() {
        let mut left: Vec<u32> = (0..32).collect();
        let mut right = left.clone();
        DungeonRng::from_seed(42).shuffle(&mut left);
        DungeonRng::from_seed(42).shuffle(&mut right);
        assert_eq!(left, right);

        let mut sorted = left.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
        assert_ne!(left, sorted, "32 elements should not shuffle back to identity");
    }

    #[test]
    fn same_seed_yields_same_stream() {
        let mut a = DungeonRng::from_seed(2_026);
        let mut b = DungeonRng::from_seed(2_026);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn generated_seed_changes_between_calls() {
        let first = generate_runtime_seed();
        let second = generate_runtime_seed();
        assert_ne!(first, second, "runtime seed generation should vary per call");
    }

    #[test]
    fn configured_seed_wins_over_generation() {
        let choice = SeedChoice::resolve(Some(4_242));
        assert_eq!(choice, SeedChoice::Configured(4_242));
        assert_eq!(choice.value(), 4_242);
        assert!(!choice.is_generated());
        assert_eq!(choice.to_string(), "4242");
    }

    #[test]
    fn missing_seed_is_generated_and_labelled() {
        let choice = SeedChoice::resolve(None);
        assert!(choice.is_generated());
        assert_eq!(choice.to_string(), format!("{} (generated)", choice.value()));
    }
}
