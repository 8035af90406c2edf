//! Voter-pair selection for collusion analysis.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Chooses the two voters whose collusion options are analyzed.
pub trait PairSampler {
    /// Picks two distinct voter indices below `voters`.
    ///
    /// Callers guarantee `voters >= 2`. The analyzer rejects any pair that
    /// is out of range or names the same voter twice.
    fn sample_pair(&mut self, voters: usize) -> (usize, usize);
}

impl<S: PairSampler + ?Sized> PairSampler for &mut S {
    fn sample_pair(&mut self, voters: usize) -> (usize, usize) {
        (**self).sample_pair(voters)
    }
}

/// Uniform sampling without replacement.
#[derive(Debug, Clone)]
pub struct RandomPairs {
    rng: StdRng,
}

impl RandomPairs {
    /// Reproducible sampler.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, entropy-seeded otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl Default for RandomPairs {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl PairSampler for RandomPairs {
    fn sample_pair(&mut self, voters: usize) -> (usize, usize) {
        let picked = index::sample(&mut self.rng, voters, 2);
        (picked.index(0), picked.index(1))
    }
}

/// Always returns the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPair(pub usize, pub usize);

impl PairSampler for FixedPair {
    fn sample_pair(&mut self, _voters: usize) -> (usize, usize) {
        (self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pairs_are_distinct_and_in_range() {
        let mut sampler = RandomPairs::seeded(5);
        for voters in 2..20 {
            let (a, b) = sampler.sample_pair(voters);
            assert_ne!(a, b);
            assert!(a < voters && b < voters);
        }
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let mut first = RandomPairs::seeded(99);
        let mut second = RandomPairs::from_seed(Some(99));
        for _ in 0..10 {
            assert_eq!(first.sample_pair(50), second.sample_pair(50));
        }
    }

    #[test]
    fn test_two_voters_always_pair_both() {
        let mut sampler = RandomPairs::from_entropy();
        let (a, b) = sampler.sample_pair(2);
        assert_eq!(a + b, 1);
    }

    #[test]
    fn test_fixed_pair() {
        let mut sampler = FixedPair(3, 1);
        assert_eq!(sampler.sample_pair(10), (3, 1));
        assert_eq!((&mut sampler).sample_pair(10), (3, 1));
    }
}
