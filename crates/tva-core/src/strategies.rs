//! Alternative ballot generation.
//!
//! The analyzers explore, for one voter at a time, ballots that reorder
//! the voter's sincere ballot. The sincere ballot itself is never
//! produced, so a voter can never "manipulate" by telling the truth.

use std::collections::BTreeSet;

use itertools::{Either, Itertools};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;
use tva_profile::Ballot;

use crate::config::SearchSpace;

/// Successive duplicate draws after which sampling gives up.
pub const DUPLICATE_DRAW_LIMIT: usize = 15;

/// Alternative ballots for `ballot` within `space`.
///
/// Exhaustive search lazily yields every other permutation in
/// lexicographic order of the ballot's positions and never touches
/// `rng`. Sampled search shuffles the ballot up front until it holds
/// `limit` distinct alternatives or draws [`DUPLICATE_DRAW_LIMIT`]
/// duplicates in a row.
///
/// # Example
///
/// ```rust
/// use tva_core::{alternative_ballots, SearchSpace};
/// use tva_profile::Ballot;
///
/// let sincere = Ballot::from_indices([0, 1, 2]);
/// let mut rng = SearchSpace::Exhaustive.rng();
/// let alternatives: Vec<Ballot> =
///     alternative_ballots(&sincere, &SearchSpace::Exhaustive, &mut rng).collect();
///
/// assert_eq!(alternatives.len(), 5);
/// assert!(!alternatives.contains(&sincere));
/// ```
pub fn alternative_ballots<'a, R: Rng + ?Sized>(
    ballot: &'a Ballot,
    space: &SearchSpace,
    rng: &mut R,
) -> impl Iterator<Item = Ballot> + 'a {
    match *space {
        SearchSpace::Exhaustive => Either::Left(
            ballot
                .iter()
                .permutations(ballot.len())
                .map(Ballot::new)
                .filter(move |alternative| alternative != ballot),
        ),
        SearchSpace::Sampled { limit, .. } => Either::Right(sample(ballot, limit, rng).into_iter()),
    }
}

fn sample<R: Rng + ?Sized>(ballot: &Ballot, limit: usize, rng: &mut R) -> Vec<Ballot> {
    let mut order = ballot.as_slice().to_vec();
    let mut seen = BTreeSet::new();
    let mut found = Vec::new();
    let mut duplicates = 0;

    while found.len() < limit && duplicates < DUPLICATE_DRAW_LIMIT {
        order.shuffle(rng);
        let alternative = Ballot::new(order.clone());
        if alternative == *ballot || !seen.insert(alternative.clone()) {
            duplicates += 1;
            continue;
        }
        duplicates = 0;
        found.push(alternative);
    }

    let reachable = limit.min(available(ballot.len()));
    if found.len() < reachable {
        warn!(
            found = found.len(),
            requested = limit,
            "sampling stopped after {} duplicate draws",
            DUPLICATE_DRAW_LIMIT
        );
    }
    found
}

/// Number of alternatives to a ballot of `len` candidates, saturating.
fn available(len: usize) -> usize {
    (1..=len)
        .try_fold(1usize, |acc, k| acc.checked_mul(k))
        .map_or(usize::MAX, |permutations| permutations - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sampled(limit: usize) -> SearchSpace {
        SearchSpace::Sampled {
            limit,
            seed: Some(11),
        }
    }

    #[test]
    fn test_exhaustive_lexicographic_order() {
        let sincere = Ballot::from_indices([2, 0, 1]);
        let mut rng = StdRng::seed_from_u64(0);
        let found: Vec<Ballot> =
            alternative_ballots(&sincere, &SearchSpace::Exhaustive, &mut rng).collect();
        let expected: Vec<Ballot> = [[2, 1, 0], [0, 2, 1], [0, 1, 2], [1, 2, 0], [1, 0, 2]]
            .into_iter()
            .map(Ballot::from_indices)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_exhaustive_single_candidate() {
        let mut rng = StdRng::seed_from_u64(0);
        let single = Ballot::from_indices([0]);
        let mut found = alternative_ballots(&single, &SearchSpace::Exhaustive, &mut rng);
        assert!(found.next().is_none());
    }

    #[test]
    fn test_exhaustive_count() {
        let mut rng = StdRng::seed_from_u64(0);
        let sincere = Ballot::from_indices(0..5);
        let found: Vec<Ballot> =
            alternative_ballots(&sincere, &SearchSpace::Exhaustive, &mut rng).collect();
        assert_eq!(found.len(), 119);
        assert_eq!(found.iter().collect::<BTreeSet<_>>().len(), 119);
    }

    #[test]
    fn test_exhaustive_is_lazy() {
        // 12! orderings; only the first few are ever built
        let sincere = Ballot::from_indices(0..12);
        let mut rng = StdRng::seed_from_u64(0);
        let first: Vec<Ballot> = alternative_ballots(&sincere, &SearchSpace::Exhaustive, &mut rng)
            .take(2)
            .collect();
        assert_eq!(
            first,
            vec![
                Ballot::from_indices((0..10).chain([11, 10])),
                Ballot::from_indices((0..9).chain([10, 9, 11])),
            ]
        );
    }

    #[test]
    fn test_sampled_respects_limit() {
        let sincere = Ballot::from_indices(0..6);
        let mut rng = sampled(10).rng();
        let found: Vec<Ballot> = alternative_ballots(&sincere, &sampled(10), &mut rng).collect();
        assert_eq!(found.len(), 10);
        assert!(!found.contains(&sincere));
        assert_eq!(found.iter().collect::<BTreeSet<_>>().len(), 10);
    }

    #[test]
    fn test_sampled_is_reproducible() {
        let sincere = Ballot::from_indices(0..5);
        let first: Vec<Ballot> =
            alternative_ballots(&sincere, &sampled(20), &mut sampled(20).rng()).collect();
        let second: Vec<Ballot> =
            alternative_ballots(&sincere, &sampled(20), &mut sampled(20).rng()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampled_small_space_terminates() {
        // only one alternative exists
        let sincere = Ballot::from_indices([0, 1]);
        let mut rng = sampled(100).rng();
        let found: Vec<Ballot> = alternative_ballots(&sincere, &sampled(100), &mut rng).collect();
        assert_eq!(found, vec![Ballot::from_indices([1, 0])]);
    }

    #[test]
    fn test_available() {
        assert_eq!(available(1), 0);
        assert_eq!(available(3), 5);
        assert_eq!(available(40), usize::MAX);
    }
}
