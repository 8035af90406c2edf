//! Per-call outcome memoization.

use std::collections::HashMap;

use tracing::debug;
use tva_profile::{Ballot, Profile, Ranking};
use tva_schemes::{resolve, VotingRule};

/// Rankings of the what-if profiles seen during one analysis call.
///
/// Keyed on the full ballot list of the profile. A disabled cache
/// resolves every request.
#[derive(Debug, Default)]
pub(crate) struct OutcomeCache {
    rankings: Option<HashMap<Vec<Ballot>, Ranking>>,
    hits: usize,
    misses: usize,
}

impl OutcomeCache {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            rankings: enabled.then(HashMap::new),
            hits: 0,
            misses: 0,
        }
    }

    /// Ranking of `profile` under `rule`.
    pub(crate) fn ranking(
        &mut self,
        rule: &dyn VotingRule,
        profile: &Profile,
    ) -> tva_schemes::Result<Ranking> {
        let Some(rankings) = self.rankings.as_mut() else {
            return Ok(resolve(rule, profile)?.ranking);
        };
        if let Some(ranking) = rankings.get(profile.ballots()) {
            self.hits += 1;
            return Ok(ranking.clone());
        }
        self.misses += 1;
        let ranking = resolve(rule, profile)?.ranking;
        rankings.insert(profile.ballots().to_vec(), ranking.clone());
        Ok(ranking)
    }

    pub(crate) fn report(&self) {
        if self.rankings.is_some() {
            debug!(hits = self.hits, misses = self.misses, "outcome cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tva_schemes::Plurality;

    fn profile() -> Profile {
        Profile::from_rows(&[vec!["A", "B"], vec!["B", "A"]]).unwrap()
    }

    #[test]
    fn test_enabled_cache_hits() {
        let mut cache = OutcomeCache::new(true);
        let first = cache.ranking(&Plurality, &profile()).unwrap();
        let second = cache.ranking(&Plurality, &profile()).unwrap();
        assert_eq!(first, second);
        assert_eq!((cache.hits, cache.misses), (1, 1));
    }

    #[test]
    fn test_disabled_cache_always_resolves() {
        let mut cache = OutcomeCache::new(false);
        cache.ranking(&Plurality, &profile()).unwrap();
        cache.ranking(&Plurality, &profile()).unwrap();
        assert_eq!((cache.hits, cache.misses), (0, 0));
    }
}
