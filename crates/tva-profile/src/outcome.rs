//! Election outcome records: raw scores and the derived ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::profile::CandidateId;

/// Raw per-candidate scores produced by a voting rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally(BTreeMap<CandidateId, f64>);

impl Tally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tally giving each of `candidates` a score of zero.
    pub fn zeroed(candidates: usize) -> Self {
        (0..candidates).map(|c| (CandidateId(c), 0.0)).collect()
    }

    /// Adds points to a candidate, starting from zero if unseen.
    pub fn add(&mut self, candidate: CandidateId, points: f64) {
        *self.0.entry(candidate).or_insert(0.0) += points;
    }

    /// Overwrites a candidate's score.
    pub fn set(&mut self, candidate: CandidateId, score: f64) {
        self.0.insert(candidate, score);
    }

    /// Score of a candidate, if the rule reported one.
    pub fn score(&self, candidate: CandidateId) -> Option<f64> {
        self.0.get(&candidate).copied()
    }

    /// Iterates `(candidate, score)` in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, f64)> + '_ {
        self.0.iter().map(|(&c, &s)| (c, s))
    }

    /// Number of scored candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no candidate was scored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CandidateId, f64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (CandidateId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Candidates ordered from winner to last place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking(Vec<CandidateId>);

impl Ranking {
    /// Wraps an already ordered candidate list.
    pub fn new(order: Vec<CandidateId>) -> Self {
        Self(order)
    }

    /// The first-placed candidate.
    pub fn winner(&self) -> Option<CandidateId> {
        self.0.first().copied()
    }

    /// Place (0 = winner) of a candidate.
    pub fn position(&self, candidate: CandidateId) -> Option<usize> {
        self.0.iter().position(|&c| c == candidate)
    }

    /// The ranking as a slice.
    pub fn as_slice(&self) -> &[CandidateId] {
        &self.0
    }

    /// Iterates from winner to last place.
    pub fn iter(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.0.iter().copied()
    }

    /// Number of ranked candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nobody is ranked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The result of running a voting rule on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Raw scores as reported by the rule.
    pub tally: Tally,
    /// Scores resolved into a total order.
    pub ranking: Ranking,
}

impl Outcome {
    /// The winning candidate.
    pub fn winner(&self) -> Option<CandidateId> {
        self.ranking.winner()
    }
}
