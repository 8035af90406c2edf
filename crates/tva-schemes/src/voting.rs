//! Voting rules.
//!
//! A [`VotingRule`] aggregates a whole profile into one score per
//! candidate. Rules must be pure functions of the profile: the analyzers
//! call them thousands of times on near-identical copies.
//!
//! All rules shipped here are positional scoring rules:
//!
//! | Rule | Points for rank `r` of `m` |
//! |------|----------------------------|
//! | [`Plurality`] | 1 if `r = 0` |
//! | [`VoteForTwo`] | 1 if `r < 2` |
//! | [`AntiPlurality`] | 1 if `r < m - 1` |
//! | [`Borda`] | `m - 1 - r` |

use serde::{Deserialize, Serialize};
use tva_profile::{Profile, Tally};

use crate::Result;

/// How candidates with equal scores are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// Lower candidate id first (stable on enumeration order).
    #[default]
    CandidateOrder,
    /// Alphabetically smaller label first.
    Label,
}

/// Trait for voting rules.
///
/// # Implementors
///
/// - [`Plurality`], [`VoteForTwo`], [`AntiPlurality`], [`Borda`]
pub trait VotingRule: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Scores every candidate of the profile.
    ///
    /// # Errors
    ///
    /// Any error is propagated unmodified to the caller of the analysis.
    fn tally(&self, profile: &Profile) -> Result<Tally>;

    /// Tie-break applied when resolving the tally into a ranking.
    fn tie_break(&self) -> TieBreak {
        TieBreak::CandidateOrder
    }
}

impl<R: VotingRule + ?Sized> VotingRule for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn tally(&self, profile: &Profile) -> Result<Tally> {
        (**self).tally(profile)
    }

    fn tie_break(&self) -> TieBreak {
        (**self).tie_break()
    }
}

impl<R: VotingRule + ?Sized> VotingRule for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn tally(&self, profile: &Profile) -> Result<Tally> {
        (**self).tally(profile)
    }

    fn tie_break(&self) -> TieBreak {
        (**self).tie_break()
    }
}

/// Scores a profile by awarding `points(rank, m)` for every ballot position.
fn positional_tally(profile: &Profile, points: impl Fn(usize, usize) -> f64) -> Tally {
    let m = profile.num_candidates();
    let mut tally = Tally::zeroed(m);
    for ballot in profile.ballots() {
        for (rank, candidate) in ballot.iter().enumerate() {
            let p = points(rank, m);
            if p != 0.0 {
                tally.add(candidate, p);
            }
        }
    }
    tally
}

/// Each voter gives one point to their top choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plurality;

impl VotingRule for Plurality {
    fn name(&self) -> &str {
        "Plurality"
    }

    fn tally(&self, profile: &Profile) -> Result<Tally> {
        Ok(positional_tally(profile, |rank, _| {
            if rank == 0 {
                1.0
            } else {
                0.0
            }
        }))
    }
}

/// Each voter gives one point to each of their top two choices.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteForTwo;

impl VotingRule for VoteForTwo {
    fn name(&self) -> &str {
        "VoteForTwo"
    }

    fn tally(&self, profile: &Profile) -> Result<Tally> {
        Ok(positional_tally(profile, |rank, _| {
            if rank < 2 {
                1.0
            } else {
                0.0
            }
        }))
    }
}

/// Each voter gives one point to everyone except their last choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntiPlurality;

impl VotingRule for AntiPlurality {
    fn name(&self) -> &str {
        "AntiPlurality"
    }

    fn tally(&self, profile: &Profile) -> Result<Tally> {
        Ok(positional_tally(profile, |rank, m| {
            if rank + 1 < m {
                1.0
            } else {
                0.0
            }
        }))
    }
}

/// Rank `r` earns `m - 1 - r` points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Borda;

impl VotingRule for Borda {
    fn name(&self) -> &str {
        "Borda"
    }

    fn tally(&self, profile: &Profile) -> Result<Tally> {
        Ok(positional_tally(profile, |rank, m| (m - 1 - rank) as f64))
    }
}
