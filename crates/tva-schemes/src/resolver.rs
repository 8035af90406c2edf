//! Outcome resolution.
//!
//! Turns the raw scores of a [`VotingRule`] into a total [`Ranking`].
//! Every analysis path resolves outcomes through [`resolve`], so identical
//! scores always yield identical rankings.

use std::cmp::Ordering;

use tracing::trace;
use tva_profile::{CandidateId, Outcome, Profile, Ranking, Tally};

use crate::error::SchemeError;
use crate::voting::{TieBreak, VotingRule};
use crate::Result;

/// Runs a voting rule on a profile and resolves the resulting ranking.
///
/// # Errors
///
/// Propagates any error raised by the rule, and returns
/// [`SchemeError::MissingScore`] if a candidate has no finite score.
pub fn resolve<R: VotingRule + ?Sized>(rule: &R, profile: &Profile) -> Result<Outcome> {
    let tally = rule.tally(profile)?;
    let ranking = rank(rule.name(), &tally, profile, rule.tie_break())?;
    trace!(rule = rule.name(), winner = ?ranking.winner(), "outcome resolved");
    Ok(Outcome { tally, ranking })
}

/// Orders candidates by descending score.
///
/// Equal scores are ordered by `tie_break`; the sort is stable, so
/// [`TieBreak::CandidateOrder`] keeps enumeration order.
///
/// # Errors
///
/// Returns [`SchemeError::MissingScore`] if any candidate of the profile
/// lacks a finite score.
pub fn rank(
    rule: &str,
    tally: &Tally,
    profile: &Profile,
    tie_break: TieBreak,
) -> Result<Ranking> {
    let mut scored: Vec<(CandidateId, f64)> = Vec::with_capacity(profile.num_candidates());
    for candidate in profile.candidate_ids() {
        match tally.score(candidate) {
            Some(score) if score.is_finite() => scored.push((candidate, score)),
            _ => {
                return Err(SchemeError::MissingScore {
                    rule: rule.to_string(),
                    candidate,
                })
            }
        }
    }

    scored.sort_by(|a, b| {
        b.1.total_cmp(&a.1).then_with(|| match tie_break {
            TieBreak::CandidateOrder => Ordering::Equal,
            TieBreak::Label => profile.label(a.0).cmp(&profile.label(b.0)),
        })
    });

    Ok(Ranking::new(scored.into_iter().map(|(c, _)| c).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::{Borda, Plurality};
    use tva_profile::Ballot;

    struct Partial;

    impl VotingRule for Partial {
        fn name(&self) -> &str {
            "Partial"
        }

        fn tally(&self, _profile: &Profile) -> Result<Tally> {
            Ok([(CandidateId(0), 1.0)].into_iter().collect())
        }
    }

    struct ByLabel;

    impl VotingRule for ByLabel {
        fn name(&self) -> &str {
            "ByLabel"
        }

        fn tally(&self, profile: &Profile) -> Result<Tally> {
            Ok(Tally::zeroed(profile.num_candidates()))
        }

        fn tie_break(&self) -> TieBreak {
            TieBreak::Label
        }
    }

    fn ids(ranking: &Ranking) -> Vec<usize> {
        ranking.iter().map(CandidateId::index).collect()
    }

    #[test]
    fn test_descending_scores() {
        let profile = Profile::from_rows(&[
            vec!["B", "A", "C", "C"],
            vec!["C", "C", "B", "B"],
            vec!["A", "B", "A", "A"],
        ])
        .unwrap();
        let outcome = resolve(&Borda, &profile).unwrap();
        assert_eq!(ids(&outcome.ranking), vec![2, 1, 0]);
        assert_eq!(outcome.winner(), Some(CandidateId(2)));
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        // A and B both get one first-place vote
        let profile = Profile::from_rows(&[vec!["B", "A"], vec!["A", "B"]]).unwrap();
        let outcome = resolve(&Plurality, &profile).unwrap();
        assert_eq!(ids(&outcome.ranking), vec![0, 1]);
    }

    #[test]
    fn test_label_tie_break() {
        let profile = Profile::new(
            vec!["Z".into(), "M".into(), "A".into()],
            vec![Ballot::from_indices([0, 1, 2])],
        )
        .unwrap();
        let outcome = resolve(&ByLabel, &profile).unwrap();
        assert_eq!(ids(&outcome.ranking), vec![2, 1, 0]);
    }

    #[test]
    fn test_missing_score_is_reported() {
        let profile = Profile::from_rows(&[vec!["A"], vec!["B"]]).unwrap();
        let err = resolve(&Partial, &profile).unwrap_err();
        assert_eq!(
            err,
            SchemeError::MissingScore {
                rule: "Partial".to_string(),
                candidate: CandidateId(1),
            }
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let profile = Profile::from_rows(&[
            vec!["A", "B", "C"],
            vec!["B", "C", "A"],
            vec!["C", "A", "B"],
        ])
        .unwrap();
        let first = resolve(&Borda, &profile).unwrap();
        let second = resolve(&Borda, &profile).unwrap();
        assert_eq!(first, second);
    }
}
