//! # Preference Profiles
//!
//! A [`Profile`] is the full matrix of every voter's strict ranking over a
//! fixed candidate set. Conceptually it has shape (candidates × voters):
//! row `r` holds each voter's `r`-th choice and column `i` is voter `i`'s
//! [`Ballot`].
//!
//! ## Invariants
//!
//! - At least one candidate and one voter
//! - Candidate labels are unique
//! - Every ballot is a permutation of the candidate ids
//!
//! These are checked once at construction. Profiles are immutable;
//! "what-if" variants are produced with [`Profile::with_ballot`], which
//! returns an independent copy.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

/// Positional identity of a candidate within a [`Profile`].
///
/// Ids index [`Profile::candidates`]. Ordering by id is the default
/// deterministic tie-break used when resolving rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub usize);

impl CandidateId {
    /// Returns the index of this candidate in the candidate list.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One voter's preference order, best first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ballot(Vec<CandidateId>);

impl Ballot {
    /// Creates a ballot from an ordered list of candidates.
    pub fn new(order: Vec<CandidateId>) -> Self {
        Self(order)
    }

    /// Creates a ballot from raw candidate indices.
    pub fn from_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self(indices.into_iter().map(CandidateId).collect())
    }

    /// Number of candidates ranked on this ballot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the ballot ranks nobody.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ballot as a slice, best first.
    pub fn as_slice(&self) -> &[CandidateId] {
        &self.0
    }

    /// Iterates candidates from most to least preferred.
    pub fn iter(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.0.iter().copied()
    }

    /// The most preferred candidate.
    pub fn top(&self) -> Option<CandidateId> {
        self.0.first().copied()
    }

    /// Rank position (0 = best) of a candidate on this ballot.
    pub fn position(&self, candidate: CandidateId) -> Option<usize> {
        self.0.iter().position(|&c| c == candidate)
    }

    /// Returns true if the ballot ranks each of `0..candidates` exactly once.
    pub fn is_permutation_of(&self, candidates: usize) -> bool {
        if self.0.len() != candidates {
            return false;
        }
        let mut seen = vec![false; candidates];
        for c in &self.0 {
            match seen.get_mut(c.0) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Consumes the ballot, returning the underlying order.
    pub fn into_inner(self) -> Vec<CandidateId> {
        self.0
    }
}

impl From<Vec<CandidateId>> for Ballot {
    fn from(order: Vec<CandidateId>) -> Self {
        Self(order)
    }
}

impl FromIterator<CandidateId> for Ballot {
    fn from_iter<I: IntoIterator<Item = CandidateId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Serialized form of a profile: the (rank × voter) label matrix.
///
/// ```json
/// { "preferences": [["B", "A", "C"], ["A", "C", "B"], ["C", "B", "A"]] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Row `r` lists every voter's `r`-th choice.
    pub preferences: Vec<Vec<String>>,
}

/// A validated preference profile.
///
/// # Example
///
/// ```rust
/// use tva_profile::Profile;
///
/// // voters:      1    2    3    4
/// let profile = Profile::from_rows(&[
///     vec!["B", "A", "C", "C"],
///     vec!["C", "C", "B", "B"],
///     vec!["A", "B", "A", "A"],
/// ])?;
///
/// assert_eq!(profile.num_candidates(), 3);
/// assert_eq!(profile.num_voters(), 4);
/// # Ok::<(), tva_profile::ProfileError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProfileDocument", into = "ProfileDocument")]
pub struct Profile {
    candidates: Vec<String>,
    ballots: Vec<Ballot>,
}

impl Profile {
    /// Builds a profile from explicit candidate labels and ballots.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if there are no candidates or voters,
    /// a label is repeated, or any ballot is not a permutation of the
    /// candidate ids.
    pub fn new(candidates: Vec<String>, ballots: Vec<Ballot>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(ProfileError::NoCandidates);
        }
        let mut labels = BTreeSet::new();
        for label in &candidates {
            if !labels.insert(label.as_str()) {
                return Err(ProfileError::DuplicateCandidate(label.clone()));
            }
        }
        if ballots.is_empty() {
            return Err(ProfileError::NoVoters);
        }
        for (voter, ballot) in ballots.iter().enumerate() {
            check_ballot(voter, ballot, candidates.len())?;
        }
        Ok(Self { candidates, ballots })
    }

    /// Builds a profile from a (rank × voter) matrix of candidate labels.
    ///
    /// Candidates are discovered from the matrix and assigned ids in
    /// sorted label order.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NonRectangular`] for ragged rows, plus any
    /// error [`Profile::new`] reports for the assembled ballots.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        let first = rows.first().ok_or(ProfileError::NoCandidates)?;
        let voters = first.len();
        if voters == 0 {
            return Err(ProfileError::NoVoters);
        }
        for (row, entries) in rows.iter().enumerate() {
            if entries.len() != voters {
                return Err(ProfileError::NonRectangular {
                    row,
                    expected: voters,
                    found: entries.len(),
                });
            }
        }

        let candidates: Vec<String> = rows
            .iter()
            .flatten()
            .map(|label| label.as_ref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let index: HashMap<&str, CandidateId> = candidates
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), CandidateId(i)))
            .collect();

        let ballots = (0..voters)
            .map(|voter| {
                rows.iter()
                    .map(|row| index[row[voter].as_ref()])
                    .collect::<Ballot>()
            })
            .collect();

        Self::new(candidates, ballots)
    }

    /// Number of candidates (`m`).
    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Number of voters (`n`).
    pub fn num_voters(&self) -> usize {
        self.ballots.len()
    }

    /// Candidate labels, indexed by [`CandidateId`].
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// All candidate ids in enumeration order.
    pub fn candidate_ids(&self) -> impl Iterator<Item = CandidateId> {
        (0..self.candidates.len()).map(CandidateId)
    }

    /// Label of a candidate.
    pub fn label(&self, candidate: CandidateId) -> Option<&str> {
        self.candidates.get(candidate.0).map(String::as_str)
    }

    /// Looks up a candidate by label.
    pub fn candidate_id(&self, label: &str) -> Option<CandidateId> {
        self.candidates
            .iter()
            .position(|c| c == label)
            .map(CandidateId)
    }

    /// All ballots in voter order.
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// The ballot of one voter.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::VoterOutOfRange`] for an unknown voter.
    pub fn ballot(&self, voter: usize) -> Result<&Ballot> {
        self.ballots
            .get(voter)
            .ok_or(ProfileError::VoterOutOfRange {
                voter,
                voters: self.ballots.len(),
            })
    }

    /// Returns a copy of this profile with one voter's ballot replaced.
    ///
    /// The original profile is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if `voter` is out of range or `ballot` is not a permutation
    /// of this profile's candidates.
    pub fn with_ballot(&self, voter: usize, ballot: Ballot) -> Result<Self> {
        if voter >= self.ballots.len() {
            return Err(ProfileError::VoterOutOfRange {
                voter,
                voters: self.ballots.len(),
            });
        }
        check_ballot(voter, &ballot, self.candidates.len())?;

        let mut modified = self.clone();
        modified.ballots[voter] = ballot;
        Ok(modified)
    }

    /// Renders a ballot as candidate labels.
    pub fn labels<'a>(&'a self, ballot: &Ballot) -> Vec<&'a str> {
        ballot
            .iter()
            .filter_map(|c| self.label(c))
            .collect()
    }

    /// The (rank × voter) label matrix.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        (0..self.candidates.len())
            .map(|rank| {
                self.ballots
                    .iter()
                    .map(|ballot| self.candidates[ballot.as_slice()[rank].0].clone())
                    .collect()
            })
            .collect()
    }
}

impl TryFrom<ProfileDocument> for Profile {
    type Error = ProfileError;

    fn try_from(document: ProfileDocument) -> Result<Self> {
        Self::from_rows(&document.preferences)
    }
}

impl From<Profile> for ProfileDocument {
    fn from(profile: Profile) -> Self {
        Self {
            preferences: profile.to_rows(),
        }
    }
}

fn check_ballot(voter: usize, ballot: &Ballot, candidates: usize) -> Result<()> {
    if let Some(unknown) = ballot.iter().find(|c| c.0 >= candidates) {
        return Err(ProfileError::UnknownCandidate(unknown.to_string()));
    }
    if ballot.len() != candidates {
        return Err(ProfileError::BallotLength {
            voter,
            expected: candidates,
            found: ballot.len(),
        });
    }
    if !ballot.is_permutation_of(candidates) {
        return Err(ProfileError::NotAPermutation { voter });
    }
    Ok(())
}
