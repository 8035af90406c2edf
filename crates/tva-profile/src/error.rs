//! Error types for preference profile construction.
//!
//! A profile is validated once, when it is built. Every component
//! downstream assumes the shape invariants checked here.

use thiserror::Error;

/// Result type alias for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Errors raised when a preference profile is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The profile names no candidates.
    #[error("profile has no candidates")]
    NoCandidates,

    /// The profile contains no ballots.
    #[error("profile has no voters")]
    NoVoters,

    /// The same candidate label appears twice in the candidate list.
    #[error("duplicate candidate label '{0}'")]
    DuplicateCandidate(String),

    /// A ballot references a candidate that is not part of the profile.
    #[error("unknown candidate '{0}'")]
    UnknownCandidate(String),

    /// A row of the preference matrix has the wrong number of voters.
    #[error("preference row {row} has {found} entries, expected {expected}")]
    NonRectangular {
        /// Index of the offending row (preference rank).
        row: usize,
        /// Number of voters implied by the first row.
        expected: usize,
        /// Number of entries actually present.
        found: usize,
    },

    /// A ballot does not rank every candidate.
    #[error("ballot of voter {voter} ranks {found} candidates, expected {expected}")]
    BallotLength {
        /// Voter index.
        voter: usize,
        /// Number of candidates in the profile.
        expected: usize,
        /// Number of candidates on the ballot.
        found: usize,
    },

    /// A ballot lists some candidate more than once.
    #[error("ballot of voter {voter} is not a permutation of the candidates")]
    NotAPermutation {
        /// Voter index.
        voter: usize,
    },

    /// A voter index outside the profile was requested.
    #[error("voter {voter} is out of range for a profile of {voters} voters")]
    VoterOutOfRange {
        /// Requested voter index.
        voter: usize,
        /// Number of voters in the profile.
        voters: usize,
    },
}
