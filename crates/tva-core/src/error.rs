//! Error types for tactical voting analysis.

use thiserror::Error;
use tva_profile::ProfileError;
use tva_schemes::SchemeError;

/// Errors surfaced by [`Btva`](crate::Btva) and [`Atva`](crate::Atva).
///
/// An analysis either returns a complete result or one of these errors;
/// partial results are never produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The profile is malformed.
    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    /// Collusion analysis was asked of fewer than two voters.
    #[error("Collusion analysis needs at least 2 voters, found {found}")]
    InsufficientVoters {
        /// Number of voters in the profile.
        found: usize,
    },

    /// A voter pair does not name two distinct voters of the profile.
    #[error("Invalid voter pair ({first}, {second}) for a profile of {voters} voters")]
    InvalidPair {
        /// First voter of the pair.
        first: usize,
        /// Second voter of the pair.
        second: usize,
        /// Number of voters in the profile.
        voters: usize,
    },

    /// A voting rule, happiness measure or risk measure failed.
    #[error("Capability error: {0}")]
    Capability(#[from] SchemeError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
