//! Error types for voting rules, happiness measures and risk measures.
//!
//! Any failure raised while a strategy is evaluating is reported as a
//! [`SchemeError`] and propagated unmodified by the analyzers.

use thiserror::Error;
use tva_profile::{CandidateId, ProfileError};

/// Errors that can occur while a strategy is evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    /// A voting rule did not report a finite score for a candidate.
    #[error("voting rule '{rule}' reported no usable score for candidate {candidate}")]
    MissingScore {
        /// Name of the voting rule.
        rule: String,
        /// Candidate without a score.
        candidate: CandidateId,
    },

    /// A strategy was configured with an unusable parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two orders that must rank the same candidates differ in length.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected number of candidates.
        expected: usize,
        /// Actual number of candidates.
        found: usize,
    },

    /// A strategy failed for a reason of its own.
    #[error("'{measure}' failed: {reason}")]
    Failed {
        /// Name of the failing strategy.
        measure: String,
        /// Description of the failure.
        reason: String,
    },

    /// A strategy built an invalid profile.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_score_display() {
        let err = SchemeError::MissingScore {
            rule: "Borda".to_string(),
            candidate: CandidateId(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("Borda"));
        assert!(msg.contains("#2"));
    }

    #[test]
    fn test_failed_display() {
        let err = SchemeError::Failed {
            measure: "NDCG".to_string(),
            reason: "empty ranking".to_string(),
        };
        assert!(err.to_string().contains("empty ranking"));
    }

    #[test]
    fn test_profile_error_passthrough() {
        let err: SchemeError = ProfileError::NoVoters.into();
        assert!(err.to_string().contains("no voters"));
    }
}
