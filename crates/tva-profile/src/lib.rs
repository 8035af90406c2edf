//! # Tactical Voting Profiles
//!
//! Data model shared by every stage of tactical voting analysis.
//!
//! ## Overview
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Profile`] | Validated (candidates × voters) matrix of strict rankings |
//! | [`Ballot`] | One voter's column, best first |
//! | [`Tally`] | Raw candidate scores reported by a voting rule |
//! | [`Ranking`] | Scores resolved into a total order |
//! | [`Outcome`] | Tally plus ranking |
//! | [`OptionSet`] | The insincere ballots that make one voter happier |
//!
//! Profiles are validated once at construction and never mutated; every
//! "what-if" profile is an independent copy produced by
//! [`Profile::with_ballot`].
//!
//! ## Usage
//!
//! ```rust
//! use tva_profile::{Ballot, Profile};
//!
//! let profile = Profile::from_rows(&[vec!["A", "B"], vec!["B", "A"]])?;
//! let lie = profile.with_ballot(0, Ballot::from_indices([1, 0]))?;
//!
//! assert_ne!(lie, profile);
//! # Ok::<(), tva_profile::ProfileError>(())
//! ```

mod error;
mod options;
mod outcome;
mod profile;

pub use error::{ProfileError, Result};
pub use options::{OptionSet, StrategicOption};
pub use outcome::{Outcome, Ranking, Tally};
pub use profile::{Ballot, CandidateId, Profile, ProfileDocument};
