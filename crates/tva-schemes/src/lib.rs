//! # Tactical Voting Schemes
//!
//! Pluggable strategies consumed by the tactical voting analyzers, and
//! the outcome resolver that turns rule scores into rankings.
//!
//! ## Capabilities
//!
//! | Trait | Input | Output |
//! |-------|-------|--------|
//! | [`VotingRule`] | Profile | Score per candidate |
//! | [`HappinessMeasure`] | Preference and ranking | Happiness of one voter |
//! | [`RiskMeasure`] | Profile, happiness and strategic options | Risk value |
//!
//! Strategies are selected at run time; the analyzers only depend on the
//! traits. Every trait is implemented for `Box<T>` and `&T`, so boxed
//! trait objects plug in directly.
//!
//! ## Usage
//!
//! ```rust
//! use tva_profile::Profile;
//! use tva_schemes::{resolve, Borda, HappinessMeasure, Ndcg};
//!
//! let profile = Profile::from_rows(&[vec!["A", "B"], vec!["B", "A"], vec!["C", "C"]])?;
//! let outcome = resolve(&Borda, &profile)?;
//! let happiness = Ndcg::new().measure(profile.ballot(0)?, &outcome.ranking)?;
//!
//! assert!((0.0..=1.0).contains(&happiness));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod happiness;
pub mod resolver;
pub mod risk;
pub mod voting;

pub use error::SchemeError;
pub use happiness::{BubbleSortDistance, HappinessMeasure, Ndcg, PositionMatch, WeightedDisplacement};
pub use resolver::{rank, resolve};
pub use risk::{
    inversion_distance, CollusionChange, FlipReward, JointFlipReward, RiskMeasure,
    StrategicVotingProbability, WinnerChange,
};
pub use voting::{AntiPlurality, Borda, Plurality, TieBreak, VoteForTwo, VotingRule};

/// Result type for strategy evaluation.
pub type Result<T> = std::result::Result<T, SchemeError>;
