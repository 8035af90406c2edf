//! # Tactical Voting Analysis
//!
//! Finds the insincere ballots that would make voters happier than
//! voting sincerely, and condenses them into a risk signal.
//!
//! ## Analyzers
//!
//! | Analyzer | Question | Cost |
//! |----------|----------|------|
//! | [`Btva`] | Which single voters gain by lying? | `n · (m! - 1)` outcomes |
//! | [`Atva`] | Do two sampled voters both gain by lying? | `2 · (m! - 1)` outcomes |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   TACTICAL VOTING CORE                   │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │   Profile ──► Voting Rule ──► Outcome Resolver           │
//! │                                   │                      │
//! │                                   ▼                      │
//! │                          Happiness Measure               │
//! │                                   │                      │
//! │         ┌─────────────────────────┴──────────┐           │
//! │         ▼                                    ▼           │
//! │   ┌───────────┐                       ┌────────────┐     │
//! │   │   BTVA    │  every voter          │    ATVA    │     │
//! │   │           │                       │            │     │
//! │   └─────┬─────┘                       └─────┬──────┘     │
//! │         │             sampled pair ◄────────┘            │
//! │         ▼                                    ▼           │
//! │    Risk Measure                         Risk Measure     │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tva_core::{AnalysisConfig, Btva};
//! use tva_profile::Profile;
//! use tva_schemes::{Borda, FlipReward, Ndcg};
//!
//! let profile = Profile::from_rows(&[
//!     vec!["A", "B", "C"],
//!     vec!["B", "C", "A"],
//!     vec!["C", "A", "B"],
//! ])?;
//!
//! let btva = Btva::with_config(Ndcg::new(), FlipReward::default(), AnalysisConfig::default())?;
//! let analysis = btva.analyze(&profile, &Borda)?;
//!
//! for set in &analysis.manipulation_options {
//!     let baseline = analysis.individual_happiness[set.voter()];
//!     assert!(set.iter().all(|(_, happiness)| happiness > baseline));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Notes
//!
//! - The engine is synchronous and single-threaded. Every what-if
//!   profile is an independent copy of the input.
//! - Nothing is cached across calls; `search.memoize_outcomes` only
//!   memoizes within one call.
//! - Errors raised by a strategy abort the analysis and are returned
//!   unmodified.

mod atva;
mod btva;
mod cache;
mod config;
mod error;
mod result;
mod sampler;
mod strategies;

pub use atva::Atva;
pub use btva::Btva;
pub use config::{AnalysisConfig, CollusionConfig, HappinessConfig, Reducer, SearchConfig, SearchSpace};
pub use error::AnalysisError;
pub use result::{BasicAnalysis, CollusionAnalysis};
pub use sampler::{FixedPair, PairSampler, RandomPairs};
pub use strategies::{alternative_ballots, DUPLICATE_DRAW_LIMIT};

// Re-export the data model for convenience
pub use tva_profile::{Ballot, CandidateId, OptionSet, Outcome, Profile, Ranking};

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
