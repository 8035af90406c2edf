//! Advanced Tactical Voting Analyzer.
//!
//! Extends the basic analysis with pairwise collusion: two distinct
//! voters are drawn from the profile and each one's options are searched
//! against the sincere profile, with only that voter's ballot replaced.
//!
//! ## Invariants
//!
//! - Both colluders are scanned independently; the two option sets are
//!   reported side by side, never merged.
//! - Each option beats the colluder's sincere happiness, not a
//!   recomputed one.
//! - With a fixed sampler seed, repeated runs pick the same pair and
//!   report identical option sets.
//!
//! Joint deviations, where both colluders change their ballots at once,
//! are left to risk measures such as
//! [`CollusionChange`](tva_schemes::CollusionChange).

use tracing::{debug, info};
use tva_profile::Profile;
use tva_schemes::{HappinessMeasure, RiskMeasure, VotingRule};

use crate::btva::Btva;
use crate::cache::OutcomeCache;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::result::CollusionAnalysis;
use crate::sampler::{PairSampler, RandomPairs};
use crate::Result;

/// The advanced analyzer.
///
/// # Example
///
/// ```rust
/// use tva_core::{Atva, FixedPair};
/// use tva_profile::Profile;
/// use tva_schemes::{CollusionChange, Plurality, WeightedDisplacement};
///
/// let profile = Profile::from_rows(&[vec!["A", "B"], vec!["B", "A"]])?;
/// let mut atva = Atva::with_sampler(
///     WeightedDisplacement::top_choice(),
///     CollusionChange,
///     Default::default(),
///     FixedPair(0, 1),
/// )?;
///
/// let analysis = atva.analyze(&profile, &Plurality)?;
/// assert_eq!(analysis.pair, (0, 1));
/// assert_eq!(analysis.collusion_options.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Atva<H, C, S = RandomPairs> {
    basic: Btva<H, C>,
    sampler: S,
}

impl<H: HappinessMeasure, C: RiskMeasure> Atva<H, C, RandomPairs> {
    /// Creates an analyzer with the default configuration and an
    /// entropy-seeded pair sampler.
    pub fn new(happiness: H, risk: C) -> Self {
        Self {
            basic: Btva::new(happiness, risk),
            sampler: RandomPairs::from_entropy(),
        }
    }

    /// Creates an analyzer whose pair sampler is seeded from
    /// `config.collusion.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if the configuration is invalid.
    pub fn with_config(happiness: H, risk: C, config: AnalysisConfig) -> Result<Self> {
        let sampler = RandomPairs::from_seed(config.collusion.seed);
        Self::with_sampler(happiness, risk, config, sampler)
    }
}

impl<H: HappinessMeasure, C: RiskMeasure, S: PairSampler> Atva<H, C, S> {
    /// Creates an analyzer with a caller-supplied pair sampler.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if the configuration is invalid.
    pub fn with_sampler(happiness: H, risk: C, config: AnalysisConfig, sampler: S) -> Result<Self> {
        Ok(Self {
            basic: Btva::with_config(happiness, risk, config)?,
            sampler,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        self.basic.config()
    }

    /// Runs the collusion analysis on a sampled voter pair.
    ///
    /// Only the basic baseline (outcome and happiness) is computed. The
    /// basic per-voter scan and its risk assessment are skipped, so the
    /// risk measure runs once, over the two colluders' option sets.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientVoters`] for fewer than two
    /// voters and [`AnalysisError::InvalidPair`] if the sampler returns an
    /// unusable pair. Capability failures are returned unmodified.
    pub fn analyze(
        &mut self,
        profile: &Profile,
        rule: &dyn VotingRule,
    ) -> Result<CollusionAnalysis<C::Value>> {
        let voters = profile.num_voters();
        if voters < 2 {
            return Err(AnalysisError::InsufficientVoters { found: voters });
        }
        let pair = self.sampler.sample_pair(voters);
        debug!(first = pair.0, second = pair.1, "colluders sampled");
        self.analyze_pair(profile, rule, pair)
    }

    /// Runs the collusion analysis on a caller-chosen voter pair.
    ///
    /// # Errors
    ///
    /// Same as [`Atva::analyze`].
    pub fn analyze_pair(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        pair: (usize, usize),
    ) -> Result<CollusionAnalysis<C::Value>> {
        let voters = profile.num_voters();
        if voters < 2 {
            return Err(AnalysisError::InsufficientVoters { found: voters });
        }
        let (first, second) = pair;
        if first == second || first >= voters || second >= voters {
            return Err(AnalysisError::InvalidPair {
                first,
                second,
                voters,
            });
        }

        let baseline = self.basic.baseline(profile, rule)?;

        let config = self.basic.config();
        let mut cache = OutcomeCache::new(config.search.memoize_outcomes);
        let mut rng = config.search.space.rng();
        let collusion_options = [first, second]
            .into_iter()
            .map(|voter| {
                self.basic.scan_voter(
                    profile,
                    rule,
                    voter,
                    baseline.individual[voter],
                    &mut rng,
                    &mut cache,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        cache.report();

        let risk = self.basic.risk_measure().assess(
            profile,
            rule,
            &baseline.individual,
            &collusion_options,
        )?;

        info!(
            rule = rule.name(),
            risk_measure = self.basic.risk_measure().name(),
            first,
            second,
            first_options = collusion_options[0].len(),
            second_options = collusion_options[1].len(),
            "collusion analysis complete"
        );

        Ok(CollusionAnalysis {
            outcome: baseline.outcome,
            individual_happiness: baseline.individual,
            overall_happiness: baseline.overall,
            pair,
            collusion_options,
            risk,
        })
    }
}
