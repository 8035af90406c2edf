//! Basic Tactical Voting Analyzer.
//!
//! For every voter, the analyzer tries each alternative ballot on an
//! otherwise sincere profile and keeps the ones that make the voter
//! strictly happier than the sincere outcome did.
//!
//! ## Cost
//!
//! Exhaustive search resolves `m! - 1` what-if outcomes per voter, so
//! `n · (m! - 1)` for the whole profile. Above roughly eight candidates
//! use [`SearchSpace::Sampled`](crate::SearchSpace::Sampled).
//!
//! ## Invariants
//!
//! - Every recorded option is strictly happier than the voter's baseline.
//! - A voter's sincere ballot is never one of their options.
//! - With a single candidate every option set is empty.

use rand::rngs::StdRng;
use tracing::{debug, info};
use tva_profile::{OptionSet, Outcome, Profile, StrategicOption};
use tva_schemes::{resolve, HappinessMeasure, RiskMeasure, VotingRule};

use crate::cache::OutcomeCache;
use crate::config::AnalysisConfig;
use crate::result::BasicAnalysis;
use crate::strategies::alternative_ballots;
use crate::Result;

/// Sincere outcome and happiness of a profile.
#[derive(Debug)]
pub(crate) struct Baseline {
    pub(crate) outcome: Outcome,
    pub(crate) individual: Vec<f64>,
    pub(crate) overall: f64,
}

/// The basic analyzer.
///
/// The voting rule is supplied per call; the happiness and risk measures
/// are fixed at construction.
///
/// # Example
///
/// ```rust
/// use tva_core::Btva;
/// use tva_profile::Profile;
/// use tva_schemes::{Plurality, StrategicVotingProbability, WeightedDisplacement};
///
/// // voter 0 prefers C but can help B beat A
/// let profile = Profile::from_rows(&[
///     vec!["C", "A", "A", "B", "B"],
///     vec!["B", "B", "B", "A", "A"],
///     vec!["A", "C", "C", "C", "C"],
/// ])?;
///
/// let btva = Btva::new(WeightedDisplacement::top_choice(), StrategicVotingProbability);
/// let analysis = btva.analyze(&profile, &Plurality)?;
///
/// assert_eq!(analysis.outcome.winner(), profile.candidate_id("A"));
/// assert!(!analysis.manipulation_options[0].is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Btva<H, R> {
    happiness: H,
    risk: R,
    config: AnalysisConfig,
}

impl<H: HappinessMeasure, R: RiskMeasure> Btva<H, R> {
    /// Creates an analyzer with the default configuration.
    pub fn new(happiness: H, risk: R) -> Self {
        Self {
            happiness,
            risk,
            config: AnalysisConfig::default(),
        }
    }

    /// Creates an analyzer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`](crate::AnalysisError::Config) if
    /// the configuration is invalid.
    pub fn with_config(happiness: H, risk: R, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            happiness,
            risk,
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The happiness measure.
    pub fn happiness_measure(&self) -> &H {
        &self.happiness
    }

    /// The risk measure.
    pub fn risk_measure(&self) -> &R {
        &self.risk
    }

    /// Runs the basic analysis.
    ///
    /// # Errors
    ///
    /// Any failure of the voting rule, the happiness measure or the risk
    /// measure is returned unmodified; no partial result is produced.
    pub fn analyze(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
    ) -> Result<BasicAnalysis<R::Value>> {
        debug!(
            rule = rule.name(),
            happiness = self.happiness.name(),
            voters = profile.num_voters(),
            candidates = profile.num_candidates(),
            "basic analysis started"
        );
        let baseline = self.baseline(profile, rule)?;

        let mut cache = OutcomeCache::new(self.config.search.memoize_outcomes);
        let mut rng = self.config.search.space.rng();
        let manipulation_options = (0..profile.num_voters())
            .map(|voter| {
                self.scan_voter(
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

        let risk = self.risk.assess(
            profile,
            rule,
            &baseline.individual,
            &manipulation_options,
        )?;

        info!(
            rule = rule.name(),
            risk_measure = self.risk.name(),
            strategic_voters = manipulation_options.iter().filter(|s| !s.is_empty()).count(),
            "basic analysis complete"
        );

        Ok(BasicAnalysis {
            outcome: baseline.outcome,
            individual_happiness: baseline.individual,
            overall_happiness: baseline.overall,
            manipulation_options,
            risk,
        })
    }

    /// Sincere outcome, individual and overall happiness.
    pub(crate) fn baseline(&self, profile: &Profile, rule: &dyn VotingRule) -> Result<Baseline> {
        let outcome = resolve(rule, profile)?;
        let individual = profile
            .ballots()
            .iter()
            .map(|ballot| self.happiness.measure(ballot, &outcome.ranking))
            .collect::<tva_schemes::Result<Vec<_>>>()?;
        let overall = self.config.happiness.reducer.reduce(&individual);
        Ok(Baseline {
            outcome,
            individual,
            overall,
        })
    }

    /// Options of one voter that beat `baseline`.
    ///
    /// Happiness of an option is measured against the declared ballot
    /// itself, not against the voter's sincere ballot.
    pub(crate) fn scan_voter(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        voter: usize,
        baseline: f64,
        rng: &mut StdRng,
        cache: &mut OutcomeCache,
    ) -> Result<OptionSet> {
        let sincere = profile.ballot(voter)?;
        let mut explored = 0usize;
        let mut options = OptionSet::new(voter);
        for alternative in alternative_ballots(sincere, &self.config.search.space, rng) {
            explored += 1;
            let what_if = profile.with_ballot(voter, alternative.clone())?;
            let ranking = cache.ranking(rule, &what_if)?;
            let happiness = self.happiness.measure(&alternative, &ranking)?;
            if happiness > baseline {
                options.insert(StrategicOption::new(alternative, happiness));
            }
        }

        debug!(voter, explored, found = options.len(), "voter scanned");
        Ok(options)
    }
}
