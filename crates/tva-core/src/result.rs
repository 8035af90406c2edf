//! Analysis result records.
//!
//! Results are plain values built once per call and never shared
//! between calls.

use serde::{Deserialize, Serialize};
use tva_profile::{OptionSet, Outcome};

/// Result of a basic (single-voter) analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicAnalysis<V> {
    /// Outcome of the sincere profile.
    pub outcome: Outcome,

    /// Sincere happiness of every voter, in voter order.
    pub individual_happiness: Vec<f64>,

    /// Aggregate of `individual_happiness`.
    pub overall_happiness: f64,

    /// One option set per voter, in voter order.
    pub manipulation_options: Vec<OptionSet>,

    /// Value reported by the risk measure.
    pub risk: V,
}

impl<V> BasicAnalysis<V> {
    /// Voters holding at least one manipulation option.
    pub fn strategic_voters(&self) -> impl Iterator<Item = usize> + '_ {
        self.manipulation_options
            .iter()
            .filter(|set| !set.is_empty())
            .map(OptionSet::voter)
    }

    /// Number of manipulation options over all voters.
    pub fn option_count(&self) -> usize {
        self.manipulation_options.iter().map(OptionSet::len).sum()
    }
}

/// Result of an advanced (pairwise collusion) analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollusionAnalysis<V> {
    /// Outcome of the sincere profile.
    pub outcome: Outcome,

    /// Sincere happiness of every voter, in voter order.
    pub individual_happiness: Vec<f64>,

    /// Aggregate of `individual_happiness`.
    pub overall_happiness: f64,

    /// The two colluding voters.
    pub pair: (usize, usize),

    /// One option set per colluder, in pair order.
    pub collusion_options: Vec<OptionSet>,

    /// Value reported by the risk measure.
    pub risk: V,
}

impl<V> CollusionAnalysis<V> {
    /// Returns true if both colluders hold at least one option.
    pub fn both_tempted(&self) -> bool {
        !self.collusion_options.is_empty() && self.collusion_options.iter().all(|set| !set.is_empty())
    }
}
