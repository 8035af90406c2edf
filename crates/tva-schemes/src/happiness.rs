//! Happiness measures.
//!
//! A [`HappinessMeasure`] scores how satisfied one voter is with a
//! resulting ranking, given the preference order the voter declared.
//! The analyzers only ever compare happiness values with a strict
//! greater-than, so measures are free to choose their own scale.
//!
//! # Provided measures
//!
//! | Measure | Range | Idea |
//! |---------|-------|------|
//! | [`Ndcg`] | 0..=1 | Discounted gain of the voter's top choices |
//! | [`PositionMatch`] | 0..=1 | Weighted share of positions that agree |
//! | [`BubbleSortDistance`] | 0..=1 | One minus the weighted discordant pairs |
//! | [`WeightedDisplacement`] | weights | Reward by how far each choice moved |

use tva_profile::{Ballot, CandidateId, Ranking};

use crate::error::SchemeError;
use crate::Result;

/// Trait for happiness measures.
pub trait HappinessMeasure: Send + Sync {
    /// Returns the name of this measure.
    fn name(&self) -> &str;

    /// Scores `preference` against `ranking`.
    ///
    /// # Errors
    ///
    /// Any error is propagated unmodified to the caller of the analysis.
    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64>;
}

impl<H: HappinessMeasure + ?Sized> HappinessMeasure for &H {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64> {
        (**self).measure(preference, ranking)
    }
}

impl<H: HappinessMeasure + ?Sized> HappinessMeasure for Box<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64> {
        (**self).measure(preference, ranking)
    }
}

fn check_lengths(preference: &Ballot, ranking: &Ranking) -> Result<()> {
    if preference.len() != ranking.len() {
        return Err(SchemeError::LengthMismatch {
            expected: ranking.len(),
            found: preference.len(),
        });
    }
    Ok(())
}

fn place(measure: &str, ranking: &Ranking, candidate: CandidateId) -> Result<usize> {
    ranking.position(candidate).ok_or_else(|| SchemeError::Failed {
        measure: measure.to_string(),
        reason: format!("candidate {candidate} is not ranked"),
    })
}

/// Resolves optional weights to exactly `len` entries, zero-padded.
fn weights(given: Option<&[f64]>, len: usize, default: impl FnOnce() -> Vec<f64>) -> Vec<f64> {
    let mut resolved = given.map_or_else(default, <[f64]>::to_vec);
    resolved.resize(len, 0.0);
    resolved
}

/// Normalized discounted cumulative gain.
///
/// Only the `k` preference positions with positive weight contribute.
/// A candidate placed at position `p` of the ranking earns a distance
/// credit `d = max(0, k - p)`; preference position `i` contributes
/// `d * pw[i] * dw[d - 1]`, discounted by `log2(i + 2)`. The sum is
/// normalized by the gain of a ranking identical to the preference.
///
/// Defaults: `pw` is 1 for the top `ceil(m / 2)` positions and 0 below,
/// `dw` is 1 everywhere.
#[derive(Debug, Clone, Default)]
pub struct Ndcg {
    /// Weight of each preference position.
    pub preference_weights: Option<Vec<f64>>,
    /// Weight of each distance credit.
    pub distance_weights: Option<Vec<f64>>,
}

impl Ndcg {
    /// Creates the measure with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the measure with explicit weights.
    pub fn with_weights(preference_weights: Vec<f64>, distance_weights: Vec<f64>) -> Self {
        Self {
            preference_weights: Some(preference_weights),
            distance_weights: Some(distance_weights),
        }
    }

    fn dcg(&self, order: &[CandidateId], ranking: &Ranking, pw: &[f64], dw: &[f64]) -> Result<f64> {
        let k = pw.iter().filter(|&&w| w > 0.0).count();
        let mut total = 0.0;
        for (i, &candidate) in order.iter().enumerate() {
            let d = k.saturating_sub(place(self.name(), ranking, candidate)?);
            if d == 0 {
                continue;
            }
            let gain = d as f64 * pw[i] * dw[d - 1];
            total += gain / ((i + 2) as f64).log2();
        }
        Ok(total)
    }
}

impl HappinessMeasure for Ndcg {
    fn name(&self) -> &str {
        "NDCG"
    }

    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64> {
        check_lengths(preference, ranking)?;
        let m = preference.len();
        let pw = weights(self.preference_weights.as_deref(), m, || {
            let top = m.div_ceil(2);
            (0..m).map(|i| if i < top { 1.0 } else { 0.0 }).collect()
        });
        let dw = weights(self.distance_weights.as_deref(), m, || vec![1.0; m]);

        let dcg = self.dcg(preference.as_slice(), ranking, &pw, &dw)?;
        let idcg = self.dcg(ranking.as_slice(), ranking, &pw, &dw)?;
        if idcg == 0.0 {
            return Ok(0.0);
        }
        Ok(dcg / idcg)
    }
}

/// Weighted share of preference positions the ranking reproduces exactly.
///
/// With weights `[1, 0, ...]` this is a top-choice match.
#[derive(Debug, Clone, Default)]
pub struct PositionMatch {
    /// Weight of each preference position (default: all 1).
    pub weights: Option<Vec<f64>>,
}

impl PositionMatch {
    /// Creates the measure with unit weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the measure with explicit position weights.
    pub fn with_weights(weights: Vec<f64>) -> Self {
        Self {
            weights: Some(weights),
        }
    }
}

impl HappinessMeasure for PositionMatch {
    fn name(&self) -> &str {
        "PositionMatch"
    }

    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64> {
        check_lengths(preference, ranking)?;
        let m = preference.len();
        let w = weights(self.weights.as_deref(), m, || vec![1.0; m]);
        let total: f64 = w.iter().sum();
        if total == 0.0 {
            return Err(SchemeError::InvalidParameter(
                "position weights sum to zero".to_string(),
            ));
        }

        let agreeing: f64 = preference
            .iter()
            .zip(ranking.iter())
            .zip(&w)
            .filter(|((p, r), _)| p == r)
            .map(|(_, &weight)| weight)
            .sum();
        Ok(agreeing / total)
    }
}

/// One minus the weighted number of discordant candidate pairs.
///
/// A pair is discordant when the ranking orders it opposite to the
/// preference. Each ordered pair `(i, j)` of preference positions is
/// weighted by the weight of position `i`.
#[derive(Debug, Clone, Default)]
pub struct BubbleSortDistance {
    /// Weight of each preference position (default: all 1).
    pub weights: Option<Vec<f64>>,
}

impl BubbleSortDistance {
    /// Creates the measure with unit weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the measure with explicit position weights.
    pub fn with_weights(weights: Vec<f64>) -> Self {
        Self {
            weights: Some(weights),
        }
    }
}

impl HappinessMeasure for BubbleSortDistance {
    fn name(&self) -> &str {
        "BubbleSortDistance"
    }

    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64> {
        check_lengths(preference, ranking)?;
        let m = preference.len();
        if m < 2 {
            return Ok(1.0);
        }
        let w = weights(self.weights.as_deref(), m, || vec![1.0; m]);
        let places = preference
            .iter()
            .map(|c| place(self.name(), ranking, c))
            .collect::<Result<Vec<_>>>()?;

        let mut disorder = 0.0;
        for i in 0..m {
            for j in 0..m {
                if i != j && (i < j) != (places[i] < places[j]) {
                    disorder += w[i];
                }
            }
        }
        Ok(1.0 - disorder / (m * (m - 1)) as f64)
    }
}

/// Rewards each preference by how far it moved in the ranking.
///
/// Preference position `i` contributes `pw[i] * dw[|i - p|]`, where `p`
/// is the candidate's place in the ranking. The default weights
/// (`[1, 0, ...]` for both) give 1 exactly when the voter's top choice wins.
#[derive(Debug, Clone, Default)]
pub struct WeightedDisplacement {
    /// Weight of each preference position (default: top choice only).
    pub preference_weights: Option<Vec<f64>>,
    /// Reward for each displacement (default: only zero displacement).
    pub distance_weights: Option<Vec<f64>>,
}

impl WeightedDisplacement {
    /// Top-1 binary happiness.
    pub fn top_choice() -> Self {
        Self::default()
    }

    /// Creates the measure with explicit weights.
    pub fn with_weights(preference_weights: Vec<f64>, distance_weights: Vec<f64>) -> Self {
        Self {
            preference_weights: Some(preference_weights),
            distance_weights: Some(distance_weights),
        }
    }
}

impl HappinessMeasure for WeightedDisplacement {
    fn name(&self) -> &str {
        "WeightedDisplacement"
    }

    fn measure(&self, preference: &Ballot, ranking: &Ranking) -> Result<f64> {
        check_lengths(preference, ranking)?;
        let m = preference.len();
        let top_only = || -> Vec<f64> { (0..m).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect() };
        let pw = weights(self.preference_weights.as_deref(), m, top_only);
        let dw = weights(self.distance_weights.as_deref(), m, top_only);

        let mut score = 0.0;
        for (i, candidate) in preference.iter().enumerate() {
            let p = place(self.name(), ranking, candidate)?;
            score += pw[i] * dw[i.abs_diff(p)];
        }
        Ok(score)
    }
}
