//! Risk measures.
//!
//! A [`RiskMeasure`] condenses a profile, the sincere happiness of every
//! voter and the strategic options discovered for some of them into one
//! risk value. The analyzers never interpret that value; they only pass
//! it through into the analysis result.
//!
//! Only options whose happiness strictly exceeds the owning voter's
//! sincere happiness are considered by the measures provided here.
//!
//! # Provided measures
//!
//! | Measure | Question answered |
//! |---------|-------------------|
//! | [`FlipReward`] | How tempting is the most tempting single lie? |
//! | [`JointFlipReward`] | How likely is the likeliest set of liars? |
//! | [`WinnerChange`] | How often does a lie change the winner? |
//! | [`CollusionChange`] | Same, counting two-voter collusions too |
//! | [`StrategicVotingProbability`] | Which share of voters can gain by lying? |

use itertools::Itertools;
use tracing::debug;
use tva_profile::{Ballot, CandidateId, OptionSet, Profile};

use crate::error::SchemeError;
use crate::resolver::rank;
use crate::voting::{TieBreak, VotingRule};
use crate::Result;

/// Trait for risk measures.
///
/// # Implementors
///
/// - [`FlipReward`], [`JointFlipReward`], [`WinnerChange`],
///   [`CollusionChange`], [`StrategicVotingProbability`]
pub trait RiskMeasure: Send + Sync {
    /// Value produced by this measure.
    type Value;

    /// Returns the name of this measure.
    fn name(&self) -> &str;

    /// Assesses the risk of a profile.
    ///
    /// `happiness[v]` is the sincere happiness of voter `v`. Each
    /// [`OptionSet`] names the voter it belongs to.
    ///
    /// # Errors
    ///
    /// Any error is propagated unmodified to the caller of the analysis.
    fn assess(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<Self::Value>;
}

impl<M: RiskMeasure + ?Sized> RiskMeasure for &M {
    type Value = M::Value;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn assess(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<Self::Value> {
        (**self).assess(profile, rule, happiness, options)
    }
}

impl<M: RiskMeasure + ?Sized> RiskMeasure for Box<M> {
    type Value = M::Value;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn assess(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<Self::Value> {
        (**self).assess(profile, rule, happiness, options)
    }
}

/// Normalized number of inversions between two orders of the same candidates.
///
/// 0 means identical, 1 means reversed. Orders of fewer than two
/// candidates are at distance 0.
///
/// # Errors
///
/// Returns [`SchemeError::LengthMismatch`] if the orders differ in length
/// and [`SchemeError::Failed`] if `option` names a candidate `base` lacks.
pub fn inversion_distance(base: &Ballot, option: &Ballot) -> Result<f64> {
    if base.len() != option.len() {
        return Err(SchemeError::LengthMismatch {
            expected: base.len(),
            found: option.len(),
        });
    }
    let targets = option
        .iter()
        .map(|c| {
            base.position(c).ok_or_else(|| SchemeError::Failed {
                measure: "inversion distance".to_string(),
                reason: format!("candidate {c} is missing from the base order"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let inversions = targets
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a > b)
        .count();
    let n = targets.len();
    let max_inversions = n * n.saturating_sub(1) / 2;
    if max_inversions == 0 {
        return Ok(0.0);
    }
    Ok(inversions as f64 / max_inversions as f64)
}

fn baseline(measure: &str, happiness: &[f64], voter: usize) -> Result<f64> {
    happiness
        .get(voter)
        .copied()
        .ok_or_else(|| SchemeError::Failed {
            measure: measure.to_string(),
            reason: format!("no happiness recorded for voter {voter}"),
        })
}

/// Winner under a label tie-break, independent of the rule's own tie-break.
fn label_winner(rule: &dyn VotingRule, profile: &Profile) -> Result<Option<CandidateId>> {
    let tally = rule.tally(profile)?;
    Ok(rank(rule.name(), &tally, profile, TieBreak::Label)?.winner())
}

/// Temptation of the most tempting strategic option.
///
/// Each improving option scores `tanh(Δh / ln(d^(p-1) + 1))`, where `Δh`
/// is the happiness gained and `d` the [`inversion_distance`] between the
/// voter's sincere ballot and the option. Large gains reached with few
/// swaps score close to 1.
///
/// The sensitivity `p` must lie in `[1.3, 1.7]`. Low values flag mainly
/// large gains, high values also flag subtle ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipReward {
    sensitivity: f64,
}

impl FlipReward {
    /// Lowest accepted sensitivity.
    pub const MIN_SENSITIVITY: f64 = 1.3;
    /// Highest accepted sensitivity.
    pub const MAX_SENSITIVITY: f64 = 1.7;

    /// Creates the measure.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::InvalidParameter`] if `sensitivity` lies
    /// outside `[1.3, 1.7]`.
    pub fn new(sensitivity: f64) -> Result<Self> {
        if !(Self::MIN_SENSITIVITY..=Self::MAX_SENSITIVITY).contains(&sensitivity) {
            return Err(SchemeError::InvalidParameter(format!(
                "sensitivity must be in [{}, {}], got {sensitivity}",
                Self::MIN_SENSITIVITY,
                Self::MAX_SENSITIVITY
            )));
        }
        Ok(Self { sensitivity })
    }

    /// The sensitivity parameter `p`.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Highest option score of one voter, 0 if none of the options improves.
    fn voter_risk(&self, profile: &Profile, happiness: &[f64], set: &OptionSet) -> Result<f64> {
        let base = baseline(self.name(), happiness, set.voter())?;
        let sincere = profile.ballot(set.voter())?;
        let mut risk: f64 = 0.0;
        for (ballot, h) in set.improving(base) {
            let d = inversion_distance(sincere, ballot)?;
            let score = ((h - base).abs() / (d.powf(self.sensitivity - 1.0) + 1.0).ln()).tanh();
            risk = risk.max(score);
        }
        Ok(risk)
    }
}

impl Default for FlipReward {
    fn default() -> Self {
        Self {
            sensitivity: Self::MIN_SENSITIVITY,
        }
    }
}

impl RiskMeasure for FlipReward {
    type Value = f64;

    fn name(&self) -> &str {
        "FlipReward"
    }

    fn assess(
        &self,
        profile: &Profile,
        _rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<f64> {
        let mut risk: f64 = 0.0;
        for set in options {
            risk = risk.max(self.voter_risk(profile, happiness, set)?);
        }
        debug!(risk, sensitivity = self.sensitivity, "flip reward assessed");
        Ok(risk)
    }
}

/// Probability of the likeliest scenario in which someone deviates.
///
/// Every voter `v` deviates independently with probability `r_v`, their
/// [`FlipReward`] temptation. Voters with `r_v = 0` never deviate. The
/// result is the highest probability of any scenario in which a
/// non-empty subset of the tempted voters deviates, or 0 if nobody is
/// tempted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointFlipReward {
    flip: FlipReward,
}

impl JointFlipReward {
    /// Creates the measure.
    ///
    /// # Errors
    ///
    /// Same as [`FlipReward::new`].
    pub fn new(sensitivity: f64) -> Result<Self> {
        Ok(Self {
            flip: FlipReward::new(sensitivity)?,
        })
    }
}

/// Most likely scenario over per-voter deviation probabilities.
///
/// The product is maximized by letting each voter pick their likelier
/// branch; if that leaves everyone sincere, the voter whose switch costs
/// least is forced to deviate.
fn likeliest_deviation(risks: &[f64]) -> f64 {
    let tempted: Vec<f64> = risks.iter().copied().filter(|&r| r > 0.0).collect();
    if tempted.is_empty() {
        return 0.0;
    }
    let unconstrained: f64 = tempted.iter().map(|&r| r.max(1.0 - r)).product();
    if tempted.iter().any(|&r| r >= 0.5) {
        return unconstrained;
    }
    let best_switch = tempted
        .iter()
        .map(|&r| r / (1.0 - r))
        .fold(0.0, f64::max);
    unconstrained * best_switch
}

impl RiskMeasure for JointFlipReward {
    type Value = f64;

    fn name(&self) -> &str {
        "JointFlipReward"
    }

    fn assess(
        &self,
        profile: &Profile,
        _rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<f64> {
        let risks = options
            .iter()
            .map(|set| self.flip.voter_risk(profile, happiness, set))
            .collect::<Result<Vec<_>>>()?;
        Ok(likeliest_deviation(&risks))
    }
}

/// Share of improving options that change the winner.
///
/// Computed per voter; the result is the highest share over all voters.
/// Winners are taken under a label tie-break.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinnerChange;

impl RiskMeasure for WinnerChange {
    type Value = f64;

    fn name(&self) -> &str {
        "WinnerChange"
    }

    fn assess(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<f64> {
        let sincere_winner = label_winner(rule, profile)?;
        let mut risk: f64 = 0.0;
        for set in options {
            let base = baseline(self.name(), happiness, set.voter())?;
            let mut total = 0usize;
            let mut changed = 0usize;
            for (ballot, _) in set.improving(base) {
                total += 1;
                let lie = profile.with_ballot(set.voter(), ballot.clone())?;
                if label_winner(rule, &lie)? != sincere_winner {
                    changed += 1;
                }
            }
            if total > 0 {
                risk = risk.max(changed as f64 / total as f64);
            }
        }
        Ok(risk)
    }
}

/// Share of single and two-voter manipulations that change the winner.
///
/// Every improving option of every voter counts as one attempt. Every
/// pair of voters additionally contributes one joint attempt per
/// combination of their improving ballots, both cast at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollusionChange;

impl RiskMeasure for CollusionChange {
    type Value = f64;

    fn name(&self) -> &str {
        "CollusionChange"
    }

    fn assess(
        &self,
        profile: &Profile,
        rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<f64> {
        let sincere_winner = label_winner(rule, profile)?;
        let improving = options
            .iter()
            .map(|set| {
                let base = baseline(self.name(), happiness, set.voter())?;
                Ok((
                    set.voter(),
                    set.improving(base).map(|(b, _)| b.clone()).collect::<Vec<_>>(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut attempts = 0usize;
        let mut changed = 0usize;

        for (voter, ballots) in &improving {
            for ballot in ballots {
                attempts += 1;
                let lie = profile.with_ballot(*voter, ballot.clone())?;
                if label_winner(rule, &lie)? != sincere_winner {
                    changed += 1;
                }
            }
        }

        for ((first, first_ballots), (second, second_ballots)) in
            improving.iter().tuple_combinations()
        {
            if first == second {
                continue;
            }
            for (a, b) in first_ballots.iter().cartesian_product(second_ballots) {
                attempts += 1;
                let lie = profile
                    .with_ballot(*first, a.clone())?
                    .with_ballot(*second, b.clone())?;
                if label_winner(rule, &lie)? != sincere_winner {
                    changed += 1;
                }
            }
        }

        debug!(attempts, changed, "collusion change assessed");
        if attempts == 0 {
            return Ok(0.0);
        }
        Ok(changed as f64 / attempts as f64)
    }
}

/// Share of voters holding at least one improving option.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategicVotingProbability;

impl RiskMeasure for StrategicVotingProbability {
    type Value = f64;

    fn name(&self) -> &str {
        "StrategicVotingProbability"
    }

    fn assess(
        &self,
        _profile: &Profile,
        _rule: &dyn VotingRule,
        happiness: &[f64],
        options: &[OptionSet],
    ) -> Result<f64> {
        if happiness.is_empty() {
            return Ok(0.0);
        }
        let mut strategic = 0usize;
        for set in options {
            let base = baseline(self.name(), happiness, set.voter())?;
            if set.improving(base).next().is_some() {
                strategic += 1;
            }
        }
        Ok(strategic as f64 / happiness.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::Plurality;
    use tva_profile::StrategicOption;

    // voters:   0    1    2
    //           A    B    C
    //           B    A    B
    //           C    C    A
    // Plurality ties all three; A wins on label.
    fn sample() -> Profile {
        Profile::from_rows(&[
            vec!["A", "B", "C"],
            vec!["B", "A", "B"],
            vec!["C", "C", "A"],
        ])
        .unwrap()
    }

    fn set(voter: usize, entries: Vec<(Vec<usize>, f64)>) -> OptionSet {
        let mut set = OptionSet::new(voter);
        for (order, h) in entries {
            set.insert(StrategicOption::new(Ballot::from_indices(order), h));
        }
        set
    }

    // voter 1 can vote A (keeps A winning), voter 2 can vote B (B wins)
    fn sample_options() -> Vec<OptionSet> {
        vec![
            set(0, vec![]),
            set(1, vec![(vec![0, 1, 2], 0.5), (vec![2, 0, 1], 0.0)]),
            set(2, vec![(vec![1, 2, 0], 0.5)]),
        ]
    }

    const HAPPINESS: [f64; 3] = [1.0, 0.0, 0.0];

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_inversion_distance() {
        let base = Ballot::from_indices([0, 1, 2]);
        assert_eq!(inversion_distance(&base, &base).unwrap(), 0.0);
        assert_eq!(
            inversion_distance(&base, &Ballot::from_indices([2, 1, 0])).unwrap(),
            1.0
        );
        assert!(approx(
            inversion_distance(&base, &Ballot::from_indices([1, 0, 2])).unwrap(),
            1.0 / 3.0
        ));
        assert_eq!(
            inversion_distance(&Ballot::from_indices([0]), &Ballot::from_indices([0])).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_inversion_distance_rejects_mismatched_orders() {
        let err = inversion_distance(
            &Ballot::from_indices([0, 1]),
            &Ballot::from_indices([0, 1, 2]),
        )
        .unwrap_err();
        assert!(matches!(err, SchemeError::LengthMismatch { .. }));

        let err = inversion_distance(&Ballot::from_indices([0, 1]), &Ballot::from_indices([0, 4]))
            .unwrap_err();
        assert!(matches!(err, SchemeError::Failed { .. }));
    }

    #[test]
    fn test_flip_reward_sensitivity_bounds() {
        assert!(FlipReward::new(1.3).is_ok());
        assert!(FlipReward::new(1.7).is_ok());
        assert!(matches!(
            FlipReward::new(1.2),
            Err(SchemeError::InvalidParameter(_))
        ));
        assert!(FlipReward::new(f64::NAN).is_err());
        assert_eq!(FlipReward::default().sensitivity(), 1.3);
    }

    #[test]
    fn test_flip_reward_scores_best_option() {
        let risk = FlipReward::default()
            .assess(&sample(), &Plurality, &HAPPINESS, &sample_options())
            .unwrap();
        // both improving options are one swap out of three away
        let one_swap = (0.5 / ((1.0f64 / 3.0).powf(0.3) + 1.0).ln()).tanh();
        assert!(approx(risk, one_swap));
        assert!(risk > 0.0 && risk < 1.0);
    }

    #[test]
    fn test_flip_reward_without_improving_options() {
        let options = vec![set(1, vec![(vec![2, 0, 1], 0.0)])];
        let risk = FlipReward::default()
            .assess(&sample(), &Plurality, &HAPPINESS, &options)
            .unwrap();
        assert_eq!(risk, 0.0);
    }

    #[test]
    fn test_flip_reward_missing_happiness() {
        let err = FlipReward::default()
            .assess(&sample(), &Plurality, &[1.0], &sample_options())
            .unwrap_err();
        assert!(matches!(err, SchemeError::Failed { .. }));
    }

    fn brute_force(risks: &[f64]) -> f64 {
        let tempted: Vec<f64> = risks.iter().copied().filter(|&r| r > 0.0).collect();
        let mut best: f64 = 0.0;
        for mask in 1..(1u32 << tempted.len()) {
            let p: f64 = tempted
                .iter()
                .enumerate()
                .map(|(i, &r)| if mask & (1 << i) != 0 { r } else { 1.0 - r })
                .product();
            best = best.max(p);
        }
        best
    }

    #[test]
    fn test_likeliest_deviation() {
        assert_eq!(likeliest_deviation(&[]), 0.0);
        assert_eq!(likeliest_deviation(&[0.0, 0.0]), 0.0);
        assert!(approx(likeliest_deviation(&[0.8, 0.0]), 0.8));
        assert!(approx(likeliest_deviation(&[0.2, 0.3]), 0.24));
        for risks in [
            vec![0.6, 0.2],
            vec![0.1, 0.1, 0.1],
            vec![0.45, 0.05, 0.0, 0.3],
            vec![0.9, 0.99, 0.5],
        ] {
            assert!(approx(likeliest_deviation(&risks), brute_force(&risks)));
        }
    }

    #[test]
    fn test_joint_flip_reward() {
        let risk = JointFlipReward::default()
            .assess(&sample(), &Plurality, &HAPPINESS, &sample_options())
            .unwrap();
        assert!(risk > 0.0 && risk <= 1.0);

        let risk = JointFlipReward::new(1.5)
            .unwrap()
            .assess(&sample(), &Plurality, &HAPPINESS, &[])
            .unwrap();
        assert_eq!(risk, 0.0);
    }

    #[test]
    fn test_winner_change() {
        let risk = WinnerChange
            .assess(&sample(), &Plurality, &HAPPINESS, &sample_options())
            .unwrap();
        assert_eq!(risk, 1.0);

        let only_voter_one = &sample_options()[..2];
        let risk = WinnerChange
            .assess(&sample(), &Plurality, &HAPPINESS, only_voter_one)
            .unwrap();
        assert_eq!(risk, 0.0);
    }

    #[test]
    fn test_collusion_change() {
        // singles: voter 1 keeps A, voter 2 elects B
        // joint: A, A, B keeps A
        let risk = CollusionChange
            .assess(&sample(), &Plurality, &HAPPINESS, &sample_options())
            .unwrap();
        assert!(approx(risk, 1.0 / 3.0));

        let risk = CollusionChange
            .assess(&sample(), &Plurality, &HAPPINESS, &[])
            .unwrap();
        assert_eq!(risk, 0.0);
    }

    #[test]
    fn test_strategic_voting_probability() {
        let risk = StrategicVotingProbability
            .assess(&sample(), &Plurality, &HAPPINESS, &sample_options())
            .unwrap();
        assert!(approx(risk, 2.0 / 3.0));
    }

    #[test]
    fn test_boxed_measure_delegates() {
        let measure: Box<dyn RiskMeasure<Value = f64>> = Box::new(StrategicVotingProbability);
        assert_eq!(measure.name(), "StrategicVotingProbability");
        let risk = measure
            .assess(&sample(), &Plurality, &HAPPINESS, &sample_options())
            .unwrap();
        assert!(approx(risk, 2.0 / 3.0));
    }
}
