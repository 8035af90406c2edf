//! Strategic (insincere) ballot options discovered for a voter.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::profile::Ballot;

/// An alternative ballot together with the happiness it would yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicOption {
    /// The declared (insincere) preference order.
    pub ballot: Ballot,
    /// Happiness obtained when this ballot is cast.
    pub happiness: f64,
}

impl StrategicOption {
    /// Creates a new option.
    pub fn new(ballot: Ballot, happiness: f64) -> Self {
        Self { ballot, happiness }
    }
}

/// The strategic options of one voter.
///
/// Behaves as a set keyed by ballot: a ballot can be recorded at most
/// once. Iteration order is the ballot order, so two sets holding the
/// same options compare equal regardless of discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    voter: usize,
    #[serde(serialize_with = "as_entries", deserialize_with = "from_entries")]
    options: BTreeMap<Ballot, f64>,
}

impl OptionSet {
    /// Creates an empty set for a voter.
    pub fn new(voter: usize) -> Self {
        Self {
            voter,
            options: BTreeMap::new(),
        }
    }

    /// The voter these options belong to.
    pub fn voter(&self) -> usize {
        self.voter
    }

    /// Records an option. Returns false if the ballot was already present.
    pub fn insert(&mut self, option: StrategicOption) -> bool {
        if self.options.contains_key(&option.ballot) {
            return false;
        }
        self.options.insert(option.ballot, option.happiness);
        true
    }

    /// Returns true if the ballot is one of the recorded options.
    pub fn contains(&self, ballot: &Ballot) -> bool {
        self.options.contains_key(ballot)
    }

    /// Happiness recorded for a ballot.
    pub fn happiness(&self, ballot: &Ballot) -> Option<f64> {
        self.options.get(ballot).copied()
    }

    /// Iterates `(ballot, happiness)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Ballot, f64)> + '_ {
        self.options.iter().map(|(b, &h)| (b, h))
    }

    /// Options whose happiness strictly exceeds `baseline`.
    pub fn improving(&self, baseline: f64) -> impl Iterator<Item = (&Ballot, f64)> + '_ {
        self.iter().filter(move |&(_, h)| h > baseline)
    }

    /// The option with the highest happiness.
    pub fn best(&self) -> Option<(&Ballot, f64)> {
        self.iter().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Number of recorded options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if no option was recorded.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn as_entries<S: Serializer>(
    options: &BTreeMap<Ballot, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        options
            .iter()
            .map(|(ballot, &happiness)| StrategicOption::new(ballot.clone(), happiness)),
    )
}

fn from_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<Ballot, f64>, D::Error> {
    let entries = Vec::<StrategicOption>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|option| (option.ballot, option.happiness))
        .collect())
}
