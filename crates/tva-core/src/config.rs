//! Configuration types for tactical voting analysis.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::Result;

/// Configuration shared by the basic and advanced analyzers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How individual happiness is aggregated.
    pub happiness: HappinessConfig,

    /// Which alternative ballots are explored.
    pub search: SearchConfig,

    /// Collusion pair sampling.
    pub collusion: CollusionConfig,
}

impl AnalysisConfig {
    /// Checks the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if a sampled search space has a
    /// limit of zero.
    pub fn validate(&self) -> Result<()> {
        if let SearchSpace::Sampled { limit: 0, .. } = self.search.space {
            return Err(AnalysisError::Config(
                "sampled search space needs a limit of at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregation of individual happiness into overall happiness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Plain sum.
    Sum,
}

impl Reducer {
    /// Reduces the values. The mean of no values is 0.
    pub fn reduce(self, values: &[f64]) -> f64 {
        let sum: f64 = values.iter().sum();
        match self {
            Self::Sum => sum,
            Self::Mean if values.is_empty() => 0.0,
            Self::Mean => sum / values.len() as f64,
        }
    }
}

/// Happiness configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HappinessConfig {
    /// Reducer for overall happiness.
    pub reducer: Reducer,
}

/// Search configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Alternative ballots explored per voter.
    pub space: SearchSpace,

    /// Memoize outcomes within one analysis call.
    pub memoize_outcomes: bool,
}

/// The alternative ballots explored for one voter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchSpace {
    /// Every reordering of the ballot except the sincere one.
    #[default]
    Exhaustive,

    /// Up to `limit` distinct random reorderings.
    Sampled {
        /// Maximum number of alternatives per voter.
        limit: usize,
        /// Seed for reproducible sampling; entropy when absent.
        seed: Option<u64>,
    },
}

impl SearchSpace {
    /// Random source for one analysis call.
    ///
    /// Exhaustive search never draws from it.
    pub fn rng(&self) -> StdRng {
        match self {
            Self::Sampled {
                seed: Some(seed), ..
            } => StdRng::seed_from_u64(*seed),
            Self::Exhaustive => StdRng::seed_from_u64(0),
            Self::Sampled { seed: None, .. } => StdRng::from_entropy(),
        }
    }
}

/// Collusion configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollusionConfig {
    /// Seed for the voter-pair sampler; entropy when absent.
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.happiness.reducer, Reducer::Mean);
        assert_eq!(config.search.space, SearchSpace::Exhaustive);
        assert!(!config.search.memoize_outcomes);
        assert_eq!(config.collusion.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AnalysisConfig::default();
        config.search.space = SearchSpace::Sampled {
            limit: 50,
            seed: Some(7),
        };
        config.happiness.reducer = Reducer::Sum;

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""kind":"sampled""#));
        assert!(json.contains(r#""reducer":"sum""#));
        let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AnalysisConfig =
            serde_json::from_str(r#"{ "collusion": { "seed": 3 } }"#).unwrap();
        assert_eq!(parsed.collusion.seed, Some(3));
        assert_eq!(parsed.search.space, SearchSpace::Exhaustive);
    }

    #[test]
    fn test_config_file_casing_is_uniform() {
        let parsed: AnalysisConfig = serde_json::from_str(
            r#"{ "happiness": { "reducer": "sum" }, "search": { "space": { "kind": "exhaustive" } } }"#,
        )
        .unwrap();
        assert_eq!(parsed.happiness.reducer, Reducer::Sum);
        assert!(serde_json::from_str::<Reducer>(r#""Sum""#).is_err());
    }

    #[test]
    fn test_zero_sample_limit_rejected() {
        let mut config = AnalysisConfig::default();
        config.search.space = SearchSpace::Sampled {
            limit: 0,
            seed: None,
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_reducers() {
        let values = [1.0, 0.0, 0.5];
        assert_eq!(Reducer::Sum.reduce(&values), 1.5);
        assert_eq!(Reducer::Mean.reduce(&values), 0.5);
        assert_eq!(Reducer::Mean.reduce(&[]), 0.0);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let space = SearchSpace::Sampled {
            limit: 1,
            seed: Some(42),
        };
        let a: u64 = space.rng().gen();
        let b: u64 = space.rng().gen();
        assert_eq!(a, b);
    }
}
