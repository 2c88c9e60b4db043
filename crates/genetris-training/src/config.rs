//! Training configuration.
//!
//! [`TrainingConfig`] is a plain value handed to the
//! [`Trainer`](crate::trainer::Trainer) once; nothing reads configuration from
//! global state during a run. Missing fields in a serialized configuration
//! fall back to the defaults.

use std::time::Duration;

use genetris_evaluator::{
    neural_network::{NetworkTopology, TopologyError},
    placement_analysis::PlacementFeatures,
};
use serde::{Deserialize, Serialize};

/// Parameters of a training run.
///
/// # Example
///
/// ```
/// use genetris_training::config::TrainingConfig;
///
/// let config: TrainingConfig = serde_json::from_str(r#"{ "population_size": 50 }"#)?;
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 20);
/// assert!(config.validate().is_ok());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of generations to play.
    pub generations: usize,
    /// Per-weight mutation probability.
    pub mutation_rate: f64,
    /// Playback delay per tick, in milliseconds.
    pub tick_delay_ms: u64,
    /// Ticks after which a game is stopped (timed death).
    pub max_lifetime: u64,
    /// Lifetime after which spectator mode starts pacing playback.
    pub spectator_threshold: u64,
    /// Pace every tick at `tick_delay_ms`.
    pub reasonable_speed: bool,
    /// Pace ticks once a game outlives `spectator_threshold`.
    pub spectator_mode: bool,
    /// Shape of every individual's network.
    pub topology: NetworkTopology,
    /// Seed of the population random stream; a random seed is used when absent.
    pub seed: Option<u64>,
    /// Play the individuals of a generation on separate threads.
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            generations: 20,
            mutation_rate: 0.05,
            tick_delay_ms: 10,
            max_lifetime: 1_000_000,
            spectator_threshold: 30_000,
            reasonable_speed: false,
            spectator_mode: false,
            topology: NetworkTopology::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl TrainingConfig {
    #[must_use]
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }

    /// Checks the configuration before any generation is played.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange {
                rate: self.mutation_rate,
            });
        }
        if self.max_lifetime == 0 {
            return Err(ConfigError::ZeroMaxLifetime);
        }
        self.topology.validate()?;
        if self.topology.inputs != PlacementFeatures::COUNT {
            return Err(ConfigError::InputCountMismatch {
                expected: PlacementFeatures::COUNT,
                actual: self.topology.inputs,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("mutation rate must be within [0, 1], got {rate}")]
    MutationRateOutOfRange { rate: f64 },
    #[display("max lifetime must be at least 1 tick")]
    ZeroMaxLifetime,
    #[display("network must take {expected} inputs, got {actual}")]
    InputCountMismatch { expected: usize, actual: usize },
    #[display("invalid network topology: {_0}")]
    #[from]
    Topology(TopologyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_delay(), Duration::from_millis(10));
        assert_eq!(config.topology.hidden_layers, 1);
    }

    #[test]
    fn test_invalid_configurations() {
        let base = TrainingConfig::default();
        let test_cases = vec![
            (
                "empty population",
                TrainingConfig {
                    population_size: 0,
                    ..base.clone()
                },
                ConfigError::EmptyPopulation,
            ),
            (
                "negative mutation rate",
                TrainingConfig {
                    mutation_rate: -0.1,
                    ..base.clone()
                },
                ConfigError::MutationRateOutOfRange { rate: -0.1 },
            ),
            (
                "zero lifetime",
                TrainingConfig {
                    max_lifetime: 0,
                    ..base.clone()
                },
                ConfigError::ZeroMaxLifetime,
            ),
            (
                "no hidden layers",
                TrainingConfig {
                    topology: NetworkTopology {
                        hidden_layers: 0,
                        ..base.topology
                    },
                    ..base.clone()
                },
                ConfigError::Topology(TopologyError::NoHiddenLayers),
            ),
            (
                "wrong input count",
                TrainingConfig {
                    topology: NetworkTopology {
                        inputs: 4,
                        ..base.topology
                    },
                    ..base.clone()
                },
                ConfigError::InputCountMismatch {
                    expected: 5,
                    actual: 4,
                },
            ),
        ];

        for (name, config, expected) in test_cases {
            assert_eq!(config.validate(), Err(expected), "{name}");
        }
    }

    #[test]
    fn test_nan_mutation_rate_is_rejected() {
        let config = TrainingConfig {
            mutation_rate: f64::NAN,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MutationRateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{ "generations": 3, "seed": 7, "parallel": true }"#).unwrap();
        assert_eq!(config.generations, 3);
        assert_eq!(config.seed, Some(7));
        assert!(config.parallel);
        assert_eq!(config.population_size, 200);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<TrainingConfig>(r#"{ "populaton_size": 3 }"#);
        assert!(result.is_err());
    }
}
