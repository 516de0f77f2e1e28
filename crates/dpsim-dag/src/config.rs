//! Simulation run configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Parameters of a simulation run.
///
/// All fields have defaults, so a configuration file may list only the values it changes. With default values
/// the run is fully deterministic: no stragglers and no failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the random number generator used for failures and stragglers (default: 123).
    pub seed: u64,
    /// Factor applied to all network bandwidths (default: 1).
    pub bandwidth_multiplier: f64,
    /// Factor applied to all output sizes (default: 1).
    pub output_size_multiplier: f64,
    /// Factor applied to all computation lengths (default: 1).
    pub comp_length_multiplier: f64,
    /// Probability that a straggler-prone computation is slowed down (default: 0).
    pub straggler_probability: f64,
    /// Extra computation length of a straggler per unit of input (default: 1).
    pub straggler_multiplier: f64,
    /// Probability that a worker fails during one tick (default: 0).
    pub failure_probability: f64,
    /// Time after which the run is stopped even if not all tasks are completed (default: none).
    pub time_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 123,
            bandwidth_multiplier: 1.,
            output_size_multiplier: 1.,
            comp_length_multiplier: 1.,
            straggler_probability: 0.,
            straggler_multiplier: 1.,
            failure_probability: 0.,
            time_limit: None,
        }
    }
}

impl Config {
    /// Restores default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks that probabilities and multipliers are in their valid ranges.
    pub fn validate(&self) -> Result<(), String> {
        for (name, p) in [
            ("straggler_probability", self.straggler_probability),
            ("failure_probability", self.failure_probability),
        ] {
            if !(0. ..=1.).contains(&p) {
                return Err(format!("{} must be in [0, 1], got {}", name, p));
            }
        }
        for (name, m) in [
            ("bandwidth_multiplier", self.bandwidth_multiplier),
            ("output_size_multiplier", self.output_size_multiplier),
            ("comp_length_multiplier", self.comp_length_multiplier),
            ("straggler_multiplier", self.straggler_multiplier),
        ] {
            if !m.is_finite() || m < 0. {
                return Err(format!("{} must be a non-negative number, got {}", name, m));
            }
        }
        if self.bandwidth_multiplier == 0. {
            return Err("bandwidth_multiplier must be positive".to_string());
        }
        Ok(())
    }
}

/// Reads run configuration from YAML file.
pub fn read_config<P: AsRef<Path>>(file: P) -> Config {
    serde_yaml::from_str(
        &std::fs::read_to_string(&file).unwrap_or_else(|_| panic!("Can't read file {}", file.as_ref().display())),
    )
    .unwrap_or_else(|e| panic!("Can't parse YAML from file {}: {}", file.as_ref().display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("failure_probability: 0.01\nseed: 7\n").unwrap();
        assert_eq!(config.failure_probability, 0.01);
        assert_eq!(config.seed, 7);
        assert_eq!(config.bandwidth_multiplier, 1.);
        assert_eq!(config.time_limit, None);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut config = Config {
            straggler_probability: 0.5,
            failure_probability: 0.1,
            ..Config::default()
        };
        config.reset();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn validation() {
        assert!(Config::default().validate().is_ok());
        let config = Config {
            failure_probability: 1.5,
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().contains("failure_probability"));
        let config = Config {
            bandwidth_multiplier: 0.,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
