//! Evolution configuration types.
//!
//! Everything here is plain serde data so a run can be described in a JSON
//! file and validated before any generation executes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Number of organisms a breeding pair turns into (3 offspring + 1 elite).
pub const ORGANISMS_PER_PAIR: usize = 4;

/// Top-level configuration for an evolutionary run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of organisms per generation. Must be a positive multiple of 4.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Generation budget. `None` runs until another policy fires.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: Option<usize>,
    /// Stop once the best fitness is at or below this cost.
    #[serde(default = "default_acceptable_score")]
    pub acceptable_score: Option<f64>,
    /// Stop after this many generations without improvement of the best cost.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            max_iterations: default_max_iterations(),
            acceptable_score: default_acceptable_score(),
            stagnation_limit: None,
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    20
}
fn default_max_iterations() -> Option<usize> {
    Some(1000)
}
fn default_acceptable_score() -> Option<f64> {
    Some(0.0)
}

impl EvolutionConfig {
    /// Half the population: the number of survivors kept by selection.
    #[inline]
    pub fn survivor_count(&self) -> usize {
        self.population_size / 2
    }

    /// Number of breeding pairs formed each generation.
    #[inline]
    pub fn pair_count(&self) -> usize {
        self.population_size / ORGANISMS_PER_PAIR
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_population_size(self.population_size)?;

        if let Some(score) = self.acceptable_score
            && score.is_nan()
        {
            return Err(ConfigError::InvalidAcceptableScore);
        }

        Ok(())
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

/// Check that `size` splits into an integral number of breeding pairs.
pub fn validate_population_size(size: usize) -> Result<(), ConfigError> {
    if size < ORGANISMS_PER_PAIR || size % ORGANISMS_PER_PAIR != 0 {
        return Err(ConfigError::InvalidPopulationSize(size));
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be a positive multiple of 4, got {0}")]
    InvalidPopulationSize(usize),
    #[error("Acceptable score must not be NaN")]
    InvalidAcceptableScore,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
