//! Configuration of extinction experiments.
//!
//! All tunable parameters of an experiment live in one [ExperimentConfig],
//! passed explicitly to each [experiment](crate::experiment) run. Defaults
//! reproduce the reference parameter set; every section can be overridden
//! from YAML, missing fields fall back to the defaults.
//!
//! ```
//! use pdprune::ExperimentConfig;
//!
//! let config = ExperimentConfig::from_yaml_str("
//! replicates: 50
//! scalar_trait:
//!   p01: 0.3
//!   p10: 0.3
//! ")?;
//! assert_eq!(config.replicates, 50);
//! assert_eq!(config.birth_death.num_taxa, 49);
//! # Ok::<(), pdprune::error::ConfigError>(())
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Seed of all random streams of a run
    pub seed: u64,
    /// Number of trees per ensemble
    pub replicates: usize,
    pub birth_death: BirthDeathConfig,
    pub kingman: KingmanConfig,
    pub scalar_trait: ScalarTraitConfig,
    pub trait_tract: TraitTractConfig,
    pub extinction: ExtinctionConfig,
}

/// Birth-death tree generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthDeathConfig {
    /// Speciation rate per lineage
    pub birth: f64,
    /// Extinction rate per lineage
    pub death: f64,
    /// Number of taxa when conditioning on taxa
    pub num_taxa: usize,
    /// Time horizon when conditioning on time
    pub max_time: f64,
    /// Runs before giving up when all lineages die
    pub max_attempts: usize,
}

/// Kingman coalescent tree generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KingmanConfig {
    /// Number of sampled taxa
    pub num_leaves: usize,
    /// Population size scaling coalescence times
    pub pop_size: f64,
}

/// Single binary trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalarTraitConfig {
    /// Probability of switching from 0 to 1 along a branch
    pub p01: f64,
    /// Probability of switching from 1 to 0 along a branch
    pub p10: f64,
}

/// Tract of binary traits; `transitions[i] = [p01, p10]` of position `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitTractConfig {
    pub transitions: Vec<[f64; 2]>,
}

/// Extinction probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtinctionConfig {
    /// Trait-independent extinction probability (field of bullets)
    pub ext_prob: f64,
    /// Extinction probability of a leaf with trait 0
    pub ext0: f64,
    /// Extinction probability of a leaf with trait 1
    pub ext1: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            replicates: 314,
            birth_death: BirthDeathConfig::default(),
            kingman: KingmanConfig::default(),
            scalar_trait: ScalarTraitConfig::default(),
            trait_tract: TraitTractConfig::default(),
            extinction: ExtinctionConfig::default(),
        }
    }
}

impl Default for BirthDeathConfig {
    fn default() -> Self {
        Self {
            birth: 0.57721,
            death: 0.130357,
            num_taxa: 49,
            max_time: 9.1596,
            max_attempts: 10_000,
        }
    }
}

impl Default for KingmanConfig {
    fn default() -> Self {
        Self {
            num_leaves: 49,
            pop_size: 49.0,
        }
    }
}

impl Default for ScalarTraitConfig {
    fn default() -> Self {
        Self {
            p01: 0.46692016,
            p10: 0.25029078,
        }
    }
}

impl Default for TraitTractConfig {
    fn default() -> Self {
        Self {
            transitions: vec![[0.1, 0.01]; 10],
        }
    }
}

impl Default for ExtinctionConfig {
    fn default() -> Self {
        Self {
            ext_prob: 0.2,
            ext0: 0.618033,
            ext1: 0.20205,
        }
    }
}

impl ExperimentConfig {
    /// Load configuration from a YAML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string and validate it
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ExperimentConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replicates == 0 {
            return Err(ConfigError::TooSmall {
                name: "replicates",
                value: 0,
                min: 1,
            });
        }
        self.birth_death.validate()?;
        self.kingman.validate()?;
        self.scalar_trait.validate()?;
        self.trait_tract.validate()?;
        self.extinction.validate()
    }
}

impl BirthDeathConfig {
    /// Validate rates, taxa, time and attempts
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("birth", self.birth)?;
        check_rate("death", self.death)?;
        check_at_least("num_taxa", self.num_taxa, 2)?;
        check_positive("max_time", self.max_time)?;
        check_at_least("max_attempts", self.max_attempts, 1)
    }
}

impl KingmanConfig {
    /// Validate sample and population size
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_least("num_leaves", self.num_leaves, 2)?;
        check_positive("pop_size", self.pop_size)
    }
}

impl ScalarTraitConfig {
    /// Validate transition probabilities
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("p01", self.p01)?;
        check_probability("p10", self.p10)
    }
}

impl TraitTractConfig {
    /// Validate tract length and all transition probabilities
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_least("tract length", self.transitions.len(), 1)?;
        for [p01, p10] in &self.transitions {
            check_probability("p01", *p01)?;
            check_probability("p10", *p10)?;
        }
        Ok(())
    }
}

impl ExtinctionConfig {
    /// Validate extinction probabilities
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("ext_prob", self.ext_prob)?;
        check_probability("ext0", self.ext0)?;
        check_probability("ext1", self.ext1)
    }
}

// ============================================================================
// Parameter checks (crate)
// ============================================================================
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn check_at_least(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { name, value, min })
    }
}
