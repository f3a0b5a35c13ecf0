//! Birth-death process conditioned on a number of taxa or a time horizon.

use crate::config::{BirthDeathConfig, check_positive, check_rate};
use crate::error::{ConfigError, GenerationError};
use crate::model::CompactTree;
use crate::simulate::TreeProvider;
use crate::simulate::lineage::Genealogy;
use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// When a birth-death simulation stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Stop as soon as this many lineages are alive
    Taxa(usize),
    /// Stop when the process has run for this long
    Time(f64),
}

/// Forward birth-death process starting from a single lineage.
///
/// With `n` live lineages, the time to the next event is exponentially
/// distributed with rate `n * (birth + death)`; all live lineages grow by that
/// time, then one lineage chosen uniformly at random either speciates (with
/// probability `birth / (birth + death)`) or goes extinct.
///
/// The returned tree is the reconstructed tree of the surviving lineages,
/// without the stem above the first speciation. Runs in which every lineage
/// dies are repeated, up to `max_attempts` times.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthDeath {
    birth: f64,
    death: f64,
    stop: StopCondition,
    max_attempts: usize,
}

impl BirthDeath {
    /// Creates a birth-death process.
    ///
    /// # Arguments
    /// * `birth` - Speciation rate per lineage (positive)
    /// * `death` - Extinction rate per lineage (non-negative)
    /// * `stop` - [StopCondition]; at least 2 taxa or positive time
    /// * `max_attempts` - Number of runs before giving up on total extinction (positive)
    ///
    /// # Errors
    /// [ConfigError] if a parameter is out of range.
    pub fn new(birth: f64, death: f64, stop: StopCondition, max_attempts: usize) -> Result<Self, ConfigError> {
        check_positive("birth", birth)?;
        check_rate("death", death)?;
        match stop {
            StopCondition::Taxa(n) if n < 2 => {
                return Err(ConfigError::TooSmall {
                    name: "num_taxa",
                    value: n,
                    min: 2,
                });
            }
            StopCondition::Time(t) => check_positive("max_time", t)?,
            StopCondition::Taxa(_) => {}
        }
        if max_attempts == 0 {
            return Err(ConfigError::TooSmall {
                name: "max_attempts",
                value: 0,
                min: 1,
            });
        }
        Ok(BirthDeath {
            birth,
            death,
            stop,
            max_attempts,
        })
    }

    /// Process stopped at `num_taxa` live lineages, parameters taken from `config`.
    pub fn to_taxa(config: &BirthDeathConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.birth,
            config.death,
            StopCondition::Taxa(config.num_taxa),
            config.max_attempts,
        )
    }

    /// Process stopped at time `max_time`, parameters taken from `config`.
    pub fn to_time(config: &BirthDeathConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.birth,
            config.death,
            StopCondition::Time(config.max_time),
            config.max_attempts,
        )
    }

    /// Returns the stop condition.
    pub fn stop(&self) -> StopCondition {
        self.stop
    }

    /// Runs the process once; `None` if all lineages died.
    fn simulate_once<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<CompactTree>, GenerationError> {
        let event_rate = self.birth + self.death;
        let birth_probability = self.birth / event_rate;
        let mut genealogy = Genealogy::new();
        let mut clock = 0.0;

        loop {
            let alive = genealogy.num_active();
            if alive == 0 {
                return Ok(None);
            }

            let waiting = Exp::new(alive as f64 * event_rate)
                .map_err(|_| ConfigError::InvalidRate {
                    name: "birth + death",
                    value: event_rate,
                })?
                .sample(rng);

            match self.stop {
                StopCondition::Time(max_time) if clock + waiting >= max_time => {
                    genealogy.extend(max_time - clock);
                    break;
                }
                StopCondition::Taxa(num_taxa) if alive == num_taxa => {
                    genealogy.extend(waiting);
                    break;
                }
                _ => {}
            }
            genealogy.extend(waiting);
            clock += waiting;

            let slot = rng.gen_range(0..alive);
            if rng.r#gen::<f64>() < birth_probability {
                genealogy.speciate(slot);
            } else {
                genealogy.go_extinct(slot);
            }
        }

        Ok(genealogy.into_reconstructed_tree())
    }
}

impl TreeProvider for BirthDeath {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<CompactTree, GenerationError> {
        for attempt in 1..=self.max_attempts {
            if let Some(tree) = self.simulate_once(rng)? {
                return Ok(tree);
            }
            trace!("birth-death attempt {attempt} went extinct");
        }
        Err(GenerationError::AllAttemptsExtinct {
            attempts: self.max_attempts,
        })
    }
}
