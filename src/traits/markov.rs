//! Two-state Markov models of binary traits.

use crate::config::{ScalarTraitConfig, TraitTractConfig, check_probability};
use crate::error::ConfigError;
use crate::traits::{BinaryTrait, TraitModel, TraitVector};
use rand::Rng;

/// One step of the two-state chain along a branch.
fn step<R: Rng + ?Sized>(state: BinaryTrait, p01: f64, p10: f64, rng: &mut R) -> BinaryTrait {
    let u = rng.r#gen::<f64>();
    match state {
        BinaryTrait::Zero if u < p01 => BinaryTrait::One,
        BinaryTrait::One if u < p10 => BinaryTrait::Zero,
        unchanged => unchanged,
    }
}

// =#========================================================================#=
// SCALAR
// =#========================================================================#=
/// Single binary trait switching along each branch with a fixed probability,
/// independent of the branch length.
///
/// The root state is uniform over `{0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkovTrait {
    p01: f64,
    p10: f64,
}

impl MarkovTrait {
    /// Creates the model from its switching probabilities.
    ///
    /// # Arguments
    /// * `p01` - Probability that a child of a `Zero` parent is `One`
    /// * `p10` - Probability that a child of a `One` parent is `Zero`
    ///
    /// # Errors
    /// [ConfigError::InvalidProbability] if a probability is outside of `[0, 1]`.
    pub fn new(p01: f64, p10: f64) -> Result<Self, ConfigError> {
        check_probability("p01", p01)?;
        check_probability("p10", p10)?;
        Ok(MarkovTrait { p01, p10 })
    }

    /// Model with probabilities taken from `config`.
    pub fn from_config(config: &ScalarTraitConfig) -> Result<Self, ConfigError> {
        Self::new(config.p01, config.p10)
    }

    pub fn p01(&self) -> f64 {
        self.p01
    }

    pub fn p10(&self) -> f64 {
        self.p10
    }
}

impl TraitModel for MarkovTrait {
    type Trait = BinaryTrait;

    fn root_state<R: Rng + ?Sized>(&self, rng: &mut R) -> BinaryTrait {
        BinaryTrait::from(rng.r#gen::<bool>())
    }

    fn transition<R: Rng + ?Sized>(&self, parent: &BinaryTrait, rng: &mut R) -> BinaryTrait {
        step(*parent, self.p01, self.p10, rng)
    }
}

// =#========================================================================#=
// VECTOR
// =#========================================================================#=
/// Tract of independent binary traits, position `i` switching with its own
/// probabilities `transitions[i] = [p01, p10]`.
///
/// Unlike [MarkovTrait], the root state is fixed: every position starts at
/// `Zero`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovTraitTract {
    transitions: Vec<[f64; 2]>,
}

impl MarkovTraitTract {
    /// Creates the model from per-position switching probabilities.
    ///
    /// # Errors
    /// [ConfigError] if the tract is empty or a probability is outside of `[0, 1]`.
    pub fn new(transitions: Vec<[f64; 2]>) -> Result<Self, ConfigError> {
        if transitions.is_empty() {
            return Err(ConfigError::TooSmall {
                name: "tract length",
                value: 0,
                min: 1,
            });
        }
        for [p01, p10] in &transitions {
            check_probability("p01", *p01)?;
            check_probability("p10", *p10)?;
        }
        Ok(MarkovTraitTract { transitions })
    }

    /// Tract of `len` positions sharing the same probabilities.
    pub fn uniform(len: usize, p01: f64, p10: f64) -> Result<Self, ConfigError> {
        Self::new(vec![[p01, p10]; len])
    }

    /// Model with probabilities taken from `config`.
    pub fn from_config(config: &TraitTractConfig) -> Result<Self, ConfigError> {
        Self::new(config.transitions.clone())
    }

    /// Number of positions of the tract.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Always `false`; a tract has at least one position.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl TraitModel for MarkovTraitTract {
    type Trait = TraitVector;

    fn root_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> TraitVector {
        vec![BinaryTrait::Zero; self.transitions.len()]
    }

    fn transition<R: Rng + ?Sized>(&self, parent: &TraitVector, rng: &mut R) -> TraitVector {
        parent
            .iter()
            .zip(&self.transitions)
            .map(|(&state, &[p01, p10])| step(state, p01, p10, rng))
            .collect()
    }
}
