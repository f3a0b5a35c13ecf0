//! Extinction policies and per-leaf extinction verdicts.
//!
//! An [ExtinctionPolicy] maps the trait of a leaf to its probability of going
//! extinct. [extinction_verdict] draws one uniform number per leaf and
//! returns the taxa of the leaves that went extinct.
//!
//! Provided policies:
//! * [FieldOfBullets] - same probability for every leaf, traits are ignored
//! * [TraitDependent] - probability depends on a single [BinaryTrait]
//! * [TraitFrequency] - probability is the fraction of ones in a [TraitVector]

use crate::config::{ExtinctionConfig, check_probability};
use crate::error::{ConfigError, PruneError};
use crate::model::{LabelIndex, VertexIndex};
use crate::traits::{BinaryTrait, TraitTree, TraitVector, fraction_one};
use rand::Rng;

/// Rule assigning an extinction probability to a leaf.
pub trait ExtinctionPolicy<T>: Sync {
    /// Returns the probability that a leaf carrying `trait_value` goes extinct.
    ///
    /// # Arguments
    /// * `leaf` - Index of the leaf, used for error reporting
    /// * `trait_value` - Trait of the leaf, `None` if it has none
    ///
    /// # Errors
    /// [PruneError] if the policy needs a trait the leaf does not provide.
    fn extinction_probability(&self, leaf: VertexIndex, trait_value: Option<&T>) -> Result<f64, PruneError>;
}

// =#========================================================================#=
// FIELD OF BULLETS
// =#========================================================================#=
/// Every leaf goes extinct with the same probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfBullets {
    ext_prob: f64,
}

impl FieldOfBullets {
    /// # Errors
    /// [ConfigError::InvalidProbability] if `ext_prob` is outside of `[0, 1]`.
    pub fn new(ext_prob: f64) -> Result<Self, ConfigError> {
        check_probability("ext_prob", ext_prob)?;
        Ok(FieldOfBullets { ext_prob })
    }

    pub fn from_config(config: &ExtinctionConfig) -> Result<Self, ConfigError> {
        Self::new(config.ext_prob)
    }

    pub fn ext_prob(&self) -> f64 {
        self.ext_prob
    }
}

impl<T> ExtinctionPolicy<T> for FieldOfBullets {
    fn extinction_probability(&self, _leaf: VertexIndex, _trait_value: Option<&T>) -> Result<f64, PruneError> {
        Ok(self.ext_prob)
    }
}

// =#========================================================================#=
// TRAIT DEPENDENT
// =#========================================================================#=
/// A leaf goes extinct with probability `ext0` if its trait is `Zero`
/// and `ext1` if it is `One`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitDependent {
    ext0: f64,
    ext1: f64,
}

impl TraitDependent {
    /// # Errors
    /// [ConfigError::InvalidProbability] if a probability is outside of `[0, 1]`.
    pub fn new(ext0: f64, ext1: f64) -> Result<Self, ConfigError> {
        check_probability("ext0", ext0)?;
        check_probability("ext1", ext1)?;
        Ok(TraitDependent { ext0, ext1 })
    }

    pub fn from_config(config: &ExtinctionConfig) -> Result<Self, ConfigError> {
        Self::new(config.ext0, config.ext1)
    }
}

impl ExtinctionPolicy<BinaryTrait> for TraitDependent {
    fn extinction_probability(
        &self,
        leaf: VertexIndex,
        trait_value: Option<&BinaryTrait>,
    ) -> Result<f64, PruneError> {
        match trait_value.ok_or(PruneError::MissingTrait(leaf))? {
            BinaryTrait::Zero => Ok(self.ext0),
            BinaryTrait::One => Ok(self.ext1),
        }
    }
}

// =#========================================================================#=
// TRAIT FREQUENCY
// =#========================================================================#=
/// A leaf goes extinct with probability equal to the fraction of ones in its
/// trait tract: all zeros always survive, all ones always die.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TraitFrequency;

impl ExtinctionPolicy<TraitVector> for TraitFrequency {
    fn extinction_probability(
        &self,
        leaf: VertexIndex,
        trait_value: Option<&TraitVector>,
    ) -> Result<f64, PruneError> {
        let tract = trait_value.ok_or(PruneError::MissingTrait(leaf))?;
        fraction_one(tract).ok_or(PruneError::EmptyTraitVector(leaf))
    }
}

// =#========================================================================#=
// VERDICT
// =#========================================================================#=
/// Decides for each leaf of `tree` whether it goes extinct.
///
/// Leaves are visited in pre-order; each draws a fresh `u` uniform in
/// `[0, 1)` and goes extinct iff `u < p`, with `p` its extinction
/// probability. Hence `p = 0` never and `p = 1` always kills.
///
/// # Returns
/// * `Vec<LabelIndex>` - Taxa of the extinct leaves, in pre-order
/// * [PruneError] - If the policy fails on a leaf or yields a value outside of `[0, 1]`
pub fn extinction_verdict<T, P, R>(tree: &TraitTree<T>, policy: &P, rng: &mut R) -> Result<Vec<LabelIndex>, PruneError>
where
    P: ExtinctionPolicy<T> + ?Sized,
    R: Rng + ?Sized,
{
    let mut extinct = Vec::new();
    for leaf in tree.tree.leaves() {
        let index = leaf.index();
        let probability = policy.extinction_probability(index, tree.trait_of(index))?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(PruneError::InvalidProbability {
                vertex: index,
                probability,
            });
        }
        if rng.r#gen::<f64>() < probability {
            if let Some(&taxon) = leaf.label() {
                extinct.push(taxon);
            }
        }
    }
    Ok(extinct)
}
