//! Tree providers: stochastic models generating ensembles of trees.
//!
//! A [TreeProvider] produces one random [CompactTree] per call. Trees label
//! their taxa `0..n`, so all trees of an ensemble share the taxon namespace
//! `T1..Tmax` returned by [generate_ensemble].
//!
//! Provided models:
//! * [BirthDeath] - forward birth-death process, stopped at a number of
//!   taxa ([StopCondition::Taxa]) or at a time horizon ([StopCondition::Time])
//! * [Kingman] - pure Kingman coalescent
//!
//! # Example
//! ```
//! use pdprune::simulate::{BirthDeath, StopCondition, generate_ensemble};
//!
//! let model = BirthDeath::new(1.0, 0.2, StopCondition::Taxa(20), 100)?;
//! let (trees, taxa) = generate_ensemble(&model, 10, 7)?;
//! assert_eq!(trees.len(), 10);
//! assert!(trees.iter().all(|tree| tree.num_leaves() == 20));
//! assert_eq!(taxa.num_labels(), 20);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod birth_death;
mod kingman;
mod lineage;

pub use birth_death::{BirthDeath, StopCondition};
pub use kingman::Kingman;

use crate::error::GenerationError;
use crate::model::{CompactTree, LeafLabelMap};
use crate::rng::tree_rng;
use log::debug;
use rand::Rng;
use rayon::prelude::*;

// =#========================================================================#=
// TREE PROVIDER (trait)
// =#========================================================================T=
/// Source of random trees.
///
/// Implementations must be [Sync] so that ensembles can be generated in
/// parallel; all randomness has to come from the given `rng`.
pub trait TreeProvider: Sync {
    /// Generates one tree whose leaves carry the taxa `0..n`.
    ///
    /// # Errors
    /// [GenerationError] if the model cannot satisfy its constraints.
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<CompactTree, GenerationError>;
}

/// Generates an ensemble of `replicates` independent trees.
///
/// Tree `i` is generated from random stream `i` of `seed`, so the ensemble is
/// reproducible and independent of thread scheduling.
///
/// # Returns
/// * `(Vec<CompactTree>, LeafLabelMap)` - The trees, in order, and their shared taxa
/// * [GenerationError] - If any tree could not be generated
pub fn generate_ensemble<P: TreeProvider>(
    provider: &P,
    replicates: usize,
    seed: u64,
) -> Result<(Vec<CompactTree>, LeafLabelMap), GenerationError> {
    let trees = (0..replicates)
        .into_par_iter()
        .map(|index| provider.generate(&mut tree_rng(seed, index)))
        .collect::<Result<Vec<_>, _>>()?;

    let max_taxa = trees.iter().map(|tree| tree.num_leaves()).max().unwrap_or(0);
    debug!("generated {} trees with up to {} taxa", trees.len(), max_taxa);

    Ok((trees, LeafLabelMap::numbered(max_taxa)))
}
