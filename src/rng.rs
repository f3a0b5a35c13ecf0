//! Seeded random streams.
//!
//! Every ensemble-wide operation takes a single `u64` seed. Tree `i` of the
//! ensemble draws from its own ChaCha stream `i` of that seed, so results do
//! not depend on how rayon schedules the trees and one tree's randomness
//! never depends on another's. Experiments derive one seed per [Stage].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parts of an experiment that consume randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tree generation
    Generation,
    /// Trait evolution along the trees
    TraitEvolution,
    /// Pruning with the trait-dependent policy
    TraitExtinction,
    /// Pruning with the trait-independent null policy
    RandomExtinction,
}

impl Stage {
    fn stream(self) -> u64 {
        match self {
            Stage::Generation => u64::MAX,
            Stage::TraitEvolution => u64::MAX - 1,
            Stage::TraitExtinction => u64::MAX - 2,
            Stage::RandomExtinction => u64::MAX - 3,
        }
    }
}

/// Returns the random number generator of tree `index` for the given seed.
pub fn tree_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

/// Derives the seed of a [Stage] from the seed of an experiment.
pub fn stage_seed(seed: u64, stage: Stage) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stage.stream());
    rng.r#gen()
}
