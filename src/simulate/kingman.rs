//! Kingman coalescent.

use crate::config::{KingmanConfig, check_positive};
use crate::error::{ConfigError, GenerationError};
use crate::model::{BranchLength, CompactTree, VertexIndex};
use crate::simulate::TreeProvider;
use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Pure Kingman coalescent of `num_leaves` contemporaneous samples.
///
/// Going backwards in time, with `k` lineages the waiting time to the next
/// coalescence is exponentially distributed with rate `k (k - 1) / 2 / pop_size`,
/// after which two lineages chosen uniformly at random merge. The resulting
/// trees are ultrametric; leaf `i` carries taxon `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kingman {
    num_leaves: usize,
    pop_size: f64,
}

impl Kingman {
    /// Creates a coalescent for `num_leaves` samples (at least 2) from a
    /// population of size `pop_size` (positive).
    ///
    /// # Errors
    /// [ConfigError] if a parameter is out of range.
    pub fn new(num_leaves: usize, pop_size: f64) -> Result<Self, ConfigError> {
        if num_leaves < 2 {
            return Err(ConfigError::TooSmall {
                name: "num_leaves",
                value: num_leaves,
                min: 2,
            });
        }
        check_positive("pop_size", pop_size)?;
        Ok(Kingman {
            num_leaves,
            pop_size,
        })
    }

    /// Coalescent with parameters taken from `config`.
    pub fn from_config(config: &KingmanConfig) -> Result<Self, ConfigError> {
        Self::new(config.num_leaves, config.pop_size)
    }
}

impl TreeProvider for Kingman {
    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<CompactTree, GenerationError> {
        let mut tree = CompactTree::new(self.num_leaves);
        // Time (before present) at which each vertex lives
        let mut heights = Vec::with_capacity(2 * self.num_leaves - 1);
        let mut lineages: Vec<VertexIndex> = (0..self.num_leaves)
            .map(|taxon| {
                heights.push(0.0);
                tree.add_leaf(None, taxon)
            })
            .collect();

        let mut time = 0.0;
        while lineages.len() > 1 {
            let k = lineages.len() as f64;
            let rate = k * (k - 1.0) / 2.0 / self.pop_size;
            time += Exp::new(rate)
                .map_err(|_| ConfigError::InvalidRate {
                    name: "coalescence rate",
                    value: rate,
                })?
                .sample(rng);

            let first = lineages.swap_remove(rng.gen_range(0..lineages.len()));
            let second = lineages.swap_remove(rng.gen_range(0..lineages.len()));
            for child in [first, second] {
                tree[child].set_branch_length(Some(BranchLength::new(time - heights[child])));
            }

            let merged = if lineages.is_empty() {
                tree.add_root_without_branch((first, second))
            } else {
                tree.add_internal_vertex((first, second), None)
            };
            heights.push(time);
            lineages.push(merged);
        }

        Ok(tree)
    }
}
