//! Phylogenetic diversity and paired comparison of ensembles.

use crate::model::GenTree;
use crate::traits::TraitTree;

/// Phylogenetic diversity of a tree: the sum of its branch lengths.
///
/// The empty tree and a tree consisting of a single leaf have diversity 0.
pub fn phylogenetic_diversity<L>(tree: &GenTree<L>) -> f64 {
    tree.total_branch_length()
}

/// Phylogenetic diversity of each tree of an ensemble, in order.
pub fn ensemble_diversity<T>(ensemble: &[TraitTree<T>]) -> Vec<f64> {
    ensemble
        .iter()
        .map(|annotated| phylogenetic_diversity(&annotated.tree))
        .collect()
}

/// Diversities of two index-aligned ensembles, e.g. the same trees pruned
/// under two extinction policies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiversityComparison {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl DiversityComparison {
    /// Number of compared pairs.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Returns the `(first, second)` diversity of each slot.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.first.iter().copied().zip(self.second.iter().copied())
    }
}

/// Pairs up the diversities of two ensembles of equal length.
///
/// # Panics
/// Panics if the ensembles differ in length.
pub fn compare_diversity<T, U>(first: &[TraitTree<T>], second: &[TraitTree<U>]) -> DiversityComparison {
    assert_eq!(
        first.len(),
        second.len(),
        "compared ensembles must be index-aligned"
    );
    DiversityComparison {
        first: ensemble_diversity(first),
        second: ensemble_diversity(second),
    }
}
