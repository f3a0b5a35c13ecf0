//! Evolution of binary traits along trees.
//!
//! A [TraitModel] assigns a state to the root and derives each child's state
//! from its parent's. [evolve] walks a tree once in pre-order and records the
//! state of every vertex in the [Annotations] of the resulting [TraitTree].
//!
//! Two models are provided:
//! * [MarkovTrait] - a single trait per vertex ([BinaryTrait])
//! * [MarkovTraitTract] - a fixed-length tract of traits per vertex ([TraitVector])
//!
//! # Example
//! ```
//! use pdprune::simulate::{Kingman, TreeProvider};
//! use pdprune::traits::{MarkovTrait, evolve};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(3);
//! let tree = Kingman::new(8, 8.0)?.generate(&mut rng)?;
//! let annotated = evolve(tree, &MarkovTrait::new(0.3, 0.1)?, &mut rng);
//! assert!(annotated.traits.is_complete());
//! assert_eq!(annotated.leaf_traits().count(), 8);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod markov;

pub use markov::{MarkovTrait, MarkovTraitTract};

use crate::model::{Annotations, CompactTree, LabelIndex, VertexIndex};
use crate::rng::tree_rng;
use log::debug;
use rand::Rng;
use rayon::prelude::*;

// =#========================================================================#=
// TRAIT VALUES
// =#========================================================================#=
/// State of a binary trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryTrait {
    Zero,
    One,
}

impl BinaryTrait {
    /// Returns `0.0` or `1.0`.
    pub fn as_f64(self) -> f64 {
        match self {
            BinaryTrait::Zero => 0.0,
            BinaryTrait::One => 1.0,
        }
    }

    pub fn is_one(self) -> bool {
        self == BinaryTrait::One
    }
}

impl From<bool> for BinaryTrait {
    fn from(value: bool) -> Self {
        if value {
            BinaryTrait::One
        } else {
            BinaryTrait::Zero
        }
    }
}

/// Tract of binary traits carried by one vertex.
pub type TraitVector = Vec<BinaryTrait>;

/// Fraction of positions in state `One`; `None` for an empty tract.
pub fn fraction_one(traits: &[BinaryTrait]) -> Option<f64> {
    if traits.is_empty() {
        return None;
    }
    let ones = traits.iter().filter(|t| t.is_one()).count();
    Some(ones as f64 / traits.len() as f64)
}

// =#========================================================================#=
// TRAIT MODEL (trait)
// =#========================================================================#=
/// Stochastic model of trait inheritance along the branches of a tree.
pub trait TraitModel: Sync {
    /// Trait carried by each vertex
    type Trait: Clone + Send + Sync;

    /// Draws the state of the root.
    fn root_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Trait;

    /// Draws the state of a child given the state of its parent.
    fn transition<R: Rng + ?Sized>(&self, parent: &Self::Trait, rng: &mut R) -> Self::Trait;
}

// =#========================================================================#=
// TRAIT TREE
// =#========================================================================#=
/// A tree together with the traits of its vertices.
#[derive(Debug, Clone)]
pub struct TraitTree<T> {
    pub tree: CompactTree,
    pub traits: Annotations<T>,
}

impl<T> TraitTree<T> {
    /// Wraps a tree without any traits.
    pub fn unannotated(tree: CompactTree) -> Self {
        let traits = Annotations::new(tree.num_vertices());
        TraitTree { tree, traits }
    }

    /// The empty tree standing in for a tree that could not be processed.
    pub fn placeholder() -> Self {
        Self::unannotated(CompactTree::empty())
    }

    /// Returns whether this is the empty tree.
    pub fn is_placeholder(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the trait of a vertex, if set.
    pub fn trait_of(&self, vertex_index: VertexIndex) -> Option<&T> {
        self.traits.get(vertex_index)
    }

    /// Returns the taxon and trait of each leaf, in pre-order.
    pub fn leaf_traits(&self) -> impl Iterator<Item = (LabelIndex, Option<&T>)> {
        self.tree.leaves().filter_map(|leaf| {
            leaf.label()
                .map(|&taxon| (taxon, self.traits.get(leaf.index())))
        })
    }

    pub fn num_leaves(&self) -> usize {
        self.tree.num_leaves()
    }
}

// =#========================================================================#=
// EVOLUTION
// =#========================================================================#=
/// Evolves traits along `tree`, root first.
///
/// Every vertex is visited once in pre-order, so each parent carries its
/// state before any of its children draws from it. The empty tree yields an
/// empty annotation.
pub fn evolve<M, R>(tree: CompactTree, model: &M, rng: &mut R) -> TraitTree<M::Trait>
where
    M: TraitModel,
    R: Rng + ?Sized,
{
    let mut traits = Annotations::new(tree.num_vertices());
    for vertex in tree.pre_order_iter() {
        let state = match vertex.parent().and_then(|parent| traits.get(parent)) {
            Some(parent_state) => model.transition(parent_state, rng),
            None => model.root_state(rng),
        };
        traits
            .set(vertex.index(), state)
            .expect("pre-order visits each vertex once");
    }
    TraitTree { tree, traits }
}

/// Evolves traits on every tree of an ensemble.
///
/// Tree `i` draws from random stream `i` of `seed`; the order of the
/// ensemble is preserved.
pub fn evolve_ensemble<M: TraitModel>(
    trees: Vec<CompactTree>,
    model: &M,
    seed: u64,
) -> Vec<TraitTree<M::Trait>> {
    let annotated: Vec<_> = trees
        .into_par_iter()
        .enumerate()
        .map(|(index, tree)| evolve(tree, model, &mut tree_rng(seed, index)))
        .collect();
    debug!("evolved traits on {} trees", annotated.len());
    annotated
}
