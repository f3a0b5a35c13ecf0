//! Data model for binary phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [GenTree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [VertexIndex]. Pruning may leave a tree with a single leaf
//! or with no vertex at all (the empty placeholder tree).
//!
//! All trees of an ensemble are [CompactTree]s: leaves hold a [LabelIndex]
//! (their taxon) into one [LeafLabelMap] shared by the ensemble.
//!
//! # Annotations
//! Data attached to vertices after construction, like evolved traits, lives
//! in an [Annotations] side-table parallel to the vertex arena rather than in
//! the vertices themselves.
//!
//! # Pruning
//! [GenTree::prune_leaves] and [GenTree::prune_taxa] compute the subtree
//! induced by the surviving leaves and report the vertex mapping as
//! [PrunedTree], so that annotations can follow.

pub mod annotation;
pub mod leaf_label_map;
pub mod tree;
pub mod vertex;

pub use annotation::Annotations;
pub use leaf_label_map::LabelIndex;
pub use leaf_label_map::LeafLabelMap;
pub use tree::CompactTree;
pub use tree::GenTree;
pub use tree::PrunedTree;
pub use tree::VertexIndex;
pub use vertex::BranchLength;
pub use vertex::Vertex;
