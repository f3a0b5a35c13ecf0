//! Pdprune is a library to measure how much phylogenetic diversity is lost
//! when extinction is linked to inherited traits, compared with random
//! extinction of the same intensity.
//!
//! Core functionality provided:
//! - Tree generation: birth-death process (conditioned on number of taxa or
//!   on time) and Kingman coalescent, see [crate::simulate].
//! - Trait evolution: binary traits inherited along the branches, either a
//!   single trait or a tract of traits per vertex, see [crate::traits].
//! - Extinction policies: field of bullets, trait-dependent and
//!   trait-frequency extinction, see [crate::extinction].
//! - Pruning: induced subtree of the surviving taxa, with traits carried over,
//!   see [crate::pruning].
//! - Phylogenetic diversity of (pruned) trees, see [crate::diversity].
//! - Experiments combining all of the above, see [crate::experiment].
//! - Tree models:
//!   - [CompactTree] + [LeafLabelMap]: All trees of an ensemble share one
//!     index-to-label mapping and each leaf only stores a label index.
//!   - Trees use the arena pattern, so no direct vertex references are
//!     stored, only vertex indices. See [crate::model] for more details.
//!
//! Limitations:
//! - Only binary trees
//! - Only binary traits
//!
//! All parameters are collected in an [ExperimentConfig]; all randomness
//! derives from its seed, and ensembles are processed in parallel.
//!
//! # Example
//! ```
//! use pdprune::{ExperimentConfig, run_kingman};
//!
//! let config = ExperimentConfig {
//!     replicates: 20,
//!     ..ExperimentConfig::default()
//! };
//! let outcome = run_kingman(&config)?;
//! for (random, selective) in outcome.diversity.pairs() {
//!     println!("{random:.3} {selective:.3}");
//! }
//! let (random_pruned, trait_pruned, diversity) = outcome.into_parts();
//! assert_eq!(random_pruned.len(), 20);
//! assert_eq!(trait_pruned.len(), diversity.len());
//! # Ok::<(), pdprune::error::ExperimentError>(())
//! ```
//!
//! The library logs through the [log] facade; install any logger to see it.

pub mod config;
pub mod diversity;
pub mod error;
pub mod experiment;
pub mod extinction;
pub mod model;
pub mod newick;
pub mod pruning;
pub mod rng;
pub mod simulate;
pub mod traits;

pub use crate::config::ExperimentConfig;
pub use crate::diversity::{DiversityComparison, phylogenetic_diversity};
pub use crate::experiment::{ExperimentOutcome, run_birth_death_taxa, run_birth_death_time, run_kingman};
pub use crate::model::{CompactTree, LeafLabelMap};
pub use crate::traits::TraitTree;
