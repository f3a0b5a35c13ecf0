//! Error types of the pipeline.
//!
//! - [ConfigError]: invalid parameters, reported before any work starts
//! - [GenerationError]: the tree provider could not produce a tree
//! - [PruneError]: a single tree could not be pruned; contained per tree
//!   by the [pruning](crate::pruning) executor
//! - [AnnotationError]: misuse of an [Annotations](crate::model::Annotations) table
//! - [ExperimentError]: everything an orchestrator run can fail with

use crate::model::VertexIndex;
use thiserror::Error;

/// Invalid parameter in an experiment configuration or model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A probability outside of `[0, 1]`
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    /// A rate that is negative or not finite
    #[error("{name} must be a non-negative finite rate, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    /// A quantity that must be strictly positive
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    /// A count below its minimum
    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        value: usize,
        min: usize,
    },
    /// Error reading the configuration file
    #[error("cannot read configuration: {0}")]
    Io(String),
    /// Malformed YAML
    #[error("cannot parse configuration: {0}")]
    Yaml(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}

/// The tree provider could not satisfy its generation constraints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Every simulated lineage went extinct in each attempt
    #[error("all lineages went extinct in each of {attempts} attempts")]
    AllAttemptsExtinct { attempts: usize },
    /// Generating model has invalid parameters
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Structural or attribute failure while pruning a single tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PruneError {
    /// A leaf lacks the trait the extinction policy depends on,
    /// e.g. because traits were never evolved on the tree
    #[error("leaf {0} carries no trait")]
    MissingTrait(VertexIndex),
    /// A trait vector of length zero has no trait frequency
    #[error("leaf {0} carries an empty trait vector")]
    EmptyTraitVector(VertexIndex),
    /// The computed extinction probability is outside of `[0, 1]`
    #[error("extinction probability {probability} of leaf {vertex} is not in [0, 1]")]
    InvalidProbability { vertex: VertexIndex, probability: f64 },
    /// The tree violates the structural invariants of a phylogenetic tree
    #[error("tree is malformed")]
    MalformedTree,
    /// The policy for this tree could not be created
    #[error("invalid extinction policy: {0}")]
    Policy(#[from] ConfigError),
}

/// Misuse of an annotation side-table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// Annotations are written once
    #[error("vertex {0} is already annotated")]
    AlreadySet(VertexIndex),
    /// Index is not a vertex of the annotated tree
    #[error("vertex {vertex_index} out of bounds for tree with {num_vertices} vertices")]
    OutOfBounds {
        vertex_index: VertexIndex,
        num_vertices: usize,
    },
}

/// Failure of an experiment run as a whole.
///
/// Per-tree pruning failures are not among them: they degrade the affected
/// slot to a placeholder tree instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExperimentError {
    /// Configuration rejected before generation
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Tree generation failed
    #[error("tree generation failed: {0}")]
    Generation(#[from] GenerationError),
}
