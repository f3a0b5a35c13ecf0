//! Vertex module for phylogenetic tree representation.

use crate::model::tree::VertexIndex;
use std::ops::Deref;

/// During construction, Internal and Leaf vertex might not have parent set yet.
/// A leaf that became the root of a pruned tree also has no parent.
const NO_PARENT_SET: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has two children, no parent and rarely a branch_length
/// - **Internal**: Has two children, no label, might have branch_length
/// - **Leaf**: Has no children, has label (via `L`) and might have branch_length
///
/// Generic over `L`, the way a leaf refers to its taxon
/// (e.g. a [LabelIndex](crate::model::LabelIndex) into a shared
/// [LeafLabelMap](crate::model::LeafLabelMap)).
///
/// # Invariants
/// - `index` is index in arena
/// - `branch_length` is non-negative (enforced); might not be set
/// - Internal vertices and leaves have `parent` set once attached;
///   `NO_PARENT_SET = usize::MAX` during construction, or for a leaf that is
///   the only vertex left in a pruned tree
/// - Root and internal vertices have `children` as tuple of [VertexIndex]
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex<L> {
    /// Root vertex of the tree (has no parent, has two children)
    Root {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Indices of the two child vertices
        children: (VertexIndex, VertexIndex),
        /// Length of a stem above the root (rare)
        branch_length: Option<BranchLength>,
    },
    /// Internal vertex (has parent and two children, no label)
    Internal {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Indices of the two child vertices
        children: (VertexIndex, VertexIndex),
        /// Distance to parent vertex (optional, non-negative if present)
        branch_length: Option<BranchLength>,
    },
    /// Leaf vertex (has parent and label, no children)
    Leaf {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Distance to parent vertex (optional, non-negative if present)
        branch_length: Option<BranchLength>,
        /// Taxon of this leaf
        label: L,
    },
}

impl<L> Vertex<L> {
    /// Creates a new root vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Tuple of child indices
    /// * `branch_length` - Optional stem length above the root
    pub fn new_root(
        index: VertexIndex,
        children: (VertexIndex, VertexIndex),
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Root {
            index,
            children,
            branch_length,
        }
    }

    /// Creates a new root vertex without a stem.
    pub fn new_root_without_branch(index: VertexIndex, children: (VertexIndex, VertexIndex)) -> Self {
        Self::new_root(index, children, None)
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Tuple of child indices
    /// * `branch_length` - Distance to parent vertex (non-negative)
    pub fn new_internal(
        index: VertexIndex,
        children: (VertexIndex, VertexIndex),
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: NO_PARENT_SET,
            children,
            branch_length,
        }
    }

    /// Creates a new leaf vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `branch_length` - Distance to parent vertex (non-negative)
    /// * `label` - Taxon of this leaf
    pub fn new_leaf(index: VertexIndex, branch_length: Option<BranchLength>, label: L) -> Self {
        Vertex::Leaf {
            index,
            parent: NO_PARENT_SET,
            branch_length,
            label,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. }
            | Vertex::Internal { index, .. }
            | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns whether this vertex has a [BranchLength].
    ///
    /// The root counts as having one, since its stem is optional.
    pub fn has_branch_length(&self) -> bool {
        match self {
            Vertex::Root { .. } => true,
            Vertex::Internal { branch_length, .. } | Vertex::Leaf { branch_length, .. } => {
                branch_length.is_some()
            }
        }
    }

    /// Returns the branch length of this vertex, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Replaces the branch length of this vertex.
    pub fn set_branch_length(&mut self, length: Option<BranchLength>) {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length = length,
        }
    }

    /// Returns label if this is a leaf, else `None`.
    pub fn label(&self) -> Option<&L> {
        match self {
            Vertex::Leaf { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children if this is a root or internal vertex, else `None`.
    pub fn children(&self) -> Option<(VertexIndex, VertexIndex)> {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => Some(*children),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Sets new parent for non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_parent(&mut self, parent: VertexIndex) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set parent on root vertex"),
            Vertex::Internal { parent: p, .. } | Vertex::Leaf { parent: p, .. } => *p = parent,
        }
    }

    /// Returns the index of parent if this a non-root vertex, else `None`.
    ///
    /// Note that parent might not be set yet during construction.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                if *parent == NO_PARENT_SET {
                    None
                } else {
                    Some(*parent)
                }
            }
            Vertex::Root { .. } => None,
        }
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Converts the label of a leaf, keeping all structural fields.
    pub(crate) fn map_label<M>(self, f: &mut impl FnMut(L) -> M) -> Vertex<M> {
        match self {
            Vertex::Root {
                index,
                children,
                branch_length,
            } => Vertex::Root {
                index,
                children,
                branch_length,
            },
            Vertex::Internal {
                index,
                parent,
                children,
                branch_length,
            } => Vertex::Internal {
                index,
                parent,
                children,
                branch_length,
            },
            Vertex::Leaf {
                index,
                parent,
                branch_length,
                label,
            } => Vertex::Leaf {
                index,
                parent,
                branch_length,
                label: f(label),
            },
        }
    }

    /// Turns an internal vertex into a root with the same children and no stem;
    /// a leaf becomes a parentless leaf without branch length.
    pub(crate) fn into_root(self) -> Self {
        match self {
            Vertex::Root {
                index, children, ..
            }
            | Vertex::Internal {
                index, children, ..
            } => Vertex::Root {
                index,
                children,
                branch_length: None,
            },
            Vertex::Leaf { index, label, .. } => Vertex::Leaf {
                index,
                parent: NO_PARENT_SET,
                branch_length: None,
                label,
            },
        }
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl std::ops::Add for BranchLength {
    type Output = BranchLength;

    fn add(self, rhs: BranchLength) -> BranchLength {
        BranchLength(self.0 + rhs.0)
    }
}

impl std::fmt::Display for BranchLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
