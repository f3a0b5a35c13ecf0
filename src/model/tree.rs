//! Provides generic tree representations.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [`GenTree<L>`] - Main tree structure using the arena pattern
//!   for efficient memory layout, generic over the way leaves refer to taxa.
//! * [CompactTree] as realization with [LabelIndex]
//! * [PrunedTree] as result of induced-subtree pruning
//! * [VertexIndex] as type used to index vertices in tree

use crate::model::leaf_label_map::{LabelIndex, LeafLabelMap};
use crate::model::vertex::{BranchLength, Vertex};
use crate::newick;
use crate::newick::NewickStyle;
use std::collections::HashSet;
use std::hash::Hash;

/// Float comparison tolerance
const EPSILON: f64 = 1e-7;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// Index for unset root, during construction and for the empty tree.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A binary phylogenetic tree represented using the arena pattern
/// on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Aim is to avoid referencing troubles as well as to provide
/// efficient memory layout and cache locality for traversal operations.
///
/// Generic over `L`, representing how leaves refer to their taxon
/// (e.g. as index into a shared [LeafLabelMap]).
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained.
///   (e.g. leaves must not be first `n` indices)
/// - Branch lengths are optional, but if provided must be non-negative.
///
/// Besides proper binary trees, two degenerate shapes occur as results of
/// pruning: the *empty tree* without any vertex (see [GenTree::empty]) and
/// a tree consisting of a single leaf, which then is its root.
///
/// # Construction
/// To construct a tree, specify its size based on the number of leaves,
/// then add vertices one by one. Bottom-up construction is likely easiest,
/// but indices can also be managed otherwise.
/// Test validity with [`GenTree::is_valid()`].
#[derive(Debug, Clone)]
pub struct GenTree<L> {
    /// Number of leaf vertices the tree was initialized for
    num_leaves_init: usize,

    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex<L>>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Name of tree; optional
    name: Option<String>,
}

/// Tree with shared labels via [LeafLabelMap], which is efficient for set of trees.
pub type CompactTree = GenTree<LabelIndex>;

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl<L> GenTree<L> {
    /// Creates a new tree with capacity for a binary tree with `num_leaves` leaves.
    ///
    /// # Arguments
    /// `num_leaves` - number of leaves of the new binary tree, implying number of vertices; must be positive
    pub fn new(num_leaves: usize) -> Self {
        assert!(num_leaves > 0);
        let capacity = 2 * num_leaves - 1;
        GenTree {
            num_leaves_init: num_leaves,
            name: None,
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Creates the empty tree, which has no vertices at all.
    ///
    /// It is the result of pruning every leaf and serves as placeholder for
    /// failed slots of an ensemble. It has no leaves and total branch length 0.
    pub fn empty() -> Self {
        GenTree {
            num_leaves_init: 0,
            name: None,
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::new(),
        }
    }

    /// Creates a tree consisting of a single leaf without branch length,
    /// which is also its root.
    pub fn single_leaf(label: L) -> Self {
        GenTree {
            num_leaves_init: 1,
            name: None,
            root_index: 0,
            vertices: vec![Vertex::new_leaf(0, None, label)],
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Tuple of child indices
    /// * `branch_length` - Optional length of incoming edge (for special cases, non-negative)
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root(
        &mut self,
        children: (VertexIndex, VertexIndex),
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_root(index, children, branch_length));

        self.root_index = index;
        self[children.0].set_parent(index);
        self[children.1].set_parent(index);

        index
    }

    /// Adds a root without stem to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Tuple of child indices
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root_without_branch(&mut self, children: (VertexIndex, VertexIndex)) -> VertexIndex {
        self.add_root(children, None)
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Tuple of child indices
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent (non-negative)
    ///
    /// # Returns
    /// The index of the newly created internal vertex.
    pub fn add_internal_vertex(
        &mut self,
        children: (VertexIndex, VertexIndex),
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length));

        self[children.0].set_parent(index);
        self[children.1].set_parent(index);

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent (non-negative)
    /// * `label` - Taxon of this leaf (type depends on tree variant)
    ///
    /// # Returns
    /// The index of the newly created leaf vertex.
    pub fn add_leaf(&mut self, branch_length: Option<BranchLength>, label: L) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, label));
        index
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns whether this is the empty tree (no vertices).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set, i.e. the tree is empty or
    /// hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex<L> {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex<L> {
        &self[index]
    }

    /// Returns the number of leaves this tree was initialized to hold.
    ///
    /// This represents the capacity, not necessarily the current count of leaf vertices.
    pub fn num_leaves_init(&self) -> usize {
        self.num_leaves_init
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the leaves of this tree in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = &Vertex<L>> {
        self.pre_order_iter().filter(|v| v.is_leaf())
    }

    /// Returns the labels (taxa) of the leaves of this tree in pre-order.
    pub fn leaf_labels(&self) -> impl Iterator<Item = &L> {
        self.leaves().filter_map(|v| v.label())
    }

    /// Returns the height of this tree (assuming it is ultrametric; undefined otherwise),
    /// that is, the distance of the root to any/each leaf.
    ///
    /// # Panics
    /// Panics if the tree is empty.
    pub fn height(&self) -> f64 {
        self.height_of(&self[self.root_index])
    }

    /// Returns the height of the given vertex (assuming it is ultrametric;
    /// result undefined otherwise), that is, the distance of the given vertex
    /// to any/each leaf. Missing branch lengths count as 0.
    ///
    /// # Arguments
    /// * `vertex` - Vertex for which you want the height
    pub fn height_of(&self, vertex: &Vertex<L>) -> f64 {
        let mut height = 0.0;
        let mut current_vertex = vertex;
        while let Some((left, _)) = current_vertex.children() {
            current_vertex = &self.vertices[left];
            height += current_vertex.branch_length().map_or(0.0, |bl| *bl);
        }

        height
    }

    /// Checks if the tree is ultrametric (all leaves equidistant from root).
    /// Missing branch lengths count as 0.
    ///
    /// # Returns
    /// `true` if all leaves are at the same distance from the root (within floating point tolerance),
    /// `false` otherwise.
    pub fn is_ultrametric(&self) -> bool {
        // Store distance from leaves in subtree to parent for each vertex
        let mut distances = vec![0.0; self.num_vertices()];

        for vertex in self.post_order_iter() {
            let own = vertex.branch_length().map_or(0.0, |bl| *bl);
            match vertex.children() {
                None => distances[vertex.index()] = own,
                Some((left, right)) => {
                    let left_dist: f64 = distances[left];
                    let right_dist: f64 = distances[right];

                    if (left_dist - right_dist).abs() > EPSILON * left_dist.max(1.0) {
                        return false;
                    }

                    distances[vertex.index()] = left_dist + own;
                }
            }
        }

        true
    }

    /// Returns the sum of all branch lengths in the tree,
    /// i.e. its phylogenetic diversity. Missing branch lengths count as 0.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter_map(|v| v.branch_length())
            .map(|bl| *bl)
            .sum::<f64>()
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.is_root() || !v.has_parent() || v.has_branch_length())
    }

    /// Converts the labels of all leaves, keeping the structure and indices.
    pub fn map_labels<M, F: FnMut(L) -> M>(self, mut f: F) -> GenTree<M> {
        GenTree {
            num_leaves_init: self.num_leaves_init,
            vertices: self
                .vertices
                .into_iter()
                .map(|v| v.map_label(&mut f))
                .collect(),
            root_index: self.root_index,
            name: self.name,
        }
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Empty tree is valid; otherwise root index is valid
    /// - A single-vertex tree consists of a parentless leaf
    /// - Otherwise the root points to the only Root vertex
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Number of leaves matches the binary tree invariant
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.vertices.is_empty() {
            return self.root_index == NO_ROOT_SET_INDEX;
        }

        // Check root index is set and within bounds
        if self.root_index >= self.vertices.len() {
            return false;
        }

        if self.vertices.len() == 1 {
            let only = &self.vertices[0];
            return self.root_index == 0 && only.is_leaf() && !only.has_parent();
        }

        // Check root is actually a Root variant
        if !self.vertices[self.root_index].is_root() {
            return false;
        }

        let mut leaf_count = 0;
        let mut found_root = false;

        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            // Check that there is only one root
            if vertex.is_root() {
                if found_root {
                    return false;
                }
                found_root = true;
            }

            if vertex.is_leaf() {
                leaf_count += 1;
            }

            // Check children references
            if let Some((left, right)) = vertex.children() {
                if left >= self.vertices.len() || right >= self.vertices.len() {
                    return false;
                }

                // Check children point back to this vertex as parent
                let left_parent = self.vertices[left].parent();
                let right_parent = self.vertices[right].parent();
                if left_parent != Some(index) || right_parent != Some(index) {
                    return false;
                }
            }

            // Check parent references
            if !vertex.is_root() {
                match vertex.parent() {
                    None => return false, // Non-root without parent
                    Some(parent_index) => {
                        if parent_index >= self.vertices.len() {
                            return false;
                        }

                        // Check parent includes this vertex in its children
                        match self.vertices[parent_index].children() {
                            Some((left, right)) if left == index || right == index => {}
                            _ => return false,
                        }
                    }
                }
            }
        }

        // for n leaves, there are 2n-1 vertices
        leaf_count == self.vertices.len().div_ceil(2)
    }
}

impl<L> std::ops::Index<VertexIndex> for GenTree<L> {
    type Output = Vertex<L>;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl<L> std::ops::IndexMut<VertexIndex> for GenTree<L> {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// PRUNING
// =$========================================================================$=
/// Result of pruning leaves from a tree: the induced subtree on the kept
/// leaves together with the vertex index mapping from the original tree.
#[derive(Debug, Clone)]
pub struct PrunedTree<L> {
    /// The pruned tree
    pub tree: GenTree<L>,
    /// For each vertex of the original tree, its index in the pruned tree;
    /// `None` if it was removed or suppressed
    pub mapping: Vec<Option<VertexIndex>>,
}

impl<L: Clone> GenTree<L> {
    /// Computes the subtree induced by the leaves for which `keep` returns `true`.
    ///
    /// - Vertices without any kept descendant are removed.
    /// - A vertex left with a single child is suppressed; its incoming
    ///   branch is merged into the branch of the surviving child.
    /// - If the root is left with a single child, that child becomes the
    ///   new root and its stem is dropped.
    ///
    /// Keeping no leaf yields the [empty tree](GenTree::empty), keeping one
    /// leaf a tree consisting of only that leaf. The original tree is
    /// not modified.
    ///
    /// # Arguments
    /// * `keep` - Decides per leaf vertex whether it survives
    pub fn prune_leaves<F>(&self, mut keep: F) -> PrunedTree<L>
    where
        F: FnMut(&Vertex<L>) -> bool,
    {
        let mut mapping = vec![None; self.vertices.len()];
        if !self.is_root_set() {
            return PrunedTree {
                tree: GenTree::empty(),
                mapping,
            };
        }

        let mut pruned = GenTree {
            num_leaves_init: 0,
            vertices: Vec::with_capacity(self.vertices.len()),
            root_index: NO_ROOT_SET_INDEX,
            name: self.name.clone(),
        };
        // Index in pruned tree of the vertex representing each original subtree
        let mut survivor: Vec<Option<VertexIndex>> = vec![None; self.vertices.len()];

        for vertex in self.post_order_iter() {
            let index = vertex.index();
            match vertex {
                Vertex::Leaf {
                    branch_length,
                    label,
                    ..
                } => {
                    if keep(vertex) {
                        let new_index = pruned.add_leaf(*branch_length, label.clone());
                        survivor[index] = Some(new_index);
                        mapping[index] = Some(new_index);
                    }
                }
                Vertex::Root {
                    children: (left, right),
                    branch_length,
                    ..
                }
                | Vertex::Internal {
                    children: (left, right),
                    branch_length,
                    ..
                } => match (survivor[*left], survivor[*right]) {
                    (Some(a), Some(b)) => {
                        let new_index = if vertex.is_root() {
                            pruned.add_root((a, b), *branch_length)
                        } else {
                            pruned.add_internal_vertex((a, b), *branch_length)
                        };
                        survivor[index] = Some(new_index);
                        mapping[index] = Some(new_index);
                    }
                    (Some(only), None) | (None, Some(only)) => {
                        let merged = match (pruned[only].branch_length(), *branch_length) {
                            (Some(a), Some(b)) => Some(a + b),
                            (a, b) => a.or(b),
                        };
                        pruned[only].set_branch_length(merged);
                        survivor[index] = Some(only);
                    }
                    (None, None) => {}
                },
            }
        }

        match survivor[self.root_index] {
            None => PrunedTree {
                tree: GenTree::empty(),
                mapping,
            },
            Some(new_root) => {
                if !pruned[new_root].is_root() {
                    let promoted = pruned[new_root].clone().into_root();
                    pruned[new_root] = promoted;
                }
                pruned.root_index = new_root;
                pruned.num_leaves_init = pruned.num_leaves();
                PrunedTree {
                    tree: pruned,
                    mapping,
                }
            }
        }
    }
}

impl<L: Clone + Eq + Hash> GenTree<L> {
    /// Removes the leaves with the given taxa, see [GenTree::prune_leaves].
    /// Taxa that do not occur in the tree are ignored.
    ///
    /// # Arguments
    /// * `taxa` - Taxa of the leaves to remove
    pub fn prune_taxa(&self, taxa: &[L]) -> PrunedTree<L> {
        let doomed: HashSet<&L> = taxa.iter().collect();
        self.prune_leaves(|leaf| leaf.label().is_none_or(|label| !doomed.contains(label)))
    }
}

// ============================================================================
// Printing (pub, only for CompactTree)
// ============================================================================
impl CompactTree {
    /// Convenience method to convert this tree to a Newick string
    pub fn to_newick(&self, style: &NewickStyle, leaf_label_map: Option<&LeafLabelMap>) -> String {
        newick::to_newick(style, self, leaf_label_map)
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl<L> GenTree<L> {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for computing heights, aggregating data from leaves upward, etc.
    pub fn post_order_iter(&self) -> PostOrderIter<'_, L> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children.
    /// This is useful for propagating data from root to leaves.
    ///
    /// # Example
    /// ```
    /// use pdprune::model::{BranchLength, GenTree, LeafLabelMap};
    ///
    /// let mut tree = GenTree::new(2);
    /// let mut labels = LeafLabelMap::new(2);
    /// let a = tree.add_leaf(Some(BranchLength::new(1.0)), labels.get_or_insert("A"));
    /// let b = tree.add_leaf(Some(BranchLength::new(1.0)), labels.get_or_insert("B"));
    /// let root = tree.add_root_without_branch((a, b));
    ///
    /// let indices: Vec<_> = tree.pre_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![root, a, b]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_, L> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a, L> {
    tree: &'a GenTree<L>,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a, L> PostOrderIter<'a, L> {
    fn new(tree: &'a GenTree<L>) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a, L> Iterator for PostOrderIter<'a, L> {
    type Item = &'a Vertex<L>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            match vertex.children() {
                Some((left, right)) if !children_visited => {
                    self.stack.push((index, true));
                    // Push children (right first, so left is processed first)
                    self.stack.push((right, false));
                    self.stack.push((left, false));
                }
                _ => return Some(vertex),
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a, L> {
    tree: &'a GenTree<L>,
    stack: Vec<VertexIndex>,
}

impl<'a, L> PreOrderIter<'a, L> {
    fn new(tree: &'a GenTree<L>) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a, L> Iterator for PreOrderIter<'a, L> {
    type Item = &'a Vertex<L>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children onto stack (right first, so left is processed first)
        if let Some((left, right)) = vertex.children() {
            self.stack.push(right);
            self.stack.push(left);
        }

        Some(vertex)
    }
}
