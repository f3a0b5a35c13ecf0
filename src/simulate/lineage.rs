//! Scratch genealogy for forward-in-time simulations.

use crate::model::{BranchLength, CompactTree, GenTree, VertexIndex};

/// Lineage of a forward simulation; a tip as long as it has no children.
#[derive(Debug, Clone)]
struct Lineage {
    children: Option<(usize, usize)>,
    length: f64,
    alive: bool,
}

/// Genealogy grown top-down from a single stem lineage.
///
/// Lineage `0` is the stem. Live tips are tracked in `active`, in no
/// particular order; callers pick tips by their slot in `active`.
#[derive(Debug, Clone)]
pub(crate) struct Genealogy {
    lineages: Vec<Lineage>,
    active: Vec<usize>,
}

impl Genealogy {
    /// Starts with a single live stem lineage of length 0.
    pub(crate) fn new() -> Self {
        Genealogy {
            lineages: vec![Lineage {
                children: None,
                length: 0.0,
                alive: true,
            }],
            active: vec![0],
        }
    }

    /// Number of live tips.
    pub(crate) fn num_active(&self) -> usize {
        self.active.len()
    }

    /// Extends every live tip by `duration`.
    pub(crate) fn extend(&mut self, duration: f64) {
        for &tip in &self.active {
            self.lineages[tip].length += duration;
        }
    }

    /// Splits the live tip in `slot` into two new live tips.
    pub(crate) fn speciate(&mut self, slot: usize) {
        let parent = self.active.swap_remove(slot);
        let left = self.push_tip();
        let right = self.push_tip();
        self.lineages[parent].children = Some((left, right));
    }

    /// Ends the live tip in `slot`.
    pub(crate) fn go_extinct(&mut self, slot: usize) {
        let tip = self.active.swap_remove(slot);
        self.lineages[tip].alive = false;
    }

    fn push_tip(&mut self) -> usize {
        let index = self.lineages.len();
        self.lineages.push(Lineage {
            children: None,
            length: 0.0,
            alive: true,
        });
        self.active.push(index);
        index
    }

    /// Converts the genealogy of the surviving tips into a tree.
    ///
    /// Extinct tips and the stem are removed, and surviving tips are
    /// labelled `0..n` in pre-order. Returns `None` if no tip survived.
    pub(crate) fn into_reconstructed_tree(self) -> Option<CompactTree> {
        if self.active.is_empty() {
            return None;
        }
        if self.lineages[0].children.is_none() {
            return Some(CompactTree::single_leaf(0));
        }

        // Complete tree with extinct tips, leaves labelled by lineage id
        let mut complete: GenTree<usize> = GenTree::new(self.lineages.len().div_ceil(2));
        let mut arena_index: Vec<VertexIndex> = vec![0; self.lineages.len()];
        let mut stack = vec![(0usize, false)];
        while let Some((id, children_done)) = stack.pop() {
            let lineage = &self.lineages[id];
            let length = BranchLength::try_new(lineage.length);
            match lineage.children {
                Some((left, right)) if !children_done => {
                    stack.push((id, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
                Some((left, right)) => {
                    let children = (arena_index[left], arena_index[right]);
                    arena_index[id] = if id == 0 {
                        complete.add_root_without_branch(children)
                    } else {
                        complete.add_internal_vertex(children, length)
                    };
                }
                None => {
                    arena_index[id] = complete.add_leaf(length, id);
                }
            }
        }

        let reconstructed = complete
            .prune_leaves(|leaf| leaf.label().is_some_and(|&id| self.lineages[id].alive))
            .tree;

        let mut rank = vec![0; self.lineages.len()];
        for (position, &id) in reconstructed.leaf_labels().enumerate() {
            rank[id] = position;
        }
        Some(reconstructed.map_labels(|id| rank[id]))
    }
}
