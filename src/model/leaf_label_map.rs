//! Leaf label module for phylogenetic tree representation.
//!
//! - `LeafLabelMap`: Joined storage and lookup for taxon labels of an ensemble of trees.

use std::collections::HashMap;
use std::fmt;

/// Index of a taxon label in a [LeafLabelMap]; the identity of a taxon.
pub type LabelIndex = usize;

// =#========================================================================#=
// LEAF LABEL MAP
// =#========================================================================#=
/// Maps leaf labels (strings) to compact indices for efficient storage.
///
/// This bidirectional mapping allows all trees of an ensemble to share
/// a single taxon namespace, with each leaf referencing its taxon by [LabelIndex].
/// Labels are deduplicated automatically - inserting the same label twice returns
/// the same index.
///
/// # Example
/// ```
/// use pdprune::model::LeafLabelMap;
///
/// let mut labels = LeafLabelMap::new(3);
///
/// let idx_a = labels.get_or_insert("A");  // idx_a = 0
/// let idx_b = labels.get_or_insert("B");  // idx_b = 1
/// let idx_a2 = labels.get_or_insert("A"); // idx_a2 = 0 (deduplicated)
///
/// assert_eq!(idx_a, idx_a2);
/// assert_eq!(labels.get_label(idx_a), Some("A"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LeafLabelMap {
    /// List of unique labels
    labels: Vec<String>,
    /// Map from label to its index
    map: HashMap<String, LabelIndex>,
}

impl LeafLabelMap {
    /// Creates a new LeafLabelMap with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of unique leaf labels
    pub fn new(num_leaves: usize) -> Self {
        LeafLabelMap {
            labels: Vec::with_capacity(num_leaves),
            map: HashMap::with_capacity(num_leaves),
        }
    }

    /// Same as [LeafLabelMap::new].
    pub fn with_capacity(num_leaves: usize) -> Self {
        Self::new(num_leaves)
    }

    /// Creates the taxon namespace `T1, ..., Tn` used for simulated trees,
    /// where taxon `Ti` has [LabelIndex] `i - 1`.
    pub fn numbered(num_taxa: usize) -> Self {
        let mut labels = Self::new(num_taxa);
        for i in 1..=num_taxa {
            labels.get_or_insert(&format!("T{i}"));
        }
        labels
    }

    /// Gets the index for a label, inserting it if it doesn't exist.
    ///
    /// If the label already exists, returns its existing index.
    /// If the label is new, assigns it the next available index.
    ///
    /// # Arguments
    /// * `s` - The label string to look up or insert
    ///
    /// # Returns
    /// The index associated with this label
    pub fn get_or_insert(&mut self, s: &str) -> LabelIndex {
        if let Some(&index) = self.map.get(s) {
            index
        } else {
            let idx = self.labels.len();
            self.labels.push(s.to_string());
            self.map.insert(s.to_string(), idx);
            idx
        }
    }

    /// Retrieves the index for a given label.
    ///
    /// # Returns
    /// `Some(index)` if the label exists, `None` otherwise
    pub fn get_index(&self, s: &str) -> Option<LabelIndex> {
        self.map.get(s).copied()
    }

    /// Retrieves the leaf label for a given index.
    ///
    /// # Returns
    /// `Some(&str)` if the index is valid, `None` otherwise
    pub fn get_label(&self, index: LabelIndex) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    /// Checks if a label exists in the map.
    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the number of labels currently stored.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Returns reference to the labels in this map.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for LeafLabelMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LeafLabelMap ({} labels):", self.labels.len())?;
        for (idx, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", idx, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<LabelIndex> for LeafLabelMap {
    type Output = str;

    fn index(&self, index: LabelIndex) -> &Self::Output {
        &self.labels[index]
    }
}
