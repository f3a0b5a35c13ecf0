//! Newick rendering of [CompactTree]s.

use crate::model::leaf_label_map::LeafLabelMap;
use crate::model::tree::VertexIndex;
use crate::model::vertex::BranchLength;
use crate::model::CompactTree;

/// Estimated characters per vertex: label or parentheses plus a branch length
const CHARS_PER_VERTEX: usize = 12;

/// Style for serializing tree to Newick format,
/// controlling how leaf labels are represented in the output string.
#[derive(Debug, Clone, Copy)]
pub enum NewickStyle {
    /// Use full leaf labels from the LeafLabelMap
    Label,
    /// Use 0-based indices (0, 1, 2, ...)
    ZeroIndexed,
    /// Use 1-based indices (1, 2, 3, ...)
    OneIndexed,
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// The Newick format represents phylogenetic trees as nested parentheses with branch lengths.
/// For example: `(('Little Spotted Kiwi':1.0,'Great Spotted Kiwi':1.0):0.5,'Okarito Brown Kiwi':1.5);`
///
/// The empty tree is rendered as `;`, a tree consisting of a single leaf as
/// its label followed by `;`.
///
/// # Arguments
/// * `style` - The [NewickStyle] used to represent leaf labels in the output
/// * `tree` - The tree to render
/// * `leaf_label_map` - [Mapping](LeafLabelMap) required when using [NewickStyle::Label], otherwise can be `None`
///
/// # Returns
/// A Newick format string terminated with `;`. Returns an empty string if
/// `NewickStyle::Label` is used without providing a [LeafLabelMap].
///
/// # Example
/// ```
/// use pdprune::model::{BranchLength, CompactTree, LeafLabelMap};
/// use pdprune::newick::NewickStyle;
///
/// let mut tree = CompactTree::new(2);
/// let mut labels = LeafLabelMap::new(2);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), labels.get_or_insert("A"));
/// let b = tree.add_leaf(Some(BranchLength::new(2.0)), labels.get_or_insert("B"));
/// tree.add_root_without_branch((a, b));
///
/// let newick = tree.to_newick(&NewickStyle::Label, Some(&labels));
/// assert_eq!(newick, "(A:1,B:2);");
/// ```
pub fn to_newick(style: &NewickStyle, tree: &CompactTree, leaf_label_map: Option<&LeafLabelMap>) -> String {
    // Abort right away if arguments don't match
    if matches!(style, NewickStyle::Label) && leaf_label_map.is_none() {
        return String::new();
    }

    let mut newick = String::with_capacity(tree.num_vertices() * CHARS_PER_VERTEX + 1);
    if tree.is_root_set() {
        build_newick(tree, &mut newick, tree.root_index(), style, leaf_label_map);
    }
    newick.push(';');

    newick
}

/// Recursive helper for building the Newick string
fn build_newick(
    tree: &CompactTree,
    newick: &mut String,
    index: VertexIndex,
    style: &NewickStyle,
    leaf_label_map: Option<&LeafLabelMap>,
) {
    let vertex = &tree[index];

    match (vertex.children(), vertex.label()) {
        (Some((left, right)), _) => {
            newick.push('(');
            build_newick(tree, newick, left, style, leaf_label_map);
            newick.push(',');
            build_newick(tree, newick, right, style, leaf_label_map);
            newick.push(')');
        }
        (None, Some(&label_index)) => match (style, leaf_label_map) {
            (NewickStyle::Label, Some(map)) => {
                newick.push_str(&escape_label(map.get_label(label_index).unwrap_or("?")));
            }
            (NewickStyle::OneIndexed, _) => newick.push_str(&(label_index + 1).to_string()),
            _ => newick.push_str(&label_index.to_string()),
        },
        (None, None) => {}
    }

    if vertex.has_parent() {
        push_branch_length(newick, vertex.branch_length());
    }
}

/// Helper for adding branch lengths
fn push_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
    if let Some(branch_length) = branch_length {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

/// Escapes a label for safe use in Newick strings.
///
/// Labels containing special characters (punctuation, delimiters) are
/// wrapped in single quotes. Internal single quotes are escaped by doubling them.
/// Spaces are replaced with underscores in unquoted labels.
///
/// # Examples
/// ```
/// # use pdprune::newick::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Baillon's crake"), "'Baillon''s crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if label.chars().any(|c| {
        matches!(
            c,
            ',' | ';' | '\t' | '\n' | '\r' | '(' | ')' | ':' | '[' | ']' | '\''
        )
    }) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.replace(' ', "_")
    }
}
