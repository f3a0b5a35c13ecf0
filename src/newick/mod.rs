//! Newick rendering of phylogenetic trees.
//!
//! Used to inspect generated and pruned trees, e.g. when reporting or
//! debugging an experiment. Trees are only written to strings; this crate
//! does not persist them.
//!
//! # Format
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex ',' vertex ')' [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`

pub mod writer;

pub use writer::{NewickStyle, escape_label, to_newick};
