//! Vertex annotations for phylogenetic trees.
//!
//! Provides [Annotations], a typed side-table storing one value per vertex
//! of a tree, addressed by [VertexIndex]. Values are written once and are
//! read-only afterwards; pruning a tree carries them over via
//! [Annotations::remap].

use crate::error::AnnotationError;
use crate::model::VertexIndex;

// =#========================================================================#=
// ANNOTATIONS
// =#========================================================================$=
/// Per-vertex values of type `T`, parallel to a tree's vertex arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations<T> {
    values: Vec<Option<T>>,
}

impl<T> Annotations<T> {
    /// Creates a new empty [Annotations] for a tree with `num_vertices` vertices.
    pub fn new(num_vertices: usize) -> Self {
        Annotations {
            values: std::iter::repeat_with(|| None).take(num_vertices).collect(),
        }
    }

    /// Returns the value for a vertex, or `None` if it has not been set
    /// or the index is out of bounds.
    pub fn get(&self, vertex_index: VertexIndex) -> Option<&T> {
        self.values.get(vertex_index).and_then(|v| v.as_ref())
    }

    /// Sets the value for a vertex.
    ///
    /// # Errors
    /// * [AnnotationError::OutOfBounds] if `vertex_index` is not a vertex of the tree
    /// * [AnnotationError::AlreadySet] if the vertex already carries a value
    pub fn set(&mut self, vertex_index: VertexIndex, value: T) -> Result<(), AnnotationError> {
        let num_vertices = self.values.len();
        let slot = self
            .values
            .get_mut(vertex_index)
            .ok_or(AnnotationError::OutOfBounds {
                vertex_index,
                num_vertices,
            })?;
        if slot.is_some() {
            return Err(AnnotationError::AlreadySet(vertex_index));
        }
        *slot = Some(value);
        Ok(())
    }

    /// Returns the number of vertices this table was created for.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether this table covers no vertices.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of vertices carrying a value.
    pub fn num_set(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Returns whether every vertex carries a value.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| v.is_some())
    }
}

impl<T: Clone> Annotations<T> {
    /// Builds the table for a tree derived from the annotated one.
    ///
    /// # Arguments
    /// * `mapping` - For each vertex of the annotated tree, its index in the derived tree, if any
    /// * `num_vertices` - Number of vertices of the derived tree
    pub fn remap(&self, mapping: &[Option<VertexIndex>], num_vertices: usize) -> Self {
        let mut remapped = Annotations::new(num_vertices);
        for (old_index, new_index) in mapping.iter().enumerate() {
            if let (Some(new_index), Some(value)) = (new_index, self.get(old_index)) {
                remapped.values[*new_index] = Some(value.clone());
            }
        }
        remapped
    }
}
