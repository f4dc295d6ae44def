//! Annotation store: the ordered sequence for one editing session.
//!
//! Insertion order is draw order; there is no z-index. The only mutations are
//! [`AnnotationStore::append`] and [`AnnotationStore::undo_last`], so the
//! sequence always reads as a history of committed marks.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use tracing::debug;

use crate::annotation::Annotation;

/// In-memory, ordered store of annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationStore {
    items: Vec<Annotation>,
}

impl AnnotationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create a store seeded with previously saved annotations, in their saved order.
    #[must_use]
    pub fn seeded(annotations: Vec<Annotation>) -> Self {
        Self { items: annotations }
    }

    /// Add an annotation on top of all existing ones.
    pub fn append(&mut self, annotation: Annotation) {
        debug!(id = %annotation.id(), kind = %annotation.kind(), len = self.items.len() + 1, "annotation appended");
        self.items.push(annotation);
    }

    /// Remove and return the most recently appended annotation.
    ///
    /// Returns `None` when the store is empty; that is not an error.
    pub fn undo_last(&mut self) -> Option<Annotation> {
        let removed = self.items.pop();
        if let Some(ref a) = removed {
            debug!(id = %a.id(), len = self.items.len(), "annotation undone");
        }
        removed
    }

    /// The current sequence in draw order.
    #[must_use]
    pub fn snapshot(&self) -> &[Annotation] {
        &self.items
    }

    /// Label given to a non-text annotation committed without one: `"Issue {len + 1}"`.
    #[must_use]
    pub fn next_default_label(&self) -> String {
        format!("Issue {}", self.items.len() + 1)
    }

    /// Number of committed annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no annotations are committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the store, yielding the sequence.
    #[must_use]
    pub fn into_annotations(self) -> Vec<Annotation> {
        self.items
    }
}
