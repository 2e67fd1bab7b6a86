//! The edit model.
//!
//! Transforms never rewrite text. They describe changes as [`Edit`]s,
//! byte ranges of the tree's source plus replacement text, which
//! [`crate::apply_edits`] merges and splices.

use forge_ast::{Node, Span};
use serde::{Deserialize, Serialize};

/// Replace `[start, end)` of the source with `replacement`.
///
/// `start == end` is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// First byte replaced.
    pub start: usize,
    /// One past the last byte replaced.
    pub end: usize,
    /// Text written in place of the range.
    pub replacement: String,
}

impl Edit {
    /// Create an edit.
    #[must_use]
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Insert `text` at `at`.
    #[must_use]
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    /// Delete `[start, end)`.
    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, String::new())
    }

    /// Replace a span.
    #[must_use]
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self::new(span.start, span.end, text)
    }

    /// Replace the text of a node.
    #[must_use]
    pub fn replace_node(node: Node<'_>, text: impl Into<String>) -> Self {
        Self::new(node.start_byte(), node.end_byte(), text)
    }

    /// Delete the text of a node.
    #[must_use]
    pub fn delete_node(node: Node<'_>) -> Self {
        Self::delete(node.start_byte(), node.end_byte())
    }

    /// Range covered by the edit.
    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Whether the edit only inserts text.
    #[must_use]
    pub const fn is_insertion(&self) -> bool {
        self.start == self.end
    }
}
