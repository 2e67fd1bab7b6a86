//! Structural match results.

use serde::Serialize;

use crate::tree::Span;

/// A node matched by an ast-grep pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// The matched text content
    pub text: String,
    /// Byte range of the match in the scanned text
    pub span: Span,
    /// 0-based line of the match start
    pub line: usize,
    /// Captured meta-variables as `(name, text)`
    pub captures: Vec<(String, String)>,
}

impl Match {
    /// Get a capture by name
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
