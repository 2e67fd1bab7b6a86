//! Error types for edit application and refactor sessions.

use forge_ast::{AstError, Span};
use forge_io::IoError;
use thiserror::Error;

/// Error types for edit operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// Overlay or disk error while reading or staging a file.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// The file could not be parsed.
    #[error(transparent)]
    Ast(#[from] AstError),

    /// Two kept edits overlap without one containing the other.
    #[error("Conflicting edits at {first} and {second}")]
    ConflictingEdits {
        /// Span of the edit applied first (higher offset).
        first: Span,
        /// Span of the edit overlapping it.
        second: Span,
    },

    /// The file is not a JavaScript / TypeScript module.
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// A structural pattern could not be compiled or matched.
    #[error("Pattern error: {0}")]
    Pattern(String),
}
