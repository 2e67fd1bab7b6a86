//! Error types for parsing.

use thiserror::Error;

/// Errors raised while turning module text into a syntax tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    /// The text does not parse cleanly. Line and column are 1-based and
    /// point at the first error node.
    #[error("Parse error in {path} at line {line}, column {column}")]
    Parse {
        /// Path of the module, or `<memory>` for anonymous text.
        path: String,
        /// 1-based line.
        line: usize,
        /// 1-based column, counted in bytes.
        column: usize,
    },

    /// The grammar could not be loaded into the parser.
    #[error("Failed to load grammar: {0}")]
    Language(String),

    /// No grammar is known for the file or language name.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}
