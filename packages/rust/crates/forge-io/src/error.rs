//! Error types for overlay and disk operations.
//!
//! Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for file I/O and overlay operations.
///
/// Each variant represents a specific failure mode, either while reading
/// real files or while validating an in-memory overlay change.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist (neither in the overlay nor on disk).
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),

    /// Invalid UTF-8 encoding.
    #[error("UTF-8 decoding error")]
    Encoding,

    /// `move_file` was asked to move a path that does not currently exist.
    #[error("No file to move: {0}")]
    NoFileToMove(String),

    /// `move_file` target already exists.
    #[error("Target file already exists: {0}")]
    TargetExists(String),

    /// Configuration file could not be parsed or holds an invalid glob.
    #[error("Config error: {0}")]
    Config(String),
}
