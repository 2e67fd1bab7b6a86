//! Re-exports from ast-grep (Unified ast-grep v0.40.5)
//!
//! Keeps every crate of the workspace on the same ast-grep types.

// Core pattern matching
pub use ast_grep_core::Pattern;
pub use ast_grep_core::matcher::MatcherExt;

// Language support
pub use ast_grep_language::LanguageExt;
pub use ast_grep_language::SupportLang;

// Meta variable handling
pub use ast_grep_core::meta_var::MetaVariable;
