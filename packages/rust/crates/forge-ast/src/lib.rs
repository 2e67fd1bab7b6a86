//! forge-ast - Syntax trees for module refactoring
//!
//! This crate parses JavaScript / TypeScript / TSX modules with tree-sitter,
//! computes their lexical scopes, caches parses per file and offers
//! ast-grep based structural scanning.
//!
//! ## Architecture
//!
//! ```text
//! forge-ast/src/
//! ├── lib.rs           # Re-exports (entry point)
//! ├── re_exports.rs    # ast-grep re-exports
//! ├── error.rs         # AstError enum
//! ├── lang.rs          # Lang enum and grammar selection
//! ├── tree.rs          # SyntaxTree, Span, pre-order walk
//! ├── scope.rs         # Scope tree and binding resolution
//! ├── cache.rs         # Parse cache (path + xxh3 hash)
//! ├── item.rs          # Match struct
//! ├── scan.rs          # Pattern utilities
//! └── discover.rs      # Module classification
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use forge_ast::{Lang, SyntaxTree, scan};
//!
//! let tree = SyntaxTree::parse("import a from './a';\na();\n", Lang::JavaScript).unwrap();
//! assert_eq!(tree.nodes_of_kind("import_statement").count(), 1);
//!
//! let calls = scan(tree.source(), "$F()", Lang::JavaScript).unwrap();
//! assert_eq!(calls.len(), 1);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod cache;
mod discover;
mod error;
mod item;
mod lang;
mod re_exports;
mod scan;
mod scope;
mod tree;

// ============================================================================
// Re-exports
// ============================================================================

// Re-exports module
pub use re_exports::*;

// Parsing
pub use error::AstError;
pub use lang::Lang;
pub use tree::{Preorder, Span, SyntaxTree};

// Scopes
pub use scope::{Binding, BindingKind, Scope, ScopeId, ScopeKind, ScopeTree, is_identifier_kind};

// Parse cache
pub use cache::AstCache;

// Match struct
pub use item::Match;

// Scan functions
pub use scan::{contains, extract, pattern, scan, scan_with_lang};

// Module classification
pub use discover::{DiscoveredModule, ModuleProps, discover, discover_dir, module_props};

// Node type of the trees handed out by this crate
pub use tree_sitter::Node;
