//! forge-edit - Source transformations for JavaScript / TypeScript modules
//!
//! Transforms describe changes as byte-range edits against a parsed tree;
//! the merge engine applies them and a [`Refactor`] session stages the
//! result in the overlay filesystem until it is flushed.
//!
//! # Architecture
//!
//! ```text
//! forge-edit/src/
//! ├── lib.rs            # Re-exports (this file)
//! ├── error.rs          # EditError enum (thiserror)
//! ├── edit.rs           # Edit { start, end, replacement }
//! ├── merge.rs          # Sort, coalesce, apply
//! ├── rename.rs         # Scope-aware identifier rename
//! ├── transform/        # Pattern-matching transforms
//! │   ├── module.rs     #   import / export statements
//! │   ├── array.rs      #   array literals
//! │   ├── object.rs     #   object literals
//! │   ├── declaration.rs#   class / function names
//! │   └── string.rs     #   string literals, CSS class names
//! ├── lines.rs          # Line-based entry file helpers
//! └── refactor.rs       # Refactor session (overlay + parse cache)
//! ```
//!
//! # Example
//!
//! ```rust
//! use forge_ast::{Lang, SyntaxTree};
//! use forge_edit::{apply_edits, transform::array};
//!
//! let code = "const arr = [a, b, c];\n";
//! let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
//! let edits = array::add_to_array(&tree, "arr", "d");
//! assert_eq!(apply_edits(code, &edits), "const arr = [a, b, c, d];\n");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod edit;
mod error;
pub mod lines;
mod merge;
mod refactor;
mod rename;
pub mod transform;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use edit::Edit;
pub use error::EditError;
pub use merge::{apply_edits, apply_edits_checked, merge_edits};
pub use rename::rename_identifier;

// Refactor session
pub use refactor::{FileUpdate, Refactor};

// Transforms, flat
pub use transform::array::{add_to_array, add_to_array_by_node, remove_from_array, remove_from_array_by_node};
pub use transform::declaration::{rename_class_name, rename_function_name};
pub use transform::module::{
    add_export_from, add_import_from, remove_export_specifier, remove_import_by_source,
    remove_import_specifier, rename_export_specifier, rename_import_alias, rename_import_specifier,
    rename_module_source,
};
pub use transform::object::{
    add_object_property, remove_object_property, rename_object_property, set_object_property,
};
pub use transform::string::{
    remove_string_literal, rename_css_class_name, rename_string_literal, replace_string_literal,
};
