//! Class and function declarations.

use forge_ast::SyntaxTree;

use crate::edit::Edit;
use crate::rename::{find_declaration, rename_identifier};

const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];
const FUNCTION_KINDS: &[&str] = &["function_declaration", "generator_function_declaration"];

/// Rename the first class declared as `old` and every reference to it.
#[must_use]
pub fn rename_class_name(tree: &SyntaxTree, old: &str, new: &str) -> Vec<Edit> {
    find_declaration(tree, CLASS_KINDS, old)
        .map_or_else(Vec::new, |decl| rename_identifier(tree, old, new, decl))
}

/// Rename the first function declared as `old` and every reference to it.
#[must_use]
pub fn rename_function_name(tree: &SyntaxTree, old: &str, new: &str) -> Vec<Edit> {
    find_declaration(tree, FUNCTION_KINDS, old)
        .map_or_else(Vec::new, |decl| rename_identifier(tree, old, new, decl))
}

#[cfg(test)]
mod tests {
    use forge_ast::Lang;

    use super::*;
    use crate::merge::apply_edits;

    #[test]
    fn test_rename_component_class() {
        let code = r"import React, { Component } from 'react';

export class Hello extends Component {
  render() {
    return <div className='home-hello' />;
  }
}

export default Hello;
";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        let out = apply_edits(code, &rename_class_name(&tree, "Hello", "World"));
        assert!(out.contains("export class World extends Component"));
        assert!(out.contains("export default World;"));
        assert!(out.contains("'home-hello'"));
    }

    #[test]
    fn test_rename_function_skips_shadowed() {
        let code = "export function fetch() {}\nfunction other(fetch) {\n  return fetch;\n}\nfetch();\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(
            apply_edits(code, &rename_function_name(&tree, "fetch", "load")),
            "export function load() {}\nfunction other(fetch) {\n  return fetch;\n}\nload();\n"
        );
    }

    #[test]
    fn test_absent_declaration_is_noop() {
        let tree = SyntaxTree::parse("const a = 1;\n", Lang::JavaScript).unwrap();
        assert!(rename_class_name(&tree, "Hello", "World").is_empty());
        assert!(rename_function_name(&tree, "a", "b").is_empty());
    }
}
