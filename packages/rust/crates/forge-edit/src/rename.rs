//! Scope-aware identifier rename.

use forge_ast::{Node, SyntaxTree, is_identifier_kind};

use crate::edit::Edit;

/// Rename every occurrence of `old` that resolves to the binding declared
/// by `decl`.
///
/// Occurrences bound elsewhere (shadowing declarations, other modules'
/// exported names) are left alone. A shorthand property keeps its key and
/// becomes `old: new`; an un-aliased export specifier keeps its exported
/// name and becomes `new as old`.
#[must_use]
pub fn rename_identifier(tree: &SyntaxTree, old: &str, new: &str, decl: Node<'_>) -> Vec<Edit> {
    if old == new {
        return Vec::new();
    }
    let scopes = tree.scopes();
    let source = tree.source();

    tree.nodes()
        .filter(|n| is_identifier_kind(n.kind()) && tree.text(*n) == old)
        .filter(|n| {
            scopes
                .resolve(*n, source)
                .is_some_and(|b| b.node_id == decl.id())
        })
        .map(|n| match n.kind() {
            "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                Edit::replace_node(n, format!("{old}: {new}"))
            }
            _ if is_local_export(n) => Edit::replace_node(n, format!("{new} as {old}")),
            _ => Edit::replace_node(n, new),
        })
        .collect()
}

/// Name of an un-aliased `export { name }` specifier.
fn is_local_export(node: Node<'_>) -> bool {
    node.parent().is_some_and(|p| {
        p.kind() == "export_specifier"
            && p.child_by_field_name("alias").is_none()
            && p.child_by_field_name("name").is_some_and(|n| n.id() == node.id())
    })
}

/// Name node of the first declaration of one of `kinds` named `name`.
pub(crate) fn find_declaration<'t>(tree: &'t SyntaxTree, kinds: &[&str], name: &str) -> Option<Node<'t>> {
    tree.nodes()
        .filter(|n| kinds.contains(&n.kind()))
        .filter_map(|n| n.child_by_field_name("name"))
        .find(|id| tree.text(*id) == name)
}

#[cfg(test)]
mod tests {
    use forge_ast::Lang;

    use super::*;
    use crate::merge::apply_edits;

    fn rename_first(code: &str, old: &str, new: &str) -> String {
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        let decl = tree
            .nodes()
            .find(|n| is_identifier_kind(n.kind()) && tree.text(*n) == old)
            .unwrap();
        apply_edits(code, &rename_identifier(&tree, old, new, decl))
    }

    #[test]
    fn test_shadowed_binding_untouched() {
        let code = "const a = 1;\nfunction f() {\n  const a = 2;\n  return a;\n}\nconsole.log(a);\n";
        assert_eq!(
            rename_first(code, "a", "b"),
            "const b = 1;\nfunction f() {\n  const a = 2;\n  return a;\n}\nconsole.log(b);\n"
        );
    }

    #[test]
    fn test_shorthand_property_keeps_key() {
        let code = "const a = 1;\nconst o = { a };\n";
        assert_eq!(rename_first(code, "a", "b"), "const b = 1;\nconst o = { a: b };\n");
    }

    #[test]
    fn test_export_specifier_keeps_exported_name() {
        let code = "const a = 1;\nconst c = 2;\nexport { a, c as d };\n";
        assert_eq!(
            rename_first(code, "a", "b"),
            "const b = 1;\nconst c = 2;\nexport { b as a, c as d };\n"
        );
        assert_eq!(
            rename_first(code, "c", "e"),
            "const a = 1;\nconst e = 2;\nexport { a, e as d };\n"
        );
    }

    #[test]
    fn test_member_property_not_renamed() {
        let code = "const a = 1;\nobj.a = a;\n";
        assert_eq!(rename_first(code, "a", "b"), "const b = 1;\nobj.a = b;\n");
    }

    #[test]
    fn test_same_name_is_noop() {
        let code = "const a = 1;\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        let decl = tree.nodes_of_kind("identifier").next().unwrap();
        assert!(rename_identifier(&tree, "a", "a", decl).is_empty());
    }
}
