//! Scope resolution across dialects.

use forge_ast::{BindingKind, Lang, SyntaxTree};

fn binding_kinds(tree: &SyntaxTree, name: &str) -> Vec<Option<BindingKind>> {
    tree.nodes()
        .filter(|n| forge_ast::is_identifier_kind(n.kind()) && tree.text(*n) == name)
        .map(|n| tree.scopes().resolve(n, tree.source()).map(|b| b.kind))
        .collect()
}

#[test]
fn test_typescript_class_and_type_references() {
    let code = "interface Props { name: string }\nclass Hello {\n  props: Props;\n}\nconst h: Hello = new Hello();\n";
    let tree = SyntaxTree::parse(code, Lang::TypeScript).unwrap();

    assert!(
        binding_kinds(&tree, "Props")
            .iter()
            .all(|k| *k == Some(BindingKind::Type))
    );
    let hello = binding_kinds(&tree, "Hello");
    assert_eq!(hello.len(), 3);
    assert!(hello.iter().all(|k| *k == Some(BindingKind::Class)));
}

#[test]
fn test_jsx_component_reference() {
    let code = "import Hello from './Hello';\nconst App = () => <Hello name=\"x\" />;\n";
    let tree = SyntaxTree::parse(code, Lang::Tsx).unwrap();
    assert_eq!(
        binding_kinds(&tree, "Hello"),
        vec![Some(BindingKind::Import), Some(BindingKind::Import)]
    );
}

#[test]
fn test_reexport_specifiers_are_not_references() {
    let code = "const a = 1;\nexport { a } from './other';\nexport { a as b };\n";
    let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();

    let recorded: Vec<_> = tree
        .nodes()
        .filter(|n| n.kind() == "identifier" && tree.text(*n) == "a")
        .map(|n| tree.scopes().scope_of(n).is_some())
        .collect();
    assert_eq!(recorded, vec![true, false, true]);
    assert!(
        tree.nodes()
            .filter(|n| n.kind() == "identifier" && tree.text(*n) == "b")
            .all(|n| tree.scopes().scope_of(n).is_none())
    );
}

#[test]
fn test_for_of_binding() {
    let code = "const items = [];\nfor (const item of items) {\n  use(item);\n}\nitem;\n";
    let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
    assert_eq!(
        binding_kinds(&tree, "item"),
        vec![Some(BindingKind::Const), Some(BindingKind::Const), None]
    );
}
