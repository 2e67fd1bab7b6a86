//! Array literals bound to variables.

use forge_ast::{Node, SyntaxTree};

use crate::edit::Edit;

/// Array literal of the first `const/let/var name = [...]`.
#[must_use]
pub fn find_array<'t>(tree: &'t SyntaxTree, var: &str) -> Option<Node<'t>> {
    tree.nodes_of_kind("variable_declarator")
        .filter(|d| d.child_by_field_name("name").is_some_and(|n| tree.text(n) == var))
        .filter_map(|d| d.child_by_field_name("value"))
        .find(|v| v.kind() == "array")
}

fn elements(array: Node<'_>) -> Vec<Node<'_>> {
    array
        .named_children(&mut array.walk())
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Append `code` to the array bound to `var`.
#[must_use]
pub fn add_to_array(tree: &SyntaxTree, var: &str, code: &str) -> Vec<Edit> {
    find_array(tree, var).map_or_else(Vec::new, |array| add_to_array_by_node(tree, array, code))
}

/// Append `code` as the last element of `array`.
///
/// A multi-line array gets the new element on its own line, indented two
/// spaces deeper than the closing bracket.
#[must_use]
pub fn add_to_array_by_node(tree: &SyntaxTree, array: Node<'_>, code: &str) -> Vec<Edit> {
    let elements = elements(array);
    let multiline = tree.text(array).contains('\n');
    let indent = tree.indent_at(array.end_byte().saturating_sub(1));

    let edit = match (elements.last(), multiline) {
        (Some(last), true) => Edit::insert(last.end_byte(), format!(",\n{indent}  {code}")),
        (Some(last), false) => Edit::insert(last.end_byte(), format!(", {code}")),
        (None, true) => Edit::insert(array.start_byte() + 1, format!("\n{indent}  {code},")),
        (None, false) => Edit::insert(array.start_byte() + 1, code),
    };
    vec![edit]
}

/// Remove the identifier element `name` from the array bound to `var`.
#[must_use]
pub fn remove_from_array(tree: &SyntaxTree, var: &str, name: &str) -> Vec<Edit> {
    let Some(array) = find_array(tree, var) else {
        return Vec::new();
    };
    let element = elements(array)
        .into_iter()
        .find(|e| e.kind() == "identifier" && tree.text(*e) == name);
    match element {
        Some(element) => remove_from_array_by_node(tree, array, element),
        None => {
            tracing::warn!(array = %var, element = %name, "element not found in array");
            Vec::new()
        }
    }
}

/// Remove `element` from `array` together with its separator.
#[must_use]
pub fn remove_from_array_by_node(tree: &SyntaxTree, array: Node<'_>, element: Node<'_>) -> Vec<Edit> {
    let elements = elements(array);
    let Some(index) = elements.iter().position(|e| e.id() == element.id()) else {
        tracing::warn!(span = %forge_ast::Span::of(element), "element not found in array");
        return Vec::new();
    };
    let source = tree.source().as_bytes();

    if elements.len() == 1 {
        let mut end = element.end_byte();
        let mut p = end;
        while source.get(p).is_some_and(u8::is_ascii_whitespace) {
            p += 1;
        }
        if source.get(p) == Some(&b',') {
            end = p + 1;
        }
        return vec![Edit::delete(array.start_byte() + 1, end)];
    }

    if index == 0 {
        let next = elements[1];
        return vec![Edit::delete(element.start_byte(), next.start_byte())];
    }

    let mut start = element.start_byte();
    while start > 0 && source.get(start - 1).is_some_and(u8::is_ascii_whitespace) {
        start -= 1;
    }
    if start > 0 && source.get(start - 1) == Some(&b',') {
        start -= 1;
    } else {
        start = element.start_byte();
    }
    vec![Edit::delete(start, element.end_byte())]
}
