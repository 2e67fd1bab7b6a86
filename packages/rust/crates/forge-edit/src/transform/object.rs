//! Object literals bound to variables.
//!
//! Only non-computed identifier keys and shorthand properties are matched.
//! With `var == None` every object-valued declarator is a target.

use forge_ast::{Node, SyntaxTree};

use super::ListLayout;
use crate::edit::Edit;

/// Object literals bound to `var`, or to any declarator when `None`.
fn objects<'t>(tree: &'t SyntaxTree, var: Option<&str>) -> Vec<Node<'t>> {
    tree.nodes_of_kind("variable_declarator")
        .filter(|d| {
            var.is_none_or(|v| d.child_by_field_name("name").is_some_and(|n| tree.text(n) == v))
        })
        .filter_map(|d| d.child_by_field_name("value"))
        .filter(|v| v.kind() == "object")
        .collect()
}

fn properties(object: Node<'_>) -> Vec<Node<'_>> {
    object
        .named_children(&mut object.walk())
        .filter(|c| c.kind() != "comment")
        .collect()
}

/// Key node of a property when it is a plain identifier or shorthand.
fn property_key(prop: Node<'_>) -> Option<Node<'_>> {
    match prop.kind() {
        "pair" => prop
            .child_by_field_name("key")
            .filter(|k| k.kind() == "property_identifier"),
        "shorthand_property_identifier" => Some(prop),
        _ => None,
    }
}

fn find_property<'t>(tree: &SyntaxTree, props: &[Node<'t>], key: &str) -> Option<(usize, Node<'t>)> {
    props
        .iter()
        .enumerate()
        .find(|(_, p)| property_key(**p).is_some_and(|k| tree.text(k) == key))
        .map(|(i, p)| (i, *p))
}

/// Append `key: value` to the object bound to `var`.
///
/// An existing `key` is left alone and logged.
#[must_use]
pub fn add_object_property(tree: &SyntaxTree, var: Option<&str>, key: &str, value: &str) -> Vec<Edit> {
    let mut edits = Vec::new();
    for object in objects(tree, var) {
        let props = properties(object);
        if find_property(tree, &props, key).is_some() {
            tracing::warn!(object = var.unwrap_or("<any>"), key = %key, "property already exists");
            continue;
        }
        let entry = format!("{key}: {value}");
        let multiline = tree.text(object).contains('\n');
        let close = object.end_byte().saturating_sub(1);
        if props.is_empty() {
            if multiline {
                let indent = tree.indent_at(close);
                edits.push(Edit::insert(object.start_byte() + 1, format!("\n{indent}  {entry},")));
            } else {
                edits.push(Edit::new(object.start_byte() + 1, close, format!(" {entry} ")));
            }
            continue;
        }
        let layout = ListLayout::of(tree, object, &props);
        edits.extend(layout.append(&props, &[entry]));
    }
    edits
}

/// Replace the value of `key`. A shorthand property becomes `key: value`.
#[must_use]
pub fn set_object_property(tree: &SyntaxTree, var: Option<&str>, key: &str, value: &str) -> Vec<Edit> {
    objects(tree, var)
        .into_iter()
        .filter_map(|object| find_property(tree, &properties(object), key))
        .filter_map(|(_, prop)| match prop.kind() {
            "shorthand_property_identifier" => Some(Edit::replace_node(prop, format!("{key}: {value}"))),
            _ => prop
                .child_by_field_name("value")
                .map(|v| Edit::replace_node(v, value)),
        })
        .collect()
}

/// Rename the key `old`. A shorthand property becomes `new: old`.
#[must_use]
pub fn rename_object_property(tree: &SyntaxTree, var: Option<&str>, old: &str, new: &str) -> Vec<Edit> {
    objects(tree, var)
        .into_iter()
        .filter_map(|object| find_property(tree, &properties(object), old))
        .filter_map(|(_, prop)| match prop.kind() {
            "shorthand_property_identifier" => Some(Edit::replace_node(prop, format!("{new}: {old}"))),
            _ => property_key(prop).map(|k| Edit::replace_node(k, new)),
        })
        .collect()
}

/// Remove the property `key` with its separator.
#[must_use]
pub fn remove_object_property(tree: &SyntaxTree, var: Option<&str>, key: &str) -> Vec<Edit> {
    let source = tree.source().as_bytes();
    let mut edits = Vec::new();
    for object in objects(tree, var) {
        let props = properties(object);
        let Some((index, prop)) = find_property(tree, &props, key) else {
            continue;
        };
        if index > 0 {
            edits.push(Edit::delete(props[index - 1].end_byte(), prop.end_byte()));
            continue;
        }
        let mut end = prop.end_byte();
        let mut p = end;
        while source.get(p).is_some_and(u8::is_ascii_whitespace) {
            p += 1;
        }
        if source.get(p) == Some(&b',') {
            end = p + 1;
        }
        edits.push(Edit::delete(object.start_byte() + 1, end));
    }
    edits
}
