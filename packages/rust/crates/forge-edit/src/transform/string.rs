//! String literals, markup attribute strings included.
//!
//! Edits stay strictly inside the quotes. Template strings are not matched.

use forge_ast::{Span, SyntaxTree};

use crate::edit::Edit;

/// Content spans of every plain string literal.
fn string_contents(tree: &SyntaxTree) -> impl Iterator<Item = Span> + '_ {
    tree.nodes_of_kind("string")
        .filter_map(|s| tree.string_content(s))
}

/// Replace string literals whose whole value is `old`.
#[must_use]
pub fn rename_string_literal(tree: &SyntaxTree, old: &str, new: &str) -> Vec<Edit> {
    replace_string_literal(tree, old, new, true)
}

/// Replace `old` inside string literals: the whole value when `full_match`,
/// else the first occurrence in each literal.
#[must_use]
pub fn replace_string_literal(tree: &SyntaxTree, old: &str, new: &str, full_match: bool) -> Vec<Edit> {
    if old.is_empty() {
        return Vec::new();
    }
    string_contents(tree)
        .filter_map(|span| {
            let value = tree.slice(span);
            if full_match {
                (value == old).then(|| Edit::replace(span, new))
            } else {
                value.find(old).map(|i| {
                    let start = span.start + i;
                    Edit::new(start, start + old.len(), new)
                })
            }
        })
        .collect()
}

/// Remove `text` from string literals, matched like
/// [`replace_string_literal`].
#[must_use]
pub fn remove_string_literal(tree: &SyntaxTree, text: &str, full_match: bool) -> Vec<Edit> {
    replace_string_literal(tree, text, "", full_match)
}

/// Rename a CSS class name wherever it appears in a string, such as
/// `className="home-hello"`.
#[must_use]
pub fn rename_css_class_name(tree: &SyntaxTree, old: &str, new: &str) -> Vec<Edit> {
    replace_string_literal(tree, old, new, false)
}
