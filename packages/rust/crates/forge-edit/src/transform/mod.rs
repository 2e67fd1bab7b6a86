//! Pattern-matching transforms.
//!
//! Every transform takes a [`SyntaxTree`] plus parameters and returns the
//! [`Edit`]s that would perform the change. Nothing is written; an absent
//! pattern yields an empty list.

pub mod array;
pub mod declaration;
pub mod module;
pub mod object;
pub mod string;

use forge_ast::{Node, SyntaxTree};

use crate::edit::Edit;

/// Named children of `node` with one of the given kinds.
pub(crate) fn children_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    node.named_children(&mut node.walk())
        .filter(|c| kinds.contains(&c.kind()))
        .collect()
}

/// First named child of `node` with the given kind.
pub(crate) fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    node.named_children(&mut node.walk()).find(|c| c.kind() == kind)
}

/// Unquoted module source of an import or export statement.
pub(crate) fn module_source<'t>(tree: &'t SyntaxTree, stmt: Node<'_>) -> Option<&'t str> {
    stmt.child_by_field_name("source")
        .and_then(|s| tree.string_value(s))
}

/// Offset of the first byte after the line break ending the line that
/// contains `offset`, or the end of the text.
pub(crate) fn next_line_start(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|rest| rest.find('\n'))
        .map_or(text.len(), |i| offset + i + 1)
}

/// Insert a whole new line after the line containing `offset`.
pub(crate) fn insert_line_after(text: &str, offset: usize, line: &str) -> Edit {
    let at = next_line_start(text, offset);
    if at == text.len() && !text.ends_with('\n') {
        Edit::insert(at, format!("\n{line}"))
    } else {
        Edit::insert(at, format!("{line}\n"))
    }
}

/// Layout of a bracketed, comma separated list.
pub(crate) struct ListLayout {
    /// Entries span several lines.
    pub multiline: bool,
    /// Indentation of the entries in a multi-line list.
    pub indent: String,
    /// Offset just past a trailing comma after the last entry.
    pub trailing_comma: Option<usize>,
}

impl ListLayout {
    /// Inspect the list `container` whose entries are `items`.
    pub(crate) fn of(tree: &SyntaxTree, container: Node<'_>, items: &[Node<'_>]) -> Self {
        let multiline = tree.text(container).contains('\n');
        let indent = items.last().map_or_else(
            || format!("{}  ", tree.indent_at(container.end_byte())),
            |last| tree.indent_at(last.start_byte()).to_string(),
        );
        let trailing_comma = items.last().and_then(|last| {
            let close = container.end_byte().saturating_sub(1);
            let between = tree.source().get(last.end_byte()..close)?;
            let skipped = between.len() - between.trim_start().len();
            between
                .trim_start()
                .starts_with(',')
                .then_some(last.end_byte() + skipped + 1)
        });
        Self {
            multiline,
            indent,
            trailing_comma,
        }
    }

    /// Edit appending `entries` after the last of `items`.
    ///
    /// Returns `None` when `items` is empty.
    pub(crate) fn append(&self, items: &[Node<'_>], entries: &[String]) -> Option<Edit> {
        let last = items.last()?;
        if entries.is_empty() {
            return None;
        }
        let edit = match (self.multiline, self.trailing_comma) {
            (true, Some(after_comma)) => {
                let text: String = entries
                    .iter()
                    .map(|e| format!("\n{}{e},", self.indent))
                    .collect();
                Edit::insert(after_comma, text)
            }
            (true, None) => {
                let text: String = entries
                    .iter()
                    .map(|e| format!(",\n{}{e}", self.indent))
                    .collect();
                Edit::insert(last.end_byte(), text)
            }
            (false, _) => Edit::insert(last.end_byte(), format!(", {}", entries.join(", "))),
        };
        Some(edit)
    }

    /// Edit prepending `entry` before the first of `items`.
    pub(crate) fn prepend(&self, items: &[Node<'_>], entry: &str) -> Option<Edit> {
        let first = items.first()?;
        let text = if self.multiline {
            format!("{entry},\n{}", self.indent)
        } else {
            format!("{entry}, ")
        };
        Some(Edit::insert(first.start_byte(), text))
    }
}

/// Edits removing the entries of `items` selected by `remove`, keeping the
/// separators of the remaining entries intact.
///
/// Callers handle the case where every entry goes.
pub(crate) fn remove_list_items(items: &[Node<'_>], remove: &[bool]) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut i = 0;
    while i < items.len() {
        if !remove.get(i).copied().unwrap_or(false) {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < items.len() && remove.get(j + 1).copied().unwrap_or(false) {
            j += 1;
        }
        if let Some(next) = items.get(j + 1) {
            edits.push(Edit::delete(items[i].start_byte(), next.start_byte()));
        } else if i > 0 {
            edits.push(Edit::delete(items[i - 1].end_byte(), items[j].end_byte()));
        }
        i = j + 1;
    }
    edits
}
