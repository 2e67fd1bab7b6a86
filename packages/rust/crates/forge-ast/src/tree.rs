//! Parsed modules.
//!
//! A [`SyntaxTree`] owns its source text, the tree-sitter tree and the
//! scope tree computed for it. Nodes are borrowed `tree_sitter::Node`s and
//! every offset is a byte offset into [`SyntaxTree::source`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser, Tree, TreeCursor};

use crate::error::AstError;
use crate::lang::Lang;
use crate::scope::ScopeTree;

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of a node.
    #[must_use]
    pub fn of(node: Node<'_>) -> Self {
        Self::new(node.start_byte(), node.end_byte())
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` lies within this span.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A parsed module.
pub struct SyntaxTree {
    source: String,
    tree: Tree,
    lang: Lang,
    path: Option<String>,
    scopes: ScopeTree,
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("lang", &self.lang)
            .field("path", &self.path)
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl SyntaxTree {
    /// Parse anonymous module text.
    ///
    /// # Errors
    /// `AstError::Parse` when the text contains syntax errors.
    pub fn parse(text: &str, lang: Lang) -> Result<Self, AstError> {
        Self::parse_inner(text, lang, None)
    }

    /// Parse the text of the module at `path` (used in error messages).
    ///
    /// # Errors
    /// `AstError::Parse` when the text contains syntax errors.
    pub fn parse_file(path: &str, text: &str, lang: Lang) -> Result<Self, AstError> {
        Self::parse_inner(text, lang, Some(path.to_string()))
    }

    fn parse_inner(text: &str, lang: Lang, path: Option<String>) -> Result<Self, AstError> {
        let mut parser = Parser::new();
        parser
            .set_language(&lang.grammar())
            .map_err(|e| AstError::Language(e.to_string()))?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| AstError::Language(format!("parser returned no tree for {lang:?}")))?;

        let root = tree.root_node();
        if root.has_error() {
            let point = Preorder::new(root)
                .find(|n| n.is_error() || n.is_missing())
                .map_or_else(|| root.start_position(), |n| n.start_position());
            return Err(AstError::Parse {
                path: path.unwrap_or_else(|| "<memory>".to_string()),
                line: point.row + 1,
                column: point.column + 1,
            });
        }

        let scopes = ScopeTree::build(root, text);
        Ok(Self {
            source: text.to_string(),
            tree,
            lang,
            path,
            scopes,
        })
    }

    /// Source text the tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Dialect of the module.
    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Path given at parse time.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Root (`program`) node.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Scope tree of the module.
    #[must_use]
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Text covered by a node.
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Text covered by a span.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Every node in document order, anonymous tokens included.
    #[must_use]
    pub fn nodes(&self) -> Preorder<'_> {
        Preorder::new(self.root())
    }

    /// Nodes of one kind in document order.
    pub fn nodes_of_kind<'t>(&'t self, kind: &'t str) -> impl Iterator<Item = Node<'t>> + 't {
        self.nodes().filter(move |n| n.kind() == kind)
    }

    /// Span strictly inside the quotes of a `string` or `template_string`.
    #[must_use]
    pub fn string_content(&self, node: Node<'_>) -> Option<Span> {
        if !matches!(node.kind(), "string" | "template_string") || node.end_byte() < node.start_byte() + 2 {
            return None;
        }
        Some(Span::new(node.start_byte() + 1, node.end_byte() - 1))
    }

    /// Unquoted text of a string node.
    #[must_use]
    pub fn string_value(&self, node: Node<'_>) -> Option<&str> {
        self.string_content(node).map(|span| self.slice(span))
    }

    /// 0-based line of a byte offset.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        let end = offset.min(self.source.len());
        self.source.as_bytes()[..end]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
    }

    /// Byte offset where the line containing `offset` starts.
    #[must_use]
    pub fn line_start(&self, offset: usize) -> usize {
        let end = offset.min(self.source.len());
        self.source.as_bytes()[..end]
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1)
    }

    /// Leading whitespace of the line containing `offset`.
    #[must_use]
    pub fn indent_at(&self, offset: usize) -> &str {
        let start = self.line_start(offset);
        let rest = &self.source[start..];
        let len = rest
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        &rest[..len]
    }
}

/// Pre-order walk over a subtree, driven by a `TreeCursor`.
pub struct Preorder<'t> {
    cursor: TreeCursor<'t>,
    done: bool,
}

impl<'t> Preorder<'t> {
    /// Walk the subtree rooted at `node`.
    #[must_use]
    pub fn new(node: Node<'t>) -> Self {
        Self {
            cursor: node.walk(),
            done: false,
        }
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let node = self.cursor.node();

        if self.cursor.goto_first_child() || self.cursor.goto_next_sibling() {
            return Some(node);
        }
        loop {
            if !self.cursor.goto_parent() {
                self.done = true;
                break;
            }
            if self.cursor.goto_next_sibling() {
                break;
            }
        }
        Some(node)
    }
}
