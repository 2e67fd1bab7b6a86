//! Line diff utilities.
//!
//! Flush reports carry line chunks; previews use a unified-style diff.
//! Both are computed with the `similar` crate.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Kind of a diff chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkTag {
    /// Lines present only in the new text.
    Added,
    /// Lines present only in the old text.
    Removed,
    /// Lines common to both.
    Unchanged,
}

/// A run of consecutive lines sharing one [`ChunkTag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChunk {
    /// Chunk kind.
    pub tag: ChunkTag,
    /// Joined line text, each line keeping its `\n`.
    pub value: String,
    /// Number of lines in the chunk.
    pub count: usize,
}

impl DiffChunk {
    /// Whether the chunk adds lines.
    #[must_use]
    pub fn added(&self) -> bool {
        self.tag == ChunkTag::Added
    }

    /// Whether the chunk removes lines.
    #[must_use]
    pub fn removed(&self) -> bool {
        self.tag == ChunkTag::Removed
    }
}

/// Compute line chunks between two texts.
///
/// A missing final newline is ignored on both sides, so appending lines to
/// a file without one reports a single added chunk. Chunk values always end
/// with `\n`.
#[must_use]
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffChunk> {
    let old = with_final_newline(old);
    let new = with_final_newline(new);
    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());
    let mut chunks: Vec<DiffChunk> = Vec::new();

    for change in diff.iter_all_changes() {
        let tag = match change.tag() {
            ChangeTag::Delete => ChunkTag::Removed,
            ChangeTag::Insert => ChunkTag::Added,
            ChangeTag::Equal => ChunkTag::Unchanged,
        };
        match chunks.last_mut() {
            Some(last) if last.tag == tag => {
                last.value.push_str(change.value());
                last.count += 1;
            }
            _ => chunks.push(DiffChunk {
                tag,
                value: change.value().to_string(),
                count: 1,
            }),
        }
    }

    chunks
}

fn with_final_newline(text: &str) -> Cow<'_, str> {
    if text.is_empty() || text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{text}\n"))
    }
}

/// Render chunks as plain text: ` +++ line` for added lines and ` --- line`
/// for removed lines. Unchanged lines and empty lines are omitted.
#[must_use]
pub fn render_diff(chunks: &[DiffChunk]) -> String {
    let mut output = String::new();
    for chunk in chunks {
        let prefix = match chunk.tag {
            ChunkTag::Added => " +++ ",
            ChunkTag::Removed => " --- ",
            ChunkTag::Unchanged => continue,
        };
        for line in chunk.value.split('\n').filter(|l| !l.is_empty()) {
            output.push_str(prefix);
            output.push_str(line);
            output.push('\n');
        }
    }
    output
}

/// Generate a unified diff between two strings.
///
/// Uses the `similar` crate for line-by-line diffing with three lines of
/// context; hunks are separated by `...`.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}
