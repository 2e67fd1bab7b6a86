//! Merge and apply edit batches.
//!
//! Edits are sorted by `start` descending (larger `end` first on ties, stable
//! otherwise) and then merged:
//!
//! - pure insertions at the same point are concatenated in emission order;
//! - an edit lying inside another kept edit is dropped;
//! - everything else, touching edits included, is kept.
//!
//! A deletion that removes a whole line's content also removes the line
//! break after it. Splicing runs from the highest offset down so earlier
//! offsets stay valid.

use forge_ast::Span;

use crate::edit::Edit;
use crate::error::EditError;

/// Sort, coalesce and filter `edits` against `text`.
///
/// The result is in application order (highest `start` first).
#[must_use]
pub fn merge_edits(text: &str, edits: &[Edit]) -> Vec<Edit> {
    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut kept: Vec<Edit> = Vec::with_capacity(sorted.len());
    for edit in sorted {
        if let Some(last) = kept.last_mut()
            && last.is_insertion()
            && edit.is_insertion()
            && last.start == edit.start
        {
            last.replacement.push_str(&edit.replacement);
            continue;
        }
        if let Some(outer) = kept.iter().find(|k| covers(k, &edit)) {
            tracing::debug!(edit = %edit.span(), kept = %outer.span(), "dropping contained edit");
            continue;
        }
        kept.retain(|k| {
            let inside = covers(&edit, k);
            if inside {
                tracing::debug!(edit = %k.span(), kept = %edit.span(), "dropping contained edit");
            }
            !inside
        });
        kept.push(edit);
    }

    let bytes = text.as_bytes();
    for i in 0..kept.len() {
        let (start, end) = (kept[i].start, kept[i].end);
        let removes_line = kept[i].replacement.is_empty()
            && start < end
            && (start == 0 || bytes.get(start - 1) == Some(&b'\n'))
            && bytes.get(end) == Some(&b'\n');
        let blocked = kept
            .iter()
            .enumerate()
            .any(|(j, k)| j != i && k.start == end);
        if removes_line && !blocked {
            kept[i].end += 1;
        }
    }
    kept
}

/// Whether `outer` makes `inner` redundant.
fn covers(outer: &Edit, inner: &Edit) -> bool {
    if outer.is_insertion() {
        return false;
    }
    if inner.is_insertion() {
        outer.start < inner.start && inner.start < outer.end
    } else {
        outer.start <= inner.start && inner.end <= outer.end
    }
}

/// First pair of merged edits that overlap, in application order.
fn find_conflict(merged: &[Edit]) -> Option<(Span, Span)> {
    merged
        .windows(2)
        .find(|pair| pair[1].end > pair[0].start)
        .map(|pair| (pair[0].span(), pair[1].span()))
}

/// Apply `edits` to `text`.
///
/// Never fails: overlapping edits are logged and spliced anyway, with every
/// span clamped to the buffer, which leaves visibly corrupted output.
/// Use [`apply_edits_checked`] to reject them instead.
#[must_use]
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    if edits.is_empty() {
        return text.to_string();
    }
    let merged = merge_edits(text, edits);
    if let Some((first, second)) = find_conflict(&merged) {
        tracing::warn!(first = %first, second = %second, "applying conflicting edits");
    }
    splice(text, &merged)
}

/// Apply `edits` to `text`, failing on overlapping edits.
///
/// # Errors
/// `EditError::ConflictingEdits` when two kept edits overlap.
pub fn apply_edits_checked(text: &str, edits: &[Edit]) -> Result<String, EditError> {
    let merged = merge_edits(text, edits);
    if let Some((first, second)) = find_conflict(&merged) {
        return Err(EditError::ConflictingEdits { first, second });
    }
    Ok(splice(text, &merged))
}

fn splice(text: &str, merged: &[Edit]) -> String {
    let mut out = text.to_string();
    for edit in merged {
        let end = floor_boundary(&out, edit.end);
        let start = floor_boundary(&out, edit.start).min(end);
        out.replace_range(start..end, &edit.replacement);
    }
    out
}

fn floor_boundary(s: &str, offset: usize) -> usize {
    let mut i = offset.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
