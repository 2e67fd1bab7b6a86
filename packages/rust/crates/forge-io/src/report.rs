//! Flush report types.

use serde::{Deserialize, Serialize};

use crate::diff::{DiffChunk, render_diff};

/// Kind of action recorded during a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlushKind {
    /// Directory created.
    CreateDir,
    /// File or directory renamed on disk.
    MvFile,
    /// Rename source missing on disk.
    MvFileWarning,
    /// File or directory deleted.
    DelFile,
    /// Deletion target missing on disk.
    DelFileWarning,
    /// New file written.
    CreateFile,
    /// Existing file rewritten.
    UpdateFile,
}

impl FlushKind {
    /// Whether the record is a warning rather than a performed action.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::MvFileWarning | Self::DelFileWarning)
    }

    /// Kebab-case label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateDir => "create-dir",
            Self::MvFile => "mv-file",
            Self::MvFileWarning => "mv-file-warning",
            Self::DelFile => "del-file",
            Self::DelFileWarning => "del-file-warning",
            Self::CreateFile => "create-file",
            Self::UpdateFile => "update-file",
        }
    }
}

/// One flush action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushRecord {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: FlushKind,
    /// Project-relative path acted on (the source for moves).
    pub file: String,
    /// Destination of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Line chunks of an updated file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<DiffChunk>>,
}

impl FlushRecord {
    pub(crate) fn new(kind: FlushKind, file: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            to: None,
            diff: None,
        }
    }

    pub(crate) fn moved(kind: FlushKind, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            to: Some(to.into()),
            ..Self::new(kind, from)
        }
    }
}

/// Ordered list of flush actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlushReport {
    /// Records in execution order.
    pub records: Vec<FlushRecord>,
}

impl FlushReport {
    /// Records of one kind.
    pub fn of_kind(&self, kind: FlushKind) -> impl Iterator<Item = &FlushRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    /// Warning records.
    pub fn warnings(&self) -> impl Iterator<Item = &FlushRecord> {
        self.records.iter().filter(|r| r.kind.is_warning())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was done.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plain-text rendering, one line per record followed by the diff of
    /// updated files.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        for record in &self.records {
            output.push_str(record.kind.as_str());
            output.push_str(": ");
            output.push_str(&record.file);
            if let Some(to) = &record.to {
                output.push_str(" -> ");
                output.push_str(to);
            }
            output.push('\n');
            if let Some(diff) = &record.diff {
                output.push_str(&render_diff(diff));
            }
        }
        output
    }

    pub(crate) fn push(&mut self, record: FlushRecord) {
        self.records.push(record);
    }
}

/// Options for [`crate::Workspace::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushOptions {
    /// Suppress per-action log lines.
    pub silent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FlushKind::MvFileWarning).unwrap();
        assert_eq!(json, "\"mv-file-warning\"");
        assert_eq!(FlushKind::CreateDir.as_str(), "create-dir");
    }

    #[test]
    fn test_record_omits_empty_fields() {
        let record = FlushRecord::new(FlushKind::DelFile, "src/a.js");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "del-file");
        assert!(json.get("to").is_none());
        assert!(json.get("diff").is_none());
    }

    #[test]
    fn test_render() {
        let mut report = FlushReport::default();
        report.push(FlushRecord::moved(FlushKind::MvFile, "a.js", "b.js"));
        assert_eq!(report.render(), "mv-file: a.js -> b.js\n");
        assert_eq!(report.warnings().count(), 0);
    }
}
