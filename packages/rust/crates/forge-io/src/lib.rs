#![allow(clippy::doc_markdown)]

//! forge-io - Virtual overlay filesystem for source refactoring
//!
//! Stages file creations, updates, deletions and moves in memory so a
//! multi-file refactor can be computed and reviewed before anything is
//! written, then flushes it with a line-diff report.
//!
//! # Features
//!
//! - **Overlay**: reads merge staged state with the disk, including moved
//!   files and moved directories
//! - **Safety**: binary detection, size limits, `\r\n` folding
//! - **Reports**: serde-serializable flush records with line diffs
//!
//! # Architecture
//!
//! ```text
//! forge-io/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # IoError enum
//! ├── detect.rs    # Binary detection & decoding
//! ├── disk.rs      # Synchronous disk reads
//! ├── paths.rs     # Project-relative path helpers
//! ├── config.rs    # forge.toml + listing globs
//! ├── diff.rs      # Line chunks & unified diff
//! ├── report.rs    # Flush report types
//! └── workspace.rs # The overlay
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_io::{FlushOptions, Workspace};
//!
//! let mut ws = Workspace::open("/path/to/project")?;
//! ws.save("src/features/home/Hello.js", "export default function Hello() {}\n");
//! ws.move_file("src/features/home/Old.js", "src/features/home/New.js")?;
//! let report = ws.flush(FlushOptions::default())?;
//! println!("{}", report.render());
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod config;
mod detect;
mod diff;
mod disk;
mod error;
pub mod paths;
mod report;
mod workspace;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use config::{
    CONFIG_FILE, DEFAULT_MAX_FILE_SIZE, ListingConfig, PROJECT_ROOT_ENV, PathFilter,
    WorkspaceConfig, resolve_project_root,
};
pub use diff::{ChunkTag, DiffChunk, diff_lines, generate_unified_diff, render_diff};
pub use disk::read_text_safe;
pub use error::IoError;
pub use report::{FlushKind, FlushOptions, FlushRecord, FlushReport};
pub use workspace::{DeleteMode, PendingChanges, Workspace};

// Re-export detection utilities for advanced use
pub use detect::{decode_text, is_binary, normalize_line_endings};
