//! Virtual overlay filesystem.
//!
//! A [`Workspace`] stages file creations, updates, deletions and moves in
//! memory. Queries see the staged state merged with the disk; nothing is
//! written until [`Workspace::flush`].
//!
//! All keys are project-relative paths in [`paths::normalize`] form.
//! Recorded file moves use the coordinates the file will have once the
//! pending directory moves ran, which is the order `flush` applies them in.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs as std_fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{PathFilter, WorkspaceConfig};
use crate::detect::{decode_text, normalize_line_endings};
use crate::diff::{diff_lines, render_diff};
use crate::disk::{ensure_parent_dir, read_text_safe};
use crate::error::IoError;
use crate::paths;
use crate::report::{FlushKind, FlushOptions, FlushRecord, FlushReport};

/// How a missing target is reported when a deletion is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Log a warning when the path is already gone.
    Warn,
    /// Stay silent when the path is already gone.
    Quiet,
}

/// Snapshot of the staged changes, for inspection and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingChanges {
    /// Files to write, sorted.
    pub saved: Vec<String>,
    /// Paths to delete with their reporting mode, sorted.
    pub deleted: Vec<(String, DeleteMode)>,
    /// Directories to create, sorted.
    pub dirs: Vec<String>,
    /// File moves `(origin, target)` in recording order.
    pub moves: Vec<(String, String)>,
    /// Directory moves `(origin, target)` in recording order.
    pub dir_moves: Vec<(String, String)>,
}

/// In-memory staging layer over a project directory.
#[derive(Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
    filter: PathFilter,
    /// Loaded or staged text, keyed by current path.
    contents: HashMap<String, String>,
    to_save: BTreeSet<String>,
    to_delete: BTreeMap<String, DeleteMode>,
    dirs: BTreeSet<String>,
    /// `(origin, current)` pairs; an origin appears at most once.
    moves: Vec<(String, String)>,
    dir_moves: Vec<(String, String)>,
}

impl Workspace {
    /// Create a workspace over `config.project_root`.
    ///
    /// # Errors
    /// Returns `IoError::Config` when a listing glob is invalid.
    pub fn new(config: WorkspaceConfig) -> Result<Self, IoError> {
        let filter = config.path_filter()?;
        Ok(Self {
            config,
            filter,
            contents: HashMap::new(),
            to_save: BTreeSet::new(),
            to_delete: BTreeMap::new(),
            dirs: BTreeSet::new(),
            moves: Vec::new(),
            dir_moves: Vec::new(),
        })
    }

    /// Create a workspace for `root`, reading its `forge.toml`.
    ///
    /// # Errors
    /// See [`WorkspaceConfig::load`].
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, IoError> {
        Self::new(WorkspaceConfig::load(root)?)
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.project_root
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Drop every staged change and cached content.
    pub fn reset(&mut self) {
        self.contents.clear();
        self.to_save.clear();
        self.to_delete.clear();
        self.dirs.clear();
        self.moves.clear();
        self.dir_moves.clear();
    }

    /// Overlay key of a path. Absolute paths under the root are made
    /// relative.
    #[must_use]
    pub fn key(&self, path: &str) -> String {
        let p = Path::new(path);
        if p.is_absolute()
            && let Ok(rel) = p.strip_prefix(&self.config.project_root)
        {
            return paths::normalize(&rel.to_string_lossy());
        }
        paths::normalize(path)
    }

    /// Absolute location of a key.
    #[must_use]
    pub fn abs_path(&self, key: &str) -> PathBuf {
        self.config.project_root.join(key)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Whether a file exists in the overlay view.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        let key = self.key(path);
        self.file_exists(&key)
    }

    /// Whether a directory exists in the overlay view.
    #[must_use]
    pub fn dir_exists(&self, dir: &str) -> bool {
        let key = self.key(dir);
        self.dir_exists_key(&key)
    }

    /// Current text of a file, loading it from disk on first access.
    ///
    /// # Errors
    /// `IoError::NotFound` when the file is absent from the overlay view,
    /// or the disk read error.
    pub fn content(&mut self, path: &str) -> Result<String, IoError> {
        let key = self.key(path);
        if !self.file_exists(&key) {
            return Err(IoError::NotFound(key));
        }
        if let Some(text) = self.contents.get(&key) {
            return Ok(text.clone());
        }

        let disk = self
            .disk_path(&key)
            .ok_or_else(|| IoError::NotFound(key.clone()))?;
        let text = read_text_safe(self.abs_path(&disk), self.config.max_file_size)?;
        tracing::debug!(path = %key, disk = %disk, "loaded file into overlay");
        self.contents.insert(key, text.clone());
        Ok(text)
    }

    /// Current text of a file split on `\n`.
    ///
    /// # Errors
    /// See [`Workspace::content`].
    pub fn lines(&mut self, path: &str) -> Result<Vec<String>, IoError> {
        Ok(self
            .content(path)?
            .split('\n')
            .map(str::to_string)
            .collect())
    }

    /// Direct children of `dir`, sorted, as project-relative keys.
    ///
    /// Disk entries of the (possibly moved) directory are merged with
    /// files and directories that only exist in memory. Deleted and
    /// moved-out entries are left out, and the configured globs apply.
    #[must_use]
    pub fn list(&self, dir: &str) -> Vec<String> {
        let key = self.key(dir);
        let mut children = BTreeSet::new();

        if let Some(real) = self.disk_path(&key)
            && let Ok(entries) = std_fs::read_dir(self.abs_path(&real))
        {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                children.insert(paths::join(&key, &name));
            }
        }

        let in_memory = self
            .contents
            .keys()
            .chain(self.to_save.iter())
            .chain(self.dirs.iter())
            .chain(self.moves.iter().map(|(_, to)| to))
            .chain(self.dir_moves.iter().map(|(_, to)| to));
        for path in in_memory {
            if *path == key || !paths::is_under(path, &key) {
                continue;
            }
            let rest = if key.is_empty() {
                path.as_str()
            } else {
                &path[key.len() + 1..]
            };
            if let Some(first) = rest.split('/').next() {
                children.insert(paths::join(&key, first));
            }
        }

        children
            .into_iter()
            .filter(|child| {
                if self.file_exists(child) {
                    self.filter.accepts(child)
                } else if self.dir_exists_key(child) {
                    !self.filter.excludes(child)
                } else {
                    false
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Stage content without marking it for writing.
    pub fn put(&mut self, path: &str, content: impl Into<String>) {
        let key = self.key(path);
        self.to_delete.remove(&key);
        self.contents
            .insert(key, normalize_line_endings(content.into()));
    }

    /// Stage content and mark it for writing on flush.
    pub fn save(&mut self, path: &str, content: impl Into<String>) {
        let key = self.key(path);
        self.put(&key, content);
        self.to_save.insert(key);
    }

    /// Stage a directory creation.
    pub fn mkdir(&mut self, dir: &str) {
        let key = self.key(dir);
        self.to_delete.remove(&key);
        self.dirs.insert(key);
    }

    /// Stage a deletion, warning on flush when the path is already gone.
    pub fn delete(&mut self, path: &str) {
        self.delete_with(path, DeleteMode::Warn);
    }

    /// Stage a deletion that stays silent when the path is already gone.
    pub fn delete_quiet(&mut self, path: &str) {
        self.delete_with(path, DeleteMode::Quiet);
    }

    fn delete_with(&mut self, path: &str, mode: DeleteMode) {
        let key = self.key(path);
        self.contents.retain(|k, _| !paths::is_under(k, &key));
        self.to_save.retain(|k| !paths::is_under(k, &key));
        self.dirs.retain(|k| !paths::is_under(k, &key));

        // A staged move into the deleted area turns into a deletion of its
        // origin, otherwise flush would recreate the file.
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.moves)
            .into_iter()
            .partition(|(_, to)| paths::is_under(to, &key));
        self.moves = kept;
        let target_only = !gone.is_empty() && !self.on_disk(&key);
        for (origin, _) in gone {
            self.to_delete.insert(origin, mode);
        }

        if !target_only {
            self.to_delete.insert(key, mode);
        }
    }

    /// Stage a file move.
    ///
    /// # Errors
    /// `IoError::NoFileToMove` when `old` is absent, `IoError::TargetExists`
    /// when `new` is already taken.
    pub fn move_file(&mut self, old: &str, new: &str) -> Result<(), IoError> {
        let old = self.key(old);
        let new = self.key(new);
        if !self.file_exists(&old) {
            tracing::warn!(path = %old, "no file to move");
            return Err(IoError::NoFileToMove(old));
        }
        if self.file_exists(&new) || self.dir_exists_key(&new) {
            tracing::warn!(path = %new, "target file already exists");
            return Err(IoError::TargetExists(new));
        }

        // Content saved at an origin that already moved away is in memory only.
        let on_disk = !self.moves.iter().any(|(from, _)| *from == old)
            && self
                .disk_path(&old)
                .is_some_and(|p| self.abs_path(&p).is_file());

        if let Some(text) = self.contents.remove(&old) {
            self.contents.insert(new.clone(), text);
        }
        if self.to_save.remove(&old) {
            self.to_save.insert(new.clone());
        }

        if let Some(idx) = self.moves.iter().position(|(_, to)| *to == old) {
            if self.moves[idx].0 == new {
                self.moves.remove(idx);
            } else {
                self.moves[idx].1 = new;
            }
        } else if on_disk {
            self.moves.push((old, new));
        }
        Ok(())
    }

    /// Stage a directory move, re-keying every tracked path below `old`.
    ///
    /// # Errors
    /// `IoError::NoFileToMove` when `old` is not a directory in the overlay
    /// view, `IoError::TargetExists` when `new` is already taken.
    pub fn move_dir(&mut self, old: &str, new: &str) -> Result<(), IoError> {
        let old = self.key(old);
        let new = self.key(new);
        if !self.dir_exists_key(&old) {
            tracing::warn!(path = %old, "no dir to move");
            return Err(IoError::NoFileToMove(old));
        }
        if self.file_exists(&new) || self.dir_exists_key(&new) {
            tracing::warn!(path = %new, "target dir already exists");
            return Err(IoError::TargetExists(new));
        }

        let rekey = |path: &str| paths::replace_prefix(path, &old, &new);

        self.contents = std::mem::take(&mut self.contents)
            .into_iter()
            .map(|(k, v)| (rekey(&k).unwrap_or(k), v))
            .collect();
        self.to_save = std::mem::take(&mut self.to_save)
            .into_iter()
            .map(|k| rekey(&k).unwrap_or(k))
            .collect();
        self.to_delete = std::mem::take(&mut self.to_delete)
            .into_iter()
            .map(|(k, v)| (rekey(&k).unwrap_or(k), v))
            .collect();
        self.dirs = std::mem::take(&mut self.dirs)
            .into_iter()
            .map(|k| rekey(&k).unwrap_or(k))
            .collect();
        for (origin, target) in &mut self.moves {
            if let Some(moved) = rekey(origin) {
                *origin = moved;
            }
            if let Some(moved) = rekey(target) {
                *target = moved;
            }
        }

        if let Some(idx) = self.dir_moves.iter().position(|(_, to)| *to == old) {
            if self.dir_moves[idx].0 == new {
                self.dir_moves.remove(idx);
            } else {
                self.dir_moves[idx].1 = new;
            }
        } else {
            self.dir_moves.push((old, new));
        }
        Ok(())
    }

    /// Forget the cached disk content of one path. Staged content that is
    /// marked for saving is kept.
    pub fn invalidate(&mut self, path: &str) {
        let key = self.key(path);
        if !self.to_save.contains(&key) {
            self.contents.remove(&key);
        }
    }

    /// Snapshot of the staged changes.
    #[must_use]
    pub fn pending(&self) -> PendingChanges {
        PendingChanges {
            saved: self.to_save.iter().cloned().collect(),
            deleted: self
                .to_delete
                .iter()
                .map(|(k, mode)| (k.clone(), *mode))
                .collect(),
            dirs: self.dirs.iter().cloned().collect(),
            moves: self.moves.clone(),
            dir_moves: self.dir_moves.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Flush
    // ------------------------------------------------------------------

    /// Write every staged change to disk.
    ///
    /// Order: create dirs, move dirs, delete, move files, write files.
    /// Missing move or delete sources are reported as warnings, not
    /// errors. On success the overlay is reset, so it mirrors the disk
    /// again.
    ///
    /// # Errors
    /// The first filesystem error aborts the flush.
    pub fn flush(&mut self, options: FlushOptions) -> Result<FlushReport, IoError> {
        let mut report = FlushReport::default();
        let silent = options.silent;

        for dir in &self.dirs {
            let abs = self.abs_path(dir);
            if !abs.exists() {
                std_fs::create_dir_all(&abs)?;
                if !silent {
                    tracing::info!(path = %dir, "created dir");
                }
                report.push(FlushRecord::new(FlushKind::CreateDir, dir.as_str()));
            }
        }

        for (old, new) in &self.dir_moves {
            self.flush_move(old, new, silent, &mut report)?;
        }

        for (path, mode) in &self.to_delete {
            let abs = self.abs_path(path);
            if abs.exists() {
                if abs.is_dir() {
                    std_fs::remove_dir_all(&abs)?;
                } else {
                    std_fs::remove_file(&abs)?;
                }
                if !silent {
                    tracing::info!(path = %path, "deleted");
                }
                report.push(FlushRecord::new(FlushKind::DelFile, path.as_str()));
            } else {
                if !silent && *mode == DeleteMode::Warn {
                    tracing::warn!(path = %path, "no file to delete");
                }
                report.push(FlushRecord::new(FlushKind::DelFileWarning, path.as_str()));
            }
        }

        for (old, new) in &self.moves {
            self.flush_move(old, new, silent, &mut report)?;
        }

        for path in &self.to_save {
            let Some(new_content) = self.contents.get(path) else {
                continue;
            };
            let abs = self.abs_path(path);
            if abs.is_file() {
                let old_content = decode_text(std_fs::read(&abs)?).unwrap_or_default();
                if old_content == *new_content {
                    continue;
                }
                let diff = diff_lines(&old_content, new_content);
                if !silent {
                    tracing::info!(path = %path, "updated file");
                    tracing::debug!("{}", render_diff(&diff));
                }
                let mut record = FlushRecord::new(FlushKind::UpdateFile, path.as_str());
                record.diff = Some(diff);
                report.push(record);
            } else {
                ensure_parent_dir(&abs)?;
                if !silent {
                    tracing::info!(path = %path, "created file");
                }
                report.push(FlushRecord::new(FlushKind::CreateFile, path.as_str()));
            }
            std_fs::write(&abs, new_content)?;
        }

        self.reset();
        Ok(report)
    }

    fn flush_move(
        &self,
        old: &str,
        new: &str,
        silent: bool,
        report: &mut FlushReport,
    ) -> Result<(), IoError> {
        let abs_old = self.abs_path(old);
        if !abs_old.exists() {
            if !silent {
                tracing::warn!(path = %old, "no file to move");
            }
            report.push(FlushRecord::moved(FlushKind::MvFileWarning, old, new));
            return Ok(());
        }
        let abs_new = self.abs_path(new);
        ensure_parent_dir(&abs_new)?;
        std_fs::rename(&abs_old, &abs_new)?;
        if !silent {
            tracing::info!(from = %old, to = %new, "moved");
        }
        report.push(FlushRecord::moved(FlushKind::MvFile, old, new));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn file_exists(&self, key: &str) -> bool {
        if self.to_delete.contains_key(key) {
            return false;
        }
        if self.contents.contains_key(key) || self.moves.iter().any(|(_, to)| to == key) {
            return true;
        }
        if self.deleted_ancestor(key) || self.moves.iter().any(|(from, _)| from == key) {
            return false;
        }
        self.disk_path(key)
            .is_some_and(|p| self.abs_path(&p).is_file())
    }

    fn dir_exists_key(&self, key: &str) -> bool {
        if key.is_empty() {
            return true;
        }
        if self.to_delete.contains_key(key) {
            return false;
        }
        if self.dirs.contains(key)
            || self.dir_moves.iter().any(|(_, to)| to == key)
            || self
                .contents
                .keys()
                .chain(self.moves.iter().map(|(_, to)| to))
                .any(|p| p != key && paths::is_under(p, key))
        {
            return true;
        }
        if self.deleted_ancestor(key) {
            return false;
        }
        self.disk_path(key)
            .is_some_and(|p| self.abs_path(&p).is_dir())
    }

    fn deleted_ancestor(&self, key: &str) -> bool {
        self.to_delete
            .keys()
            .any(|d| d != key && paths::is_under(key, d))
    }

    /// Where the content of `key` lives on disk before the flush, or `None`
    /// when `key` lies in a directory that was moved away.
    /// Whether `key` is physically present and not moved away.
    fn on_disk(&self, key: &str) -> bool {
        !self.moves.iter().any(|(from, _)| from == key)
            && self
                .disk_path(key)
                .is_some_and(|p| self.abs_path(&p).exists())
    }

    fn disk_path(&self, key: &str) -> Option<String> {
        let mut path = self
            .moves
            .iter()
            .find(|(_, to)| to == key)
            .map_or_else(|| key.to_string(), |(from, _)| from.clone());

        for (old, new) in self.dir_moves.iter().rev() {
            if let Some(mapped) = paths::replace_prefix(&path, new, old) {
                path = mapped;
            } else if paths::is_under(&path, old) {
                return None;
            }
        }
        Some(path)
    }
}
