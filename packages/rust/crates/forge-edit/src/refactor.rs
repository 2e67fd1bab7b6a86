//! Refactor sessions over the overlay.
//!
//! A [`Refactor`] owns a [`Workspace`] and an [`AstCache`]. Each file-path
//! operation reads the current text from the overlay, runs a transform on
//! its tree, applies the edits and stages the result for saving. Nothing
//! reaches the disk before [`Refactor::flush`].

use std::path::Path;
use std::rc::Rc;

use forge_ast::{AstCache, Lang, ModuleProps, SyntaxTree};
use forge_io::{ChunkTag, FlushOptions, FlushReport, Workspace, diff_lines, generate_unified_diff, paths};
use serde::Serialize;

use crate::edit::Edit;
use crate::error::EditError;
use crate::lines;
use crate::merge::apply_edits;
use crate::transform::{array, declaration, module, object, string};

/// Outcome of one file-path operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    /// Project-relative path of the file.
    pub path: String,
    /// Edits applied, or changed lines for line-based updates.
    pub count: usize,
    /// Unified diff of the change, empty when nothing changed.
    pub diff: String,
}

impl FileUpdate {
    /// Whether the file text changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.diff.is_empty()
    }
}

/// Refactor session: overlay plus parse cache.
pub struct Refactor {
    ws: Workspace,
    cache: AstCache,
}

impl Refactor {
    /// Session over an existing overlay.
    #[must_use]
    pub fn new(ws: Workspace) -> Self {
        Self {
            ws,
            cache: AstCache::new(),
        }
    }

    /// Session over the project at `root`.
    ///
    /// # Errors
    /// Configuration errors from `forge.toml`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, EditError> {
        Ok(Self::new(Workspace::open(root)?))
    }

    /// The overlay.
    #[must_use]
    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    /// The overlay, for direct file operations.
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.ws
    }

    /// The parse cache.
    #[must_use]
    pub fn cache(&self) -> &AstCache {
        &self.cache
    }

    /// End the session, keeping the overlay.
    #[must_use]
    pub fn into_workspace(self) -> Workspace {
        self.ws
    }

    /// Tree of the current text of `path`.
    ///
    /// # Errors
    /// `UnsupportedFile` for non-module files, a read error, or the parse
    /// error.
    pub fn tree(&mut self, path: &str) -> Result<Rc<SyntaxTree>, EditError> {
        let key = self.ws.key(path);
        let lang = Lang::from_path(Path::new(&key)).ok_or_else(|| EditError::UnsupportedFile(key.clone()))?;
        let text = self.ws.content(&key)?;
        Ok(self.cache.get_or_parse_as(&key, &text, lang)?)
    }

    /// Run `transform` on the tree of `path` and apply its edits.
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn update_file<F>(&mut self, path: &str, transform: F) -> Result<FileUpdate, EditError>
    where
        F: FnOnce(&SyntaxTree) -> Vec<Edit>,
    {
        let tree = self.tree(path)?;
        let edits = transform(&tree);
        Ok(self.write(path, tree.source(), &edits))
    }

    /// Apply `edits` to the current text of `path`.
    ///
    /// # Errors
    /// A read error.
    pub fn apply(&mut self, path: &str, edits: &[Edit]) -> Result<FileUpdate, EditError> {
        let old = self.ws.content(path)?;
        Ok(self.write(path, &old, edits))
    }

    /// Edit `path` as a list of lines.
    ///
    /// # Errors
    /// A read error.
    pub fn update_lines<F>(&mut self, path: &str, f: F) -> Result<FileUpdate, EditError>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let key = self.ws.key(path);
        let old = self.ws.content(&key)?;
        let mut buf: Vec<String> = old.split('\n').map(str::to_string).collect();
        f(&mut buf);
        let new = buf.join("\n");
        if new == old {
            return Ok(FileUpdate {
                path: key,
                count: 0,
                diff: String::new(),
            });
        }
        let count: usize = diff_lines(&old, &new)
            .iter()
            .filter(|c| c.tag != ChunkTag::Unchanged)
            .map(|c| c.count)
            .sum();
        let diff = generate_unified_diff(&old, &new);
        tracing::debug!(path = %key, lines = count, "updated lines");
        self.ws.save(&key, new);
        Ok(FileUpdate { path: key, count, diff })
    }

    fn write(&mut self, path: &str, old: &str, edits: &[Edit]) -> FileUpdate {
        let key = self.ws.key(path);
        if edits.is_empty() {
            return FileUpdate {
                path: key,
                count: 0,
                diff: String::new(),
            };
        }
        let new = apply_edits(old, edits);
        let diff = if new == old {
            String::new()
        } else {
            generate_unified_diff(old, &new)
        };
        tracing::debug!(path = %key, edits = edits.len(), "applied edits");
        if new != old {
            self.ws.save(&key, new);
        }
        FileUpdate {
            path: key,
            count: edits.len(),
            diff,
        }
    }

    /// Forget cached content and tree of a file changed on disk.
    pub fn on_file_changed(&mut self, path: &str) {
        let key = self.ws.key(path);
        self.ws.invalidate(&key);
        self.cache.invalidate(&key);
    }

    /// Classify the module at `path`.
    ///
    /// # Errors
    /// See [`Refactor::tree`]; `Pattern` when structural matching fails.
    pub fn module_props(&mut self, path: &str) -> Result<ModuleProps, EditError> {
        let tree = self.tree(path)?;
        forge_ast::module_props(&tree).map_err(|e| EditError::Pattern(e.to_string()))
    }

    /// Write staged changes to disk.
    ///
    /// # Errors
    /// The first filesystem error.
    pub fn flush(&mut self, options: FlushOptions) -> Result<FlushReport, EditError> {
        Ok(self.ws.flush(options)?)
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// File-path form of [`module::add_import_from`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn add_import_from(
        &mut self,
        path: &str,
        source: &str,
        default: Option<&str>,
        named: &[&str],
        namespace: Option<&str>,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::add_import_from(t, source, default, named, namespace))
    }

    /// File-path form of [`module::add_export_from`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn add_export_from(
        &mut self,
        path: &str,
        source: &str,
        default: Option<&str>,
        named: &[&str],
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::add_export_from(t, source, default, named))
    }

    /// File-path form of [`module::remove_import_specifier`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn remove_import_specifier(&mut self, path: &str, names: &[&str]) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::remove_import_specifier(t, names))
    }

    /// File-path form of [`module::remove_export_specifier`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn remove_export_specifier(
        &mut self,
        path: &str,
        names: &[&str],
        source: Option<&str>,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::remove_export_specifier(t, names, source))
    }

    /// File-path form of [`module::remove_import_by_source`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn remove_import_by_source(&mut self, path: &str, source: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::remove_import_by_source(t, source))
    }

    /// File-path form of [`module::rename_import_specifier`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_import_specifier(
        &mut self,
        path: &str,
        old: &str,
        new: &str,
        source: Option<&str>,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::rename_import_specifier(t, old, new, source))
    }

    /// File-path form of [`module::rename_import_alias`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_import_alias(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::rename_import_alias(t, old, new))
    }

    /// File-path form of [`module::rename_export_specifier`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_export_specifier(
        &mut self,
        path: &str,
        old: &str,
        new: &str,
        source: Option<&str>,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::rename_export_specifier(t, old, new, source))
    }

    /// File-path form of [`module::rename_module_source`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_module_source(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| module::rename_module_source(t, old, new))
    }

    // ========================================================================
    // Arrays and objects
    // ========================================================================

    /// File-path form of [`array::add_to_array`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn add_to_array(&mut self, path: &str, var: &str, code: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| array::add_to_array(t, var, code))
    }

    /// File-path form of [`array::remove_from_array`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn remove_from_array(&mut self, path: &str, var: &str, name: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| array::remove_from_array(t, var, name))
    }

    /// File-path form of [`object::add_object_property`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn add_object_property(
        &mut self,
        path: &str,
        var: Option<&str>,
        key: &str,
        value: &str,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| object::add_object_property(t, var, key, value))
    }

    /// File-path form of [`object::set_object_property`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn set_object_property(
        &mut self,
        path: &str,
        var: Option<&str>,
        key: &str,
        value: &str,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| object::set_object_property(t, var, key, value))
    }

    /// File-path form of [`object::rename_object_property`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_object_property(
        &mut self,
        path: &str,
        var: Option<&str>,
        old: &str,
        new: &str,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| object::rename_object_property(t, var, old, new))
    }

    /// File-path form of [`object::remove_object_property`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn remove_object_property(
        &mut self,
        path: &str,
        var: Option<&str>,
        key: &str,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| object::remove_object_property(t, var, key))
    }

    // ========================================================================
    // Declarations and strings
    // ========================================================================

    /// File-path form of [`declaration::rename_class_name`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_class_name(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| declaration::rename_class_name(t, old, new))
    }

    /// File-path form of [`declaration::rename_function_name`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_function_name(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| declaration::rename_function_name(t, old, new))
    }

    /// File-path form of [`string::rename_string_literal`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_string_literal(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| string::rename_string_literal(t, old, new))
    }

    /// File-path form of [`string::replace_string_literal`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn replace_string_literal(
        &mut self,
        path: &str,
        old: &str,
        new: &str,
        full_match: bool,
    ) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| string::replace_string_literal(t, old, new, full_match))
    }

    /// File-path form of [`string::remove_string_literal`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn remove_string_literal(&mut self, path: &str, text: &str, full_match: bool) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| string::remove_string_literal(t, text, full_match))
    }

    /// File-path form of [`string::rename_css_class_name`].
    ///
    /// # Errors
    /// See [`Refactor::tree`].
    pub fn rename_css_class_name(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_file(path, |t| string::rename_css_class_name(t, old, new))
    }

    // ========================================================================
    // Cross-file references
    // ========================================================================

    /// Point every module that imports or re-exports `src` at `dest`.
    ///
    /// Relative module sources resolving to `src` (with or without its
    /// extension, or its directory when `src` is an `index` file) are
    /// rewritten relative to each dependent. When the file stem changes,
    /// imports of the old stem are renamed as by
    /// [`module::rename_import_specifier`]. Works before or after `src` is
    /// moved. `node_modules` and dot directories are not searched; modules
    /// that fail to parse are skipped with a warning.
    ///
    /// # Errors
    /// The first read error of a dependent.
    pub fn update_refs(&mut self, src: &str, dest: &str) -> Result<Vec<FileUpdate>, EditError> {
        let src = self.ws.key(src);
        let dest = self.ws.key(dest);
        let old_stem = stem(paths::file_name(&src)).to_string();
        let new_stem = stem(paths::file_name(&dest)).to_string();

        let mut updates = Vec::new();
        for file in self.module_files() {
            if file == src || file == dest {
                continue;
            }
            let tree = match self.tree(&file) {
                Ok(tree) => tree,
                Err(EditError::Ast(error)) => {
                    tracing::warn!(path = %file, error = %error, "skipping unparsable module");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let redirects: Vec<(String, String)> = module::module_sources(&tree)
                .into_iter()
                .filter_map(|s| redirect(&file, s, &src, &dest).map(|to| (s.to_string(), to)))
                .collect();
            if redirects.is_empty() {
                continue;
            }

            let before = tree.source().to_string();
            let mut count = 0;
            for (old_source, new_source) in &redirects {
                count += self.rename_module_source(&file, old_source, new_source)?.count;
                if old_stem != new_stem {
                    count += self
                        .rename_import_specifier(&file, &old_stem, &new_stem, Some(new_source))?
                        .count;
                }
            }
            let after = self.ws.content(&file)?;
            tracing::debug!(path = %file, from = %src, to = %dest, edits = count, "updated references");
            updates.push(FileUpdate {
                diff: generate_unified_diff(&before, &after),
                path: file,
                count,
            });
        }
        Ok(updates)
    }

    /// Module files in the overlay view, sorted.
    fn module_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        let mut dirs = vec![String::new()];
        while let Some(dir) = dirs.pop() {
            for path in self.ws.list(&dir) {
                let name = paths::file_name(&path);
                if self.ws.dir_exists(&path) {
                    if name != "node_modules" && !name.starts_with('.') {
                        dirs.push(path);
                    }
                } else if Lang::from_path(Path::new(&path)).is_some() && self.ws.exists(&path) {
                    files.push(path);
                }
            }
        }
        files.sort();
        files
    }

    // ========================================================================
    // Line-based entry files
    // ========================================================================

    /// File-path form of [`lines::add_import_line`].
    ///
    /// # Errors
    /// A read error.
    pub fn add_import_line(&mut self, path: &str, line: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| lines::add_import_line(l, line))
    }

    /// File-path form of [`lines::remove_import_line`].
    ///
    /// # Errors
    /// A read error.
    pub fn remove_import_line(&mut self, path: &str, source: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| {
            lines::remove_import_line(l, source);
        })
    }

    /// File-path form of [`lines::add_export_from_line`].
    ///
    /// # Errors
    /// A read error.
    pub fn add_export_from_line(&mut self, path: &str, line: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| lines::add_export_from_line(l, line))
    }

    /// File-path form of [`lines::remove_export_from_line`].
    ///
    /// # Errors
    /// A read error.
    pub fn remove_export_from_line(&mut self, path: &str, source: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| {
            lines::remove_export_from_line(l, source);
        })
    }

    /// File-path form of [`lines::add_style_import`].
    ///
    /// # Errors
    /// A read error.
    pub fn add_style_import(&mut self, path: &str, source: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| lines::add_style_import(l, source))
    }

    /// File-path form of [`lines::remove_style_import`].
    ///
    /// # Errors
    /// A read error.
    pub fn remove_style_import(&mut self, path: &str, source: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| {
            lines::remove_style_import(l, source);
        })
    }

    /// File-path form of [`lines::rename_style_import`].
    ///
    /// # Errors
    /// A read error.
    pub fn rename_style_import(&mut self, path: &str, old: &str, new: &str) -> Result<FileUpdate, EditError> {
        self.update_lines(path, |l| {
            lines::rename_style_import(l, old, new);
        })
    }
}

/// File name without its extension.
fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

/// New module source for `source` in `file` when it resolves to `src`.
fn redirect(file: &str, source: &str, src: &str, dest: &str) -> Option<String> {
    if !source.starts_with('.') {
        return None;
    }
    let resolved = paths::join(paths::parent(file), source);
    let relative = paths::relative_module_source(file, dest);
    let dest_name = paths::file_name(dest);

    if resolved == src {
        return Some(match dest_name.rfind('.') {
            Some(i) if i > 0 => format!("{relative}{}", &dest_name[i..]),
            _ => relative,
        });
    }
    if resolved == paths::join(paths::parent(src), stem(paths::file_name(src))) {
        return Some(relative);
    }
    if stem(paths::file_name(src)) == "index" && resolved == paths::parent(src) {
        if stem(dest_name) == "index" {
            return Some(match relative.strip_suffix("/index") {
                Some("") | None => ".".to_string(),
                Some(dir) => dir.to_string(),
            });
        }
        return Some(relative);
    }
    None
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_tree_rejects_non_modules() {
        let dir = TempDir::new().unwrap();
        let mut rf = Refactor::open(dir.path()).unwrap();
        rf.workspace_mut().put("src/styles/index.less", "@import './a';\n");
        assert!(matches!(
            rf.tree("src/styles/index.less"),
            Err(EditError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_redirect_forms() {
        let src = "src/features/home/Hello.js";
        let dest = "src/features/common/World.js";
        assert_eq!(
            redirect("src/features/home/Page.js", "./Hello", src, dest).as_deref(),
            Some("../common/World")
        );
        assert_eq!(
            redirect("src/features/home/Page.js", "./Hello.js", src, dest).as_deref(),
            Some("../common/World.js")
        );
        assert_eq!(redirect("src/features/home/Page.js", "./Hellox", src, dest), None);
        assert_eq!(redirect("src/features/home/Page.js", "Hello", src, dest), None);
    }

    #[test]
    fn test_redirect_directory_index() {
        let src = "src/features/home/index.js";
        assert_eq!(
            redirect("src/Root.js", "./features/home", src, "src/features/start/index.js").as_deref(),
            Some("./features/start")
        );
        assert_eq!(
            redirect("src/features/start/A.js", "../home", src, "src/features/start/index.js").as_deref(),
            Some(".")
        );
        assert_eq!(
            redirect("src/Root.js", "./features/home/", src, "src/features/home/main.js").as_deref(),
            Some("./features/home/main")
        );
    }

    #[test]
    fn test_no_edits_leaves_file_unstaged() {
        let dir = TempDir::new().unwrap();
        let mut rf = Refactor::open(dir.path()).unwrap();
        rf.workspace_mut().put("a.js", "const arr = [a];\n");
        let update = rf.remove_from_array("a.js", "arr", "zzz").unwrap();
        assert_eq!(update.count, 0);
        assert!(!update.changed());
        assert!(rf.workspace().pending().saved.is_empty());
    }
}
