//! Parse cache keyed by path and content hash.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::rc::Rc;

use xxhash_rust::xxh3;

use crate::error::AstError;
use crate::lang::Lang;
use crate::tree::SyntaxTree;

struct CacheEntry {
    hash: u64,
    tree: Rc<SyntaxTree>,
}

/// Parsed trees of recently used modules.
///
/// An entry is reused while the text hashes the same; any other text for
/// the path replaces it.
#[derive(Default)]
pub struct AstCache {
    entries: HashMap<String, CacheEntry>,
    failed: BTreeMap<String, AstError>,
}

impl AstCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the content hash used for cache validation.
    #[must_use]
    pub fn compute_hash(text: &str) -> u64 {
        xxh3::xxh3_64(text.as_bytes())
    }

    /// Tree of `text` at `path`, with the dialect taken from the extension.
    ///
    /// # Errors
    /// `AstError::UnsupportedLanguage` for unknown extensions, or the parse
    /// error.
    pub fn get_or_parse(&mut self, path: &str, text: &str) -> Result<Rc<SyntaxTree>, AstError> {
        let lang = Lang::from_path(Path::new(path))
            .ok_or_else(|| AstError::UnsupportedLanguage(path.to_string()))?;
        self.get_or_parse_as(path, text, lang)
    }

    /// Tree of `text` at `path` parsed as `lang`.
    ///
    /// # Errors
    /// The parse error; the path is then listed by
    /// [`AstCache::failed_to_parse`] until it parses again.
    pub fn get_or_parse_as(
        &mut self,
        path: &str,
        text: &str,
        lang: Lang,
    ) -> Result<Rc<SyntaxTree>, AstError> {
        let hash = Self::compute_hash(text);
        if let Some(entry) = self.entries.get(path)
            && entry.hash == hash
            && entry.tree.lang() == lang
        {
            return Ok(Rc::clone(&entry.tree));
        }

        match SyntaxTree::parse_file(path, text, lang) {
            Ok(tree) => {
                let tree = Rc::new(tree);
                self.failed.remove(path);
                self.entries.insert(
                    path.to_string(),
                    CacheEntry {
                        hash,
                        tree: Rc::clone(&tree),
                    },
                );
                Ok(tree)
            }
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "failed to parse module");
                self.entries.remove(path);
                self.failed.insert(path.to_string(), err.clone());
                Err(err)
            }
        }
    }

    /// Drop the cached tree of one path.
    pub fn invalidate(&mut self, path: &str) {
        self.entries.remove(path);
        self.failed.remove(path);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.failed.clear();
    }

    /// Paths whose last parse failed, sorted, with the error.
    pub fn failed_to_parse(&self) -> impl Iterator<Item = (&str, &AstError)> {
        self.failed.iter().map(|(path, err)| (path.as_str(), err))
    }

    /// Whether a tree for `path` is cached.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of cached trees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tree is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuses_tree_for_same_text() {
        let mut cache = AstCache::new();
        let a = cache.get_or_parse("src/a.js", "const a = 1;").unwrap();
        let b = cache.get_or_parse("src/a.js", "const a = 1;").unwrap();
        assert!(Rc::ptr_eq(&a, &b));

        let c = cache.get_or_parse("src/a.js", "const a = 2;").unwrap();
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_only_named_path() {
        let mut cache = AstCache::new();
        cache.get_or_parse("src/a.js", "a;").unwrap();
        cache.get_or_parse("src/b.js", "b;").unwrap();
        cache.invalidate("src/a.js");
        assert!(!cache.contains("src/a.js"));
        assert!(cache.contains("src/b.js"));
    }

    #[test]
    fn test_failed_to_parse_tracking() {
        let mut cache = AstCache::new();
        assert!(cache.get_or_parse("src/bad.js", "const = ;").is_err());
        let failed: Vec<_> = cache.failed_to_parse().map(|(p, _)| p).collect();
        assert_eq!(failed, vec!["src/bad.js"]);

        cache.get_or_parse("src/bad.js", "const ok = 1;").unwrap();
        assert_eq!(cache.failed_to_parse().count(), 0);
    }

    #[test]
    fn test_unsupported_extension() {
        let mut cache = AstCache::new();
        assert!(matches!(
            cache.get_or_parse("src/style.less", ".a {}"),
            Err(AstError::UnsupportedLanguage(_))
        ));
    }
}
