//! Workspace configuration.
//!
//! Loaded from `forge.toml` at the project root. The project root itself
//! resolves from an explicit path, then `FORGE_PROJECT_ROOT`, then the
//! current working directory.

use std::env;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = "forge.toml";

/// Environment variable overriding the project root.
pub const PROJECT_ROOT_ENV: &str = "FORGE_PROJECT_ROOT";

/// Default maximum size of a file read through the overlay (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10_000_000;

/// Include/exclude globs deciding which paths directory listings surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Globs a listed path must match (empty = everything).
    pub include: Vec<String>,
    /// Globs removing paths from listings.
    pub exclude: Vec<String>,
}

/// Configuration for a [`crate::Workspace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Absolute project root. Not read from the file.
    #[serde(skip)]
    pub project_root: PathBuf,
    /// Maximum size in bytes of a file loaded from disk.
    pub max_file_size: u64,
    /// Listing filter.
    pub listing: ListingConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            listing: ListingConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Default configuration rooted at `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            project_root: root.into(),
            ..Self::default()
        }
    }

    /// Load `forge.toml` from `root` (defaults when the file is missing).
    ///
    /// # Errors
    /// Returns `IoError::Config` when the file exists but is not valid TOML
    /// for this schema.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, IoError> {
        let root = root.as_ref();
        let file = root.join(CONFIG_FILE);
        if !file.is_file() {
            tracing::debug!(path = %file.display(), "no workspace config, using defaults");
            return Ok(Self::new(root));
        }

        let text = std::fs::read_to_string(&file)?;
        let mut config: Self = toml::from_str(&text)
            .map_err(|e| IoError::Config(format!("{}: {e}", file.display())))?;
        config.project_root = root.to_path_buf();
        Ok(config)
    }

    /// Load the configuration of the resolved project root.
    ///
    /// # Errors
    /// See [`WorkspaceConfig::load`].
    pub fn discover(explicit_root: Option<&Path>) -> Result<Self, IoError> {
        Self::load(resolve_project_root(explicit_root))
    }

    /// Compile the listing globs.
    ///
    /// # Errors
    /// Returns `IoError::Config` for an invalid glob.
    pub fn path_filter(&self) -> Result<PathFilter, IoError> {
        PathFilter::new(&self.listing.include, &self.listing.exclude)
    }
}

/// Resolve the project root.
///
/// Logic:
/// 1. Explicit path if given
/// 2. `FORGE_PROJECT_ROOT` if set
/// 3. Current working directory
#[must_use]
pub fn resolve_project_root(explicit_root: Option<&Path>) -> PathBuf {
    if let Some(root) = explicit_root {
        return root.to_path_buf();
    }
    env::var(PROJECT_ROOT_ENV).map_or_else(
        |_| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        PathBuf::from,
    )
}

/// Compiled include/exclude globs.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl PathFilter {
    /// Build a filter from glob lists.
    ///
    /// # Errors
    /// Returns `IoError::Config` for an invalid glob.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, IoError> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_set(include)?)
        };
        Ok(Self {
            include,
            exclude: build_set(exclude)?,
        })
    }

    /// A filter accepting every path.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            include: None,
            exclude: GlobSet::empty(),
        }
    }

    /// Whether a project-relative path should be surfaced.
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        if self.exclude.is_match(path) {
            return false;
        }
        self.include.as_ref().is_none_or(|set| set.is_match(path))
    }

    /// Whether a path matches an exclude glob. Directories are only
    /// subject to excludes, since include globs usually name files.
    #[must_use]
    pub fn excludes(&self, path: &str) -> bool {
        self.exclude.is_match(path)
    }
}

fn build_set(globs: &[String]) -> Result<GlobSet, IoError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in globs {
        let glob = Glob::new(pattern).map_err(|e| IoError::Config(format!("{pattern}: {e}")))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| IoError::Config(e.to_string()))
}
