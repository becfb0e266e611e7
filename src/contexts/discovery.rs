use glob::{MatchOptions, Pattern};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::GenerationError;

/// Matches all Python sources
pub const DEFAULT_PATTERN: &str = "*.py";

/// Test files, caches, hidden entries and virtual environments
pub const DEFAULT_EXCLUDES: &[&str] = &["*test*.py", "__pycache__", ".*", "venv", "env", ".env"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Walks a directory tree and selects candidate source files.
///
/// A file is selected when it matches the inclusion pattern and no
/// exclusion pattern matches its relative path or any component of it.
#[derive(Debug, Clone)]
pub struct Discovery {
    pattern: Pattern,
    excludes: Vec<Pattern>,
}

impl Discovery {
    /// # Errors
    /// * `GenerationError::InvalidInput` - A pattern is not valid glob syntax
    pub fn new(pattern: &str, exclude_patterns: &[String]) -> Result<Self, GenerationError> {
        let excludes = exclude_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            pattern: compile(pattern)?,
            excludes,
        })
    }

    /// Discovery with the default exclusions and the given inclusion pattern
    pub fn with_pattern(pattern: &str) -> Result<Self, GenerationError> {
        Self::new(pattern, &default_excludes())
    }

    /// Returns matching files under `root`, walked in file-name order.
    ///
    /// Symlinks are followed, so a link to a regular file counts as one.
    /// Entries that cannot be read (including link cycles) are skipped.
    ///
    /// # Errors
    /// * `GenerationError::InvalidInput` - `root` is not a directory
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, GenerationError> {
        if !root.is_dir() {
            return Err(GenerationError::InvalidInput(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.excludes_name(entry.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if self.includes(relative) && !self.is_excluded(relative) {
                files.push(entry.into_path());
            }
        }

        info!(
            "Discovered {} candidate file(s) under {}",
            files.len(),
            root.display()
        );
        Ok(files)
    }

    /// Whether `relative` matches the inclusion pattern.
    ///
    /// Patterns without a separator are matched against the file name only.
    pub fn includes(&self, relative: &Path) -> bool {
        if self.pattern.as_str().contains('/') {
            self.pattern.matches_path_with(relative, MATCH_OPTIONS)
        } else {
            relative
                .file_name()
                .is_some_and(|name| self.pattern.matches_with(&name.to_string_lossy(), MATCH_OPTIONS))
        }
    }

    /// Whether any exclusion pattern matches `relative` or one of its components
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.excludes.iter().any(|pattern| {
            pattern.matches_path_with(relative, MATCH_OPTIONS)
                || relative.components().any(|component| match component {
                    Component::Normal(name) => {
                        pattern.matches_with(&name.to_string_lossy(), MATCH_OPTIONS)
                    }
                    _ => false,
                })
        })
    }

    fn excludes_name(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_with(&name, MATCH_OPTIONS))
    }
}

pub fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect()
}

fn compile(pattern: &str) -> Result<Pattern, GenerationError> {
    Pattern::new(pattern).map_err(|e| {
        GenerationError::InvalidInput(format!("Invalid glob pattern '{}': {}", pattern, e))
    })
}
