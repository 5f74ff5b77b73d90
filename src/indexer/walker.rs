use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;

use crate::error::{KssError, Result};

/// Stylesheet extensions searched when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".less", ".css", ".sass", ".scss"];

pub struct FileWalker {
    extensions: Vec<String>,
    patterns: Vec<Pattern>,
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWalker {
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            patterns: Vec::new(),
        }
    }

    /// Select files by extension (with or without the dot) or by filename glob
    pub fn with_filters<E, P>(extensions: &[E], patterns: &[P]) -> Result<Self>
    where
        E: AsRef<str>,
        P: AsRef<str>,
    {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            extensions: extensions
                .iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
            patterns,
        })
    }

    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(KssError::Walk(format!(
                "path does not exist: {}",
                root.display()
            )));
        }

        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.is_supported(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                }
            }
        }

        Ok(files)
    }

    /// Walk every root in order; a file reachable from two roots is listed once
    pub fn walk_all(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for root in roots {
            for file in self.walk(root)? {
                let key = file.canonicalize().unwrap_or_else(|_| file.clone());
                if seen.insert(key) {
                    files.push(file);
                }
            }
        }

        Ok(files)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false);

        by_extension
            || path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| self.patterns.iter().any(|p| p.matches(name)))
                .unwrap_or(false)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_string()
}
