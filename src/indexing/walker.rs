//! File system walker for discovering source files to list
//!
//! This module provides directory traversal with support for:
//! - .gitignore rules
//! - `.lcdeclignore` files
//! - Ignore patterns from configuration
//! - Extension filtering

use crate::Settings;
use crate::config::IGNORE_FILE;
use crate::error::{IndexError, IndexResult};
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Walks directories to find source files to list
#[derive(Debug)]
pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    /// Create a new file walker with the given settings
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Whether the file extension is one of the configured extensions
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.settings
                    .batch
                    .extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Configured extensions as a comma separated list, for messages
    pub fn supported_extensions(&self) -> String {
        self.settings.batch.extensions.join(", ")
    }

    /// Expand command line inputs into the files to parse.
    ///
    /// Files named explicitly are always accepted, whatever their extension;
    /// directories are walked. Duplicates are dropped, first occurrence wins.
    pub fn collect(&self, inputs: &[PathBuf]) -> IndexResult<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for input in inputs {
            if !input.exists() {
                return Err(IndexError::PathNotFound {
                    path: input.clone(),
                });
            }
            let found = if input.is_dir() {
                self.walk(input)?
            } else {
                vec![input.clone()]
            };
            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        tracing::debug!("[walker] {} input(s) expanded to {} file(s)", inputs.len(), files.len());
        Ok(files)
    }

    /// Walk a directory and return the source files below it, sorted by path
    pub fn walk(&self, root: &Path) -> IndexResult<Vec<PathBuf>> {
        let overrides = self.ignore_overrides(root)?;
        let mut builder = WalkBuilder::new(root);

        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(None)
            .require_git(false)
            .overrides(overrides)
            .sort_by_file_name(|a, b| a.cmp(b));

        builder.add_custom_ignore_filename(IGNORE_FILE);

        let files = builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("[walker] skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| self.is_supported(path))
            .collect();

        Ok(files)
    }

    /// Count files that would be listed
    pub fn count_files(&self, root: &Path) -> IndexResult<usize> {
        Ok(self.walk(root)?.len())
    }

    /// Configured ignore patterns become negated override globs
    fn ignore_overrides(&self, root: &Path) -> IndexResult<Override> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.settings.batch.ignore_patterns {
            builder
                .add(&format!("!{pattern}"))
                .map_err(|e| IndexError::ConfigError {
                    reason: format!("invalid ignore pattern '{pattern}': {e}"),
                })?;
        }
        builder.build().map_err(|e| IndexError::ConfigError {
            reason: format!("invalid ignore patterns: {e}"),
        })
    }
}
