//! Parallel parsing of many files
//!
//! Each file is read and parsed on its own: one bad file yields one error
//! entry and never disturbs the others. Results come back in input order.

use crate::Settings;
use crate::error::{IndexError, IndexResult, ParseError};
use crate::parsing::{CppParser, KeywordTable, ParseOutput};
use crate::types::DeclarationKind;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Declarations and diagnostics of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileListing {
    pub path: PathBuf,
    #[serde(flatten)]
    pub output: ParseOutput,
}

impl FileListing {
    pub fn declaration_count(&self) -> usize {
        self.output.declarations.len()
    }

    pub fn error_count(&self) -> usize {
        self.output.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.output.warnings().count()
    }
}

/// Totals over a batch, failed files included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: usize,
    pub declarations: usize,
    pub errors: usize,
    pub warnings: usize,
    pub failures: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[IndexResult<FileListing>]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, result| {
                summary.files += 1;
                match result {
                    Ok(listing) => {
                        summary.declarations += listing.declaration_count();
                        summary.errors += listing.error_count();
                        summary.warnings += listing.warning_count();
                    }
                    Err(_) => summary.failures += 1,
                }
                summary
            })
    }
}

/// Reads and parses files on a rayon pool
#[derive(Debug)]
pub struct BatchParser {
    keywords: KeywordTable,
    threads: usize,
    kinds: Vec<DeclarationKind>,
}

impl BatchParser {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            keywords: settings.keyword_table(),
            threads: settings.effective_threads(),
            kinds: Vec::new(),
        }
    }

    /// Override the configured pool size; 0 keeps the configured value
    pub fn with_threads(mut self, threads: usize) -> Self {
        if threads > 0 {
            self.threads = threads;
        }
        self
    }

    /// Only keep declarations of these kinds; empty keeps everything
    pub fn with_kinds(mut self, kinds: Vec<DeclarationKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Parse every file, keeping input order.
    ///
    /// Falls back to the global rayon pool when a dedicated pool cannot be
    /// built.
    pub fn parse_files(&self, paths: &[PathBuf]) -> Vec<IndexResult<FileListing>> {
        tracing::debug!(
            "[batch] parsing {} file(s) on {} thread(s) as {}",
            paths.len(),
            self.threads,
            self.keywords.standard()
        );

        let run = || {
            paths
                .par_iter()
                .map(|path| self.parse_file(path))
                .collect::<Vec<_>>()
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(err) => {
                tracing::warn!("[batch] could not build thread pool: {err}");
                run()
            }
        }
    }

    /// Read and parse a single file
    pub fn parse_file(&self, path: &Path) -> IndexResult<FileListing> {
        let source = read_source(path).inspect_err(|err| {
            tracing::warn!("[batch] {err}");
        })?;
        let parser = CppParser::with_keywords(self.keywords.clone());
        let mut output = parser.parse(&source);
        output.retain_kinds(&self.kinds);

        tracing::debug!(
            "[batch] {}: {} declaration(s), {} diagnostic(s)",
            path.display(),
            output.declarations.len(),
            output.diagnostics.len()
        );

        Ok(FileListing {
            path: path.to_path_buf(),
            output,
        })
    }
}

/// Read a file as UTF-8, reporting the first invalid byte
pub fn read_source(path: &Path) -> IndexResult<String> {
    let bytes = fs::read(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| {
        ParseError::InvalidUtf8 {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        }
        .into()
    })
}
