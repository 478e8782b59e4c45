//! Output management for CLI commands.
//!
//! Handles formatting and display for different output formats,
//! providing a unified interface for text and JSON output.

use crate::display::{THEME, Theme, create_declaration_table, create_summary_table};
use crate::error::{IndexError, IndexResult};
use crate::indexing::{BatchSummary, FileListing};
use crate::io::exit_code::ExitCode;
use crate::io::format::{JsonResponse, OutputFormat, ResponseMeta};
use crate::parsing::{Diagnostic, LanguageStandard, Token};
use crate::types::DeclarationRecord;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// How a listing is rendered and judged
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingOptions {
    pub show_diagnostics: bool,
    /// Error diagnostics turn the exit code into `ParseError`
    pub strict: bool,
    pub standard: LanguageStandard,
    pub elapsed: Option<Duration>,
}

#[derive(Serialize)]
struct ListedFile<'a> {
    path: &'a Path,
    declarations: &'a [DeclarationRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a [Diagnostic]>,
}

#[derive(Serialize)]
struct FailedFile {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct ListingData<'a> {
    files: Vec<ListedFile<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FailedFile>,
    summary: BatchSummary,
}

/// Manages output formatting and display.
///
/// Provides methods for outputting listings, token dumps and errors in
/// either text or JSON format based on configuration.
pub struct OutputManager {
    format: OutputFormat,
    colors: bool,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl OutputManager {
    /// Create a new output manager with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colors: !Theme::should_disable_colors(),
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    /// Create an output manager with custom writers and colors off.
    pub fn with_writers(format: OutputFormat, stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        Self {
            format,
            colors: false,
            stdout,
            stderr,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output a successful result.
    ///
    /// In JSON mode, wraps the data in a success response.
    /// In text mode, displays the data using its Display implementation.
    pub fn success<T>(&mut self, data: T) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(&data);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "{data}")?;
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output the result of a batch listing.
    ///
    /// Text mode prints one declaration table per file to stdout and the
    /// diagnostics and read failures to stderr, prefixed with the file path.
    pub fn listing(
        &mut self,
        results: &[IndexResult<FileListing>],
        options: ListingOptions,
    ) -> io::Result<ExitCode> {
        let summary = BatchSummary::from_results(results);
        let code = ExitCode::from_listing(
            summary.declarations,
            summary.errors,
            summary.failures,
            options.strict,
        );

        match self.format {
            OutputFormat::Json => self.listing_json(results, summary, code, options)?,
            OutputFormat::Text => self.listing_text(results, options)?,
        }
        Ok(code)
    }

    fn listing_json(
        &mut self,
        results: &[IndexResult<FileListing>],
        summary: BatchSummary,
        code: ExitCode,
        options: ListingOptions,
    ) -> io::Result<()> {
        let mut data = ListingData {
            files: Vec::new(),
            failures: Vec::new(),
            summary,
        };
        for result in results {
            match result {
                Ok(listing) => data.files.push(ListedFile {
                    path: &listing.path,
                    declarations: &listing.output.declarations,
                    diagnostics: options
                        .show_diagnostics
                        .then_some(listing.output.diagnostics.as_slice()),
                }),
                Err(err) => data.failures.push(FailedFile {
                    code: err.status_code(),
                    message: err.to_string(),
                }),
            }
        }

        let message = format!(
            "{} declaration(s) in {} file(s), {} error(s), {} warning(s)",
            summary.declarations, summary.files, summary.errors, summary.warnings
        );
        let response = if code.is_success() {
            let mut response = JsonResponse::success(data);
            response.message = message;
            response
        } else {
            JsonResponse::partial(data, code, &message)
        };

        let mut meta = ResponseMeta::now().with_standard(options.standard);
        if let Some(elapsed) = options.elapsed {
            meta = meta.with_elapsed(elapsed);
        }
        let response = response.with_meta(meta);
        writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
        Ok(())
    }

    fn listing_text(
        &mut self,
        results: &[IndexResult<FileListing>],
        options: ListingOptions,
    ) -> io::Result<()> {
        let mut listed = Vec::new();
        for result in results {
            match result {
                Ok(listing) => {
                    self.file_text(listing, options.show_diagnostics)?;
                    listed.push(listing);
                }
                Err(err) => {
                    self.error_text(err)?;
                }
            }
        }
        if listed.len() > 1 {
            writeln!(self.stdout, "{}", create_summary_table(&listed))?;
        }
        Ok(())
    }

    fn file_text(&mut self, listing: &FileListing, show_diagnostics: bool) -> io::Result<()> {
        let path = listing.path.display().to_string();
        writeln!(
            self.stdout,
            "{} ({} declarations)",
            THEME.apply_if(self.colors, &THEME.path, &path),
            listing.declaration_count()
        )?;
        if !listing.output.declarations.is_empty() {
            writeln!(
                self.stdout,
                "{}",
                create_declaration_table(&listing.output.declarations, self.colors)
            )?;
        }
        if show_diagnostics {
            for diagnostic in &listing.output.diagnostics {
                writeln!(
                    self.stderr,
                    "{path}:{}",
                    THEME.diagnostic_line(diagnostic, self.colors)
                )?;
            }
        }
        Ok(())
    }

    /// Dump a token stream.
    ///
    /// JSON mode writes one JSON object per line (JSON Lines).
    pub fn tokens(&mut self, tokens: &[Token<'_>]) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                for token in tokens {
                    writeln!(self.stdout, "{}", serde_json::to_string(token)?)?;
                }
            }
            OutputFormat::Text => {
                for token in tokens {
                    let position = format!("{}:{}", token.line, token.column);
                    let kind = format!("{:?}", token.kind);
                    writeln!(
                        self.stdout,
                        "{position:>9}  {kind:<12} {}",
                        token.lexeme.escape_debug()
                    )?;
                }
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output a not found result.
    pub fn not_found(&mut self, entity: &str, name: &str) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::not_found(entity, name);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "{entity} '{name}' not found")?;
            }
        }
        Ok(ExitCode::NotFound)
    }

    /// Output an error with suggestions.
    pub fn error(&mut self, error: &IndexError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::from_error(error);
                writeln!(self.stderr, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => self.error_text(error)?,
        }
        Ok(ExitCode::from_error(error))
    }

    fn error_text(&mut self, error: &IndexError) -> io::Result<()> {
        let message = format!("Error: {error}");
        writeln!(
            self.stderr,
            "{}",
            THEME.apply_if(self.colors, &THEME.error, message)
        )?;
        for suggestion in error.recovery_suggestions() {
            writeln!(self.stderr, "  Suggestion: {suggestion}")?;
        }
        Ok(())
    }

    /// Output informational message (text mode only).
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        if matches!(self.format, OutputFormat::Text) {
            writeln!(self.stdout, "{message}")?;
        }
        Ok(())
    }
}
