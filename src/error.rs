//! Error types for the declaration lister
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages. Malformed source text is
//! not an error: the parser reports it as diagnostics next to its results.
//! These types cover what lies around the parser (files, settings, CLI
//! arguments).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reading and listing files
#[derive(Error, Debug)]
pub enum IndexError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path '{path}' does not exist")]
    PathNotFound { path: PathBuf },

    #[error(
        "Unsupported file type '{extension}' for file '{path}'. Configured extensions: {supported}"
    )]
    UnsupportedFileType {
        path: PathBuf,
        extension: String,
        supported: String,
    },

    /// Source decoding errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl IndexError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::PathNotFound { .. } => "PATH_NOT_FOUND",
            Self::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::Parse(ParseError::InvalidUtf8 { .. }) => "INVALID_ENCODING",
            Self::Parse(ParseError::UnknownStandard { .. }) => "UNKNOWN_STANDARD",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::FileWrite { .. } => vec![
                "Check that the directory is writable",
                "Use 'lcdecl init --force' to overwrite an existing settings file",
            ],
            Self::PathNotFound { .. } => vec!["Check the path for typos"],
            Self::UnsupportedFileType { .. } => vec![
                "Add the extension to [batch] extensions in .lcdecl/settings.toml",
                "Pass the file explicitly on the command line",
            ],
            Self::Parse(ParseError::InvalidUtf8 { .. }) => {
                vec!["Convert the file to UTF-8 before listing it"]
            }
            Self::Parse(ParseError::UnknownStandard { .. }) => {
                vec!["Use one of: c89, c99, c11, c17, c++98, c++03, c++11, c++14, c++17, c++20, c++23"]
            }
            Self::ConfigError { .. } => vec![
                "Run 'lcdecl config' to see the effective settings",
                "Run 'lcdecl init --force' to regenerate the settings file",
            ],
            Self::General(_) => vec![],
        }
    }

    /// Whether the error concerns a missing path
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::PathNotFound { .. } => true,
            Self::FileRead { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Errors specific to turning input into something the parser can read
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid UTF-8 in source file '{path}' at byte {offset}")]
    InvalidUtf8 { path: PathBuf, offset: usize },

    #[error("{reason}")]
    UnknownStandard { value: String, reason: String },
}

/// Result type alias for file and settings operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, IndexError>;

    /// Add context with a path
    fn with_path(self, path: &std::path::Path) -> Result<T, IndexError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, IndexError> {
        self.map_err(|e| IndexError::General(format!("{msg}: {e}")))
    }

    fn with_path(self, path: &std::path::Path) -> Result<T, IndexError> {
        self.map_err(|e| {
            IndexError::General(format!("Error processing '{}': {}", path.display(), e))
        })
    }
}
