//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - declarations were listed
//! - `1`: General error - unspecified failure
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell
//!
//! Code 2 is left to clap, which uses it for usage errors.

use crate::error::{IndexError, ParseError};

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Nothing to list: no declarations in any input (code 3)
    NotFound = 3,

    /// Error diagnostics were reported and `--strict` was given (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Operation not supported (code 8)
    UnsupportedOperation = 8,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    /// Exit code for a finished listing.
    ///
    /// Read failures outrank everything; then an empty listing; then error
    /// diagnostics, which only count under `strict`.
    pub fn from_listing(declarations: usize, errors: usize, failures: usize, strict: bool) -> Self {
        if failures > 0 {
            ExitCode::IoError
        } else if declarations == 0 {
            ExitCode::NotFound
        } else if strict && errors > 0 {
            ExitCode::ParseError
        } else {
            ExitCode::Success
        }
    }

    /// Convert an `IndexError` to the appropriate exit code.
    pub fn from_error(error: &IndexError) -> Self {
        match error {
            IndexError::PathNotFound { .. } => ExitCode::NotFound,
            IndexError::FileRead { .. } | IndexError::FileWrite { .. } => ExitCode::IoError,
            IndexError::Parse(ParseError::InvalidUtf8 { .. }) => ExitCode::ParseError,
            IndexError::Parse(ParseError::UnknownStandard { .. }) => ExitCode::ConfigError,
            IndexError::ConfigError { .. } => ExitCode::ConfigError,
            IndexError::UnsupportedFileType { .. } => ExitCode::UnsupportedOperation,
            IndexError::General(_) => ExitCode::GeneralError,
        }
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Stable identifier used as the `code` of JSON responses
    pub fn status_code(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::NotFound => "NOT_FOUND",
            ExitCode::ParseError => "PARSE_ERROR",
            ExitCode::IoError => "IO_ERROR",
            ExitCode::ConfigError => "CONFIG_ERROR",
            ExitCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
        }
    }

    /// Get a human-readable description of the exit code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::NotFound => "No declarations found",
            ExitCode::ParseError => "Source contains errors",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::UnsupportedOperation => "Unsupported operation",
        }
    }
}
