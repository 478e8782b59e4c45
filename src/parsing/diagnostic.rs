//! Parse diagnostics
//!
//! Nothing in the lexer or parser is fatal. Problems are collected as
//! [`Diagnostic`] values next to the declarations that were extracted, and
//! the caller decides what they mean for exit status.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// What went wrong, independent of wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Unrecognized character or unterminated literal/comment
    LexicalAnomaly,
    /// Unexpected token where a declaration was expected
    SyntaxAnomaly,
    /// Unmatched brace or parenthesis
    StructuralImbalance,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticKind::LexicalAnomaly => Severity::Warning,
            DiagnosticKind::SyntaxAnomaly | DiagnosticKind::StructuralImbalance => {
                Severity::Error
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            line,
            column,
        }
    }

    pub fn lexical(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(DiagnosticKind::LexicalAnomaly, message, line, column)
    }

    pub fn syntax(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(DiagnosticKind::SyntaxAnomaly, message, line, column)
    }

    pub fn imbalance(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(DiagnosticKind::StructuralImbalance, message, line, column)
    }

    /// Downgrade to a warning
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}
