//! List the declarations in C and C++ source files.
//!
//! The core is a lexer and a recursive-descent declaration parser that turn
//! source text into [`DeclarationRecord`]s plus [`Diagnostic`]s. Around it sit
//! file discovery, parallel batch parsing, layered settings and the CLI
//! output layer.
//!
//! ```
//! use lcdecl::{DeclarationKind, LanguageStandard, parse_source};
//!
//! let output = parse_source("struct P { int x; };", LanguageStandard::Cxx17);
//! assert_eq!(output.declarations[0].kind, DeclarationKind::Struct);
//! assert_eq!(output.declarations[1].scope, vec!["P".to_string()]);
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod indexing;
pub mod io;
pub mod parsing;
pub mod types;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{IndexError, IndexResult, ParseError, ParseResult};
pub use indexing::{BatchParser, FileListing, FileWalker};
pub use parsing::{
    CppParser, Diagnostic, DiagnosticKind, KeywordTable, LanguageParser, LanguageStandard, Lexer,
    ParseOutput, Severity, Token, TokenKind, tokenize,
};
pub use types::{AccessLevel, BaseClass, DeclarationKind, DeclarationRecord, Modifiers, Parameter, TypeRef};

/// Parse one translation unit under the given standard's keyword table
pub fn parse_source(code: &str, standard: LanguageStandard) -> ParseOutput {
    CppParser::new(standard).parse(code)
}
