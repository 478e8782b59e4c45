pub mod context;
pub mod cpp;
pub mod diagnostic;
pub mod language;
pub mod lexer;
pub mod parser;

pub use context::{ScopeContext, ScopeFrame, ScopeKind};
pub use cpp::{ANONYMOUS, CppParser};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use language::{KeywordTable, LanguageStandard};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{LanguageParser, ParseOutput};
