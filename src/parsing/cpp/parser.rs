//! C/C++ declaration parser
//!
//! A recursive-descent reader over the token stream that records class,
//! struct, union, enum and namespace headers, member and free function
//! signatures, variables and friend declarations. Function bodies and
//! initializers are skipped as balanced spans without being interpreted.
//!
//! The parser never aborts. A malformed declaration produces a diagnostic,
//! then the parser skips to the next `;` or past the next balanced `{}`
//! group and carries on; the enclosing scope stack is left intact.

use super::declarator::{
    build_parameters, is_ptr_op, is_type_keyword, join_type, render, split_base, split_name,
    split_qualifier, type_ref,
};
use crate::parsing::context::{ScopeContext, ScopeFrame, ScopeKind};
use crate::parsing::diagnostic::Diagnostic;
use crate::parsing::language::{KeywordTable, LanguageStandard};
use crate::parsing::lexer::{Lexer, Token, TokenKind};
use crate::parsing::parser::{LanguageParser, ParseOutput};
use crate::types::{
    AccessLevel, BaseClass, DeclarationKind, DeclarationRecord, Modifiers, TypeRef,
};

/// Display name of unnamed aggregates and namespaces
pub const ANONYMOUS: &str = "(anonymous)";

/// Declaration parser for one language standard
#[derive(Debug, Clone, Default)]
pub struct CppParser {
    keywords: KeywordTable,
}

impl CppParser {
    pub fn new(standard: LanguageStandard) -> Self {
        Self {
            keywords: KeywordTable::for_standard(standard),
        }
    }

    /// Parser over a custom keyword table (e.g. with vendor extensions)
    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Parse C++ code and extract declarations
    ///
    /// Inherent shortcut for the [`LanguageParser`] implementation that
    /// doesn't need a mutable parser.
    pub fn parse(&self, code: &str) -> ParseOutput {
        let tokens = Lexer::new(code, &self.keywords).skip_trivia(true);
        self.parse_tokens(tokens)
    }

    /// Run the declaration grammar over an existing token stream.
    ///
    /// Trivia is ignored; unknown tokens become lexical warnings.
    pub fn parse_tokens<'a, I>(&self, tokens: I) -> ParseOutput
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        DeclParser::new(tokens, &self.keywords).run()
    }
}

impl LanguageParser for CppParser {
    fn parse(&mut self, code: &str) -> ParseOutput {
        CppParser::parse(self, code)
    }

    fn standard(&self) -> LanguageStandard {
        self.keywords.standard()
    }
}

/// Whether a declaration may be followed by another declarator
enum Flow {
    Next,
    Done,
}

/// Type and name of one declarator
#[derive(Debug)]
struct DeclHead<'a> {
    /// Type text shared by all declarators of the declaration
    base: String,
    /// Pointer and reference operators owned by this declarator
    own: Vec<Token<'a>>,
    /// Array dimensions or function pointer signature
    suffix: String,
    qualifier: Vec<String>,
    name: String,
    name_tok: Token<'a>,
    modifiers: Modifiers,
    fn_pointer: bool,
}

impl DeclHead<'_> {
    /// Constructors, destructors and conversion operators carry no type
    fn is_untyped(&self) -> bool {
        self.base.is_empty() && self.own.is_empty()
    }
}

fn closer_for(open: &str) -> Option<&'static str> {
    match open {
        "(" => Some(")"),
        "[" => Some("]"),
        "{" => Some("}"),
        _ => None,
    }
}

fn describe_unknown(lexeme: &str) -> String {
    if lexeme.starts_with("/*") {
        "unterminated block comment".to_string()
    } else if lexeme.contains('"') || lexeme.contains('\'') {
        "unterminated literal".to_string()
    } else {
        format!("unrecognized character '{}'", lexeme.escape_default())
    }
}

struct DeclParser<'a, 'k> {
    tokens: Vec<Token<'a>>,
    keywords: &'k KeywordTable,
    pos: usize,
    scopes: ScopeContext,
    /// Modifiers for the next emitted record (`template<...>`, `extern "C"`)
    pending: Modifiers,
    records: Vec<DeclarationRecord>,
    diagnostics: Vec<Diagnostic>,
    /// Scope depths of aggregates defined inside a `typedef`
    typedef_scopes: Vec<usize>,
}

impl<'a, 'k> DeclParser<'a, 'k> {
    fn new<I>(input: I, keywords: &'k KeywordTable) -> Self
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();
        for token in input {
            match token.kind {
                TokenKind::Comment | TokenKind::Directive => {}
                TokenKind::Unknown => {
                    diagnostics.push(Diagnostic::lexical(
                        describe_unknown(token.lexeme),
                        token.line,
                        token.column,
                    ));
                }
                TokenKind::Eof => {
                    tokens.push(token);
                    break;
                }
                _ => tokens.push(token),
            }
        }

        if !tokens.last().is_some_and(|t| t.is_eof()) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.lexeme.chars().count() as u32))
                .unwrap_or((1, 1));
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: "",
                line,
                column,
            });
        }

        Self {
            tokens,
            keywords,
            pos: 0,
            scopes: ScopeContext::new(),
            pending: Modifiers::empty(),
            records: Vec::new(),
            diagnostics,
            typedef_scopes: Vec::new(),
        }
    }

    fn run(mut self) -> ParseOutput {
        while !self.peek().is_eof() {
            let before = self.pos;
            self.parse_declaration();
            if self.pos == before {
                let token = self.advance();
                self.syntax_error(token, format!("unexpected {token}"));
            }
        }
        self.report_unclosed_scopes();
        self.diagnostics.sort_by_key(|d| (d.line, d.column));

        tracing::debug!(
            "parsed {} declarations with {} diagnostics",
            self.records.len(),
            self.diagnostics.len()
        );
        ParseOutput {
            declarations: self.records,
            diagnostics: self.diagnostics,
        }
    }

    // --- token access ---

    fn peek(&self) -> Token<'a> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Token<'a> {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    fn prev(&self) -> Option<Token<'a>> {
        self.pos.checked_sub(1).map(|idx| self.tokens[idx])
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_punct(punct)
    }

    fn at_keyword(&self, word: &str) -> bool {
        self.peek().is_keyword(word)
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.at_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_access_specifier(&self) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Keyword
            && AccessLevel::from_keyword(token.lexeme).is_some()
            && self.peek_at(1).is_punct(":")
    }

    fn at_attribute(&self) -> bool {
        let token = self.peek();
        let call = self.peek_at(1).is_punct("(");
        (token.is_punct("[") && self.peek_at(1).is_punct("["))
            || (call && (token.is_keyword("alignas") || token.is_keyword("_Alignas")))
            || (call
                && token.is_identifier()
                && matches!(token.lexeme, "__attribute__" | "__declspec" | "alignas"))
    }

    /// Skip `[[...]]`, `alignas(...)`, `__attribute__((...))` and friends
    fn skip_attributes(&mut self) {
        while self.at_attribute() {
            if !self.at_punct("[") {
                self.advance();
            }
            if !self.consume_group(None) {
                return;
            }
        }
    }

    // --- diagnostics ---

    fn syntax_error(&mut self, at: Token<'a>, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("syntax anomaly at {}:{}: {message}", at.line, at.column);
        self.diagnostics
            .push(Diagnostic::syntax(message, at.line, at.column));
    }

    fn syntax_warning(&mut self, at: Token<'a>, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::syntax(message, at.line, at.column).as_warning());
    }

    /// Report an unexpected token; a stray closer is an imbalance
    fn unexpected(&mut self, at: Token<'a>, message: impl Into<String>) {
        if at.is_punct(")") || at.is_punct("]") {
            self.diagnostics.push(Diagnostic::imbalance(
                format!("unmatched '{}'", at.lexeme),
                at.line,
                at.column,
            ));
        } else {
            self.syntax_error(at, message);
        }
    }

    fn unmatched(&mut self, open: Token<'a>) {
        self.diagnostics.push(Diagnostic::imbalance(
            format!("unmatched '{}'", open.lexeme),
            open.line,
            open.column,
        ));
    }

    fn report_unclosed_scopes(&mut self) {
        let unclosed: Vec<ScopeFrame> = self.scopes.unclosed().to_vec();
        for frame in unclosed {
            let label = match &frame.name {
                Some(name) => format!("{} '{name}'", frame.kind.as_str()),
                None => format!("anonymous {}", frame.kind.as_str()),
            };
            self.diagnostics.push(Diagnostic::imbalance(
                format!("unmatched '{{' of {label}: reached end of input"),
                frame.line,
                frame.column,
            ));
        }
    }

    // --- balanced skipping ---

    /// Consume a balanced `()`, `[]` or `{}` group starting at the current
    /// token, optionally collecting its tokens.
    ///
    /// Returns false if the group is not closed before end of input, a `}`
    /// belonging to an enclosing scope, or (outside braces) a `;`. In that
    /// case an imbalance is reported at the opener and the terminating token
    /// is left unconsumed.
    fn consume_group(&mut self, mut sink: Option<&mut Vec<Token<'a>>>) -> bool {
        let open = self.advance();
        if let Some(out) = sink.as_mut() {
            out.push(open);
        }
        let Some(first) = closer_for(open.lexeme) else {
            return false;
        };
        let mut stack = vec![first];

        loop {
            let token = self.peek();
            if token.is_eof() {
                self.unmatched(open);
                return false;
            }
            if token.kind == TokenKind::Punctuation {
                match token.lexeme {
                    "(" | "[" | "{" => {
                        if let Some(closer) = closer_for(token.lexeme) {
                            stack.push(closer);
                        }
                    }
                    ")" | "]" | "}" => {
                        if let Some(idx) = stack.iter().rposition(|c| *c == token.lexeme) {
                            stack.truncate(idx);
                            self.advance();
                            if let Some(out) = sink.as_mut() {
                                out.push(token);
                            }
                            if stack.is_empty() {
                                return true;
                            }
                            continue;
                        }
                        if token.lexeme == "}" {
                            self.unmatched(open);
                            return false;
                        }
                    }
                    ";" if !stack.contains(&"}") => {
                        self.unmatched(open);
                        return false;
                    }
                    _ => {}
                }
            }
            self.advance();
            if let Some(out) = sink.as_mut() {
                out.push(token);
            }
        }
    }

    /// Index of the `>` closing the `<` at the current position, if the
    /// angle brackets look like a template argument list
    fn angle_close_index(&self) -> Option<usize> {
        let mut depth = 0usize;
        let mut nested = 0usize;
        for idx in self.pos..self.tokens.len() {
            let token = self.tokens[idx];
            match token.kind {
                TokenKind::Eof => return None,
                TokenKind::Punctuation => match token.lexeme {
                    "<" if nested == 0 => depth += 1,
                    ">" if nested == 0 => {
                        depth = depth.checked_sub(1)?;
                        if depth == 0 {
                            return Some(idx);
                        }
                    }
                    "(" | "[" | "{" => nested += 1,
                    ")" | "]" | "}" => nested = nested.checked_sub(1)?,
                    ";" => return None,
                    "&&" | "||" if nested == 0 => return None,
                    _ => {}
                },
                _ => {}
            }
        }
        None
    }

    /// Consume a template argument list, optionally collecting its tokens
    fn collect_angles(&mut self, mut sink: Option<&mut Vec<Token<'a>>>) -> bool {
        let Some(end) = self.angle_close_index() else {
            return false;
        };
        while self.pos <= end {
            let token = self.advance();
            if let Some(out) = sink.as_mut() {
                out.push(token);
            }
        }
        true
    }

    /// Skip to the end of the current statement.
    ///
    /// Stops after a `;`, before a `}` or access specifier that belongs to
    /// the enclosing scope, and, for error recovery, after a balanced `{}`
    /// group.
    fn skip_statement(&mut self, stop_after_brace: bool) {
        self.pending = Modifiers::empty();
        loop {
            let token = self.peek();
            if token.is_eof() || token.is_punct("}") {
                return;
            }
            if self.scopes.is_in_aggregate() && self.at_access_specifier() {
                return;
            }
            if token.kind == TokenKind::Punctuation {
                match token.lexeme {
                    ";" => {
                        self.advance();
                        return;
                    }
                    "(" | "[" => {
                        self.consume_group(None);
                        continue;
                    }
                    "{" => {
                        let closed = self.consume_group(None);
                        if closed && stop_after_brace {
                            self.eat_punct(";");
                            return;
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            self.advance();
        }
    }

    fn recover(&mut self) {
        self.skip_statement(true);
    }

    /// Skip an initializer or bit-field width up to the next top-level
    /// `,`, `;` or `}`
    fn skip_initializer(&mut self) {
        loop {
            let token = self.peek();
            if token.is_eof() {
                return;
            }
            if token.kind == TokenKind::Punctuation {
                match token.lexeme {
                    "," | ";" | "}" => return,
                    "(" | "[" | "{" => {
                        if !self.consume_group(None) {
                            return;
                        }
                        continue;
                    }
                    "<" if self.prev().is_some_and(|t| t.is_identifier()) => {
                        if self.collect_angles(None) {
                            continue;
                        }
                    }
                    _ => {}
                }
            }
            self.advance();
        }
    }

    /// Skip `requires C<T> && (N > 0)`
    fn skip_requires_clause(&mut self) {
        self.advance();
        loop {
            if self.at_punct("(") {
                self.consume_group(None);
            } else {
                if self.at_punct("!") {
                    self.advance();
                }
                self.eat_punct("::");
                while self.peek().is_word() {
                    self.advance();
                    if self.at_punct("<") {
                        self.collect_angles(None);
                    }
                    if !self.eat_punct("::") {
                        break;
                    }
                }
            }
            if self.at_punct("&&") || self.at_punct("||") {
                self.advance();
                continue;
            }
            break;
        }
    }

    /// Skip a configured extra keyword such as `__forceinline` or
    /// `__declspec(dllexport)`
    fn skip_extra_keyword(&mut self) -> bool {
        let token = self.peek();
        if token.kind != TokenKind::Keyword || !self.keywords.is_extra(token.lexeme) {
            return false;
        }
        self.advance();
        if self.at_punct("(") {
            self.consume_group(None);
        }
        true
    }

    // --- records ---

    fn emit(&mut self, mut record: DeclarationRecord) {
        record.modifiers |= std::mem::take(&mut self.pending);
        tracing::debug!("declaration {} at {}:{}", record.signature(), record.line, record.column);
        self.records.push(record);
    }

    fn scope_with(&self, qualifier: &[String]) -> Vec<String> {
        let mut scope = self.scopes.scope_path();
        scope.extend(qualifier.iter().cloned());
        scope
    }

    /// Access recorded for a member; friends never take the cursor
    fn member_access(&self, is_friend: bool) -> AccessLevel {
        if is_friend {
            AccessLevel::Unspecified
        } else {
            self.scopes.current_access()
        }
    }

    // --- declarations ---

    fn parse_declaration(&mut self) {
        let token = self.peek();
        match token.kind {
            TokenKind::Punctuation => match token.lexeme {
                ";" => {
                    self.advance();
                    self.pending = Modifiers::empty();
                    return;
                }
                "}" => {
                    self.close_scope();
                    return;
                }
                "{" => {
                    self.syntax_error(token, "unexpected '{' where a declaration was expected");
                    self.consume_group(None);
                    self.eat_punct(";");
                    return;
                }
                _ => {}
            },
            TokenKind::Keyword => match token.lexeme {
                "public" | "private" | "protected" if self.peek_at(1).is_punct(":") => {
                    self.parse_access_specifier();
                    return;
                }
                "namespace" => {
                    self.parse_namespace();
                    return;
                }
                "inline" if self.peek_at(1).is_keyword("namespace") => {
                    self.advance();
                    self.parse_namespace();
                    return;
                }
                "extern" if self.peek_at(1).kind == TokenKind::Literal => {
                    self.parse_linkage();
                    return;
                }
                "extern" if self.peek_at(1).is_keyword("template") => {
                    self.skip_statement(false);
                    return;
                }
                "template" => {
                    self.parse_template();
                    return;
                }
                "export" => {
                    self.advance();
                    return;
                }
                "typedef"
                    if matches!(self.peek_at(1).lexeme, "class" | "struct" | "union" | "enum")
                        && self.peek_at(1).kind == TokenKind::Keyword =>
                {
                    self.advance();
                    if !self.parse_type_declaration(true) {
                        self.skip_statement(false);
                    }
                    return;
                }
                "using" | "typedef" | "static_assert" | "_Static_assert" | "asm" | "concept" => {
                    self.skip_statement(false);
                    return;
                }
                "friend" => {
                    self.parse_friend();
                    return;
                }
                "class" | "struct" | "union" | "enum" => {
                    if self.parse_type_declaration(false) {
                        return;
                    }
                }
                _ => {}
            },
            _ => {}
        }
        self.parse_simple_declaration(Modifiers::empty(), false);
    }

    fn parse_access_specifier(&mut self) {
        let keyword = self.advance();
        self.advance();
        if let Some(level) = AccessLevel::from_keyword(keyword.lexeme) {
            if !self.scopes.set_access(level) {
                self.syntax_error(
                    keyword,
                    format!("access specifier '{}' outside of a class body", keyword.lexeme),
                );
            }
        }
    }

    fn close_scope(&mut self) {
        let brace = self.advance();
        self.pending = Modifiers::empty();
        let depth = self.scopes.depth();
        let is_typedef = self.typedef_scopes.last() == Some(&depth);
        if is_typedef {
            self.typedef_scopes.pop();
        }
        match self.scopes.exit() {
            None => self.diagnostics.push(Diagnostic::imbalance(
                "unmatched '}'",
                brace.line,
                brace.column,
            )),
            Some(frame) if frame.kind.is_aggregate() => {
                let name = frame.name.unwrap_or_else(|| ANONYMOUS.to_string());
                self.finish_type_body(&name, is_typedef);
            }
            Some(_) => {}
        }
    }

    /// After the closing brace of a class or enum: `;` or `} a, *b;`.
    /// Names following a `typedef` body are aliases, not variables.
    fn finish_type_body(&mut self, type_name: &str, is_typedef: bool) {
        if self.eat_punct(";") {
            return;
        }
        let token = self.peek();
        if is_typedef && (token.is_word() || is_ptr_op(&token) || token.is_punct("(")) {
            self.skip_statement(false);
        } else if token.is_word() || is_ptr_op(&token) {
            self.parse_declarators(type_name.to_string(), Modifiers::empty(), false);
        } else {
            self.syntax_error(
                token,
                format!("expected ';' after definition of '{type_name}'"),
            );
        }
    }

    fn parse_namespace(&mut self) {
        let keyword = self.advance();
        let mut name_tokens = Vec::new();
        loop {
            let token = self.peek();
            if token.is_identifier() || token.is_punct("::") {
                name_tokens.push(token);
                self.advance();
            } else if token.is_keyword("inline") {
                self.advance();
            } else {
                break;
            }
        }
        self.skip_attributes();

        if self.at_punct("=") {
            self.skip_statement(false);
            return;
        }
        if !self.at_punct("{") {
            let token = self.peek();
            self.syntax_error(token, format!("expected '{{' after namespace, found {token}"));
            self.recover();
            return;
        }

        let name = (!name_tokens.is_empty()).then(|| render(&name_tokens));
        let at = name_tokens.first().copied().unwrap_or(keyword);
        let mut record = DeclarationRecord::new(
            DeclarationKind::Namespace,
            name.clone().unwrap_or_else(|| ANONYMOUS.to_string()),
            at.line,
            at.column,
        )
        .with_scope(self.scopes.scope_path());
        record.is_definition = true;
        self.emit(record);

        let open = self.advance();
        self.scopes.enter(ScopeFrame::new(
            ScopeKind::Namespace,
            name,
            open.line,
            open.column,
        ));
    }

    /// `extern "C" { ... }` or `extern "C" <declaration>`
    fn parse_linkage(&mut self) {
        self.advance();
        self.advance();
        if self.at_punct("{") {
            let open = self.advance();
            self.scopes.enter(ScopeFrame::new(
                ScopeKind::Linkage,
                None,
                open.line,
                open.column,
            ));
        } else {
            self.pending |= Modifiers::EXTERN;
        }
    }

    fn parse_template(&mut self) {
        let keyword = self.advance();
        if !self.at_punct("<") {
            // explicit instantiation
            self.skip_statement(false);
            return;
        }
        if !self.collect_angles(None) {
            self.syntax_error(keyword, "unterminated template parameter list");
            self.recover();
            return;
        }
        if self.at_keyword("requires") {
            self.skip_requires_clause();
        }
        self.pending |= Modifiers::TEMPLATE;
    }

    fn parse_friend(&mut self) {
        let keyword = self.advance();
        if !self.scopes.is_in_aggregate() {
            self.syntax_error(keyword, "friend declaration outside of a class body");
            self.recover();
            return;
        }

        let token = self.peek();
        let elaborated = token.is_keyword("class")
            || token.is_keyword("struct")
            || token.is_keyword("union");
        if elaborated || (token.is_identifier() && self.peek_at(1).is_punct(";")) {
            if elaborated {
                self.advance();
            }
            let mut name_tokens = Vec::new();
            loop {
                let token = self.peek();
                if token.is_identifier() || token.is_punct("::") {
                    name_tokens.push(token);
                    self.advance();
                } else if token.is_punct("<") {
                    if !self.collect_angles(Some(&mut name_tokens)) {
                        break;
                    }
                } else {
                    break;
                }
            }
            let Some(at) = name_tokens.iter().rev().find(|t| t.is_identifier()).copied() else {
                let token = self.peek();
                self.syntax_error(token, format!("expected a class name after friend, found {token}"));
                self.recover();
                return;
            };
            if !self.at_punct(";") {
                let token = self.peek();
                self.syntax_error(token, format!("expected ';' after friend declaration, found {token}"));
                self.recover();
                return;
            }
            self.advance();

            // The befriended name is kept as written, never resolved
            let record = DeclarationRecord::new(
                DeclarationKind::FriendDeclaration,
                render(&name_tokens),
                at.line,
                at.column,
            )
            .with_scope(self.scopes.scope_path())
            .with_modifiers(Modifiers::FRIEND);
            self.emit(record);
            return;
        }

        self.parse_simple_declaration(Modifiers::FRIEND, true);
    }

    /// Class, struct, union or enum header. Returns false (with nothing
    /// consumed) when the keyword only starts an elaborated type such as
    /// `struct stat buf;`.
    fn parse_type_declaration(&mut self, is_typedef: bool) -> bool {
        let start = self.pos;
        let keyword = self.advance();
        let kind = match keyword.lexeme {
            "class" => DeclarationKind::Class,
            "struct" => DeclarationKind::Struct,
            "union" => DeclarationKind::Union,
            _ => DeclarationKind::Enum,
        };
        if kind == DeclarationKind::Enum && (self.at_keyword("class") || self.at_keyword("struct"))
        {
            self.advance();
        }
        self.skip_attributes();

        let mut name_tokens = Vec::new();
        loop {
            let token = self.peek();
            if token.is_identifier() || token.is_punct("::") {
                name_tokens.push(token);
                self.advance();
            } else if token.is_punct("<") && name_tokens.last().is_some_and(|t| t.is_identifier())
            {
                if !self.collect_angles(Some(&mut name_tokens)) {
                    break;
                }
            } else {
                break;
            }
        }

        let mut modifiers = Modifiers::empty();
        if self.at_keyword("final") {
            self.advance();
            modifiers |= Modifiers::FINAL;
        }

        let next = self.peek();
        let is_header = (next.is_punct(";") && !name_tokens.is_empty())
            || next.is_punct("{")
            || next.is_punct(":");
        if !is_header {
            self.pos = start;
            return false;
        }

        let parts = split_name(name_tokens);
        let (name, qualifier, at) = match parts {
            Some(parts) => (Some(parts.name), parts.qualifier, parts.name_tok),
            None => (None, Vec::new(), keyword),
        };
        let display_name = name.clone().unwrap_or_else(|| ANONYMOUS.to_string());
        let mut record = DeclarationRecord::new(kind, display_name.clone(), at.line, at.column)
            .with_scope(self.scope_with(&qualifier))
            .with_access(self.scopes.current_access())
            .with_modifiers(modifiers);

        if self.eat_punct(";") {
            self.emit(record);
            return true;
        }

        if kind == DeclarationKind::Enum {
            if self.eat_punct(":") {
                while !(self.peek().is_eof()
                    || self.at_punct("{")
                    || self.at_punct(";")
                    || self.at_punct("}"))
                {
                    self.advance();
                }
            }
            if self.eat_punct(";") {
                self.emit(record);
                return true;
            }
            if !self.at_punct("{") {
                let token = self.peek();
                self.syntax_error(token, format!("expected '{{' in enum '{display_name}'"));
                self.emit(record);
                self.recover();
                return true;
            }
            record.is_definition = true;
            self.emit(record);
            if self.consume_group(None) {
                self.finish_type_body(&display_name, is_typedef);
            }
            return true;
        }

        let default_access = if kind == DeclarationKind::Class {
            AccessLevel::Private
        } else {
            AccessLevel::Public
        };
        if self.at_punct(":") {
            record.bases = self.parse_base_list(default_access);
        }
        if !self.at_punct("{") {
            let token = self.peek();
            self.syntax_error(
                token,
                format!("expected '{{' after base list of '{display_name}', found {token}"),
            );
            self.emit(record);
            self.recover();
            return true;
        }

        let open = self.advance();
        record.is_definition = true;
        self.emit(record);

        let frame_name = name.map(|name| {
            let mut path = qualifier;
            path.push(name);
            path.join("::")
        });
        let scope_kind = match kind {
            DeclarationKind::Class => ScopeKind::Class,
            DeclarationKind::Union => ScopeKind::Union,
            _ => ScopeKind::Struct,
        };
        self.scopes.enter(ScopeFrame::new(
            scope_kind,
            frame_name,
            open.line,
            open.column,
        ));
        if is_typedef {
            self.typedef_scopes.push(self.scopes.depth());
        }
        true
    }

    /// `: public A, virtual protected B<int>` up to the class body
    fn parse_base_list(&mut self, default_access: AccessLevel) -> Vec<BaseClass> {
        self.advance();
        let mut bases = Vec::new();
        loop {
            let mut access = None;
            let mut is_virtual = false;
            loop {
                let token = self.peek();
                if token.is_keyword("virtual") {
                    is_virtual = true;
                    self.advance();
                } else if let Some(level) = (token.kind == TokenKind::Keyword)
                    .then(|| AccessLevel::from_keyword(token.lexeme))
                    .flatten()
                {
                    access = Some(level);
                    self.advance();
                } else {
                    break;
                }
            }

            let mut name_tokens = Vec::new();
            loop {
                let token = self.peek();
                if token.is_identifier() || token.is_punct("::") || token.is_punct("...") {
                    name_tokens.push(token);
                    self.advance();
                } else if token.is_punct("<") {
                    if !self.collect_angles(Some(&mut name_tokens)) {
                        break;
                    }
                } else {
                    break;
                }
            }
            if name_tokens.is_empty() {
                let token = self.peek();
                self.syntax_error(token, format!("expected a base class name, found {token}"));
                break;
            }

            bases.push(BaseClass {
                name: render(&name_tokens),
                access: access.unwrap_or(default_access),
                is_virtual,
            });
            if !self.eat_punct(",") {
                break;
            }
        }
        bases
    }

    /// Variables, functions, operators, constructors and destructors
    fn parse_simple_declaration(&mut self, mut modifiers: Modifiers, mut is_friend: bool) {
        loop {
            let token = self.peek();
            if self.at_attribute() {
                self.skip_attributes();
                continue;
            }
            if token.kind != TokenKind::Keyword {
                break;
            }
            if let Some(flag) = Modifiers::from_specifier(token.lexeme) {
                is_friend |= flag == Modifiers::FRIEND;
                modifiers |= flag;
                self.advance();
                if token.lexeme == "explicit" && self.at_punct("(") {
                    self.consume_group(None);
                }
                continue;
            }
            if matches!(
                token.lexeme,
                "register" | "thread_local" | "_Thread_local" | "_Noreturn"
            ) {
                self.advance();
                continue;
            }
            if self.skip_extra_keyword() {
                continue;
            }
            break;
        }

        let Some(mut head) = self.parse_declarator_head() else {
            let token = self.peek();
            self.unexpected(token, format!("expected a declaration, found {token}"));
            self.recover();
            return;
        };
        if head.is_untyped() && !head.fn_pointer && !self.at_punct("(") {
            let at = head.name_tok;
            self.syntax_error(at, format!("expected a type before '{}'", head.name));
            self.recover();
            return;
        }

        let base = head.base.clone();
        loop {
            modifiers |= head.modifiers;
            let flow = if !head.fn_pointer && self.at_punct("(") {
                self.finish_function(head, modifiers, is_friend)
            } else {
                self.finish_variable(head, modifiers, is_friend)
            };
            if let Flow::Done = flow {
                return;
            }
            match self.parse_declarator_head() {
                Some(mut next) => {
                    next.base = join_type(&base, &next.base);
                    head = next;
                }
                None => {
                    let token = self.peek();
                    self.syntax_error(token, format!("expected a declarator after ',', found {token}"));
                    self.recover();
                    return;
                }
            }
        }
    }

    /// Declarators following a class body, `} a, *b;`
    fn parse_declarators(&mut self, base: String, modifiers: Modifiers, is_friend: bool) {
        loop {
            let Some(mut head) = self.parse_declarator_head() else {
                let token = self.peek();
                self.syntax_error(token, format!("expected a declarator, found {token}"));
                self.recover();
                return;
            };
            head.base = join_type(&base, &head.base);
            if let Flow::Done = self.finish_variable(head, modifiers, is_friend) {
                return;
            }
        }
    }

    /// Collect type tokens up to and including the declarator name
    fn parse_declarator_head(&mut self) -> Option<DeclHead<'a>> {
        let mut tokens = Vec::new();
        let mut modifiers = Modifiers::empty();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Identifier => {
                    if self.at_attribute() {
                        self.skip_attributes();
                        continue;
                    }
                    tokens.push(token);
                    self.advance();
                }
                TokenKind::Keyword => {
                    if token.lexeme == "operator" {
                        return Some(self.finish_operator_head(tokens, modifiers));
                    }
                    if self.at_attribute() {
                        self.skip_attributes();
                        continue;
                    }
                    if let Some(flag) = Modifiers::from_specifier(token.lexeme) {
                        modifiers |= flag;
                        self.advance();
                        continue;
                    }
                    if matches!(token.lexeme, "decltype" | "_Atomic")
                        && self.peek_at(1).is_punct("(")
                    {
                        tokens.push(token);
                        self.advance();
                        if !self.consume_group(Some(&mut tokens)) {
                            return None;
                        }
                        continue;
                    }
                    if self.skip_extra_keyword() {
                        continue;
                    }
                    if !is_type_keyword(token.lexeme) {
                        break;
                    }
                    tokens.push(token);
                    self.advance();
                }
                TokenKind::Punctuation => match token.lexeme {
                    "::" | "*" | "&" | "&&" | "~" | "^" | "..." => {
                        tokens.push(token);
                        self.advance();
                    }
                    "<" if tokens.last().is_some_and(|t: &Token<'_>| t.is_word()) => {
                        if !self.collect_angles(Some(&mut tokens)) {
                            break;
                        }
                    }
                    "[" if self.peek_at(1).is_punct("[") => self.skip_attributes(),
                    "(" if is_ptr_op(&self.peek_at(1)) => {
                        return self.finish_function_pointer_head(tokens, modifiers);
                    }
                    _ => break,
                },
                _ => break,
            }
        }

        let parts = split_name(tokens)?;
        let (base, own) = split_base(&parts.specifier);
        Some(DeclHead {
            base: render(base),
            own: own.to_vec(),
            suffix: String::new(),
            qualifier: parts.qualifier,
            name: parts.name,
            name_tok: parts.name_tok,
            modifiers,
            fn_pointer: false,
        })
    }

    /// `operator==`, `operator()`, `operator new[]`, `operator bool`
    fn finish_operator_head(&mut self, mut tokens: Vec<Token<'a>>, modifiers: Modifiers) -> DeclHead<'a> {
        let keyword = self.advance();
        let mut name = String::from("operator");
        let mut conversion = false;

        if self.at_punct("(") && self.peek_at(1).is_punct(")") {
            self.advance();
            self.advance();
            name.push_str("()");
        } else if self.at_punct("[") && self.peek_at(1).is_punct("]") {
            self.advance();
            self.advance();
            name.push_str("[]");
        } else {
            let mut first = true;
            loop {
                let token = self.peek();
                if token.is_eof() || token.is_punct("(") || token.is_punct(";") || token.is_punct("{") {
                    break;
                }
                if token.is_punct("[") && self.peek_at(1).is_punct("]") {
                    self.advance();
                    self.advance();
                    name.push_str("[]");
                    continue;
                }
                if conversion && token.is_punct("<") {
                    let mut args = Vec::new();
                    if self.collect_angles(Some(&mut args)) {
                        name.push_str(&render(&args));
                        continue;
                    }
                }
                // `>>` and `<=>` arrive as several tokens; glue them up to `(`
                if token.is_word() {
                    if first && !matches!(token.lexeme, "new" | "delete" | "co_await") {
                        conversion = true;
                    }
                    if name.ends_with(|c: char| c.is_alphanumeric() || c == '_') {
                        name.push(' ');
                    }
                }
                name.push_str(token.lexeme);
                self.advance();
                first = false;
            }
        }

        let qualifier = split_qualifier(&mut tokens);
        let (base, own) = split_base(&tokens);
        DeclHead {
            base: render(base),
            own: own.to_vec(),
            suffix: String::new(),
            qualifier,
            name,
            name_tok: keyword,
            modifiers,
            fn_pointer: false,
        }
    }

    /// `void (*callback)(int)`, `int (Class::*member)`, `R (&ref)[N]`
    fn finish_function_pointer_head(
        &mut self,
        tokens: Vec<Token<'a>>,
        modifiers: Modifiers,
    ) -> Option<DeclHead<'a>> {
        let open = self.advance();
        let mut inner = Vec::new();
        let mut name_tok = None;
        loop {
            let token = self.peek();
            if token.is_punct(")") {
                self.advance();
                break;
            }
            if token.is_eof() || token.is_punct(";") || token.is_punct("{") || token.is_punct("}") {
                self.unmatched(open);
                return None;
            }
            if token.is_identifier() && !self.peek_at(1).is_punct("::") {
                name_tok = Some(token);
                self.advance();
                continue;
            }
            if token.is_punct("[") || token.is_punct("(") {
                if !self.consume_group(Some(&mut inner)) {
                    return None;
                }
                continue;
            }
            inner.push(token);
            self.advance();
        }

        let name_tok = name_tok?;
        let mut suffix = format!("({})", render(&inner));
        if self.at_punct("(") || self.at_punct("[") {
            let mut signature = Vec::new();
            if !self.consume_group(Some(&mut signature)) {
                return None;
            }
            suffix.push_str(&render(&signature));
        }

        let (base, own) = split_base(&tokens);
        Some(DeclHead {
            base: render(base),
            own: own.to_vec(),
            suffix,
            qualifier: Vec::new(),
            name: name_tok.lexeme.to_string(),
            name_tok,
            modifiers,
            fn_pointer: true,
        })
    }

    /// Parameter list groups, one token vector per parameter.
    ///
    /// Expects the opening `(` to be consumed already.
    fn parse_parameter_groups(&mut self, open: Token<'a>) -> Option<Vec<Vec<Token<'a>>>> {
        let mut groups = Vec::new();
        let mut current = Vec::new();
        let mut in_default = false;
        loop {
            let token = self.peek();
            if token.is_eof() || token.is_punct(";") || token.is_punct("}") {
                self.unmatched(open);
                return None;
            }
            if token.kind == TokenKind::Punctuation {
                match token.lexeme {
                    ")" => {
                        self.advance();
                        if !current.is_empty() || !groups.is_empty() {
                            groups.push(current);
                        }
                        return Some(groups);
                    }
                    "," => {
                        self.advance();
                        groups.push(std::mem::take(&mut current));
                        in_default = false;
                        continue;
                    }
                    "(" | "[" | "{" => {
                        if !self.consume_group(Some(&mut current)) {
                            return None;
                        }
                        continue;
                    }
                    "<" if !in_default && current.last().is_some_and(|t: &Token<'_>| t.is_word()) => {
                        if self.collect_angles(Some(&mut current)) {
                            continue;
                        }
                    }
                    "=" => in_default = true,
                    _ => {}
                }
            }
            current.push(token);
            self.advance();
        }
    }

    /// `-> std::vector<int>` after a parameter list
    fn parse_trailing_return(&mut self) -> Option<TypeRef> {
        let mut tokens = Vec::new();
        loop {
            let token = self.peek();
            if token.is_keyword("override") || token.is_keyword("final") || token.is_keyword("requires") {
                break;
            }
            if token.is_keyword("decltype") && self.peek_at(1).is_punct("(") {
                tokens.push(token);
                self.advance();
                if !self.consume_group(Some(&mut tokens)) {
                    break;
                }
            } else if token.is_word()
                || (token.kind == TokenKind::Punctuation
                    && matches!(token.lexeme, "::" | "*" | "&" | "&&"))
            {
                tokens.push(token);
                self.advance();
            } else if token.is_punct("<") {
                if !self.collect_angles(Some(&mut tokens)) {
                    break;
                }
            } else {
                break;
            }
        }
        if tokens.is_empty() {
            return None;
        }
        let (base, own) = split_base(&tokens);
        Some(type_ref(&render(base), own, ""))
    }

    /// `: x_(x), y_{y}` ahead of a constructor body; stops at the body
    fn skip_mem_initializers(&mut self) -> bool {
        self.advance();
        loop {
            let mut named = false;
            loop {
                let token = self.peek();
                if token.is_word() || token.is_punct("::") {
                    self.advance();
                    named = true;
                } else if token.is_punct("<") && named {
                    if !self.collect_angles(None) {
                        return false;
                    }
                } else {
                    break;
                }
            }
            if !named || !(self.at_punct("(") || self.at_punct("{")) {
                return false;
            }
            if !self.consume_group(None) {
                return false;
            }
            self.eat_punct("...");
            if !self.eat_punct(",") {
                return self.at_punct("{");
            }
        }
    }

    /// Skip a function body and, for function-try-blocks, its handlers
    fn skip_function_body(&mut self) -> bool {
        if self.at_keyword("try") {
            self.advance();
            if self.at_punct(":") && !self.skip_mem_initializers() {
                return false;
            }
            if !self.at_punct("{") || !self.consume_group(None) {
                return false;
            }
            while self.at_keyword("catch") {
                self.advance();
                if self.at_punct("(") && !self.consume_group(None) {
                    return false;
                }
                if !self.at_punct("{") || !self.consume_group(None) {
                    return false;
                }
            }
            return true;
        }
        if self.at_punct(":") && !self.skip_mem_initializers() {
            return false;
        }
        self.at_punct("{") && self.consume_group(None)
    }

    fn finish_function(&mut self, head: DeclHead<'a>, mut modifiers: Modifiers, is_friend: bool) -> Flow {
        let open = self.advance();
        let Some(groups) = self.parse_parameter_groups(open) else {
            self.recover();
            return Flow::Done;
        };
        let parameters = build_parameters(&groups);

        let mut trailing_return = None;
        loop {
            let token = self.peek();
            match (token.kind, token.lexeme) {
                (TokenKind::Keyword, "const") => {
                    modifiers |= Modifiers::CONST;
                    self.advance();
                }
                (TokenKind::Keyword, "volatile") | (TokenKind::Punctuation, "&" | "&&") => {
                    self.advance();
                }
                (TokenKind::Keyword, "noexcept") => {
                    modifiers |= Modifiers::NOEXCEPT;
                    self.advance();
                    if self.at_punct("(") {
                        self.consume_group(None);
                    }
                }
                (TokenKind::Keyword, "throw") => {
                    self.advance();
                    if self.at_punct("(") {
                        self.consume_group(None);
                    }
                }
                (TokenKind::Keyword, "override") => {
                    modifiers |= Modifiers::OVERRIDE;
                    self.advance();
                }
                (TokenKind::Keyword, "final") => {
                    modifiers |= Modifiers::FINAL;
                    self.advance();
                }
                (TokenKind::Keyword, "requires") => self.skip_requires_clause(),
                (TokenKind::Punctuation, "->") => {
                    self.advance();
                    trailing_return = self.parse_trailing_return();
                }
                _ if self.at_attribute() => self.skip_attributes(),
                (TokenKind::Keyword, word) if self.keywords.is_extra(word) => {
                    self.skip_extra_keyword();
                }
                // Virt-specifier spelled as an identifier, or an annotation macro
                (TokenKind::Identifier, _)
                    if matches!(self.peek_at(1).lexeme, ";" | "{" | "=" | "(" | ":")
                        && self.peek_at(1).kind == TokenKind::Punctuation =>
                {
                    self.advance();
                    if self.at_punct("(") {
                        self.consume_group(None);
                    }
                }
                _ => break,
            }
        }

        let mut problem: Option<(Token<'a>, String)> = None;
        if self.at_punct("=") {
            self.advance();
            let value = self.advance();
            match (value.kind, value.lexeme) {
                (TokenKind::Literal, "0") => {
                    if self.scopes.is_in_aggregate() {
                        if !modifiers
                            .intersects(Modifiers::VIRTUAL | Modifiers::OVERRIDE | Modifiers::FINAL)
                        {
                            self.syntax_warning(
                                value,
                                format!("pure specifier on '{}' which is not declared virtual", head.name),
                            );
                        }
                        modifiers |= Modifiers::PURE_VIRTUAL;
                    } else {
                        problem = Some((
                            value,
                            format!("pure specifier on non-member function '{}'", head.name),
                        ));
                    }
                }
                (TokenKind::Keyword, "default") => modifiers |= Modifiers::DEFAULTED,
                (TokenKind::Keyword, "delete") => modifiers |= Modifiers::DELETED,
                _ => {
                    problem = Some((value, format!("unexpected {value} after '=' in declaration of '{}'", head.name)));
                }
            }
        }

        let mut is_definition = false;
        let mut flow = Flow::Done;
        if problem.is_none() {
            let token = self.peek();
            if token.is_punct(";") {
                self.advance();
            } else if token.is_punct(",") {
                self.advance();
                flow = Flow::Next;
            } else if token.is_punct("{") || token.is_punct(":") || token.is_keyword("try") {
                is_definition = true;
                if !self.skip_function_body() && !self.at_punct("}") && !self.peek().is_eof() {
                    let at = self.peek();
                    problem = Some((at, format!("malformed body of '{}'", head.name)));
                }
            } else {
                problem = Some((
                    token,
                    format!("expected ';' or a function body after '{}', found {token}", head.name),
                ));
            }
        }

        let return_type = match trailing_return {
            Some(ty) => Some(ty),
            None if head.is_untyped() => None,
            None => Some(type_ref(&head.base, &head.own, &head.suffix)),
        };
        let kind = if is_friend {
            DeclarationKind::FriendDeclaration
        } else {
            DeclarationKind::Function
        };
        let mut record = DeclarationRecord::new(kind, head.name, head.name_tok.line, head.name_tok.column)
            .with_scope(self.scope_with(&head.qualifier))
            .with_access(self.member_access(is_friend))
            .with_modifiers(modifiers);
        record.parameters = parameters;
        record.return_type = return_type;
        record.is_definition = is_definition;
        self.emit(record);

        if let Some((at, message)) = problem {
            self.unexpected(at, message);
            self.recover();
            return Flow::Done;
        }
        flow
    }

    fn finish_variable(&mut self, head: DeclHead<'a>, modifiers: Modifiers, is_friend: bool) -> Flow {
        let mut suffix = head.suffix.clone();
        while self.at_punct("[") && !self.peek_at(1).is_punct("[") {
            let mut dims = Vec::new();
            if !self.consume_group(Some(&mut dims)) {
                break;
            }
            suffix.push_str(&render(&dims));
        }
        self.skip_attributes();

        let kind = if is_friend {
            DeclarationKind::FriendDeclaration
        } else {
            DeclarationKind::Variable
        };
        let mut record = DeclarationRecord::new(kind, head.name.clone(), head.name_tok.line, head.name_tok.column)
            .with_scope(self.scope_with(&head.qualifier))
            .with_access(self.member_access(is_friend))
            .with_modifiers(modifiers);
        record.value_type = Some(type_ref(&head.base, &head.own, &suffix));
        self.emit(record);

        if self.eat_punct(":") {
            self.skip_initializer();
        }
        if self.eat_punct("=") {
            self.skip_initializer();
        } else if self.at_punct("{") || self.at_punct("(") {
            self.consume_group(None);
        }

        if self.eat_punct(",") {
            return Flow::Next;
        }
        if self.eat_punct(";") {
            return Flow::Done;
        }
        let token = self.peek();
        self.unexpected(
            token,
            format!("expected ';' after declaration of '{}', found {token}", head.name),
        );
        self.recover();
        Flow::Done
    }
}
