//! Lexer for C and C++ source text
//!
//! Produces a lazy stream of [`Token`]s borrowing from the source. Comments
//! and preprocessor directives are kept as trivia tokens so positions of the
//! surrounding tokens are never disturbed; callers that don't want them can
//! enable [`Lexer::skip_trivia`].
//!
//! The lexer is total: any character it cannot classify becomes a one
//! character [`TokenKind::Unknown`] token and lexing continues.

use super::language::KeywordTable;
use serde::Serialize;
use std::fmt;

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuation,
    Literal,
    Comment,
    /// A whole preprocessor line, including backslash continuations
    Directive,
    Unknown,
    Eof,
}

impl TokenKind {
    /// Comments and directives carry no declaration content
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Directive)
    }
}

/// A classified slice of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    /// 1-based line
    pub line: u32,
    /// 1-based column, counted in characters
    pub column: u32,
}

impl Token<'_> {
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.lexeme == punct
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Identifier or keyword
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::Keyword)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::Keyword => write!(f, "keyword '{}'", self.lexeme),
            TokenKind::Literal => write!(f, "literal {}", self.lexeme),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

const THREE_CHAR_PUNCT: &[&str] = &["..."];

const TWO_CHAR_PUNCT: &[&str] = &[
    "::", "->", "&&", "||", "==", "!=", "<=", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ".*",
];

const SINGLE_PUNCT: &str = "{}[]();,:<>=+-*/%&|^!~?.#";

/// Lazy tokenizer over a source string
pub struct Lexer<'a, 'k> {
    source: &'a str,
    keywords: &'k KeywordTable,
    pos: usize,
    line: u32,
    column: u32,
    at_line_start: bool,
    skip_trivia: bool,
    finished: bool,
}

impl<'a, 'k> Lexer<'a, 'k> {
    pub fn new(source: &'a str, keywords: &'k KeywordTable) -> Self {
        Self {
            source,
            keywords,
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            skip_trivia: false,
            finished: false,
        }
    }

    /// Drop comment and directive tokens from the stream
    pub fn skip_trivia(mut self, skip: bool) -> Self {
        self.skip_trivia = skip;
        self
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advance to an absolute byte offset, keeping line/column in step
    fn advance_to(&mut self, offset: usize) {
        while self.pos < offset && self.bump().is_some() {}
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn lex_directive(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            if c == '\\' && matches!(self.peek_nth(1), Some('\n')) {
                self.bump();
                self.bump();
                continue;
            }
            if c == '\\' && self.rest().starts_with("\\\r\n") {
                self.advance_to(self.pos + 3);
                continue;
            }
            self.bump();
        }
        TokenKind::Directive
    }

    fn lex_line_comment(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        TokenKind::Comment
    }

    fn lex_block_comment(&mut self) -> TokenKind {
        let body_start = self.pos + 2;
        match self.source[body_start..].find("*/") {
            Some(end) => {
                self.advance_to(body_start + end + 2);
                TokenKind::Comment
            }
            None => {
                self.advance_to(self.source.len());
                TokenKind::Unknown
            }
        }
    }

    fn lex_quoted(&mut self, quote: char) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    if self.peek().is_some_and(|next| next != '\n') {
                        self.bump();
                    }
                }
                '\n' => return TokenKind::Unknown,
                c if c == quote => {
                    self.bump();
                    return TokenKind::Literal;
                }
                _ => {
                    self.bump();
                }
            }
        }
        TokenKind::Unknown
    }

    fn lex_raw_string(&mut self) -> TokenKind {
        // Positioned on the opening quote of R"delim( ... )delim"
        self.bump();
        let delim_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '(' {
                break;
            }
            if c.is_whitespace() || c == '\\' || c == ')' || self.pos - delim_start >= 16 {
                return TokenKind::Unknown;
            }
            self.bump();
        }
        let delimiter = &self.source[delim_start..self.pos];
        if self.bump().is_none() {
            return TokenKind::Unknown;
        }
        let closing = format!("){delimiter}\"");
        match self.rest().find(&closing) {
            Some(end) => {
                self.advance_to(self.pos + end + closing.len());
                TokenKind::Literal
            }
            None => {
                self.advance_to(self.source.len());
                TokenKind::Unknown
            }
        }
    }

    fn lex_word(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            self.bump();
        }

        let word = &self.source[start..self.pos];
        match self.peek() {
            Some('"') if matches!(word, "R" | "LR" | "uR" | "UR" | "u8R") => {
                return self.lex_raw_string();
            }
            Some(quote @ ('"' | '\'')) if matches!(word, "L" | "u" | "U" | "u8") => {
                return self.lex_quoted(quote);
            }
            _ => {}
        }

        if self.keywords.contains(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if !(c.is_alphanumeric() || c == '_' || c == '.' || c == '\'' || exponent_sign) {
                break;
            }
            prev = c;
            self.bump();
        }
        TokenKind::Literal
    }

    fn lex_punct(&mut self) -> TokenKind {
        let rest = self.rest();
        let width = THREE_CHAR_PUNCT
            .iter()
            .chain(TWO_CHAR_PUNCT)
            .find(|p| rest.starts_with(**p))
            .map(|p| p.len());

        match width {
            Some(len) => {
                self.advance_to(self.pos + len);
                TokenKind::Punctuation
            }
            None => {
                let c = self.bump();
                if c.is_some_and(|c| SINGLE_PUNCT.contains(c)) {
                    TokenKind::Punctuation
                } else {
                    TokenKind::Unknown
                }
            }
        }
    }

    fn scan(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();

        let (start, line, column) = (self.pos, self.line, self.column);
        let Some(c) = self.peek() else {
            if self.finished {
                return None;
            }
            self.finished = true;
            return Some(Token {
                kind: TokenKind::Eof,
                lexeme: "",
                line,
                column,
            });
        };

        let next = self.peek_nth(1);
        let kind = match c {
            '#' if self.at_line_start => self.lex_directive(),
            '/' if next == Some('/') => self.lex_line_comment(),
            '/' if next == Some('*') => self.lex_block_comment(),
            '"' | '\'' => self.lex_quoted(c),
            c if c.is_alphabetic() || c == '_' => self.lex_word(start),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => self.lex_number(),
            _ => self.lex_punct(),
        };
        self.at_line_start = false;

        Some(Token {
            kind,
            lexeme: &self.source[start..self.pos],
            line,
            column,
        })
    }
}

impl<'a> Iterator for Lexer<'a, '_> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = self.scan()?;
            if self.skip_trivia && token.kind.is_trivia() {
                continue;
            }
            return Some(token);
        }
    }
}

/// Tokenize a whole source text, trivia included, ending with one Eof token
pub fn tokenize<'a>(source: &'a str, keywords: &KeywordTable) -> Vec<Token<'a>> {
    Lexer::new(source, keywords).collect()
}
