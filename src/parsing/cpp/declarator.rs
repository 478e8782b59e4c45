//! Declarator helpers over token slices
//!
//! These functions never touch parser state: they take the tokens of a
//! declaration head or a parameter and split them into type text, reference
//! marker, qualifier and name.

use crate::parsing::lexer::{Token, TokenKind};
use crate::types::{Parameter, TypeRef};

/// Keywords that may appear inside a type in a declaration
pub(crate) fn is_type_keyword(word: &str) -> bool {
    matches!(
        word,
        "const"
            | "volatile"
            | "unsigned"
            | "signed"
            | "short"
            | "long"
            | "int"
            | "char"
            | "bool"
            | "float"
            | "double"
            | "void"
            | "auto"
            | "wchar_t"
            | "char8_t"
            | "char16_t"
            | "char32_t"
            | "struct"
            | "class"
            | "union"
            | "enum"
            | "typename"
            | "restrict"
            | "_Bool"
            | "_Complex"
            | "_Imaginary"
            | "_Atomic"
    )
}

/// Keywords that qualify a type without naming one
fn is_qualifier_keyword(word: &str) -> bool {
    matches!(
        word,
        "const" | "volatile" | "restrict" | "struct" | "class" | "union" | "enum" | "typename"
    )
}

pub(crate) fn is_ptr_op(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Punctuation && matches!(token.lexeme, "*" | "&" | "&&" | "^")
}

fn is_reference_op(token: &Token<'_>) -> bool {
    token.is_punct("&") || token.is_punct("&&")
}

fn is_wordlike(token: &Token<'_>) -> bool {
    token.is_word() || token.kind == TokenKind::Literal
}

/// Render tokens as compact source text: `std::vector<int>`, `const char*`
pub(crate) fn render(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token<'_>> = None;
    for token in tokens {
        if let Some(prev) = prev {
            let spaced = (is_wordlike(prev) && is_wordlike(token))
                || prev.is_punct(",")
                || (is_ptr_op(prev) && token.is_word());
            if spaced {
                out.push(' ');
            }
        }
        out.push_str(token.lexeme);
        prev = Some(token);
    }
    out
}

/// Join a base type and declarator text, e.g. `const char` + `*`
pub(crate) fn join_type(base: &str, own: &str) -> String {
    if base.is_empty() {
        return own.to_string();
    }
    if own.is_empty() {
        return base.to_string();
    }
    let word_end = base.ends_with(|c: char| c.is_alphanumeric() || c == '_');
    let word_start = own.starts_with(|c: char| c.is_alphanumeric() || c == '_');
    if word_end && word_start {
        format!("{base} {own}")
    } else {
        format!("{base}{own}")
    }
}

/// Nesting depth changes for `<>`, `()`, `[]` and `{}`
fn depth_delta(token: &Token<'_>) -> i32 {
    if token.kind != TokenKind::Punctuation {
        return 0;
    }
    match token.lexeme {
        "<" | "(" | "[" | "{" => 1,
        ">" | ")" | "]" | "}" => -1,
        _ => 0,
    }
}

/// Split at the first top-level pointer or reference operator.
///
/// The prefix is shared by every declarator of a declaration; the rest
/// belongs to the first declarator only.
pub(crate) fn split_base<'t, 'a>(tokens: &'t [Token<'a>]) -> (&'t [Token<'a>], &'t [Token<'a>]) {
    let mut depth = 0;
    for (idx, token) in tokens.iter().enumerate() {
        if depth == 0 && is_ptr_op(token) {
            return tokens.split_at(idx);
        }
        depth += depth_delta(token);
    }
    (tokens, &[])
}

/// Remove top-level `&`/`&&`, reporting whether any were present
pub(crate) fn strip_references<'a>(tokens: &[Token<'a>]) -> (Vec<Token<'a>>, bool) {
    let mut depth = 0;
    let mut is_reference = false;
    let mut kept = Vec::with_capacity(tokens.len());
    for token in tokens {
        if depth == 0 && is_reference_op(token) {
            is_reference = true;
        } else {
            kept.push(*token);
        }
        depth += depth_delta(token);
    }
    (kept, is_reference)
}

/// Build a type reference from a base type, declarator tokens and suffix
pub(crate) fn type_ref(base: &str, own: &[Token<'_>], suffix: &str) -> TypeRef {
    let (own, is_reference) = strip_references(own);
    let mut text = join_type(base, &render(&own));
    if suffix.starts_with('(') && !text.is_empty() {
        text.push(' ');
    }
    text.push_str(suffix);
    TypeRef::new(text, is_reference)
}

/// Index of the `<` matching the `>` at `close`
fn matching_open_angle(tokens: &[Token<'_>], close: usize) -> Option<usize> {
    let mut depth = 0;
    for idx in (0..=close).rev() {
        let token = &tokens[idx];
        if token.is_punct(">") {
            depth += 1;
        } else if token.is_punct("<") {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Index of the closer matching the opener at `open`
fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let opener = tokens.get(open)?.lexeme;
    let closer = match opener {
        "(" => ")",
        "[" => "]",
        "{" => "}",
        "<" => ">",
        _ => return None,
    };
    let mut depth = 0;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct(opener) {
            depth += 1;
        } else if token.is_punct(closer) {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Pop trailing `A::B::` segments, returned outermost first.
///
/// Template arguments on a segment (`Box<T>::`) are dropped.
pub(crate) fn split_qualifier(tokens: &mut Vec<Token<'_>>) -> Vec<String> {
    let mut segments = Vec::new();
    while tokens.last().is_some_and(|t| t.is_punct("::")) {
        tokens.pop();
        if tokens.last().is_some_and(|t| t.is_punct(">")) {
            match matching_open_angle(tokens, tokens.len() - 1) {
                Some(open) => tokens.truncate(open),
                None => break,
            }
        }
        match tokens.last() {
            Some(token) if token.is_identifier() => {
                segments.push(token.lexeme.to_string());
                tokens.pop();
            }
            _ => break,
        }
    }
    segments.reverse();
    segments
}

/// Declaration head split into its parts
#[derive(Debug)]
pub(crate) struct NameParts<'a> {
    pub specifier: Vec<Token<'a>>,
    pub qualifier: Vec<String>,
    pub name: String,
    pub name_tok: Token<'a>,
}

/// Split `[type...] [A::]name` into its parts.
///
/// Returns `None` when the tokens do not end in a name.
pub(crate) fn split_name(mut tokens: Vec<Token<'_>>) -> Option<NameParts<'_>> {
    if tokens.last()?.is_punct(">") {
        let open = matching_open_angle(&tokens, tokens.len() - 1)?;
        if open == 0 || !tokens[open - 1].is_identifier() {
            return None;
        }
        tokens.truncate(open);
    }

    let name_tok = *tokens.last()?;
    if !name_tok.is_identifier() {
        return None;
    }
    tokens.pop();

    let mut name = name_tok.lexeme.to_string();
    if tokens.last().is_some_and(|t| t.is_punct("~")) {
        tokens.pop();
        name = format!("~{name}");
    }
    let qualifier = split_qualifier(&mut tokens);

    Some(NameParts {
        specifier: tokens,
        qualifier,
        name,
        name_tok,
    })
}

/// Whether the tokens before a candidate name actually name a type
fn carries_type(tokens: &[Token<'_>]) -> bool {
    tokens.iter().any(|t| {
        t.is_identifier()
            || t.is_punct(">")
            || (t.kind == TokenKind::Keyword && !is_qualifier_keyword(t.lexeme))
    })
}

/// Build one parameter from its tokens (default value included)
pub(crate) fn build_parameter(tokens: &[Token<'_>]) -> Option<Parameter> {
    let mut depth = 0;
    let mut end = tokens.len();
    for (idx, token) in tokens.iter().enumerate() {
        if depth == 0 && token.is_punct("=") {
            end = idx;
            break;
        }
        depth += depth_delta(token);
    }
    let decl = &tokens[..end];
    if decl.is_empty() {
        return None;
    }

    if decl.len() == 1 && decl[0].is_punct("...") {
        return Some(Parameter {
            type_text: "...".to_string(),
            is_reference: false,
            name: None,
        });
    }

    // Function pointer: void (*callback)(int)
    if let Some(open) = decl.iter().position(|t| t.is_punct("(")) {
        if decl.get(open + 1).is_some_and(is_ptr_op) {
            let close = matching_close(decl, open)?;
            let name_idx = (open + 1..close).rev().find(|&i| decl[i].is_identifier());
            let type_tokens: Vec<Token<'_>> = decl
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != name_idx)
                .map(|(_, t)| *t)
                .collect();
            let (base, rest) = type_tokens.split_at(open);
            let text = format!("{} {}", render(base), render(rest));
            return Some(Parameter {
                type_text: text.trim().to_string(),
                is_reference: false,
                name: name_idx.map(|i| decl[i].lexeme.to_string()),
            });
        }
    }

    let mut body = decl.to_vec();
    let mut suffix = String::new();
    while body.last().is_some_and(|t| t.is_punct("]")) {
        let close = body.len() - 1;
        let Some(open) = (0..close).rev().find(|&i| body[i].is_punct("[")) else {
            break;
        };
        suffix = format!("{}{suffix}", render(&body[open..]));
        body.truncate(open);
    }

    let mut name = None;
    if body.len() >= 2 {
        let last = body[body.len() - 1];
        let before = &body[..body.len() - 1];
        if last.is_identifier() && !before[before.len() - 1].is_punct("::") && carries_type(before)
        {
            name = Some(last.lexeme.to_string());
            body.pop();
        }
    }

    let (base, own) = split_base(&body);
    let ty = type_ref(&render(base), own, &suffix);
    Some(Parameter {
        type_text: ty.text,
        is_reference: ty.is_reference,
        name,
    })
}

/// Build the parameter list from the comma-separated token groups
pub(crate) fn build_parameters(groups: &[Vec<Token<'_>>]) -> Vec<Parameter> {
    if let [only] = groups {
        if only.len() == 1 && only[0].is_keyword("void") {
            return Vec::new();
        }
    }
    groups
        .iter()
        .filter_map(|group| build_parameter(group))
        .collect()
}
