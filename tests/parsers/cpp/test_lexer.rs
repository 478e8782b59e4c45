//! Token stream through the public API: positions, keyword sets per
//! standard and the shape of the serialized tokens.

use lcdecl::{KeywordTable, LanguageStandard, Lexer, Token, TokenKind, tokenize};

fn kinds_of<'a>(tokens: &[Token<'a>]) -> Vec<(&'a str, TokenKind)> {
    tokens
        .iter()
        .filter(|t| !t.is_eof())
        .map(|t| (t.lexeme, t.kind))
        .collect()
}

#[test]
fn test_columns_count_characters_not_bytes() {
    let table = KeywordTable::for_standard(LanguageStandard::Cxx17);
    let tokens = tokenize("/* é */ int x;", &table);

    let int = tokens.iter().find(|t| t.lexeme == "int").unwrap();
    assert_eq!((int.line, int.column), (1, 9));
    let x = tokens.iter().find(|t| t.lexeme == "x").unwrap();
    assert_eq!((x.line, x.column), (1, 13));
}

#[test]
fn test_stream_ends_with_exactly_one_eof() {
    let table = KeywordTable::default();

    let tokens = tokenize("int a;\n\n", &table);
    assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
    let eof = tokens.last().unwrap();
    assert!(eof.is_eof());
    assert_eq!((eof.line, eof.column), (3, 1));

    let empty = tokenize("", &table);
    assert_eq!(empty.len(), 1);
    assert_eq!((empty[0].line, empty[0].column), (1, 1));
}

#[test]
fn test_keyword_sets_follow_the_standard() {
    let source = "class override requires _Bool";
    let classify = |standard| {
        let table = KeywordTable::for_standard(standard);
        tokenize(source, &table)
            .iter()
            .filter(|t| !t.is_eof())
            .map(|t| t.kind == TokenKind::Keyword)
            .collect::<Vec<_>>()
    };

    assert_eq!(classify(LanguageStandard::C89), vec![false, false, false, false]);
    assert_eq!(classify(LanguageStandard::C99), vec![false, false, false, true]);
    assert_eq!(classify(LanguageStandard::Cxx98), vec![true, false, false, false]);
    assert_eq!(classify(LanguageStandard::Cxx11), vec![true, true, false, false]);
    assert_eq!(classify(LanguageStandard::Cxx20), vec![true, true, true, false]);
}

#[test]
fn test_extra_keywords() {
    let table = KeywordTable::for_standard(LanguageStandard::Cxx17).with_extra(["__forceinline"]);
    let tokens = tokenize("__forceinline int f();", &table);
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(table.standard(), LanguageStandard::Cxx17);
}

#[test]
fn test_operator_tokens() {
    let table = KeywordTable::default();
    let tokens = tokenize("int&& r = a << b >> c;", &table);
    let lexemes: Vec<_> = tokens.iter().filter(|t| !t.is_eof()).map(|t| t.lexeme).collect();
    assert_eq!(
        lexemes,
        vec!["int", "&&", "r", "=", "a", "<<", "b", ">", ">", "c", ";"]
    );
}

#[test]
fn test_comment_markers_inside_literals() {
    let table = KeywordTable::default();
    let tokens = tokenize("s = \"// not a comment\"; int x; /* c */", &table);
    assert_eq!(
        kinds_of(&tokens),
        vec![
            ("s", TokenKind::Identifier),
            ("=", TokenKind::Punctuation),
            ("\"// not a comment\"", TokenKind::Literal),
            (";", TokenKind::Punctuation),
            ("int", TokenKind::Keyword),
            ("x", TokenKind::Identifier),
            (";", TokenKind::Punctuation),
            ("/* c */", TokenKind::Comment),
        ]
    );
}

#[test]
fn test_lexer_is_lazy_and_can_skip_trivia() {
    let table = KeywordTable::default();
    let source = "#pragma once\n// note\nstruct S;\n";

    let first: Vec<_> = Lexer::new(source, &table).take(2).collect();
    assert_eq!(first[0].kind, TokenKind::Directive);
    assert_eq!(first[1].kind, TokenKind::Comment);

    let code: Vec<_> = Lexer::new(source, &table).skip_trivia(true).collect();
    assert_eq!(code[0].lexeme, "struct");
    assert_eq!(code[0].line, 3);
    assert_eq!(code.len(), 4);
}

#[test]
fn test_unknown_characters_are_tokens() {
    let table = KeywordTable::default();
    let tokens = tokenize("int a` $b;", &table);
    let unknown: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Unknown)
        .map(|t| (t.lexeme, t.column))
        .collect();
    assert_eq!(unknown, vec![("`", 6), ("$", 8)]);
}

#[test]
fn test_token_serializes_with_position() {
    let table = KeywordTable::default();
    let tokens = tokenize("\n  virtual", &table);
    let value = serde_json::to_value(tokens[0]).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "kind": "Keyword",
            "lexeme": "virtual",
            "line": 2,
            "column": 3,
        })
    );
}
