//! Malformed input: every anomaly becomes a diagnostic, and declarations
//! around the damage are still extracted.

use lcdecl::{CppParser, DiagnosticKind, LanguageParser, LanguageStandard, Severity, parse_source};

fn parse(code: &str) -> lcdecl::ParseOutput {
    parse_source(code, LanguageStandard::Cxx17)
}

fn names(output: &lcdecl::ParseOutput) -> Vec<&str> {
    output.declarations.iter().map(|d| d.name.as_str()).collect()
}

#[test]
fn test_nested_unterminated_scopes_each_report_their_brace() {
    let output = parse("namespace app {\nclass Broken {\n  int x;\n");

    assert_eq!(names(&output), vec!["app", "Broken", "x"]);
    assert_eq!(output.find("x").unwrap().scope, vec!["app", "Broken"]);

    let positions: Vec<_> = output
        .errors()
        .map(|d| (d.kind, d.line, d.column))
        .collect();
    assert_eq!(
        positions,
        vec![
            (DiagnosticKind::StructuralImbalance, 1, 15),
            (DiagnosticKind::StructuralImbalance, 2, 14),
        ]
    );
}

#[test]
fn test_unclosed_parameter_list_is_skipped() {
    let output = parse("void f(int a;\nint g();\n");

    assert_eq!(names(&output), vec!["g"]);
    let errors: Vec<_> = output.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, DiagnosticKind::StructuralImbalance);
    assert_eq!((errors[0].line, errors[0].column), (1, 7));
}

#[test]
fn test_brace_block_at_namespace_scope() {
    let output = parse("{ int hidden; }\nint shown;\n");

    assert_eq!(names(&output), vec!["shown"]);
    let errors: Vec<_> = output.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, DiagnosticKind::SyntaxAnomaly);
    assert_eq!((errors[0].line, errors[0].column), (1, 1));
}

#[test]
fn test_pure_specifier_outside_a_class() {
    let output = parse("void f() = 0;\n");

    let f = output.find("f").unwrap();
    assert!(!f.is_pure_virtual());

    assert_eq!(output.diagnostics.len(), 1);
    let diag = &output.diagnostics[0];
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.kind, DiagnosticKind::SyntaxAnomaly);
    assert_eq!((diag.line, diag.column), (1, 12));
}

#[test]
fn test_lexical_anomalies_are_warnings() {
    let output = parse("int a;\nint b `;\n/* never closed\nint c;\n");

    assert_eq!(names(&output), vec!["a", "b"]);
    assert!(!output.has_errors());

    let warnings: Vec<_> = output.warnings().collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|d| d.kind == DiagnosticKind::LexicalAnomaly));
    assert_eq!((warnings[0].line, warnings[0].column), (2, 7));
    assert_eq!((warnings[1].line, warnings[1].column), (3, 1));
}

#[test]
fn test_diagnostics_are_ordered_by_position() {
    let output = parse("int tail @;\nclass A {\n  int 42 bad;\n  void ok();\n};\n}\n");

    assert!(output.has_errors());
    assert!(output.find("ok").is_some());
    assert!(
        output
            .diagnostics
            .windows(2)
            .all(|pair| (pair[0].line, pair[0].column) <= (pair[1].line, pair[1].column))
    );

    let first = &output.diagnostics[0];
    assert_eq!(first.kind, DiagnosticKind::LexicalAnomaly);
    assert_eq!(first.line, 1);

    let last = output.diagnostics.last().unwrap();
    assert_eq!(last.kind, DiagnosticKind::StructuralImbalance);
    assert_eq!((last.line, last.column), (6, 1));
}

#[test]
fn test_parser_carries_no_state_between_inputs() {
    let parser = CppParser::new(LanguageStandard::Cxx17);

    let broken = parser.parse("class Open {\n  int a;\n");
    assert!(broken.has_errors());

    let clean = parser.parse("int top;\n");
    assert!(clean.diagnostics.is_empty());
    assert!(clean.find("top").unwrap().scope.is_empty());

    let mut boxed: Box<dyn LanguageParser> = Box::new(parser);
    assert_eq!(boxed.standard(), LanguageStandard::Cxx17);
    assert_eq!(boxed.parse("int top;\n"), clean);
}
