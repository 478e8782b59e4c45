//! Directory listing end to end: discovery, parallel parsing and the
//! isolation of failing files.

use crate::common::TestProject;
use lcdecl::indexing::BatchSummary;
use lcdecl::{
    BatchParser, DeclarationKind, FileWalker, IndexError, ParseError, Settings,
};
use std::path::PathBuf;
use std::sync::Arc;

fn settings() -> Arc<Settings> {
    let mut settings = Settings::default();
    settings.batch.parallel_threads = 2;
    Arc::new(settings)
}

fn relative(project: &TestProject, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(project.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_list_directory_end_to_end() {
    let project = TestProject::new();
    project.add_file("src/shapes.hpp", "class Shape {\npublic:\n  virtual void draw() = 0;\n};\n");
    project.add_file("src/util.c", "int clamp(int v, int lo, int hi);\n");
    project.add_file("build/generated.cpp", "int generated;\n");
    project.add_file("notes.txt", "int not_code;\n");
    project.add_file(".cache/hidden.cpp", "int hidden;\n");

    let settings = settings();
    let files = FileWalker::new(settings.clone())
        .collect(&[project.path().to_path_buf()])
        .unwrap();
    assert_eq!(relative(&project, &files), vec!["src/shapes.hpp", "src/util.c"]);

    let results = BatchParser::new(settings).parse_files(&files);
    let listings: Vec<_> = results.iter().map(|r| r.as_ref().unwrap()).collect();

    assert_eq!(listings[0].declaration_count(), 2);
    assert!(listings[0].output.find("draw").unwrap().is_pure_virtual());
    assert_eq!(listings[1].output.find("clamp").unwrap().parameters.len(), 3);

    let summary = BatchSummary::from_results(&results);
    assert_eq!(
        summary,
        BatchSummary {
            files: 2,
            declarations: 3,
            errors: 0,
            warnings: 0,
            failures: 0,
        }
    );
}

#[test]
fn test_failures_stay_with_their_file() {
    let project = TestProject::new();
    let good = project.add_file("good.cpp", "struct Ok { int v; };\n");
    let binary = project.add_file("binary.cpp", b"int \xff\xfe x;\n".as_slice());
    let broken = project.add_file("broken.cpp", "class Broken {\n  int kept;\n");
    let missing = project.path().join("missing.cpp");

    let inputs = vec![good.clone(), binary, broken, missing.clone()];
    let results = BatchParser::new(settings()).parse_files(&inputs);
    assert_eq!(results.len(), 4);

    let first = results[0].as_ref().unwrap();
    assert_eq!(first.path, good);
    assert!(first.output.diagnostics.is_empty());

    assert!(matches!(
        &results[1],
        Err(IndexError::Parse(ParseError::InvalidUtf8 { offset: 4, .. }))
    ));

    let third = results[2].as_ref().unwrap();
    assert_eq!(third.error_count(), 1);
    assert!(third.output.find("kept").is_some());

    match &results[3] {
        Err(IndexError::FileRead { path, .. }) => assert_eq!(path, &missing),
        other => panic!("expected a read failure, got {other:?}"),
    }

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.failures, 2);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.declarations, 4);
}

#[test]
fn test_kind_filter_keeps_diagnostics() {
    let project = TestProject::new();
    let path = project.add_file(
        "mixed.cpp",
        "class A { int a; };\nstruct B { void b(); };\nint free_fn();\nint @stray;\n",
    );

    let listing = BatchParser::new(settings())
        .with_kinds(vec![DeclarationKind::Class, DeclarationKind::Struct])
        .parse_file(&path)
        .unwrap();

    let names: Vec<_> = listing
        .output
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(listing.warning_count(), 1);
}

#[test]
fn test_explicit_inputs_are_deduplicated_in_order() {
    let project = TestProject::new();
    let header = project.add_file("lib/api.h", "void api(void);\n");
    let script = project.add_file("tools/gen.inc", "int table[2];\n");

    let files = FileWalker::new(settings())
        .collect(&[script.clone(), project.path().join("lib"), header.clone()])
        .unwrap();
    assert_eq!(files, vec![script, header]);

    let missing = FileWalker::new(settings()).collect(&[project.path().join("nope")]);
    assert!(matches!(missing, Err(IndexError::PathNotFound { .. })));
}

#[test]
fn test_listing_serializes_flat() {
    let project = TestProject::new();
    let path = project.add_file("one.cpp", "int one;\n");

    let listing = BatchParser::new(settings()).parse_file(&path).unwrap();
    let value = serde_json::to_value(&listing).unwrap();

    assert_eq!(value["declarations"][0]["name"], "one");
    assert!(value["diagnostics"].as_array().unwrap().is_empty());
    assert!(value["path"].as_str().unwrap().ends_with("one.cpp"));
}
