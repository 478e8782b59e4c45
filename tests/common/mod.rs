#![allow(dead_code)]

use lcdecl::{DeclarationKind, DeclarationRecord, LanguageStandard, ParseOutput, parse_source};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/cpp")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("Failed to read fixture")
}

pub fn parse_fixture(name: &str, standard: LanguageStandard) -> ParseOutput {
    parse_source(&fixture(name), standard)
}

/// The declaration named `name` directly inside `scope`
pub fn member<'a>(output: &'a ParseOutput, scope: &str, name: &str) -> &'a DeclarationRecord {
    output
        .declarations
        .iter()
        .find(|d| d.name == name && d.scope.last().map(String::as_str) == Some(scope))
        .unwrap_or_else(|| panic!("no member {scope}::{name} in {:#?}", output.declarations))
}

pub fn members<'a>(
    output: &'a ParseOutput,
    scope: &str,
    name: &str,
) -> Vec<&'a DeclarationRecord> {
    output
        .declarations
        .iter()
        .filter(|d| d.name == name && d.scope.last().map(String::as_str) == Some(scope))
        .collect()
}

pub fn top_level<'a>(output: &'a ParseOutput, kind: DeclarationKind, name: &str) -> &'a DeclarationRecord {
    output
        .declarations
        .iter()
        .find(|d| d.kind == kind && d.name == name && d.scope.is_empty())
        .unwrap_or_else(|| panic!("no top-level {kind} {name}"))
}
