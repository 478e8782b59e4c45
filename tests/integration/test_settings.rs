//! Settings files feeding discovery and parsing.

use crate::common::TestProject;
use lcdecl::config::{CONFIG_DIR, CONFIG_FILE};
use lcdecl::{BatchParser, FileWalker, LanguageStandard, Modifiers, Settings};
use std::sync::Arc;

const OVERRIDE_SOURCE: &str = "struct D : B {\n  void f() override;\n};\n";

#[test]
fn test_standard_from_settings_file_selects_keywords() {
    let project = TestProject::new();
    let config = project.add_file(
        "legacy.toml",
        "[parsing]\nstandard = \"c++98\"\n\n[batch]\nparallel_threads = 1\n",
    );
    let source = project.add_file("d.cpp", OVERRIDE_SOURCE);

    let legacy = Arc::new(Settings::load_from(&config).unwrap());
    assert_eq!(legacy.parsing.standard, LanguageStandard::Cxx98);
    let listing = BatchParser::new(legacy).parse_file(&source).unwrap();
    let f = listing.output.find("f").unwrap();
    assert!(!f.modifiers.contains(Modifiers::OVERRIDE));

    let modern = Arc::new(Settings::default());
    let listing = BatchParser::new(modern).parse_file(&source).unwrap();
    assert!(listing.output.find("f").unwrap().modifiers.contains(Modifiers::OVERRIDE));
}

#[test]
fn test_batch_settings_shape_discovery() {
    let project = TestProject::new();
    let config = project.add_file(
        "walk.toml",
        "[batch]\nextensions = [\"h\"]\nignore_patterns = [\"vendor/**\"]\n",
    );
    project.add_file("include/api.h", "void api(void);\n");
    project.add_file("src/impl.c", "void api(void) {}\n");
    project.add_file("vendor/dep.h", "int dep;\n");

    let settings = Arc::new(Settings::load_from(&config).unwrap());
    let walker = FileWalker::new(settings);
    let files = walker.walk(project.path()).unwrap();

    assert_eq!(files, vec![project.path().join("include/api.h")]);
    assert_eq!(walker.count_files(project.path()).unwrap(), 1);
}

#[test]
fn test_lcdeclignore_written_by_init_is_honored() {
    let project = TestProject::new();
    let config = Settings::init_config_file_in(project.path(), false).unwrap();
    assert_eq!(config, project.path().join(CONFIG_DIR).join(CONFIG_FILE));

    project.add_file("src/main.cpp", "int main();\n");
    project.add_file("third_party/lib.cpp", "int lib;\n");
    project.add_file("messages.pb.h", "int generated;\n");

    let settings = Arc::new(Settings::load_from(&config).unwrap());
    let files = FileWalker::new(settings).walk(project.path()).unwrap();
    assert_eq!(files, vec![project.path().join("src/main.cpp")]);

    assert_eq!(
        Settings::workspace_root_from(&project.path().join("src")).as_deref(),
        Some(project.path())
    );
}
