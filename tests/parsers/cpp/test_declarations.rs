//! Declaration forms beyond the fixtures: namespaces, templates, enums,
//! operators, specifiers and out-of-line definitions.

use crate::common::{member, top_level};
use lcdecl::{
    CppParser, DeclarationKind, KeywordTable, LanguageStandard, Modifiers, ParseOutput, TypeRef,
    parse_source,
};

fn parse(code: &str) -> ParseOutput {
    let output = parse_source(code, LanguageStandard::Cxx20);
    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    output
}

#[test]
fn test_namespaces_give_scope_paths() {
    let output = parse(
        "namespace geo::detail {\n  void f();\n}\nnamespace {\n  int hidden;\n}\nnamespace fs = std::filesystem;\n",
    );

    let ns = top_level(&output, DeclarationKind::Namespace, "geo::detail");
    assert!(ns.is_definition);
    assert_eq!(member(&output, "detail", "f").qualified_name(), "geo::detail::f");

    assert!(output.find("(anonymous)").is_some());
    assert!(output.find("hidden").unwrap().scope.is_empty());
    assert!(output.find("fs").is_none());
}

#[test]
fn test_templates_mark_the_following_declaration() {
    let output = parse(
        "template <typename T>\nT max_of(T a, T b);\ntemplate <>\nstruct Hash<int> {\n  unsigned long operator()(int v) const;\n};\nint plain();\n",
    );

    let max_of = output.find("max_of").unwrap();
    assert!(max_of.modifiers.contains(Modifiers::TEMPLATE));
    assert_eq!(max_of.parameters.len(), 2);

    let hash = top_level(&output, DeclarationKind::Struct, "Hash");
    assert!(hash.modifiers.contains(Modifiers::TEMPLATE));
    assert_eq!(member(&output, "Hash", "operator()").modifiers, Modifiers::CONST);
    assert!(output.find("plain").unwrap().modifiers.is_empty());
}

#[test]
fn test_aliases_and_typedefs_are_skipped() {
    let output = parse("using Alias = int;\ntypedef unsigned long size_type;\nusing namespace std;\nint kept;\n");
    assert_eq!(output.declarations.len(), 1);
    assert_eq!(output.declarations[0].name, "kept");
}

#[test]
fn test_storage_and_constexpr_specifiers() {
    let output = parse(
        "struct Config {\n  static constexpr int limit = 4;\n  inline static int count = 0;\n  mutable int cache;\n};\nextern int counter;\n",
    );

    assert_eq!(
        member(&output, "Config", "limit").modifiers,
        Modifiers::STATIC | Modifiers::CONSTEXPR
    );
    assert_eq!(
        member(&output, "Config", "count").modifiers,
        Modifiers::STATIC | Modifiers::INLINE
    );
    assert_eq!(member(&output, "Config", "cache").modifiers, Modifiers::MUTABLE);
    assert!(output.find("counter").unwrap().modifiers.contains(Modifiers::EXTERN));
}

#[test]
fn test_special_members() {
    let output = parse(
        "struct M {\n  M() = default;\n  M(const M&) = delete;\n  virtual ~M() noexcept;\n  auto area() const -> double;\n};\n",
    );

    let ctors: Vec<_> = output
        .declarations
        .iter()
        .filter(|d| d.name == "M" && d.kind == DeclarationKind::Function)
        .collect();
    assert_eq!(ctors.len(), 2);
    assert!(ctors[0].modifiers.contains(Modifiers::DEFAULTED));
    assert!(ctors[1].modifiers.contains(Modifiers::DELETED));
    assert_eq!(ctors[1].parameters[0].type_text, "const M");
    assert!(ctors[1].parameters[0].is_reference);
    assert_eq!(ctors[1].parameters[0].name, None);

    let dtor = member(&output, "M", "~M");
    assert!(dtor.modifiers.contains(Modifiers::VIRTUAL | Modifiers::NOEXCEPT));

    let area = member(&output, "M", "area");
    assert_eq!(area.return_type, Some(TypeRef::new("double", false)));
    assert!(area.modifiers.contains(Modifiers::CONST));
}

#[test]
fn test_stream_operator_returns_reference() {
    let output = parse("std::ostream& operator<<(std::ostream& os, const V& v);\n");
    let op = output.find("operator<<").unwrap();
    assert_eq!(op.return_type, Some(TypeRef::new("std::ostream", true)));
    assert_eq!(op.parameters.len(), 2);
    assert!(op.parameters.iter().all(|p| p.is_reference));
}

#[test]
fn test_enums() {
    let output = parse("enum Color { Red, Green };\nenum class Mode : int;\n");

    let color = top_level(&output, DeclarationKind::Enum, "Color");
    assert!(color.is_definition);
    let mode = top_level(&output, DeclarationKind::Enum, "Mode");
    assert!(!mode.is_definition);
    // Enumerators are not declarations of their own
    assert_eq!(output.declarations.len(), 2);
}

#[test]
fn test_out_of_line_destructor_and_initialized_array() {
    let output = parse("Point::~Point() {}\nint values[3] = {1, 2, 3};\n");

    let dtor = output.find("~Point").unwrap();
    assert_eq!(dtor.scope, vec!["Point"]);
    assert!(dtor.is_definition);
    assert_eq!(dtor.return_type, None);

    let values = output.find("values").unwrap();
    assert_eq!(values.value_type, Some(TypeRef::new("int[3]", false)));
}

#[test]
fn test_attributes_are_ignored() {
    let output = parse("[[nodiscard]] int compute();\nstruct [[deprecated]] Old { };\n");
    assert_eq!(output.find("compute").unwrap().kind, DeclarationKind::Function);
    assert_eq!(top_level(&output, DeclarationKind::Struct, "Old").name, "Old");
}

#[test]
fn test_signature_rendering() {
    let output = parse("void processPoint(Point& p);\nstruct D : public virtual B { };\n");
    assert_eq!(
        output.find("processPoint").unwrap().signature(),
        "void processPoint(Point& p)"
    );
    assert_eq!(
        output.find("D").unwrap().signature(),
        "struct D : public virtual B"
    );
}

#[test]
fn test_typedef_struct_records_the_definition() {
    let output = parse_source(
        "typedef struct Node {\n  int v;\n  struct Node* next;\n} Node;\nint after;\n",
        LanguageStandard::C11,
    );
    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);

    let names: Vec<_> = output.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Node", "v", "next", "after"]);

    let node = top_level(&output, DeclarationKind::Struct, "Node");
    assert!(node.is_definition);
    assert_eq!(member(&output, "Node", "v").kind, DeclarationKind::Variable);
    let next = member(&output, "Node", "next");
    assert_eq!(next.value_type, Some(TypeRef::new("struct Node*", false)));
    // The alias after the body is not a variable
    assert_eq!(output.of_kind(DeclarationKind::Variable).count(), 3);
}

#[test]
fn test_typedef_aggregates_in_cpp() {
    let output = parse(
        "typedef struct Point { int x; } Point_t, *PointPtr;\ntypedef enum { Red, Green } Color;\ntypedef union { int i; float f; } Cell;\ntypedef struct Point Alias;\n",
    );

    let names: Vec<_> = output.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Point", "x", "(anonymous)", "(anonymous)", "i", "f"]);
    assert_eq!(member(&output, "Point", "x").access, lcdecl::AccessLevel::Public);
    assert_eq!(output.of_kind(DeclarationKind::Enum).count(), 1);
    assert_eq!(output.of_kind(DeclarationKind::Union).count(), 1);
    assert!(output.find("Point_t").is_none());
    assert!(output.find("Color").is_none());
}

#[test]
fn test_extra_keywords_are_ignored_in_declarations() {
    let code = "__forceinline int fast(int a);\nint after;\n";
    let plain = CppParser::new(LanguageStandard::Cxx17).parse(code);
    let table = KeywordTable::for_standard(LanguageStandard::Cxx17).with_extra(["__forceinline", "__declspec"]);
    let parser = CppParser::with_keywords(table);
    let extended = parser.parse(code);

    assert!(extended.diagnostics.is_empty(), "{:#?}", extended.diagnostics);
    let shape = |output: &ParseOutput| {
        output
            .declarations
            .iter()
            .map(|d| (d.kind, d.name.clone(), d.parameters.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&extended), shape(&plain));

    let fast = extended.find("fast").unwrap();
    assert_eq!(fast.return_type, Some(TypeRef::new("int", false)));

    let exported = parser.parse("__declspec(dllexport) void exported(int a) __forceinline;\n");
    assert!(exported.diagnostics.is_empty(), "{:#?}", exported.diagnostics);
    let exported = exported.find("exported").unwrap();
    assert_eq!(exported.kind, DeclarationKind::Function);
    assert_eq!(exported.return_type, Some(TypeRef::new("void", false)));
}
