//! Keyword recognition fixture: access specifiers, struct defaults, virtual
//! inheritance, explicit constructors and friends, across standards.

use crate::common::{member, parse_fixture, top_level};
use lcdecl::{
    AccessLevel, BaseClass, DeclarationKind, LanguageStandard, Modifiers, TypeRef, parse_source,
};

#[test]
fn test_access_cursor_follows_specifiers() {
    let output = parse_fixture("keywords.cpp", LanguageStandard::Cxx11);
    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);

    assert_eq!(member(&output, "MyClass", "x").access, AccessLevel::Public);
    assert_eq!(member(&output, "MyClass", "y").access, AccessLevel::Private);
    assert_eq!(member(&output, "MyClass", "z").access, AccessLevel::Protected);
}

#[test]
fn test_struct_and_class_defaults() {
    let output = parse_fixture("keywords.cpp", LanguageStandard::Cxx11);

    assert_eq!(member(&output, "MyStruct", "a").access, AccessLevel::Public);
    assert_eq!(member(&output, "MyStruct", "b").access, AccessLevel::Private);
    assert_eq!(member(&output, "MyStruct", "c").access, AccessLevel::Public);

    // `secret` follows two friend declarations and an explicit `private:`
    assert_eq!(member(&output, "A", "secret").access, AccessLevel::Private);

    let defaults = parse_source("class C { int hidden; };\nstruct S { int shown; };", LanguageStandard::Cxx17);
    assert_eq!(member(&defaults, "C", "hidden").access, AccessLevel::Private);
    assert_eq!(member(&defaults, "S", "shown").access, AccessLevel::Public);
}

#[test]
fn test_virtual_inheritance_in_both_orders() {
    let expected = vec![BaseClass {
        name: "Base".to_string(),
        access: AccessLevel::Public,
        is_virtual: true,
    }];

    let output = parse_fixture("keywords.cpp", LanguageStandard::Cxx11);
    let derived = top_level(&output, DeclarationKind::Class, "Derived");
    assert_eq!(derived.bases, expected);

    let swapped = parse_source(
        "class Base {};\nclass Derived : virtual public Base {};",
        LanguageStandard::Cxx11,
    );
    assert_eq!(top_level(&swapped, DeclarationKind::Class, "Derived").bases, expected);
}

#[test]
fn test_base_access_defaults_follow_aggregate_kind() {
    let output = parse_source(
        "class B {};\nclass C : B {};\nstruct S : B {};\nclass V : virtual B {};",
        LanguageStandard::Cxx17,
    );
    let access = |kind, name| top_level(&output, kind, name).bases[0].access;
    assert_eq!(access(DeclarationKind::Class, "C"), AccessLevel::Private);
    assert_eq!(access(DeclarationKind::Struct, "S"), AccessLevel::Public);

    let v = &top_level(&output, DeclarationKind::Class, "V").bases[0];
    assert!(v.is_virtual);
    assert_eq!(v.access, AccessLevel::Private);
}

#[test]
fn test_explicit_constructor() {
    let output = parse_fixture("keywords.cpp", LanguageStandard::Cxx11);
    let ctor = member(&output, "Widget", "Widget");
    assert!(ctor.modifiers.contains(Modifiers::EXPLICIT));
    assert_eq!(ctor.return_type, None);
    assert_eq!(ctor.parameters[0].type_text, "int");
    assert_eq!(ctor.parameters[0].name.as_deref(), Some("size"));
}

#[test]
fn test_friend_declarations() {
    let output = parse_fixture("keywords.cpp", LanguageStandard::Cxx11);
    let friends: Vec<_> = output.of_kind(DeclarationKind::FriendDeclaration).collect();
    assert_eq!(friends.len(), 2);

    assert_eq!(friends[0].name, "B");
    assert_eq!(friends[1].name, "helper");
    for friend in &friends {
        assert_eq!(friend.access, AccessLevel::Unspecified);
        assert_eq!(friend.scope, vec!["A"]);
        assert!(friend.modifiers.contains(Modifiers::FRIEND));
    }
    assert_eq!(friends[1].return_type, Some(TypeRef::new("void", false)));

    // The befriended class is never declared; no class record is invented
    assert!(
        !output
            .of_kind(DeclarationKind::Class)
            .any(|d| d.name == "B")
    );
}

#[test]
fn test_friend_does_not_move_access_cursor() {
    let output = parse_source(
        "class K {\npublic:\n  friend class F;\n  int a;\nprotected:\n  friend void g(K& k);\n  int b;\n};",
        LanguageStandard::Cxx17,
    );
    assert_eq!(member(&output, "K", "a").access, AccessLevel::Public);
    assert_eq!(member(&output, "K", "b").access, AccessLevel::Protected);
    let g = member(&output, "K", "g");
    assert_eq!(g.kind, DeclarationKind::FriendDeclaration);
    assert!(g.parameters[0].is_reference);
}

#[test]
fn test_reference_free_functions() {
    let output = parse_fixture("keywords.cpp", LanguageStandard::Cxx11);
    let func = top_level(&output, DeclarationKind::Function, "func");
    assert_eq!(func.parameters[0].type_text, "int");
    assert!(func.parameters[0].is_reference);
    assert_eq!(func.scope, Vec::<String>::new());

    let get_ref = top_level(&output, DeclarationKind::Function, "getRef");
    assert_eq!(get_ref.return_type, Some(TypeRef::new("int", true)));
}

#[test]
fn test_fixture_is_stable_across_cpp_standards() {
    let reference = parse_fixture("keywords.cpp", LanguageStandard::Cxx98);
    for standard in [
        LanguageStandard::Cxx03,
        LanguageStandard::Cxx11,
        LanguageStandard::Cxx17,
        LanguageStandard::Cxx23,
    ] {
        assert_eq!(parse_fixture("keywords.cpp", standard), reference, "{standard}");
    }
}

#[test]
fn test_override_keyword_depends_on_standard() {
    let code = "struct D : B {\n  void f() override;\n  int override;\n};";

    let modern = parse_source(code, LanguageStandard::Cxx11);
    let f = member(&modern, "D", "f");
    assert!(f.modifiers.contains(Modifiers::OVERRIDE));

    let legacy = parse_source("struct D : B {\n  int override;\n};", LanguageStandard::Cxx98);
    let field = member(&legacy, "D", "override");
    assert_eq!(field.kind, DeclarationKind::Variable);
    assert!(legacy.diagnostics.is_empty());
}

#[test]
fn test_c_standard_produces_no_class_records() {
    let output = parse_fixture("keywords.cpp", LanguageStandard::C11);
    assert_eq!(output.of_kind(DeclarationKind::Class).count(), 0);
    assert!(
        output
            .of_kind(DeclarationKind::Struct)
            .any(|d| d.name == "MyStruct")
    );
    let func = top_level(&output, DeclarationKind::Function, "func");
    assert!(func.parameters[0].is_reference);
}
