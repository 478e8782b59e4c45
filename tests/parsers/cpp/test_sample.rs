//! Declarations extracted from the sample fixture: classes, inheritance,
//! overloads, references and inline member bodies.

use crate::common::{member, members, parse_fixture, top_level};
use lcdecl::{AccessLevel, BaseClass, DeclarationKind, LanguageStandard, Modifiers, TypeRef};

fn sample() -> lcdecl::ParseOutput {
    parse_fixture("sample.cpp", LanguageStandard::Cxx17)
}

#[test]
fn test_sample_parses_without_diagnostics() {
    let output = sample();
    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);

    let classes: Vec<_> = output
        .of_kind(DeclarationKind::Class)
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(
        classes,
        vec!["Point", "Shape", "Circle", "Printable", "Serializable", "Inline"]
    );
    assert_eq!(output.of_kind(DeclarationKind::Struct).count(), 1);
}

#[test]
fn test_point_members() {
    let output = sample();
    let point = top_level(&output, DeclarationKind::Class, "Point");
    assert_eq!((point.line, point.column), (4, 7));
    assert!(point.is_definition);

    for field in ["x", "y"] {
        let record = member(&output, "Point", field);
        assert_eq!(record.kind, DeclarationKind::Variable);
        assert_eq!(record.access, AccessLevel::Private);
        assert_eq!(record.value_type, Some(TypeRef::new("int", false)));
    }

    let ctors: Vec<_> = members(&output, "Point", "Point");
    assert_eq!(ctors.len(), 1);
    assert_eq!(ctors[0].access, AccessLevel::Public);
    assert_eq!(ctors[0].return_type, None);
    assert_eq!(ctors[0].parameters.len(), 2);
    assert_eq!(ctors[0].parameters[1].name.as_deref(), Some("y"));

    let dtor = member(&output, "Point", "~Point");
    assert_eq!(dtor.kind, DeclarationKind::Function);
    assert_eq!(dtor.return_type, None);

    let get_x = member(&output, "Point", "getX");
    assert_eq!(get_x.return_type, Some(TypeRef::new("int", false)));
    assert!(!get_x.is_definition);
}

#[test]
fn test_pure_virtual_and_plain_override() {
    let output = sample();
    let shape_draw = member(&output, "Shape", "draw");
    assert!(shape_draw.is_virtual());
    assert!(shape_draw.is_pure_virtual());

    let shape_dtor = member(&output, "Shape", "~Shape");
    assert!(shape_dtor.is_virtual());
    assert!(!shape_dtor.is_pure_virtual());

    let circle_draws = members(&output, "Circle", "draw");
    assert_eq!(circle_draws.len(), 2);
    assert!(circle_draws.iter().all(|d| !d.is_pure_virtual()));
    assert!(circle_draws.iter().all(|d| !d.is_virtual()));
}

#[test]
fn test_overloads_are_distinct_records() {
    let output = sample();
    let draws = members(&output, "Circle", "draw");
    let arity: Vec<_> = draws.iter().map(|d| d.parameters.len()).collect();
    assert_eq!(arity, vec![0, 1]);
    assert_eq!(draws[1].parameters[0].type_text, "int");
    assert_eq!(draws[1].parameters[0].name.as_deref(), Some("color"));
    assert_ne!(draws[0].line, draws[1].line);
}

#[test]
fn test_single_and_multiple_inheritance() {
    let output = sample();
    let circle = top_level(&output, DeclarationKind::Class, "Circle");
    assert_eq!(
        circle.bases,
        vec![BaseClass {
            name: "Shape".to_string(),
            access: AccessLevel::Public,
            is_virtual: false,
        }]
    );
    assert_eq!(member(&output, "Circle", "radius").access, AccessLevel::Private);

    let document = top_level(&output, DeclarationKind::Struct, "Document");
    assert_eq!(
        document.bases,
        vec![
            BaseClass {
                name: "Printable".to_string(),
                access: AccessLevel::Public,
                is_virtual: false,
            },
            BaseClass {
                name: "Serializable".to_string(),
                access: AccessLevel::Private,
                is_virtual: false,
            },
        ]
    );
    assert_eq!(member(&output, "Document", "print").access, AccessLevel::Public);
    assert!(member(&output, "Printable", "print").is_virtual());
}

#[test]
fn test_reference_parameter_and_return() {
    let output = sample();

    let process = top_level(&output, DeclarationKind::Function, "processPoint");
    assert_eq!(process.access, AccessLevel::Unspecified);
    assert_eq!(process.return_type, Some(TypeRef::new("void", false)));
    assert_eq!(process.parameters.len(), 1);
    assert_eq!(process.parameters[0].type_text, "Point");
    assert!(process.parameters[0].is_reference);
    assert_eq!(process.parameters[0].name.as_deref(), Some("p"));

    let global = top_level(&output, DeclarationKind::Function, "getGlobalPoint");
    assert_eq!(global.return_type, Some(TypeRef::new("Point", true)));
    assert!(global.parameters.is_empty());
}

#[test]
fn test_inline_bodies_have_declaration_shape() {
    let output = sample();

    let ctor = member(&output, "Inline", "Inline");
    assert!(ctor.is_definition);
    assert_eq!(ctor.return_type, None);
    assert_eq!(ctor.access, AccessLevel::Public);

    let set_x = member(&output, "Inline", "setX");
    assert!(set_x.is_definition);
    assert_eq!(set_x.parameters[0].name.as_deref(), Some("val"));
    assert_eq!(set_x.return_type, Some(TypeRef::new("void", false)));

    let point_set_x = member(&output, "Point", "setX");
    assert_eq!(point_set_x.parameters.len(), set_x.parameters.len());
    assert_eq!(point_set_x.return_type, set_x.return_type);
    assert!(!point_set_x.is_definition);

    // Body statements are never mistaken for members
    assert_eq!(members(&output, "Inline", "x").len(), 1);
    assert!(member(&output, "Inline", "getX").modifiers.is_empty());
    assert_eq!(
        output
            .declarations
            .iter()
            .filter(|d| d.modifiers.contains(Modifiers::PURE_VIRTUAL))
            .count(),
        1
    );
}
