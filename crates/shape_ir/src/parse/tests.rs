use super::*;
use crate::Name;
use pretty_assertions::assert_eq;

fn registry_with_outer() -> (ClassRegistry, ClassId) {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let outer = registry
        .register_class("org.example", "Outer", &["K", "V"])
        .expect("should register");
    (registry, outer)
}

fn var(registry: &ClassRegistry, name: &str) -> TypeExpr {
    TypeExpr::Var(registry.lookup_name(name).unwrap_or(Name::EMPTY))
}

fn class(registry: &ClassRegistry, name: &str) -> ClassId {
    registry.class_by_name(name).expect("class should exist")
}

#[test]
fn parses_plain_class() {
    let (registry, _) = registry_with_outer();
    let ty = registry.parse_type(None, "java.lang.String").expect("should parse");
    assert_eq!(ty, TypeExpr::Class(class(&registry, "String")));
}

#[test]
fn parses_owner_type_parameter() {
    let (registry, outer) = registry_with_outer();
    let ty = registry.parse_type(Some(outer), " K ").expect("should parse");
    assert_eq!(ty, var(&registry, "K"));
}

#[test]
fn type_parameter_needs_owner() {
    let (registry, _) = registry_with_outer();
    let err = registry.parse_type(None, "K").expect_err("K is not a class");
    assert!(matches!(err, SchemaError::Syntax { position: 0, .. }));
}

#[test]
fn parses_nested_parameterized() {
    let (registry, outer) = registry_with_outer();
    let ty = registry
        .parse_type(Some(outer), "Map<K, List<V>>")
        .expect("should parse");

    let expected = TypeExpr::parameterized(
        class(&registry, "Map"),
        vec![
            var(&registry, "K"),
            TypeExpr::parameterized(class(&registry, "List"), vec![var(&registry, "V")]),
        ],
    );
    assert_eq!(ty, expected);
}

#[test]
fn parses_wildcards_and_arrays() {
    let (registry, outer) = registry_with_outer();
    let list = class(&registry, "List");

    let ty = registry.parse_type(Some(outer), "List<?>").expect("should parse");
    assert_eq!(ty, TypeExpr::parameterized(list, vec![TypeExpr::wildcard()]));

    let ty = registry
        .parse_type(Some(outer), "List<? extends V>")
        .expect("should parse");
    assert_eq!(
        ty,
        TypeExpr::parameterized(
            list,
            vec![TypeExpr::Wildcard {
                bound: Some(Box::new(var(&registry, "V")))
            }]
        )
    );

    let ty = registry.parse_type(Some(outer), "K[][]").expect("should parse");
    assert_eq!(ty, TypeExpr::array(TypeExpr::array(var(&registry, "K"))));
}

#[test]
fn rejects_unknown_class() {
    let (registry, _) = registry_with_outer();
    let err = registry
        .parse_type(None, "List<Missing>")
        .expect_err("Missing is not registered");
    assert_eq!(
        err,
        SchemaError::Syntax {
            input: "List<Missing>".to_owned(),
            position: 5,
            message: "unknown class `Missing`".to_owned(),
        }
    );
}

#[test]
fn rejects_unbalanced_brackets() {
    let (registry, outer) = registry_with_outer();
    let err = registry
        .parse_type(Some(outer), "Map<K, V")
        .expect_err("missing `>`");
    assert!(matches!(err, SchemaError::Syntax { ref message, .. } if message == "expected `>`"));
}

#[test]
fn rejects_trailing_input() {
    let (registry, outer) = registry_with_outer();
    let err = registry
        .parse_type(Some(outer), "K V")
        .expect_err("trailing identifier");
    assert!(matches!(err, SchemaError::Syntax { position: 2, .. }));
}
