//! Converter graph: transitive search, depth limits and supertypes

use proptest::prelude::*;
use skript_foundation::{ErrorKind, Value};
use skript_types::{MAX_CONVERSION_DEPTH, TypeDescriptor, TypeSystem, TypeSystemBuilder};

/// Types `t0 .. t{n}` with a converter `t{i} -> t{i+1}` adding one.
fn chain(n: usize, depth: usize) -> TypeSystem {
    let mut b = TypeSystemBuilder::new().with_max_conversion_depth(depth);
    for i in 0..=n {
        b.register_type(TypeDescriptor::new(format!("t{i}"), format!("t{i}s")))
            .unwrap();
    }
    for i in 0..n {
        b.register_converter(&format!("t{i}"), &format!("t{}", i + 1), |v| {
            v.as_int().map(|n| Value::Int(n + 1))
        })
        .unwrap();
    }
    b.build()
}

#[test]
fn a_to_b_to_c() {
    let mut b = TypeSystemBuilder::new();
    let a = b.register_type(TypeDescriptor::new("a", "as")).unwrap();
    let bb = b.register_type(TypeDescriptor::new("b", "bs")).unwrap();
    let c = b.register_type(TypeDescriptor::new("c", "cs")).unwrap();
    b.register_converter("a", "b", |v| v.as_int().map(|n| Value::Int(n * 2)))
        .unwrap();
    b.register_converter("b", "c", |v| v.as_int().map(|n| Value::Int(n + 1)))
        .unwrap();
    let ts = b.build();

    assert_eq!(ts.convert(&Value::Int(5), a, c).unwrap(), Value::Int(11));
    let path = ts.conversion_path(a, c).unwrap();
    assert_eq!(path.steps, vec![bb, c]);
    assert_eq!(path.len(), 2);

    // The relation is not symmetric.
    let err = ts.convert(&Value::Int(1), c, a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoConversion { .. }));
}

#[test]
fn default_depth_limit() {
    let ts = chain(MAX_CONVERSION_DEPTH + 1, MAX_CONVERSION_DEPTH);
    let id = |i: usize| ts.type_id(&format!("t{i}")).unwrap();
    assert_eq!(
        ts.conversion_path(id(0), id(MAX_CONVERSION_DEPTH)).map(|p| p.len()),
        Some(MAX_CONVERSION_DEPTH)
    );
    assert!(ts.conversion_path(id(0), id(MAX_CONVERSION_DEPTH + 1)).is_none());
    assert!(ts.convert(&Value::Int(0), id(0), id(MAX_CONVERSION_DEPTH + 1)).is_err());
}

#[test]
fn depth_limit_is_configurable() {
    let ts = chain(2, 1);
    let id = |i: usize| ts.type_id(&format!("t{i}")).unwrap();
    assert!(ts.can_convert(id(0), id(1)));
    assert!(!ts.can_convert(id(0), id(2)));
    assert_eq!(ts.max_conversion_depth(), 1);
}

#[test]
fn shortest_path_wins() {
    let mut b = TypeSystemBuilder::new();
    let a = b.register_type(TypeDescriptor::new("a", "as")).unwrap();
    b.register_type(TypeDescriptor::new("b", "bs")).unwrap();
    let c = b.register_type(TypeDescriptor::new("c", "cs")).unwrap();
    b.register_converter("a", "b", |_| Some(Value::Int(1))).unwrap();
    b.register_converter("b", "c", |_| Some(Value::Int(2))).unwrap();
    b.register_converter("a", "c", |_| Some(Value::Int(3))).unwrap();
    let ts = b.build();
    assert_eq!(ts.conversion_path(a, c).unwrap().steps, vec![c]);
    assert_eq!(ts.convert(&Value::Nil, a, c).unwrap(), Value::Int(3));
}

#[test]
fn supertype_converters_apply_to_subtypes() {
    let mut b = TypeSystemBuilder::new();
    b.register_type(TypeDescriptor::new("entity", "entities")).unwrap();
    let player = b
        .register_type(TypeDescriptor::new("player", "players").with_supertype("entity"))
        .unwrap();
    let location = b.register_type(TypeDescriptor::new("location", "locations")).unwrap();
    b.register_converter("entity", "location", |_| Some(Value::from("spawn")))
        .unwrap();
    let ts = b.build();
    assert_eq!(
        ts.convert(&Value::from("Alice"), player, location).unwrap(),
        Value::from("spawn")
    );
}

#[test]
fn rejected_values_fail_the_conversion() {
    let ts = chain(2, MAX_CONVERSION_DEPTH);
    let id = |i: usize| ts.type_id(&format!("t{i}")).unwrap();
    let err = ts.convert(&Value::from("x"), id(0), id(2)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoConversion { .. }));
}

proptest! {
    /// Every pair along a chain within the depth limit converts, adding one
    /// per step.
    #[test]
    fn chains_convert_transitively(len in 1usize..=MAX_CONVERSION_DEPTH, start in -1000i64..1000) {
        let ts = chain(len, MAX_CONVERSION_DEPTH);
        let from = ts.type_id("t0").unwrap();
        let to = ts.type_id(&format!("t{len}")).unwrap();
        let converted = ts.convert(&Value::Int(start), from, to).unwrap();
        prop_assert_eq!(converted, Value::Int(start + i64::try_from(len).unwrap()));
    }
}
