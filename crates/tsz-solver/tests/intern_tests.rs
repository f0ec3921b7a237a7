use super::*;
use crate::types::{LiteralValue, ObjectFlags, TypeData, TypeFlags, TypeId};

#[test]
fn test_intrinsics_are_seeded() {
    let interner = TypeInterner::new();
    assert!(interner.flags(TypeId::STRING).contains(TypeFlags::STRING));
    assert!(interner.flags(TypeId::BOOLEAN).contains(TypeFlags::UNION));
    assert!(interner.flags(TypeId::BOOLEAN_TRUE).contains(TypeFlags::BOOLEAN_LITERAL));
    assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
}

#[test]
fn test_literals_are_interned() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    assert_eq!(a, interner.string_literal("a"));
    assert_ne!(a, interner.string_literal("b"));
    assert_eq!(interner.number_literal(1.0), interner.number_literal(1.0));
    assert_ne!(interner.number_literal(0.0), interner.number_literal(-0.0));
}

#[test]
fn test_fresh_literal_is_distinct_from_regular() {
    let interner = TypeInterner::new();
    let regular = interner.number_literal(1.0);
    let fresh = interner.fresh_literal(LiteralValue::Number(crate::types::OrderedFloat(1.0)));
    assert_ne!(regular, fresh);
    assert_eq!(interner.regular_type_of_literal(fresh), regular);
    assert_eq!(interner.fresh_type_of_literal(regular), fresh);
}

#[test]
fn test_union_of_true_and_false_is_boolean() {
    let interner = TypeInterner::new();
    let union = interner.union(&[TypeId::BOOLEAN_TRUE, TypeId::BOOLEAN_FALSE]);
    assert_eq!(union, TypeId::BOOLEAN);
}

#[test]
fn test_union_flattens_dedupes_and_sorts() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let b = interner.string_literal("b");
    let inner = interner.union(&[b, a]);
    let outer = interner.union(&[TypeId::NULL, inner, a, TypeId::NEVER]);
    let info = interner.get(outer);
    let mut expected = vec![a, b, TypeId::NULL];
    expected.sort();
    assert_eq!(info.constituents(), expected.as_slice());
}

#[test]
fn test_union_reduces_literals_under_primitive() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let one = interner.number_literal(1.0);
    let union = interner.union(&[a, TypeId::STRING, one]);
    let info = interner.get(union);
    let mut expected = vec![TypeId::STRING, one];
    expected.sort();
    assert_eq!(info.constituents(), expected.as_slice());
}

#[test]
fn test_union_edge_cases() {
    let interner = TypeInterner::new();
    assert_eq!(interner.union(&[]), TypeId::NEVER);
    assert_eq!(interner.union(&[TypeId::STRING]), TypeId::STRING);
    assert_eq!(interner.union(&[TypeId::STRING, TypeId::ANY]), TypeId::ANY);
    assert_eq!(interner.union(&[TypeId::UNKNOWN, TypeId::NUMBER]), TypeId::UNKNOWN);
}

#[test]
fn test_union_with_origin_keeps_separate_identity() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let b = interner.string_literal("b");
    let plain = interner.union(&[a, b]);
    let origin = interner.origin_union(vec![a, b]);
    let with_origin = interner.union_with_origin(&[a, b], origin);
    assert_ne!(plain, with_origin);
    match interner.lookup(with_origin) {
        Some(TypeData::Union { origin: Some(o), .. }) => assert_eq!(o, origin),
        other => panic!("expected union with origin, got {other:?}"),
    }
}

#[test]
fn test_intersection_keeps_order_and_absorbs() {
    let interner = TypeInterner::new();
    let x = interner.object(Default::default());
    let y = interner.object(Default::default());
    let both = interner.intersection(&[y, x, TypeId::UNKNOWN, y]);
    assert_eq!(interner.get(both).constituents(), &[y, x]);
    assert_eq!(interner.intersection(&[x, TypeId::NEVER]), TypeId::NEVER);
    assert_eq!(interner.intersection(&[]), TypeId::UNKNOWN);
}

#[test]
fn test_objects_have_identity() {
    let interner = TypeInterner::new();
    let first = interner.object(Default::default());
    let second = interner.object(Default::default());
    assert_ne!(first, second);
    assert!(interner.object_flags(first).contains(ObjectFlags::ANONYMOUS));
}

#[test]
fn test_reserve_and_define() {
    let interner = TypeInterner::new();
    let id = interner.reserve();
    interner.define(
        id,
        TypeInfo::new(TypeFlags::OBJECT, TypeData::Object(Default::default())),
    );
    assert!(interner.flags(id).contains(TypeFlags::OBJECT));
    assert_eq!(interner.get(id).id, id);
}

#[test]
fn test_template_literal_without_spans_is_string_literal() {
    let interner = TypeInterner::new();
    let t = interner.template_literal(vec!["abc".to_string()], Vec::new());
    assert_eq!(t, interner.string_literal("abc"));
}

#[test]
fn test_concurrent_interning_agrees() {
    use rayon::prelude::*;
    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = (0..64)
        .into_par_iter()
        .map(|i| interner.string_literal(&format!("k{}", i % 8)))
        .collect();
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(*id, interner.string_literal(&format!("k{}", i % 8)));
    }
}
