use crate::TypeInterner;
use crate::types::{
    LiteralValue, ObjectFlags, ObjectType, OrderedFloat, PropertyInfo, TypeData, TypeFlags,
    TypeId, TypeInfo, TypeParamInfo,
};

#[test]
fn test_widened_type_widens_fresh_literals_only() {
    let interner = TypeInterner::new();
    let fresh = interner.fresh_literal(LiteralValue::Number(OrderedFloat(1.0)));
    let regular = interner.number_literal(1.0);
    assert_eq!(interner.widened_type(fresh), TypeId::NUMBER);
    assert_eq!(interner.widened_type(regular), regular);
}

#[test]
fn test_widened_object_literal() {
    let interner = TypeInterner::new();
    let fresh = interner.fresh_literal(LiteralValue::String("x".into()));
    let object = interner.alloc(
        TypeInfo::new(
            TypeFlags::OBJECT,
            TypeData::Object(ObjectType {
                properties: vec![PropertyInfo::new("a", fresh)],
                ..Default::default()
            }),
        )
        .with_object_flags(ObjectFlags::ANONYMOUS | ObjectFlags::OBJECT_LITERAL),
    );
    let widened = interner.widened_type(object);
    assert_ne!(widened, object);
    let props = interner.properties_of_type(widened);
    assert_eq!(props[0].type_id, TypeId::STRING);
}

#[test]
fn test_base_type_of_literal() {
    let interner = TypeInterner::new();
    assert_eq!(interner.base_type_of_literal(interner.string_literal("a")), TypeId::STRING);
    assert_eq!(interner.base_type_of_literal(TypeId::BOOLEAN_TRUE), TypeId::BOOLEAN);
    assert_eq!(interner.base_type_of_literal(interner.bigint_literal("1")), TypeId::BIGINT);
}

#[test]
fn test_is_literal_of_contextual_type() {
    let interner = TypeInterner::new();
    let a = interner.string_literal("a");
    let b = interner.string_literal("b");
    let one = interner.number_literal(1.0);
    let contextual = interner.union(&[a, b]);
    assert!(interner.is_literal_of_contextual_type(a, Some(contextual)));
    assert!(!interner.is_literal_of_contextual_type(one, Some(contextual)));
    assert!(!interner.is_literal_of_contextual_type(a, Some(TypeId::STRING)));
    assert!(!interner.is_literal_of_contextual_type(a, None));
}

#[test]
fn test_contextual_type_parameter_with_string_constraint() {
    let interner = TypeInterner::new();
    let mut info = TypeParamInfo::new("T");
    info.constraint = Some(TypeId::STRING);
    let t = interner.type_parameter(info);
    let a = interner.string_literal("a");
    assert!(interner.is_literal_of_contextual_type(a, Some(t)));
    assert!(!interner.is_literal_of_contextual_type(interner.number_literal(2.0), Some(t)));
}
