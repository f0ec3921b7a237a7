use crate::TypeInterner;
use crate::types::{
    ElementFlags, InterfaceType, ObjectFlags, ObjectType, PropertyInfo, SignatureKind, TypeData,
    TypeFlags, TypeId, TypeInfo, TypeParamInfo,
};

#[test]
fn test_reference_members_are_instantiated() {
    let interner = TypeInterner::new();
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let target = interner.alloc(
        TypeInfo::new(
            TypeFlags::OBJECT,
            TypeData::ClassOrInterface(InterfaceType {
                type_parameters: vec![t],
                this_type: None,
                members: ObjectType {
                    properties: vec![PropertyInfo::new("item", t)],
                    ..Default::default()
                },
            }),
        )
        .with_object_flags(ObjectFlags::INTERFACE),
    );
    let reference = interner.reference(target, vec![TypeId::STRING]);
    assert!(interner.object_flags(reference).contains(ObjectFlags::REFERENCE | ObjectFlags::INTERFACE));
    let props = interner.properties_of_type(reference);
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].type_id, TypeId::STRING);
    assert!(interner.signatures_of_type(reference, SignatureKind::Call).is_empty());
}

#[test]
fn test_tuple_parts() {
    let interner = TypeInterner::new();
    let target = interner.tuple_target(vec![ElementFlags::REQUIRED, ElementFlags::OPTIONAL], vec![None, None], false);
    let tuple = interner.reference(target, vec![TypeId::STRING, TypeId::NUMBER]);
    let (shape, elements) = interner.tuple_parts(tuple).expect("tuple");
    assert_eq!(shape.element_flags.len(), 2);
    assert_eq!(elements, vec![TypeId::STRING, TypeId::NUMBER]);
    assert!(!interner.is_tuple_type(TypeId::STRING));
}

#[test]
fn test_filter_type_removes_undefined() {
    let interner = TypeInterner::new();
    let union = interner.union(&[TypeId::STRING, TypeId::UNDEFINED]);
    assert_eq!(interner.filter_type(union, TypeFlags::UNDEFINED), TypeId::STRING);
    assert_eq!(interner.filter_type(TypeId::NUMBER, TypeFlags::UNDEFINED), TypeId::NUMBER);
}
