use super::*;
use crate::TypeInterner;
use crate::types::{ObjectType, ParamInfo, PropertyInfo, Signature, TypeData, TypeParamInfo};

#[test]
fn test_instantiate_type_parameter_directly() {
    let interner = TypeInterner::new();
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let mut subst = TypeSubstitution::new();
    subst.insert(t, TypeId::STRING);
    assert_eq!(instantiate_type(&interner, t, &subst), TypeId::STRING);
}

#[test]
fn test_instantiate_union_and_reference() {
    let interner = TypeInterner::new();
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let target = interner.object(ObjectType::default());
    let reference = interner.reference(target, vec![t]);
    let union = interner.union(&[reference, TypeId::NULL]);

    let subst = TypeSubstitution::from_args(&[t], &[TypeId::NUMBER], TypeId::UNKNOWN);
    let result = instantiate_type(&interner, union, &subst);
    let expected = interner.union(&[interner.reference(target, vec![TypeId::NUMBER]), TypeId::NULL]);
    assert_eq!(result, expected);
}

#[test]
fn test_instantiate_object_members_and_signatures() {
    let interner = TypeInterner::new();
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let sig = interner.add_signature(Signature::new(vec![ParamInfo::new("x", t)], t));
    let object = interner.object(ObjectType {
        properties: vec![PropertyInfo::new("value", t)],
        call_signatures: vec![sig],
        ..Default::default()
    });
    let mut subst = TypeSubstitution::new();
    subst.insert(t, TypeId::BOOLEAN);
    let result = instantiate_type(&interner, object, &subst);
    assert_ne!(result, object);

    let Some(TypeData::Object(members)) = interner.lookup(result) else {
        panic!("expected object");
    };
    assert_eq!(members.properties[0].type_id, TypeId::BOOLEAN);
    let instantiated = interner.signature(members.call_signatures[0]).expect("signature");
    assert_eq!(instantiated.return_type, TypeId::BOOLEAN);
    assert_eq!(instantiated.parameters[0].type_id, TypeId::BOOLEAN);
}

#[test]
fn test_instantiate_unrelated_object_is_identity() {
    let interner = TypeInterner::new();
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let object = interner.object(ObjectType {
        properties: vec![PropertyInfo::new("n", TypeId::NUMBER)],
        ..Default::default()
    });
    let mut subst = TypeSubstitution::new();
    subst.insert(t, TypeId::STRING);
    assert_eq!(instantiate_type(&interner, object, &subst), object);
}

#[test]
fn test_instantiate_self_referential_object_terminates() {
    let interner = TypeInterner::new();
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let node = interner.reserve();
    interner.define(
        node,
        crate::types::TypeInfo::new(
            crate::types::TypeFlags::OBJECT,
            TypeData::Object(ObjectType {
                properties: vec![PropertyInfo::new("next", node), PropertyInfo::new("value", t)],
                ..Default::default()
            }),
        ),
    );
    let mut subst = TypeSubstitution::new();
    subst.insert(t, TypeId::STRING);
    let result = instantiate_type(&interner, node, &subst);
    let props = interner.properties_of_type(result);
    assert_eq!(props[1].type_id, TypeId::STRING);
}
