//! Structural queries over interned types.

use rustc_hash::FxHashMap;

use crate::TypeInterner;
use crate::instantiate::{TypeSubstitution, instantiate_signature, instantiate_type};
use crate::types::{
    IndexInfo, ObjectType, PropertyInfo, SignatureId, SignatureKind, TupleType, TypeData,
    TypeFlags, TypeId,
};

impl TypeInterner {
    /// Members of an object type. References to classes and interfaces are
    /// instantiated with their type arguments.
    pub fn resolved_members(&self, type_id: TypeId) -> Option<ObjectType> {
        let info = self.get(type_id);
        match &info.data {
            TypeData::Object(members) => Some(members.clone()),
            TypeData::ClassOrInterface(declared) => Some(declared.members.clone()),
            TypeData::Reference {
                target,
                type_arguments,
                ..
            } => {
                let target_info = self.get(*target);
                let TypeData::ClassOrInterface(declared) = &target_info.data else {
                    return None;
                };
                let mut subst =
                    TypeSubstitution::from_args(&declared.type_parameters, type_arguments, TypeId::UNKNOWN);
                if let Some(this_type) = declared.this_type {
                    subst.insert(this_type, type_id);
                }
                Some(self.instantiate_members(&declared.members, &subst))
            }
            _ => None,
        }
    }

    fn instantiate_members(&self, members: &ObjectType, subst: &TypeSubstitution) -> ObjectType {
        if subst.is_empty() {
            return members.clone();
        }
        ObjectType {
            properties: members
                .properties
                .iter()
                .map(|prop| PropertyInfo {
                    type_id: instantiate_type(self, prop.type_id, subst),
                    write_type: prop.write_type.map(|t| instantiate_type(self, t, subst)),
                    ..prop.clone()
                })
                .collect(),
            call_signatures: members
                .call_signatures
                .iter()
                .map(|sig| instantiate_signature(self, *sig, subst))
                .collect(),
            construct_signatures: members
                .construct_signatures
                .iter()
                .map(|sig| instantiate_signature(self, *sig, subst))
                .collect(),
            index_infos: members
                .index_infos
                .iter()
                .map(|index| IndexInfo {
                    type_id: instantiate_type(self, index.type_id, subst),
                    ..index.clone()
                })
                .collect(),
        }
    }

    pub fn properties_of_type(&self, type_id: TypeId) -> Vec<PropertyInfo> {
        if self.flags(type_id).contains(TypeFlags::INTERSECTION) {
            let info = self.get(type_id);
            return info
                .constituents()
                .iter()
                .flat_map(|t| self.properties_of_type(*t))
                .collect();
        }
        self.resolved_members(type_id)
            .map(|members| members.properties)
            .unwrap_or_default()
    }

    pub fn signatures_of_type(&self, type_id: TypeId, kind: SignatureKind) -> Vec<SignatureId> {
        self.resolved_members(type_id)
            .map(|members| match kind {
                SignatureKind::Call => members.call_signatures,
                SignatureKind::Construct => members.construct_signatures,
            })
            .unwrap_or_default()
    }

    /// `never` for an intersection whose object members give one required
    /// property two different unit types. Unions drop such members.
    pub fn reduced_type(&self, type_id: TypeId) -> TypeId {
        let info = self.get(type_id);
        if info.has(TypeFlags::INTERSECTION) {
            if self.has_conflicting_discriminant(info.constituents()) {
                return TypeId::NEVER;
            }
            return type_id;
        }
        if info.has(TypeFlags::UNION) {
            let reduced: Vec<TypeId> = info.constituents().iter().map(|t| self.reduced_type(*t)).collect();
            if reduced.as_slice() == info.constituents() {
                return type_id;
            }
            return self.union(&reduced);
        }
        type_id
    }

    /// Whether `a` and `b` differ only in the alias naming them. A type alias
    /// allocates a named copy of its body, so both ids denote one type.
    pub fn same_type_ignoring_alias(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let (a, b) = (self.get(a), self.get(b));
        (a.alias_symbol.is_some() || b.alias_symbol.is_some())
            && a.flags == b.flags
            && a.object_flags == b.object_flags
            && a.symbol == b.symbol
            && a.data == b.data
    }

    fn has_conflicting_discriminant(&self, members: &[TypeId]) -> bool {
        let mut units: FxHashMap<String, TypeId> = FxHashMap::default();
        for member in members {
            let Some(resolved) = self.resolved_members(*member) else {
                continue;
            };
            for property in resolved.properties {
                if property.optional
                    || !self
                        .flags(property.type_id)
                        .intersects(TypeFlags::LITERAL | TypeFlags::NULLABLE)
                {
                    continue;
                }
                if let Some(previous) = units.insert(property.name, property.type_id)
                    && previous != property.type_id
                {
                    return true;
                }
            }
        }
        false
    }

    /// Drops constituents of a union matching `remove`.
    pub fn filter_type(&self, type_id: TypeId, remove: TypeFlags) -> TypeId {
        let info = self.get(type_id);
        if !info.has(TypeFlags::UNION) {
            return type_id;
        }
        let kept: Vec<TypeId> = info
            .constituents()
            .iter()
            .copied()
            .filter(|t| !self.flags(*t).intersects(remove))
            .collect();
        if kept.len() == info.constituents().len() {
            type_id
        } else {
            self.union(&kept)
        }
    }

    /// Tuple target and element types of a tuple reference.
    pub fn tuple_parts(&self, type_id: TypeId) -> Option<(TupleType, Vec<TypeId>)> {
        let info = self.get(type_id);
        let TypeData::Reference {
            target,
            type_arguments,
            ..
        } = &info.data
        else {
            return None;
        };
        match &self.get(*target).data {
            TypeData::TupleTarget(tuple) => Some((tuple.clone(), type_arguments.clone())),
            _ => None,
        }
    }

    pub fn is_tuple_type(&self, type_id: TypeId) -> bool {
        self.tuple_parts(type_id).is_some()
    }

    /// Target and type arguments of a reference.
    pub fn reference_parts(&self, type_id: TypeId) -> Option<(TypeId, Vec<TypeId>)> {
        match &self.get(type_id).data {
            TypeData::Reference {
                target,
                type_arguments,
                ..
            } => Some((*target, type_arguments.clone())),
            _ => None,
        }
    }

    /// Declared type parameters of a class or interface target.
    pub fn target_type_parameters(&self, target: TypeId) -> Vec<TypeId> {
        match &self.get(target).data {
            TypeData::ClassOrInterface(declared) => declared.type_parameters.clone(),
            _ => Vec::new(),
        }
    }

    pub fn type_parameter_default(&self, type_param: TypeId) -> Option<TypeId> {
        match &self.get(type_param).data {
            TypeData::TypeParameter(param) => param.default,
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_queries_tests.rs"]
mod tests;
