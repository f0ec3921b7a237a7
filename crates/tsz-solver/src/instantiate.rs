//! Type instantiation: substituting type arguments for type parameters.

use crate::TypeInterner;
use crate::types::{
    ConditionalType, MappedType, ObjectType, ParamInfo, PropertyInfo, Signature, SignatureId,
    TypeData, TypeId, TypeInfo, TypePredicate,
};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Maximum instantiation depth, matching TypeScript's TS2589 limit.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Mapping from type parameters to their replacements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        TypeSubstitution::default()
    }

    /// Pairs parameters with arguments; missing arguments fall back to
    /// `fallback`.
    pub fn from_args(params: &[TypeId], args: &[TypeId], fallback: TypeId) -> Self {
        let mut subst = TypeSubstitution::new();
        for (i, param) in params.iter().enumerate() {
            subst.insert(*param, args.get(i).copied().unwrap_or(fallback));
        }
        subst
    }

    pub fn insert(&mut self, param: TypeId, replacement: TypeId) {
        self.map.insert(param, replacement);
    }

    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `self` followed by `then`: every replacement of `self` is instantiated
    /// through `then`, and parameters only `then` maps are carried over.
    pub fn compose(&self, interner: &TypeInterner, then: &TypeSubstitution) -> TypeSubstitution {
        let mut composed = TypeSubstitution::new();
        for (param, replacement) in &self.map {
            composed.insert(*param, instantiate_type(interner, *replacement, then));
        }
        for (param, replacement) in &then.map {
            composed.map.entry(*param).or_insert(*replacement);
        }
        composed
    }
}

pub fn instantiate_type(interner: &TypeInterner, type_id: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() {
        return type_id;
    }
    let mut instantiator = TypeInstantiator {
        interner,
        subst,
        depth: 0,
        memo: FxHashMap::default(),
    };
    instantiator.instantiate(type_id)
}

pub fn instantiate_signature(
    interner: &TypeInterner,
    signature: SignatureId,
    subst: &TypeSubstitution,
) -> SignatureId {
    if subst.is_empty() {
        return signature;
    }
    let mut instantiator = TypeInstantiator {
        interner,
        subst,
        depth: 0,
        memo: FxHashMap::default(),
    };
    instantiator.instantiate_signature(signature)
}

struct TypeInstantiator<'a> {
    interner: &'a TypeInterner,
    subst: &'a TypeSubstitution,
    depth: u32,
    memo: FxHashMap<TypeId, TypeId>,
}

impl TypeInstantiator<'_> {
    fn instantiate(&mut self, type_id: TypeId) -> TypeId {
        if let Some(replacement) = self.subst.get(type_id) {
            return replacement;
        }
        if type_id.is_intrinsic() {
            return type_id;
        }
        if let Some(done) = self.memo.get(&type_id) {
            return *done;
        }
        if self.depth >= MAX_INSTANTIATION_DEPTH {
            trace!(type_id = type_id.0, "instantiation depth exceeded");
            return type_id;
        }
        self.depth += 1;
        let result = self.instantiate_inner(type_id);
        self.depth -= 1;
        result
    }

    fn instantiate_all(&mut self, types: &[TypeId]) -> Vec<TypeId> {
        types.iter().map(|t| self.instantiate(*t)).collect()
    }

    fn instantiate_inner(&mut self, type_id: TypeId) -> TypeId {
        let interner = self.interner;
        let info = interner.get(type_id);
        match &info.data {
            TypeData::Union { types, .. } => {
                let mapped = self.instantiate_all(types);
                if mapped == *types {
                    type_id
                } else {
                    interner.union(&mapped)
                }
            }
            TypeData::Intersection(types) => {
                let mapped = self.instantiate_all(types);
                if mapped == *types {
                    type_id
                } else {
                    interner.intersection(&mapped)
                }
            }
            TypeData::Reference {
                target,
                type_arguments,
                node,
            } => {
                let mapped = self.instantiate_all(type_arguments);
                if mapped == *type_arguments {
                    type_id
                } else if node.is_some() {
                    interner.deferred_reference(*target, mapped, *node)
                } else {
                    interner.reference(*target, mapped)
                }
            }
            TypeData::Index(target) => {
                let mapped = self.instantiate(*target);
                if mapped == *target {
                    type_id
                } else {
                    interner.index(mapped)
                }
            }
            TypeData::IndexedAccess {
                object_type,
                index_type,
            } => {
                let object = self.instantiate(*object_type);
                let index = self.instantiate(*index_type);
                if object == *object_type && index == *index_type {
                    type_id
                } else {
                    interner.indexed_access(object, index)
                }
            }
            TypeData::TemplateLiteral { texts, types } => {
                let mapped = self.instantiate_all(types);
                if mapped == *types {
                    type_id
                } else {
                    interner.template_literal(texts.clone(), mapped)
                }
            }
            TypeData::StringMapping { symbol, type_id: inner } => {
                let mapped = self.instantiate(*inner);
                if mapped == *inner {
                    type_id
                } else {
                    interner.string_mapping(*symbol, mapped)
                }
            }
            TypeData::Substitution {
                base_type,
                constraint,
            } => {
                let base = self.instantiate(*base_type);
                let constraint_mapped = self.instantiate(*constraint);
                if base == *base_type && constraint_mapped == *constraint {
                    type_id
                } else {
                    interner.substitution(base, constraint_mapped)
                }
            }
            TypeData::Object(members) => self.instantiate_object(&info, members),
            TypeData::Conditional(conditional) => {
                let check_type = self.instantiate(conditional.check_type);
                let extends_type = self.instantiate(conditional.extends_type);
                let true_type = self.instantiate(conditional.true_type);
                let false_type = self.instantiate(conditional.false_type);
                if check_type == conditional.check_type
                    && extends_type == conditional.extends_type
                    && true_type == conditional.true_type
                    && false_type == conditional.false_type
                {
                    return type_id;
                }
                let mapper = match &conditional.mapper {
                    Some(outer) => outer.compose(interner, self.subst),
                    None => self.subst.clone(),
                };
                let mapped = ConditionalType {
                    root: conditional.root.clone(),
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                    mapper: Some(mapper),
                };
                self.realloc(&info, TypeData::Conditional(mapped))
            }
            TypeData::Mapped(mapped_type) => {
                let mapped = MappedType {
                    constraint_type: self.instantiate(mapped_type.constraint_type),
                    name_type: mapped_type.name_type.map(|t| self.instantiate(t)),
                    template_type: mapped_type.template_type.map(|t| self.instantiate(t)),
                    ..mapped_type.clone()
                };
                if mapped == *mapped_type {
                    return type_id;
                }
                self.realloc(&info, TypeData::Mapped(mapped))
            }
            _ => type_id,
        }
    }

    fn realloc(&self, info: &TypeInfo, data: TypeData) -> TypeId {
        let mut copy = TypeInfo::new(info.flags, data);
        copy.object_flags = info.object_flags;
        copy.symbol = info.symbol;
        copy.alias_symbol = info.alias_symbol;
        copy.alias_type_arguments = info
            .alias_type_arguments
            .iter()
            .map(|t| self.subst.get(*t).unwrap_or(*t))
            .collect();
        self.interner.alloc(copy)
    }

    fn instantiate_object(&mut self, info: &TypeInfo, members: &ObjectType) -> TypeId {
        let interner = self.interner;
        // Cycles back into this object keep pointing at the original.
        self.memo.insert(info.id, info.id);

        let mut changed = false;
        let properties: Vec<PropertyInfo> = members
            .properties
            .iter()
            .map(|prop| {
                let type_id = self.instantiate(prop.type_id);
                let write_type = prop.write_type.map(|t| self.instantiate(t));
                changed |= type_id != prop.type_id || write_type != prop.write_type;
                PropertyInfo {
                    type_id,
                    write_type,
                    ..prop.clone()
                }
            })
            .collect();
        let call_signatures = self.instantiate_signatures(&members.call_signatures, &mut changed);
        let construct_signatures =
            self.instantiate_signatures(&members.construct_signatures, &mut changed);
        let index_infos = members
            .index_infos
            .iter()
            .map(|index| {
                let type_id = self.instantiate(index.type_id);
                changed |= type_id != index.type_id;
                crate::types::IndexInfo {
                    type_id,
                    ..index.clone()
                }
            })
            .collect();

        if !changed {
            return info.id;
        }

        let mut copy = TypeInfo::new(
            info.flags,
            TypeData::Object(ObjectType {
                properties,
                call_signatures,
                construct_signatures,
                index_infos,
            }),
        );
        copy.object_flags = info.object_flags | crate::types::ObjectFlags::INSTANTIATED;
        copy.symbol = info.symbol;
        copy.alias_symbol = info.alias_symbol;
        copy.alias_type_arguments = self.instantiate_all(&info.alias_type_arguments);
        let instantiated = interner.alloc(copy);
        self.memo.insert(info.id, instantiated);
        instantiated
    }

    fn instantiate_signatures(&mut self, signatures: &[SignatureId], changed: &mut bool) -> Vec<SignatureId> {
        signatures
            .iter()
            .map(|sig| {
                let mapped = self.instantiate_signature(*sig);
                *changed |= mapped != *sig;
                mapped
            })
            .collect()
    }

    fn instantiate_signature(&mut self, signature: SignatureId) -> SignatureId {
        let Some(sig) = self.interner.signature(signature) else {
            return signature;
        };
        let parameters: Vec<ParamInfo> = sig
            .parameters
            .iter()
            .map(|param| ParamInfo {
                type_id: self.instantiate(param.type_id),
                ..param.clone()
            })
            .collect();
        let this_parameter = sig.this_parameter.as_ref().map(|param| ParamInfo {
            type_id: self.instantiate(param.type_id),
            ..param.clone()
        });
        let return_type = self.instantiate(sig.return_type);
        let type_predicate = sig.type_predicate.as_ref().map(|pred| TypePredicate {
            type_id: pred.type_id.map(|t| self.instantiate(t)),
            ..pred.clone()
        });
        let mapped = Signature {
            declaration: sig.declaration,
            type_parameters: sig.type_parameters.clone(),
            this_parameter,
            parameters,
            return_type,
            type_predicate,
            is_abstract: sig.is_abstract,
        };
        if mapped == *sig {
            signature
        } else {
            self.interner.add_signature(mapped)
        }
    }
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
