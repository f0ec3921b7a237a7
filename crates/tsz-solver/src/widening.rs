//! Literal freshness, widening and enum base types.

use crate::TypeInterner;
use crate::types::{ObjectFlags, ObjectType, PropertyInfo, TypeData, TypeFlags, TypeId, TypeInfo};

impl TypeInterner {
    /// Regular (non-fresh) counterpart of a literal type.
    pub fn regular_type_of_literal(&self, type_id: TypeId) -> TypeId {
        let info = self.get(type_id);
        match &info.data {
            TypeData::Literal { value, fresh: true } => self.literal(value.clone()),
            TypeData::Union { types, .. } if types.iter().any(|t| self.is_fresh_literal(*t)) => {
                let regular: Vec<TypeId> = types
                    .iter()
                    .map(|t| self.regular_type_of_literal(*t))
                    .collect();
                self.union(&regular)
            }
            _ => type_id,
        }
    }

    pub fn fresh_type_of_literal(&self, type_id: TypeId) -> TypeId {
        match &self.get(type_id).data {
            TypeData::Literal { value, fresh: false } => self.fresh_literal(value.clone()),
            _ => type_id,
        }
    }

    pub fn is_fresh_literal(&self, type_id: TypeId) -> bool {
        matches!(self.get(type_id).data, TypeData::Literal { fresh: true, .. })
    }

    /// Primitive a literal widens to: `"a"` to `string`, `1` to `number`.
    pub fn base_type_of_literal(&self, type_id: TypeId) -> TypeId {
        let info = self.get(type_id);
        if info.has(TypeFlags::ENUM_LITERAL)
            && let TypeData::EnumLiteral { base, .. } = info.data
        {
            return base;
        }
        if info.has(TypeFlags::STRING_LITERAL) {
            TypeId::STRING
        } else if info.has(TypeFlags::NUMBER_LITERAL) {
            TypeId::NUMBER
        } else if info.has(TypeFlags::BIGINT_LITERAL) {
            TypeId::BIGINT
        } else if info.has(TypeFlags::BOOLEAN_LITERAL) {
            TypeId::BOOLEAN
        } else if let TypeData::Union { types, .. } = &info.data {
            let widened: Vec<TypeId> = types
                .iter()
                .map(|t| self.base_type_of_literal(*t))
                .collect();
            self.union(&widened)
        } else {
            type_id
        }
    }

    /// Union type of the enum an enum literal belongs to.
    pub fn base_type_of_enum_like(&self, type_id: TypeId) -> TypeId {
        match self.get(type_id).data {
            TypeData::EnumLiteral { base, .. } => base,
            _ => type_id,
        }
    }

    /// Widens fresh literals to their base primitive, and fresh object
    /// literal types member by member.
    pub fn widened_type(&self, type_id: TypeId) -> TypeId {
        let info = self.get(type_id);
        match &info.data {
            TypeData::Literal { fresh: true, .. } => self.base_type_of_literal(type_id),
            TypeData::Union { types, origin: None } => {
                let widened: Vec<TypeId> = types.iter().map(|t| self.widened_type(*t)).collect();
                if widened.as_slice() == types.as_slice() {
                    type_id
                } else {
                    self.union(&widened)
                }
            }
            TypeData::Object(members) if info.has_object_flags(ObjectFlags::OBJECT_LITERAL) => {
                self.widened_object_literal(&info, members)
            }
            _ => type_id,
        }
    }

    fn widened_object_literal(&self, info: &TypeInfo, members: &ObjectType) -> TypeId {
        let mut changed = false;
        let properties: Vec<PropertyInfo> = members
            .properties
            .iter()
            .map(|prop| {
                let widened = self.widened_type(prop.type_id);
                changed |= widened != prop.type_id;
                PropertyInfo {
                    type_id: widened,
                    ..prop.clone()
                }
            })
            .collect();
        if !changed {
            return info.id;
        }
        let mut widened = TypeInfo::new(
            info.flags,
            TypeData::Object(ObjectType {
                properties,
                ..members.clone()
            }),
        );
        widened.object_flags = info.object_flags & !ObjectFlags::FRESH_LITERAL;
        widened.symbol = info.symbol;
        self.alloc(widened)
    }

    /// Whether a literal candidate keeps its literal type under `contextual`.
    pub fn is_literal_of_contextual_type(&self, candidate: TypeId, contextual: Option<TypeId>) -> bool {
        let Some(contextual) = contextual else {
            return false;
        };
        let info = self.get(contextual);
        if info.has(TypeFlags::UNION_OR_INTERSECTION) {
            return info
                .constituents()
                .iter()
                .any(|t| self.is_literal_of_contextual_type(candidate, Some(*t)));
        }
        if info.has(TypeFlags::INSTANTIABLE_NON_PRIMITIVE) {
            let constraint = self.base_constraint_of(contextual).unwrap_or(TypeId::UNKNOWN);
            return self.maybe_type_of_kind(constraint, TypeFlags::STRING)
                && self.maybe_type_of_kind(candidate, TypeFlags::STRING_LITERAL)
                || self.maybe_type_of_kind(constraint, TypeFlags::NUMBER)
                    && self.maybe_type_of_kind(candidate, TypeFlags::NUMBER_LITERAL)
                || self.maybe_type_of_kind(constraint, TypeFlags::BIGINT)
                    && self.maybe_type_of_kind(candidate, TypeFlags::BIGINT_LITERAL)
                || self.maybe_type_of_kind(constraint, TypeFlags::ES_SYMBOL)
                    && self.maybe_type_of_kind(candidate, TypeFlags::UNIQUE_ES_SYMBOL)
                || self.is_literal_of_contextual_type(candidate, Some(constraint));
        }
        info.has(
            TypeFlags::STRING_LITERAL
                | TypeFlags::INDEX
                | TypeFlags::TEMPLATE_LITERAL
                | TypeFlags::STRING_MAPPING,
        ) && self.maybe_type_of_kind(candidate, TypeFlags::STRING_LITERAL)
            || info.has(TypeFlags::NUMBER_LITERAL)
                && self.maybe_type_of_kind(candidate, TypeFlags::NUMBER_LITERAL)
            || info.has(TypeFlags::BIGINT_LITERAL)
                && self.maybe_type_of_kind(candidate, TypeFlags::BIGINT_LITERAL)
            || info.has(TypeFlags::BOOLEAN_LITERAL)
                && self.maybe_type_of_kind(candidate, TypeFlags::BOOLEAN_LITERAL)
            || info.has(TypeFlags::UNIQUE_ES_SYMBOL)
                && self.maybe_type_of_kind(candidate, TypeFlags::UNIQUE_ES_SYMBOL)
    }

    /// Whether `type_id` or any union/intersection constituent has `kind`.
    pub fn maybe_type_of_kind(&self, type_id: TypeId, kind: TypeFlags) -> bool {
        let info = self.get(type_id);
        if info.has(kind) {
            return true;
        }
        info.has(TypeFlags::UNION_OR_INTERSECTION)
            && info
                .constituents()
                .iter()
                .any(|t| self.maybe_type_of_kind(*t, kind))
    }

    /// Constraint of a type parameter, following chains of type parameters.
    pub fn base_constraint_of(&self, type_id: TypeId) -> Option<TypeId> {
        let mut current = type_id;
        for _ in 0..crate::MAX_CONSTRAINT_DEPTH {
            match &self.get(current).data {
                TypeData::TypeParameter(param) => current = param.constraint?,
                TypeData::Substitution { base_type, .. } => current = *base_type,
                _ => return Some(current),
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../tests/widening_tests.rs"]
mod tests;
