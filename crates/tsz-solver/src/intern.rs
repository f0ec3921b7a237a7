//! Type interning.
//!
//! The interner is shared between threads: structural shapes are deduplicated
//! through a `DashMap`, and the id-indexed type table sits behind an
//! `RwLock`. All constructors take `&self`.

use crate::types::{
    ElementFlags, InternKey, LiteralValue, ObjectFlags, ObjectType, OrderedFloat, Signature,
    SignatureId, TupleElementLabel, TupleType, TypeData, TypeFlags, TypeId, TypeInfo,
    TypeParamInfo,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;
use tsz_ast::NodeIndex;
use tsz_binder::SymbolId;

pub struct TypeInterner {
    types: RwLock<Vec<Arc<TypeInfo>>>,
    signatures: RwLock<Vec<Arc<Signature>>>,
    interned: DashMap<InternKey, TypeId, FxBuildHasher>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            types: RwLock::new(Vec::with_capacity(256)),
            signatures: RwLock::new(Vec::new()),
            interned: DashMap::with_hasher(FxBuildHasher),
        };
        interner.seed_intrinsics();
        interner
    }

    fn seed_intrinsics(&self) {
        let intrinsic = |flags| TypeInfo::new(flags, TypeData::Intrinsic);
        let boolean_literal = |value| {
            TypeInfo::new(
                TypeFlags::BOOLEAN_LITERAL,
                TypeData::Literal {
                    value: LiteralValue::Boolean(value),
                    fresh: false,
                },
            )
        };
        let seeded = [
            (TypeId::ERROR, intrinsic(TypeFlags::ANY)),
            (TypeId::ANY, intrinsic(TypeFlags::ANY)),
            (TypeId::UNKNOWN, intrinsic(TypeFlags::UNKNOWN)),
            (TypeId::STRING, intrinsic(TypeFlags::STRING)),
            (TypeId::NUMBER, intrinsic(TypeFlags::NUMBER)),
            (TypeId::BIGINT, intrinsic(TypeFlags::BIGINT)),
            (TypeId::BOOLEAN_FALSE, boolean_literal(false)),
            (TypeId::BOOLEAN_TRUE, boolean_literal(true)),
            (
                TypeId::BOOLEAN,
                TypeInfo::new(
                    TypeFlags::BOOLEAN | TypeFlags::UNION,
                    TypeData::Union {
                        types: vec![TypeId::BOOLEAN_FALSE, TypeId::BOOLEAN_TRUE],
                        origin: None,
                    },
                ),
            ),
            (TypeId::SYMBOL, intrinsic(TypeFlags::ES_SYMBOL)),
            (TypeId::VOID, intrinsic(TypeFlags::VOID)),
            (TypeId::UNDEFINED, intrinsic(TypeFlags::UNDEFINED)),
            (TypeId::NULL, intrinsic(TypeFlags::NULL)),
            (TypeId::NEVER, intrinsic(TypeFlags::NEVER)),
            (TypeId::OBJECT, intrinsic(TypeFlags::NON_PRIMITIVE)),
            (
                TypeId::EMPTY_OBJECT,
                TypeInfo::new(TypeFlags::OBJECT, TypeData::Object(ObjectType::default()))
                    .with_object_flags(ObjectFlags::ANONYMOUS),
            ),
            (TypeId::INTRINSIC, intrinsic(TypeFlags::empty())),
        ];
        for (expected, info) in seeded {
            let id = self.push(info);
            debug_assert_eq!(id, expected);
        }
        self.interned.insert(
            InternKey::Literal(LiteralValue::Boolean(false), false),
            TypeId::BOOLEAN_FALSE,
        );
        self.interned.insert(
            InternKey::Literal(LiteralValue::Boolean(true), false),
            TypeId::BOOLEAN_TRUE,
        );
        self.interned.insert(
            InternKey::Union(vec![TypeId::BOOLEAN_FALSE, TypeId::BOOLEAN_TRUE]),
            TypeId::BOOLEAN,
        );
    }

    fn push(&self, mut info: TypeInfo) -> TypeId {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let id = TypeId(types.len() as u32);
        info.id = id;
        types.push(Arc::new(info));
        id
    }

    fn intern_with(&self, key: InternKey, make: impl FnOnce() -> TypeInfo) -> TypeId {
        match self.interned.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.push(make());
                entry.insert(id);
                id
            }
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn try_get(&self, id: TypeId) -> Option<Arc<TypeInfo>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0 as usize)
            .cloned()
    }

    /// Type info for `id`; unknown ids resolve to the error type.
    pub fn get(&self, id: TypeId) -> Arc<TypeInfo> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types
            .get(id.0 as usize)
            .or_else(|| types.first())
            .cloned()
            .unwrap_or_else(|| Arc::new(TypeInfo::new(TypeFlags::ANY, TypeData::Intrinsic)))
    }

    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.try_get(id).map(|info| info.data.clone())
    }

    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.get(id).flags
    }

    #[inline]
    pub fn object_flags(&self, id: TypeId) -> ObjectFlags {
        self.get(id).object_flags
    }

    // =========================================================================
    // Fresh allocation
    // =========================================================================

    /// Allocates a type with its own identity.
    pub fn alloc(&self, info: TypeInfo) -> TypeId {
        let id = self.push(info);
        trace!(type_id = id.0, "allocated type");
        id
    }

    /// Reserves an id for a type whose members refer back to it.
    /// The slot holds the error type until [`define`](Self::define) fills it.
    pub fn reserve(&self) -> TypeId {
        self.push(TypeInfo::new(TypeFlags::ANY, TypeData::Intrinsic))
    }

    pub fn define(&self, id: TypeId, mut info: TypeInfo) {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = types.get_mut(id.0 as usize) {
            info.id = id;
            *slot = Arc::new(info);
        }
    }

    pub fn object(&self, members: ObjectType) -> TypeId {
        self.alloc(
            TypeInfo::new(TypeFlags::OBJECT, TypeData::Object(members))
                .with_object_flags(ObjectFlags::ANONYMOUS),
        )
    }

    pub fn type_parameter(&self, info: TypeParamInfo) -> TypeId {
        let symbol = info.symbol;
        let mut type_info = TypeInfo::new(TypeFlags::TYPE_PARAMETER, TypeData::TypeParameter(info));
        type_info.symbol = symbol;
        self.alloc(type_info)
    }

    pub fn unique_symbol(&self, symbol: SymbolId) -> TypeId {
        self.alloc(
            TypeInfo::new(TypeFlags::UNIQUE_ES_SYMBOL, TypeData::UniqueSymbol).with_symbol(symbol),
        )
    }

    /// Allocates an enum member literal. `base` is usually a reserved id later
    /// defined as the enum's union.
    pub fn enum_literal(&self, member: SymbolId, base: TypeId, value: LiteralValue) -> TypeId {
        let flags = TypeFlags::ENUM_LITERAL | literal_flags(&value);
        self.alloc(TypeInfo::new(flags, TypeData::EnumLiteral { base, value }).with_symbol(member))
    }

    pub fn tuple_target(
        &self,
        element_flags: Vec<ElementFlags>,
        labels: Vec<Option<TupleElementLabel>>,
        readonly: bool,
    ) -> TypeId {
        self.alloc(
            TypeInfo::new(
                TypeFlags::OBJECT,
                TypeData::TupleTarget(TupleType {
                    element_flags,
                    readonly,
                    labels,
                }),
            )
            .with_object_flags(ObjectFlags::TUPLE),
        )
    }

    pub fn deferred_reference(
        &self,
        target: TypeId,
        type_arguments: Vec<TypeId>,
        node: NodeIndex,
    ) -> TypeId {
        let object_flags = self.reference_object_flags(target);
        self.alloc(
            TypeInfo::new(
                TypeFlags::OBJECT,
                TypeData::Reference {
                    target,
                    type_arguments,
                    node,
                },
            )
            .with_object_flags(object_flags),
        )
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    pub fn add_signature(&self, signature: Signature) -> SignatureId {
        let mut signatures = self
            .signatures
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let id = SignatureId(signatures.len() as u32);
        signatures.push(Arc::new(signature));
        id
    }

    pub fn signature(&self, id: SignatureId) -> Option<Arc<Signature>> {
        self.signatures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0 as usize)
            .cloned()
    }

    // =========================================================================
    // Interned shapes
    // =========================================================================

    pub fn literal(&self, value: LiteralValue) -> TypeId {
        self.literal_with_freshness(value, false)
    }

    pub fn fresh_literal(&self, value: LiteralValue) -> TypeId {
        self.literal_with_freshness(value, true)
    }

    fn literal_with_freshness(&self, value: LiteralValue, fresh: bool) -> TypeId {
        let flags = literal_flags(&value);
        self.intern_with(InternKey::Literal(value.clone(), fresh), || {
            TypeInfo::new(flags, TypeData::Literal { value, fresh })
        })
    }

    pub fn string_literal(&self, text: &str) -> TypeId {
        self.literal(LiteralValue::String(text.to_string()))
    }

    pub fn number_literal(&self, value: f64) -> TypeId {
        self.literal(LiteralValue::Number(OrderedFloat(value)))
    }

    pub fn bigint_literal(&self, digits: &str) -> TypeId {
        self.literal(LiteralValue::BigInt(digits.to_string()))
    }

    pub fn boolean_literal(&self, value: bool) -> TypeId {
        if value {
            TypeId::BOOLEAN_TRUE
        } else {
            TypeId::BOOLEAN_FALSE
        }
    }

    /// Union with flattening, deduplication, literal reduction and id order.
    pub fn union(&self, types: &[TypeId]) -> TypeId {
        let mut members: SmallVec<[TypeId; 8]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        let mut includes = TypeFlags::empty();
        self.collect_union_members(types, &mut members, &mut seen, &mut includes);

        if includes.contains(TypeFlags::ANY) {
            return TypeId::ANY;
        }
        if includes.contains(TypeFlags::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        if includes.intersects(TypeFlags::STRING | TypeFlags::NUMBER | TypeFlags::BIGINT) {
            members.retain(|member| {
                let flags = self.flags(*member);
                if flags.contains(TypeFlags::ENUM_LITERAL) {
                    return true;
                }
                !(flags.contains(TypeFlags::STRING_LITERAL) && includes.contains(TypeFlags::STRING)
                    || flags.contains(TypeFlags::NUMBER_LITERAL)
                        && includes.contains(TypeFlags::NUMBER)
                    || flags.contains(TypeFlags::BIGINT_LITERAL)
                        && includes.contains(TypeFlags::BIGINT))
            });
        }
        members.sort_unstable();

        match members.len() {
            0 => TypeId::NEVER,
            1 => members[0],
            _ => {
                let types = members.to_vec();
                self.intern_with(InternKey::Union(types.clone()), || {
                    TypeInfo::new(TypeFlags::UNION, TypeData::Union { types, origin: None })
                })
            }
        }
    }

    fn collect_union_members(
        &self,
        types: &[TypeId],
        members: &mut SmallVec<[TypeId; 8]>,
        seen: &mut FxHashSet<TypeId>,
        includes: &mut TypeFlags,
    ) {
        for &type_id in types {
            let info = self.get(type_id);
            if info.has(TypeFlags::UNION) {
                let nested = info.constituents().to_vec();
                self.collect_union_members(&nested, members, seen, includes);
                continue;
            }
            if info.has(TypeFlags::NEVER) {
                continue;
            }
            *includes |= info.flags;
            if seen.insert(type_id) {
                members.push(type_id);
            }
        }
    }

    /// Union that prints as `origin`. Never shares identity with the plain union.
    pub fn union_with_origin(&self, types: &[TypeId], origin: TypeId) -> TypeId {
        let reduced = self.union(types);
        let info = self.get(reduced);
        let TypeData::Union { types, .. } = &info.data else {
            return reduced;
        };
        self.alloc(TypeInfo::new(
            info.flags,
            TypeData::Union {
                types: types.clone(),
                origin: Some(origin),
            },
        ))
    }

    /// Unreduced union, used as the written form of another union.
    pub fn origin_union(&self, types: Vec<TypeId>) -> TypeId {
        self.alloc(TypeInfo::new(
            TypeFlags::UNION,
            TypeData::Union {
                types,
                origin: None,
            },
        ))
    }

    /// Intersection with flattening and deduplication. Constituent order is
    /// preserved.
    pub fn intersection(&self, types: &[TypeId]) -> TypeId {
        let mut members: SmallVec<[TypeId; 8]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        let mut stack: Vec<TypeId> = types.iter().rev().copied().collect();
        while let Some(type_id) = stack.pop() {
            let info = self.get(type_id);
            if info.has(TypeFlags::NEVER) {
                return TypeId::NEVER;
            }
            if info.has(TypeFlags::ANY) {
                return TypeId::ANY;
            }
            if info.has(TypeFlags::UNKNOWN) {
                continue;
            }
            if info.has(TypeFlags::INTERSECTION) {
                stack.extend(info.constituents().iter().rev().copied());
                continue;
            }
            if seen.insert(type_id) {
                members.push(type_id);
            }
        }
        match members.len() {
            0 => TypeId::UNKNOWN,
            1 => members[0],
            _ => {
                let types = members.to_vec();
                self.intern_with(InternKey::Intersection(types.clone()), || {
                    TypeInfo::new(TypeFlags::INTERSECTION, TypeData::Intersection(types))
                })
            }
        }
    }

    pub fn reference(&self, target: TypeId, type_arguments: Vec<TypeId>) -> TypeId {
        let object_flags = self.reference_object_flags(target);
        self.intern_with(
            InternKey::Reference(target, type_arguments.clone()),
            || {
                let mut info = TypeInfo::new(
                    TypeFlags::OBJECT,
                    TypeData::Reference {
                        target,
                        type_arguments,
                        node: NodeIndex::NONE,
                    },
                )
                .with_object_flags(object_flags);
                info.symbol = self.get(target).symbol;
                info
            },
        )
    }

    fn reference_object_flags(&self, target: TypeId) -> ObjectFlags {
        let target_flags = self.object_flags(target);
        ObjectFlags::REFERENCE | (target_flags & (ObjectFlags::TUPLE | ObjectFlags::CLASS_OR_INTERFACE))
    }

    pub fn index(&self, type_id: TypeId) -> TypeId {
        self.intern_with(InternKey::Index(type_id), || {
            TypeInfo::new(TypeFlags::INDEX, TypeData::Index(type_id))
        })
    }

    pub fn indexed_access(&self, object_type: TypeId, index_type: TypeId) -> TypeId {
        self.intern_with(InternKey::IndexedAccess(object_type, index_type), || {
            TypeInfo::new(
                TypeFlags::INDEXED_ACCESS,
                TypeData::IndexedAccess {
                    object_type,
                    index_type,
                },
            )
        })
    }

    /// Template literal type. `texts` has one more entry than `types`.
    pub fn template_literal(&self, texts: Vec<String>, types: Vec<TypeId>) -> TypeId {
        if types.is_empty() {
            return self.string_literal(texts.first().map(String::as_str).unwrap_or(""));
        }
        self.intern_with(
            InternKey::TemplateLiteral(texts.clone(), types.clone()),
            || TypeInfo::new(TypeFlags::TEMPLATE_LITERAL, TypeData::TemplateLiteral { texts, types }),
        )
    }

    pub fn string_mapping(&self, symbol: SymbolId, type_id: TypeId) -> TypeId {
        self.intern_with(InternKey::StringMapping(symbol, type_id), || {
            TypeInfo::new(
                TypeFlags::STRING_MAPPING,
                TypeData::StringMapping { symbol, type_id },
            )
            .with_symbol(symbol)
        })
    }

    pub fn substitution(&self, base_type: TypeId, constraint: TypeId) -> TypeId {
        self.intern_with(InternKey::Substitution(base_type, constraint), || {
            TypeInfo::new(
                TypeFlags::SUBSTITUTION,
                TypeData::Substitution {
                    base_type,
                    constraint,
                },
            )
        })
    }
}

fn literal_flags(value: &LiteralValue) -> TypeFlags {
    match value {
        LiteralValue::String(_) => TypeFlags::STRING_LITERAL,
        LiteralValue::Number(_) => TypeFlags::NUMBER_LITERAL,
        LiteralValue::BigInt(_) => TypeFlags::BIGINT_LITERAL,
        LiteralValue::Boolean(_) => TypeFlags::BOOLEAN_LITERAL,
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
