//! Type representation.
//!
//! Every type is addressed by a [`TypeId`]. Structural shapes (literals,
//! unions, references, indexed accesses, ...) are interned so that equal
//! shapes share an id; identity-bearing shapes (object types, type
//! parameters, conditional and mapped types) are allocated fresh.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use tsz_ast::NodeIndex;
use tsz_binder::SymbolId;

use crate::instantiate::TypeSubstitution;

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Error type. Prints as `any`.
    pub const ERROR: TypeId = TypeId(0);
    pub const ANY: TypeId = TypeId(1);
    pub const UNKNOWN: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    pub const NUMBER: TypeId = TypeId(4);
    pub const BIGINT: TypeId = TypeId(5);
    pub const BOOLEAN_FALSE: TypeId = TypeId(6);
    pub const BOOLEAN_TRUE: TypeId = TypeId(7);
    /// `false | true`
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const SYMBOL: TypeId = TypeId(9);
    pub const VOID: TypeId = TypeId(10);
    pub const UNDEFINED: TypeId = TypeId(11);
    pub const NULL: TypeId = TypeId(12);
    pub const NEVER: TypeId = TypeId(13);
    /// The non-primitive `object` type.
    pub const OBJECT: TypeId = TypeId(14);
    /// `{}` with no members.
    pub const EMPTY_OBJECT: TypeId = TypeId(15);
    /// `intrinsic`, the body of the builtin string mapping aliases.
    pub const INTRINSIC: TypeId = TypeId(16);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 17;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == TypeId::ERROR
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TypeFlags: u32 {
        const ANY = 1 << 0;
        const UNKNOWN = 1 << 1;
        const STRING = 1 << 2;
        const NUMBER = 1 << 3;
        const BOOLEAN = 1 << 4;
        const ENUM = 1 << 5;
        const BIGINT = 1 << 6;
        const STRING_LITERAL = 1 << 7;
        const NUMBER_LITERAL = 1 << 8;
        const BOOLEAN_LITERAL = 1 << 9;
        const ENUM_LITERAL = 1 << 10;
        const BIGINT_LITERAL = 1 << 11;
        const ES_SYMBOL = 1 << 12;
        const UNIQUE_ES_SYMBOL = 1 << 13;
        const VOID = 1 << 14;
        const UNDEFINED = 1 << 15;
        const NULL = 1 << 16;
        const NEVER = 1 << 17;
        const TYPE_PARAMETER = 1 << 18;
        const OBJECT = 1 << 19;
        const UNION = 1 << 20;
        const INTERSECTION = 1 << 21;
        const INDEX = 1 << 22;
        const INDEXED_ACCESS = 1 << 23;
        const CONDITIONAL = 1 << 24;
        const SUBSTITUTION = 1 << 25;
        const NON_PRIMITIVE = 1 << 26;
        const TEMPLATE_LITERAL = 1 << 27;
        const STRING_MAPPING = 1 << 28;

        const LITERAL = Self::STRING_LITERAL.bits()
            | Self::NUMBER_LITERAL.bits()
            | Self::BIGINT_LITERAL.bits()
            | Self::BOOLEAN_LITERAL.bits();
        const NULLABLE = Self::UNDEFINED.bits() | Self::NULL.bits();
        const ENUM_LIKE = Self::ENUM.bits() | Self::ENUM_LITERAL.bits();
        const UNION_OR_INTERSECTION = Self::UNION.bits() | Self::INTERSECTION.bits();
        const STRING_LIKE = Self::STRING.bits()
            | Self::STRING_LITERAL.bits()
            | Self::TEMPLATE_LITERAL.bits()
            | Self::STRING_MAPPING.bits();
        const INSTANTIABLE_NON_PRIMITIVE = Self::TYPE_PARAMETER.bits()
            | Self::INDEXED_ACCESS.bits()
            | Self::CONDITIONAL.bits()
            | Self::SUBSTITUTION.bits();
        const INSTANTIABLE_PRIMITIVE = Self::INDEX.bits()
            | Self::TEMPLATE_LITERAL.bits()
            | Self::STRING_MAPPING.bits();
        const INSTANTIABLE = Self::INSTANTIABLE_NON_PRIMITIVE.bits()
            | Self::INSTANTIABLE_PRIMITIVE.bits();
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u32 {
        const CLASS = 1 << 0;
        const INTERFACE = 1 << 1;
        const REFERENCE = 1 << 2;
        const TUPLE = 1 << 3;
        const ANONYMOUS = 1 << 4;
        const MAPPED = 1 << 5;
        const INSTANTIATED = 1 << 6;
        const OBJECT_LITERAL = 1 << 7;
        const REVERSE_MAPPED = 1 << 10;
        const JS_LITERAL = 1 << 12;
        const FRESH_LITERAL = 1 << 13;
        const ARRAY_LITERAL = 1 << 14;

        const CLASS_OR_INTERFACE = Self::CLASS.bits() | Self::INTERFACE.bits();
    }
}

/// Property check flags.
pub mod check_flags {
    pub const NONE: u32 = 0;
    pub const READONLY: u32 = 1 << 3;
    pub const LATE: u32 = 1 << 12;
    pub const REVERSE_MAPPED: u32 = 1 << 13;
    pub const MAPPED: u32 = 1 << 18;
}

/// An `f64` with bitwise equality so literal numbers can be interned.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralValue {
    String(String),
    Number(OrderedFloat),
    /// Decimal digits, with a leading `-` when negative.
    BigInt(String),
    Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Reverse-mapping links of a property synthesized by inference from a
/// homomorphic mapped type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReverseMappedInfo {
    /// Source property type the reverse mapping was inferred from.
    pub property_type: TypeId,
    /// Mapped type being reversed.
    pub mapped_type: TypeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyInfo {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub type_id: TypeId,
    /// Setter type when it differs from the getter type.
    pub write_type: Option<TypeId>,
    pub optional: bool,
    pub readonly: bool,
    pub is_method: bool,
    pub is_accessor: bool,
    pub visibility: Visibility,
    pub check_flags: u32,
    /// Unique symbol type naming a late-bound property.
    pub name_type: Option<TypeId>,
    pub reverse_mapped: Option<ReverseMappedInfo>,
    pub declaration: NodeIndex,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        PropertyInfo {
            name: name.into(),
            symbol: None,
            type_id,
            write_type: None,
            optional: false,
            readonly: false,
            is_method: false,
            is_accessor: false,
            visibility: Visibility::Public,
            check_flags: check_flags::NONE,
            name_type: None,
            reverse_mapped: None,
            declaration: NodeIndex::NONE,
        }
    }

    #[inline]
    pub fn is_late_bound(&self) -> bool {
        self.check_flags & check_flags::LATE != 0
    }

    #[inline]
    pub fn is_reverse_mapped(&self) -> bool {
        self.check_flags & check_flags::REVERSE_MAPPED != 0 && self.reverse_mapped.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignatureId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
    pub declaration: NodeIndex,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        ParamInfo {
            name: name.into(),
            symbol: None,
            type_id,
            optional: false,
            rest: false,
            declaration: NodeIndex::NONE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypePredicate {
    pub asserts: bool,
    /// `None` for `this is T`.
    pub parameter_name: Option<String>,
    pub type_id: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub declaration: NodeIndex,
    pub type_parameters: Vec<TypeId>,
    pub this_parameter: Option<ParamInfo>,
    pub parameters: Vec<ParamInfo>,
    pub return_type: TypeId,
    pub type_predicate: Option<TypePredicate>,
    pub is_abstract: bool,
}

impl Signature {
    pub fn new(parameters: Vec<ParamInfo>, return_type: TypeId) -> Self {
        Signature {
            declaration: NodeIndex::NONE,
            type_parameters: Vec::new(),
            this_parameter: None,
            parameters,
            return_type,
            type_predicate: None,
            is_abstract: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexInfo {
    pub key_type: TypeId,
    pub type_id: TypeId,
    pub is_readonly: bool,
    pub declaration: NodeIndex,
}

/// Resolved members of an object type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectType {
    pub properties: Vec<PropertyInfo>,
    pub call_signatures: Vec<SignatureId>,
    pub construct_signatures: Vec<SignatureId>,
    pub index_infos: Vec<IndexInfo>,
}

impl ObjectType {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.index_infos.is_empty()
    }
}

/// Declared shape of a class or interface. References instantiate it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterfaceType {
    pub type_parameters: Vec<TypeId>,
    pub this_type: Option<TypeId>,
    pub members: ObjectType,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        const REQUIRED = 1 << 0;
        const OPTIONAL = 1 << 1;
        const REST = 1 << 2;
        const VARIADIC = 1 << 3;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TupleElementLabel {
    pub name: String,
    pub declaration: NodeIndex,
}

/// Generic target shared by tuple references of the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleType {
    pub element_flags: Vec<ElementFlags>,
    pub readonly: bool,
    pub labels: Vec<Option<TupleElementLabel>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeParamInfo {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
    pub is_const: bool,
    /// Polymorphic `this` of a class or interface.
    pub is_this: bool,
}

impl TypeParamInfo {
    pub fn new(name: impl Into<String>) -> Self {
        TypeParamInfo {
            name: name.into(),
            symbol: None,
            constraint: None,
            default: None,
            is_const: false,
            is_this: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalRoot {
    pub node: NodeIndex,
    pub check_type: TypeId,
    pub extends_type: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
    pub is_distributive: bool,
    pub infer_type_parameters: Vec<TypeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalType {
    pub root: ConditionalRoot,
    pub check_type: TypeId,
    pub extends_type: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
    /// Substitution that produced this instantiation from `root`.
    pub mapper: Option<TypeSubstitution>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MappedModifier {
    #[default]
    None,
    Add,
    Remove,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MappedType {
    pub declaration: NodeIndex,
    pub type_parameter: TypeId,
    pub constraint_type: TypeId,
    pub name_type: Option<TypeId>,
    pub template_type: Option<TypeId>,
    pub readonly_modifier: MappedModifier,
    pub optional_modifier: MappedModifier,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeData {
    Intrinsic,
    Literal {
        value: LiteralValue,
        fresh: bool,
    },
    /// Member of an enum. `base` is the enum's union type.
    EnumLiteral {
        base: TypeId,
        value: LiteralValue,
    },
    UniqueSymbol,
    TypeParameter(TypeParamInfo),
    Union {
        types: Vec<TypeId>,
        /// Written form to print in place of the reduced member list.
        origin: Option<TypeId>,
    },
    Intersection(Vec<TypeId>),
    Object(ObjectType),
    ClassOrInterface(InterfaceType),
    TupleTarget(TupleType),
    Reference {
        target: TypeId,
        type_arguments: Vec<TypeId>,
        /// Type node of a deferred reference.
        node: NodeIndex,
    },
    Index(TypeId),
    IndexedAccess {
        object_type: TypeId,
        index_type: TypeId,
    },
    Conditional(ConditionalType),
    Mapped(MappedType),
    TemplateLiteral {
        texts: Vec<String>,
        types: Vec<TypeId>,
    },
    StringMapping {
        symbol: SymbolId,
        type_id: TypeId,
    },
    Substitution {
        base_type: TypeId,
        constraint: TypeId,
    },
}

/// An interned type with its flags and naming links.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeInfo {
    pub id: TypeId,
    pub flags: TypeFlags,
    pub object_flags: ObjectFlags,
    pub symbol: Option<SymbolId>,
    pub alias_symbol: Option<SymbolId>,
    pub alias_type_arguments: Vec<TypeId>,
    pub data: TypeData,
}

impl TypeInfo {
    pub fn new(flags: TypeFlags, data: TypeData) -> Self {
        TypeInfo {
            id: TypeId::ERROR,
            flags,
            object_flags: ObjectFlags::empty(),
            symbol: None,
            alias_symbol: None,
            alias_type_arguments: Vec::new(),
            data,
        }
    }

    pub fn with_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn with_object_flags(mut self, flags: ObjectFlags) -> Self {
        self.object_flags |= flags;
        self
    }

    pub fn with_alias(mut self, alias: SymbolId, args: Vec<TypeId>) -> Self {
        self.alias_symbol = Some(alias);
        self.alias_type_arguments = args;
        self
    }

    #[inline]
    pub fn has(&self, flags: TypeFlags) -> bool {
        self.flags.intersects(flags)
    }

    #[inline]
    pub fn has_object_flags(&self, flags: ObjectFlags) -> bool {
        self.object_flags.intersects(flags)
    }

    /// Union members or intersection constituents.
    pub fn constituents(&self) -> &[TypeId] {
        match &self.data {
            TypeData::Union { types, .. } => types,
            TypeData::Intersection(types) => types,
            _ => &[],
        }
    }
}

/// Structural key for interned shapes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum InternKey {
    Literal(LiteralValue, bool),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Reference(TypeId, Vec<TypeId>),
    Index(TypeId),
    IndexedAccess(TypeId, TypeId),
    TemplateLiteral(Vec<String>, Vec<TypeId>),
    StringMapping(SymbolId, TypeId),
    Substitution(TypeId, TypeId),
}
