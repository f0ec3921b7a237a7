//! Synthesized type syntax.
//!
//! The node builder produces owned trees of these values. They have no parent
//! links and no source positions: a reused annotation is cloned into this
//! shape, and a cache hit is a plain `clone()`.
//!
//! # Design
//!
//! Each variant maps one-to-one onto a TypeScript type-syntax form. Variants
//! hold `Box<TypeNode>` for single children and `Vec<TypeNode>` for lists so
//! the tree can be built, cloned and compared structurally.

use serde::{Deserialize, Serialize};

// =============================================================================
// Names
// =============================================================================

/// `A` or `A.B.C`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityName {
    Identifier(String),
    Qualified(Box<EntityName>, String),
}

impl EntityName {
    pub fn ident(text: impl Into<String>) -> Self {
        EntityName::Identifier(text.into())
    }

    /// Build from segments; an empty slice yields an empty identifier.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let mut iter = segments.iter();
        let first = iter.next().map(|s| s.as_ref().to_string()).unwrap_or_default();
        iter.fold(EntityName::Identifier(first), |left, right| {
            EntityName::Qualified(Box::new(left), right.as_ref().to_string())
        })
    }

    /// Rightmost segment.
    pub fn last(&self) -> &str {
        match self {
            EntityName::Identifier(text) => text,
            EntityName::Qualified(_, right) => right,
        }
    }

    pub fn text(&self) -> String {
        match self {
            EntityName::Identifier(text) => text.clone(),
            EntityName::Qualified(left, right) => format!("{}.{right}", left.text()),
        }
    }
}

/// Name of a property or method in a type literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyName {
    Identifier(String),
    StringLiteral { text: String, single_quote: bool },
    NumericLiteral(String),
    PrivateIdentifier(String),
    /// `[expr]` where `expr` is an entity-name expression such as `Symbol.iterator`.
    Computed(EntityName),
}

impl PropertyName {
    pub fn text(&self) -> String {
        match self {
            PropertyName::Identifier(text)
            | PropertyName::NumericLiteral(text)
            | PropertyName::PrivateIdentifier(text) => text.clone(),
            PropertyName::StringLiteral { text, .. } => text.clone(),
            PropertyName::Computed(name) => format!("[{}]", name.text()),
        }
    }
}

// =============================================================================
// Literals and keywords
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordTypeKind {
    Any,
    Unknown,
    String,
    Number,
    BigInt,
    Boolean,
    Symbol,
    Object,
    Void,
    Undefined,
    Never,
    Intrinsic,
}

impl KeywordTypeKind {
    pub const fn text(self) -> &'static str {
        match self {
            KeywordTypeKind::Any => "any",
            KeywordTypeKind::Unknown => "unknown",
            KeywordTypeKind::String => "string",
            KeywordTypeKind::Number => "number",
            KeywordTypeKind::BigInt => "bigint",
            KeywordTypeKind::Boolean => "boolean",
            KeywordTypeKind::Symbol => "symbol",
            KeywordTypeKind::Object => "object",
            KeywordTypeKind::Void => "void",
            KeywordTypeKind::Undefined => "undefined",
            KeywordTypeKind::Never => "never",
            KeywordTypeKind::Intrinsic => "intrinsic",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralNode {
    String { text: String, single_quote: bool },
    /// Numeric text without sign.
    Number(String),
    /// BigInt digits without the `n` suffix.
    BigInt(String),
    True,
    False,
    Null,
    /// `-1`, `-1n`.
    Negative(Box<LiteralNode>),
}

// =============================================================================
// Declarations inside types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Readonly,
    Static,
    Abstract,
    Async,
    Export,
    Declare,
    Override,
    Const,
    In,
    Out,
}

impl Modifier {
    pub const fn text(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Readonly => "readonly",
            Modifier::Static => "static",
            Modifier::Abstract => "abstract",
            Modifier::Async => "async",
            Modifier::Export => "export",
            Modifier::Declare => "declare",
            Modifier::Override => "override",
            Modifier::Const => "const",
            Modifier::In => "in",
            Modifier::Out => "out",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameterDeclaration {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub constraint: Option<Box<TypeNode>>,
    pub default: Option<Box<TypeNode>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub modifiers: Vec<Modifier>,
    pub dot_dot_dot: bool,
    pub name: String,
    pub question: bool,
    pub type_node: Option<TypeNode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureKind {
    FunctionType,
    ConstructorType,
    CallSignature,
    ConstructSignature,
    MethodSignature,
    GetAccessor,
    SetAccessor,
    FunctionDeclaration,
    MethodDeclaration,
    ArrowFunction,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureDeclaration {
    pub kind: SignatureKind,
    pub modifiers: Vec<Modifier>,
    pub name: Option<PropertyName>,
    pub question: bool,
    pub type_parameters: Vec<TypeParameterDeclaration>,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: Option<TypeNode>,
}

impl SignatureDeclaration {
    pub fn new(kind: SignatureKind) -> Self {
        SignatureDeclaration {
            kind,
            modifiers: Vec::new(),
            name: None,
            question: false,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
        }
    }
}

/// A member of a type literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeElement {
    Property {
        readonly: bool,
        name: PropertyName,
        question: bool,
        /// `None` for the `... N more ...` marker.
        type_node: Option<TypeNode>,
    },
    /// Method, call, construct and accessor signatures.
    Signature(SignatureDeclaration),
    Index {
        readonly: bool,
        parameter_name: String,
        key_type: TypeNode,
        type_node: TypeNode,
    },
}

/// One element of a tuple type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TupleMember {
    Plain(TypeNode),
    Optional(TypeNode),
    Rest(TypeNode),
    Named {
        dot_dot_dot: bool,
        name: String,
        question: bool,
        type_node: TypeNode,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeOperatorKind {
    KeyOf,
    Unique,
    Readonly,
}

/// `readonly`/`?` token on a mapped type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappedModifierToken {
    Plain,
    Plus,
    Minus,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateLiteralSpan {
    pub type_node: TypeNode,
    pub literal: String,
}

// =============================================================================
// Type nodes
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeNode {
    Keyword(KeywordTypeKind),
    This,
    Literal(LiteralNode),
    /// `A.B<T>`. The elision placeholder is a reference named `...`.
    Reference {
        name: EntityName,
        type_arguments: Vec<TypeNode>,
    },
    /// `import("mod").A.B<T>`, optionally `typeof import("mod")`.
    Import {
        argument: String,
        qualifier: Option<EntityName>,
        type_arguments: Vec<TypeNode>,
        is_type_of: bool,
    },
    /// `typeof a.b<T>`.
    Query {
        expr_name: EntityName,
        type_arguments: Vec<TypeNode>,
    },
    Array(Box<TypeNode>),
    Tuple(Vec<TupleMember>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Operator {
        operator: TypeOperatorKind,
        type_node: Box<TypeNode>,
    },
    IndexedAccess {
        object_type: Box<TypeNode>,
        index_type: Box<TypeNode>,
    },
    Conditional {
        check_type: Box<TypeNode>,
        extends_type: Box<TypeNode>,
        true_type: Box<TypeNode>,
        false_type: Box<TypeNode>,
    },
    Infer(Box<TypeParameterDeclaration>),
    Mapped {
        readonly_token: Option<MappedModifierToken>,
        type_parameter: Box<TypeParameterDeclaration>,
        name_type: Option<Box<TypeNode>>,
        question_token: Option<MappedModifierToken>,
        type_node: Option<Box<TypeNode>>,
    },
    TypeLiteral(Vec<TypeElement>),
    /// Function and constructor types.
    Function(Box<SignatureDeclaration>),
    TemplateLiteral {
        head: String,
        spans: Vec<TemplateLiteralSpan>,
    },
    Predicate {
        asserts: bool,
        parameter_name: String,
        type_node: Option<Box<TypeNode>>,
    },
    Parenthesized(Box<TypeNode>),
}

impl TypeNode {
    /// Whether this is the `...` elision placeholder.
    pub fn is_elided_placeholder(&self) -> bool {
        matches!(self, TypeNode::Reference { name: EntityName::Identifier(text), type_arguments } if text == "..." && type_arguments.is_empty())
    }
}
