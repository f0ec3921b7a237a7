//! Syntax-only type descriptions.
//!
//! A [`PseudoType`] describes the type of a declaration or expression using
//! only the source tree. Variants that cannot be described syntactically
//! point back at the node the real checker must be asked about.

use tsz_ast::NodeIndex;

#[derive(Clone, Debug, PartialEq)]
pub enum PseudoType {
    /// The written type annotation.
    Direct(NodeIndex),
    /// An expression whose type needs full inference.
    Inferred(NodeIndex),
    /// A declaration with nothing syntactic to go on.
    NoResult(NodeIndex),
    /// A literal whose type depends on whether it sits in a const context.
    MaybeConstLocation {
        node: NodeIndex,
        const_type: Box<PseudoType>,
        regular_type: Box<PseudoType>,
    },
    Union(Vec<PseudoType>),
    Undefined,
    Null,
    Any,
    String,
    Number,
    BigInt,
    Boolean,
    False,
    True,
    Void,
    SingleCallSignature(Box<PseudoSignature>),
    /// Elements of a const-context array literal.
    Tuple(Vec<PseudoType>),
    ObjectLiteral(Vec<PseudoObjectElement>),
    /// A string, numeric or bigint literal expression, possibly negated.
    Literal(NodeIndex),
}

impl PseudoType {
    pub fn maybe_const(node: NodeIndex, const_type: PseudoType, regular_type: PseudoType) -> Self {
        PseudoType::MaybeConstLocation {
            node,
            const_type: Box::new(const_type),
            regular_type: Box::new(regular_type),
        }
    }

    /// Whether the caller must fall back to the real checker.
    pub fn is_unanalyzable(&self) -> bool {
        matches!(self, PseudoType::Inferred(_) | PseudoType::NoResult(_))
    }

    /// The literal variant of a primitive `MaybeConstLocation`, used where the
    /// declaration itself keeps literal types.
    pub fn const_variant(self) -> PseudoType {
        match self {
            PseudoType::MaybeConstLocation { const_type, .. }
                if matches!(
                    *const_type,
                    PseudoType::Literal(_) | PseudoType::True | PseudoType::False
                ) =>
            {
                *const_type
            }
            other => other,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PseudoParameter {
    pub declaration: NodeIndex,
    /// Name node of the parameter.
    pub name: NodeIndex,
    pub rest: bool,
    pub optional: bool,
    pub type_: PseudoType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PseudoSignature {
    pub declaration: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub parameters: Vec<PseudoParameter>,
    pub return_type: PseudoType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PseudoObjectElementKind {
    Property {
        readonly: bool,
        type_: PseudoType,
    },
    Method(PseudoSignature),
    /// Separately annotated accessors are kept apart.
    GetAccessor(PseudoType),
    SetAccessor(PseudoParameter),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PseudoObjectElement {
    /// Member declaration the element came from.
    pub declaration: NodeIndex,
    /// Name node: identifier, string or numeric literal, or a computed name
    /// wrapping a literal.
    pub name: NodeIndex,
    pub optional: bool,
    pub kind: PseudoObjectElementKind,
}
