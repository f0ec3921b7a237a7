//! Constructors for synthesized nodes.

use crate::synth::*;
use crate::text::{is_identifier_text, is_numeric_literal_name};

pub fn keyword(kind: KeywordTypeKind) -> TypeNode {
    TypeNode::Keyword(kind)
}

pub fn type_reference(name: EntityName, type_arguments: Vec<TypeNode>) -> TypeNode {
    TypeNode::Reference {
        name,
        type_arguments,
    }
}

/// Reference to a bare identifier with no type arguments.
pub fn identifier_reference(text: impl Into<String>) -> TypeNode {
    type_reference(EntityName::Identifier(text.into()), Vec::new())
}

/// The `...` node substituted for elided structure.
pub fn elided_placeholder() -> TypeNode {
    identifier_reference("...")
}

pub fn string_literal_type(text: impl Into<String>, single_quote: bool) -> TypeNode {
    TypeNode::Literal(LiteralNode::String {
        text: text.into(),
        single_quote,
    })
}

/// Numeric literal type; negative values get a prefix minus.
pub fn number_literal_type(text: &str) -> TypeNode {
    match text.strip_prefix('-') {
        Some(rest) => TypeNode::Literal(LiteralNode::Negative(Box::new(LiteralNode::Number(
            rest.to_string(),
        )))),
        None => TypeNode::Literal(LiteralNode::Number(text.to_string())),
    }
}

pub fn bigint_literal_type(text: &str) -> TypeNode {
    let digits = text.trim_end_matches('n');
    match digits.strip_prefix('-') {
        Some(rest) => TypeNode::Literal(LiteralNode::Negative(Box::new(LiteralNode::BigInt(
            rest.to_string(),
        )))),
        None => TypeNode::Literal(LiteralNode::BigInt(digits.to_string())),
    }
}

pub fn union(types: Vec<TypeNode>) -> TypeNode {
    TypeNode::Union(types)
}

pub fn intersection(types: Vec<TypeNode>) -> TypeNode {
    TypeNode::Intersection(types)
}

pub fn array(element: TypeNode) -> TypeNode {
    TypeNode::Array(Box::new(element))
}

pub fn type_operator(operator: TypeOperatorKind, type_node: TypeNode) -> TypeNode {
    TypeNode::Operator {
        operator,
        type_node: Box::new(type_node),
    }
}

pub fn indexed_access(object_type: TypeNode, index_type: TypeNode) -> TypeNode {
    TypeNode::IndexedAccess {
        object_type: Box::new(object_type),
        index_type: Box::new(index_type),
    }
}

pub fn conditional(
    check_type: TypeNode,
    extends_type: TypeNode,
    true_type: TypeNode,
    false_type: TypeNode,
) -> TypeNode {
    TypeNode::Conditional {
        check_type: Box::new(check_type),
        extends_type: Box::new(extends_type),
        true_type: Box::new(true_type),
        false_type: Box::new(false_type),
    }
}

pub fn type_query(expr_name: EntityName, type_arguments: Vec<TypeNode>) -> TypeNode {
    TypeNode::Query {
        expr_name,
        type_arguments,
    }
}

pub fn type_parameter(name: impl Into<String>) -> TypeParameterDeclaration {
    TypeParameterDeclaration {
        modifiers: Vec::new(),
        name: name.into(),
        constraint: None,
        default: None,
    }
}

pub fn parameter(name: impl Into<String>, type_node: Option<TypeNode>) -> ParameterDeclaration {
    ParameterDeclaration {
        modifiers: Vec::new(),
        dot_dot_dot: false,
        name: name.into(),
        question: false,
        type_node,
    }
}

pub fn property_signature(
    readonly: bool,
    name: PropertyName,
    question: bool,
    type_node: Option<TypeNode>,
) -> TypeElement {
    TypeElement::Property {
        readonly,
        name,
        question,
        type_node,
    }
}

/// Property name for `text`: a bare identifier when valid, a numeric literal
/// for canonical numbers, otherwise a quoted string.
pub fn property_name_from_text(text: &str, single_quote: bool) -> PropertyName {
    if is_identifier_text(text) {
        PropertyName::Identifier(text.to_string())
    } else if is_numeric_literal_name(text) {
        PropertyName::NumericLiteral(text.to_string())
    } else if let Some(private) = text.strip_prefix('#') {
        if is_identifier_text(private) {
            PropertyName::PrivateIdentifier(text.to_string())
        } else {
            PropertyName::StringLiteral {
                text: text.to_string(),
                single_quote,
            }
        }
    } else {
        PropertyName::StringLiteral {
            text: text.to_string(),
            single_quote,
        }
    }
}
