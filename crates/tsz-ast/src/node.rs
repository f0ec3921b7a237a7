//! Source tree nodes.
//!
//! A [`Node`] is a kind, a flag set, a parent link and a payload. Payloads are
//! grouped by shape: several kinds share one payload when they carry the same
//! fields (every function-like kind uses [`FunctionData`], `as`/`satisfies`/
//! `<T>x` share [`NodeData::Assertion`], and so on).

use smallvec::SmallVec;

use crate::base::NodeIndex;
use crate::syntax_kind::SyntaxKind;

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    pub flags: u32,
    pub parent: NodeIndex,
    pub data: NodeData,
}

#[derive(Clone, Debug, Default)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: Vec<NodeIndex>,
    /// Module specifier other files use to import this one. `Some` marks the
    /// file as an external module.
    pub module_specifier: Option<String>,
    pub is_declaration_file: bool,
}

#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
    pub single_quote: bool,
}

#[derive(Clone, Debug)]
pub struct TemplateSpan {
    /// Expression (template expression) or type (template literal type).
    pub node: NodeIndex,
    pub literal: String,
}

#[derive(Clone, Debug)]
pub struct TemplateData {
    pub head: String,
    pub spans: Vec<TemplateSpan>,
}

/// Payload of every function-like kind, from declarations to function types.
#[derive(Clone, Debug, Default)]
pub struct FunctionData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub parameters: Vec<NodeIndex>,
    /// Return type annotation (or the type of a function type).
    pub type_annotation: NodeIndex,
    /// `Block` or, for arrow functions, a concise expression body.
    pub body: NodeIndex,
    pub asterisk: bool,
    pub question: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterData {
    pub modifiers: u32,
    pub dot_dot_dot: bool,
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct TypeParameterData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Class declarations and class expressions.
#[derive(Clone, Debug, Default)]
pub struct ClassData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

/// Interfaces share the class shape minus a runtime value.
pub type InterfaceData = ClassData;

#[derive(Clone, Debug, Default)]
pub struct TypeAliasData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: Vec<NodeIndex>,
    pub type_node: NodeIndex,
}

/// Property signatures and property declarations.
#[derive(Clone, Debug, Default)]
pub struct PropertyData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct MappedTypeData {
    /// `ReadonlyKeyword`, `PlusToken`, `MinusToken` or `Unknown` for none.
    pub readonly_token: SyntaxKind,
    pub type_parameter: NodeIndex,
    pub name_type: NodeIndex,
    /// `QuestionToken`, `PlusToken`, `MinusToken` or `Unknown` for none.
    pub question_token: SyntaxKind,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub enum NodeData {
    /// Tokens, keyword types and keyword expressions.
    None,
    SourceFile(SourceFileData),
    Identifier {
        text: String,
    },
    QualifiedName {
        left: NodeIndex,
        right: NodeIndex,
    },
    ComputedPropertyName {
        expression: NodeIndex,
    },
    Literal(LiteralData),
    /// Template expressions and template literal types.
    Template(TemplateData),
    PrefixUnary {
        operator: SyntaxKind,
        operand: NodeIndex,
    },
    ObjectLiteral {
        properties: Vec<NodeIndex>,
    },
    ArrayLiteral {
        elements: Vec<NodeIndex>,
    },
    PropertyAssignment {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    ShorthandPropertyAssignment {
        name: NodeIndex,
    },
    /// Spread elements and spread assignments.
    Spread {
        expression: NodeIndex,
    },
    /// Call and `new` expressions.
    Call {
        expression: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    PropertyAccess {
        expression: NodeIndex,
        name: NodeIndex,
    },
    ElementAccess {
        expression: NodeIndex,
        argument: NodeIndex,
    },
    /// `x as T`, `<T>x`, `x satisfies T`.
    Assertion {
        expression: NodeIndex,
        type_node: NodeIndex,
    },
    /// Parenthesized expressions and parenthesized types.
    Parenthesized {
        inner: NodeIndex,
    },
    Function(FunctionData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    VariableStatement {
        modifiers: u32,
        declaration_list: NodeIndex,
    },
    /// `let`/`const` is recorded in the node flags.
    VariableDeclarationList {
        declarations: Vec<NodeIndex>,
    },
    VariableDeclaration(VariableDeclarationData),
    /// Blocks and module blocks.
    Block {
        statements: Vec<NodeIndex>,
    },
    Return {
        expression: NodeIndex,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
    Class(ClassData),
    Interface(InterfaceData),
    TypeAlias(TypeAliasData),
    Enum {
        modifiers: u32,
        name: NodeIndex,
        members: Vec<NodeIndex>,
    },
    EnumMember {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    Module {
        modifiers: u32,
        name: NodeIndex,
        body: NodeIndex,
    },
    Property(PropertyData),
    IndexSignature {
        modifiers: u32,
        parameters: Vec<NodeIndex>,
        type_annotation: NodeIndex,
    },
    TypeReference {
        type_name: NodeIndex,
        type_arguments: Vec<NodeIndex>,
    },
    ArrayType {
        element_type: NodeIndex,
    },
    Tuple {
        elements: Vec<NodeIndex>,
    },
    NamedTupleMember {
        dot_dot_dot: bool,
        name: NodeIndex,
        question: bool,
        type_node: NodeIndex,
    },
    /// Optional and rest tuple elements plus the JSDoc postfix/prefix forms
    /// (`?T`, `!T`, `T=`, `...T`).
    TypeWrapper {
        type_node: NodeIndex,
    },
    /// Union and intersection types.
    Composite {
        types: Vec<NodeIndex>,
    },
    LiteralType {
        literal: NodeIndex,
    },
    TypeLiteral {
        members: Vec<NodeIndex>,
    },
    TypeQuery {
        expr_name: NodeIndex,
        type_arguments: Vec<NodeIndex>,
    },
    TypeOperator {
        operator: SyntaxKind,
        type_node: NodeIndex,
    },
    IndexedAccess {
        object_type: NodeIndex,
        index_type: NodeIndex,
    },
    Conditional {
        check_type: NodeIndex,
        extends_type: NodeIndex,
        true_type: NodeIndex,
        false_type: NodeIndex,
    },
    Infer {
        type_parameter: NodeIndex,
    },
    Mapped(MappedTypeData),
    ImportType {
        argument: String,
        qualifier: NodeIndex,
        type_arguments: Vec<NodeIndex>,
        is_type_of: bool,
    },
    TypePredicate {
        asserts: bool,
        parameter_name: NodeIndex,
        type_node: NodeIndex,
    },
    JSDocTypeLiteral {
        property_tags: Vec<NodeIndex>,
        is_array_type: bool,
    },
    JSDocPropertyTag {
        name: NodeIndex,
        type_expression: NodeIndex,
        is_bracketed: bool,
    },
}

impl NodeData {
    /// Direct children in source order, skipping absent slots.
    pub fn children(&self) -> SmallVec<[NodeIndex; 8]> {
        let mut out: SmallVec<[NodeIndex; 8]> = SmallVec::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match self {
            NodeData::None | NodeData::Identifier { .. } | NodeData::Literal(_) => {}
            NodeData::SourceFile(data) => data.statements.iter().copied().for_each(&mut push),
            NodeData::QualifiedName { left, right } => {
                push(*left);
                push(*right);
            }
            NodeData::ComputedPropertyName { expression }
            | NodeData::Spread { expression }
            | NodeData::Return { expression }
            | NodeData::ExpressionStatement { expression } => push(*expression),
            NodeData::Template(data) => data.spans.iter().for_each(|s| push(s.node)),
            NodeData::PrefixUnary { operand, .. } => push(*operand),
            NodeData::ObjectLiteral { properties } => properties.iter().copied().for_each(&mut push),
            NodeData::ArrayLiteral { elements } | NodeData::Tuple { elements } => {
                elements.iter().copied().for_each(&mut push)
            }
            NodeData::PropertyAssignment { name, initializer }
            | NodeData::EnumMember { name, initializer } => {
                push(*name);
                push(*initializer);
            }
            NodeData::ShorthandPropertyAssignment { name } => push(*name),
            NodeData::Call {
                expression,
                arguments,
            } => {
                push(*expression);
                arguments.iter().copied().for_each(&mut push);
            }
            NodeData::PropertyAccess { expression, name } => {
                push(*expression);
                push(*name);
            }
            NodeData::ElementAccess {
                expression,
                argument,
            } => {
                push(*expression);
                push(*argument);
            }
            NodeData::Assertion {
                expression,
                type_node,
            } => {
                push(*expression);
                push(*type_node);
            }
            NodeData::Parenthesized { inner } => push(*inner),
            NodeData::Function(data) => {
                push(data.name);
                data.type_parameters.iter().copied().for_each(&mut push);
                data.parameters.iter().copied().for_each(&mut push);
                push(data.type_annotation);
                push(data.body);
            }
            NodeData::Parameter(data) => {
                push(data.name);
                push(data.type_annotation);
                push(data.initializer);
            }
            NodeData::TypeParameter(data) => {
                push(data.name);
                push(data.constraint);
                push(data.default);
            }
            NodeData::VariableStatement {
                declaration_list, ..
            } => push(*declaration_list),
            NodeData::VariableDeclarationList { declarations } => {
                declarations.iter().copied().for_each(&mut push)
            }
            NodeData::VariableDeclaration(data) => {
                push(data.name);
                push(data.type_annotation);
                push(data.initializer);
            }
            NodeData::Block { statements } => statements.iter().copied().for_each(&mut push),
            NodeData::Class(data) | NodeData::Interface(data) => {
                push(data.name);
                data.type_parameters.iter().copied().for_each(&mut push);
                data.members.iter().copied().for_each(&mut push);
            }
            NodeData::TypeAlias(data) => {
                push(data.name);
                data.type_parameters.iter().copied().for_each(&mut push);
                push(data.type_node);
            }
            NodeData::Enum { name, members, .. } => {
                push(*name);
                members.iter().copied().for_each(&mut push);
            }
            NodeData::Module { name, body, .. } => {
                push(*name);
                push(*body);
            }
            NodeData::Property(data) => {
                push(data.name);
                push(data.type_annotation);
                push(data.initializer);
            }
            NodeData::IndexSignature {
                parameters,
                type_annotation,
                ..
            } => {
                parameters.iter().copied().for_each(&mut push);
                push(*type_annotation);
            }
            NodeData::TypeReference {
                type_name,
                type_arguments,
            } => {
                push(*type_name);
                type_arguments.iter().copied().for_each(&mut push);
            }
            NodeData::ArrayType { element_type } => push(*element_type),
            NodeData::NamedTupleMember {
                name, type_node, ..
            } => {
                push(*name);
                push(*type_node);
            }
            NodeData::TypeWrapper { type_node } | NodeData::TypeOperator { type_node, .. } => {
                push(*type_node)
            }
            NodeData::Composite { types } => types.iter().copied().for_each(&mut push),
            NodeData::LiteralType { literal } => push(*literal),
            NodeData::TypeLiteral { members } => members.iter().copied().for_each(&mut push),
            NodeData::TypeQuery {
                expr_name,
                type_arguments,
            } => {
                push(*expr_name);
                type_arguments.iter().copied().for_each(&mut push);
            }
            NodeData::IndexedAccess {
                object_type,
                index_type,
            } => {
                push(*object_type);
                push(*index_type);
            }
            NodeData::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                push(*check_type);
                push(*extends_type);
                push(*true_type);
                push(*false_type);
            }
            NodeData::Infer { type_parameter } => push(*type_parameter),
            NodeData::Mapped(data) => {
                push(data.type_parameter);
                push(data.name_type);
                push(data.type_node);
            }
            NodeData::ImportType {
                qualifier,
                type_arguments,
                ..
            } => {
                push(*qualifier);
                type_arguments.iter().copied().for_each(&mut push);
            }
            NodeData::TypePredicate {
                parameter_name,
                type_node,
                ..
            } => {
                push(*parameter_name);
                push(*type_node);
            }
            NodeData::JSDocTypeLiteral { property_tags, .. } => {
                property_tags.iter().copied().for_each(&mut push)
            }
            NodeData::JSDocPropertyTag {
                name,
                type_expression,
                ..
            } => {
                push(*name);
                push(*type_expression);
            }
        }
        out
    }
}

/// Arena owning every node of a program.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}
