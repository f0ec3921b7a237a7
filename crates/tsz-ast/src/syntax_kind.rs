//! Syntax kinds for the source tree.
//!
//! Only the kinds that declaration synthesis reads are listed. Keyword type
//! nodes and keyword expressions (`true`, `null`, `this`) carry no payload and
//! are identified by their kind alone.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    NoSubstitutionTemplateLiteral,

    // Names
    Identifier,
    PrivateIdentifier,
    QualifiedName,
    ComputedPropertyName,

    // Punctuation used as operators or modifier tokens
    PlusToken,
    MinusToken,
    QuestionToken,
    ExclamationToken,

    // Keywords
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    KeyOfKeyword,
    UniqueKeyword,
    ReadonlyKeyword,

    // Keyword types
    AnyKeyword,
    UnknownKeyword,
    NumberKeyword,
    BigIntKeyword,
    ObjectKeyword,
    BooleanKeyword,
    StringKeyword,
    SymbolKeyword,
    VoidKeyword,
    UndefinedKeyword,
    NeverKeyword,
    IntrinsicKeyword,

    // Signature elements and members
    TypeParameter,
    Parameter,
    PropertySignature,
    PropertyDeclaration,
    MethodSignature,
    MethodDeclaration,
    Constructor,
    GetAccessor,
    SetAccessor,
    CallSignature,
    ConstructSignature,
    IndexSignature,

    // Types
    TypePredicate,
    TypeReference,
    FunctionType,
    ConstructorType,
    TypeQuery,
    TypeLiteral,
    ArrayType,
    TupleType,
    OptionalType,
    RestType,
    UnionType,
    IntersectionType,
    ConditionalType,
    InferType,
    ParenthesizedType,
    ThisType,
    TypeOperator,
    IndexedAccessType,
    MappedType,
    LiteralType,
    NamedTupleMember,
    TemplateLiteralType,
    ImportType,

    // Expressions
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    CallExpression,
    NewExpression,
    TypeAssertionExpression,
    ParenthesizedExpression,
    FunctionExpression,
    ArrowFunction,
    PrefixUnaryExpression,
    TemplateExpression,
    SpreadElement,
    ClassExpression,
    AsExpression,
    SatisfiesExpression,

    // Statements
    Block,
    VariableStatement,
    ExpressionStatement,
    ReturnStatement,

    // Declarations
    VariableDeclaration,
    VariableDeclarationList,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    ModuleDeclaration,
    ModuleBlock,

    // Property assignments
    PropertyAssignment,
    ShorthandPropertyAssignment,
    SpreadAssignment,

    // Enum
    EnumMember,

    // Top level
    SourceFile,

    // JSDoc type syntax
    JSDocAllType,
    JSDocUnknownType,
    JSDocNullableType,
    JSDocNonNullableType,
    JSDocOptionalType,
    JSDocFunctionType,
    JSDocVariadicType,
    JSDocTypeLiteral,
    JSDocPropertyTag,
}

impl SyntaxKind {
    /// Keyword type kinds (`any`, `string`, ...), excluding `this`.
    pub const fn is_keyword_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::IntrinsicKeyword
        )
    }

    /// Kinds that occupy a type position.
    pub const fn is_type_node(self) -> bool {
        self.is_keyword_type()
            || matches!(
                self,
                SyntaxKind::TypePredicate
                    | SyntaxKind::TypeReference
                    | SyntaxKind::FunctionType
                    | SyntaxKind::ConstructorType
                    | SyntaxKind::TypeQuery
                    | SyntaxKind::TypeLiteral
                    | SyntaxKind::ArrayType
                    | SyntaxKind::TupleType
                    | SyntaxKind::OptionalType
                    | SyntaxKind::RestType
                    | SyntaxKind::UnionType
                    | SyntaxKind::IntersectionType
                    | SyntaxKind::ConditionalType
                    | SyntaxKind::InferType
                    | SyntaxKind::ParenthesizedType
                    | SyntaxKind::ThisType
                    | SyntaxKind::TypeOperator
                    | SyntaxKind::IndexedAccessType
                    | SyntaxKind::MappedType
                    | SyntaxKind::LiteralType
                    | SyntaxKind::NamedTupleMember
                    | SyntaxKind::TemplateLiteralType
                    | SyntaxKind::ImportType
                    | SyntaxKind::JSDocAllType
                    | SyntaxKind::JSDocUnknownType
                    | SyntaxKind::JSDocNullableType
                    | SyntaxKind::JSDocNonNullableType
                    | SyntaxKind::JSDocOptionalType
                    | SyntaxKind::JSDocFunctionType
                    | SyntaxKind::JSDocVariadicType
                    | SyntaxKind::JSDocTypeLiteral
            )
    }

    /// Declarations and signatures that own a parameter list.
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
                | SyntaxKind::JSDocFunctionType
        )
    }

    /// Function-like kinds that have a body and therefore a runtime value.
    pub const fn is_function_like_with_body(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
        )
    }

    pub const fn is_accessor(self) -> bool {
        matches!(self, SyntaxKind::GetAccessor | SyntaxKind::SetAccessor)
    }

    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
        )
    }

    /// Expression kinds. Identifiers and keyword expressions count.
    pub const fn is_expression(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                SyntaxKind::Identifier
                    | SyntaxKind::TrueKeyword
                    | SyntaxKind::FalseKeyword
                    | SyntaxKind::NullKeyword
                    | SyntaxKind::ThisKeyword
                    | SyntaxKind::ArrayLiteralExpression
                    | SyntaxKind::ObjectLiteralExpression
                    | SyntaxKind::PropertyAccessExpression
                    | SyntaxKind::ElementAccessExpression
                    | SyntaxKind::CallExpression
                    | SyntaxKind::NewExpression
                    | SyntaxKind::TypeAssertionExpression
                    | SyntaxKind::ParenthesizedExpression
                    | SyntaxKind::FunctionExpression
                    | SyntaxKind::ArrowFunction
                    | SyntaxKind::PrefixUnaryExpression
                    | SyntaxKind::TemplateExpression
                    | SyntaxKind::SpreadElement
                    | SyntaxKind::ClassExpression
                    | SyntaxKind::AsExpression
                    | SyntaxKind::SatisfiesExpression
            )
    }
}
