//! NodeArena access methods and structural queries.

use crate::base::NodeIndex;
use crate::flags::{modifier_flags, node_flags};
use crate::node::*;
use crate::syntax_kind::SyntaxKind;

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> SyntaxKind {
        self.get(index).map_or(SyntaxKind::Unknown, |n| n.kind)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|n| &n.data)
    }

    /// Visit each direct child of `index` in source order.
    pub fn for_each_child(&self, index: NodeIndex, mut f: impl FnMut(NodeIndex)) {
        if let Some(node) = self.get(index) {
            for child in node.data.children() {
                f(child);
            }
        }
    }

    /// Walk parents starting at `index` itself; returns the first match.
    pub fn find_ancestor(&self, index: NodeIndex, mut pred: impl FnMut(&Node) -> bool) -> NodeIndex {
        let mut current = index;
        while let Some(node) = self.get(current) {
            if pred(node) {
                return current;
            }
            current = node.parent;
        }
        NodeIndex::NONE
    }

    pub fn source_file_of(&self, index: NodeIndex) -> NodeIndex {
        self.find_ancestor(index, |n| n.kind == SyntaxKind::SourceFile)
    }

    pub fn source_file_data(&self, index: NodeIndex) -> Option<&SourceFileData> {
        match self.data(self.source_file_of(index))? {
            NodeData::SourceFile(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_in_js_file(&self, index: NodeIndex) -> bool {
        self.get(index)
            .is_some_and(|n| n.flags & node_flags::JAVASCRIPT_FILE != 0)
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Text of an identifier or private identifier.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn literal_data(&self, index: NodeIndex) -> Option<&LiteralData> {
        match self.data(index)? {
            NodeData::Literal(data) => Some(data),
            _ => None,
        }
    }

    /// The `name` slot of a declaration, if it has one.
    pub fn declaration_name(&self, index: NodeIndex) -> NodeIndex {
        let Some(data) = self.data(index) else {
            return NodeIndex::NONE;
        };
        match data {
            NodeData::Function(d) => d.name,
            NodeData::Parameter(d) => d.name,
            NodeData::TypeParameter(d) => d.name,
            NodeData::VariableDeclaration(d) => d.name,
            NodeData::Class(d) | NodeData::Interface(d) => d.name,
            NodeData::TypeAlias(d) => d.name,
            NodeData::Enum { name, .. }
            | NodeData::EnumMember { name, .. }
            | NodeData::Module { name, .. }
            | NodeData::PropertyAssignment { name, .. }
            | NodeData::ShorthandPropertyAssignment { name }
            | NodeData::NamedTupleMember { name, .. }
            | NodeData::JSDocPropertyTag { name, .. } => *name,
            NodeData::Property(d) => d.name,
            _ => NodeIndex::NONE,
        }
    }

    /// Static text of a property name: identifiers, private names, string and
    /// numeric literals, and computed names wrapping a literal.
    pub fn property_name_text(&self, name: NodeIndex) -> Option<String> {
        let node = self.get(name)?;
        match (&node.kind, &node.data) {
            (_, NodeData::Identifier { text }) => Some(text.clone()),
            (_, NodeData::Literal(lit)) => Some(lit.text.clone()),
            (SyntaxKind::ComputedPropertyName, NodeData::ComputedPropertyName { expression }) => {
                let inner = self.get(*expression)?;
                match (&inner.kind, &inner.data) {
                    (
                        SyntaxKind::StringLiteral
                        | SyntaxKind::NumericLiteral
                        | SyntaxKind::NoSubstitutionTemplateLiteral,
                        NodeData::Literal(lit),
                    ) => Some(lit.text.clone()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn declaration_name_text(&self, index: NodeIndex) -> Option<String> {
        self.property_name_text(self.declaration_name(index))
    }

    /// Dotted text of an entity name or property-access chain.
    pub fn entity_name_text(&self, index: NodeIndex) -> Option<String> {
        match self.data(index)? {
            NodeData::Identifier { text } => Some(text.clone()),
            NodeData::QualifiedName { left, right } => Some(format!(
                "{}.{}",
                self.entity_name_text(*left)?,
                self.identifier_text(*right)?
            )),
            NodeData::PropertyAccess { expression, name } => Some(format!(
                "{}.{}",
                self.entity_name_text(*expression)?,
                self.identifier_text(*name)?
            )),
            _ if self.kind(index) == SyntaxKind::ThisKeyword => Some("this".to_string()),
            _ => None,
        }
    }

    /// Leftmost identifier of `A.B.C` or `a.b.c`.
    pub fn first_identifier(&self, index: NodeIndex) -> NodeIndex {
        match self.data(index) {
            Some(NodeData::QualifiedName { left, .. }) => self.first_identifier(*left),
            Some(NodeData::PropertyAccess { expression, .. }) => self.first_identifier(*expression),
            _ => index,
        }
    }

    /// Whether `index` is an identifier, qualified name or a property access
    /// chain of identifiers.
    pub fn is_entity_name_expression(&self, index: NodeIndex) -> bool {
        match self.data(index) {
            Some(NodeData::Identifier { .. }) => self.kind(index) == SyntaxKind::Identifier,
            Some(NodeData::QualifiedName { left, right }) => {
                self.is_entity_name_expression(*left) && self.kind(*right) == SyntaxKind::Identifier
            }
            Some(NodeData::PropertyAccess { expression, name }) => {
                self.is_entity_name_expression(*expression) && self.kind(*name) == SyntaxKind::Identifier
            }
            _ => false,
        }
    }

    // =========================================================================
    // Declaration slots
    // =========================================================================

    pub fn modifiers(&self, index: NodeIndex) -> u32 {
        let Some(data) = self.data(index) else {
            return modifier_flags::NONE;
        };
        match data {
            NodeData::Function(d) => d.modifiers,
            NodeData::Parameter(d) => d.modifiers,
            NodeData::TypeParameter(d) => d.modifiers,
            NodeData::Class(d) | NodeData::Interface(d) => d.modifiers,
            NodeData::TypeAlias(d) => d.modifiers,
            NodeData::Property(d) => d.modifiers,
            NodeData::VariableStatement { modifiers, .. }
            | NodeData::Enum { modifiers, .. }
            | NodeData::Module { modifiers, .. }
            | NodeData::IndexSignature { modifiers, .. } => *modifiers,
            NodeData::VariableDeclaration(_) => {
                // Modifiers of `export const x` sit on the variable statement.
                let list = self.parent(index);
                self.modifiers(self.parent(list))
            }
            _ => modifier_flags::NONE,
        }
    }

    #[inline]
    pub fn has_modifier(&self, index: NodeIndex, flag: u32) -> bool {
        self.modifiers(index) & flag != 0
    }

    /// Type annotation of a variable, parameter, property or return position.
    pub fn type_annotation(&self, index: NodeIndex) -> NodeIndex {
        match self.data(index) {
            Some(NodeData::Function(d)) => d.type_annotation,
            Some(NodeData::Parameter(d)) => d.type_annotation,
            Some(NodeData::VariableDeclaration(d)) => d.type_annotation,
            Some(NodeData::Property(d)) => d.type_annotation,
            Some(NodeData::IndexSignature {
                type_annotation, ..
            }) => *type_annotation,
            Some(NodeData::JSDocPropertyTag {
                type_expression, ..
            }) => *type_expression,
            _ => NodeIndex::NONE,
        }
    }

    pub fn initializer(&self, index: NodeIndex) -> NodeIndex {
        match self.data(index) {
            Some(NodeData::Parameter(d)) => d.initializer,
            Some(NodeData::VariableDeclaration(d)) => d.initializer,
            Some(NodeData::Property(d)) => d.initializer,
            Some(NodeData::PropertyAssignment { initializer, .. }) => *initializer,
            Some(NodeData::EnumMember { initializer, .. }) => *initializer,
            _ => NodeIndex::NONE,
        }
    }

    pub fn function_data(&self, index: NodeIndex) -> Option<&FunctionData> {
        match self.data(index)? {
            NodeData::Function(d) => Some(d),
            _ => None,
        }
    }

    pub fn parameter_data(&self, index: NodeIndex) -> Option<&ParameterData> {
        match self.data(index)? {
            NodeData::Parameter(d) => Some(d),
            _ => None,
        }
    }

    pub fn type_parameter_data(&self, index: NodeIndex) -> Option<&TypeParameterData> {
        match self.data(index)? {
            NodeData::TypeParameter(d) => Some(d),
            _ => None,
        }
    }

    /// Whether a declaration is marked optional with `?`.
    pub fn has_question_token(&self, index: NodeIndex) -> bool {
        match self.data(index) {
            Some(NodeData::Function(d)) => d.question,
            Some(NodeData::Parameter(d)) => d.question,
            Some(NodeData::Property(d)) => d.question,
            Some(NodeData::NamedTupleMember { question, .. }) => *question,
            Some(NodeData::JSDocPropertyTag { is_bracketed, .. }) => *is_bracketed,
            _ => false,
        }
    }

    /// A `const` variable declaration.
    pub fn is_const_variable(&self, index: NodeIndex) -> bool {
        if self.kind(index) != SyntaxKind::VariableDeclaration {
            return false;
        }
        self.get(self.parent(index))
            .is_some_and(|list| list.flags & node_flags::CONST != 0)
    }

    /// Readonly property, or a `const` variable.
    pub fn is_declaration_readonly(&self, index: NodeIndex) -> bool {
        self.is_const_variable(index) || self.has_modifier(index, modifier_flags::READONLY)
    }

    /// Members of a class, interface, type literal or object literal.
    pub fn members(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.data(index) {
            Some(NodeData::Class(d)) | Some(NodeData::Interface(d)) => &d.members,
            Some(NodeData::TypeLiteral { members }) => members,
            Some(NodeData::ObjectLiteral { properties }) => properties,
            Some(NodeData::Enum { members, .. }) => members,
            _ => &[],
        }
    }

    /// Nearest enclosing function-like node, exclusive of `index`.
    pub fn containing_function(&self, index: NodeIndex) -> NodeIndex {
        self.find_ancestor(self.parent(index), |n| n.kind.is_function_like())
    }

    /// Whether `node` is `index` or a descendant of it.
    pub fn is_descendant_of(&self, node: NodeIndex, ancestor: NodeIndex) -> bool {
        let mut current = node;
        while current.is_some() {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// `const` written as a type reference, as in `x as const`.
    pub fn is_const_type_reference(&self, index: NodeIndex) -> bool {
        match self.data(index) {
            Some(NodeData::TypeReference {
                type_name,
                type_arguments,
            }) => type_arguments.is_empty() && self.identifier_text(*type_name) == Some("const"),
            _ => false,
        }
    }

    /// Whether `node` sits under an `as const` assertion, reached through
    /// parentheses, array elements, spreads, property assignments and
    /// template spans.
    pub fn is_const_assertion_context(&self, node: NodeIndex) -> bool {
        let parent = self.parent(node);
        match (self.kind(parent), self.data(parent)) {
            (
                SyntaxKind::AsExpression | SyntaxKind::TypeAssertionExpression,
                Some(NodeData::Assertion { type_node, .. }),
            ) => self.is_const_type_reference(*type_node),
            (
                SyntaxKind::ParenthesizedExpression
                | SyntaxKind::ArrayLiteralExpression
                | SyntaxKind::SpreadElement
                | SyntaxKind::TemplateExpression,
                _,
            ) => self.is_const_assertion_context(parent),
            (SyntaxKind::PropertyAssignment | SyntaxKind::ShorthandPropertyAssignment, _) => {
                self.is_const_assertion_context(self.parent(parent))
            }
            _ => false,
        }
    }
}
