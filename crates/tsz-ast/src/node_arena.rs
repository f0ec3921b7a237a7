//! NodeArena creation methods (add_* methods).
//!
//! Nodes are added bottom-up: children exist before their parent, and adding
//! a parent links every child back to it.

use crate::base::NodeIndex;
use crate::node::*;
use crate::syntax_kind::SyntaxKind;

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node and set the parent of each of its children.
    pub fn add(&mut self, kind: SyntaxKind, data: NodeData) -> NodeIndex {
        self.add_with_flags(kind, 0, data)
    }

    pub fn add_with_flags(&mut self, kind: SyntaxKind, flags: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        for child in data.children() {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = index;
            }
        }
        self.nodes.push(Node {
            kind,
            flags,
            parent: NodeIndex::NONE,
            data,
        });
        index
    }

    /// Add a payload-free node: keyword types, `true`/`false`/`null`/`this`.
    pub fn add_token(&mut self, kind: SyntaxKind) -> NodeIndex {
        self.add(kind, NodeData::None)
    }

    pub fn add_identifier(&mut self, text: impl Into<String>) -> NodeIndex {
        self.add(SyntaxKind::Identifier, NodeData::Identifier { text: text.into() })
    }

    pub fn add_private_identifier(&mut self, text: impl Into<String>) -> NodeIndex {
        self.add(
            SyntaxKind::PrivateIdentifier,
            NodeData::Identifier { text: text.into() },
        )
    }

    /// Add a `NumericLiteral`, `BigIntLiteral`, `StringLiteral` or
    /// `NoSubstitutionTemplateLiteral`.
    pub fn add_literal(&mut self, kind: SyntaxKind, text: impl Into<String>) -> NodeIndex {
        self.add(
            kind,
            NodeData::Literal(LiteralData {
                text: text.into(),
                single_quote: false,
            }),
        )
    }

    pub fn add_string_literal(&mut self, text: impl Into<String>, single_quote: bool) -> NodeIndex {
        self.add(
            SyntaxKind::StringLiteral,
            NodeData::Literal(LiteralData {
                text: text.into(),
                single_quote,
            }),
        )
    }

    pub fn add_qualified_name(&mut self, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(SyntaxKind::QualifiedName, NodeData::QualifiedName { left, right })
    }

    /// Build an entity name from dotted text: `A.B.C` becomes nested
    /// qualified names.
    pub fn add_entity_name(&mut self, dotted: &str) -> NodeIndex {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut current = self.add_identifier(first);
        for part in parts {
            let right = self.add_identifier(part);
            current = self.add_qualified_name(current, right);
        }
        current
    }

    pub fn add_function(&mut self, kind: SyntaxKind, data: FunctionData) -> NodeIndex {
        self.add(kind, NodeData::Function(data))
    }

    pub fn add_parameter(&mut self, data: ParameterData) -> NodeIndex {
        self.add(SyntaxKind::Parameter, NodeData::Parameter(data))
    }

    pub fn add_type_parameter(&mut self, data: TypeParameterData) -> NodeIndex {
        self.add(SyntaxKind::TypeParameter, NodeData::TypeParameter(data))
    }

    pub fn add_type_reference(&mut self, type_name: NodeIndex, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            SyntaxKind::TypeReference,
            NodeData::TypeReference {
                type_name,
                type_arguments,
            },
        )
    }

    pub fn add_source_file(&mut self, data: SourceFileData) -> NodeIndex {
        self.add(SyntaxKind::SourceFile, NodeData::SourceFile(data))
    }

    /// Mark a node and all of its descendants with `flags`.
    pub fn set_flags_recursive(&mut self, root: NodeIndex, flags: u32) {
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            if let Some(node) = self.get_mut(index) {
                node.flags |= flags;
                stack.extend(node.data.children());
            }
        }
    }
}
