//! Source tree construction helpers.
//!
//! Nodes are added bottom-up, the way a parser would finish them, so every
//! helper takes already-built children and returns the new node.

use tsz_ast::*;

#[derive(Default)]
pub struct ProgramBuilder {
    pub arena: NodeArena,
    pub(crate) files: Vec<NodeIndex>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::default()
    }

    // =========================================================================
    // Names and literals
    // =========================================================================

    pub fn ident(&mut self, text: &str) -> NodeIndex {
        self.arena.add_identifier(text)
    }

    pub fn token(&mut self, kind: SyntaxKind) -> NodeIndex {
        self.arena.add_token(kind)
    }

    pub fn string_lit(&mut self, text: &str) -> NodeIndex {
        self.arena.add_string_literal(text, false)
    }

    pub fn number_lit(&mut self, text: &str) -> NodeIndex {
        self.arena.add_literal(SyntaxKind::NumericLiteral, text)
    }

    pub fn computed_name(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena.add(
            SyntaxKind::ComputedPropertyName,
            NodeData::ComputedPropertyName { expression },
        )
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    pub fn keyword(&mut self, kind: SyntaxKind) -> NodeIndex {
        self.arena.add_token(kind)
    }

    pub fn type_ref(&mut self, dotted: &str, type_arguments: Vec<NodeIndex>) -> NodeIndex {
        let name = self.arena.add_entity_name(dotted);
        self.arena.add_type_reference(name, type_arguments)
    }

    pub fn array_type(&mut self, element_type: NodeIndex) -> NodeIndex {
        self.arena
            .add(SyntaxKind::ArrayType, NodeData::ArrayType { element_type })
    }

    pub fn union_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add(SyntaxKind::UnionType, NodeData::Composite { types })
    }

    pub fn intersection_type(&mut self, types: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add(SyntaxKind::IntersectionType, NodeData::Composite { types })
    }

    pub fn paren_type(&mut self, inner: NodeIndex) -> NodeIndex {
        self.arena
            .add(SyntaxKind::ParenthesizedType, NodeData::Parenthesized { inner })
    }

    pub fn literal_type(&mut self, literal: NodeIndex) -> NodeIndex {
        self.arena
            .add(SyntaxKind::LiteralType, NodeData::LiteralType { literal })
    }

    pub fn string_literal_type(&mut self, text: &str) -> NodeIndex {
        let literal = self.string_lit(text);
        self.literal_type(literal)
    }

    pub fn number_literal_type(&mut self, text: &str) -> NodeIndex {
        let literal = self.number_lit(text);
        self.literal_type(literal)
    }

    pub fn type_literal(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add(SyntaxKind::TypeLiteral, NodeData::TypeLiteral { members })
    }

    pub fn tuple_type(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add(SyntaxKind::TupleType, NodeData::Tuple { elements })
    }

    pub fn named_tuple_member(&mut self, name: &str, type_node: NodeIndex, question: bool) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::NamedTupleMember,
            NodeData::NamedTupleMember {
                dot_dot_dot: false,
                name,
                question,
                type_node,
            },
        )
    }

    pub fn type_operator(&mut self, operator: SyntaxKind, type_node: NodeIndex) -> NodeIndex {
        self.arena.add(
            SyntaxKind::TypeOperator,
            NodeData::TypeOperator { operator, type_node },
        )
    }

    pub fn type_query(&mut self, dotted: &str) -> NodeIndex {
        let expr_name = self.arena.add_entity_name(dotted);
        self.arena.add(
            SyntaxKind::TypeQuery,
            NodeData::TypeQuery {
                expr_name,
                type_arguments: Vec::new(),
            },
        )
    }

    pub fn indexed_access_type(&mut self, object_type: NodeIndex, index_type: NodeIndex) -> NodeIndex {
        self.arena.add(
            SyntaxKind::IndexedAccessType,
            NodeData::IndexedAccess {
                object_type,
                index_type,
            },
        )
    }

    pub fn function_type(&mut self, parameters: Vec<NodeIndex>, return_type: NodeIndex) -> NodeIndex {
        self.arena.add_function(
            SyntaxKind::FunctionType,
            FunctionData {
                parameters,
                type_annotation: return_type,
                ..Default::default()
            },
        )
    }

    pub fn type_wrapper(&mut self, kind: SyntaxKind, type_node: NodeIndex) -> NodeIndex {
        self.arena.add(kind, NodeData::TypeWrapper { type_node })
    }

    // =========================================================================
    // Members and parameters
    // =========================================================================

    pub fn param(&mut self, name: &str, type_annotation: NodeIndex, question: bool) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_parameter(ParameterData {
            name,
            question,
            type_annotation,
            ..Default::default()
        })
    }

    pub fn param_with_initializer(&mut self, name: &str, initializer: NodeIndex) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_parameter(ParameterData {
            name,
            initializer,
            ..Default::default()
        })
    }

    pub fn type_param(&mut self, name: &str, constraint: NodeIndex) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_type_parameter(TypeParameterData {
            name,
            constraint,
            ..Default::default()
        })
    }

    pub fn const_type_param(&mut self, name: &str) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_type_parameter(TypeParameterData {
            modifiers: modifier_flags::CONST,
            name,
            ..Default::default()
        })
    }

    pub fn property_signature(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        question: bool,
        modifiers: u32,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.property_with_name(SyntaxKind::PropertySignature, name, type_annotation, question, modifiers)
    }

    /// Property signature or declaration with a prebuilt name node.
    pub fn property_with_name(
        &mut self,
        kind: SyntaxKind,
        name: NodeIndex,
        type_annotation: NodeIndex,
        question: bool,
        modifiers: u32,
    ) -> NodeIndex {
        self.arena.add(
            kind,
            NodeData::Property(PropertyData {
                modifiers,
                name,
                question,
                type_annotation,
                initializer: NodeIndex::NONE,
            }),
        )
    }

    pub fn property_declaration(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
        modifiers: u32,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::PropertyDeclaration,
            NodeData::Property(PropertyData {
                modifiers,
                name,
                question: false,
                type_annotation,
                initializer,
            }),
        )
    }

    pub fn method_signature(
        &mut self,
        name: &str,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_function(
            SyntaxKind::MethodSignature,
            FunctionData {
                name,
                parameters,
                type_annotation: return_type,
                ..Default::default()
            },
        )
    }

    pub fn call_signature(&mut self, parameters: Vec<NodeIndex>, return_type: NodeIndex) -> NodeIndex {
        self.arena.add_function(
            SyntaxKind::CallSignature,
            FunctionData {
                parameters,
                type_annotation: return_type,
                ..Default::default()
            },
        )
    }

    pub fn accessor(
        &mut self,
        kind: SyntaxKind,
        name: &str,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_function(
            kind,
            FunctionData {
                name,
                parameters,
                type_annotation: return_type,
                ..Default::default()
            },
        )
    }

    pub fn index_signature(
        &mut self,
        key_name: &str,
        key_type: NodeIndex,
        value_type: NodeIndex,
        readonly: bool,
    ) -> NodeIndex {
        let key = self.param(key_name, key_type, false);
        self.arena.add(
            SyntaxKind::IndexSignature,
            NodeData::IndexSignature {
                modifiers: if readonly { modifier_flags::READONLY } else { 0 },
                parameters: vec![key],
                type_annotation: value_type,
            },
        )
    }

    // =========================================================================
    // Declarations and statements
    // =========================================================================

    pub fn interface(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
        modifiers: u32,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::InterfaceDeclaration,
            NodeData::Interface(InterfaceData {
                modifiers,
                name,
                type_parameters,
                members,
            }),
        )
    }

    pub fn class(&mut self, name: &str, members: Vec<NodeIndex>, modifiers: u32) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::ClassDeclaration,
            NodeData::Class(ClassData {
                modifiers,
                name,
                type_parameters: Vec::new(),
                members,
            }),
        )
    }

    pub fn type_alias(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        type_node: NodeIndex,
        modifiers: u32,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::TypeAliasDeclaration,
            NodeData::TypeAlias(TypeAliasData {
                modifiers,
                name,
                type_parameters,
                type_node,
            }),
        )
    }

    /// `enum Name { A = init, B, ... }`; `None` initializers auto-number.
    pub fn enum_declaration(
        &mut self,
        name: &str,
        members: Vec<(&str, Option<NodeIndex>)>,
        modifiers: u32,
    ) -> NodeIndex {
        let members = members
            .into_iter()
            .map(|(member, initializer)| {
                let name = self.ident(member);
                self.arena.add(
                    SyntaxKind::EnumMember,
                    NodeData::EnumMember {
                        name,
                        initializer: initializer.unwrap_or(NodeIndex::NONE),
                    },
                )
            })
            .collect();
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::EnumDeclaration,
            NodeData::Enum {
                modifiers,
                name,
                members,
            },
        )
    }

    pub fn namespace(&mut self, name: &str, statements: Vec<NodeIndex>, modifiers: u32) -> NodeIndex {
        let body = self
            .arena
            .add(SyntaxKind::ModuleBlock, NodeData::Block { statements });
        let name = self.ident(name);
        self.arena.add(
            SyntaxKind::ModuleDeclaration,
            NodeData::Module {
                modifiers,
                name,
                body,
            },
        )
    }

    /// `[export] const|let name: T = init;` returning `(statement, declaration)`.
    pub fn variable(
        &mut self,
        name: &str,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
        is_const: bool,
        modifiers: u32,
    ) -> (NodeIndex, NodeIndex) {
        let name = self.ident(name);
        let declaration = self.arena.add(
            SyntaxKind::VariableDeclaration,
            NodeData::VariableDeclaration(VariableDeclarationData {
                name,
                type_annotation,
                initializer,
            }),
        );
        let list_flags = if is_const {
            node_flags::CONST
        } else {
            node_flags::LET
        };
        let list = self.arena.add_with_flags(
            SyntaxKind::VariableDeclarationList,
            list_flags,
            NodeData::VariableDeclarationList {
                declarations: vec![declaration],
            },
        );
        let statement = self.arena.add(
            SyntaxKind::VariableStatement,
            NodeData::VariableStatement {
                modifiers,
                declaration_list: list,
            },
        );
        (statement, declaration)
    }

    pub fn function_declaration(
        &mut self,
        name: &str,
        type_parameters: Vec<NodeIndex>,
        parameters: Vec<NodeIndex>,
        return_type: NodeIndex,
        body: NodeIndex,
        modifiers: u32,
    ) -> NodeIndex {
        let name = self.ident(name);
        self.arena.add_function(
            SyntaxKind::FunctionDeclaration,
            FunctionData {
                modifiers,
                name,
                type_parameters,
                parameters,
                type_annotation: return_type,
                body,
                ..Default::default()
            },
        )
    }

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.arena
            .add(SyntaxKind::Block, NodeData::Block { statements })
    }

    pub fn return_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena
            .add(SyntaxKind::ReturnStatement, NodeData::Return { expression })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn object_literal(&mut self, properties: Vec<(&str, NodeIndex)>) -> NodeIndex {
        let properties = properties
            .into_iter()
            .map(|(name, initializer)| {
                let name = self.ident(name);
                self.arena.add(
                    SyntaxKind::PropertyAssignment,
                    NodeData::PropertyAssignment { name, initializer },
                )
            })
            .collect();
        self.arena.add(
            SyntaxKind::ObjectLiteralExpression,
            NodeData::ObjectLiteral { properties },
        )
    }

    pub fn array_literal(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add(
            SyntaxKind::ArrayLiteralExpression,
            NodeData::ArrayLiteral { elements },
        )
    }

    pub fn as_expression(&mut self, expression: NodeIndex, type_node: NodeIndex) -> NodeIndex {
        self.arena.add(
            SyntaxKind::AsExpression,
            NodeData::Assertion {
                expression,
                type_node,
            },
        )
    }

    pub fn as_const(&mut self, expression: NodeIndex) -> NodeIndex {
        let const_ref = self.type_ref("const", Vec::new());
        self.as_expression(expression, const_ref)
    }

    pub fn arrow(&mut self, parameters: Vec<NodeIndex>, return_type: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.arena.add_function(
            SyntaxKind::ArrowFunction,
            FunctionData {
                parameters,
                type_annotation: return_type,
                body,
                ..Default::default()
            },
        )
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Add a source file. `module` makes it an external module importable
    /// under that specifier.
    pub fn file(&mut self, file_name: &str, statements: Vec<NodeIndex>, module: Option<&str>) -> NodeIndex {
        let file = self.arena.add_source_file(SourceFileData {
            file_name: file_name.to_string(),
            statements,
            module_specifier: module.map(str::to_string),
            is_declaration_file: file_name.ends_with(".d.ts"),
        });
        self.files.push(file);
        file
    }

    /// Mark a file as JavaScript so JSDoc annotations apply.
    pub fn mark_javascript(&mut self, file: NodeIndex) {
        self.arena
            .set_flags_recursive(file, node_flags::JAVASCRIPT_FILE);
    }
}
