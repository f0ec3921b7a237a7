//! Reuse of written type annotations.
//!
//! An annotation written at one location can often be copied verbatim to
//! another, but only if every name in it still denotes the same symbol from
//! the new enclosing declaration. Reuse walks the annotation inside a
//! recovery boundary: tracker events are deferred instead of reported, and a
//! name that fails to resolve identically fails only the nearest enclosing
//! type node, which is then synthesized from its type. The boundary replays
//! the deferred events when it closes.
//!
//! JSDoc-only shapes are rewritten to their TypeScript equivalents on the
//! way (`?T` to `T | null`, `...T` to `T[]`, object typedefs to literals).

use tracing::{debug, trace};
use tsz_ast::synth::{
    EntityName, KeywordTypeKind, LiteralNode, MappedModifierToken, Modifier,
    ParameterDeclaration, PropertyName, SignatureDeclaration, SignatureKind,
    TemplateLiteralSpan, TupleMember, TypeElement, TypeNode, TypeOperatorKind,
    TypeParameterDeclaration,
};
use tsz_ast::{NodeData, NodeIndex, SyntaxKind, factory, modifier_flags, print_type_node};
use tsz_binder::{SymbolId, symbol_flags};

use crate::builder::NodeBuilderImpl;
use crate::context::TrackedSymbolArgs;
use crate::flags::InternalNodeBuilderFlags;
use crate::tracker::TrackerEvent;

/// Deferred tracker traffic of one reuse attempt.
#[derive(Debug, Default)]
pub(crate) struct RecoveryBoundary {
    pub deferred_reports: Vec<TrackerEvent>,
    pub tracked_symbols: Vec<TrackedSymbolArgs>,
    pub had_error: bool,
    /// Some subtree was synthesized instead of copied.
    pub recovered: bool,
    saved_tracked_symbols: Vec<TrackedSymbolArgs>,
    saved_encountered_error: bool,
}

impl RecoveryBoundary {
    pub(crate) fn mark_error(&mut self, report: Option<TrackerEvent>) {
        self.had_error = true;
        if let Some(report) = report {
            self.deferred_reports.push(report);
        }
    }
}

/// Lengths to roll a boundary back to when one subtree is recovered.
#[derive(Clone, Copy, Debug)]
struct RecoveryScope {
    tracked_symbols: usize,
    deferred_reports: usize,
}

/// Result of a reuse attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct ReusedTypeNode {
    pub node: TypeNode,
    /// Every part was copied from the annotation; nothing was resynthesized.
    pub fully_reused: bool,
}

impl<'a> NodeBuilderImpl<'a> {
    /// Copy `existing` for the current enclosing declaration, synthesizing
    /// any subtree whose names no longer resolve. `None` when nothing usable
    /// came out.
    pub(crate) fn try_reuse_existing_type_node(&mut self, existing: NodeIndex) -> Option<ReusedTypeNode> {
        self.reuse_existing_type_node(existing, true)
    }

    /// Like [`try_reuse_existing_type_node`](Self::try_reuse_existing_type_node),
    /// but any failed name fails the whole attempt.
    pub(crate) fn reuse_existing_type_node_exact(&mut self, existing: NodeIndex) -> Option<TypeNode> {
        self.reuse_existing_type_node(existing, false)
            .filter(|reused| reused.fully_reused)
            .map(|reused| reused.node)
    }

    fn reuse_existing_type_node(&mut self, existing: NodeIndex, allow_recovery: bool) -> Option<ReusedTypeNode> {
        if existing.is_none() {
            return None;
        }
        if !self.start_recovery_boundary() {
            return None;
        }
        let node = self.visit_existing(existing, existing, allow_recovery);
        let recovered = self.ctx.recovery.last().is_some_and(|b| b.recovered);
        if !self.finalize_recovery_boundary() {
            debug!(node = existing.0, "annotation not reusable");
            return None;
        }
        self.ctx.approximate_length += print_type_node(&node).len();
        trace!(node = existing.0, recovered, "annotation reused");
        Some(ReusedTypeNode {
            node,
            fully_reused: !recovered,
        })
    }

    // =========================================================================
    // Boundary
    // =========================================================================

    /// Open a boundary. Returns `false`, marking the context cancelled, when
    /// cancellation was requested.
    fn start_recovery_boundary(&mut self) -> bool {
        if self.cancellation.is_cancelled() {
            self.ctx.cancelled = true;
            return false;
        }
        let boundary = RecoveryBoundary {
            saved_tracked_symbols: std::mem::take(&mut self.ctx.tracked_symbols),
            saved_encountered_error: self.ctx.encountered_error,
            ..RecoveryBoundary::default()
        };
        self.ctx.recovery.push(boundary);
        true
    }

    /// Close the innermost boundary and replay what it deferred. Tracked
    /// symbols are replayed only when the attempt succeeded.
    fn finalize_recovery_boundary(&mut self) -> bool {
        let Some(boundary) = self.ctx.recovery.pop() else {
            return false;
        };
        self.ctx.tracked_symbols = boundary.saved_tracked_symbols;
        self.ctx.encountered_error = boundary.saved_encountered_error;
        for report in boundary.deferred_reports {
            self.report(report);
        }
        if boundary.had_error {
            return false;
        }
        for args in boundary.tracked_symbols {
            self.track_symbol(args.symbol, args.enclosing_declaration, args.meaning);
        }
        true
    }

    fn start_recovery_scope(&self) -> RecoveryScope {
        let boundary = self.ctx.recovery.last();
        RecoveryScope {
            tracked_symbols: boundary.map_or(0, |b| b.tracked_symbols.len()),
            deferred_reports: boundary.map_or(0, |b| b.deferred_reports.len()),
        }
    }

    fn recover(&mut self, scope: RecoveryScope) {
        if let Some(boundary) = self.ctx.recovery.last_mut() {
            boundary.had_error = false;
            boundary.recovered = true;
            boundary.tracked_symbols.truncate(scope.tracked_symbols);
            boundary.deferred_reports.truncate(scope.deferred_reports);
        }
    }

    fn had_error(&self) -> bool {
        self.ctx.recovery.last().is_some_and(|b| b.had_error)
    }

    fn mark_error(&mut self) {
        if let Some(boundary) = self.ctx.recovery.last_mut() {
            boundary.mark_error(None);
        }
    }

    // =========================================================================
    // Type nodes
    // =========================================================================

    fn visit_existing(&mut self, node: NodeIndex, root: NodeIndex, allow_recovery: bool) -> TypeNode {
        if self.had_error() {
            return factory::keyword(KeywordTypeKind::Any);
        }
        let scope = self.start_recovery_scope();
        let result = self.visit_existing_worker(node, root, allow_recovery);
        if !self.had_error() {
            return result;
        }
        // Recovering the root would be plain synthesis, so only subtrees are
        // replaced.
        let kind = self.arena().kind(node);
        if allow_recovery && node != root && kind.is_type_node() && kind != SyntaxKind::TypePredicate {
            self.recover(scope);
            let type_id = self.checker.get_type_from_type_node(node);
            trace!(node = node.0, type_id = type_id.0, "recovering reused subtree from its type");
            return self.type_to_type_node_helper(type_id);
        }
        result
    }

    fn visit_existing_list(&mut self, nodes: &[NodeIndex], root: NodeIndex, allow_recovery: bool) -> Vec<TypeNode> {
        nodes
            .iter()
            .map(|n| self.visit_existing(*n, root, allow_recovery))
            .collect()
    }

    fn visit_optional(&mut self, node: NodeIndex, root: NodeIndex, allow_recovery: bool) -> Option<TypeNode> {
        node.is_some()
            .then(|| self.visit_existing(node, root, allow_recovery))
    }

    fn visit_existing_worker(&mut self, node: NodeIndex, root: NodeIndex, allow_recovery: bool) -> TypeNode {
        let arena = self.arena();
        let kind = arena.kind(node);
        if let Some(keyword) = keyword_kind(kind) {
            return factory::keyword(keyword);
        }
        let Some(data) = arena.data(node) else {
            self.mark_error();
            return factory::keyword(KeywordTypeKind::Any);
        };
        match (kind, data) {
            (SyntaxKind::ThisType, _) => TypeNode::This,
            (SyntaxKind::LiteralType, NodeData::LiteralType { literal }) => match self.literal_from_syntax(*literal) {
                Some(literal) => TypeNode::Literal(literal),
                None => {
                    self.mark_error();
                    factory::keyword(KeywordTypeKind::Any)
                }
            },
            (
                SyntaxKind::TypeReference,
                NodeData::TypeReference {
                    type_name,
                    type_arguments,
                },
            ) => {
                let name = self.reuse_entity_name(*type_name, symbol_flags::TYPE, root);
                let type_arguments = self.visit_existing_list(type_arguments, root, allow_recovery);
                factory::type_reference(name, type_arguments)
            }
            (SyntaxKind::ArrayType, NodeData::ArrayType { element_type }) => {
                factory::array(self.visit_existing(*element_type, root, allow_recovery))
            }
            (SyntaxKind::TupleType, NodeData::Tuple { elements }) => {
                let members = elements
                    .iter()
                    .map(|e| self.reuse_tuple_member(*e, root, allow_recovery))
                    .collect();
                TypeNode::Tuple(members)
            }
            (SyntaxKind::UnionType, NodeData::Composite { types }) => {
                factory::union(self.visit_existing_list(types, root, allow_recovery))
            }
            (SyntaxKind::IntersectionType, NodeData::Composite { types }) => {
                factory::intersection(self.visit_existing_list(types, root, allow_recovery))
            }
            (
                SyntaxKind::ParenthesizedType | SyntaxKind::JSDocNonNullableType,
                NodeData::Parenthesized { inner: type_node } | NodeData::TypeWrapper { type_node },
            ) => self.visit_existing(*type_node, root, allow_recovery),
            (SyntaxKind::JSDocNullableType, NodeData::TypeWrapper { type_node }) => factory::union(vec![
                self.visit_existing(*type_node, root, allow_recovery),
                TypeNode::Literal(LiteralNode::Null),
            ]),
            (SyntaxKind::JSDocOptionalType, NodeData::TypeWrapper { type_node }) => factory::union(vec![
                self.visit_existing(*type_node, root, allow_recovery),
                factory::keyword(KeywordTypeKind::Undefined),
            ]),
            (SyntaxKind::JSDocVariadicType, NodeData::TypeWrapper { type_node }) => {
                factory::array(self.visit_existing(*type_node, root, allow_recovery))
            }
            (SyntaxKind::TypeOperator, NodeData::TypeOperator { operator, type_node }) => {
                let operator = match operator {
                    SyntaxKind::KeyOfKeyword => TypeOperatorKind::KeyOf,
                    SyntaxKind::UniqueKeyword => TypeOperatorKind::Unique,
                    _ => TypeOperatorKind::Readonly,
                };
                factory::type_operator(operator, self.visit_existing(*type_node, root, allow_recovery))
            }
            (
                SyntaxKind::IndexedAccessType,
                NodeData::IndexedAccess {
                    object_type,
                    index_type,
                },
            ) => factory::indexed_access(
                self.visit_existing(*object_type, root, allow_recovery),
                self.visit_existing(*index_type, root, allow_recovery),
            ),
            (
                SyntaxKind::ConditionalType,
                NodeData::Conditional {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                },
            ) => factory::conditional(
                self.visit_existing(*check_type, root, allow_recovery),
                self.visit_existing(*extends_type, root, allow_recovery),
                self.visit_existing(*true_type, root, allow_recovery),
                self.visit_existing(*false_type, root, allow_recovery),
            ),
            (SyntaxKind::InferType, NodeData::Infer { type_parameter }) => {
                TypeNode::Infer(Box::new(self.reuse_type_parameter(*type_parameter, root, allow_recovery)))
            }
            (SyntaxKind::MappedType, NodeData::Mapped(mapped)) => {
                let type_parameter = self.reuse_type_parameter(mapped.type_parameter, root, allow_recovery);
                TypeNode::Mapped {
                    readonly_token: mapped_token(mapped.readonly_token, SyntaxKind::ReadonlyKeyword),
                    type_parameter: Box::new(type_parameter),
                    name_type: self.visit_optional(mapped.name_type, root, allow_recovery).map(Box::new),
                    question_token: mapped_token(mapped.question_token, SyntaxKind::QuestionToken),
                    type_node: self.visit_optional(mapped.type_node, root, allow_recovery).map(Box::new),
                }
            }
            (SyntaxKind::TypeLiteral, NodeData::TypeLiteral { members }) => {
                let members = members
                    .iter()
                    .filter_map(|m| self.reuse_type_element(*m, root, allow_recovery))
                    .collect();
                TypeNode::TypeLiteral(members)
            }
            (SyntaxKind::FunctionType | SyntaxKind::ConstructorType, NodeData::Function(_)) => {
                TypeNode::Function(Box::new(self.reuse_signature(node, root, allow_recovery)))
            }
            (SyntaxKind::JSDocFunctionType, NodeData::Function(_)) => {
                TypeNode::Function(Box::new(self.reuse_jsdoc_signature(node, root, allow_recovery)))
            }
            (
                SyntaxKind::TypeQuery,
                NodeData::TypeQuery {
                    expr_name,
                    type_arguments,
                },
            ) => {
                let expr_name = self.reuse_entity_name(*expr_name, symbol_flags::VALUE, root);
                let type_arguments = self.visit_existing_list(type_arguments, root, allow_recovery);
                factory::type_query(expr_name, type_arguments)
            }
            (SyntaxKind::TemplateLiteralType, NodeData::Template(template)) => {
                let spans = template
                    .spans
                    .iter()
                    .map(|span| TemplateLiteralSpan {
                        type_node: self.visit_existing(span.node, root, allow_recovery),
                        literal: span.literal.clone(),
                    })
                    .collect();
                TypeNode::TemplateLiteral {
                    head: template.head.clone(),
                    spans,
                }
            }
            (
                SyntaxKind::ImportType,
                NodeData::ImportType {
                    argument,
                    qualifier,
                    type_arguments,
                    is_type_of,
                },
            ) => {
                let qualifier = if qualifier.is_some() {
                    match arena.entity_name_text(*qualifier) {
                        Some(text) => Some(entity_name_from_text(&text)),
                        None => {
                            self.mark_error();
                            None
                        }
                    }
                } else {
                    None
                };
                TypeNode::Import {
                    argument: argument.clone(),
                    qualifier,
                    type_arguments: self.visit_existing_list(type_arguments, root, allow_recovery),
                    is_type_of: *is_type_of,
                }
            }
            (
                SyntaxKind::TypePredicate,
                NodeData::TypePredicate {
                    asserts,
                    parameter_name,
                    type_node,
                },
            ) => {
                let parameter_name = if arena.kind(*parameter_name) == SyntaxKind::ThisType {
                    "this".to_string()
                } else {
                    arena.identifier_text(*parameter_name).unwrap_or("this").to_string()
                };
                TypeNode::Predicate {
                    asserts: *asserts,
                    parameter_name,
                    type_node: self.visit_optional(*type_node, root, allow_recovery).map(Box::new),
                }
            }
            (
                SyntaxKind::JSDocTypeLiteral,
                NodeData::JSDocTypeLiteral {
                    property_tags,
                    is_array_type,
                },
            ) => {
                let members = property_tags
                    .iter()
                    .map(|tag| self.reuse_jsdoc_property(*tag, root, allow_recovery))
                    .collect();
                let literal = TypeNode::TypeLiteral(members);
                if *is_array_type {
                    factory::array(literal)
                } else {
                    literal
                }
            }
            _ => {
                trace!(node = node.0, ?kind, "no reuse rule for node");
                self.mark_error();
                factory::keyword(KeywordTypeKind::Any)
            }
        }
    }

    fn reuse_tuple_member(&mut self, element: NodeIndex, root: NodeIndex, allow_recovery: bool) -> TupleMember {
        let arena = self.arena();
        match (arena.kind(element), arena.data(element)) {
            (
                SyntaxKind::NamedTupleMember,
                Some(NodeData::NamedTupleMember {
                    dot_dot_dot,
                    name,
                    question,
                    type_node,
                }),
            ) => TupleMember::Named {
                dot_dot_dot: *dot_dot_dot,
                name: arena.identifier_text(*name).unwrap_or_default().to_string(),
                question: *question,
                type_node: self.visit_existing(*type_node, root, allow_recovery),
            },
            (SyntaxKind::OptionalType, Some(NodeData::TypeWrapper { type_node })) => {
                TupleMember::Optional(self.visit_existing(*type_node, root, allow_recovery))
            }
            (SyntaxKind::RestType, Some(NodeData::TypeWrapper { type_node })) => {
                TupleMember::Rest(self.visit_existing(*type_node, root, allow_recovery))
            }
            _ => TupleMember::Plain(self.visit_existing(element, root, allow_recovery)),
        }
    }

    pub(crate) fn literal_from_syntax(&self, literal: NodeIndex) -> Option<LiteralNode> {
        let arena = self.arena();
        match (arena.kind(literal), arena.data(literal)) {
            (SyntaxKind::TrueKeyword, _) => Some(LiteralNode::True),
            (SyntaxKind::FalseKeyword, _) => Some(LiteralNode::False),
            (SyntaxKind::NullKeyword, _) => Some(LiteralNode::Null),
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, Some(NodeData::Literal(lit))) => {
                Some(LiteralNode::String {
                    text: lit.text.clone(),
                    single_quote: lit.single_quote,
                })
            }
            (SyntaxKind::NumericLiteral, Some(NodeData::Literal(lit))) => Some(LiteralNode::Number(lit.text.clone())),
            (SyntaxKind::BigIntLiteral, Some(NodeData::Literal(lit))) => {
                Some(LiteralNode::BigInt(lit.text.trim_end_matches('n').to_string()))
            }
            (
                SyntaxKind::PrefixUnaryExpression,
                Some(NodeData::PrefixUnary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                }),
            ) => self
                .literal_from_syntax(*operand)
                .map(|inner| LiteralNode::Negative(Box::new(inner))),
            _ => None,
        }
    }

    // =========================================================================
    // Members and signatures
    // =========================================================================

    fn reuse_type_element(&mut self, member: NodeIndex, root: NodeIndex, allow_recovery: bool) -> Option<TypeElement> {
        let arena = self.arena();
        let kind = arena.kind(member);
        match (kind, arena.data(member)?) {
            (SyntaxKind::PropertySignature, NodeData::Property(data)) => {
                let name = self.reuse_property_name(data.name, root);
                Some(TypeElement::Property {
                    readonly: data.modifiers & modifier_flags::READONLY != 0,
                    name,
                    question: data.question,
                    type_node: self.visit_optional(data.type_annotation, root, allow_recovery),
                })
            }
            (
                SyntaxKind::MethodSignature
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor,
                NodeData::Function(_),
            ) => Some(TypeElement::Signature(self.reuse_signature(member, root, allow_recovery))),
            (
                SyntaxKind::IndexSignature,
                NodeData::IndexSignature {
                    modifiers,
                    parameters,
                    type_annotation,
                },
            ) => {
                let Some(&parameter) = parameters.first() else {
                    self.mark_error();
                    return None;
                };
                let parameter_name = arena
                    .identifier_text(arena.declaration_name(parameter))
                    .unwrap_or("x")
                    .to_string();
                let key_annotation = arena.type_annotation(parameter);
                let key_type = self
                    .visit_optional(key_annotation, root, allow_recovery)
                    .unwrap_or(factory::keyword(KeywordTypeKind::String));
                let type_node = self
                    .visit_optional(*type_annotation, root, allow_recovery)
                    .unwrap_or(factory::keyword(KeywordTypeKind::Any));
                Some(TypeElement::Index {
                    readonly: modifiers & modifier_flags::READONLY != 0,
                    parameter_name,
                    key_type,
                    type_node,
                })
            }
            _ => {
                self.mark_error();
                None
            }
        }
    }

    fn reuse_signature(&mut self, node: NodeIndex, root: NodeIndex, allow_recovery: bool) -> SignatureDeclaration {
        let arena = self.arena();
        let kind = match arena.kind(node) {
            SyntaxKind::ConstructorType => SignatureKind::ConstructorType,
            SyntaxKind::CallSignature => SignatureKind::CallSignature,
            SyntaxKind::ConstructSignature => SignatureKind::ConstructSignature,
            SyntaxKind::MethodSignature => SignatureKind::MethodSignature,
            SyntaxKind::GetAccessor => SignatureKind::GetAccessor,
            SyntaxKind::SetAccessor => SignatureKind::SetAccessor,
            _ => SignatureKind::FunctionType,
        };
        let mut signature = SignatureDeclaration::new(kind);
        let Some(data) = arena.function_data(node) else {
            self.mark_error();
            return signature;
        };
        if kind == SignatureKind::ConstructorType && data.modifiers & modifier_flags::ABSTRACT != 0 {
            signature.modifiers.push(Modifier::Abstract);
        }
        if data.name.is_some() {
            signature.name = Some(self.reuse_property_name(data.name, root));
        }
        signature.question = data.question;
        signature.type_parameters = data
            .type_parameters
            .iter()
            .map(|tp| self.reuse_type_parameter(*tp, root, allow_recovery))
            .collect();
        signature.parameters = data
            .parameters
            .iter()
            .map(|p| self.reuse_parameter(*p, root, allow_recovery))
            .collect();
        signature.return_type = self.visit_optional(data.type_annotation, root, allow_recovery);
        signature
    }

    /// `function(string, ...number): T` written in JSDoc; parameters have no
    /// names and get positional ones.
    fn reuse_jsdoc_signature(&mut self, node: NodeIndex, root: NodeIndex, allow_recovery: bool) -> SignatureDeclaration {
        let mut signature = SignatureDeclaration::new(SignatureKind::FunctionType);
        let Some(data) = self.arena().function_data(node) else {
            self.mark_error();
            return signature;
        };
        for (i, &param) in data.parameters.iter().enumerate() {
            let mut reused = self.reuse_parameter(param, root, allow_recovery);
            if reused.name.is_empty() {
                reused.name = if reused.dot_dot_dot {
                    "args".to_string()
                } else {
                    format!("arg{i}")
                };
            }
            signature.parameters.push(reused);
        }
        signature.return_type = Some(
            self.visit_optional(data.type_annotation, root, allow_recovery)
                .unwrap_or(factory::keyword(KeywordTypeKind::Any)),
        );
        signature
    }

    fn reuse_parameter(&mut self, param: NodeIndex, root: NodeIndex, allow_recovery: bool) -> ParameterDeclaration {
        let arena = self.arena();
        let Some(data) = arena.parameter_data(param) else {
            // JSDoc function types list bare types in parameter position.
            return ParameterDeclaration {
                type_node: Some(self.visit_existing(param, root, allow_recovery)),
                ..factory::parameter(String::new(), None)
            };
        };
        let name = if arena.kind(data.name) == SyntaxKind::ThisKeyword {
            "this".to_string()
        } else {
            arena.identifier_text(data.name).unwrap_or_default().to_string()
        };
        ParameterDeclaration {
            modifiers: Vec::new(),
            dot_dot_dot: data.dot_dot_dot,
            name,
            question: data.question,
            type_node: self.visit_optional(data.type_annotation, root, allow_recovery),
        }
    }

    pub(crate) fn reuse_type_parameter(
        &mut self,
        node: NodeIndex,
        root: NodeIndex,
        allow_recovery: bool,
    ) -> TypeParameterDeclaration {
        let arena = self.arena();
        let Some(data) = arena.type_parameter_data(node) else {
            self.mark_error();
            return factory::type_parameter(String::new());
        };
        let mut declaration = factory::type_parameter(arena.identifier_text(data.name).unwrap_or_default());
        declaration.modifiers = type_parameter_modifiers(data.modifiers);
        declaration.constraint = self.visit_optional(data.constraint, root, allow_recovery).map(Box::new);
        declaration.default = self.visit_optional(data.default, root, allow_recovery).map(Box::new);
        declaration
    }

    fn reuse_jsdoc_property(&mut self, tag: NodeIndex, root: NodeIndex, allow_recovery: bool) -> TypeElement {
        let arena = self.arena();
        let (name, type_expression, is_bracketed) = match arena.data(tag) {
            Some(NodeData::JSDocPropertyTag {
                name,
                type_expression,
                is_bracketed,
            }) => (*name, *type_expression, *is_bracketed),
            _ => (NodeIndex::NONE, NodeIndex::NONE, false),
        };
        let name = arena
            .entity_name_text(name)
            .map(|text| text.rsplit('.').next().unwrap_or_default().to_string())
            .unwrap_or_default();
        let type_node = self
            .visit_optional(type_expression, root, allow_recovery)
            .unwrap_or(factory::keyword(KeywordTypeKind::Any));
        factory::property_signature(
            false,
            factory::property_name_from_text(&name, false),
            is_bracketed,
            Some(type_node),
        )
    }

    fn reuse_property_name(&mut self, name: NodeIndex, root: NodeIndex) -> PropertyName {
        let arena = self.arena();
        match (arena.kind(name), arena.data(name)) {
            (SyntaxKind::Identifier, Some(NodeData::Identifier { text })) => PropertyName::Identifier(text.clone()),
            (SyntaxKind::PrivateIdentifier, Some(NodeData::Identifier { text })) => {
                PropertyName::PrivateIdentifier(text.clone())
            }
            (SyntaxKind::NumericLiteral, Some(NodeData::Literal(lit))) => PropertyName::NumericLiteral(lit.text.clone()),
            (_, Some(NodeData::Literal(lit))) => PropertyName::StringLiteral {
                text: lit.text.clone(),
                single_quote: lit.single_quote,
            },
            (SyntaxKind::ComputedPropertyName, Some(NodeData::ComputedPropertyName { expression })) => {
                if arena.is_entity_name_expression(*expression) {
                    PropertyName::Computed(self.reuse_entity_name(*expression, symbol_flags::VALUE, root))
                } else if let Some(text) = arena.property_name_text(name) {
                    factory::property_name_from_text(&text, false)
                } else {
                    self.mark_error();
                    PropertyName::Identifier(String::new())
                }
            }
            _ => {
                self.mark_error();
                PropertyName::Identifier(String::new())
            }
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Copy an entity name, checking that its leftmost identifier resolves to
    /// the same symbol from the enclosing declaration and that the symbol is
    /// accessible there. Failure marks the boundary.
    fn reuse_entity_name(&mut self, name: NodeIndex, meaning: u32, root: NodeIndex) -> EntityName {
        let arena = self.arena();
        let Some(text) = arena.entity_name_text(name) else {
            self.mark_error();
            return EntityName::ident(String::new());
        };
        let entity = entity_name_from_text(&text);
        let leftmost = arena.first_identifier(name);
        if arena.kind(leftmost) == SyntaxKind::ThisKeyword {
            return entity;
        }
        let leftmost_meaning = if leftmost != name && meaning != symbol_flags::VALUE {
            symbol_flags::NAMESPACE | symbol_flags::CLASS
        } else {
            meaning
        };
        if !self.check_existing_entity_name(leftmost, leftmost_meaning, root) {
            trace!(name = %text, "entity name does not survive at enclosing declaration");
            self.mark_error();
        }
        entity
    }

    fn check_existing_entity_name(&mut self, leftmost: NodeIndex, meaning: u32, root: NodeIndex) -> bool {
        let enclosing = self.ctx.enclosing_declaration;
        let Some(symbol) = self.checker.resolve_entity_name(leftmost, meaning, NodeIndex::NONE) else {
            return self
                .ctx
                .internal_flags
                .contains(InternalNodeBuilderFlags::ALLOW_UNRESOLVED_NAMES);
        };
        let is_type_parameter = self.is_type_parameter_symbol(symbol);
        if enclosing.is_some() {
            if is_type_parameter {
                if !self.type_parameter_declared_within(symbol, root) {
                    let name = self.arena().identifier_text(leftmost).unwrap_or_default().to_string();
                    if self.checker.resolve_name(enclosing, &name, symbol_flags::TYPE_PARAMETER) != Some(symbol) {
                        return false;
                    }
                }
            } else if self.checker.resolve_entity_name(leftmost, meaning, enclosing) != Some(symbol) {
                return false;
            }
        }
        if !is_type_parameter && !self.checker.is_symbol_accessible(symbol, enclosing, meaning).is_accessible() {
            return false;
        }
        self.track_symbol(symbol, enclosing, meaning);
        true
    }

    fn is_type_parameter_symbol(&self, symbol: SymbolId) -> bool {
        self.checker
            .symbol(symbol)
            .is_some_and(|s| s.has_flags(symbol_flags::TYPE_PARAMETER))
    }

    /// A type parameter introduced by the annotation itself (`infer U`, a
    /// mapped type's key) travels with it.
    fn type_parameter_declared_within(&self, symbol: SymbolId, root: NodeIndex) -> bool {
        let arena = self.arena();
        self.checker.symbol(symbol).is_some_and(|s| {
            s.declarations
                .iter()
                .any(|decl| arena.is_descendant_of(*decl, root))
        })
    }
}

pub(crate) fn entity_name_from_text(text: &str) -> EntityName {
    let segments: Vec<&str> = text.split('.').collect();
    EntityName::from_segments(&segments)
}

fn keyword_kind(kind: SyntaxKind) -> Option<KeywordTypeKind> {
    Some(match kind {
        SyntaxKind::AnyKeyword | SyntaxKind::JSDocAllType => KeywordTypeKind::Any,
        SyntaxKind::UnknownKeyword | SyntaxKind::JSDocUnknownType => KeywordTypeKind::Unknown,
        SyntaxKind::StringKeyword => KeywordTypeKind::String,
        SyntaxKind::NumberKeyword => KeywordTypeKind::Number,
        SyntaxKind::BigIntKeyword => KeywordTypeKind::BigInt,
        SyntaxKind::BooleanKeyword => KeywordTypeKind::Boolean,
        SyntaxKind::SymbolKeyword => KeywordTypeKind::Symbol,
        SyntaxKind::ObjectKeyword => KeywordTypeKind::Object,
        SyntaxKind::VoidKeyword => KeywordTypeKind::Void,
        SyntaxKind::UndefinedKeyword => KeywordTypeKind::Undefined,
        SyntaxKind::NeverKeyword => KeywordTypeKind::Never,
        SyntaxKind::IntrinsicKeyword => KeywordTypeKind::Intrinsic,
        _ => return None,
    })
}

fn mapped_token(token: SyntaxKind, plain: SyntaxKind) -> Option<MappedModifierToken> {
    match token {
        SyntaxKind::PlusToken => Some(MappedModifierToken::Plus),
        SyntaxKind::MinusToken => Some(MappedModifierToken::Minus),
        t if t == plain => Some(MappedModifierToken::Plain),
        _ => None,
    }
}

pub(crate) fn type_parameter_modifiers(flags: u32) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    if flags & modifier_flags::CONST != 0 {
        modifiers.push(Modifier::Const);
    }
    if flags & modifier_flags::IN != 0 {
        modifiers.push(Modifier::In);
    }
    if flags & modifier_flags::OUT != 0 {
        modifiers.push(Modifier::Out);
    }
    modifiers
}
