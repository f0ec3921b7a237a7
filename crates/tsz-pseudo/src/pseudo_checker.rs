//! Syntax-only type inference.
//!
//! The pseudo checker answers "what type would be written here" from the
//! source tree alone. It never fails: declarations it cannot describe come
//! back as [`PseudoType::NoResult`], expressions as [`PseudoType::Inferred`],
//! and the caller decides whether to fall back to the real checker.
//!
//! Literal expressions are returned as [`PseudoType::MaybeConstLocation`]
//! because whether `1` means `1` or `number` depends on the const context,
//! which the caller resolves with checker knowledge.

use smallvec::SmallVec;
use tracing::trace;
use tsz_ast::{NodeArena, NodeData, NodeIndex, SyntaxKind, modifier_flags};
use tsz_binder::BinderState;

use crate::pseudo_type::{
    PseudoObjectElement, PseudoObjectElementKind, PseudoParameter, PseudoSignature, PseudoType,
};

pub struct PseudoChecker<'a> {
    arena: &'a NodeArena,
    binder: &'a BinderState,
}

impl<'a> PseudoChecker<'a> {
    pub fn new(arena: &'a NodeArena, binder: &'a BinderState) -> Self {
        PseudoChecker { arena, binder }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn get_type_of_declaration(&self, node: NodeIndex) -> PseudoType {
        let result = match self.arena.kind(node) {
            SyntaxKind::Parameter
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::PropertySignature
            | SyntaxKind::VariableDeclaration
            | SyntaxKind::PropertyAssignment
            | SyntaxKind::JSDocPropertyTag => self.type_of_variable_like(node),
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => self.type_of_accessor(node),
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => {
                self.type_of_function_expression(node)
            }
            _ => PseudoType::NoResult(node),
        };
        trace!(node = node.0, result = ?result, "pseudo get_type_of_declaration");
        result
    }

    fn type_of_variable_like(&self, node: NodeIndex) -> PseudoType {
        let annotation = self.arena.type_annotation(node);
        if annotation.is_some() {
            return PseudoType::Direct(annotation);
        }
        let initializer = self.arena.initializer(node);
        if initializer.is_some() {
            let from_initializer = self.get_type_of_expression(initializer);
            if from_initializer.is_unanalyzable() {
                return PseudoType::NoResult(node);
            }
            return if self.arena.is_declaration_readonly(node) {
                from_initializer.const_variant()
            } else {
                from_initializer
            };
        }
        if self.arena.kind(node) == SyntaxKind::PropertySignature {
            return PseudoType::Any;
        }
        PseudoType::NoResult(node)
    }

    /// Type of a get/set accessor pair, from whichever side is annotated.
    fn type_of_accessor(&self, node: NodeIndex) -> PseudoType {
        let (getter, setter) = self.accessor_pair(node);
        let getter_annotation = getter.map_or(NodeIndex::NONE, |g| self.arena.type_annotation(g));
        if getter_annotation.is_some() {
            return PseudoType::Direct(getter_annotation);
        }
        let setter_annotation = setter.map_or(NodeIndex::NONE, |s| self.setter_parameter_annotation(s));
        if setter_annotation.is_some() {
            return PseudoType::Direct(setter_annotation);
        }
        match getter {
            Some(getter) => match self.get_return_type_of_signature(getter) {
                t if t.is_unanalyzable() => PseudoType::NoResult(node),
                t => t,
            },
            None => PseudoType::NoResult(node),
        }
    }

    /// Getter and setter declared for the same member as `node`.
    fn accessor_pair(&self, node: NodeIndex) -> (Option<NodeIndex>, Option<NodeIndex>) {
        let declarations: SmallVec<[NodeIndex; 2]> = self
            .binder
            .get_symbol_of_declaration(node)
            .and_then(|symbol| self.binder.symbol(symbol))
            .map(|symbol| symbol.declarations.iter().copied().collect())
            .unwrap_or_else(|| SmallVec::from_slice(&[node]));
        let find = |kind| {
            declarations
                .iter()
                .copied()
                .find(|d| self.arena.kind(*d) == kind)
        };
        (find(SyntaxKind::GetAccessor), find(SyntaxKind::SetAccessor))
    }

    fn setter_parameter_annotation(&self, setter: NodeIndex) -> NodeIndex {
        self.arena
            .function_data(setter)
            .and_then(|data| data.parameters.first().copied())
            .map_or(NodeIndex::NONE, |param| self.arena.type_annotation(param))
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    pub fn get_return_type_of_signature(&self, node: NodeIndex) -> PseudoType {
        let Some(data) = self.arena.function_data(node) else {
            return PseudoType::NoResult(node);
        };
        if data.type_annotation.is_some() {
            return PseudoType::Direct(data.type_annotation);
        }
        let kind = self.arena.kind(node);
        if matches!(kind, SyntaxKind::SetAccessor | SyntaxKind::Constructor) {
            return PseudoType::Void;
        }
        // Async and generator bodies wrap their result in a promise or
        // iterator the syntax does not spell out.
        if data.asterisk || data.modifiers & modifier_flags::ASYNC != 0 {
            return PseudoType::NoResult(node);
        }
        if kind == SyntaxKind::ArrowFunction
            && data.body.is_some()
            && self.arena.kind(data.body) != SyntaxKind::Block
        {
            return self.get_type_of_expression(data.body);
        }
        PseudoType::NoResult(node)
    }

    fn signature_of(&self, node: NodeIndex) -> PseudoSignature {
        let (type_parameters, parameters) = self
            .arena
            .function_data(node)
            .map(|data| (data.type_parameters.clone(), data.parameters.clone()))
            .unwrap_or_default();
        PseudoSignature {
            declaration: node,
            type_parameters,
            parameters: parameters
                .into_iter()
                .map(|param| self.parameter_of(param))
                .collect(),
            return_type: self.get_return_type_of_signature(node),
        }
    }

    fn parameter_of(&self, param: NodeIndex) -> PseudoParameter {
        let (name, rest, optional) = self
            .arena
            .parameter_data(param)
            .map(|data| (data.name, data.dot_dot_dot, data.question || data.initializer.is_some()))
            .unwrap_or((NodeIndex::NONE, false, false));
        PseudoParameter {
            declaration: param,
            name,
            rest,
            optional,
            type_: self.type_of_variable_like(param),
        }
    }

    fn type_of_function_expression(&self, node: NodeIndex) -> PseudoType {
        let signature = self.signature_of(node);
        // A signature without a knowable return is not worth describing.
        if signature.return_type.is_unanalyzable() {
            return PseudoType::Inferred(node);
        }
        PseudoType::SingleCallSignature(Box::new(signature))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn get_type_of_expression(&self, node: NodeIndex) -> PseudoType {
        let arena = self.arena;
        match (arena.kind(node), arena.data(node)) {
            (SyntaxKind::ParenthesizedExpression, Some(NodeData::Parenthesized { inner })) => {
                self.get_type_of_expression(*inner)
            }
            (
                SyntaxKind::AsExpression | SyntaxKind::TypeAssertionExpression,
                Some(NodeData::Assertion {
                    expression,
                    type_node,
                }),
            ) => {
                if arena.is_const_type_reference(*type_node) {
                    self.get_type_of_expression(*expression)
                } else {
                    PseudoType::Direct(*type_node)
                }
            }
            (SyntaxKind::SatisfiesExpression, Some(NodeData::Assertion { expression, .. })) => {
                self.get_type_of_expression(*expression)
            }
            (SyntaxKind::Identifier, Some(NodeData::Identifier { text })) if text == "undefined" => {
                PseudoType::Undefined
            }
            (SyntaxKind::NullKeyword, _) => PseudoType::Null,
            (SyntaxKind::TrueKeyword, _) => {
                PseudoType::maybe_const(node, PseudoType::True, PseudoType::Boolean)
            }
            (SyntaxKind::FalseKeyword, _) => {
                PseudoType::maybe_const(node, PseudoType::False, PseudoType::Boolean)
            }
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, _) => {
                PseudoType::maybe_const(node, PseudoType::Literal(node), PseudoType::String)
            }
            (SyntaxKind::NumericLiteral, _) => {
                PseudoType::maybe_const(node, PseudoType::Literal(node), PseudoType::Number)
            }
            (SyntaxKind::BigIntLiteral, _) => {
                PseudoType::maybe_const(node, PseudoType::Literal(node), PseudoType::BigInt)
            }
            (
                SyntaxKind::PrefixUnaryExpression,
                Some(NodeData::PrefixUnary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                }),
            ) => match arena.kind(*operand) {
                SyntaxKind::NumericLiteral => {
                    PseudoType::maybe_const(node, PseudoType::Literal(node), PseudoType::Number)
                }
                SyntaxKind::BigIntLiteral => {
                    PseudoType::maybe_const(node, PseudoType::Literal(node), PseudoType::BigInt)
                }
                _ => PseudoType::Inferred(node),
            },
            (SyntaxKind::TemplateExpression, _) => {
                PseudoType::maybe_const(node, PseudoType::Inferred(node), PseudoType::String)
            }
            (SyntaxKind::ArrowFunction | SyntaxKind::FunctionExpression, _) => {
                self.type_of_function_expression(node)
            }
            (SyntaxKind::ObjectLiteralExpression, Some(NodeData::ObjectLiteral { properties })) => {
                self.type_of_object_literal(node, properties)
            }
            (SyntaxKind::ArrayLiteralExpression, Some(NodeData::ArrayLiteral { elements })) => {
                self.type_of_array_literal(node, elements)
            }
            _ => PseudoType::Inferred(node),
        }
    }

    fn type_of_array_literal(&self, node: NodeIndex, elements: &[NodeIndex]) -> PseudoType {
        if !self.arena.is_const_assertion_context(node)
            || elements
                .iter()
                .any(|e| self.arena.kind(*e) == SyntaxKind::SpreadElement)
        {
            return PseudoType::Inferred(node);
        }
        PseudoType::Tuple(
            elements
                .iter()
                .map(|element| self.get_type_of_expression(*element))
                .collect(),
        )
    }

    /// Whether every member of an object literal can be described from
    /// syntax: no spreads, no shorthands, no private names and computed
    /// keys only when they wrap a literal.
    fn is_safe_object_literal(&self, properties: &[NodeIndex]) -> bool {
        properties.iter().all(|&member| {
            match self.arena.kind(member) {
                SyntaxKind::SpreadAssignment | SyntaxKind::ShorthandPropertyAssignment => {
                    return false;
                }
                SyntaxKind::PropertyAssignment
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor => {}
                _ => return false,
            }
            let name = self.arena.declaration_name(member);
            match self.arena.kind(name) {
                SyntaxKind::PrivateIdentifier => false,
                SyntaxKind::ComputedPropertyName => self.arena.property_name_text(name).is_some(),
                _ => name.is_some(),
            }
        })
    }

    fn type_of_object_literal(&self, node: NodeIndex, properties: &[NodeIndex]) -> PseudoType {
        if !self.is_safe_object_literal(properties) {
            return PseudoType::Inferred(node);
        }
        let mut elements = Vec::with_capacity(properties.len());
        let mut paired_accessors: SmallVec<[String; 4]> = SmallVec::new();
        for &member in properties {
            let name = self.arena.declaration_name(member);
            match self.arena.kind(member) {
                SyntaxKind::PropertyAssignment => elements.push(PseudoObjectElement {
                    declaration: member,
                    name,
                    optional: false,
                    kind: PseudoObjectElementKind::Property {
                        readonly: false,
                        type_: self.get_type_of_expression(self.arena.initializer(member)),
                    },
                }),
                SyntaxKind::MethodDeclaration => elements.push(PseudoObjectElement {
                    declaration: member,
                    name,
                    optional: self.arena.has_question_token(member),
                    kind: PseudoObjectElementKind::Method(self.signature_of(member)),
                }),
                SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                    let Some(text) = self.arena.property_name_text(name) else {
                        continue;
                    };
                    if paired_accessors.contains(&text) {
                        continue;
                    }
                    let (getter, setter) = self.literal_accessor_pair(properties, &text);
                    elements.extend(self.accessor_elements(member, name, getter, setter));
                    paired_accessors.push(text);
                }
                _ => {}
            }
        }
        PseudoType::ObjectLiteral(elements)
    }

    fn literal_accessor_pair(
        &self,
        properties: &[NodeIndex],
        name: &str,
    ) -> (Option<NodeIndex>, Option<NodeIndex>) {
        let find = |kind| {
            properties.iter().copied().find(|&m| {
                self.arena.kind(m) == kind
                    && self
                        .arena
                        .property_name_text(self.arena.declaration_name(m))
                        .as_deref()
                        == Some(name)
            })
        };
        (find(SyntaxKind::GetAccessor), find(SyntaxKind::SetAccessor))
    }

    /// One property for an accessor pair, or separate accessors when both
    /// sides carry different annotations.
    fn accessor_elements(
        &self,
        first: NodeIndex,
        name: NodeIndex,
        getter: Option<NodeIndex>,
        setter: Option<NodeIndex>,
    ) -> SmallVec<[PseudoObjectElement; 2]> {
        let getter_annotation = getter.map_or(NodeIndex::NONE, |g| self.arena.type_annotation(g));
        let setter_annotation = setter.map_or(NodeIndex::NONE, |s| self.setter_parameter_annotation(s));
        let mut out = SmallVec::new();
        if let (Some(getter), Some(setter)) = (getter, setter)
            && getter_annotation.is_some()
            && setter_annotation.is_some()
            && !self.same_type_syntax(getter_annotation, setter_annotation)
        {
            out.push(PseudoObjectElement {
                declaration: getter,
                name,
                optional: false,
                kind: PseudoObjectElementKind::GetAccessor(PseudoType::Direct(getter_annotation)),
            });
            let param = self
                .arena
                .function_data(setter)
                .and_then(|data| data.parameters.first().copied())
                .unwrap_or(NodeIndex::NONE);
            out.push(PseudoObjectElement {
                declaration: setter,
                name,
                optional: false,
                kind: PseudoObjectElementKind::SetAccessor(self.parameter_of(param)),
            });
            return out;
        }
        let type_ = if getter_annotation.is_some() {
            PseudoType::Direct(getter_annotation)
        } else if setter_annotation.is_some() {
            PseudoType::Direct(setter_annotation)
        } else if let Some(getter) = getter {
            self.get_return_type_of_signature(getter)
        } else {
            PseudoType::NoResult(first)
        };
        out.push(PseudoObjectElement {
            declaration: getter.unwrap_or(first),
            name,
            optional: false,
            kind: PseudoObjectElementKind::Property {
                readonly: setter.is_none(),
                type_,
            },
        });
        out
    }

    /// Structural equality of two source subtrees by kind and text.
    fn same_type_syntax(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let arena = self.arena;
        if arena.kind(a) != arena.kind(b) {
            return false;
        }
        let text_matches = match (arena.data(a), arena.data(b)) {
            (Some(NodeData::Identifier { text: x }), Some(NodeData::Identifier { text: y })) => x == y,
            (Some(NodeData::Literal(x)), Some(NodeData::Literal(y))) => x.text == y.text,
            (Some(NodeData::TypeOperator { operator: x, .. }), Some(NodeData::TypeOperator { operator: y, .. })) => {
                x == y
            }
            (Some(_), Some(_)) => true,
            _ => a.is_none() && b.is_none(),
        };
        if !text_matches {
            return false;
        }
        let (Some(left), Some(right)) = (arena.data(a), arena.data(b)) else {
            return true;
        };
        let (left, right) = (left.children(), right.children());
        left.len() == right.len()
            && left
                .iter()
                .zip(right.iter())
                .all(|(x, y)| self.same_type_syntax(*x, *y))
    }
}
