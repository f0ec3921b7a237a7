//! Pseudo types to type nodes.
//!
//! The one place an unanalyzable pseudo type escapes to the checker: each
//! such escape reports an inference fallback for its node first.

use tracing::debug;
use tsz_ast::synth::{
    KeywordTypeKind, LiteralNode, ParameterDeclaration, PropertyName, SignatureDeclaration,
    SignatureKind, TupleMember, TypeElement, TypeNode, TypeOperatorKind,
};
use tsz_ast::{NodeIndex, SyntaxKind, factory, print_type_node};
use tsz_pseudo::{PseudoObjectElement, PseudoObjectElementKind, PseudoParameter, PseudoSignature, PseudoType};
use tsz_solver::TypeId;

use crate::builder::NodeBuilderImpl;
use crate::tracker::TrackerEvent;

impl<'a> NodeBuilderImpl<'a> {
    pub(crate) fn pseudo_type_to_type_node_helper(&mut self, pseudo: &PseudoType) -> TypeNode {
        self.pseudo_to_node(pseudo, None)
    }

    /// Node for `pseudo`. `fallback` is the checker's type for the whole
    /// description, used instead of a fresh query when syntax falls short.
    pub(crate) fn pseudo_to_node(&mut self, pseudo: &PseudoType, fallback: Option<TypeId>) -> TypeNode {
        match pseudo {
            PseudoType::Direct(annotation) => {
                if let Some(node) = self.reuse_existing_type_node_exact(*annotation) {
                    return node;
                }
                debug!(node = annotation.0, "annotation not reusable, synthesizing");
                self.report(TrackerEvent::InferenceFallback { node: *annotation });
                let type_id = fallback.unwrap_or_else(|| self.checker.get_type_from_type_node(*annotation));
                self.synthesize_after_fallback(type_id)
            }
            PseudoType::Inferred(node) | PseudoType::NoResult(node) => {
                self.report(TrackerEvent::InferenceFallback { node: *node });
                let type_id = fallback.unwrap_or_else(|| self.checker_type_of(pseudo, *node));
                self.synthesize_after_fallback(type_id)
            }
            PseudoType::MaybeConstLocation { .. } => {
                let variant = self.resolve_const_variant(pseudo).clone();
                self.pseudo_to_node(&variant, fallback)
            }
            PseudoType::Union(members) => {
                let nodes: Vec<TypeNode> = members.iter().map(|m| self.pseudo_to_node(m, None)).collect();
                self.ctx.approximate_length += 3 * nodes.len().saturating_sub(1);
                match <[TypeNode; 1]>::try_from(nodes) {
                    Ok([single]) => single,
                    Err(nodes) => factory::union(nodes),
                }
            }
            PseudoType::Undefined => self.pseudo_keyword(KeywordTypeKind::Undefined),
            PseudoType::Any => self.pseudo_keyword(KeywordTypeKind::Any),
            PseudoType::String => self.pseudo_keyword(KeywordTypeKind::String),
            PseudoType::Number => self.pseudo_keyword(KeywordTypeKind::Number),
            PseudoType::BigInt => self.pseudo_keyword(KeywordTypeKind::BigInt),
            PseudoType::Boolean => self.pseudo_keyword(KeywordTypeKind::Boolean),
            PseudoType::Void => self.pseudo_keyword(KeywordTypeKind::Void),
            PseudoType::Null => {
                self.ctx.approximate_length += 4;
                TypeNode::Literal(LiteralNode::Null)
            }
            PseudoType::True => {
                self.ctx.approximate_length += 4;
                TypeNode::Literal(LiteralNode::True)
            }
            PseudoType::False => {
                self.ctx.approximate_length += 5;
                TypeNode::Literal(LiteralNode::False)
            }
            PseudoType::Literal(node) => match self.literal_from_syntax(*node) {
                Some(literal) => {
                    let node = TypeNode::Literal(literal);
                    self.ctx.approximate_length += print_type_node(&node).len();
                    node
                }
                None => {
                    let type_id = self.checker.get_regular_type_of_expression(*node);
                    self.type_to_type_node_helper(type_id)
                }
            },
            PseudoType::Tuple(elements) => {
                let members = elements
                    .iter()
                    .map(|e| TupleMember::Plain(self.pseudo_to_node(e, None)))
                    .collect();
                self.ctx.approximate_length += 11;
                factory::type_operator(TypeOperatorKind::Readonly, TypeNode::Tuple(members))
            }
            PseudoType::ObjectLiteral(elements) => {
                let members = elements
                    .iter()
                    .map(|e| self.pseudo_object_element(e))
                    .collect();
                self.ctx.approximate_length += 2;
                TypeNode::TypeLiteral(members)
            }
            PseudoType::SingleCallSignature(signature) => {
                let declaration = self.pseudo_signature(signature, SignatureKind::FunctionType);
                TypeNode::Function(Box::new(declaration))
            }
        }
    }

    /// Checker synthesis for a node whose fallback was just reported.
    /// Declarations reached inside it do not report again.
    fn synthesize_after_fallback(&mut self, type_id: TypeId) -> TypeNode {
        let saved = std::mem::replace(&mut self.ctx.suppress_report_inference_fallback, true);
        let node = self.type_to_type_node_helper(type_id);
        self.ctx.suppress_report_inference_fallback = saved;
        node
    }

    fn pseudo_keyword(&mut self, kind: KeywordTypeKind) -> TypeNode {
        self.ctx.approximate_length += kind.text().len();
        factory::keyword(kind)
    }

    /// Checker type standing in for an unanalyzable description.
    fn checker_type_of(&self, pseudo: &PseudoType, node: NodeIndex) -> TypeId {
        match pseudo {
            PseudoType::Inferred(_) => self.checker.get_type_of_expression(node),
            _ => self
                .checker
                .get_symbol_of_declaration(node)
                .map_or(TypeId::ANY, |symbol| self.checker.get_type_of_symbol(symbol)),
        }
    }

    fn pseudo_object_element(&mut self, element: &PseudoObjectElement) -> TypeElement {
        let name = self.pseudo_property_name(element.name);
        self.ctx.approximate_length += name.text().len() + 1;
        match &element.kind {
            PseudoObjectElementKind::Property { readonly, type_ } => {
                let initializer = self.arena().initializer(element.declaration);
                let readonly = *readonly || initializer.is_some() && self.checker.is_const_context(initializer);
                if readonly {
                    self.ctx.approximate_length += 9;
                }
                let type_node = self.pseudo_to_node(type_, None);
                factory::property_signature(readonly, name, element.optional, Some(type_node))
            }
            PseudoObjectElementKind::Method(signature) => {
                let mut declaration = self.pseudo_signature(signature, SignatureKind::MethodSignature);
                declaration.name = Some(name);
                declaration.question = element.optional;
                TypeElement::Signature(declaration)
            }
            PseudoObjectElementKind::GetAccessor(type_) => {
                let mut declaration = SignatureDeclaration::new(SignatureKind::GetAccessor);
                declaration.name = Some(name);
                declaration.return_type = Some(self.pseudo_to_node(type_, None));
                TypeElement::Signature(declaration)
            }
            PseudoObjectElementKind::SetAccessor(parameter) => {
                let mut declaration = SignatureDeclaration::new(SignatureKind::SetAccessor);
                declaration.name = Some(name);
                declaration.parameters.push(self.pseudo_parameter(parameter));
                TypeElement::Signature(declaration)
            }
        }
    }

    fn pseudo_property_name(&self, name: NodeIndex) -> PropertyName {
        let arena = self.arena();
        let text = arena.property_name_text(name).unwrap_or_default();
        let single_quote = arena.literal_data(name).is_some_and(|lit| lit.single_quote);
        if arena.kind(name) == SyntaxKind::StringLiteral && !tsz_ast::is_identifier_text(&text) {
            return PropertyName::StringLiteral { text, single_quote };
        }
        factory::property_name_from_text(&text, single_quote)
    }

    fn pseudo_signature(&mut self, signature: &PseudoSignature, kind: SignatureKind) -> SignatureDeclaration {
        let mut declaration = SignatureDeclaration::new(kind);
        let arena = self.arena();
        for &type_parameter in &signature.type_parameters {
            let Some(data) = arena.type_parameter_data(type_parameter) else {
                continue;
            };
            let mut parameter = factory::type_parameter(arena.identifier_text(data.name).unwrap_or_default());
            parameter.modifiers = crate::reuse::type_parameter_modifiers(data.modifiers);
            parameter.constraint = self.annotation_to_node(data.constraint).map(Box::new);
            parameter.default = self.annotation_to_node(data.default).map(Box::new);
            declaration.type_parameters.push(parameter);
        }
        declaration.parameters = signature
            .parameters
            .iter()
            .map(|p| self.pseudo_parameter(p))
            .collect();
        self.ctx.approximate_length += 3;
        declaration.return_type = Some(self.pseudo_to_node(&signature.return_type, None));
        declaration
    }

    fn pseudo_parameter(&mut self, parameter: &PseudoParameter) -> ParameterDeclaration {
        let arena = self.arena();
        let name = if arena.kind(parameter.name) == SyntaxKind::ThisKeyword {
            "this".to_string()
        } else {
            arena
                .identifier_text(parameter.name)
                .unwrap_or("arg")
                .to_string()
        };
        self.ctx.approximate_length += name.len() + 3;
        let type_node = self.pseudo_to_node(&parameter.type_, None);
        ParameterDeclaration {
            modifiers: Vec::new(),
            dot_dot_dot: parameter.rest,
            name,
            question: parameter.optional && !parameter.rest,
            type_node: Some(type_node),
        }
    }

    /// A written type node copied where possible, synthesized otherwise.
    fn annotation_to_node(&mut self, annotation: NodeIndex) -> Option<TypeNode> {
        if annotation.is_none() {
            return None;
        }
        match self.try_reuse_existing_type_node(annotation) {
            Some(reused) => Some(reused.node),
            None => {
                let type_id = self.checker.get_type_from_type_node(annotation);
                Some(self.type_to_type_node_helper(type_id))
            }
        }
    }
}
