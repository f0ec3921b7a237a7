//! Types of declarations and signature returns.
//!
//! Both consult the pseudo checker first. Its description is used only when
//! it denotes exactly the checker's type; otherwise the type is synthesized.

use tracing::trace;
use tsz_ast::synth::{KeywordTypeKind, TypeNode};
use tsz_ast::{NodeIndex, SyntaxKind, factory};
use tsz_binder::SymbolId;
use tsz_pseudo::{PseudoObjectElementKind, PseudoSignature, PseudoType};
use tsz_solver::{SignatureId, SignatureKind as CallKind, TypeFlags, TypeId, TypePredicate};

use crate::builder::NodeBuilderImpl;
use crate::flags::{InternalNodeBuilderFlags, NodeBuilderFlags};

impl<'a> NodeBuilderImpl<'a> {
    pub(crate) fn serialize_type_for_declaration_helper(
        &mut self,
        declaration: NodeIndex,
        type_id: TypeId,
        symbol: Option<SymbolId>,
    ) -> TypeNode {
        let declaration = if declaration.is_some() {
            declaration
        } else {
            symbol
                .and_then(|s| self.checker.symbol(s))
                .map_or(NodeIndex::NONE, |s| {
                    if s.value_declaration.is_some() {
                        s.value_declaration
                    } else {
                        s.declarations.first().copied().unwrap_or(NodeIndex::NONE)
                    }
                })
        };
        let add_undefined = declaration.is_some()
            && self.options.strict_null_checks
            && self.arena().kind(declaration) == SyntaxKind::Parameter
            && self.checker.requires_adding_implicit_undefined(declaration);
        let owns_unique_symbol = symbol.is_some() && {
            let info = self.interner().get(type_id);
            info.has(TypeFlags::UNIQUE_ES_SYMBOL) && info.symbol == symbol
        };

        let saved_flags = self.ctx.flags;
        if owns_unique_symbol {
            self.ctx.flags |= NodeBuilderFlags::ALLOW_UNIQUE_ES_SYMBOL_TYPE;
        }
        let effective_type = if add_undefined {
            self.checker.get_optional_type(type_id)
        } else {
            type_id
        };
        let node = if declaration.is_some()
            && !self
                .ctx
                .internal_flags
                .contains(InternalNodeBuilderFlags::NO_SYNTACTIC_PRINTER)
        {
            let pseudo = self.pseudo.get_type_of_declaration(declaration);
            if pseudo.is_unanalyzable() {
                self.pseudo_to_node(&pseudo, Some(effective_type))
            } else if self.pseudo_type_equivalent_to_type(&pseudo, type_id) {
                trace!(declaration = declaration.0, "declaration type from syntax");
                let node = self.pseudo_to_node(&pseudo, Some(effective_type));
                if add_undefined && matches!(pseudo, PseudoType::Direct(_)) {
                    with_undefined(node)
                } else {
                    node
                }
            } else {
                self.type_to_type_node_helper(effective_type)
            }
        } else {
            self.type_to_type_node_helper(effective_type)
        };
        self.ctx.flags = saved_flags;
        node
    }

    pub(crate) fn return_type_node_of_signature(&mut self, signature: SignatureId) -> TypeNode {
        self.serialize_return_type(signature)
            .unwrap_or_else(|| factory::keyword(KeywordTypeKind::Any))
    }

    /// Return type of a signature; `None` when an `any` return is
    /// suppressed.
    pub(crate) fn serialize_return_type(&mut self, signature_id: SignatureId) -> Option<TypeNode> {
        let suppress_any = self
            .ctx
            .flags
            .contains(NodeBuilderFlags::SUPPRESS_ANY_RETURN_TYPE);
        let saved_flags = self.ctx.flags;
        self.ctx.flags.remove(NodeBuilderFlags::SUPPRESS_ANY_RETURN_TYPE);

        let return_type = self.checker.get_return_type_of_signature(signature_id);
        let mut node = None;
        if !(suppress_any && self.interner().flags(return_type).contains(TypeFlags::ANY)) {
            if let Some(predicate) = self.checker.get_type_predicate_of_signature(signature_id) {
                node = Some(self.type_predicate_to_type_node(&predicate));
            } else {
                let declaration = self
                    .interner()
                    .signature(signature_id)
                    .map_or(NodeIndex::NONE, |s| s.declaration);
                node = Some(self.serialize_return_type_of_declaration(declaration, return_type));
            }
        }
        self.ctx.flags = saved_flags;
        if node.is_none() && !suppress_any {
            node = Some(factory::keyword(KeywordTypeKind::Any));
        }
        node
    }

    fn serialize_return_type_of_declaration(&mut self, declaration: NodeIndex, return_type: TypeId) -> TypeNode {
        if declaration.is_none()
            || self
                .ctx
                .internal_flags
                .contains(InternalNodeBuilderFlags::NO_SYNTACTIC_PRINTER)
        {
            return self.type_to_type_node_helper(return_type);
        }
        let pseudo = self.pseudo.get_return_type_of_signature(declaration);
        if pseudo.is_unanalyzable() || self.pseudo_type_equivalent_to_type(&pseudo, return_type) {
            return self.pseudo_to_node(&pseudo, Some(return_type));
        }
        self.type_to_type_node_helper(return_type)
    }

    fn type_predicate_to_type_node(&mut self, predicate: &TypePredicate) -> TypeNode {
        let parameter_name = predicate
            .parameter_name
            .clone()
            .unwrap_or_else(|| "this".to_string());
        self.ctx.approximate_length += parameter_name.len() + 4;
        if predicate.asserts {
            self.ctx.approximate_length += 8;
        }
        let type_node = predicate
            .type_id
            .map(|t| Box::new(self.type_to_type_node_helper(t)));
        TypeNode::Predicate {
            asserts: predicate.asserts,
            parameter_name,
            type_node,
        }
    }

    // =========================================================================
    // Pseudo type equivalence
    // =========================================================================

    /// The variant of a `MaybeConstLocation` that applies at its node: the
    /// literal in a const context or where the contextual type keeps
    /// literals, the widened one otherwise.
    pub(crate) fn resolve_const_variant<'p>(&self, pseudo: &'p PseudoType) -> &'p PseudoType {
        let PseudoType::MaybeConstLocation {
            node,
            const_type,
            regular_type,
        } = pseudo
        else {
            return pseudo;
        };
        if self.checker.is_const_context(*node) {
            return const_type;
        }
        let contextual = self.checker.get_contextual_type(*node);
        if contextual.is_some() {
            let candidate = self.checker.get_regular_type_of_expression(*node);
            if self.checker.is_literal_of_contextual_type(candidate, contextual) {
                return const_type;
            }
        }
        regular_type
    }

    /// Whether `pseudo` denotes exactly `type_id`.
    pub(crate) fn pseudo_type_equivalent_to_type(&self, pseudo: &PseudoType, type_id: TypeId) -> bool {
        let interner = self.interner();
        let regular = interner.regular_type_of_literal(type_id);
        match pseudo {
            PseudoType::Direct(annotation) => {
                // Ids are interned, so equal structure means equal ids up to
                // the alias copy a type alias makes of its body.
                let annotated = self.checker.get_type_from_type_node(*annotation);
                if interner.same_type_ignoring_alias(annotated, type_id) {
                    return true;
                }
                let arena = self.arena();
                let defined = interner.filter_type(type_id, TypeFlags::UNDEFINED);
                arena.has_question_token(arena.parent(*annotation))
                    && interner.same_type_ignoring_alias(defined, annotated)
            }
            PseudoType::Inferred(_) | PseudoType::NoResult(_) => false,
            PseudoType::MaybeConstLocation { .. } => {
                self.pseudo_type_equivalent_to_type(self.resolve_const_variant(pseudo), type_id)
            }
            PseudoType::Undefined => type_id == TypeId::UNDEFINED,
            PseudoType::Null => type_id == TypeId::NULL,
            PseudoType::Any => type_id == TypeId::ANY,
            PseudoType::String => type_id == TypeId::STRING,
            PseudoType::Number => type_id == TypeId::NUMBER,
            PseudoType::BigInt => type_id == TypeId::BIGINT,
            PseudoType::Boolean => type_id == TypeId::BOOLEAN,
            PseudoType::Void => type_id == TypeId::VOID,
            PseudoType::True => regular == TypeId::BOOLEAN_TRUE,
            PseudoType::False => regular == TypeId::BOOLEAN_FALSE,
            PseudoType::Literal(node) => self.checker.get_regular_type_of_expression(*node) == regular,
            PseudoType::Union(members) => {
                let info = interner.get(type_id);
                if !info.has(TypeFlags::UNION) {
                    return members.len() == 1 && self.pseudo_type_equivalent_to_type(&members[0], type_id);
                }
                let constituents = info.constituents();
                members.len() == constituents.len()
                    && members.iter().all(|member| {
                        constituents
                            .iter()
                            .any(|t| self.pseudo_type_equivalent_to_type(member, *t))
                    })
            }
            PseudoType::Tuple(elements) => match interner.tuple_parts(type_id) {
                Some((_, types)) => {
                    types.len() == elements.len()
                        && elements
                            .iter()
                            .zip(&types)
                            .all(|(e, t)| self.pseudo_type_equivalent_to_type(e, *t))
                }
                None => false,
            },
            PseudoType::ObjectLiteral(elements) => self.object_literal_equivalent(elements, type_id),
            PseudoType::SingleCallSignature(signature) => {
                let signatures = interner.signatures_of_type(type_id, CallKind::Call);
                match signatures.as_slice() {
                    [only] => self.signature_equivalent(signature, *only),
                    _ => false,
                }
            }
        }
    }

    fn object_literal_equivalent(&self, elements: &[tsz_pseudo::PseudoObjectElement], type_id: TypeId) -> bool {
        let arena = self.arena();
        let properties = self.interner().properties_of_type(type_id);
        let mut matched = 0;
        for element in elements {
            let Some(name) = arena.property_name_text(element.name) else {
                return false;
            };
            let Some(property) = properties.iter().find(|p| p.name == name) else {
                return false;
            };
            let equivalent = match &element.kind {
                PseudoObjectElementKind::Property { type_, .. } => {
                    self.pseudo_type_equivalent_to_type(type_, property.type_id)
                }
                PseudoObjectElementKind::Method(signature) => self
                    .interner()
                    .signatures_of_type(property.type_id, CallKind::Call)
                    .first()
                    .is_some_and(|s| self.signature_equivalent(signature, *s)),
                PseudoObjectElementKind::GetAccessor(type_) => {
                    self.pseudo_type_equivalent_to_type(type_, property.type_id)
                }
                PseudoObjectElementKind::SetAccessor(parameter) => {
                    let write_type = property.write_type.unwrap_or(property.type_id);
                    self.pseudo_type_equivalent_to_type(&parameter.type_, write_type)
                }
            };
            if !equivalent {
                return false;
            }
            if !matches!(element.kind, PseudoObjectElementKind::SetAccessor(_)) {
                matched += 1;
            }
        }
        matched == properties.len()
    }

    fn signature_equivalent(&self, pseudo: &PseudoSignature, signature_id: SignatureId) -> bool {
        let Some(signature) = self.interner().signature(signature_id) else {
            return false;
        };
        pseudo.type_parameters.len() == signature.type_parameters.len()
            && pseudo.parameters.len() == signature.parameters.len()
            && pseudo
                .parameters
                .iter()
                .zip(&signature.parameters)
                .all(|(p, s)| p.rest == s.rest && self.pseudo_type_equivalent_to_type(&p.type_, s.type_id))
            && self.pseudo_type_equivalent_to_type(&pseudo.return_type, signature.return_type)
    }
}

/// `T | undefined`, flattening into an existing union.
fn with_undefined(node: TypeNode) -> TypeNode {
    let undefined = factory::keyword(KeywordTypeKind::Undefined);
    match node {
        TypeNode::Union(mut members) => {
            members.push(undefined);
            TypeNode::Union(members)
        }
        other => factory::union(vec![other, undefined]),
    }
}
