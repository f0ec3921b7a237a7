//! Members, signatures and type parameters.

use tracing::trace;
use tsz_ast::synth::{
    KeywordTypeKind, Modifier, ParameterDeclaration, PropertyName, SignatureDeclaration,
    SignatureKind, TypeElement, TypeNode, TypeParameterDeclaration,
};
use tsz_ast::{NodeData, NodeIndex, SyntaxKind, factory, modifier_flags};
use tsz_binder::{SymbolId, symbol_flags};
use tsz_solver::{
    IndexInfo, ObjectFlags, ObjectType, ParamInfo, PropertyInfo, SignatureId,
    SignatureKind as CallKind, TypeData, TypeFlags, TypeId, Visibility,
};

use crate::builder::NodeBuilderImpl;
use crate::context::ReverseMappedEntry;
use crate::flags::{InternalNodeBuilderFlags, NodeBuilderFlags};
use crate::reuse::{entity_name_from_text, type_parameter_modifiers};
use crate::tracker::TrackerEvent;

/// Nesting of one mapped type past which reverse-mapped properties are elided.
const REVERSE_MAPPED_NESTING_LIMIT: usize = 3;

impl<'a> NodeBuilderImpl<'a> {
    // =========================================================================
    // Type literal members
    // =========================================================================

    pub(crate) fn create_type_nodes_from_resolved_type(
        &mut self,
        resolved: &ObjectType,
        is_reverse_mapped: bool,
    ) -> Vec<TypeElement> {
        if self.ctx.check_truncation_length() {
            if self.ctx.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
                return Vec::new();
            }
            return vec![factory::property_signature(
                false,
                PropertyName::Identifier("...".to_string()),
                false,
                None,
            )];
        }
        let mut elements = Vec::new();
        for signature in &resolved.call_signatures {
            let declaration = self.signature_to_signature_declaration_helper(*signature, SignatureKind::CallSignature);
            elements.push(TypeElement::Signature(declaration));
        }
        for signature in &resolved.construct_signatures {
            if self
                .interner()
                .signature(*signature)
                .is_some_and(|s| s.is_abstract)
            {
                continue;
            }
            let declaration =
                self.signature_to_signature_declaration_helper(*signature, SignatureKind::ConstructSignature);
            elements.push(TypeElement::Signature(declaration));
        }
        for info in &resolved.index_infos {
            let placeholder = is_reverse_mapped.then(|| self.create_elided_information_placeholder());
            elements.push(self.index_info_to_index_signature_declaration_helper(info, placeholder));
        }

        let properties = &resolved.properties;
        for (index, property) in properties.iter().enumerate() {
            let i = index + 1;
            if self
                .ctx
                .flags
                .contains(NodeBuilderFlags::WRITE_CLASS_EXPRESSION_AS_TYPE_LITERAL)
                && property.visibility != Visibility::Public
            {
                self.report(TrackerEvent::PrivateInBaseOfClassExpression {
                    property_name: property.name.clone(),
                });
            }
            if self.ctx.check_truncation_length() && i + 2 < properties.len() - 1 {
                let marker = format!("... {} more ...", properties.len() - i);
                elements.push(factory::property_signature(
                    false,
                    PropertyName::Identifier(marker),
                    false,
                    None,
                ));
                if let Some(last) = properties.last() {
                    self.add_property_to_element_list(last, &mut elements);
                }
                break;
            }
            self.add_property_to_element_list(property, &mut elements);
        }
        elements
    }

    fn should_use_placeholder_for_property(&self, property: &PropertyInfo) -> bool {
        let Some(links) = property.reverse_mapped.filter(|_| property.is_reverse_mapped()) else {
            return false;
        };
        let stack = &self.ctx.reverse_mapped_stack;
        if stack.iter().any(|entry| entry_matches(entry, property)) {
            return true;
        }
        if let Some(last) = stack.last()
            && !self
                .interner()
                .object_flags(last.property_type)
                .contains(ObjectFlags::ANONYMOUS)
        {
            return true;
        }
        self.is_deeply_nested_reverse_mapped_property(links.mapped_type)
    }

    fn is_deeply_nested_reverse_mapped_property(&self, mapped_type: TypeId) -> bool {
        let stack = &self.ctx.reverse_mapped_stack;
        if stack.len() < REVERSE_MAPPED_NESTING_LIMIT {
            return false;
        }
        let interner = self.interner();
        let symbol = interner.get(mapped_type).symbol;
        stack
            .iter()
            .rev()
            .take(REVERSE_MAPPED_NESTING_LIMIT)
            .all(|entry| entry.mapped_type == mapped_type || symbol.is_some() && interner.get(entry.mapped_type).symbol == symbol)
    }

    fn add_property_to_element_list(&mut self, property: &PropertyInfo, elements: &mut Vec<TypeElement>) {
        let use_placeholder = self.should_use_placeholder_for_property(property);
        let property_type = if use_placeholder {
            TypeId::ANY
        } else if property.optional {
            self.interner().filter_type(property.type_id, TypeFlags::UNDEFINED)
        } else {
            property.type_id
        };
        let name = self.property_name_of(property);
        self.ctx.approximate_length += property.name.len() + 1;

        if property.is_accessor
            && let Some(write_type) = property.write_type
            && write_type != property_type
            && !property_type.is_error()
            && !write_type.is_error()
        {
            let mut getter = SignatureDeclaration::new(SignatureKind::GetAccessor);
            getter.name = Some(name.clone());
            getter.return_type = Some(self.serialize_member_type(property_type, property.symbol));
            let mut setter = SignatureDeclaration::new(SignatureKind::SetAccessor);
            setter.name = Some(name);
            let setter_type = self.serialize_member_type(write_type, property.symbol);
            setter.parameters.push(factory::parameter("arg", Some(setter_type)));
            elements.push(TypeElement::Signature(getter));
            elements.push(TypeElement::Signature(setter));
            return;
        }

        if property.is_method && !property.readonly {
            let interner = self.interner();
            let callable = interner.filter_type(property_type, TypeFlags::UNDEFINED);
            if interner.properties_of_type(callable).is_empty() {
                let signatures = interner.signatures_of_type(callable, CallKind::Call);
                for signature in &signatures {
                    let mut method =
                        self.signature_to_signature_declaration_helper(*signature, SignatureKind::MethodSignature);
                    method.name = Some(name.clone());
                    method.question = property.optional;
                    elements.push(TypeElement::Signature(method));
                }
                if !signatures.is_empty() || !property.optional {
                    return;
                }
            }
        }

        let pushed = property.is_reverse_mapped() && !use_placeholder;
        let type_node = if use_placeholder {
            self.create_elided_information_placeholder()
        } else {
            if pushed && let Some(links) = property.reverse_mapped {
                self.ctx.reverse_mapped_stack.push(ReverseMappedEntry {
                    name: property.name.clone(),
                    symbol: property.symbol,
                    property_type: links.property_type,
                    mapped_type: links.mapped_type,
                });
            }
            let node = self.serialize_member_type(property_type, property.symbol);
            if pushed {
                self.ctx.reverse_mapped_stack.pop();
            }
            node
        };
        if property.readonly {
            self.ctx.approximate_length += 9;
        }
        elements.push(factory::property_signature(
            property.readonly,
            name,
            property.optional,
            Some(type_node),
        ));
    }

    /// Property type, written as `unique symbol` when the property owns it.
    fn serialize_member_type(&mut self, type_id: TypeId, symbol: Option<SymbolId>) -> TypeNode {
        let owns_unique_symbol = symbol.is_some() && {
            let info = self.interner().get(type_id);
            info.has(TypeFlags::UNIQUE_ES_SYMBOL) && info.symbol == symbol
        };
        if !owns_unique_symbol {
            return self.type_to_type_node_helper(type_id);
        }
        let saved_flags = self.ctx.flags;
        self.ctx.flags |= NodeBuilderFlags::ALLOW_UNIQUE_ES_SYMBOL_TYPE;
        let node = self.type_to_type_node_helper(type_id);
        self.ctx.flags = saved_flags;
        node
    }

    fn property_name_of(&mut self, property: &PropertyInfo) -> PropertyName {
        let single_quote = self
            .ctx
            .flags
            .contains(NodeBuilderFlags::USE_SINGLE_QUOTES_FOR_STRING_LITERAL_TYPE);
        if !property.is_late_bound() {
            return factory::property_name_from_text(&property.name, single_quote);
        }
        if self
            .ctx
            .internal_flags
            .contains(InternalNodeBuilderFlags::WRITE_COMPUTED_PROPS)
            && let Some(expression) = self.computed_name_expression(property.declaration)
        {
            return PropertyName::Computed(entity_name_from_text(&expression));
        }
        let named_by = property
            .name_type
            .and_then(|name_type| self.interner().get(name_type).symbol);
        match named_by {
            Some(symbol) => {
                let saved_enclosing = self.ctx.enclosing_declaration;
                if property.declaration.is_some() {
                    self.ctx.enclosing_declaration = property.declaration;
                }
                let name = self.symbol_to_entity_name_helper(symbol, symbol_flags::VALUE);
                self.ctx.enclosing_declaration = saved_enclosing;
                PropertyName::Computed(name)
            }
            None => {
                self.report(TrackerEvent::NonSerializableProperty {
                    property_name: property.name.clone(),
                });
                factory::property_name_from_text(&property.name, single_quote)
            }
        }
    }

    fn computed_name_expression(&self, declaration: NodeIndex) -> Option<String> {
        let arena = self.arena();
        let name = arena.declaration_name(declaration);
        match arena.data(name)? {
            NodeData::ComputedPropertyName { expression } if arena.is_entity_name_expression(*expression) => {
                arena.entity_name_text(*expression)
            }
            _ => None,
        }
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    pub(crate) fn signature_to_signature_declaration_helper(
        &mut self,
        signature_id: SignatureId,
        kind: SignatureKind,
    ) -> SignatureDeclaration {
        let mut declaration = SignatureDeclaration::new(kind);
        let Some(signature) = self.interner().signature(signature_id) else {
            declaration.return_type = Some(factory::keyword(KeywordTypeKind::Any));
            return declaration;
        };
        trace!(signature = signature_id.0, ?kind, "signature_to_signature_declaration");
        declaration.type_parameters = signature
            .type_parameters
            .iter()
            .map(|tp| self.type_parameter_to_declaration_helper(*tp))
            .collect();
        if !self.ctx.flags.contains(NodeBuilderFlags::OMIT_THIS_PARAMETER)
            && let Some(this_parameter) = &signature.this_parameter
        {
            declaration.parameters.push(self.parameter_to_declaration(this_parameter));
        }
        for parameter in &signature.parameters {
            declaration.parameters.push(self.parameter_to_declaration(parameter));
        }
        self.ctx.approximate_length += 3;
        declaration.return_type = self.serialize_return_type(signature_id);
        if signature.is_abstract && kind == SignatureKind::ConstructorType {
            declaration.modifiers.push(Modifier::Abstract);
        }
        declaration
    }

    fn parameter_to_declaration(&mut self, parameter: &ParamInfo) -> ParameterDeclaration {
        let type_node =
            self.serialize_type_for_declaration_helper(parameter.declaration, parameter.type_id, parameter.symbol);
        let mut declaration = factory::parameter(parameter.name.clone(), Some(type_node));
        declaration.modifiers = self.parameter_modifiers(parameter.declaration);
        declaration.dot_dot_dot = parameter.rest;
        declaration.question = parameter.optional && !parameter.rest;
        self.ctx.approximate_length += parameter.name.len() + 3;
        declaration
    }

    /// Property modifiers of a constructor parameter.
    fn parameter_modifiers(&self, declaration: NodeIndex) -> Vec<Modifier> {
        if declaration.is_none() || self.ctx.flags.contains(NodeBuilderFlags::OMIT_PARAMETER_MODIFIERS) {
            return Vec::new();
        }
        let arena = self.arena();
        if arena.kind(arena.parent(declaration)) != SyntaxKind::Constructor {
            return Vec::new();
        }
        let flags = arena.modifiers(declaration);
        [
            (modifier_flags::PUBLIC, Modifier::Public),
            (modifier_flags::PRIVATE, Modifier::Private),
            (modifier_flags::PROTECTED, Modifier::Protected),
            (modifier_flags::OVERRIDE, Modifier::Override),
            (modifier_flags::READONLY, Modifier::Readonly),
        ]
        .into_iter()
        .filter(|(flag, _)| flags & flag != 0)
        .map(|(_, modifier)| modifier)
        .collect()
    }

    // =========================================================================
    // Index signatures
    // =========================================================================

    pub(crate) fn index_info_to_index_signature_declaration_helper(
        &mut self,
        info: &IndexInfo,
        type_node: Option<TypeNode>,
    ) -> TypeElement {
        let parameter_name = self
            .index_parameter_name(info.declaration)
            .unwrap_or_else(|| "x".to_string());
        let key_type = self.type_to_type_node_helper(info.key_type);
        let type_node = match type_node {
            Some(node) => node,
            None => self.type_to_type_node_helper(info.type_id),
        };
        if info.type_id.is_error()
            && !self
                .ctx
                .flags
                .contains(NodeBuilderFlags::ALLOW_EMPTY_INDEX_INFO_TYPE)
        {
            self.ctx.encountered_error = true;
        }
        self.ctx.approximate_length += parameter_name.len() + 4;
        if info.is_readonly {
            self.ctx.approximate_length += 9;
        }
        TypeElement::Index {
            readonly: info.is_readonly,
            parameter_name,
            key_type,
            type_node,
        }
    }

    fn index_parameter_name(&self, declaration: NodeIndex) -> Option<String> {
        let arena = self.arena();
        let NodeData::IndexSignature { parameters, .. } = arena.data(declaration)? else {
            return None;
        };
        let parameter = *parameters.first()?;
        arena
            .identifier_text(arena.declaration_name(parameter))
            .map(str::to_string)
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    pub(crate) fn type_parameter_to_declaration_helper(&mut self, type_parameter: TypeId) -> TypeParameterDeclaration {
        let constraint = match &self.interner().get(type_parameter).data {
            TypeData::TypeParameter(info) => info.constraint,
            _ => None,
        };
        let constraint = constraint.map(|c| self.type_to_type_node_helper(c));
        self.type_parameter_to_declaration_with_constraint(type_parameter, constraint)
    }

    pub(crate) fn type_parameter_to_declaration_with_constraint(
        &mut self,
        type_parameter: TypeId,
        constraint: Option<TypeNode>,
    ) -> TypeParameterDeclaration {
        let info = self.interner().get(type_parameter);
        let TypeData::TypeParameter(param) = &info.data else {
            return factory::type_parameter("__missing_node__");
        };
        let mut flags = param
            .symbol
            .and_then(|symbol| self.checker.symbol(symbol))
            .and_then(|symbol| symbol.declarations.first().copied())
            .map_or(0, |decl| self.arena().modifiers(decl));
        if param.is_const {
            flags |= modifier_flags::CONST;
        }
        let name = self.type_parameter_to_name(type_parameter);
        let default = param.default.map(|d| Box::new(self.type_to_type_node_helper(d)));
        TypeParameterDeclaration {
            modifiers: type_parameter_modifiers(flags),
            name,
            constraint: constraint.map(Box::new),
            default,
        }
    }

    /// Written name of a type parameter. Under
    /// `GENERATE_NAMES_FOR_SHADOWED_TYPE_PARAMS` names that collide with
    /// another type parameter in scope get a `_N` suffix, stable per type
    /// for the rest of the request.
    pub(crate) fn type_parameter_to_name(&mut self, type_parameter: TypeId) -> String {
        let generate = self
            .ctx
            .flags
            .contains(NodeBuilderFlags::GENERATE_NAMES_FOR_SHADOWED_TYPE_PARAMS);
        if generate && let Some(name) = self.ctx.type_parameter_names.get(&type_parameter) {
            return name.clone();
        }
        let info = self.interner().get(type_parameter);
        let (raw, symbol) = match &info.data {
            TypeData::TypeParameter(param) => (
                param
                    .symbol
                    .map_or_else(|| param.name.clone(), |s| self.checker.symbol_name(s)),
                param.symbol,
            ),
            _ => return "__missing_node__".to_string(),
        };
        if !generate {
            return raw;
        }
        let mut count = self
            .ctx
            .type_parameter_next_name_count
            .get(&raw)
            .copied()
            .unwrap_or(0);
        let mut text = raw.clone();
        while self.ctx.type_parameter_names_by_text.contains(&text)
            || self.shadows_type_parameter_in_scope(&text, symbol)
        {
            count += 1;
            text = format!("{raw}_{count}");
        }
        self.ctx.type_parameter_next_name_count.insert(raw, count);
        self.ctx
            .type_parameter_names
            .insert(type_parameter, text.clone());
        self.ctx.type_parameter_names_by_text.insert(text.clone());
        text
    }

    fn shadows_type_parameter_in_scope(&self, text: &str, symbol: Option<SymbolId>) -> bool {
        let enclosing = self.ctx.enclosing_declaration;
        if enclosing.is_none() {
            return false;
        }
        self.checker
            .resolve_name(enclosing, text, symbol_flags::TYPE)
            .is_some_and(|found| {
                Some(found) != symbol
                    && self
                        .checker
                        .symbol(found)
                        .is_some_and(|s| s.has_flags(symbol_flags::TYPE_PARAMETER))
            })
    }
}

fn entry_matches(entry: &ReverseMappedEntry, property: &PropertyInfo) -> bool {
    match (entry.symbol, property.symbol) {
        (Some(a), Some(b)) => a == b,
        _ => {
            entry.name == property.name
                && property
                    .reverse_mapped
                    .is_some_and(|links| links.mapped_type == entry.mapped_type && links.property_type == entry.property_type)
        }
    }
}

#[cfg(test)]
#[path = "../tests/members_tests.rs"]
mod tests;
