//! Type to type-node dispatch.
//!
//! Every type shape maps onto one syntax form. Shapes that can recur
//! (anonymous objects, deferred references, conditional types) are built
//! through [`visit_and_transform`](NodeBuilderImpl::visit_and_transform),
//! which owns the cycle guard, the per-symbol depth limit and the
//! serialized-type cache.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};
use tsz_ast::synth::{
    EntityName, KeywordTypeKind, LiteralNode, MappedModifierToken, SignatureKind,
    TemplateLiteralSpan, TupleMember, TypeNode, TypeOperatorKind,
};
use tsz_ast::text::format_number;
use tsz_ast::{SyntaxKind, factory, is_identifier_text};
use tsz_binder::{SymbolId, symbol_flags};
use tsz_solver::{
    ConditionalType, ElementFlags, LiteralValue, MappedModifier, MappedType, ObjectFlags,
    TypeData, TypeFlags, TypeId, TypeInfo, TypeParamInfo, TypeSubstitution, instantiate_type,
};

use crate::builder::NodeBuilderImpl;
use crate::cache::{BudgetState, CompositeTypeCacheIdentity, SerializedTypeEntry};
use crate::context::CompositeSymbolIdentity;
use crate::flags::NodeBuilderFlags;
use crate::tracker::TrackerEvent;

/// What `visit_and_transform` builds once the guards pass.
#[derive(Clone, Copy, Debug)]
enum Transform {
    ObjectType,
    TypeReference,
    Conditional,
    Type,
}

impl<'a> NodeBuilderImpl<'a> {
    pub(crate) fn type_to_type_node_helper(&mut self, type_id: TypeId) -> TypeNode {
        let type_id = if self.ctx.flags.contains(NodeBuilderFlags::NO_TYPE_REDUCTION) {
            type_id
        } else {
            self.checker.get_reduced_type(type_id)
        };
        let info = self.interner().get(type_id);
        let in_type_alias = self.ctx.flags.contains(NodeBuilderFlags::IN_TYPE_ALIAS);
        self.ctx.flags.remove(NodeBuilderFlags::IN_TYPE_ALIAS);
        trace!(type_id = type_id.0, flags = ?info.flags, "type_to_type_node");

        if type_id.is_error() || info.has(TypeFlags::ANY) {
            return self.keyword(KeywordTypeKind::Any);
        }
        if type_id == TypeId::INTRINSIC {
            return self.keyword(KeywordTypeKind::Intrinsic);
        }
        if info.has(TypeFlags::UNKNOWN) {
            return self.keyword(KeywordTypeKind::Unknown);
        }
        if info.has(TypeFlags::STRING) {
            return self.keyword(KeywordTypeKind::String);
        }
        if info.has(TypeFlags::NUMBER) {
            return self.keyword(KeywordTypeKind::Number);
        }
        if info.has(TypeFlags::BIGINT) {
            return self.keyword(KeywordTypeKind::BigInt);
        }
        if info.has(TypeFlags::BOOLEAN) && info.alias_symbol.is_none() {
            return self.keyword(KeywordTypeKind::Boolean);
        }
        if info.has(TypeFlags::ENUM_LIKE) {
            return self.enum_like_to_type_node(&info);
        }
        if let TypeData::Literal { value, .. } = &info.data {
            return self.literal_to_type_node(value);
        }
        if info.has(TypeFlags::UNIQUE_ES_SYMBOL) {
            return self.unique_symbol_to_type_node(info.symbol);
        }
        if info.has(TypeFlags::VOID) {
            return self.keyword(KeywordTypeKind::Void);
        }
        if info.has(TypeFlags::UNDEFINED) {
            return self.keyword(KeywordTypeKind::Undefined);
        }
        if info.has(TypeFlags::NULL) {
            self.ctx.approximate_length += 4;
            return TypeNode::Literal(LiteralNode::Null);
        }
        if info.has(TypeFlags::NEVER) {
            return self.keyword(KeywordTypeKind::Never);
        }
        if info.has(TypeFlags::ES_SYMBOL) {
            return self.keyword(KeywordTypeKind::Symbol);
        }
        if info.has(TypeFlags::NON_PRIMITIVE) {
            return self.keyword(KeywordTypeKind::Object);
        }
        if let TypeData::TypeParameter(param) = &info.data
            && param.is_this
        {
            if self.ctx.flags.contains(NodeBuilderFlags::IN_OBJECT_TYPE_LITERAL) {
                if !self.ctx.flags.contains(NodeBuilderFlags::ALLOW_THIS_IN_OBJECT_LITERAL) {
                    self.ctx.encountered_error = true;
                }
                self.report(TrackerEvent::InaccessibleThis);
            }
            self.ctx.approximate_length += 4;
            return TypeNode::This;
        }

        if !in_type_alias
            && let Some(alias) = info.alias_symbol
            && (self
                .ctx
                .flags
                .contains(NodeBuilderFlags::USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE)
                || self.is_type_symbol_accessible(alias))
        {
            let arguments = self.map_to_type_nodes(&info.alias_type_arguments, false);
            if arguments.len() == 1 && self.is_global_array_symbol(alias) {
                if let Some(element) = arguments.into_iter().next() {
                    return factory::array(element);
                }
                return factory::array(factory::keyword(KeywordTypeKind::Any));
            }
            return self.symbol_to_type_node_helper(alias, symbol_flags::TYPE, arguments);
        }

        if info.has_object_flags(ObjectFlags::REFERENCE) {
            if let TypeData::Reference { node, .. } = &info.data
                && node.is_some()
            {
                return self.visit_and_transform(type_id, Transform::TypeReference);
            }
            return self.type_reference_to_type_node(type_id);
        }

        if let TypeData::TypeParameter(param) = &info.data {
            return self.type_parameter_usage_to_type_node(type_id, param);
        }
        if info.has_object_flags(ObjectFlags::CLASS_OR_INTERFACE) {
            return match info.symbol {
                Some(symbol) => self.named_or_structural(type_id, symbol),
                None => factory::identifier_reference("?"),
            };
        }

        if let TypeData::Union {
            origin: Some(origin),
            ..
        } = &info.data
        {
            return self.type_to_type_node_helper(*origin);
        }
        if info.has(TypeFlags::UNION_OR_INTERSECTION) {
            return self.union_or_intersection_to_type_node(&info);
        }

        if info.has_object_flags(ObjectFlags::ANONYMOUS | ObjectFlags::MAPPED)
            || matches!(info.data, TypeData::Object(_) | TypeData::Mapped(_))
        {
            return self.create_anonymous_type_node(type_id, &info);
        }

        match &info.data {
            TypeData::Index(target) => {
                self.ctx.approximate_length += 6;
                let target = self.type_to_type_node_helper(*target);
                factory::type_operator(TypeOperatorKind::KeyOf, target)
            }
            TypeData::TemplateLiteral { texts, types } => {
                let head = texts.first().cloned().unwrap_or_default();
                self.ctx.approximate_length += head.len() + 2;
                let spans = types
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        let literal = texts.get(i + 1).cloned().unwrap_or_default();
                        self.ctx.approximate_length += literal.len() + 3;
                        TemplateLiteralSpan {
                            type_node: self.type_to_type_node_helper(*t),
                            literal,
                        }
                    })
                    .collect();
                TypeNode::TemplateLiteral { head, spans }
            }
            TypeData::StringMapping { symbol, type_id } => {
                let argument = self.type_to_type_node_helper(*type_id);
                self.symbol_to_type_node_helper(*symbol, symbol_flags::TYPE, vec![argument])
            }
            TypeData::IndexedAccess {
                object_type,
                index_type,
            } => {
                let object_type = self.type_to_type_node_helper(*object_type);
                let index_type = self.type_to_type_node_helper(*index_type);
                self.ctx.approximate_length += 2;
                factory::indexed_access(object_type, index_type)
            }
            TypeData::Conditional(_) => self.visit_and_transform(type_id, Transform::Conditional),
            TypeData::Substitution { base_type, .. } => self.type_to_type_node_helper(*base_type),
            _ => {
                debug!(type_id = type_id.0, "no syntax for type shape");
                self.keyword(KeywordTypeKind::Any)
            }
        }
    }

    fn keyword(&mut self, kind: KeywordTypeKind) -> TypeNode {
        self.ctx.approximate_length += kind.text().len();
        factory::keyword(kind)
    }

    /// `...`, or `any` when the request asked for no truncation.
    pub(crate) fn create_elided_information_placeholder(&mut self) -> TypeNode {
        self.ctx.approximate_length += tsz_common::limits::ELIDED_PLACEHOLDER_LENGTH;
        if self.ctx.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
            factory::keyword(KeywordTypeKind::Any)
        } else {
            factory::elided_placeholder()
        }
    }

    /// `... N more ...` standing in for elided list members.
    fn elided_count_marker(&mut self, count: usize) -> TypeNode {
        if self.ctx.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
            return factory::keyword(KeywordTypeKind::Any);
        }
        factory::identifier_reference(format!("... {count} more ..."))
    }

    pub(crate) fn is_type_symbol_accessible(&self, symbol: SymbolId) -> bool {
        self.checker
            .is_symbol_accessible(symbol, self.ctx.enclosing_declaration, symbol_flags::TYPE)
            .is_accessible()
    }

    fn is_global_array_symbol(&self, symbol: SymbolId) -> bool {
        self.checker
            .globals()
            .array
            .is_some_and(|array| self.interner().get(array).symbol == Some(symbol))
    }

    /// Name of a class or interface, or its members when the name is not
    /// reachable from the enclosing declaration.
    fn named_or_structural(&mut self, type_id: TypeId, symbol: SymbolId) -> TypeNode {
        if let Some(node) = self.inaccessible_structure(type_id, symbol) {
            return node;
        }
        self.symbol_to_type_node_helper(symbol, symbol_flags::TYPE, Vec::new())
    }

    /// Members of `type_id` when `symbol` cannot be named here. A type that
    /// refers back to itself is written by name inside its own expansion.
    fn inaccessible_structure(&mut self, type_id: TypeId, symbol: SymbolId) -> Option<TypeNode> {
        if self.is_type_symbol_accessible(symbol) {
            return None;
        }
        if self.ctx.inaccessible_expansions.contains(&symbol) {
            self.ctx.cycle_cutoffs += 1;
            return None;
        }
        trace!(type_id = type_id.0, symbol = symbol.0, "structural fallback for inaccessible name");
        self.ctx.inaccessible_expansions.push(symbol);
        let node = self.visit_and_transform(type_id, Transform::ObjectType);
        self.ctx.inaccessible_expansions.pop();
        Some(node)
    }

    // =========================================================================
    // Literals, enums, unique symbols
    // =========================================================================

    fn literal_to_type_node(&mut self, value: &LiteralValue) -> TypeNode {
        match value {
            LiteralValue::String(text) => {
                self.ctx.approximate_length += text.len() + 2;
                let single_quote = self
                    .ctx
                    .flags
                    .contains(NodeBuilderFlags::USE_SINGLE_QUOTES_FOR_STRING_LITERAL_TYPE);
                factory::string_literal_type(text.clone(), single_quote)
            }
            LiteralValue::Number(value) => {
                let text = format_number(value.0);
                self.ctx.approximate_length += text.len();
                factory::number_literal_type(&text)
            }
            LiteralValue::BigInt(digits) => {
                self.ctx.approximate_length += digits.len() + 1;
                factory::bigint_literal_type(digits)
            }
            LiteralValue::Boolean(value) => {
                if *value {
                    self.ctx.approximate_length += 4;
                    TypeNode::Literal(LiteralNode::True)
                } else {
                    self.ctx.approximate_length += 5;
                    TypeNode::Literal(LiteralNode::False)
                }
            }
        }
    }

    fn enum_like_to_type_node(&mut self, info: &TypeInfo) -> TypeNode {
        let Some(symbol) = info.symbol else {
            return self.keyword(KeywordTypeKind::Any);
        };
        let member = self
            .checker
            .symbol(symbol)
            .filter(|s| s.has_flags(symbol_flags::ENUM_MEMBER))
            .map(|s| (s.escaped_name.clone(), s.parent));
        let Some((member_name, parent)) = member else {
            return self.symbol_to_type_node_helper(symbol, symbol_flags::TYPE, Vec::new());
        };
        let Some(parent) = parent else {
            return self.symbol_to_type_node_helper(symbol, symbol_flags::TYPE, Vec::new());
        };
        let parent_name = self.symbol_to_type_node_helper(parent, symbol_flags::TYPE, Vec::new());
        if self.checker.get_declared_type_of_symbol(parent) == info.id {
            return parent_name;
        }
        if is_identifier_text(&member_name) {
            self.ctx.approximate_length += member_name.len() + 1;
            return append_member_to_reference(parent_name, &member_name);
        }
        self.ctx.approximate_length += member_name.len() + 11;
        let index = factory::string_literal_type(member_name, false);
        match parent_name {
            TypeNode::Import {
                argument,
                qualifier,
                type_arguments,
                ..
            } => factory::indexed_access(
                TypeNode::Import {
                    argument,
                    qualifier,
                    type_arguments,
                    is_type_of: true,
                },
                index,
            ),
            TypeNode::Reference { name, .. } => {
                factory::indexed_access(factory::type_query(name, Vec::new()), index)
            }
            other => factory::indexed_access(other, index),
        }
    }

    fn unique_symbol_to_type_node(&mut self, symbol: Option<SymbolId>) -> TypeNode {
        if !self.ctx.flags.contains(NodeBuilderFlags::ALLOW_UNIQUE_ES_SYMBOL_TYPE) {
            if let Some(symbol) = symbol
                && self
                    .checker
                    .is_value_symbol_accessible(symbol, self.ctx.enclosing_declaration)
            {
                self.ctx.approximate_length += 6;
                return self.symbol_to_type_node_helper(symbol, symbol_flags::VALUE, Vec::new());
            }
            self.report(TrackerEvent::InaccessibleUniqueSymbol);
        }
        self.ctx.approximate_length += 13;
        factory::type_operator(
            TypeOperatorKind::Unique,
            factory::keyword(KeywordTypeKind::Symbol),
        )
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    fn type_parameter_usage_to_type_node(&mut self, type_id: TypeId, param: &TypeParamInfo) -> TypeNode {
        if self.ctx.infer_type_parameters.contains(&type_id) {
            self.ctx.approximate_length += param.name.len() + 6;
            let constraint = param.constraint.map(|constraint| {
                self.ctx.approximate_length += 9;
                self.type_to_type_node_helper(constraint)
            });
            let declaration = self.type_parameter_to_declaration_with_constraint(type_id, constraint);
            return TypeNode::Infer(Box::new(declaration));
        }
        if self
            .ctx
            .flags
            .contains(NodeBuilderFlags::GENERATE_NAMES_FOR_SHADOWED_TYPE_PARAMS)
        {
            let name = self.type_parameter_to_name(type_id);
            self.ctx.approximate_length += name.len();
            return factory::identifier_reference(name);
        }
        match param.symbol {
            Some(symbol) => self.symbol_to_type_node_helper(symbol, symbol_flags::TYPE, Vec::new()),
            None => {
                self.ctx.approximate_length += param.name.len();
                factory::identifier_reference(param.name.clone())
            }
        }
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    fn union_or_intersection_to_type_node(&mut self, info: &TypeInfo) -> TypeNode {
        let is_union = info.has(TypeFlags::UNION);
        let types = if is_union {
            self.format_union_types(info.constituents())
        } else {
            info.constituents().to_vec()
        };
        if types.len() == 1 {
            return self.type_to_type_node_helper(types[0]);
        }
        let nodes = self.map_to_type_nodes(&types, true);
        if nodes.is_empty() {
            if !self
                .ctx
                .flags
                .contains(NodeBuilderFlags::ALLOW_EMPTY_UNION_OR_INTERSECTION)
            {
                self.ctx.encountered_error = true;
            }
            return if is_union {
                factory::keyword(KeywordTypeKind::Never)
            } else {
                factory::keyword(KeywordTypeKind::Unknown)
            };
        }
        if is_union {
            factory::union(nodes)
        } else {
            factory::intersection(nodes)
        }
    }

    /// Folds boolean literal pairs and complete enum member runs back into
    /// `boolean` and the enum, and moves `null`/`undefined` to the end.
    fn format_union_types(&self, types: &[TypeId]) -> Vec<TypeId> {
        let interner = self.interner();
        let mut result = Vec::with_capacity(types.len());
        let mut seen_flags = TypeFlags::empty();
        let mut i = 0;
        while i < types.len() {
            let t = types[i];
            let flags = interner.flags(t);
            seen_flags |= flags;
            if flags.intersects(TypeFlags::NULLABLE) {
                i += 1;
                continue;
            }
            if flags.intersects(TypeFlags::BOOLEAN_LITERAL | TypeFlags::ENUM_LIKE) {
                let base = if flags.intersects(TypeFlags::BOOLEAN_LITERAL) {
                    TypeId::BOOLEAN
                } else {
                    interner.base_type_of_enum_like(t)
                };
                let base_info = interner.get(base);
                if base_info.has(TypeFlags::UNION) {
                    let base_types = base_info.constituents();
                    let count = base_types.len();
                    if count > 0
                        && i + count <= types.len()
                        && interner.regular_type_of_literal(types[i + count - 1])
                            == interner.regular_type_of_literal(base_types[count - 1])
                    {
                        result.push(base);
                        i += count;
                        continue;
                    }
                }
            }
            result.push(t);
            i += 1;
        }
        if seen_flags.contains(TypeFlags::NULL) {
            result.push(TypeId::NULL);
        }
        if seen_flags.contains(TypeFlags::UNDEFINED) {
            result.push(TypeId::UNDEFINED);
        }
        result
    }

    /// Nodes for a list of types, abbreviated once truncation latches.
    /// `bare` lists (union and intersection members) keep their first and
    /// last member when abbreviated.
    pub(crate) fn map_to_type_nodes(&mut self, types: &[TypeId], bare: bool) -> Vec<TypeNode> {
        if types.is_empty() {
            return Vec::new();
        }
        if self.ctx.check_truncation_length() {
            if !bare {
                return vec![self.elided_list_placeholder()];
            }
            if types.len() > 2 {
                let first = self.type_to_type_node_helper(types[0]);
                let marker = self.elided_count_marker(types.len() - 2);
                let last = self.type_to_type_node_helper(types[types.len() - 1]);
                return vec![first, marker, last];
            }
        }
        let may_have_name_collisions = !self
            .ctx
            .flags
            .contains(NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE);
        let mut seen_names: FxHashMap<String, SmallVec<[(TypeId, usize); 2]>> = FxHashMap::default();
        let mut result = Vec::with_capacity(types.len());
        for (index, &t) in types.iter().enumerate() {
            let i = index + 1;
            if self.ctx.check_truncation_length() && i + 3 < types.len() {
                result.push(self.elided_count_marker(types.len() - i));
                result.push(self.type_to_type_node_helper(types[types.len() - 1]));
                break;
            }
            self.ctx.approximate_length += 2;
            let node = self.type_to_type_node_helper(t);
            if may_have_name_collisions
                && let TypeNode::Reference {
                    name: EntityName::Identifier(text),
                    ..
                } = &node
                && !node.is_elided_placeholder()
            {
                seen_names
                    .entry(text.clone())
                    .or_default()
                    .push((t, result.len()));
            }
            result.push(node);
        }
        if may_have_name_collisions {
            self.requalify_colliding_names(seen_names, &mut result);
        }
        result
    }

    fn elided_list_placeholder(&mut self) -> TypeNode {
        if self.ctx.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
            return factory::keyword(KeywordTypeKind::Any);
        }
        factory::elided_placeholder()
    }

    /// Rewrites sibling references that print the same but denote
    /// different types with fully qualified names.
    fn requalify_colliding_names(
        &mut self,
        seen_names: FxHashMap<String, SmallVec<[(TypeId, usize); 2]>>,
        result: &mut [TypeNode],
    ) {
        let saved_flags = self.ctx.flags;
        self.ctx.flags |= NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE;
        for (name, entries) in seen_names {
            let Some(&(first, _)) = entries.first() else {
                continue;
            };
            if entries.iter().all(|(t, _)| self.types_are_same_reference(first, *t)) {
                continue;
            }
            trace!(name = %name, count = entries.len(), "requalifying colliding names");
            for (t, index) in entries {
                if let Some(slot) = result.get_mut(index) {
                    *slot = self.type_to_type_node_helper(t);
                }
            }
        }
        self.ctx.flags = saved_flags;
    }

    fn types_are_same_reference(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let interner = self.interner();
        let (a, b) = (interner.get(a), interner.get(b));
        a.symbol.is_some() && a.symbol == b.symbol
            || a.alias_symbol.is_some() && a.alias_symbol == b.alias_symbol
    }

    // =========================================================================
    // Recursion guard and cache
    // =========================================================================

    fn symbol_identity(&self, info: &TypeInfo) -> Option<CompositeSymbolIdentity> {
        if let TypeData::Reference { node, .. } = &info.data
            && node.is_some()
        {
            return Some(CompositeSymbolIdentity::Node(*node));
        }
        if let TypeData::Conditional(conditional) = &info.data {
            return Some(CompositeSymbolIdentity::Node(conditional.root.node));
        }
        let symbol = info.symbol?;
        let is_constructor = info.has_object_flags(ObjectFlags::ANONYMOUS)
            && self
                .checker
                .symbol(symbol)
                .is_some_and(|s| s.has_flags(symbol_flags::CLASS));
        Some(CompositeSymbolIdentity::Symbol {
            symbol,
            is_constructor,
        })
    }

    fn cache_enabled(&self) -> bool {
        self.options.enable_cache
            && self.cache.is_some()
            && self.ctx.enclosing_declaration.is_some()
    }

    fn budget_state(&self) -> BudgetState {
        BudgetState {
            approximate_length: self.ctx.approximate_length,
            truncating: self.ctx.truncating,
            max_truncation_length: self.ctx.max_truncation_length,
        }
    }

    fn visit_and_transform(&mut self, type_id: TypeId, transform: Transform) -> TypeNode {
        let info = self.interner().get(type_id);
        let enclosing = self.ctx.enclosing_declaration;
        let key = CompositeTypeCacheIdentity {
            type_id,
            flags: self.ctx.flags,
            internal_flags: self.ctx.internal_flags,
        };

        if self.cache_enabled()
            && let Some(cache) = self.cache
            && let Some(entry) = cache.get(enclosing, &key)
            && entry.is_reusable_from(self.budget_state())
        {
            debug!(type_id = type_id.0, enclosing = enclosing.0, "serialized type cache hit");
            for args in &entry.tracked_symbols {
                self.track_symbol(args.symbol, args.enclosing_declaration, args.meaning);
            }
            if entry.truncating {
                self.ctx.truncating = true;
            }
            self.ctx.approximate_length += entry.added_length;
            return entry.node;
        }

        let identity = self.symbol_identity(&info);
        let mut saved_depth = 0;
        if let Some(identity) = identity {
            saved_depth = self.ctx.symbol_depth.get(&identity).copied().unwrap_or(0);
            if saved_depth > self.options.maximum_symbol_depth {
                debug!(type_id = type_id.0, depth = saved_depth, "symbol depth cutoff");
                self.ctx.cycle_cutoffs += 1;
                return self.create_elided_information_placeholder();
            }
            self.ctx.symbol_depth.insert(identity, saved_depth + 1);
        }
        self.ctx.visited_types.insert(type_id);
        let outer_tracked = std::mem::take(&mut self.ctx.tracked_symbols);
        let started = self.budget_state();
        let cutoffs_before = self.ctx.cycle_cutoffs;

        let node = match transform {
            Transform::ObjectType => self.create_type_node_from_object_type(type_id, &info),
            Transform::TypeReference => self.type_reference_to_type_node(type_id),
            Transform::Conditional => match &info.data {
                TypeData::Conditional(conditional) => self.conditional_type_to_type_node(conditional),
                _ => self.keyword(KeywordTypeKind::Any),
            },
            Transform::Type => self.type_to_type_node_helper(type_id),
        };

        let added_length = self.ctx.approximate_length.saturating_sub(started.approximate_length);
        // A node that elided a cycle depends on what was on the visiting
        // stack, so it is only valid for this request.
        let cut_by_cycle = self.ctx.cycle_cutoffs != cutoffs_before;
        if self.cache_enabled()
            && !cut_by_cycle
            && !self.ctx.reported_diagnostic
            && !self.ctx.encountered_error
            && !self.ctx.in_recovery_boundary()
            && let Some(cache) = self.cache
        {
            cache.insert(
                enclosing,
                key,
                SerializedTypeEntry {
                    node: node.clone(),
                    truncating: self.ctx.truncating,
                    added_length,
                    tracked_symbols: self.ctx.tracked_symbols.clone(),
                    started,
                },
            );
        }
        self.ctx.visited_types.remove(&type_id);
        if let Some(identity) = identity {
            self.ctx.symbol_depth.insert(identity, saved_depth);
        }
        let inner_tracked = std::mem::replace(&mut self.ctx.tracked_symbols, outer_tracked);
        self.ctx.tracked_symbols.extend(inner_tracked);
        node
    }

    // =========================================================================
    // Anonymous and object types
    // =========================================================================

    fn create_anonymous_type_node(&mut self, type_id: TypeId, info: &TypeInfo) -> TypeNode {
        let Some(symbol) = info.symbol else {
            if self.ctx.visited_types.contains(&type_id) {
                self.ctx.cycle_cutoffs += 1;
                return self.create_elided_information_placeholder();
            }
            self.ctx.visited_types.insert(type_id);
            let node = self.create_type_node_from_object_type(type_id, info);
            self.ctx.visited_types.remove(&type_id);
            return node;
        };
        let Some(sym) = self.checker.symbol(symbol) else {
            return self.visit_and_transform(type_id, Transform::ObjectType);
        };
        let flags = sym.flags;
        let value_declaration = sym.value_declaration;

        let is_class_written_as_literal = {
            let kind = self.arena().kind(value_declaration);
            let class_like = matches!(kind, SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression);
            class_like
                && self
                    .ctx
                    .flags
                    .contains(NodeBuilderFlags::WRITE_CLASS_EXPRESSION_AS_TYPE_LITERAL)
                && (kind != SyntaxKind::ClassDeclaration
                    || !self
                        .checker
                        .is_symbol_accessible(symbol, self.ctx.enclosing_declaration, symbol_flags::VALUE)
                        .is_accessible())
        };
        if flags & symbol_flags::CLASS != 0 && !is_class_written_as_literal
            || flags & (symbol_flags::ENUM | symbol_flags::VALUE_MODULE) != 0
            || self.should_write_type_of_function_symbol(type_id, symbol, flags)
        {
            return self.symbol_to_type_node_helper(symbol, symbol_flags::VALUE, Vec::new());
        }
        if self.ctx.visited_types.contains(&type_id) {
            self.ctx.cycle_cutoffs += 1;
            if let Some(alias) = info.alias_symbol {
                return self.symbol_to_type_node_helper(alias, symbol_flags::TYPE, Vec::new());
            }
            return self.create_elided_information_placeholder();
        }
        self.visit_and_transform(type_id, Transform::ObjectType)
    }

    fn should_write_type_of_function_symbol(&self, type_id: TypeId, symbol: SymbolId, flags: u32) -> bool {
        let arena = self.arena();
        let Some(sym) = self.checker.symbol(symbol) else {
            return false;
        };
        let is_static_method = flags & symbol_flags::METHOD != 0
            && sym
                .declarations
                .iter()
                .any(|d| arena.has_modifier(*d, tsz_ast::modifier_flags::STATIC));
        let is_non_local_function = flags & symbol_flags::FUNCTION != 0
            && (sym.parent.is_some()
                || sym.declarations.iter().any(|d| {
                    matches!(
                        arena.kind(arena.parent(*d)),
                        SyntaxKind::SourceFile | SyntaxKind::ModuleBlock
                    )
                }));
        if !is_static_method && !is_non_local_function {
            return false;
        }
        (self.ctx.flags.contains(NodeBuilderFlags::USE_TYPE_OF_FUNCTION)
            || self.ctx.visited_types.contains(&type_id))
            && (!self.ctx.flags.contains(NodeBuilderFlags::USE_STRUCTURAL_FALLBACK)
                || self
                    .checker
                    .is_value_symbol_accessible(symbol, self.ctx.enclosing_declaration))
    }

    fn create_type_node_from_object_type(&mut self, type_id: TypeId, info: &TypeInfo) -> TypeNode {
        if let TypeData::Mapped(mapped) = &info.data {
            return self.mapped_type_to_type_node(mapped);
        }
        let Some(resolved) = self.interner().resolved_members(type_id) else {
            return self.keyword(KeywordTypeKind::Any);
        };
        if resolved.properties.is_empty() && resolved.index_infos.is_empty() {
            match (
                resolved.call_signatures.as_slice(),
                resolved.construct_signatures.as_slice(),
            ) {
                ([], []) => {
                    self.ctx.approximate_length += 2;
                    return TypeNode::TypeLiteral(Vec::new());
                }
                ([signature], []) => {
                    let declaration =
                        self.signature_to_signature_declaration_helper(*signature, SignatureKind::FunctionType);
                    return TypeNode::Function(Box::new(declaration));
                }
                ([], [signature]) => {
                    let declaration = self
                        .signature_to_signature_declaration_helper(*signature, SignatureKind::ConstructorType);
                    return TypeNode::Function(Box::new(declaration));
                }
                _ => {}
            }
        }
        let saved_flags = self.ctx.flags;
        self.ctx.flags |= NodeBuilderFlags::IN_OBJECT_TYPE_LITERAL;
        let is_reverse_mapped = info.has_object_flags(ObjectFlags::REVERSE_MAPPED);
        let members = self.create_type_nodes_from_resolved_type(&resolved, is_reverse_mapped);
        self.ctx.flags = saved_flags;
        self.ctx.approximate_length += 2;
        TypeNode::TypeLiteral(members)
    }

    fn mapped_type_to_type_node(&mut self, mapped: &MappedType) -> TypeNode {
        let readonly_token = mapped_modifier_token(mapped.readonly_modifier);
        let question_token = mapped_modifier_token(mapped.optional_modifier);
        let constraint = self.type_to_type_node_helper(mapped.constraint_type);
        let type_parameter =
            self.type_parameter_to_declaration_with_constraint(mapped.type_parameter, Some(constraint));
        let name_type = mapped
            .name_type
            .map(|t| Box::new(self.type_to_type_node_helper(t)));
        let type_node = mapped
            .template_type
            .map(|t| Box::new(self.type_to_type_node_helper(t)));
        self.ctx.approximate_length += 10;
        TypeNode::Mapped {
            readonly_token,
            type_parameter: Box::new(type_parameter),
            name_type,
            question_token,
            type_node,
        }
    }

    // =========================================================================
    // References and tuples
    // =========================================================================

    fn type_reference_to_type_node(&mut self, type_id: TypeId) -> TypeNode {
        let interner = self.interner();
        let info = interner.get(type_id);
        let (target, mut type_arguments) = match &info.data {
            TypeData::Reference {
                target,
                type_arguments,
                ..
            } => (*target, type_arguments.clone()),
            _ => (type_id, Vec::new()),
        };
        let globals = self.checker.globals();
        if Some(target) == globals.array || Some(target) == globals.readonly_array {
            let is_array = Some(target) == globals.array;
            let element = type_arguments.first().copied().unwrap_or(TypeId::ANY);
            if self
                .ctx
                .flags
                .contains(NodeBuilderFlags::WRITE_ARRAY_AS_GENERIC_TYPE)
            {
                let argument = self.type_to_type_node_helper(element);
                let name = if is_array { "Array" } else { "ReadonlyArray" };
                return factory::type_reference(EntityName::ident(name), vec![argument]);
            }
            let array = factory::array(self.type_to_type_node_helper(element));
            return if is_array {
                array
            } else {
                factory::type_operator(TypeOperatorKind::Readonly, array)
            };
        }
        if let Some((tuple, elements)) = interner.tuple_parts(type_id) {
            return self.tuple_to_type_node(&tuple, &elements);
        }
        let Some(symbol) = info.symbol.or_else(|| interner.get(target).symbol) else {
            return self.create_elided_information_placeholder();
        };
        if self
            .ctx
            .flags
            .contains(NodeBuilderFlags::USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE)
            && self.is_class_like_symbol(symbol)
            && !self
                .checker
                .is_value_symbol_accessible(symbol, self.ctx.enclosing_declaration)
        {
            return self.visit_and_transform(type_id, Transform::ObjectType);
        }
        if globals.iterable_targets().any(|t| t == target) {
            let parameters = interner.target_type_parameters(target);
            while let Some(&last) = type_arguments.last() {
                let index = type_arguments.len() - 1;
                let default = parameters
                    .get(index)
                    .and_then(|p| interner.type_parameter_default(*p));
                if default != Some(last) {
                    break;
                }
                type_arguments.pop();
            }
        }
        if let Some(node) = self.inaccessible_structure(type_id, symbol) {
            return node;
        }
        let arguments = self.map_to_type_nodes(&type_arguments, false);
        let saved_flags = self.ctx.flags;
        self.ctx.flags |= NodeBuilderFlags::IN_INITIAL_ENTITY_NAME;
        let node = self.symbol_to_type_node_helper(symbol, symbol_flags::TYPE, arguments);
        self.ctx.flags = saved_flags;
        node
    }

    fn is_class_like_symbol(&self, symbol: SymbolId) -> bool {
        self.checker.symbol(symbol).is_some_and(|s| {
            matches!(
                self.arena().kind(s.value_declaration),
                SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression
            )
        })
    }

    fn tuple_to_type_node(&mut self, tuple: &tsz_solver::TupleType, elements: &[TypeId]) -> TypeNode {
        let interner = self.interner();
        let elements: Vec<TypeId> = elements
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let optional = tuple
                    .element_flags
                    .get(i)
                    .is_some_and(|f| f.contains(ElementFlags::OPTIONAL));
                if optional {
                    interner.filter_type(*t, TypeFlags::UNDEFINED)
                } else {
                    *t
                }
            })
            .collect();
        let wrap = |node: TypeNode| {
            if tuple.readonly {
                factory::type_operator(TypeOperatorKind::Readonly, node)
            } else {
                node
            }
        };
        if !elements.is_empty() {
            let nodes = self.map_to_type_nodes(&elements, false);
            let members = nodes
                .into_iter()
                .enumerate()
                .map(|(i, node)| {
                    let flags = tuple.element_flags.get(i).copied().unwrap_or(ElementFlags::REQUIRED);
                    let is_variable = flags.intersects(ElementFlags::REST | ElementFlags::VARIADIC);
                    let rest_node = |node: TypeNode| {
                        if flags.contains(ElementFlags::REST) {
                            factory::array(node)
                        } else {
                            node
                        }
                    };
                    match tuple.labels.get(i).and_then(Option::as_ref) {
                        Some(label) => TupleMember::Named {
                            dot_dot_dot: is_variable,
                            name: label.name.clone(),
                            question: flags.contains(ElementFlags::OPTIONAL),
                            type_node: rest_node(node),
                        },
                        None if is_variable => TupleMember::Rest(rest_node(node)),
                        None if flags.contains(ElementFlags::OPTIONAL) => TupleMember::Optional(node),
                        None => TupleMember::Plain(node),
                    }
                })
                .collect();
            return wrap(TypeNode::Tuple(members));
        }
        if !self.ctx.encountered_error && !self.ctx.flags.contains(NodeBuilderFlags::ALLOW_EMPTY_TUPLE) {
            self.ctx.encountered_error = true;
        }
        wrap(TypeNode::Tuple(Vec::new()))
    }

    // =========================================================================
    // Conditional types
    // =========================================================================

    fn conditional_type_to_type_node(&mut self, conditional: &ConditionalType) -> TypeNode {
        let check_type = self.type_to_type_node_helper(conditional.check_type);
        self.ctx.approximate_length += 15;
        let check_is_type_parameter = self
            .interner()
            .flags(conditional.check_type)
            .contains(TypeFlags::TYPE_PARAMETER);
        if self
            .ctx
            .flags
            .contains(NodeBuilderFlags::GENERATE_NAMES_FOR_SHADOWED_TYPE_PARAMS)
            && conditional.root.is_distributive
            && !check_is_type_parameter
        {
            return self.distributive_conditional_with_fresh_check(conditional, check_type);
        }
        let saved_infer = std::mem::replace(
            &mut self.ctx.infer_type_parameters,
            conditional.root.infer_type_parameters.clone(),
        );
        let extends_type = self.type_to_type_node_helper(conditional.extends_type);
        self.ctx.infer_type_parameters = saved_infer;
        let true_type = self.type_to_type_node_or_circularity_elision(conditional.true_type);
        let false_type = self.type_to_type_node_or_circularity_elision(conditional.false_type);
        factory::conditional(check_type, extends_type, true_type, false_type)
    }

    /// `C extends infer T ? T extends X ? A : B : never`, keeping the
    /// distribution over `C` once the original check variable is replaced
    /// by a non-variable type.
    fn distributive_conditional_with_fresh_check(
        &mut self,
        conditional: &ConditionalType,
        check_type: TypeNode,
    ) -> TypeNode {
        let interner = self.interner();
        let root_name = match &interner.get(conditional.root.check_type).data {
            TypeData::TypeParameter(param) => param.name.clone(),
            _ => "T".to_string(),
        };
        let fresh = interner.type_parameter(TypeParamInfo::new(root_name));
        let name = self.type_parameter_to_name(fresh);
        self.ctx.approximate_length += 37;
        // Re-instantiate the root branches so only occurrences of the check
        // variable move to the fresh name; other parameters keep the outer
        // mapping even when they map to the same type as the check.
        let mut substitution = conditional.mapper.clone().unwrap_or_default();
        substitution.insert(conditional.root.check_type, fresh);
        let root = &conditional.root;
        let saved_infer = std::mem::replace(
            &mut self.ctx.infer_type_parameters,
            root.infer_type_parameters.clone(),
        );
        let extends_type =
            self.type_to_type_node_helper(instantiate_type(interner, root.extends_type, &substitution));
        self.ctx.infer_type_parameters = saved_infer;
        let true_type =
            self.type_to_type_node_or_circularity_elision(instantiate_type(interner, root.true_type, &substitution));
        let false_type =
            self.type_to_type_node_or_circularity_elision(instantiate_type(interner, root.false_type, &substitution));
        let inner = factory::conditional(
            factory::identifier_reference(name.clone()),
            extends_type,
            true_type,
            false_type,
        );
        factory::conditional(
            check_type,
            TypeNode::Infer(Box::new(factory::type_parameter(name))),
            inner,
            factory::keyword(KeywordTypeKind::Never),
        )
    }

    fn type_to_type_node_or_circularity_elision(&mut self, type_id: TypeId) -> TypeNode {
        if !self.interner().flags(type_id).contains(TypeFlags::UNION) {
            return self.type_to_type_node_helper(type_id);
        }
        if self.ctx.visited_types.contains(&type_id) {
            if !self
                .ctx
                .flags
                .contains(NodeBuilderFlags::ALLOW_ANONYMOUS_IDENTIFIER)
            {
                self.ctx.encountered_error = true;
                self.report(TrackerEvent::CyclicStructure);
            }
            self.ctx.cycle_cutoffs += 1;
            return self.create_elided_information_placeholder();
        }
        self.visit_and_transform(type_id, Transform::Type)
    }
}

fn mapped_modifier_token(modifier: MappedModifier) -> Option<MappedModifierToken> {
    match modifier {
        MappedModifier::None => None,
        MappedModifier::Add => Some(MappedModifierToken::Plain),
        MappedModifier::Remove => Some(MappedModifierToken::Minus),
    }
}

/// `E` to `E.A`, keeping type arguments and import qualifiers intact.
fn append_member_to_reference(parent: TypeNode, member: &str) -> TypeNode {
    match parent {
        TypeNode::Reference {
            name,
            type_arguments,
        } => factory::type_reference(EntityName::Qualified(Box::new(name), member.to_string()), type_arguments),
        TypeNode::Import {
            argument,
            qualifier,
            type_arguments,
            is_type_of,
        } => TypeNode::Import {
            argument,
            qualifier: Some(match qualifier {
                Some(q) => EntityName::Qualified(Box::new(q), member.to_string()),
                None => EntityName::ident(member),
            }),
            type_arguments,
            is_type_of,
        },
        other => factory::indexed_access(other, factory::string_literal_type(member, false)),
    }
}
