//! Types of symbols, declared types and signatures computed from declarations.

use tracing::trace;
use tsz_ast::{NodeData, NodeIndex, SyntaxKind, modifier_flags};
use tsz_binder::{SymbolId, symbol_flags};
use tsz_solver::{
    IndexInfo, InterfaceType, LiteralValue, ObjectFlags, ObjectType, OrderedFloat, ParamInfo,
    PropertyInfo, Signature, SignatureId, TypeData, TypeFlags, TypeId, TypeInfo, TypeParamInfo,
    TypePredicate, Visibility,
};

use crate::checker::Checker;
use crate::query::TypeChecker;

/// Parses the text of a numeric literal, including `0x`/`0o`/`0b` forms and
/// `_` separators.
pub fn parse_numeric_literal(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix = if lower.starts_with("0x") {
        Some(16)
    } else if lower.starts_with("0o") {
        Some(8)
    } else if lower.starts_with("0b") {
        Some(2)
    } else {
        None
    };
    match radix {
        Some(radix) => u64::from_str_radix(&lower[2..], radix).map_or(f64::NAN, |v| v as f64),
        None => cleaned.parse::<f64>().unwrap_or(f64::NAN),
    }
}

impl Checker {
    pub(crate) fn compute_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        let Some(sym) = self.binder().symbol(symbol) else {
            return TypeId::ERROR;
        };
        let flags = sym.flags;
        if flags & symbol_flags::ENUM_MEMBER != 0 {
            return self.get_declared_type_of_symbol(symbol);
        }
        if flags & symbol_flags::ACCESSOR != 0 {
            return self.accessor_read_type(symbol);
        }
        if flags & (symbol_flags::FUNCTION | symbol_flags::METHOD) != 0
            && flags & symbol_flags::VARIABLE == 0
        {
            return self.function_type_of_symbol(symbol);
        }
        let declaration = if sym.value_declaration.is_some() {
            sym.value_declaration
        } else {
            sym.declarations.first().copied().unwrap_or(NodeIndex::NONE)
        };
        match self.arena().kind(declaration) {
            SyntaxKind::VariableDeclaration
            | SyntaxKind::Parameter
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::PropertySignature
            | SyntaxKind::PropertyAssignment
            | SyntaxKind::JSDocPropertyTag => self.type_of_variable_like(declaration),
            SyntaxKind::ShorthandPropertyAssignment => {
                let arena = self.arena();
                arena
                    .identifier_text(arena.declaration_name(declaration))
                    .and_then(|name| {
                        self.resolve_name(arena.parent(declaration), name, symbol_flags::VALUE)
                    })
                    .map_or(TypeId::ERROR, |target| self.get_type_of_symbol(target))
            }
            _ => TypeId::ERROR,
        }
    }

    fn type_of_variable_like(&self, declaration: NodeIndex) -> TypeId {
        let arena = self.arena();
        let annotation = arena.type_annotation(declaration);
        let base = if annotation.is_some() {
            self.get_type_from_type_node(annotation)
        } else {
            let initializer = arena.initializer(declaration);
            if initializer.is_none() {
                return TypeId::ANY;
            }
            let initial = self.get_type_of_expression(initializer);
            if arena.is_declaration_readonly(declaration) {
                self.get_widened_type(self.interner().regular_type_of_literal(initial))
            } else {
                self.get_widened_type(initial)
            }
        };
        let optional = arena.has_question_token(declaration)
            && matches!(
                arena.kind(declaration),
                SyntaxKind::Parameter
                    | SyntaxKind::PropertySignature
                    | SyntaxKind::PropertyDeclaration
                    | SyntaxKind::JSDocPropertyTag
            );
        if optional {
            self.get_optional_type(base)
        } else {
            base
        }
    }

    fn function_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        let declarations = self
            .binder()
            .symbol(symbol)
            .map(|s| s.declarations.clone())
            .unwrap_or_default();
        let call_signatures = declarations
            .iter()
            .filter_map(|decl| self.get_signature_from_declaration(*decl))
            .collect();
        self.interner().alloc(
            TypeInfo::new(
                TypeFlags::OBJECT,
                TypeData::Object(ObjectType {
                    call_signatures,
                    ..ObjectType::default()
                }),
            )
            .with_object_flags(ObjectFlags::ANONYMOUS)
            .with_symbol(symbol),
        )
    }

    fn accessor_declaration(&self, symbol: SymbolId, kind: SyntaxKind) -> Option<NodeIndex> {
        let sym = self.binder().symbol(symbol)?;
        sym.declarations
            .iter()
            .copied()
            .find(|decl| self.arena().kind(*decl) == kind)
    }

    fn setter_parameter_annotation(&self, setter: NodeIndex) -> NodeIndex {
        self.arena()
            .function_data(setter)
            .and_then(|data| data.parameters.first().copied())
            .map_or(NodeIndex::NONE, |param| self.arena().type_annotation(param))
    }

    fn accessor_read_type(&self, symbol: SymbolId) -> TypeId {
        if let Some(getter) = self.accessor_declaration(symbol, SyntaxKind::GetAccessor) {
            let annotation = self.arena().type_annotation(getter);
            if annotation.is_some() {
                return self.get_type_from_type_node(annotation);
            }
        }
        if let Some(setter) = self.accessor_declaration(symbol, SyntaxKind::SetAccessor) {
            let annotation = self.setter_parameter_annotation(setter);
            if annotation.is_some() {
                return self.get_type_from_type_node(annotation);
            }
        }
        self.accessor_declaration(symbol, SyntaxKind::GetAccessor)
            .and_then(|getter| self.get_signature_from_declaration(getter))
            .map_or(TypeId::ANY, |sig| self.get_return_type_of_signature(sig))
    }

    pub(crate) fn compute_write_type_of_symbol(&self, symbol: SymbolId) -> Option<TypeId> {
        let setter = self.accessor_declaration(symbol, SyntaxKind::SetAccessor)?;
        let annotation = self.setter_parameter_annotation(setter);
        if annotation.is_some() {
            Some(self.get_type_from_type_node(annotation))
        } else {
            None
        }
    }

    // =========================================================================
    // Declared types
    // =========================================================================

    pub(crate) fn compute_declared_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        let Some(sym) = self.binder().symbol(symbol) else {
            return TypeId::ERROR;
        };
        let flags = sym.flags;
        if flags & symbol_flags::TYPE_PARAMETER != 0 {
            self.declared_type_parameter(symbol)
        } else if flags & (symbol_flags::CLASS | symbol_flags::INTERFACE) != 0 {
            self.declared_class_or_interface(symbol)
        } else if flags & symbol_flags::TYPE_ALIAS != 0 {
            self.declared_type_alias(symbol)
        } else if flags & symbol_flags::ENUM != 0 {
            self.declared_enum(symbol)
        } else if flags & symbol_flags::ENUM_MEMBER != 0 {
            let parent = sym.parent;
            if let Some(parent) = parent {
                self.get_declared_type_of_symbol(parent);
            }
            self.tables()
                .declared_types
                .get(&symbol)
                .copied()
                .unwrap_or(TypeId::ERROR)
        } else {
            TypeId::ERROR
        }
    }

    /// Reserves the declared type slot for `symbol`. Returns `Err` with the
    /// winning id when another computation got there first.
    fn reserve_declared(&self, symbol: SymbolId) -> Result<TypeId, TypeId> {
        let reserved = self.interner().reserve();
        let stored = self.remember_declared_type(symbol, reserved);
        if stored == reserved {
            Ok(reserved)
        } else {
            Err(stored)
        }
    }

    fn declared_type_parameter(&self, symbol: SymbolId) -> TypeId {
        let id = match self.reserve_declared(symbol) {
            Ok(id) => id,
            Err(existing) => return existing,
        };
        let arena = self.arena();
        let declaration = self
            .binder()
            .symbol(symbol)
            .and_then(|s| s.declarations.first().copied())
            .unwrap_or(NodeIndex::NONE);
        let mut info = TypeParamInfo::new(self.symbol_name(symbol));
        info.symbol = Some(symbol);
        if let Some(data) = arena.type_parameter_data(declaration) {
            let (constraint, default, modifiers) = (data.constraint, data.default, data.modifiers);
            if constraint.is_some() {
                info.constraint = Some(self.get_type_from_type_node(constraint));
            }
            if default.is_some() {
                info.default = Some(self.get_type_from_type_node(default));
            }
            info.is_const = modifiers & modifier_flags::CONST != 0;
        }
        self.interner().define(
            id,
            TypeInfo::new(TypeFlags::TYPE_PARAMETER, TypeData::TypeParameter(info)).with_symbol(symbol),
        );
        id
    }

    fn type_parameters_of(&self, nodes: &[NodeIndex]) -> Vec<TypeId> {
        nodes
            .iter()
            .filter_map(|node| self.get_symbol_of_declaration(*node))
            .map(|sym| self.get_declared_type_of_symbol(sym))
            .collect()
    }

    fn declared_class_or_interface(&self, symbol: SymbolId) -> TypeId {
        let id = match self.reserve_declared(symbol) {
            Ok(id) => id,
            Err(existing) => return existing,
        };
        let Some(sym) = self.binder().symbol(symbol) else {
            return id;
        };
        let is_class = sym.has_flags(symbol_flags::CLASS);
        let declarations = sym.declarations.clone();
        let arena = self.arena();

        let mut type_parameter_nodes = Vec::new();
        for decl in &declarations {
            if let Some(NodeData::Class(data) | NodeData::Interface(data)) = arena.data(*decl) {
                if type_parameter_nodes.is_empty() {
                    type_parameter_nodes = data.type_parameters.clone();
                }
            }
        }
        let type_parameters = self.type_parameters_of(&type_parameter_nodes);
        let mut this_info = TypeParamInfo::new("this");
        this_info.is_this = true;
        this_info.symbol = Some(symbol);
        this_info.constraint = Some(id);
        let this_type = self.interner().type_parameter(this_info);

        let mut members = ObjectType::default();
        for decl in &declarations {
            for &member in arena.members(*decl) {
                if arena.has_modifier(member, modifier_flags::STATIC) {
                    continue;
                }
                self.add_member(&mut members, member);
            }
        }

        let mut object_flags = if is_class {
            ObjectFlags::CLASS
        } else {
            ObjectFlags::INTERFACE
        };
        if type_parameters.is_empty() {
            object_flags |= ObjectFlags::REFERENCE;
        }
        self.interner().define(
            id,
            TypeInfo::new(
                TypeFlags::OBJECT,
                TypeData::ClassOrInterface(InterfaceType {
                    type_parameters,
                    this_type: Some(this_type),
                    members,
                }),
            )
            .with_object_flags(object_flags)
            .with_symbol(symbol),
        );
        trace!(symbol = symbol.0, type_id = id.0, "declared class or interface");
        id
    }

    /// Adds one member declaration of a class, interface or type literal.
    pub(crate) fn add_member(&self, members: &mut ObjectType, member: NodeIndex) {
        let arena = self.arena();
        match arena.kind(member) {
            SyntaxKind::CallSignature => {
                if let Some(sig) = self.get_signature_from_declaration(member) {
                    members.call_signatures.push(sig);
                }
            }
            SyntaxKind::ConstructSignature => {
                if let Some(sig) = self.get_signature_from_declaration(member) {
                    members.construct_signatures.push(sig);
                }
            }
            SyntaxKind::IndexSignature => {
                if let Some(NodeData::IndexSignature {
                    parameters,
                    type_annotation,
                    modifiers,
                }) = arena.data(member)
                {
                    let key_type = parameters
                        .first()
                        .map(|p| arena.type_annotation(*p))
                        .filter(|n| n.is_some())
                        .map_or(TypeId::STRING, |n| self.get_type_from_type_node(n));
                    let type_id = if type_annotation.is_some() {
                        self.get_type_from_type_node(*type_annotation)
                    } else {
                        TypeId::ANY
                    };
                    members.index_infos.push(IndexInfo {
                        key_type,
                        type_id,
                        is_readonly: modifiers & modifier_flags::READONLY != 0,
                        declaration: member,
                    });
                }
            }
            SyntaxKind::PropertySignature
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::MethodSignature
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::GetAccessor
            | SyntaxKind::SetAccessor
            | SyntaxKind::PropertyAssignment
            | SyntaxKind::ShorthandPropertyAssignment
            | SyntaxKind::JSDocPropertyTag => {
                let Some(prop_symbol) = self.get_symbol_of_declaration(member) else {
                    return;
                };
                if members
                    .properties
                    .iter()
                    .any(|p| p.symbol == Some(prop_symbol))
                {
                    return;
                }
                members.properties.push(self.property_info_of(prop_symbol, member));
            }
            _ => {}
        }
    }

    pub(crate) fn property_info_of(&self, prop_symbol: SymbolId, member: NodeIndex) -> PropertyInfo {
        let arena = self.arena();
        let sym_flags = self.symbol(prop_symbol).map_or(0, |s| s.flags);
        let modifiers = arena.modifiers(member);
        let type_id = self.get_type_of_symbol(prop_symbol);
        let mut info = PropertyInfo::new(self.symbol_name(prop_symbol), type_id);
        info.symbol = Some(prop_symbol);
        info.declaration = member;
        info.optional = sym_flags & symbol_flags::OPTIONAL != 0 || arena.has_question_token(member);
        info.is_method = sym_flags & symbol_flags::METHOD != 0;
        info.is_accessor = sym_flags & symbol_flags::ACCESSOR != 0;
        info.readonly = modifiers & modifier_flags::READONLY != 0
            || info.is_accessor && sym_flags & symbol_flags::SET_ACCESSOR == 0;
        info.visibility = if modifiers & modifier_flags::PRIVATE != 0 {
            Visibility::Private
        } else if modifiers & modifier_flags::PROTECTED != 0 {
            Visibility::Protected
        } else {
            Visibility::Public
        };
        if info.is_accessor {
            let write = self.get_write_type_of_symbol(prop_symbol);
            if write != type_id {
                info.write_type = Some(write);
            }
        }
        info
    }

    fn declared_type_alias(&self, symbol: SymbolId) -> TypeId {
        let arena = self.arena();
        let Some(declaration) = self
            .binder()
            .symbol(symbol)
            .and_then(|s| s.declarations.first().copied())
        else {
            return TypeId::ERROR;
        };
        let Some(NodeData::TypeAlias(data)) = arena.data(declaration) else {
            return TypeId::ERROR;
        };
        let (type_node, type_parameter_nodes) = (data.type_node, data.type_parameters.clone());

        if matches!(
            arena.kind(type_node),
            SyntaxKind::TypeLiteral | SyntaxKind::MappedType | SyntaxKind::FunctionType
        ) {
            // Object-like bodies may refer back to the alias.
            let id = match self.reserve_declared(symbol) {
                Ok(id) => id,
                Err(existing) => return existing,
            };
            let type_parameters = self.type_parameters_of(&type_parameter_nodes);
            let body = self.get_type_from_type_node(type_node);
            let mut info = (*self.interner().get(body)).clone();
            info.alias_symbol = Some(symbol);
            info.alias_type_arguments = type_parameters;
            self.interner().define(id, info);
            return id;
        }

        // Guard direct self-reference while the body resolves.
        let provisional = self.remember_declared_type(symbol, TypeId::ERROR);
        if provisional != TypeId::ERROR {
            return provisional;
        }
        let type_parameters = self.type_parameters_of(&type_parameter_nodes);
        let body = self.get_type_from_type_node(type_node);
        let body_info = self.interner().get(body);
        let aliased = if body.is_intrinsic()
            || body_info.alias_symbol.is_some()
            || matches!(
                body_info.data,
                TypeData::TypeParameter(_) | TypeData::Reference { .. } | TypeData::ClassOrInterface(_)
            ) {
            body
        } else {
            let mut info = (*body_info).clone();
            info.alias_symbol = Some(symbol);
            info.alias_type_arguments = type_parameters;
            self.interner().alloc(info)
        };
        self.tables().declared_types.insert(symbol, aliased);
        aliased
    }

    fn declared_enum(&self, symbol: SymbolId) -> TypeId {
        let id = match self.reserve_declared(symbol) {
            Ok(id) => id,
            Err(existing) => return existing,
        };
        let arena = self.arena();
        let declarations = self
            .binder()
            .symbol(symbol)
            .map(|s| s.declarations.clone())
            .unwrap_or_default();
        let mut member_types = Vec::new();
        let mut next_value = 0.0;
        for decl in declarations {
            for &member in arena.members(decl) {
                let Some(member_symbol) = self.get_symbol_of_declaration(member) else {
                    continue;
                };
                let value = match self.enum_initializer_value(arena.initializer(member)) {
                    Some(LiteralValue::Number(OrderedFloat(v))) => {
                        next_value = v + 1.0;
                        LiteralValue::Number(OrderedFloat(v))
                    }
                    Some(other) => other,
                    None => {
                        let v = next_value;
                        next_value += 1.0;
                        LiteralValue::Number(OrderedFloat(v))
                    }
                };
                let literal = self.interner().enum_literal(member_symbol, id, value);
                self.remember_declared_type(member_symbol, literal);
                self.remember_symbol_type(member_symbol, literal);
                member_types.push(literal);
            }
        }
        member_types.sort_unstable();
        self.interner().define(
            id,
            TypeInfo::new(
                TypeFlags::UNION | TypeFlags::ENUM_LITERAL,
                TypeData::Union {
                    types: member_types,
                    origin: None,
                },
            )
            .with_symbol(symbol)
            .with_alias(symbol, Vec::new()),
        );
        id
    }

    fn enum_initializer_value(&self, initializer: NodeIndex) -> Option<LiteralValue> {
        let arena = self.arena();
        match (arena.kind(initializer), arena.data(initializer)?) {
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, NodeData::Literal(lit)) => {
                Some(LiteralValue::String(lit.text.clone()))
            }
            (SyntaxKind::NumericLiteral, NodeData::Literal(lit)) => {
                Some(LiteralValue::Number(OrderedFloat(parse_numeric_literal(&lit.text))))
            }
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::PrefixUnary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                },
            ) => match self.enum_initializer_value(*operand)? {
                LiteralValue::Number(OrderedFloat(v)) => Some(LiteralValue::Number(OrderedFloat(-v))),
                _ => None,
            },
            _ => None,
        }
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    pub(crate) fn compute_signature_from_declaration(&self, node: NodeIndex) -> Option<SignatureId> {
        let arena = self.arena();
        let kind = arena.kind(node);
        let data = arena.function_data(node)?;
        let (type_parameter_nodes, parameter_nodes, annotation, body, modifiers) = (
            data.type_parameters.clone(),
            data.parameters.clone(),
            data.type_annotation,
            data.body,
            data.modifiers,
        );
        let type_parameters = self.type_parameters_of(&type_parameter_nodes);

        let mut this_parameter = None;
        let mut parameters = Vec::with_capacity(parameter_nodes.len());
        for param in parameter_nodes {
            let Some(param_data) = arena.parameter_data(param) else {
                continue;
            };
            let name = arena
                .identifier_text(param_data.name)
                .unwrap_or("arg")
                .to_string();
            let type_id = if param_data.type_annotation.is_some() {
                self.get_type_from_type_node(param_data.type_annotation)
            } else if param_data.initializer.is_some() {
                self.get_widened_type(self.get_type_of_expression(param_data.initializer))
            } else {
                TypeId::ANY
            };
            let info = ParamInfo {
                name: name.clone(),
                symbol: self.get_symbol_of_declaration(param),
                type_id,
                optional: param_data.question || param_data.initializer.is_some(),
                rest: param_data.dot_dot_dot,
                declaration: param,
            };
            if name == "this" {
                this_parameter = Some(info);
            } else {
                parameters.push(info);
            }
        }

        let mut type_predicate = None;
        let return_type = if annotation.is_some() {
            if let Some(NodeData::TypePredicate {
                asserts,
                parameter_name,
                type_node,
            }) = arena.data(annotation)
            {
                let parameter_name = if arena.kind(*parameter_name) == SyntaxKind::ThisType {
                    None
                } else {
                    arena.identifier_text(*parameter_name).map(str::to_string)
                };
                type_predicate = Some(TypePredicate {
                    asserts: *asserts,
                    parameter_name,
                    type_id: type_node
                        .is_some()
                        .then(|| self.get_type_from_type_node(*type_node)),
                });
                if *asserts { TypeId::VOID } else { TypeId::BOOLEAN }
            } else {
                self.get_type_from_type_node(annotation)
            }
        } else {
            self.inferred_return_type(kind, body)
        };

        Some(self.interner().add_signature(Signature {
            declaration: node,
            type_parameters,
            this_parameter,
            parameters,
            return_type,
            type_predicate,
            is_abstract: modifiers & modifier_flags::ABSTRACT != 0,
        }))
    }

    fn inferred_return_type(&self, kind: SyntaxKind, body: NodeIndex) -> TypeId {
        let arena = self.arena();
        if matches!(kind, SyntaxKind::SetAccessor | SyntaxKind::Constructor) {
            return TypeId::VOID;
        }
        if body.is_none() {
            return TypeId::ANY;
        }
        match arena.data(body) {
            Some(NodeData::Block { statements }) => {
                let returns: Vec<NodeIndex> = statements
                    .iter()
                    .filter_map(|stmt| match arena.data(*stmt) {
                        Some(NodeData::Return { expression }) => Some(*expression),
                        _ => None,
                    })
                    .collect();
                match returns.as_slice() {
                    [] => TypeId::VOID,
                    [expr] if expr.is_some() => self.get_widened_type(self.get_type_of_expression(*expr)),
                    [expr] if expr.is_none() => TypeId::VOID,
                    _ => TypeId::ANY,
                }
            }
            _ => self.get_widened_type(self.get_type_of_expression(body)),
        }
    }

    /// A `const` type parameter, or a union/intersection containing one.
    pub(crate) fn is_const_type_variable(&self, type_id: TypeId) -> bool {
        let info = self.interner().get(type_id);
        match &info.data {
            TypeData::TypeParameter(param) => param.is_const,
            TypeData::Union { types, .. } | TypeData::Intersection(types) => {
                types.iter().any(|t| self.is_const_type_variable(*t))
            }
            TypeData::IndexedAccess { object_type, .. } => self.is_const_type_variable(*object_type),
            _ => false,
        }
    }
}
