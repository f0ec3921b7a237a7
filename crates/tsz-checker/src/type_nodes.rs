//! Types denoted by type nodes.

use tracing::trace;
use tsz_ast::{NodeData, NodeIndex, SyntaxKind, TemplateData};
use tsz_binder::{SymbolId, symbol_flags};
use tsz_solver::{
    ConditionalRoot, ConditionalType, ElementFlags, LiteralValue, MappedModifier, MappedType,
    ObjectFlags, ObjectType, TupleElementLabel, TypeData, TypeFlags, TypeId, TypeInfo,
    TypeSubstitution, instantiate_type,
};

use crate::checker::Checker;
use crate::declared_types::parse_numeric_literal;
use crate::query::TypeChecker;

impl Checker {
    pub(crate) fn compute_type_from_type_node(&self, node: NodeIndex) -> TypeId {
        let arena = self.arena();
        let interner = self.interner();
        let kind = arena.kind(node);
        let Some(data) = arena.data(node) else {
            return TypeId::ERROR;
        };
        let result = match (kind, data) {
            (SyntaxKind::AnyKeyword | SyntaxKind::JSDocAllType, _) => TypeId::ANY,
            (SyntaxKind::UnknownKeyword | SyntaxKind::JSDocUnknownType, _) => TypeId::UNKNOWN,
            (SyntaxKind::StringKeyword, _) => TypeId::STRING,
            (SyntaxKind::NumberKeyword, _) => TypeId::NUMBER,
            (SyntaxKind::BigIntKeyword, _) => TypeId::BIGINT,
            (SyntaxKind::BooleanKeyword, _) => TypeId::BOOLEAN,
            (SyntaxKind::SymbolKeyword, _) => TypeId::SYMBOL,
            (SyntaxKind::VoidKeyword, _) => TypeId::VOID,
            (SyntaxKind::UndefinedKeyword, _) => TypeId::UNDEFINED,
            (SyntaxKind::NullKeyword, _) => TypeId::NULL,
            (SyntaxKind::NeverKeyword, _) => TypeId::NEVER,
            (SyntaxKind::ObjectKeyword, _) => TypeId::OBJECT,
            (SyntaxKind::IntrinsicKeyword, _) => TypeId::INTRINSIC,
            (SyntaxKind::TypePredicate, _) => TypeId::BOOLEAN,
            (SyntaxKind::ThisType, _) => self.this_type_at(node),
            (SyntaxKind::LiteralType, NodeData::LiteralType { literal }) => self.literal_type_of(*literal),
            (
                SyntaxKind::TypeReference,
                NodeData::TypeReference {
                    type_name,
                    type_arguments,
                },
            ) => {
                let args = self.types_of(type_arguments);
                self.resolve_entity_name(*type_name, symbol_flags::TYPE, NodeIndex::NONE)
                    .map_or(TypeId::ERROR, |symbol| self.type_from_symbol_reference(symbol, args))
            }
            (SyntaxKind::ArrayType, NodeData::ArrayType { element_type }) => {
                let element = self.get_type_from_type_node(*element_type);
                self.array_of(element, false)
            }
            (SyntaxKind::TupleType, NodeData::Tuple { elements }) => self.tuple_from_elements(elements, false),
            (SyntaxKind::UnionType, NodeData::Composite { types }) => self.union_from_nodes(types),
            (SyntaxKind::IntersectionType, NodeData::Composite { types }) => {
                interner.intersection(&self.types_of(types))
            }
            (
                SyntaxKind::ParenthesizedType
                | SyntaxKind::NamedTupleMember
                | SyntaxKind::OptionalType
                | SyntaxKind::RestType
                | SyntaxKind::JSDocNonNullableType,
                NodeData::Parenthesized { inner: type_node }
                | NodeData::NamedTupleMember { type_node, .. }
                | NodeData::TypeWrapper { type_node },
            ) => self.get_type_from_type_node(*type_node),
            (SyntaxKind::JSDocNullableType, NodeData::TypeWrapper { type_node }) => {
                interner.union(&[self.get_type_from_type_node(*type_node), TypeId::NULL])
            }
            (SyntaxKind::JSDocOptionalType, NodeData::TypeWrapper { type_node }) => {
                interner.union(&[self.get_type_from_type_node(*type_node), TypeId::UNDEFINED])
            }
            (SyntaxKind::JSDocVariadicType, NodeData::TypeWrapper { type_node }) => {
                let element = self.get_type_from_type_node(*type_node);
                self.array_of(element, false)
            }
            (SyntaxKind::TypeOperator, NodeData::TypeOperator { operator, type_node }) => {
                self.type_operator(node, *operator, *type_node)
            }
            (
                SyntaxKind::IndexedAccessType,
                NodeData::IndexedAccess {
                    object_type,
                    index_type,
                },
            ) => {
                let object = self.get_type_from_type_node(*object_type);
                let index = self.get_type_from_type_node(*index_type);
                self.indexed_access_type(object, index)
            }
            (SyntaxKind::TypeQuery, NodeData::TypeQuery { expr_name, .. }) => self
                .resolve_entity_name(*expr_name, symbol_flags::VALUE, NodeIndex::NONE)
                .map_or(TypeId::ERROR, |symbol| self.get_type_of_symbol(symbol)),
            (SyntaxKind::TypeLiteral, NodeData::TypeLiteral { members }) => {
                self.object_from_members(node, members)
            }
            (
                SyntaxKind::JSDocTypeLiteral,
                NodeData::JSDocTypeLiteral {
                    property_tags,
                    is_array_type,
                },
            ) => {
                let object = self.object_from_members(node, property_tags);
                if *is_array_type {
                    self.array_of(object, false)
                } else {
                    object
                }
            }
            (
                SyntaxKind::FunctionType | SyntaxKind::ConstructorType | SyntaxKind::JSDocFunctionType,
                NodeData::Function(_),
            ) => {
                let mut members = ObjectType::default();
                if let Some(sig) = self.get_signature_from_declaration(node) {
                    if kind == SyntaxKind::ConstructorType {
                        members.construct_signatures.push(sig);
                    } else {
                        members.call_signatures.push(sig);
                    }
                }
                interner.object(members)
            }
            (
                SyntaxKind::ConditionalType,
                NodeData::Conditional {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                },
            ) => self.conditional_type(node, *check_type, *extends_type, *true_type, *false_type),
            (SyntaxKind::InferType, NodeData::Infer { type_parameter }) => self
                .get_symbol_of_declaration(*type_parameter)
                .map_or(TypeId::ERROR, |symbol| self.get_declared_type_of_symbol(symbol)),
            (SyntaxKind::MappedType, NodeData::Mapped(mapped)) => {
                let type_parameter = self
                    .get_symbol_of_declaration(mapped.type_parameter)
                    .map_or(TypeId::ERROR, |symbol| self.get_declared_type_of_symbol(symbol));
                let constraint_type = match interner.lookup(type_parameter) {
                    Some(TypeData::TypeParameter(param)) => param.constraint.unwrap_or(TypeId::UNKNOWN),
                    _ => TypeId::UNKNOWN,
                };
                let name_type = mapped
                    .name_type
                    .is_some()
                    .then(|| self.get_type_from_type_node(mapped.name_type));
                let template_type = mapped
                    .type_node
                    .is_some()
                    .then(|| self.get_type_from_type_node(mapped.type_node));
                let mut info = TypeInfo::new(
                    TypeFlags::OBJECT,
                    TypeData::Mapped(MappedType {
                        declaration: node,
                        type_parameter,
                        constraint_type,
                        name_type,
                        template_type,
                        readonly_modifier: mapped_modifier(mapped.readonly_token, SyntaxKind::ReadonlyKeyword),
                        optional_modifier: mapped_modifier(mapped.question_token, SyntaxKind::QuestionToken),
                    }),
                )
                .with_object_flags(ObjectFlags::MAPPED);
                info.symbol = self.get_symbol_of_declaration(node);
                interner.alloc(info)
            }
            (SyntaxKind::TemplateLiteralType, NodeData::Template(template)) => {
                self.template_literal_type(template)
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
                let args = self.types_of(type_arguments);
                let target = self
                    .binder()
                    .module_symbols
                    .get(argument)
                    .copied()
                    .and_then(|module| self.resolve_qualifier(module, *qualifier));
                match target {
                    Some(symbol) if *is_type_of => self.get_type_of_symbol(symbol),
                    Some(symbol) => self.type_from_symbol_reference(symbol, args),
                    None => TypeId::ERROR,
                }
            }
            _ => TypeId::ERROR,
        };
        trace!(node = node.0, ?kind, type_id = result.0, "type from type node");
        result
    }

    fn types_of(&self, nodes: &[NodeIndex]) -> Vec<TypeId> {
        nodes.iter().map(|n| self.get_type_from_type_node(*n)).collect()
    }

    /// `Array<T>` or `ReadonlyArray<T>`.
    pub(crate) fn array_of(&self, element: TypeId, readonly: bool) -> TypeId {
        let globals = self.globals();
        let target = if readonly {
            globals.readonly_array
        } else {
            globals.array
        };
        target.map_or(TypeId::ERROR, |target| {
            self.interner().reference(target, vec![element])
        })
    }

    fn literal_type_of(&self, literal: NodeIndex) -> TypeId {
        let arena = self.arena();
        let interner = self.interner();
        match (arena.kind(literal), arena.data(literal)) {
            (SyntaxKind::TrueKeyword, _) => TypeId::BOOLEAN_TRUE,
            (SyntaxKind::FalseKeyword, _) => TypeId::BOOLEAN_FALSE,
            (SyntaxKind::NullKeyword, _) => TypeId::NULL,
            (
                SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral,
                Some(NodeData::Literal(lit)),
            ) => interner.string_literal(&lit.text),
            (SyntaxKind::NumericLiteral, Some(NodeData::Literal(lit))) => {
                interner.number_literal(parse_numeric_literal(&lit.text))
            }
            (SyntaxKind::BigIntLiteral, Some(NodeData::Literal(lit))) => {
                interner.bigint_literal(lit.text.trim_end_matches('n'))
            }
            (
                SyntaxKind::PrefixUnaryExpression,
                Some(NodeData::PrefixUnary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                }),
            ) => match interner.lookup(self.literal_type_of(*operand)) {
                Some(TypeData::Literal {
                    value: LiteralValue::Number(n),
                    ..
                }) => interner.number_literal(-n.0),
                Some(TypeData::Literal {
                    value: LiteralValue::BigInt(digits),
                    ..
                }) => interner.bigint_literal(&format!("-{digits}")),
                _ => TypeId::ERROR,
            },
            _ => TypeId::ERROR,
        }
    }

    /// Type named by a reference to `symbol` with explicit type arguments.
    pub(crate) fn type_from_symbol_reference(&self, symbol: SymbolId, args: Vec<TypeId>) -> TypeId {
        let interner = self.interner();
        let flags = self.symbol(symbol).map_or(0, |s| s.flags);
        let declared = self.get_declared_type_of_symbol(symbol);
        if flags & (symbol_flags::CLASS | symbol_flags::INTERFACE) != 0 {
            let params = interner.target_type_parameters(declared);
            if params.is_empty() {
                return declared;
            }
            let filled = params
                .iter()
                .enumerate()
                .map(|(i, param)| {
                    args.get(i).copied().unwrap_or_else(|| {
                        interner.type_parameter_default(*param).unwrap_or(TypeId::UNKNOWN)
                    })
                })
                .collect();
            return interner.reference(declared, filled);
        }
        if flags & symbol_flags::TYPE_ALIAS != 0 {
            if declared == TypeId::INTRINSIC {
                let argument = args.first().copied().unwrap_or(TypeId::STRING);
                return interner.string_mapping(symbol, argument);
            }
            let params = interner.get(declared).alias_type_arguments.clone();
            if params.is_empty() || args.is_empty() {
                return declared;
            }
            let subst = TypeSubstitution::from_args(&params, &args, TypeId::UNKNOWN);
            return instantiate_type(interner, declared, &subst);
        }
        if flags & (symbol_flags::TYPE_PARAMETER | symbol_flags::ENUM | symbol_flags::ENUM_MEMBER) != 0 {
            return declared;
        }
        TypeId::ERROR
    }

    fn resolve_qualifier(&self, module: SymbolId, qualifier: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena();
        if qualifier.is_none() {
            return Some(module);
        }
        match arena.data(qualifier)? {
            NodeData::Identifier { text } => self.binder().get_export(module, text),
            NodeData::QualifiedName { left, right } => {
                let container = self.resolve_qualifier(module, *left)?;
                self.binder().get_export(container, arena.identifier_text(*right)?)
            }
            _ => None,
        }
    }

    fn this_type_at(&self, node: NodeIndex) -> TypeId {
        let arena = self.arena();
        let container = arena.find_ancestor(node, |n| {
            matches!(
                n.kind,
                SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression | SyntaxKind::InterfaceDeclaration
            )
        });
        let Some(symbol) = self.get_symbol_of_declaration(container) else {
            return TypeId::ERROR;
        };
        let declared = self.get_declared_type_of_symbol(symbol);
        match self.interner().lookup(declared) {
            Some(TypeData::ClassOrInterface(declared)) => declared.this_type.unwrap_or(TypeId::ERROR),
            _ => TypeId::ERROR,
        }
    }

    /// Unions keep the written form as their origin when a member is itself a
    /// named union.
    fn union_from_nodes(&self, nodes: &[NodeIndex]) -> TypeId {
        let interner = self.interner();
        let written = self.types_of(nodes);
        let union = interner.union(&written);
        let has_named_union = written.iter().any(|t| {
            let info = interner.get(*t);
            info.alias_symbol.is_some() && info.has(TypeFlags::UNION)
        });
        if has_named_union && interner.flags(union).contains(TypeFlags::UNION) {
            let types = interner.get(union).constituents().to_vec();
            let origin = interner.origin_union(written);
            return interner.union_with_origin(&types, origin);
        }
        union
    }

    fn type_operator(&self, node: NodeIndex, operator: SyntaxKind, type_node: NodeIndex) -> TypeId {
        let arena = self.arena();
        let interner = self.interner();
        match operator {
            SyntaxKind::KeyOfKeyword => interner.index(self.get_type_from_type_node(type_node)),
            SyntaxKind::ReadonlyKeyword => match arena.data(type_node) {
                Some(NodeData::ArrayType { element_type }) => {
                    let element = self.get_type_from_type_node(*element_type);
                    self.array_of(element, true)
                }
                Some(NodeData::Tuple { elements }) => self.tuple_from_elements(elements, true),
                _ => self.get_type_from_type_node(type_node),
            },
            SyntaxKind::UniqueKeyword => {
                let declaration = arena.find_ancestor(node, |n| {
                    matches!(
                        n.kind,
                        SyntaxKind::VariableDeclaration
                            | SyntaxKind::PropertyDeclaration
                            | SyntaxKind::PropertySignature
                    )
                });
                self.get_symbol_of_declaration(declaration)
                    .map_or(TypeId::SYMBOL, |symbol| interner.unique_symbol(symbol))
            }
            _ => TypeId::ERROR,
        }
    }

    /// `T[K]` resolves to a property type when `T` is concrete and `K` a
    /// string literal.
    fn indexed_access_type(&self, object: TypeId, index: TypeId) -> TypeId {
        let interner = self.interner();
        if !interner.flags(object).intersects(TypeFlags::INSTANTIABLE)
            && let Some(TypeData::Literal {
                value: LiteralValue::String(name),
                ..
            }) = interner.lookup(index)
            && let Some(prop) = interner
                .properties_of_type(object)
                .into_iter()
                .find(|p| p.name == name)
        {
            return prop.type_id;
        }
        interner.indexed_access(object, index)
    }

    fn tuple_from_elements(&self, elements: &[NodeIndex], readonly: bool) -> TypeId {
        let arena = self.arena();
        let mut flags = Vec::with_capacity(elements.len());
        let mut labels = Vec::with_capacity(elements.len());
        let mut element_types = Vec::with_capacity(elements.len());
        for &element in elements {
            let (label, optional, rest, type_node) = match arena.data(element) {
                Some(NodeData::NamedTupleMember {
                    dot_dot_dot,
                    name,
                    question,
                    type_node,
                }) => (
                    arena.identifier_text(*name).map(|text| TupleElementLabel {
                        name: text.to_string(),
                        declaration: element,
                    }),
                    *question,
                    *dot_dot_dot,
                    *type_node,
                ),
                Some(NodeData::TypeWrapper { type_node }) => (
                    None,
                    arena.kind(element) == SyntaxKind::OptionalType,
                    arena.kind(element) == SyntaxKind::RestType,
                    *type_node,
                ),
                _ => (None, false, false, element),
            };
            let (flag, type_id) = if rest {
                match arena.data(type_node) {
                    Some(NodeData::ArrayType { element_type }) => {
                        (ElementFlags::REST, self.get_type_from_type_node(*element_type))
                    }
                    _ => (ElementFlags::VARIADIC, self.get_type_from_type_node(type_node)),
                }
            } else if optional {
                (ElementFlags::OPTIONAL, self.get_type_from_type_node(type_node))
            } else {
                (ElementFlags::REQUIRED, self.get_type_from_type_node(type_node))
            };
            flags.push(flag);
            labels.push(label);
            element_types.push(type_id);
        }
        let target = self.interner().tuple_target(flags, labels, readonly);
        self.interner().reference(target, element_types)
    }

    /// Anonymous object type of a type literal, keeping the literal's symbol.
    fn object_from_members(&self, node: NodeIndex, members: &[NodeIndex]) -> TypeId {
        let mut object = ObjectType::default();
        for &member in members {
            self.add_member(&mut object, member);
        }
        let mut info = TypeInfo::new(TypeFlags::OBJECT, TypeData::Object(object))
            .with_object_flags(ObjectFlags::ANONYMOUS);
        info.symbol = self.get_symbol_of_declaration(node);
        self.interner().alloc(info)
    }

    fn conditional_type(
        &self,
        node: NodeIndex,
        check_node: NodeIndex,
        extends_node: NodeIndex,
        true_node: NodeIndex,
        false_node: NodeIndex,
    ) -> TypeId {
        let interner = self.interner();
        let check_type = self.get_type_from_type_node(check_node);
        let extends_type = self.get_type_from_type_node(extends_node);
        let mut infer_nodes = Vec::new();
        self.collect_infer_type_parameters(extends_node, &mut infer_nodes);
        let infer_type_parameters = infer_nodes
            .into_iter()
            .filter_map(|tp| self.get_symbol_of_declaration(tp))
            .map(|symbol| self.get_declared_type_of_symbol(symbol))
            .collect();
        let true_type = self.get_type_from_type_node(true_node);
        let false_type = self.get_type_from_type_node(false_node);
        let conditional = ConditionalType {
            root: ConditionalRoot {
                node,
                check_type,
                extends_type,
                true_type,
                false_type,
                is_distributive: interner.flags(check_type).contains(TypeFlags::TYPE_PARAMETER),
                infer_type_parameters,
            },
            check_type,
            extends_type,
            true_type,
            false_type,
            mapper: None,
        };
        interner.alloc(TypeInfo::new(
            TypeFlags::CONDITIONAL,
            TypeData::Conditional(conditional),
        ))
    }

    fn collect_infer_type_parameters(&self, node: NodeIndex, out: &mut Vec<NodeIndex>) {
        let arena = self.arena();
        if let Some(NodeData::Infer { type_parameter }) = arena.data(node) {
            out.push(*type_parameter);
        }
        arena.for_each_child(node, |child| self.collect_infer_type_parameters(child, out));
    }

    fn template_literal_type(&self, template: &TemplateData) -> TypeId {
        let mut texts = Vec::with_capacity(template.spans.len() + 1);
        texts.push(template.head.clone());
        let mut types = Vec::with_capacity(template.spans.len());
        for span in &template.spans {
            types.push(self.get_type_from_type_node(span.node));
            texts.push(span.literal.clone());
        }
        self.interner().template_literal(texts, types)
    }
}

fn mapped_modifier(token: SyntaxKind, keyword: SyntaxKind) -> MappedModifier {
    match token {
        SyntaxKind::PlusToken => MappedModifier::Add,
        SyntaxKind::MinusToken => MappedModifier::Remove,
        t if t == keyword => MappedModifier::Add,
        _ => MappedModifier::None,
    }
}
