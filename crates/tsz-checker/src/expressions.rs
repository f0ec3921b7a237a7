//! Expression types and contextual types.

use tsz_ast::{NodeData, NodeIndex, SyntaxKind};
use tsz_binder::symbol_flags;
use tsz_solver::{
    ElementFlags, LiteralValue, ObjectFlags, ObjectType, OrderedFloat, PropertyInfo, SignatureKind,
    TypeData, TypeFlags, TypeId, TypeInfo,
};

use crate::checker::Checker;
use crate::declared_types::parse_numeric_literal;
use crate::query::TypeChecker;

impl Checker {
    pub(crate) fn compute_type_of_expression(&self, node: NodeIndex) -> TypeId {
        let arena = self.arena();
        let interner = self.interner();
        let Some(data) = arena.data(node) else {
            return TypeId::ERROR;
        };
        let fresh = |value: LiteralValue| {
            let literal = interner.fresh_literal(value);
            if self.is_const_context(node) {
                interner.regular_type_of_literal(literal)
            } else {
                literal
            }
        };
        match (arena.kind(node), data) {
            (SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral, NodeData::Literal(lit)) => {
                fresh(LiteralValue::String(lit.text.clone()))
            }
            (SyntaxKind::NumericLiteral, NodeData::Literal(lit)) => {
                fresh(LiteralValue::Number(OrderedFloat(parse_numeric_literal(&lit.text))))
            }
            (SyntaxKind::BigIntLiteral, NodeData::Literal(lit)) => {
                fresh(LiteralValue::BigInt(lit.text.trim_end_matches('n').to_string()))
            }
            (SyntaxKind::TrueKeyword, _) => fresh(LiteralValue::Boolean(true)),
            (SyntaxKind::FalseKeyword, _) => fresh(LiteralValue::Boolean(false)),
            (SyntaxKind::NullKeyword, _) => TypeId::NULL,
            (SyntaxKind::TemplateExpression, _) => TypeId::STRING,
            (
                SyntaxKind::PrefixUnaryExpression,
                NodeData::PrefixUnary {
                    operator: SyntaxKind::MinusToken,
                    operand,
                },
            ) => match (arena.kind(*operand), arena.data(*operand)) {
                (SyntaxKind::NumericLiteral, Some(NodeData::Literal(lit))) => {
                    fresh(LiteralValue::Number(OrderedFloat(-parse_numeric_literal(&lit.text))))
                }
                (SyntaxKind::BigIntLiteral, Some(NodeData::Literal(lit))) => {
                    fresh(LiteralValue::BigInt(format!("-{}", lit.text.trim_end_matches('n'))))
                }
                _ => TypeId::NUMBER,
            },
            (SyntaxKind::PrefixUnaryExpression, NodeData::PrefixUnary { operator, .. }) => {
                if *operator == SyntaxKind::ExclamationToken {
                    TypeId::BOOLEAN
                } else {
                    TypeId::NUMBER
                }
            }
            (SyntaxKind::Identifier, NodeData::Identifier { text }) => {
                if text == "undefined" {
                    return TypeId::UNDEFINED;
                }
                self.resolve_name(node, text, symbol_flags::VALUE)
                    .map_or(TypeId::ERROR, |symbol| self.get_type_of_symbol(symbol))
            }
            (SyntaxKind::ParenthesizedExpression, NodeData::Parenthesized { inner }) => {
                self.get_type_of_expression(*inner)
            }
            (SyntaxKind::SatisfiesExpression, NodeData::Assertion { expression, .. }) => {
                self.get_type_of_expression(*expression)
            }
            (
                SyntaxKind::AsExpression | SyntaxKind::TypeAssertionExpression,
                NodeData::Assertion {
                    expression,
                    type_node,
                },
            ) => {
                if arena.is_const_type_reference(*type_node) {
                    self.get_type_of_expression(*expression)
                } else {
                    self.get_type_from_type_node(*type_node)
                }
            }
            (SyntaxKind::ObjectLiteralExpression, NodeData::ObjectLiteral { properties }) => {
                self.object_literal_type(node, properties)
            }
            (SyntaxKind::ArrayLiteralExpression, NodeData::ArrayLiteral { elements }) => {
                self.array_literal_type(node, elements)
            }
            (SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction, NodeData::Function(_)) => {
                let mut members = ObjectType::default();
                if let Some(sig) = self.get_signature_from_declaration(node) {
                    members.call_signatures.push(sig);
                }
                let mut info = TypeInfo::new(TypeFlags::OBJECT, TypeData::Object(members))
                    .with_object_flags(ObjectFlags::ANONYMOUS);
                info.symbol = self.get_symbol_of_declaration(node);
                interner.alloc(info)
            }
            (SyntaxKind::PropertyAccessExpression, NodeData::PropertyAccess { expression, name }) => {
                let Some(name) = arena.identifier_text(*name) else {
                    return TypeId::ERROR;
                };
                if let Some(member) = self
                    .resolve_entity_name(node, symbol_flags::VALUE, NodeIndex::NONE)
                    .filter(|_| arena.is_entity_name_expression(node))
                {
                    return self.get_type_of_symbol(member);
                }
                let object = self.get_type_of_expression(*expression);
                interner
                    .properties_of_type(object)
                    .into_iter()
                    .find(|p| p.name == name)
                    .map_or(TypeId::ERROR, |p| p.type_id)
            }
            (SyntaxKind::CallExpression | SyntaxKind::NewExpression, NodeData::Call { expression, .. }) => {
                let callee = self.get_type_of_expression(*expression);
                let kind = if arena.kind(node) == SyntaxKind::NewExpression {
                    SignatureKind::Construct
                } else {
                    SignatureKind::Call
                };
                interner
                    .signatures_of_type(callee, kind)
                    .first()
                    .map_or(TypeId::ERROR, |sig| self.get_return_type_of_signature(*sig))
            }
            _ => TypeId::ERROR,
        }
    }

    fn object_literal_type(&self, node: NodeIndex, properties: &[NodeIndex]) -> TypeId {
        let arena = self.arena();
        let interner = self.interner();
        let is_const = self.is_const_context(node);
        let mut members = ObjectType::default();
        for &member in properties {
            match arena.kind(member) {
                SyntaxKind::PropertyAssignment | SyntaxKind::ShorthandPropertyAssignment => {
                    let Some(prop_symbol) = self.get_symbol_of_declaration(member) else {
                        continue;
                    };
                    let type_id = match arena.data(member) {
                        Some(NodeData::PropertyAssignment { initializer, .. }) => {
                            self.get_type_of_expression(*initializer)
                        }
                        _ => self.get_type_of_symbol(prop_symbol),
                    };
                    let mut info = PropertyInfo::new(self.symbol_name(prop_symbol), type_id);
                    info.symbol = Some(prop_symbol);
                    info.declaration = member;
                    info.readonly = is_const;
                    members.properties.retain(|p| p.name != info.name);
                    members.properties.push(info);
                }
                SyntaxKind::SpreadAssignment => {
                    if let Some(NodeData::Spread { expression }) = arena.data(member) {
                        let spread = self.get_type_of_expression(*expression);
                        for prop in interner.properties_of_type(spread) {
                            members.properties.retain(|p| p.name != prop.name);
                            members.properties.push(prop);
                        }
                    }
                }
                _ => self.add_member(&mut members, member),
            }
        }
        let mut info = TypeInfo::new(TypeFlags::OBJECT, TypeData::Object(members))
            .with_object_flags(ObjectFlags::OBJECT_LITERAL | ObjectFlags::FRESH_LITERAL);
        if arena.is_in_js_file(node) {
            info.object_flags |= ObjectFlags::JS_LITERAL;
        }
        info.symbol = self.get_symbol_of_declaration(node);
        interner.alloc(info)
    }

    fn array_literal_type(&self, node: NodeIndex, elements: &[NodeIndex]) -> TypeId {
        let arena = self.arena();
        let interner = self.interner();
        if self.is_const_context(node) {
            let mut flags = Vec::with_capacity(elements.len());
            let mut types = Vec::with_capacity(elements.len());
            for &element in elements {
                match arena.data(element) {
                    Some(NodeData::Spread { expression }) if arena.kind(element) == SyntaxKind::SpreadElement => {
                        flags.push(ElementFlags::VARIADIC);
                        types.push(self.get_type_of_expression(*expression));
                    }
                    _ => {
                        flags.push(ElementFlags::REQUIRED);
                        types.push(self.get_type_of_expression(element));
                    }
                }
            }
            let labels = vec![None; flags.len()];
            let target = interner.tuple_target(flags, labels, true);
            return interner.reference(target, types);
        }
        let element_types: Vec<TypeId> = elements
            .iter()
            .map(|element| {
                let contextual = self.get_contextual_type(*element);
                let element_type = self.get_type_of_expression(*element);
                if self.is_literal_of_contextual_type(element_type, contextual) {
                    interner.regular_type_of_literal(element_type)
                } else {
                    interner.base_type_of_literal(element_type)
                }
            })
            .collect();
        let element = if element_types.is_empty() {
            TypeId::NEVER
        } else {
            interner.union(&element_types)
        };
        self.array_of(element, false)
    }

    // =========================================================================
    // Contextual types
    // =========================================================================

    pub(crate) fn compute_contextual_type(&self, node: NodeIndex) -> Option<TypeId> {
        let arena = self.arena();
        let interner = self.interner();
        let parent = arena.parent(node);
        match (arena.kind(parent), arena.data(parent)?) {
            (
                SyntaxKind::VariableDeclaration
                | SyntaxKind::Parameter
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertySignature,
                _,
            ) if arena.initializer(parent) == node => {
                let annotation = arena.type_annotation(parent);
                annotation
                    .is_some()
                    .then(|| self.get_type_from_type_node(annotation))
            }
            (SyntaxKind::ParenthesizedExpression, _) => self.get_contextual_type(parent),
            (
                SyntaxKind::AsExpression | SyntaxKind::TypeAssertionExpression | SyntaxKind::SatisfiesExpression,
                NodeData::Assertion { type_node, .. },
            ) => {
                if arena.is_const_type_reference(*type_node) {
                    None
                } else {
                    Some(self.get_type_from_type_node(*type_node))
                }
            }
            (SyntaxKind::PropertyAssignment, NodeData::PropertyAssignment { name, initializer }) => {
                if *initializer != node {
                    return None;
                }
                let name = arena.property_name_text(*name)?;
                let object_context = self.get_contextual_type(arena.parent(parent))?;
                interner
                    .properties_of_type(object_context)
                    .into_iter()
                    .find(|p| p.name == name)
                    .map(|p| p.type_id)
            }
            (SyntaxKind::ArrayLiteralExpression, NodeData::ArrayLiteral { elements }) => {
                let array_context = self.get_contextual_type(parent)?;
                if let Some((_, element_types)) = interner.tuple_parts(array_context) {
                    let position = elements.iter().position(|e| *e == node)?;
                    return element_types.get(position).copied();
                }
                let (target, args) = interner.reference_parts(array_context)?;
                let globals = self.globals();
                (Some(target) == globals.array || Some(target) == globals.readonly_array)
                    .then(|| args.first().copied())
                    .flatten()
            }
            (SyntaxKind::ReturnStatement, _) => {
                let function = arena.containing_function(parent);
                self.return_annotation_type(function)
            }
            (SyntaxKind::ArrowFunction, NodeData::Function(data)) if data.body == node => {
                self.return_annotation_type(parent)
            }
            _ => None,
        }
    }

    fn return_annotation_type(&self, function: NodeIndex) -> Option<TypeId> {
        let annotation = self.arena().type_annotation(function);
        annotation
            .is_some()
            .then(|| self.get_type_from_type_node(annotation))
    }
}
