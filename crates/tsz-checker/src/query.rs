//! Query surface consumed by declaration synthesis.

use serde::{Deserialize, Serialize};
use tsz_ast::{NodeArena, NodeIndex};
use tsz_binder::{BinderState, Symbol, SymbolId};
use tsz_solver::{SignatureId, TypeId, TypeInterner, TypePredicate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolAccessibility {
    Accessible,
    NotAccessible,
    /// Declared in another external module and not reachable by name.
    CannotBeNamed,
}

/// Result of an accessibility query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolAccessibilityResult {
    pub accessibility: SymbolAccessibility,
    /// Name of the first symbol in the chain that could not be reached.
    pub error_symbol_name: Option<String>,
    /// Specifier of the module that would have to be imported.
    pub error_module_name: Option<String>,
}

impl SymbolAccessibilityResult {
    pub fn accessible() -> Self {
        SymbolAccessibilityResult {
            accessibility: SymbolAccessibility::Accessible,
            error_symbol_name: None,
            error_module_name: None,
        }
    }

    #[inline]
    pub fn is_accessible(&self) -> bool {
        self.accessibility == SymbolAccessibility::Accessible
    }
}

/// Global generic targets the builder special-cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlobalTypes {
    pub array: Option<TypeId>,
    pub readonly_array: Option<TypeId>,
    pub iterable: Option<TypeId>,
    pub iterable_iterator: Option<TypeId>,
    pub async_iterable: Option<TypeId>,
    pub async_iterable_iterator: Option<TypeId>,
}

impl GlobalTypes {
    /// Builtin iterable targets whose trailing default type arguments are
    /// elided when printed.
    pub fn iterable_targets(&self) -> impl Iterator<Item = TypeId> + '_ {
        [
            self.iterable,
            self.iterable_iterator,
            self.async_iterable,
            self.async_iterable_iterator,
        ]
        .into_iter()
        .flatten()
    }
}

/// The checker as seen by synthesis.
///
/// Implementations are shared between threads; every query takes `&self`.
pub trait TypeChecker: Send + Sync {
    fn arena(&self) -> &NodeArena;
    fn binder(&self) -> &BinderState;
    fn interner(&self) -> &TypeInterner;
    fn globals(&self) -> GlobalTypes;
    fn strict_null_checks(&self) -> bool;

    // Symbols

    fn symbol(&self, symbol: SymbolId) -> Option<&Symbol> {
        self.binder().symbol(symbol)
    }

    fn symbol_name(&self, symbol: SymbolId) -> String {
        self.symbol(symbol)
            .map(|s| s.escaped_name.clone())
            .unwrap_or_default()
    }

    fn get_symbol_of_declaration(&self, node: NodeIndex) -> Option<SymbolId> {
        self.binder().get_symbol_of_declaration(node)
    }

    fn get_type_of_symbol(&self, symbol: SymbolId) -> TypeId;
    /// Setter type of an accessor; the read type for everything else.
    fn get_write_type_of_symbol(&self, symbol: SymbolId) -> TypeId;
    /// Type a class, interface, alias, enum or type parameter declares.
    fn get_declared_type_of_symbol(&self, symbol: SymbolId) -> TypeId;

    // Signatures

    fn get_signature_from_declaration(&self, node: NodeIndex) -> Option<SignatureId>;

    fn get_return_type_of_signature(&self, signature: SignatureId) -> TypeId {
        self.interner()
            .signature(signature)
            .map_or(TypeId::ERROR, |sig| sig.return_type)
    }

    fn get_type_predicate_of_signature(&self, signature: SignatureId) -> Option<TypePredicate> {
        self.interner()
            .signature(signature)
            .and_then(|sig| sig.type_predicate.clone())
    }

    // Expressions and type nodes

    fn get_type_of_expression(&self, node: NodeIndex) -> TypeId;

    fn get_regular_type_of_expression(&self, node: NodeIndex) -> TypeId {
        self.interner()
            .regular_type_of_literal(self.get_type_of_expression(node))
    }

    fn get_widened_type(&self, type_id: TypeId) -> TypeId {
        self.interner().widened_type(type_id)
    }

    fn get_type_from_type_node(&self, node: NodeIndex) -> TypeId;
    fn get_contextual_type(&self, node: NodeIndex) -> Option<TypeId>;

    fn is_literal_of_contextual_type(&self, candidate: TypeId, contextual: Option<TypeId>) -> bool {
        self.interner()
            .is_literal_of_contextual_type(candidate, contextual)
    }

    fn is_const_context(&self, node: NodeIndex) -> bool;

    // Names and visibility

    fn resolve_name(&self, location: NodeIndex, name: &str, meaning: u32) -> Option<SymbolId> {
        self.binder()
            .resolve_name(self.arena(), location, name, meaning)
    }

    fn resolve_entity_name(
        &self,
        name: NodeIndex,
        meaning: u32,
        location: NodeIndex,
    ) -> Option<SymbolId> {
        self.binder()
            .resolve_entity_name(self.arena(), name, meaning, location)
    }

    fn is_symbol_accessible(
        &self,
        symbol: SymbolId,
        enclosing_declaration: NodeIndex,
        meaning: u32,
    ) -> SymbolAccessibilityResult;

    fn is_value_symbol_accessible(&self, symbol: SymbolId, enclosing_declaration: NodeIndex) -> bool;

    /// Import specifier of an external module symbol.
    fn get_module_specifier(&self, module_symbol: SymbolId) -> Option<String>;

    // Type construction

    fn get_optional_type(&self, type_id: TypeId) -> TypeId {
        if !self.strict_null_checks() {
            return type_id;
        }
        self.interner().union(&[type_id, TypeId::UNDEFINED])
    }

    fn get_reduced_type(&self, type_id: TypeId) -> TypeId {
        type_id
    }

    /// Optional parameter whose declared annotation omits `undefined`.
    fn requires_adding_implicit_undefined(&self, declaration: NodeIndex) -> bool;
}
