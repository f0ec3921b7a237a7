//! Table-backed checker.
//!
//! Answers the [`TypeChecker`] queries from host tables populated by the
//! driver (or a test fixture), falling back to syntactic typing of
//! annotations and literals when a table has no entry. Computed answers are
//! written back so repeated queries return the same ids.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;
use tsz_ast::{NodeArena, NodeIndex, SyntaxKind};
use tsz_binder::{BinderState, SymbolId};
use tsz_solver::{SignatureId, TypeFlags, TypeId, TypeInterner};

use crate::error::CheckerError;
use crate::query::{GlobalTypes, SymbolAccessibilityResult, TypeChecker};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerOptions {
    pub strict_null_checks: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            strict_null_checks: true,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CheckerTables {
    pub(crate) globals: GlobalTypes,
    pub(crate) symbol_types: FxHashMap<SymbolId, TypeId>,
    pub(crate) write_types: FxHashMap<SymbolId, TypeId>,
    pub(crate) declared_types: FxHashMap<SymbolId, TypeId>,
    pub(crate) expression_types: FxHashMap<NodeIndex, TypeId>,
    pub(crate) type_node_types: FxHashMap<NodeIndex, TypeId>,
    pub(crate) contextual_types: FxHashMap<NodeIndex, TypeId>,
    pub(crate) signatures: FxHashMap<NodeIndex, SignatureId>,
}

pub struct Checker {
    arena: Arc<NodeArena>,
    binder: Arc<BinderState>,
    interner: Arc<TypeInterner>,
    options: CheckerOptions,
    state: Mutex<CheckerTables>,
}

impl Checker {
    pub fn new(
        arena: Arc<NodeArena>,
        binder: Arc<BinderState>,
        interner: Arc<TypeInterner>,
        options: CheckerOptions,
    ) -> Self {
        Checker {
            arena,
            binder,
            interner,
            options,
            state: Mutex::new(CheckerTables::default()),
        }
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn shared_interner(&self) -> Arc<TypeInterner> {
        Arc::clone(&self.interner)
    }

    pub(crate) fn tables(&self) -> MutexGuard<'_, CheckerTables> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_symbol(&self, symbol: SymbolId) -> Result<(), CheckerError> {
        match self.binder.symbol(symbol) {
            Some(_) => Ok(()),
            None => Err(CheckerError::UnknownSymbol(symbol)),
        }
    }

    fn ensure_node(&self, node: NodeIndex) -> Result<(), CheckerError> {
        match self.arena.get(node) {
            Some(_) => Ok(()),
            None => Err(CheckerError::UnknownNode(node)),
        }
    }

    // =========================================================================
    // Host table population
    // =========================================================================

    pub fn set_globals(&self, globals: GlobalTypes) {
        self.tables().globals = globals;
    }

    pub fn define_symbol_type(&self, symbol: SymbolId, type_id: TypeId) -> Result<(), CheckerError> {
        self.ensure_symbol(symbol)?;
        self.tables().symbol_types.insert(symbol, type_id);
        Ok(())
    }

    pub fn define_write_type(&self, symbol: SymbolId, type_id: TypeId) -> Result<(), CheckerError> {
        self.ensure_symbol(symbol)?;
        self.tables().write_types.insert(symbol, type_id);
        Ok(())
    }

    pub fn define_declared_type(&self, symbol: SymbolId, type_id: TypeId) -> Result<(), CheckerError> {
        self.ensure_symbol(symbol)?;
        self.tables().declared_types.insert(symbol, type_id);
        Ok(())
    }

    pub fn define_expression_type(&self, node: NodeIndex, type_id: TypeId) -> Result<(), CheckerError> {
        self.ensure_node(node)?;
        self.tables().expression_types.insert(node, type_id);
        Ok(())
    }

    pub fn define_type_node_type(&self, node: NodeIndex, type_id: TypeId) -> Result<(), CheckerError> {
        self.ensure_node(node)?;
        let kind = self.arena.kind(node);
        if !kind.is_type_node() {
            return Err(CheckerError::UnexpectedNodeKind {
                node,
                expected: "type node",
                found: format!("{kind:?}"),
            });
        }
        self.tables().type_node_types.insert(node, type_id);
        Ok(())
    }

    pub fn define_contextual_type(&self, node: NodeIndex, type_id: TypeId) -> Result<(), CheckerError> {
        self.ensure_node(node)?;
        self.tables().contextual_types.insert(node, type_id);
        Ok(())
    }

    pub fn define_signature(&self, node: NodeIndex, signature: SignatureId) -> Result<(), CheckerError> {
        self.ensure_node(node)?;
        self.tables().signatures.insert(node, signature);
        Ok(())
    }

    // =========================================================================
    // Memoization helpers
    // =========================================================================

    /// First writer wins so that concurrent computations agree on one id.
    pub(crate) fn remember_symbol_type(&self, symbol: SymbolId, type_id: TypeId) -> TypeId {
        *self.tables().symbol_types.entry(symbol).or_insert(type_id)
    }

    pub(crate) fn remember_declared_type(&self, symbol: SymbolId, type_id: TypeId) -> TypeId {
        *self.tables().declared_types.entry(symbol).or_insert(type_id)
    }

    pub(crate) fn remember_type_node_type(&self, node: NodeIndex, type_id: TypeId) -> TypeId {
        *self.tables().type_node_types.entry(node).or_insert(type_id)
    }

    pub(crate) fn remember_expression_type(&self, node: NodeIndex, type_id: TypeId) -> TypeId {
        *self.tables().expression_types.entry(node).or_insert(type_id)
    }

    pub(crate) fn remember_signature(&self, node: NodeIndex, signature: SignatureId) -> SignatureId {
        *self.tables().signatures.entry(node).or_insert(signature)
    }
}

impl TypeChecker for Checker {
    fn arena(&self) -> &NodeArena {
        &self.arena
    }

    fn binder(&self) -> &BinderState {
        &self.binder
    }

    fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    fn globals(&self) -> GlobalTypes {
        self.tables().globals
    }

    fn strict_null_checks(&self) -> bool {
        self.options.strict_null_checks
    }

    fn get_reduced_type(&self, type_id: TypeId) -> TypeId {
        self.interner.reduced_type(type_id)
    }

    fn get_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        if let Some(&known) = self.tables().symbol_types.get(&symbol) {
            return known;
        }
        let computed = self.compute_type_of_symbol(symbol);
        trace!(symbol = symbol.0, type_id = computed.0, "get_type_of_symbol: computed");
        self.remember_symbol_type(symbol, computed)
    }

    fn get_write_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        if let Some(&known) = self.tables().write_types.get(&symbol) {
            return known;
        }
        self.compute_write_type_of_symbol(symbol)
            .unwrap_or_else(|| self.get_type_of_symbol(symbol))
    }

    fn get_declared_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        if let Some(&known) = self.tables().declared_types.get(&symbol) {
            return known;
        }
        self.compute_declared_type_of_symbol(symbol)
    }

    fn get_signature_from_declaration(&self, node: NodeIndex) -> Option<SignatureId> {
        if let Some(&known) = self.tables().signatures.get(&node) {
            return Some(known);
        }
        let computed = self.compute_signature_from_declaration(node)?;
        Some(self.remember_signature(node, computed))
    }

    fn get_type_of_expression(&self, node: NodeIndex) -> TypeId {
        if let Some(&known) = self.tables().expression_types.get(&node) {
            return known;
        }
        let computed = self.compute_type_of_expression(node);
        self.remember_expression_type(node, computed)
    }

    fn get_type_from_type_node(&self, node: NodeIndex) -> TypeId {
        if let Some(&known) = self.tables().type_node_types.get(&node) {
            return known;
        }
        let computed = self.compute_type_from_type_node(node);
        self.remember_type_node_type(node, computed)
    }

    fn get_contextual_type(&self, node: NodeIndex) -> Option<TypeId> {
        if let Some(&known) = self.tables().contextual_types.get(&node) {
            return Some(known);
        }
        self.compute_contextual_type(node)
    }

    fn is_const_context(&self, node: NodeIndex) -> bool {
        if self.arena.is_const_assertion_context(node) {
            return true;
        }
        self.get_contextual_type(node)
            .is_some_and(|contextual| self.is_const_type_variable(contextual))
    }

    fn is_symbol_accessible(
        &self,
        symbol: SymbolId,
        enclosing_declaration: NodeIndex,
        meaning: u32,
    ) -> SymbolAccessibilityResult {
        self.compute_symbol_accessibility(symbol, enclosing_declaration, meaning)
    }

    fn is_value_symbol_accessible(&self, symbol: SymbolId, enclosing_declaration: NodeIndex) -> bool {
        self.compute_symbol_accessibility(symbol, enclosing_declaration, tsz_binder::symbol_flags::VALUE)
            .is_accessible()
    }

    fn get_module_specifier(&self, module_symbol: SymbolId) -> Option<String> {
        let name = &self.binder.symbol(module_symbol)?.escaped_name;
        let unquoted = name.strip_prefix('"')?.strip_suffix('"')?;
        Some(unquoted.to_string())
    }

    fn requires_adding_implicit_undefined(&self, declaration: NodeIndex) -> bool {
        if !self.options.strict_null_checks {
            return false;
        }
        let arena = &*self.arena;
        let optional = match arena.kind(declaration) {
            SyntaxKind::Parameter
            | SyntaxKind::PropertySignature
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::JSDocPropertyTag => arena.has_question_token(declaration),
            _ => false,
        };
        if !optional {
            return false;
        }
        let annotation = arena.type_annotation(declaration);
        annotation.is_some()
            && !self
                .interner
                .maybe_type_of_kind(self.get_type_from_type_node(annotation), TypeFlags::UNDEFINED)
    }
}
