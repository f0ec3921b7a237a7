//! Binder state: symbols, locals and lookups.

use rustc_hash::FxHashMap;
use tsz_ast::{NodeArena, NodeIndex};

use crate::symbols::{Symbol, SymbolArena, SymbolId, SymbolTable};

#[derive(Debug, Default)]
pub struct BinderState {
    pub symbols: SymbolArena,
    /// Declaration node (or anonymous literal/function node) to its symbol.
    pub node_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Container node to the names declared directly inside it.
    pub locals: FxHashMap<NodeIndex, SymbolTable>,
    /// Declarations of script (non-module) files.
    pub globals: SymbolTable,
    /// External module specifier to the module symbol.
    pub module_symbols: FxHashMap<String, SymbolId>,
}

impl BinderState {
    pub fn new() -> Self {
        BinderState::default()
    }

    /// Bind every source file in `files`.
    pub fn bind_program(arena: &NodeArena, files: &[NodeIndex]) -> Self {
        let mut binder = BinderState::new();
        for &file in files {
            binder.bind_source_file(arena, file);
        }
        binder
    }

    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    #[inline]
    pub fn get_symbol_of_declaration(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    pub fn locals_of(&self, container: NodeIndex) -> Option<&SymbolTable> {
        self.locals.get(&container)
    }

    /// Module symbol of the external module `file`, if it is one.
    pub fn module_symbol_of_file(&self, arena: &NodeArena, file: NodeIndex) -> Option<SymbolId> {
        let data = arena.source_file_data(file)?;
        let specifier = data.module_specifier.as_ref()?;
        self.module_symbols.get(specifier).copied()
    }

    /// Look up `name` among the exports of `symbol`.
    pub fn get_export(&self, symbol: SymbolId, name: &str) -> Option<SymbolId> {
        self.symbol(symbol)?.exports.get(name)
    }

    /// Look up `name` among the members of `symbol`.
    pub fn get_member(&self, symbol: SymbolId, name: &str) -> Option<SymbolId> {
        self.symbol(symbol)?.members.get(name)
    }
}
