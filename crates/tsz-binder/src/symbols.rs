//! Symbols, symbol ids and symbol tables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tsz_ast::NodeIndex;

/// Symbol flags, matching the meanings TypeScript assigns to declarations.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const FUNCTION_SCOPED_VARIABLE: u32 = 1 << 0;
    pub const BLOCK_SCOPED_VARIABLE: u32 = 1 << 1;
    pub const PROPERTY: u32 = 1 << 2;
    pub const ENUM_MEMBER: u32 = 1 << 3;
    pub const FUNCTION: u32 = 1 << 4;
    pub const CLASS: u32 = 1 << 5;
    pub const INTERFACE: u32 = 1 << 6;
    pub const CONST_ENUM: u32 = 1 << 7;
    pub const REGULAR_ENUM: u32 = 1 << 8;
    pub const VALUE_MODULE: u32 = 1 << 9;
    pub const NAMESPACE_MODULE: u32 = 1 << 10;
    pub const TYPE_LITERAL: u32 = 1 << 11;
    pub const OBJECT_LITERAL: u32 = 1 << 12;
    pub const METHOD: u32 = 1 << 13;
    pub const CONSTRUCTOR: u32 = 1 << 14;
    pub const GET_ACCESSOR: u32 = 1 << 15;
    pub const SET_ACCESSOR: u32 = 1 << 16;
    pub const SIGNATURE: u32 = 1 << 17;
    pub const TYPE_PARAMETER: u32 = 1 << 18;
    pub const TYPE_ALIAS: u32 = 1 << 19;
    pub const EXPORT_VALUE: u32 = 1 << 20;
    pub const ALIAS: u32 = 1 << 21;
    pub const OPTIONAL: u32 = 1 << 24;
    pub const TRANSIENT: u32 = 1 << 25;

    pub const ENUM: u32 = REGULAR_ENUM | CONST_ENUM;
    pub const VARIABLE: u32 = FUNCTION_SCOPED_VARIABLE | BLOCK_SCOPED_VARIABLE;
    pub const ACCESSOR: u32 = GET_ACCESSOR | SET_ACCESSOR;
    pub const MODULE: u32 = VALUE_MODULE | NAMESPACE_MODULE;
    pub const VALUE: u32 = VARIABLE
        | PROPERTY
        | ENUM_MEMBER
        | OBJECT_LITERAL
        | FUNCTION
        | CLASS
        | ENUM
        | VALUE_MODULE
        | METHOD
        | GET_ACCESSOR
        | SET_ACCESSOR;
    pub const TYPE: u32 =
        CLASS | INTERFACE | ENUM | ENUM_MEMBER | TYPE_LITERAL | TYPE_PARAMETER | TYPE_ALIAS;
    pub const NAMESPACE: u32 = VALUE_MODULE | NAMESPACE_MODULE | ENUM;

    /// Whether a new declaration with `incoming` flags merges into an
    /// existing symbol with `existing` flags.
    pub const fn merge_compatible(existing: u32, incoming: u32) -> bool {
        let both = existing | incoming;
        if existing & incoming & (INTERFACE | MODULE) != 0 {
            return true;
        }
        if both & MODULE != 0 && both & (FUNCTION | CLASS | ENUM | INTERFACE) != 0 {
            return true;
        }
        if existing & ACCESSOR != 0 && incoming & ACCESSOR != 0 {
            return existing & incoming & ACCESSOR == 0;
        }
        if both & CLASS != 0 && both & INTERFACE != 0 {
            return true;
        }
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Name to symbol, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn set(&mut self, name: String, symbol: SymbolId) {
        self.symbols.insert(name, symbol);
    }

    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub flags: u32,
    pub escaped_name: String,
    pub declarations: Vec<NodeIndex>,
    pub value_declaration: NodeIndex,
    /// Containing namespace, enum, class or module; set only when the symbol
    /// is reachable through that container's exports.
    pub parent: Option<SymbolId>,
    pub members: SymbolTable,
    pub exports: SymbolTable,
}

impl Symbol {
    #[inline]
    pub fn has_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, flags: u32, name: String) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            id,
            flags,
            escaped_name: name,
            declarations: Vec::new(),
            value_declaration: NodeIndex::NONE,
            parent: None,
            members: SymbolTable::new(),
            exports: SymbolTable::new(),
        });
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
