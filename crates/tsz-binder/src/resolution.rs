//! Name resolution against bound containers.

use tracing::trace;
use tsz_ast::{NodeArena, NodeData, NodeIndex, SyntaxKind};

use crate::state::BinderState;
use crate::symbols::{SymbolId, symbol_flags};

impl BinderState {
    /// Resolve `name` with `meaning` as seen from `location`: the innermost
    /// container declaring it wins, then the global table.
    pub fn resolve_name(
        &self,
        arena: &NodeArena,
        location: NodeIndex,
        name: &str,
        meaning: u32,
    ) -> Option<SymbolId> {
        let mut current = location;
        while current.is_some() {
            if let Some(id) = self.locals.get(&current).and_then(|t| t.get(name))
                && self.symbol(id).is_some_and(|s| s.flags & meaning != 0)
            {
                trace!(name, ?id, container = current.0, "resolve_name: found in locals");
                return Some(id);
            }
            current = arena.parent(current);
        }
        self.globals
            .get(name)
            .filter(|&id| self.symbol(id).is_some_and(|s| s.flags & meaning != 0))
    }

    /// Resolve an identifier, qualified name or property-access chain.
    ///
    /// `location` is where resolution starts; `NodeIndex::NONE` means the
    /// name node's own position.
    pub fn resolve_entity_name(
        &self,
        arena: &NodeArena,
        name: NodeIndex,
        meaning: u32,
        location: NodeIndex,
    ) -> Option<SymbolId> {
        let start = if location.is_some() { location } else { name };
        match arena.data(name)? {
            NodeData::Identifier { text } if arena.kind(name) == SyntaxKind::Identifier => {
                self.resolve_name(arena, start, text, meaning)
            }
            NodeData::QualifiedName { left, right }
            | NodeData::PropertyAccess {
                expression: left,
                name: right,
            } => {
                let namespace = self.resolve_entity_name(
                    arena,
                    *left,
                    symbol_flags::NAMESPACE | symbol_flags::CLASS,
                    location,
                )?;
                let member = arena.identifier_text(*right)?;
                self.get_export(namespace, member)
                    .filter(|&id| self.symbol(id).is_some_and(|s| s.flags & meaning != 0))
            }
            _ => None,
        }
    }

    /// Chain of exported parents from the outermost container down to
    /// `symbol` itself.
    pub fn parent_chain(&self, symbol: SymbolId) -> Vec<SymbolId> {
        let mut chain = vec![symbol];
        let mut current = symbol;
        while let Some(parent) = self.symbol(current).and_then(|s| s.parent) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}
