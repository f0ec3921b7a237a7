//! Serialized-type cache.
//!
//! Results of [`visit_and_transform`](crate::NodeBuilder) are stored per
//! enclosing declaration so that repeated requests from one location (every
//! member of a class, every overload of a function) share work. Builders on
//! different threads may share one cache behind an `Arc`; concurrent stores
//! of the same key keep the first value.
//!
//! An entry carries what a miss would have done besides producing the node:
//! the tracked symbols, the length it added and whether it latched
//! truncation. A hit replays those.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsz_ast::NodeIndex;
use tsz_ast::synth::TypeNode;
use tsz_solver::TypeId;

use crate::context::TrackedSymbolArgs;
use crate::flags::{InternalNodeBuilderFlags, NodeBuilderFlags};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeTypeCacheIdentity {
    pub type_id: TypeId,
    pub flags: NodeBuilderFlags,
    pub internal_flags: InternalNodeBuilderFlags,
}

/// Length-budget state a build started from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BudgetState {
    pub approximate_length: usize,
    pub truncating: bool,
    pub max_truncation_length: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SerializedTypeEntry {
    pub node: TypeNode,
    pub truncating: bool,
    pub added_length: usize,
    pub tracked_symbols: Vec<TrackedSymbolArgs>,
    pub(crate) started: BudgetState,
}

impl SerializedTypeEntry {
    /// Whether a miss starting from `state` would build the same node.
    ///
    /// Output only depends on the budget through the truncation latch, so an
    /// entry that never came near the budget is valid anywhere it still fits;
    /// one built entirely while truncating is valid wherever truncation is
    /// already latched; one that latched midway only replays from the exact
    /// same starting point.
    pub(crate) fn is_reusable_from(&self, state: BudgetState) -> bool {
        if self.started.truncating {
            return state.truncating;
        }
        if state.truncating {
            return false;
        }
        if !self.truncating {
            return state.approximate_length + self.added_length <= state.max_truncation_length;
        }
        self.started == state
    }
}

#[derive(Debug, Default)]
pub struct SerializedTypeCache {
    entries: DashMap<(NodeIndex, CompositeTypeCacheIdentity), SerializedTypeEntry>,
}

impl SerializedTypeCache {
    pub fn new() -> Self {
        SerializedTypeCache::default()
    }

    pub fn get(
        &self,
        enclosing_declaration: NodeIndex,
        identity: &CompositeTypeCacheIdentity,
    ) -> Option<SerializedTypeEntry> {
        self.entries
            .get(&(enclosing_declaration, *identity))
            .map(|entry| entry.value().clone())
    }

    /// Stores `entry` unless another builder got there first. Returns whether
    /// this call stored it.
    pub fn insert(
        &self,
        enclosing_declaration: NodeIndex,
        identity: CompositeTypeCacheIdentity,
        entry: SerializedTypeEntry,
    ) -> bool {
        let mut stored = false;
        self.entries
            .entry((enclosing_declaration, identity))
            .or_insert_with(|| {
                stored = true;
                entry
            });
        if stored {
            debug!(
                enclosing = enclosing_declaration.0,
                type_id = identity.type_id.0,
                "serialized type cached"
            );
        }
        stored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drops every entry scoped to `enclosing_declaration`, for hosts that
    /// discard a source file.
    pub fn evict_enclosing(&self, enclosing_declaration: NodeIndex) {
        self.entries
            .retain(|(enclosing, _), _| *enclosing != enclosing_declaration);
    }
}

#[cfg(test)]
#[path = "../tests/cache_entry_tests.rs"]
mod tests;
