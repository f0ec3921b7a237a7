//! Per-call synthesis state.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsz_ast::NodeIndex;
use tsz_binder::SymbolId;
use tsz_solver::TypeId;

use crate::flags::{InternalNodeBuilderFlags, NodeBuilderFlags};
use crate::reuse::RecoveryBoundary;

/// Key of the symbol-depth map.
///
/// Structural shapes written at a particular place in the source (deferred
/// references, conditional types) are keyed by that node; everything else by
/// its symbol, with class constructor objects kept apart from instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeSymbolIdentity {
    Node(NodeIndex),
    Symbol { symbol: SymbolId, is_constructor: bool },
}

/// A symbol written by name, kept for deferred visibility checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedSymbolArgs {
    pub symbol: SymbolId,
    pub enclosing_declaration: NodeIndex,
    pub meaning: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReverseMappedEntry {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub property_type: TypeId,
    pub mapped_type: TypeId,
}

#[derive(Debug, Default)]
pub struct NodeBuilderContext {
    pub flags: NodeBuilderFlags,
    pub internal_flags: InternalNodeBuilderFlags,
    pub enclosing_declaration: NodeIndex,
    pub max_truncation_length: usize,
    pub approximate_length: usize,
    pub truncating: bool,
    pub encountered_error: bool,
    pub reported_diagnostic: bool,
    pub(crate) cancelled: bool,
    pub(crate) suppress_report_inference_fallback: bool,
    /// Placeholders substituted because a type was already on the visit path
    /// or past its depth limit.
    pub(crate) cycle_cutoffs: u32,
    pub(crate) visited_types: FxHashSet<TypeId>,
    /// Unnameable classes and interfaces currently written by structure.
    pub(crate) inaccessible_expansions: Vec<SymbolId>,
    pub(crate) symbol_depth: FxHashMap<CompositeSymbolIdentity, u32>,
    pub(crate) infer_type_parameters: Vec<TypeId>,
    pub(crate) type_parameter_names: FxHashMap<TypeId, String>,
    pub(crate) type_parameter_names_by_text: FxHashSet<String>,
    pub(crate) type_parameter_next_name_count: FxHashMap<String, u32>,
    pub(crate) tracked_symbols: Vec<TrackedSymbolArgs>,
    pub(crate) reverse_mapped_stack: Vec<ReverseMappedEntry>,
    pub(crate) recovery: Vec<RecoveryBoundary>,
}

impl NodeBuilderContext {
    pub(crate) fn new(
        enclosing_declaration: NodeIndex,
        flags: NodeBuilderFlags,
        internal_flags: InternalNodeBuilderFlags,
        max_truncation_length: usize,
    ) -> Self {
        NodeBuilderContext {
            flags,
            internal_flags,
            enclosing_declaration,
            max_truncation_length,
            ..NodeBuilderContext::default()
        }
    }

    /// Latches `truncating` once the budget is spent.
    pub(crate) fn check_truncation_length(&mut self) -> bool {
        if self.truncating {
            return true;
        }
        if self.approximate_length > self.max_truncation_length {
            debug!(
                approximate_length = self.approximate_length,
                budget = self.max_truncation_length,
                "truncation latched"
            );
            self.truncating = true;
        }
        self.truncating
    }

    #[inline]
    pub(crate) fn in_recovery_boundary(&self) -> bool {
        !self.recovery.is_empty()
    }

    pub fn reverse_mapped_depth(&self) -> usize {
        self.reverse_mapped_stack.len()
    }
}
