//! Symbol accessibility from an enclosing declaration.

use tracing::trace;
use tsz_ast::NodeIndex;
use tsz_binder::{SymbolId, symbol_flags};

use crate::checker::Checker;
use crate::query::{SymbolAccessibility, SymbolAccessibilityResult, TypeChecker};

/// Anonymous symbols (`__type`, `__object`, `__function`, ...) have no name to
/// write.
fn is_anonymous_name(name: &str) -> bool {
    name.starts_with("__")
}

fn is_external_module_name(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('"') && name.ends_with('"')
}

impl Checker {
    /// A symbol is accessible when some suffix of its container chain starts
    /// with a name that resolves to the same symbol at `enclosing`, or when
    /// the chain is rooted in an external module (reachable by import type).
    pub(crate) fn compute_symbol_accessibility(
        &self,
        symbol: SymbolId,
        enclosing: NodeIndex,
        meaning: u32,
    ) -> SymbolAccessibilityResult {
        if enclosing.is_none() {
            return SymbolAccessibilityResult::accessible();
        }
        let name = self.symbol_name(symbol);
        if is_anonymous_name(&name) {
            return SymbolAccessibilityResult {
                accessibility: SymbolAccessibility::CannotBeNamed,
                error_symbol_name: Some(name),
                error_module_name: None,
            };
        }

        let chain = self.binder().parent_chain(symbol);
        for (i, &root) in chain.iter().enumerate() {
            let root_name = self.symbol_name(root);
            if is_external_module_name(&root_name) {
                if i == 0 {
                    trace!(symbol = symbol.0, module = %root_name, "accessible through import type");
                    return SymbolAccessibilityResult::accessible();
                }
                continue;
            }
            let root_meaning = if i + 1 == chain.len() {
                meaning
            } else {
                symbol_flags::NAMESPACE | symbol_flags::CLASS
            };
            if self.resolve_name(enclosing, &root_name, root_meaning) == Some(root) {
                return SymbolAccessibilityResult::accessible();
            }
        }

        let error_module_name = chain
            .first()
            .filter(|root| **root != symbol)
            .map(|root| self.symbol_name(*root))
            .filter(|root_name| is_external_module_name(root_name));
        trace!(symbol = symbol.0, enclosing = enclosing.0, "symbol not accessible");
        SymbolAccessibilityResult {
            accessibility: SymbolAccessibility::NotAccessible,
            error_symbol_name: Some(name),
            error_module_name,
        }
    }
}
