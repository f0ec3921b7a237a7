//! Writing symbols by name.
//!
//! A symbol is written through the shortest chain of its exported parents
//! whose first element can be named from the enclosing declaration. Chains
//! rooted in an external module become `import("specifier").Rest` types.

use tracing::trace;
use tsz_ast::synth::{EntityName, TypeNode};
use tsz_ast::factory;
use tsz_binder::{SymbolId, symbol_flags};

use crate::builder::NodeBuilderImpl;
use crate::flags::{InternalNodeBuilderFlags, NodeBuilderFlags};
use crate::tracker::TrackerEvent;

/// `"foo"` names an external module.
fn is_external_module_name(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('"') && name.ends_with('"')
}

impl<'a> NodeBuilderImpl<'a> {
    pub(crate) fn symbol_to_type_node_helper(
        &mut self,
        symbol: SymbolId,
        meaning: u32,
        type_arguments: Vec<TypeNode>,
    ) -> TypeNode {
        let chain = self.lookup_symbol_chain(symbol, meaning);
        let names: Vec<String> = chain.iter().map(|s| self.checker.symbol_name(*s)).collect();
        let is_type_of = meaning == symbol_flags::VALUE;

        if let (Some(&root), Some(root_name)) = (chain.first(), names.first())
            && is_external_module_name(root_name)
        {
            let specifier = self
                .checker
                .get_module_specifier(root)
                .unwrap_or_else(|| root_name.trim_matches('"').to_string());
            if specifier.contains("/node_modules/")
                && !self
                    .ctx
                    .flags
                    .contains(NodeBuilderFlags::ALLOW_NODE_MODULES_RELATIVE_PATHS)
            {
                self.report(TrackerEvent::LikelyUnsafeImport {
                    specifier: specifier.clone(),
                });
            }
            let qualifier = (names.len() > 1).then(|| EntityName::from_segments(&names[1..]));
            self.ctx.approximate_length += specifier.len() + 10;
            if let Some(qualifier) = &qualifier {
                self.ctx.approximate_length += qualifier.text().len() + 1;
            }
            return TypeNode::Import {
                argument: specifier,
                qualifier,
                type_arguments,
                is_type_of: is_type_of || names.len() == 1,
            };
        }

        let name = EntityName::from_segments(&names);
        self.ctx.approximate_length += name.text().len();
        if is_type_of {
            self.ctx.approximate_length += 7;
            factory::type_query(name, type_arguments)
        } else {
            factory::type_reference(name, type_arguments)
        }
    }

    pub(crate) fn symbol_to_entity_name_helper(&mut self, symbol: SymbolId, meaning: u32) -> EntityName {
        let chain = self.lookup_symbol_chain(symbol, meaning);
        let names: Vec<String> = chain
            .iter()
            .map(|s| self.checker.symbol_name(*s))
            .filter(|name| !is_external_module_name(name))
            .collect();
        if names.is_empty() {
            return EntityName::ident(self.checker.symbol_name(symbol));
        }
        let name = EntityName::from_segments(&names);
        self.ctx.approximate_length += name.text().len();
        name
    }

    /// Qualification chain for `symbol`, outermost first. Records the
    /// symbol with the tracker.
    fn lookup_symbol_chain(&mut self, symbol: SymbolId, meaning: u32) -> Vec<SymbolId> {
        self.track_symbol(symbol, self.ctx.enclosing_declaration, meaning);
        let is_type_parameter = self
            .checker
            .symbol(symbol)
            .is_some_and(|s| s.has_flags(symbol_flags::TYPE_PARAMETER));
        if is_type_parameter
            || self
                .ctx
                .internal_flags
                .contains(InternalNodeBuilderFlags::DO_NOT_INCLUDE_SYMBOL_CHAIN)
        {
            return vec![symbol];
        }
        let chain = self.checker.binder().parent_chain(symbol);
        let enclosing = self.ctx.enclosing_declaration;
        if enclosing.is_none() || self.ctx.flags.contains(NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE) {
            return chain;
        }
        for start in (0..chain.len()).rev() {
            let root = chain[start];
            let root_name = self.checker.symbol_name(root);
            if is_external_module_name(&root_name) {
                continue;
            }
            let root_meaning = if start + 1 == chain.len() {
                meaning
            } else {
                symbol_flags::NAMESPACE | symbol_flags::CLASS
            };
            if self.checker.resolve_name(enclosing, &root_name, root_meaning) == Some(root) {
                trace!(symbol = symbol.0, depth = chain.len() - start, "accessible symbol chain");
                return chain[start..].to_vec();
            }
        }
        chain
    }
}
