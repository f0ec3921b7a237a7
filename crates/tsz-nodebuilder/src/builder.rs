//! Entry points and per-call plumbing.
//!
//! [`NodeBuilder`] is the long-lived, thread-shareable handle: a checker, the
//! options and an optional shared cache. Each request binds it to a
//! [`SymbolTracker`] through a [`NodeBuilderImpl`], which owns the context
//! stack for that tracker. Entry points on the impl may be called repeatedly
//! and from inside one another; each pushes a fresh [`NodeBuilderContext`]
//! and restores the outer one on exit.

use std::sync::Arc;

use tracing::{debug, trace};
use tsz_ast::synth::{
    EntityName, SignatureDeclaration, SignatureKind, TypeElement, TypeNode,
    TypeParameterDeclaration,
};
use tsz_ast::{NodeArena, NodeIndex, print_type_node};
use tsz_binder::{SymbolId, symbol_flags};
use tsz_checker::TypeChecker;
use tsz_pseudo::{PseudoChecker, PseudoType};
use tsz_solver::{IndexInfo, SignatureId, TypeId, TypeInterner};

use crate::cache::SerializedTypeCache;
use crate::cancellation::CancellationToken;
use crate::context::{NodeBuilderContext, TrackedSymbolArgs};
use crate::error::NodeBuilderError;
use crate::flags::{InternalNodeBuilderFlags, NodeBuilderFlags};
use crate::options::SynthesisOptions;
use crate::tracker::{SymbolTracker, TrackerEvent};

/// Where and how a request writes its output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynthesisScope {
    /// Location names are resolved from. `NONE` writes fully qualified names
    /// and disables the cache.
    pub enclosing_declaration: NodeIndex,
    pub flags: NodeBuilderFlags,
    pub internal_flags: InternalNodeBuilderFlags,
}

impl SynthesisScope {
    pub fn new(enclosing_declaration: NodeIndex) -> Self {
        SynthesisScope {
            enclosing_declaration,
            ..SynthesisScope::default()
        }
    }

    pub fn with_flags(mut self, flags: NodeBuilderFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_internal_flags(mut self, internal_flags: InternalNodeBuilderFlags) -> Self {
        self.internal_flags = internal_flags;
        self
    }
}

/// Shared synthesis handle.
pub struct NodeBuilder {
    checker: Arc<dyn TypeChecker>,
    cache: Option<Arc<SerializedTypeCache>>,
    options: SynthesisOptions,
    cancellation: CancellationToken,
}

impl NodeBuilder {
    /// A builder with its own cache when `options.enable_cache` is set.
    pub fn new(checker: Arc<dyn TypeChecker>, options: SynthesisOptions) -> Self {
        let cache = options
            .enable_cache
            .then(|| Arc::new(SerializedTypeCache::new()));
        NodeBuilder {
            checker,
            cache,
            options,
            cancellation: CancellationToken::new(),
        }
    }

    /// Share `cache` with other builders. Ignored when caching is disabled.
    pub fn with_cache(mut self, cache: Arc<SerializedTypeCache>) -> Self {
        if self.options.enable_cache {
            self.cache = Some(cache);
        }
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cache(&self) -> Option<&Arc<SerializedTypeCache>> {
        self.cache.as_ref()
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    pub fn checker(&self) -> &dyn TypeChecker {
        &*self.checker
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Bind the builder to `tracker` for one or more requests.
    pub fn bind<'a>(&'a self, tracker: &'a mut dyn SymbolTracker) -> NodeBuilderImpl<'a> {
        NodeBuilderImpl::new(
            &*self.checker,
            self.cache.as_deref(),
            &self.options,
            &self.cancellation,
            tracker,
        )
    }

    pub fn type_to_type_node(
        &self,
        type_id: TypeId,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.bind(tracker).type_to_type_node(type_id, scope)
    }

    /// `type_to_type_node` printed on one line.
    pub fn type_to_string(
        &self,
        type_id: TypeId,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<String, NodeBuilderError> {
        self.type_to_type_node(type_id, scope, tracker)
            .map(|node| print_type_node(&node))
    }

    pub fn serialize_type_for_declaration(
        &self,
        declaration: NodeIndex,
        type_id: TypeId,
        symbol: Option<SymbolId>,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.bind(tracker)
            .serialize_type_for_declaration(declaration, type_id, symbol, scope)
    }

    pub fn serialize_return_type_for_signature(
        &self,
        signature: SignatureId,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.bind(tracker)
            .serialize_return_type_for_signature(signature, scope)
    }

    pub fn signature_to_signature_declaration(
        &self,
        signature: SignatureId,
        kind: SignatureKind,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<SignatureDeclaration, NodeBuilderError> {
        self.bind(tracker)
            .signature_to_signature_declaration(signature, kind, scope)
    }

    pub fn index_info_to_index_signature_declaration(
        &self,
        info: &IndexInfo,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeElement, NodeBuilderError> {
        self.bind(tracker)
            .index_info_to_index_signature_declaration(info, scope)
    }

    pub fn type_parameter_to_declaration(
        &self,
        type_parameter: TypeId,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeParameterDeclaration, NodeBuilderError> {
        self.bind(tracker)
            .type_parameter_to_declaration(type_parameter, scope)
    }

    pub fn symbol_to_type_node(
        &self,
        symbol: SymbolId,
        meaning: u32,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.bind(tracker).symbol_to_type_node(symbol, meaning, scope)
    }

    pub fn symbol_to_entity_name(
        &self,
        symbol: SymbolId,
        meaning: u32,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<EntityName, NodeBuilderError> {
        self.bind(tracker).symbol_to_entity_name(symbol, meaning, scope)
    }

    /// Clone `existing` for use at the scope's enclosing declaration.
    /// `Ok(None)` means the annotation cannot be reused and the caller must
    /// synthesize from the type.
    pub fn reuse_type_node(
        &self,
        existing: NodeIndex,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<Option<TypeNode>, NodeBuilderError> {
        self.bind(tracker).reuse_type_node(existing, scope)
    }

    pub fn pseudo_type_to_type_node(
        &self,
        pseudo: &PseudoType,
        scope: SynthesisScope,
        tracker: &mut dyn SymbolTracker,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.bind(tracker).pseudo_type_to_type_node(pseudo, scope)
    }
}

/// A [`NodeBuilder`] bound to one tracker.
pub struct NodeBuilderImpl<'a> {
    pub(crate) checker: &'a dyn TypeChecker,
    pub(crate) pseudo: PseudoChecker<'a>,
    pub(crate) cache: Option<&'a SerializedTypeCache>,
    pub(crate) options: &'a SynthesisOptions,
    pub(crate) cancellation: &'a CancellationToken,
    pub(crate) tracker: &'a mut dyn SymbolTracker,
    pub(crate) ctx: NodeBuilderContext,
    saved_contexts: Vec<NodeBuilderContext>,
}

impl<'a> NodeBuilderImpl<'a> {
    pub fn new(
        checker: &'a dyn TypeChecker,
        cache: Option<&'a SerializedTypeCache>,
        options: &'a SynthesisOptions,
        cancellation: &'a CancellationToken,
        tracker: &'a mut dyn SymbolTracker,
    ) -> Self {
        NodeBuilderImpl {
            checker,
            pseudo: PseudoChecker::new(checker.arena(), checker.binder()),
            cache,
            options,
            cancellation,
            tracker,
            ctx: NodeBuilderContext::default(),
            saved_contexts: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn interner(&self) -> &'a TypeInterner {
        self.checker.interner()
    }

    #[inline]
    pub(crate) fn arena(&self) -> &'a NodeArena {
        self.checker.arena()
    }

    /// Number of contexts currently pushed by entry points of this builder.
    pub fn context_depth(&self) -> usize {
        self.saved_contexts.len()
    }

    /// The innermost context, for hosts that inspect state between calls.
    pub fn context(&self) -> &NodeBuilderContext {
        &self.ctx
    }

    /// Run `f` in a fresh context for `scope`.
    pub(crate) fn with_context<T>(
        &mut self,
        scope: SynthesisScope,
        f: impl FnOnce(&mut Self) -> T,
    ) -> Result<T, NodeBuilderError> {
        if self.cancellation.is_cancelled() {
            return Err(NodeBuilderError::Cancelled);
        }
        let flags = scope.flags | self.options.default_flags;
        let context = NodeBuilderContext::new(
            scope.enclosing_declaration,
            flags,
            scope.internal_flags,
            self.options.truncation_length(flags),
        );
        let outer = std::mem::replace(&mut self.ctx, context);
        self.saved_contexts.push(outer);

        let result = f(self);

        let finished = match self.saved_contexts.pop() {
            Some(outer) => std::mem::replace(&mut self.ctx, outer),
            None => std::mem::take(&mut self.ctx),
        };
        if finished.cancelled {
            return Err(NodeBuilderError::Cancelled);
        }
        if finished.truncating && finished.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
            self.tracker.report(TrackerEvent::Truncation);
        }
        if finished.encountered_error {
            debug!(
                enclosing = finished.enclosing_declaration.0,
                "synthesis abandoned: encountered error"
            );
            return Err(NodeBuilderError::EncounteredError);
        }
        Ok(result)
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn type_to_type_node(
        &mut self,
        type_id: TypeId,
        scope: SynthesisScope,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.with_context(scope, |b| b.type_to_type_node_helper(type_id))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn serialize_type_for_declaration(
        &mut self,
        declaration: NodeIndex,
        type_id: TypeId,
        symbol: Option<SymbolId>,
        scope: SynthesisScope,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.with_context(scope, |b| {
            b.serialize_type_for_declaration_helper(declaration, type_id, symbol)
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn serialize_return_type_for_signature(
        &mut self,
        signature: SignatureId,
        scope: SynthesisScope,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.with_context(scope, |b| b.return_type_node_of_signature(signature))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn signature_to_signature_declaration(
        &mut self,
        signature: SignatureId,
        kind: SignatureKind,
        scope: SynthesisScope,
    ) -> Result<SignatureDeclaration, NodeBuilderError> {
        self.with_context(scope, |b| {
            b.signature_to_signature_declaration_helper(signature, kind)
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn index_info_to_index_signature_declaration(
        &mut self,
        info: &IndexInfo,
        scope: SynthesisScope,
    ) -> Result<TypeElement, NodeBuilderError> {
        self.with_context(scope, |b| {
            b.index_info_to_index_signature_declaration_helper(info, None)
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn type_parameter_to_declaration(
        &mut self,
        type_parameter: TypeId,
        scope: SynthesisScope,
    ) -> Result<TypeParameterDeclaration, NodeBuilderError> {
        self.with_context(scope, |b| {
            b.type_parameter_to_declaration_helper(type_parameter)
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn symbol_to_type_node(
        &mut self,
        symbol: SymbolId,
        meaning: u32,
        scope: SynthesisScope,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.with_context(scope, |b| {
            b.symbol_to_type_node_helper(symbol, meaning, Vec::new())
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn symbol_to_entity_name(
        &mut self,
        symbol: SymbolId,
        meaning: u32,
        scope: SynthesisScope,
    ) -> Result<EntityName, NodeBuilderError> {
        self.with_context(scope, |b| b.symbol_to_entity_name_helper(symbol, meaning))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn reuse_type_node(
        &mut self,
        existing: NodeIndex,
        scope: SynthesisScope,
    ) -> Result<Option<TypeNode>, NodeBuilderError> {
        self.with_context(scope, |b| {
            b.try_reuse_existing_type_node(existing).map(|reused| reused.node)
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn pseudo_type_to_type_node(
        &mut self,
        pseudo: &PseudoType,
        scope: SynthesisScope,
    ) -> Result<TypeNode, NodeBuilderError> {
        self.with_context(scope, |b| b.pseudo_type_to_type_node_helper(pseudo))
    }

    // =========================================================================
    // Tracker routing
    // =========================================================================

    /// Record `symbol` as written by name at the current enclosing
    /// declaration. Returns whether the tracker reported a diagnostic.
    pub(crate) fn track_symbol(
        &mut self,
        symbol: SymbolId,
        enclosing_declaration: NodeIndex,
        meaning: u32,
    ) -> bool {
        let args = TrackedSymbolArgs {
            symbol,
            enclosing_declaration,
            meaning,
        };
        if let Some(boundary) = self.ctx.recovery.last_mut() {
            boundary.tracked_symbols.push(args);
            return false;
        }
        trace!(symbol = symbol.0, meaning, "track_symbol");
        if self.tracker.track_symbol(symbol, enclosing_declaration, meaning) {
            self.ctx.reported_diagnostic = true;
            return true;
        }
        let is_type_parameter = self
            .checker
            .symbol(symbol)
            .is_some_and(|s| s.has_flags(symbol_flags::TYPE_PARAMETER));
        if !is_type_parameter {
            self.ctx.tracked_symbols.push(args);
        }
        false
    }

    pub(crate) fn report(&mut self, event: TrackerEvent) {
        if matches!(event, TrackerEvent::InferenceFallback { .. })
            && self.ctx.suppress_report_inference_fallback
        {
            return;
        }
        let deferrable = !matches!(
            event,
            TrackerEvent::Truncation | TrackerEvent::InferenceFallback { .. }
        );
        if deferrable && let Some(boundary) = self.ctx.recovery.last_mut() {
            boundary.mark_error(Some(event));
            return;
        }
        if self.tracker.reports_diagnostics() {
            self.ctx.reported_diagnostic = true;
        }
        self.tracker.report(event);
    }
}
