//! Sink for visibility and failure events raised during synthesis.
//!
//! The builder never produces diagnostics itself. Each categorized failure
//! is handed to the caller's [`SymbolTracker`], which may turn it into a
//! diagnostic (a declaration emitter) or ignore it (quick info).

use rustc_hash::FxHashSet;
use tsz_ast::NodeIndex;
use tsz_binder::SymbolId;
use tsz_common::diagnostics::diagnostic_messages;
use tsz_common::{DiagnosticMessage, format_message};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerEvent {
    CyclicStructure,
    InaccessibleThis,
    InaccessibleUniqueSymbol,
    /// Output exceeded the budget of a `NO_TRUNCATION` request.
    Truncation,
    LikelyUnsafeImport {
        specifier: String,
    },
    PrivateInBaseOfClassExpression {
        property_name: String,
    },
    NonSerializableProperty {
        property_name: String,
    },
    NonlocalAugmentation {
        containing_file: NodeIndex,
        parent_symbol: SymbolId,
        augmenting_symbol: SymbolId,
    },
    /// Syntax could not describe `node`; the full checker was asked instead.
    InferenceFallback {
        node: NodeIndex,
    },
}

impl TrackerEvent {
    pub fn diagnostic(&self) -> DiagnosticMessage {
        match self {
            TrackerEvent::CyclicStructure => {
                diagnostic_messages::THE_INFERRED_TYPE_OF_0_REFERENCES_A_TYPE_WITH_A_CYCLIC_STRUCTURE
            }
            TrackerEvent::InaccessibleThis | TrackerEvent::InaccessibleUniqueSymbol => {
                diagnostic_messages::THE_INFERRED_TYPE_OF_0_REFERENCES_AN_INACCESSIBLE_1_TYPE
            }
            TrackerEvent::Truncation => {
                diagnostic_messages::THE_INFERRED_TYPE_OF_THIS_NODE_EXCEEDS_THE_MAXIMUM_LENGTH
            }
            TrackerEvent::LikelyUnsafeImport { .. } => {
                diagnostic_messages::THE_INFERRED_TYPE_OF_0_CANNOT_BE_NAMED_WITHOUT_A_REFERENCE_TO_1
            }
            TrackerEvent::PrivateInBaseOfClassExpression { .. } => {
                diagnostic_messages::PROPERTY_0_OF_EXPORTED_ANONYMOUS_CLASS_TYPE_MAY_NOT_BE_PRIVATE_OR_PROTECTED
            }
            TrackerEvent::NonSerializableProperty { .. } => {
                diagnostic_messages::THE_TYPE_OF_THIS_NODE_CANNOT_BE_SERIALIZED_BECAUSE_ITS_PROPERTY_0
            }
            TrackerEvent::NonlocalAugmentation { .. } => {
                diagnostic_messages::DECLARATION_AUGMENTS_DECLARATION_IN_ANOTHER_FILE
            }
            TrackerEvent::InferenceFallback { .. } => {
                diagnostic_messages::DECLARATION_REQUIRES_AN_EXPLICIT_TYPE_ANNOTATION
            }
        }
    }

    #[inline]
    pub fn code(&self) -> u32 {
        self.diagnostic().code
    }

    /// Diagnostic text for the event, naming `declaration_name` where the
    /// message refers to the declaration being emitted.
    pub fn message(&self, declaration_name: &str) -> String {
        let template = self.diagnostic().message;
        match self {
            TrackerEvent::InaccessibleThis => format_message(template, &[declaration_name, "this"]),
            TrackerEvent::InaccessibleUniqueSymbol => {
                format_message(template, &[declaration_name, "unique symbol"])
            }
            TrackerEvent::LikelyUnsafeImport { specifier } => {
                format_message(template, &[declaration_name, specifier])
            }
            TrackerEvent::PrivateInBaseOfClassExpression { property_name }
            | TrackerEvent::NonSerializableProperty { property_name } => {
                format_message(template, &[property_name])
            }
            _ => format_message(template, &[declaration_name]),
        }
    }
}

pub trait SymbolTracker {
    /// Called for every symbol written by name. Returns `true` when the
    /// tracker reported a diagnostic for it.
    fn track_symbol(&mut self, _symbol: SymbolId, _enclosing: NodeIndex, _meaning: u32) -> bool {
        false
    }

    fn report(&mut self, event: TrackerEvent);

    /// Whether reported events become diagnostics. Results built while a
    /// diagnostic was raised are never cached.
    fn reports_diagnostics(&self) -> bool {
        true
    }
}

/// Discards everything. Used by quick-info style callers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracker;

impl SymbolTracker for NoopTracker {
    fn report(&mut self, _event: TrackerEvent) {}

    fn reports_diagnostics(&self) -> bool {
        false
    }
}

/// Keeps every event and tracked symbol in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingTracker {
    pub events: Vec<TrackerEvent>,
    pub tracked: Vec<(SymbolId, NodeIndex, u32)>,
    /// Symbols this tracker treats as inaccessible.
    pub rejected: FxHashSet<SymbolId>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        RecordingTracker::default()
    }

    pub fn rejecting(symbols: impl IntoIterator<Item = SymbolId>) -> Self {
        RecordingTracker {
            rejected: symbols.into_iter().collect(),
            ..RecordingTracker::default()
        }
    }

    pub fn inference_fallbacks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TrackerEvent::InferenceFallback { .. }))
            .count()
    }
}

impl SymbolTracker for RecordingTracker {
    fn track_symbol(&mut self, symbol: SymbolId, enclosing: NodeIndex, meaning: u32) -> bool {
        self.tracked.push((symbol, enclosing, meaning));
        self.rejected.contains(&symbol)
    }

    fn report(&mut self, event: TrackerEvent) {
        self.events.push(event);
    }
}
