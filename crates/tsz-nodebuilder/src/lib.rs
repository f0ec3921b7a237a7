//! Type-to-syntax synthesis.
//!
//! [`NodeBuilder`] turns checker types back into type nodes for declaration
//! emit and quick info:
//!
//! - **Dispatch**: every type shape maps onto one syntax form, with a length
//!   budget that abbreviates long member lists and a per-symbol depth limit
//!   that elides recursive shapes
//! - **Reuse**: written annotations are copied when every name in them still
//!   resolves identically from the target location
//! - **Syntax first**: declaration types come from the [`PseudoChecker`]
//!   when its description matches the checker's type
//! - **Caching**: anonymous and deferred shapes are memoized per enclosing
//!   declaration in a [`SerializedTypeCache`] shared between threads
//!
//! Events that a declaration emitter turns into diagnostics are sent to a
//! [`SymbolTracker`].
//!
//! [`PseudoChecker`]: tsz_pseudo::PseudoChecker

pub mod builder;
pub use builder::{NodeBuilder, NodeBuilderImpl, SynthesisScope};

pub mod cache;
pub use cache::{CompositeTypeCacheIdentity, SerializedTypeCache, SerializedTypeEntry};

pub mod cancellation;
pub use cancellation::CancellationToken;

pub mod context;
pub use context::{CompositeSymbolIdentity, NodeBuilderContext, TrackedSymbolArgs};

pub mod error;
pub use error::NodeBuilderError;

pub mod flags;
pub use flags::{InternalNodeBuilderFlags, NodeBuilderFlags};

pub mod options;
pub use options::SynthesisOptions;

pub mod tracker;
pub use tracker::{NoopTracker, RecordingTracker, SymbolTracker, TrackerEvent};

mod reuse;
pub use reuse::ReusedTypeNode;

mod declarations;
mod members;
mod pseudo_bridge;
mod symbols;
mod type_nodes;
