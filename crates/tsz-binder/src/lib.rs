//! Symbol binder for tsz declaration synthesis.
//!
//! The binder walks a source tree once and produces:
//! - a [`SymbolArena`] of [`Symbol`]s (flags, declarations, members, exports)
//! - per-container locals tables, keyed by the container node
//! - a global table for script files
//!
//! Name resolution ([`BinderState::resolve_name`]) walks containers outward
//! from a location, which is how synthesis decides whether a reference written
//! at one place still means the same symbol at another.

pub mod symbols;
pub use symbols::{Symbol, SymbolArena, SymbolId, SymbolTable, symbol_flags};

pub mod state;
pub use state::BinderState;

mod state_binding;
mod resolution;
