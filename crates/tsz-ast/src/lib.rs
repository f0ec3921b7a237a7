//! Syntax trees for tsz declaration synthesis.
//!
//! Two trees live here:
//! - The **source tree**: an arena of parent-linked [`Node`]s addressed by
//!   [`NodeIndex`]. It is produced by an external parser (or a test fixture)
//!   and is read-only for synthesis.
//! - The **synthesized tree**: owned [`synth::TypeNode`] values produced by the
//!   node builder. Reused source annotations are cloned into this tree.

pub mod base;
pub use base::NodeIndex;

pub mod syntax_kind;
pub use syntax_kind::SyntaxKind;

pub mod flags;
pub use flags::{modifier_flags, node_flags};

pub mod node;
pub use node::*;

pub mod node_arena;
pub mod node_access;

pub mod text;
pub use text::{escape_string, is_identifier_text};

// Synthesized output tree
pub mod synth;
pub mod factory;
pub mod printer;
pub use printer::{print_signature, print_type_element, print_type_node};
