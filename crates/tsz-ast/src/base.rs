//! Base identifiers for the source tree.

use serde::{Deserialize, Serialize};

/// Index of a node in a [`crate::NodeArena`].
///
/// Fields that may be absent hold [`NodeIndex::NONE`] rather than an `Option`,
/// so node payloads stay `Copy`-friendly and compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Converts the sentinel into an `Option`.
    #[inline]
    pub const fn into_option(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}
