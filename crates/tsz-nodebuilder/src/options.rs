//! Builder configuration.
//!
//! Options are plain data so drivers can load them from JSON:
//!
//! ```json
//! { "maximum_truncation_length": 200, "enable_cache": false }
//! ```
//!
//! Missing keys take their defaults.

use serde::{Deserialize, Serialize};
use tsz_common::limits;

use crate::flags::NodeBuilderFlags;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// OR-ed into the flags of every request.
    pub default_flags: NodeBuilderFlags,
    pub maximum_truncation_length: usize,
    /// Budget used when a request carries `NO_TRUNCATION`.
    pub no_truncation_maximum_truncation_length: usize,
    /// Nesting depth past which a recurring symbol is elided.
    pub maximum_symbol_depth: u32,
    pub enable_cache: bool,
    /// Add `| undefined` to optional parameters whose annotation lacks it.
    pub strict_null_checks: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            default_flags: NodeBuilderFlags::empty(),
            maximum_truncation_length: limits::DEFAULT_MAXIMUM_TRUNCATION_LENGTH,
            no_truncation_maximum_truncation_length: limits::NO_TRUNCATION_MAXIMUM_TRUNCATION_LENGTH,
            maximum_symbol_depth: limits::MAX_SYMBOL_DEPTH,
            enable_cache: true,
            strict_null_checks: true,
        }
    }
}

impl SynthesisOptions {
    pub(crate) fn truncation_length(&self, flags: NodeBuilderFlags) -> usize {
        if flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
            self.no_truncation_maximum_truncation_length
        } else {
            self.maximum_truncation_length
        }
    }
}
