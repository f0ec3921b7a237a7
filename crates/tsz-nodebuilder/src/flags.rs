//! Flags steering a synthesis call.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Options callers pass per request. Bit values follow TypeScript's
    /// `NodeBuilderFlags` so hosts can forward them unchanged.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct NodeBuilderFlags: u32 {
        const NO_TRUNCATION = 1 << 0;
        const WRITE_ARRAY_AS_GENERIC_TYPE = 1 << 1;
        const GENERATE_NAMES_FOR_SHADOWED_TYPE_PARAMS = 1 << 2;
        const USE_STRUCTURAL_FALLBACK = 1 << 3;
        const USE_FULLY_QUALIFIED_TYPE = 1 << 6;
        const SUPPRESS_ANY_RETURN_TYPE = 1 << 8;
        const WRITE_CLASS_EXPRESSION_AS_TYPE_LITERAL = 1 << 11;
        const USE_TYPE_OF_FUNCTION = 1 << 12;
        const OMIT_PARAMETER_MODIFIERS = 1 << 13;
        const USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE = 1 << 14;
        const USE_SINGLE_QUOTES_FOR_STRING_LITERAL_TYPE = 1 << 28;
        /// Write intersections with conflicting members as written instead
        /// of reducing them to `never`.
        const NO_TYPE_REDUCTION = 1 << 29;
        const OMIT_THIS_PARAMETER = 1 << 25;

        // Error handling
        const ALLOW_THIS_IN_OBJECT_LITERAL = 1 << 15;
        const ALLOW_ANONYMOUS_IDENTIFIER = 1 << 17;
        const ALLOW_EMPTY_UNION_OR_INTERSECTION = 1 << 18;
        const ALLOW_EMPTY_TUPLE = 1 << 19;
        const ALLOW_UNIQUE_ES_SYMBOL_TYPE = 1 << 20;
        const ALLOW_EMPTY_INDEX_INFO_TYPE = 1 << 21;
        const ALLOW_NODE_MODULES_RELATIVE_PATHS = 1 << 26;

        const IGNORE_ERRORS = Self::ALLOW_THIS_IN_OBJECT_LITERAL.bits()
            | Self::ALLOW_ANONYMOUS_IDENTIFIER.bits()
            | Self::ALLOW_EMPTY_UNION_OR_INTERSECTION.bits()
            | Self::ALLOW_EMPTY_TUPLE.bits()
            | Self::ALLOW_EMPTY_INDEX_INFO_TYPE.bits()
            | Self::ALLOW_NODE_MODULES_RELATIVE_PATHS.bits();

        // State
        const IN_OBJECT_TYPE_LITERAL = 1 << 22;
        const IN_TYPE_ALIAS = 1 << 23;
        const IN_INITIAL_ENTITY_NAME = 1 << 24;
    }
}

bitflags! {
    /// Flags the builder sets on itself; callers normally pass none.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct InternalNodeBuilderFlags: u32 {
        const WRITE_COMPUTED_PROPS = 1 << 0;
        /// Skip the syntactic (pseudo checker) path and synthesize from types.
        const NO_SYNTACTIC_PRINTER = 1 << 3;
        const DO_NOT_INCLUDE_SYMBOL_CHAIN = 1 << 4;
        /// Reused annotations may keep names that resolve nowhere.
        const ALLOW_UNRESOLVED_NAMES = 1 << 5;
    }
}
