//! Bit sets carried on source nodes.

/// Flags on [`crate::Node::flags`].
pub mod node_flags {
    pub const NONE: u32 = 0;
    /// `let` declaration list.
    pub const LET: u32 = 1 << 0;
    /// `const` declaration list.
    pub const CONST: u32 = 1 << 1;
    /// Node lives in a JavaScript file (JSDoc annotations apply).
    pub const JAVASCRIPT_FILE: u32 = 1 << 2;
    /// Node lives in an ambient context (`declare`, `.d.ts`).
    pub const AMBIENT: u32 = 1 << 3;

    pub const BLOCK_SCOPED: u32 = LET | CONST;
}

/// Syntactic modifiers on declarations.
pub mod modifier_flags {
    pub const NONE: u32 = 0;
    pub const EXPORT: u32 = 1 << 0;
    pub const AMBIENT: u32 = 1 << 1;
    pub const PUBLIC: u32 = 1 << 2;
    pub const PRIVATE: u32 = 1 << 3;
    pub const PROTECTED: u32 = 1 << 4;
    pub const STATIC: u32 = 1 << 5;
    pub const READONLY: u32 = 1 << 6;
    pub const ABSTRACT: u32 = 1 << 7;
    pub const ASYNC: u32 = 1 << 8;
    pub const DEFAULT: u32 = 1 << 9;
    pub const CONST: u32 = 1 << 10;
    pub const IN: u32 = 1 << 11;
    pub const OUT: u32 = 1 << 12;
    pub const OVERRIDE: u32 = 1 << 13;

    pub const ACCESSIBILITY: u32 = PUBLIC | PRIVATE | PROTECTED;
    pub const PARAMETER_PROPERTY: u32 = ACCESSIBILITY | READONLY | OVERRIDE;
    pub const NON_PUBLIC_ACCESSIBILITY: u32 = PRIVATE | PROTECTED;
}
