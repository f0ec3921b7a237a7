//! Centralized limits and thresholds for declaration synthesis.
//!
//! Every budget the node builder enforces lives here so the builder, the
//! serialized-type cache and the configuration defaults agree on one value.
//!
//! # Categories
//!
//! - **Length Budgets**: approximate printed width before output is abbreviated
//! - **Recursion Depths**: how often one symbol may nest inside itself

// =============================================================================
// Length Budgets
// =============================================================================

/// Approximate printed width after which synthesized output is truncated.
///
/// Every emitted token adds its estimated width to the builder's running
/// `approximate_length`. Once the total exceeds this value the builder latches
/// into truncating mode for the rest of the call: member lists are shortened to
/// `... N more ...` while the final member is still written.
///
/// # TypeScript example
///
/// ```typescript
/// declare const big: { p0: number; p1: number; /* ... */ p999: number };
/// // hover shows:
/// // { p0: number; p1: number; ... 996 more ...; p999: number; }
/// ```
pub const DEFAULT_MAXIMUM_TRUNCATION_LENGTH: usize = 160;

/// Width budget used when the caller asked for no truncation.
///
/// Declaration emit must not abbreviate types, but a runaway expansion still
/// has to stop somewhere. Exceeding this budget under `NO_TRUNCATION` produces
/// a truncation report (TS7056) rather than silently shortened output.
///
/// # TypeScript example
///
/// ```typescript
/// // The inferred type of `huge` would print as millions of characters:
/// export const huge = makeDeeplyNestedRecord();
/// //           ~~~~ TS7056: The inferred type of this node exceeds the maximum length
/// //                the compiler will serialize.
/// ```
pub const NO_TRUNCATION_MAXIMUM_TRUNCATION_LENGTH: usize = 1_000_000;

/// Width added for an elided `...` placeholder.
pub const ELIDED_PLACEHOLDER_LENGTH: usize = 3;

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of times the same symbol (or the same deferred type node)
/// may be nested inside its own serialization.
///
/// Distinct instantiations of one generic shape get distinct type ids, so the
/// visited-type set alone cannot stop them. The builder counts nesting per
/// composite symbol identity instead and substitutes an elision placeholder
/// once the count passes this limit.
///
/// # TypeScript example
///
/// ```typescript
/// type Foo<T> = { value: Foo<Foo<T>> };
/// declare const f: Foo<string>;
/// // prints as { value: { value: { value: ... } } } cut after ten levels
/// ```
pub const MAX_SYMBOL_DEPTH: u32 = 10;
