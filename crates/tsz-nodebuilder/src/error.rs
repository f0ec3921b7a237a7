use thiserror::Error;

/// Failure of a top-level synthesis request.
///
/// Structural limits and visibility problems are not errors: they degrade
/// the output and surface through the tracker.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeBuilderError {
    /// The type has no valid syntax under the requested flags (an empty
    /// union, an anonymous identifier, `this` inside an object literal, ...).
    #[error("type cannot be written as syntax under the requested flags")]
    EncounteredError,
    #[error("synthesis was cancelled")]
    Cancelled,
}
