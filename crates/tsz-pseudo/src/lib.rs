//! Syntax-only type approximation.
//!
//! [`PseudoChecker`] produces [`PseudoType`]s straight from the source tree,
//! without asking the type checker. Declaration emit uses it first and falls
//! back to full inference only where the result is [`PseudoType::Inferred`]
//! or [`PseudoType::NoResult`].

pub mod pseudo_type;
pub use pseudo_type::{
    PseudoObjectElement, PseudoObjectElementKind, PseudoParameter, PseudoSignature, PseudoType,
};

pub mod pseudo_checker;
pub use pseudo_checker::PseudoChecker;
