//! Interned type model.
//!
//! Types are addressed by [`TypeId`] and owned by a shared [`TypeInterner`]:
//!
//! - **Interned shapes**: literals, unions, intersections, references and the
//!   other structural forms compare by id
//! - **Identity shapes**: object types, type parameters, conditional and
//!   mapped types are allocated fresh
//! - **Instantiation**: [`instantiate_type`] substitutes type arguments

mod instantiate;
mod intern;
pub mod type_queries;
pub mod types;
pub mod widening;

pub use instantiate::{
    MAX_INSTANTIATION_DEPTH, TypeSubstitution, instantiate_signature, instantiate_type,
};
pub use intern::TypeInterner;
pub use types::*;

/// Maximum length of a type parameter constraint chain that is followed.
pub const MAX_CONSTRAINT_DEPTH: u32 = 50;
