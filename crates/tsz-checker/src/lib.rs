//! Type checker queries for tsz declaration synthesis.
//!
//! [`TypeChecker`] is the query surface the node builder and the pseudo
//! checker consume. [`Checker`] implements it over a bound program: a driver
//! (or a test fixture) may seed its tables with known answers, and anything
//! not seeded is typed from the source tree on demand and memoized.

pub mod error;
pub use error::CheckerError;

pub mod query;
pub use query::{GlobalTypes, SymbolAccessibility, SymbolAccessibilityResult, TypeChecker};

pub mod checker;
pub use checker::{Checker, CheckerOptions};

mod accessibility;
mod declared_types;
mod expressions;
mod type_nodes;

pub use declared_types::parse_numeric_literal;
