//! Common types and utilities shared by the tsz declaration-synthesis crates.
//!
//! This crate provides:
//! - Synthesis limits and thresholds (truncation budgets, symbol depth)
//! - The catalog of synthesis failure events and their diagnostic messages

// Centralized limits and thresholds
pub mod limits;

// Diagnostic catalog for synthesis events
pub mod diagnostics;
pub use diagnostics::{DiagnosticCategory, DiagnosticMessage, format_message};
