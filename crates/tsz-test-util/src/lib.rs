//! Shared fixtures for tsz tests: a source tree builder, a bound program with
//! the lib globals declared, and tracing setup.

pub mod builder;
pub use builder::ProgramBuilder;

pub mod program;
pub use program::Program;

pub mod tracing_config;
pub use tracing_config::init_tracing;
