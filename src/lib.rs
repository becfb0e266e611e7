//! Automated test generation driven by an external code-generation CLI.
//!
//! The [`contexts::TestGenerator`] discovers Python sources, asks a
//! [`data::GenerationTool`] for tests and writes `test_<name>.py` siblings.
//! [`contexts::analyze_coverage`] is an independent read-only pass.

pub mod config;
pub mod contexts;
pub mod data;
pub mod error;
pub mod tools;

pub use error::GenerationError;
