//! # Public API
//!
//! High-level entry points: configuration, the umbrella error type and the
//! [`DocumentAssessor`] facade.

pub mod assessor;
pub mod config;
pub mod errors;

pub use assessor::DocumentAssessor;
pub use config::EngineConfig;
pub use errors::{ConfigError, EngineError};
