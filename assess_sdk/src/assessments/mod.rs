//! Reference assessments over JSON documents

pub mod errors;
pub mod json_field;

pub use errors::RuleError;
pub use json_field::{CheckKind, FailureSeverity, FieldRule, JsonFieldAssessment};
