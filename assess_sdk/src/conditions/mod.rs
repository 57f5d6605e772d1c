//! Conditions gating assessments on document content

pub mod json_pointer;

pub use json_pointer::JsonPointerCondition;
