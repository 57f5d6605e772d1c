//! # Assessment Results Module
//!
//! - [`AssessmentResults`] - immutable snapshot of one run
//! - [`BaseRequirementResult`] / [`DerivedRequirementResult`] - computed statuses
//! - [`HostContext`] - where the run executed

pub mod types;

pub use types::*;
