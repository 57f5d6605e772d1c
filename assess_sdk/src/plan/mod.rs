//! Assessment plans: which checks run, under which conditions, in which scope

pub mod errors;
pub mod model;

pub use errors::PlanError;
pub use model::{AssessmentPlan, ConditionSpec, PlannedAssessment};
