//! # Assessment SDK
//!
//! Reference collaborators for the assessment engine: a JSON document
//! adapter, JSON-pointer conditions, field-rule assessments and the TOML
//! plan that wires them together.

pub mod assessments;
pub mod conditions;
pub mod documents;
pub mod plan;

pub use assessments::{FieldRule, JsonFieldAssessment, RuleError};
pub use conditions::JsonPointerCondition;
pub use documents::{DocumentError, JsonDocument};
pub use plan::{AssessmentPlan, PlanError};

use assess_engine::assessment::{AssessmentSequence, ConfiguredAssessment};
use std::path::Path;

/// Load a plan file and instantiate its assessments
pub fn load_plan(
    path: impl AsRef<Path>,
    sequence: &AssessmentSequence,
) -> Result<(AssessmentPlan, Vec<ConfiguredAssessment>), PlanError> {
    let plan = AssessmentPlan::from_path(path)?;
    let assessments = plan.build(sequence)?;
    Ok((plan, assessments))
}
