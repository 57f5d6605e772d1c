use super::errors::ProtocolError;
use crate::assessment::Assessment;
use crate::types::{Document, TestResult, TestState};

/// Thread-safe sink assessments write their outcomes into
///
/// Every mutation implicitly starts the builder. Implementations must
/// serialize mutations internally; callers share one builder across all
/// concurrently running assessments of a run.
pub trait AssessmentResultBuilder: Send + Sync {
    /// Record the start time; later calls keep the first time
    fn start(&self);

    /// Close the run; fails when never started or already ended
    fn end(&self) -> Result<(), ProtocolError>;

    fn add_assessment_target(&self, document: &dyn Document);

    /// Append a result and escalate the requirement's state to `Tested`
    fn add_test_result(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        result: TestResult,
    );

    /// Escalate (never downgrade) the requirement's state
    fn assign_test_status(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        state: TestState,
    );

    fn assign_property(&self, key: &str, value: &str);
}
