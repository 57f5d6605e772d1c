use super::helper;
use super::AssessmentExecutor;
use crate::assessment::{AssessmentError, ConfiguredAssessment};
use crate::builder::{AssessmentResultBuilder, ProtocolError};
use crate::notify::AssessmentNotifier;
use crate::types::Document;
use std::sync::Arc;

/// Runs the executable assessments one at a time on the calling thread
///
/// The first failure aborts the run; panics propagate to the caller.
pub struct SequentialAssessmentExecutor {
    assessments: Vec<ConfiguredAssessment>,
    notifier: Arc<dyn AssessmentNotifier>,
}

impl SequentialAssessmentExecutor {
    pub fn new(
        assessments: Vec<ConfiguredAssessment>,
        notifier: Arc<dyn AssessmentNotifier>,
    ) -> Result<Self, ProtocolError> {
        if assessments.is_empty() {
            return Err(ProtocolError::EmptyAssessmentList);
        }
        Ok(Self {
            assessments,
            notifier,
        })
    }
}

impl AssessmentExecutor for SequentialAssessmentExecutor {
    fn assessments(&self) -> &[ConfiguredAssessment] {
        &self.assessments
    }

    fn execute(
        &self,
        document: Arc<dyn Document>,
        builder: Arc<dyn AssessmentResultBuilder>,
    ) -> Result<(), AssessmentError> {
        let document = document.as_ref();
        let builder = builder.as_ref();

        builder.start();
        builder.add_assessment_target(document);
        self.notifier.execution_started(document);

        let executables = helper::get_executable_assessments(document, &self.assessments)?;
        for executable in &executables {
            helper::execute_assessment(executable, document, builder, self.notifier.as_ref())?;
        }

        self.notifier.execution_completed(document);
        Ok(())
    }
}
