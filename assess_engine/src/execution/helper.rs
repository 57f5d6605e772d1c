//! Routines shared by both executor variants

use crate::assessment::errors::panic_message;
use crate::assessment::{AssessmentError, ConfiguredAssessment, ExecutableAssessment};
use crate::builder::{AssessmentResultBuilder, SummarizingAssessmentResultBuilder};
use crate::logging::{codes, with_assessment_context};
use crate::notify::AssessmentNotifier;
use crate::types::Document;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

/// Flatten every configured assessment into the ordered executable set
pub fn get_executable_assessments(
    document: &dyn Document,
    assessments: &[ConfiguredAssessment],
) -> Result<Vec<ExecutableAssessment>, AssessmentError> {
    let mut executables = Vec::with_capacity(assessments.len());
    for assessment in assessments {
        let resolved = assessment.executable_assessments(document).map_err(|e| {
            log_error!(codes::execution::CONDITION_FAILED, "Cannot resolve assessment",
                "assessment" => assessment.name(true),
                "document" => document.system_id(),
                "error" => &e
            );
            e
        })?;
        executables.extend(resolved);
    }
    Ok(executables)
}

/// Run one assessment with notification and error translation
///
/// Check errors come back as `AssessmentError` (an `AssessmentError` raised by
/// the check is passed through unchanged). A panic is reported to the
/// notifier as `AssessmentError::Panicked` and then resumed.
pub fn execute_assessment(
    assessment: &ExecutableAssessment,
    document: &dyn Document,
    builder: &dyn AssessmentResultBuilder,
    notifier: &dyn AssessmentNotifier,
) -> Result<(), AssessmentError> {
    let check = assessment.assessment();
    let name = assessment.name();

    with_assessment_context(document.system_id(), &name, || {
        notifier.assessment_started(check, document);

        let summarizing = notifier
            .wants_summary()
            .then(|| SummarizingAssessmentResultBuilder::new(builder, check));
        let target: &dyn AssessmentResultBuilder = match &summarizing {
            Some(summarizing) => summarizing,
            None => builder,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| check.execute(document, target)));

        match outcome {
            Ok(Ok(())) => {
                let summary = summarizing.map(|s| s.into_summary());
                notifier.assessment_completed(check, document, summary.as_ref());
                log_debug!("Assessment completed");
                Ok(())
            }
            Ok(Err(check_error)) => {
                let error = AssessmentError::from_check_error(&name, check_error);
                log_error!(codes::execution::ASSESSMENT_FAILED, "Assessment failed",
                    "error" => &error
                );
                notifier.assessment_error(check, document, &error);
                Err(error)
            }
            Err(payload) => {
                let error = AssessmentError::Panicked {
                    assessment: name.clone(),
                    message: panic_message(payload.as_ref()),
                };
                log_error!(codes::execution::ASSESSMENT_PANICKED, "Assessment panicked",
                    "error" => &error
                );
                notifier.assessment_error(check, document, &error);
                resume_unwind(payload)
            }
        }
    })
}
