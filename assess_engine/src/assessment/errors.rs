//! Assessment-kind errors
//!
//! Every failure that leaves an assessment reaches the executors as an
//! `AssessmentError`. Messages always name the assessment involved.

use std::path::PathBuf;

/// Error type returned by check logic; an `AssessmentError` inside passes through unchanged
pub type CheckError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Condition '{condition}' could not be evaluated: {reason}")]
    ConditionUnevaluable { condition: String, reason: String },

    #[error("Condition of assessment '{assessment}' failed: {source}")]
    ConditionFailed {
        assessment: String,
        #[source]
        source: Box<AssessmentError>,
    },

    #[error("Assessment '{assessment}' failed: {reason}")]
    CheckFailed { assessment: String, reason: String },

    #[error("Assessment '{assessment}' failed with an unexpected error: {source}")]
    ExecutionFailed {
        assessment: String,
        #[source]
        source: CheckError,
    },

    #[error("Assessment '{assessment}' could not create result directory '{}': {source}", .path.display())]
    ResultDirectory {
        assessment: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Assessment '{assessment}' panicked: {message}")]
    Panicked { assessment: String, message: String },

    #[error("Assessment task for '{assessment}' did not complete: {message}")]
    TaskFailed { assessment: String, message: String },

    #[error("Assessment execution interrupted: {reason}")]
    Interrupted { reason: String },
}

impl AssessmentError {
    /// Translate a check error, keeping an `AssessmentError` as-is
    pub fn from_check_error(assessment: &str, error: CheckError) -> Self {
        match error.downcast::<AssessmentError>() {
            Ok(assessment_error) => *assessment_error,
            Err(other) => AssessmentError::ExecutionFailed {
                assessment: assessment.to_string(),
                source: other,
            },
        }
    }

    pub fn check_failed(assessment: &str, reason: impl Into<String>) -> Self {
        AssessmentError::CheckFailed {
            assessment: assessment.to_string(),
            reason: reason.into(),
        }
    }

    pub fn condition_unevaluable(condition: &str, reason: impl Into<String>) -> Self {
        AssessmentError::ConditionUnevaluable {
            condition: condition.to_string(),
            reason: reason.into(),
        }
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
