//! Assessments: the pluggable checks run against a document

pub mod conditional;
pub mod errors;
pub mod result_directory;
pub mod traits;

pub use conditional::{Condition, ConditionalAssessment, ConfiguredAssessment, ExecutableAssessment};
pub use errors::{AssessmentError, CheckError};
pub use result_directory::ResultDirectoryAssessment;
pub use traits::{Assessment, AssessmentId, AssessmentSequence};
