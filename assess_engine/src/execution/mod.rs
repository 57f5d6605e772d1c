//! Executors that run configured assessments against one document

pub mod concurrent;
pub mod factory;
pub mod helper;
pub mod pool;
pub mod sequential;

pub use concurrent::ConcurrentAssessmentExecutor;
pub use factory::AssessmentExecutorFactory;
pub use helper::{execute_assessment, get_executable_assessments};
pub use pool::{CancellationToken, Job, TaskExecutor, WorkerPool};
pub use sequential::SequentialAssessmentExecutor;

use crate::assessment::{AssessmentError, ConfiguredAssessment};
use crate::builder::AssessmentResultBuilder;
use crate::types::Document;
use std::sync::Arc;

/// Runs a fixed list of configured assessments against a document
///
/// `execute` starts the builder, registers the document as a target, resolves
/// the executable set and runs it. The builder is left started; ending it is
/// the caller's job.
pub trait AssessmentExecutor: Send + Sync {
    fn assessments(&self) -> &[ConfiguredAssessment];

    fn execute(
        &self,
        document: Arc<dyn Document>,
        builder: Arc<dyn AssessmentResultBuilder>,
    ) -> Result<(), AssessmentError>;
}
