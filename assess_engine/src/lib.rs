//! # Assessment Engine
//!
//! Runs pluggable assessments against a document, accumulates their test
//! results in a thread-safe builder and rolls them up into per-requirement
//! statuses.

#[macro_use]
pub mod logging;

pub mod api;
pub mod assessment;
pub mod builder;
pub mod execution;
pub mod notify;
pub mod requirements;
pub mod results;
pub mod types;

#[cfg(test)]
mod test_support;

// Convenience re-exports
pub use api::{ConfigError, DocumentAssessor, EngineConfig, EngineError};

pub mod prelude {
    pub use crate::api::{ConfigError, DocumentAssessor, EngineConfig, EngineError};

    pub use crate::assessment::{
        Assessment, AssessmentError, AssessmentId, AssessmentSequence, CheckError, Condition,
        ConditionalAssessment, ConfiguredAssessment, ResultDirectoryAssessment,
    };

    pub use crate::builder::{
        AssessmentResultBuilder, AssessmentSummary, DefaultAssessmentResultBuilder,
        ProtocolError, RequirementScope,
    };

    pub use crate::execution::{
        AssessmentExecutor, AssessmentExecutorFactory, ConcurrentAssessmentExecutor,
        SequentialAssessmentExecutor, TaskExecutor, WorkerPool,
    };

    pub use crate::notify::{
        AssessmentNotifier, EventLoggingHandler, HandlerNotifier, LoggingHandler,
        NoopAssessmentNotifier, NoopLoggingHandler,
    };

    pub use crate::requirements::{
        BaseRequirement, CatalogueError, DerivedRequirement, InMemoryRequirementsManager,
        RequirementType, RequirementsManager,
    };

    pub use crate::results::{AssessmentResults, HostContext};

    pub use crate::types::{
        ContextReference, Document, ResultStatus, SourceInfo, TestResult, TestState, TestStatus,
    };
}
