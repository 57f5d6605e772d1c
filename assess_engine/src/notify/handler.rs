//! Logging handlers: side-effect-only observers of builder and executor events

use crate::assessment::{Assessment, AssessmentError};
use crate::builder::AssessmentSummary;
use crate::logging::{codes, LogEvent, LoggingService};
use crate::results::AssessmentResults;
use crate::types::{Document, SourceInfo, TestResult, TestState};
use std::sync::Arc;

/// Observer of builder lifecycle, per-result and execution events
///
/// Every callback defaults to a no-op.
#[allow(unused_variables)]
pub trait LoggingHandler: Send + Sync {
    fn validation_started(&self) {}

    fn validation_ended(&self) {}

    fn producing_results(&self) {}

    fn completed_results(&self, results: &AssessmentResults) {}

    fn add_test_result(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        result: &TestResult,
    ) {
    }

    fn assign_test_status(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        state: TestState,
    ) {
    }

    /// `document` reuses a registered system id with different sources
    fn duplicate_target(&self, document: &dyn Document, registered: &[SourceInfo]) {}

    fn execution_started(&self, document: &dyn Document) {}

    fn execution_completed(&self, document: &dyn Document) {}

    fn assessment_started(&self, assessment: &dyn Assessment, document: &dyn Document) {}

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        summary: Option<&AssessmentSummary>,
    ) {
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        error: &AssessmentError,
    ) {
    }
}

/// Does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoggingHandler;

impl LoggingHandler for NoopLoggingHandler {}

/// Writes events to a logging service (the global one unless given)
#[derive(Default)]
pub struct EventLoggingHandler {
    service: Option<Arc<LoggingService>>,
}

impl EventLoggingHandler {
    /// Log through the global service, if installed
    pub fn global() -> Self {
        Self { service: None }
    }

    pub fn with_service(service: Arc<LoggingService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    fn log(&self, event: LogEvent) {
        match &self.service {
            Some(service) => service.log_event(event),
            None => {
                if let Some(service) = crate::logging::try_get_global_logger() {
                    service.log_event(event);
                }
            }
        }
    }
}

impl LoggingHandler for EventLoggingHandler {
    fn validation_started(&self) {
        self.log(LogEvent::debug("Validation started"));
    }

    fn validation_ended(&self) {
        self.log(LogEvent::debug("Validation ended"));
    }

    fn producing_results(&self) {
        self.log(LogEvent::info("Producing assessment results"));
    }

    fn completed_results(&self, results: &AssessmentResults) {
        self.log(
            LogEvent::success(codes::success::RESULTS_PRODUCED, "Assessment results produced")
                .with_context("run_id", &results.run_id)
                .with_context("status", results.overall_status().as_str())
                .with_context("duration_ms", &results.duration_ms().to_string()),
        );
    }

    fn add_test_result(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        result: &TestResult,
    ) {
        self.log(
            LogEvent::debug("Test result recorded")
                .with_context("assessment", &assessment.name(true))
                .with_context("document", document.system_id())
                .with_context("requirement", derived_requirement_id)
                .with_context("status", result.status().as_str()),
        );
    }

    fn assign_test_status(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        state: TestState,
    ) {
        self.log(
            LogEvent::debug("Test state assigned")
                .with_context("assessment", &assessment.name(true))
                .with_context("document", document.system_id())
                .with_context("requirement", derived_requirement_id)
                .with_context("state", state.as_str()),
        );
    }

    fn duplicate_target(&self, document: &dyn Document, registered: &[SourceInfo]) {
        self.log(
            LogEvent::warning_with_code(
                codes::builder::DUPLICATE_TARGET,
                "Assessment target already registered with different sources",
            )
            .with_context("system_id", document.system_id())
            .with_context("registered", &describe_sources(registered))
            .with_context("sources", &describe_sources(&document.source_infos())),
        );
    }

    fn execution_started(&self, document: &dyn Document) {
        self.log(LogEvent::info("Execution started").with_context("document", document.system_id()));
    }

    fn execution_completed(&self, document: &dyn Document) {
        self.log(
            LogEvent::success(codes::success::EXECUTION_COMPLETED, "Execution completed")
                .with_context("document", document.system_id()),
        );
    }

    fn assessment_started(&self, assessment: &dyn Assessment, document: &dyn Document) {
        self.log(
            LogEvent::debug("Assessment started")
                .with_context("assessment", &assessment.name(true))
                .with_context("document", document.system_id()),
        );
    }

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        summary: Option<&AssessmentSummary>,
    ) {
        let mut event =
            LogEvent::success(codes::success::ASSESSMENT_COMPLETED, "Assessment completed")
                .with_context("assessment", &assessment.name(true))
                .with_context("document", document.system_id());
        if let Some(summary) = summary {
            event = event
                .with_context("results", &summary.total_results().to_string())
                .with_context("failures", &summary.count(crate::types::TestStatus::Fail).to_string());
        }
        self.log(event);
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        error: &AssessmentError,
    ) {
        let code = match error {
            AssessmentError::Panicked { .. } => codes::execution::ASSESSMENT_PANICKED,
            AssessmentError::ConditionFailed { .. } => codes::execution::CONDITION_FAILED,
            AssessmentError::ResultDirectory { .. } => codes::execution::RESULT_DIRECTORY_FAILED,
            _ => codes::execution::ASSESSMENT_FAILED,
        };
        self.log(
            LogEvent::error(code, &error.to_string())
                .with_context("assessment", &assessment.name(true))
                .with_context("document", document.system_id()),
        );
    }
}

/// Forwards every event to each handler in order
#[derive(Default)]
pub struct LoggingHandlerChain {
    handlers: Vec<Arc<dyn LoggingHandler>>,
}

impl LoggingHandlerChain {
    pub fn new(handlers: Vec<Arc<dyn LoggingHandler>>) -> Self {
        Self { handlers }
    }

    pub fn with_handler(mut self, handler: Arc<dyn LoggingHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl LoggingHandler for LoggingHandlerChain {
    fn validation_started(&self) {
        self.handlers.iter().for_each(|h| h.validation_started());
    }

    fn validation_ended(&self) {
        self.handlers.iter().for_each(|h| h.validation_ended());
    }

    fn producing_results(&self) {
        self.handlers.iter().for_each(|h| h.producing_results());
    }

    fn completed_results(&self, results: &AssessmentResults) {
        self.handlers.iter().for_each(|h| h.completed_results(results));
    }

    fn add_test_result(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        result: &TestResult,
    ) {
        for handler in &self.handlers {
            handler.add_test_result(assessment, document, derived_requirement_id, result);
        }
    }

    fn assign_test_status(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        state: TestState,
    ) {
        for handler in &self.handlers {
            handler.assign_test_status(assessment, document, derived_requirement_id, state);
        }
    }

    fn duplicate_target(&self, document: &dyn Document, registered: &[SourceInfo]) {
        for handler in &self.handlers {
            handler.duplicate_target(document, registered);
        }
    }

    fn execution_started(&self, document: &dyn Document) {
        self.handlers.iter().for_each(|h| h.execution_started(document));
    }

    fn execution_completed(&self, document: &dyn Document) {
        self.handlers.iter().for_each(|h| h.execution_completed(document));
    }

    fn assessment_started(&self, assessment: &dyn Assessment, document: &dyn Document) {
        for handler in &self.handlers {
            handler.assessment_started(assessment, document);
        }
    }

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        summary: Option<&AssessmentSummary>,
    ) {
        for handler in &self.handlers {
            handler.assessment_completed(assessment, document, summary);
        }
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        error: &AssessmentError,
    ) {
        for handler in &self.handlers {
            handler.assessment_error(assessment, document, error);
        }
    }
}

fn describe_sources(sources: &[SourceInfo]) -> String {
    sources
        .iter()
        .map(|s| s.system_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
