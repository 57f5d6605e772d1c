//! # Document Assessor
//!
//! One-call assessment of a document: executor, result builder and
//! requirement catalogue wired together from an [`EngineConfig`].

use super::config::EngineConfig;
use super::errors::EngineError;
use crate::assessment::ConfiguredAssessment;
use crate::builder::{AssessmentResultBuilder, DefaultAssessmentResultBuilder, ProtocolError, RequirementScope};
use crate::execution::AssessmentExecutorFactory;
use crate::logging::codes;
use crate::notify::{AssessmentNotifier, EventLoggingHandler, HandlerNotifier, LoggingHandler};
use crate::requirements::RequirementsManager;
use crate::results::{AssessmentResults, HostContext};
use crate::types::Document;
use std::sync::{Arc, Mutex};

pub struct DocumentAssessor {
    assessments: Vec<ConfiguredAssessment>,
    requirements: Arc<dyn RequirementsManager>,
    factory: Mutex<AssessmentExecutorFactory>,
    scope: RequirementScope,
    logging_handler: Arc<dyn LoggingHandler>,
    notifier: Option<Arc<dyn AssessmentNotifier>>,
    host: HostContext,
}

impl DocumentAssessor {
    pub fn new(
        config: EngineConfig,
        assessments: Vec<ConfiguredAssessment>,
        requirements: Arc<dyn RequirementsManager>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if assessments.is_empty() {
            return Err(ProtocolError::EmptyAssessmentList.into());
        }

        Ok(Self {
            assessments,
            requirements,
            factory: Mutex::new(AssessmentExecutorFactory::new(config)),
            scope: RequirementScope::all(),
            logging_handler: Arc::new(EventLoggingHandler::global()),
            notifier: None,
            host: HostContext::from_system(),
        })
    }

    pub fn with_scope(mut self, scope: RequirementScope) -> Self {
        self.scope = scope;
        self
    }

    /// Handler for builder events; also backs the default notifier
    pub fn with_logging_handler(mut self, handler: Arc<dyn LoggingHandler>) -> Self {
        self.logging_handler = handler;
        self
    }

    /// Replace the default notifier (the logging handler adapted as a notifier)
    pub fn with_notifier(mut self, notifier: Arc<dyn AssessmentNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_host(mut self, host: HostContext) -> Self {
        self.host = host;
        self
    }

    pub fn scope(&self) -> &RequirementScope {
        &self.scope
    }

    pub fn requirements(&self) -> &dyn RequirementsManager {
        self.requirements.as_ref()
    }

    fn notifier(&self, summarize: bool) -> Arc<dyn AssessmentNotifier> {
        match &self.notifier {
            Some(notifier) => notifier.clone(),
            None => Arc::new(
                HandlerNotifier::new(self.logging_handler.clone()).with_summaries(summarize),
            ),
        }
    }

    /// Run every configured assessment against `document` and build the results
    pub fn assess(&self, document: Arc<dyn Document>) -> Result<AssessmentResults, EngineError> {
        let (executor, concurrent) = {
            let mut factory = self
                .factory
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let summarize = factory.config().summarize;
            let concurrent = factory.config().concurrent;
            let executor = factory.create(self.assessments.clone(), self.notifier(summarize))?;
            (executor, concurrent)
        };

        let builder = Arc::new(
            DefaultAssessmentResultBuilder::new()
                .with_scope(self.scope.clone())
                .with_logging_handler(self.logging_handler.clone())
                .with_host(self.host.clone()),
        );
        builder.assign_property(
            "execution.mode",
            if concurrent { "concurrent" } else { "sequential" },
        );

        log_info!("Assessing document",
            "document" => document.system_id(),
            "assessments" => self.assessments.len()
        );

        executor.execute(document.clone(), builder.clone())?;
        builder.end()?;
        let results = builder.build(self.requirements.as_ref())?;

        log_success!(codes::success::EXECUTION_COMPLETED, "Document assessed",
            "document" => document.system_id(),
            "status" => results.overall_status()
        );

        Ok(results)
    }

    /// Stop the worker pool, if one was started
    pub fn shutdown(&self) {
        self.factory
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AssessmentError, AssessmentSequence, ConditionalAssessment};
    use crate::notify::NoopLoggingHandler;
    use crate::requirements::{BaseRequirement, DerivedRequirement, InMemoryRequirementsManager, RequirementType};
    use crate::test_support::{FnAssessment, RecordingHandler, RecordingNotifier, StaticCondition, TestDocument};
    use crate::types::{ContextReference, ResultStatus, TestResult, TestState, TestStatus};
    use assert_matches::assert_matches;

    fn catalogue() -> Arc<dyn RequirementsManager> {
        Arc::new(
            InMemoryRequirementsManager::new(vec![
                BaseRequirement::new("B1")
                    .with_derived(DerivedRequirement::new("D1", RequirementType::Must))
                    .with_derived(DerivedRequirement::new("D2", RequirementType::Must)),
                BaseRequirement::new("B2")
                    .with_derived(DerivedRequirement::new("D3", RequirementType::Informational)),
            ])
            .unwrap(),
        )
    }

    fn scenario_assessments(sequence: &AssessmentSequence) -> Vec<ConfiguredAssessment> {
        vec![
            ConfiguredAssessment::plain(FnAssessment::new(sequence, "a", |document, builder| {
                builder.add_test_result(
                    &FnAssessment::noop(&AssessmentSequence::new(), "a"),
                    document,
                    "D1",
                    TestResult::new("a", TestStatus::Fail, ContextReference::new(document.system_id())),
                );
                Ok(())
            })),
            ConfiguredAssessment::plain(FnAssessment::new(sequence, "b", |document, builder| {
                let reporter = FnAssessment::noop(&AssessmentSequence::new(), "b");
                builder.assign_test_status(&reporter, document, "D2", TestState::NotApplicable);
                builder.assign_test_status(&reporter, document, "D3", TestState::Tested);
                Ok(())
            })),
        ]
    }

    fn config(concurrent: bool) -> EngineConfig {
        EngineConfig::default()
            .with_concurrency(concurrent)
            .with_max_threads(2)
            .with_summaries(false)
            .with_strict_task_failures(false)
    }

    #[test]
    fn test_assess_aggregates_statuses() {
        for concurrent in [false, true] {
            let assessor = DocumentAssessor::new(
                config(concurrent),
                scenario_assessments(&AssessmentSequence::new()),
                catalogue(),
            )
            .unwrap()
            .with_logging_handler(Arc::new(NoopLoggingHandler))
            .with_host(HostContext::new("host", "linux", "x86_64"));

            let results = assessor.assess(Arc::new(TestDocument::new("doc"))).unwrap();

            assert_eq!(results.derived_requirement("D1").unwrap().status, ResultStatus::Fail);
            assert_eq!(
                results.derived_requirement("D2").unwrap().status,
                ResultStatus::NotApplicable
            );
            assert_eq!(
                results.derived_requirement("D3").unwrap().status,
                ResultStatus::Informational
            );
            assert_eq!(results.base_requirement("B1").unwrap().status, ResultStatus::Fail);
            assert_eq!(results.overall_status(), ResultStatus::Fail);
            assert_eq!(
                results.properties.get("execution.mode").map(String::as_str),
                Some(if concurrent { "concurrent" } else { "sequential" })
            );
            assessor.shutdown();
        }
    }

    #[test]
    fn test_scope_applied_to_each_run() {
        let assessor = DocumentAssessor::new(
            config(false),
            scenario_assessments(&AssessmentSequence::new()),
            catalogue(),
        )
        .unwrap()
        .with_logging_handler(Arc::new(NoopLoggingHandler))
        .with_scope(RequirementScope::all().excluding("D1"));

        let results = assessor.assess(Arc::new(TestDocument::new("doc"))).unwrap();

        assert_eq!(
            results.derived_requirement("D1").unwrap().status,
            ResultStatus::NotInScope
        );
        assert_eq!(
            results.base_requirement("B1").unwrap().status,
            ResultStatus::NotApplicable
        );
    }

    #[test]
    fn test_builder_events_reach_handler() {
        let handler = Arc::new(RecordingHandler::default());
        let assessor = DocumentAssessor::new(
            config(false),
            scenario_assessments(&AssessmentSequence::new()),
            catalogue(),
        )
        .unwrap()
        .with_logging_handler(handler.clone());

        assessor.assess(Arc::new(TestDocument::new("doc"))).unwrap();

        let events = handler.events();
        assert!(events.contains(&"execution_started:doc".to_string()));
        assert!(events.contains(&"assign_test_status:D2:NOT_APPLICABLE".to_string()));
        assert_eq!(events.last().map(String::as_str), Some("completed_results"));
    }

    #[test]
    fn test_custom_notifier_replaces_default() {
        let notifier = Arc::new(RecordingNotifier::with_summaries());
        let sequence = AssessmentSequence::new();
        let gated = ConditionalAssessment::new(
            &sequence,
            ConfiguredAssessment::plain(FnAssessment::noop(&sequence, "gated")),
            Arc::new(StaticCondition(true)),
        );
        let assessor = DocumentAssessor::new(config(false), vec![gated.into()], catalogue())
            .unwrap()
            .with_logging_handler(Arc::new(NoopLoggingHandler))
            .with_notifier(notifier.clone());

        assessor.assess(Arc::new(TestDocument::new("doc"))).unwrap();

        assert_eq!(notifier.count("assessment_completed"), 1);
        assert_eq!(notifier.summaries().len(), 1);
    }

    #[test]
    fn test_assessment_failure_surfaces_as_engine_error() {
        let sequence = AssessmentSequence::new();
        let failing = ConfiguredAssessment::plain(FnAssessment::new(&sequence, "strict", |_, _| {
            Err(AssessmentError::check_failed("strict#1", "schema mismatch").into())
        }));
        let assessor = DocumentAssessor::new(config(false), vec![failing], catalogue())
            .unwrap()
            .with_logging_handler(Arc::new(NoopLoggingHandler));

        assert_matches!(
            assessor.assess(Arc::new(TestDocument::new("doc"))),
            Err(EngineError::Assessment(AssessmentError::CheckFailed { .. }))
        );
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        assert_matches!(
            DocumentAssessor::new(config(false), Vec::new(), catalogue()).err(),
            Some(EngineError::Protocol(ProtocolError::EmptyAssessmentList))
        );
        assert_matches!(
            DocumentAssessor::new(
                config(false).with_max_threads(0),
                scenario_assessments(&AssessmentSequence::new()),
                catalogue(),
            )
            .err(),
            Some(EngineError::Config(_))
        );
    }
}
