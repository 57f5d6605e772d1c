//! Shared test doubles for the engine's unit tests

use crate::assessment::{
    Assessment, AssessmentError, AssessmentId, AssessmentSequence, CheckError, Condition,
};
use crate::builder::{AssessmentResultBuilder, AssessmentSummary};
use crate::notify::{AssessmentNotifier, LoggingHandler};
use crate::results::AssessmentResults;
use crate::types::{Document, SourceInfo, TestResult, TestState};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct TestDocument {
    system_id: String,
    sources: Vec<SourceInfo>,
}

impl TestDocument {
    pub fn new(system_id: &str) -> Self {
        Self::with_sources(system_id, vec![SourceInfo::new(system_id)])
    }

    pub fn with_sources(system_id: &str, sources: Vec<SourceInfo>) -> Self {
        Self {
            system_id: system_id.to_string(),
            sources,
        }
    }
}

impl Document for TestDocument {
    fn system_id(&self) -> &str {
        &self.system_id
    }

    fn source_infos(&self) -> Vec<SourceInfo> {
        self.sources.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

type CheckFn =
    dyn Fn(&dyn Document, &dyn AssessmentResultBuilder) -> Result<(), CheckError> + Send + Sync;

/// Assessment whose check logic is a closure; counts invocations
pub struct FnAssessment {
    id: AssessmentId,
    kind: String,
    check: Box<CheckFn>,
    calls: AtomicUsize,
}

impl FnAssessment {
    pub fn new<F>(sequence: &AssessmentSequence, kind: &str, check: F) -> Self
    where
        F: Fn(&dyn Document, &dyn AssessmentResultBuilder) -> Result<(), CheckError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            id: sequence.next_id(),
            kind: kind.to_string(),
            check: Box::new(check),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn noop(sequence: &AssessmentSequence, kind: &str) -> Self {
        Self::new(sequence, kind, |_, _| Ok(()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Assessment for FnAssessment {
    fn id(&self) -> AssessmentId {
        self.id
    }

    fn assessment_type(&self) -> &str {
        &self.kind
    }

    fn execute(
        &self,
        document: &dyn Document,
        builder: &dyn AssessmentResultBuilder,
    ) -> Result<(), CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.check)(document, builder)
    }
}

pub struct StaticCondition(pub bool);

impl Condition for StaticCondition {
    fn applies_to(&self, _document: &dyn Document) -> Result<bool, AssessmentError> {
        Ok(self.0)
    }

    fn describe(&self) -> String {
        format!("always {}", self.0)
    }
}

pub struct FailingCondition;

impl Condition for FailingCondition {
    fn applies_to(&self, _document: &dyn Document) -> Result<bool, AssessmentError> {
        Err(AssessmentError::condition_unevaluable(
            &self.describe(),
            "cannot evaluate",
        ))
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<String>>,
}

impl RecordingHandler {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl LoggingHandler for RecordingHandler {
    fn validation_started(&self) {
        self.push("validation_started".to_string());
    }

    fn validation_ended(&self) {
        self.push("validation_ended".to_string());
    }

    fn producing_results(&self) {
        self.push("producing_results".to_string());
    }

    fn completed_results(&self, _results: &AssessmentResults) {
        self.push("completed_results".to_string());
    }

    fn add_test_result(
        &self,
        _assessment: &dyn Assessment,
        _document: &dyn Document,
        derived_requirement_id: &str,
        result: &TestResult,
    ) {
        self.push(format!("add_test_result:{}:{}", derived_requirement_id, result.status()));
    }

    fn assign_test_status(
        &self,
        _assessment: &dyn Assessment,
        _document: &dyn Document,
        derived_requirement_id: &str,
        state: TestState,
    ) {
        self.push(format!("assign_test_status:{}:{}", derived_requirement_id, state));
    }

    fn duplicate_target(&self, document: &dyn Document, registered: &[SourceInfo]) {
        let registered: Vec<&str> = registered.iter().map(|s| s.system_id.as_str()).collect();
        self.push(format!("duplicate_target:{}:{}", document.system_id(), registered.join(",")));
    }

    fn execution_started(&self, document: &dyn Document) {
        self.push(format!("execution_started:{}", document.system_id()));
    }

    fn execution_completed(&self, document: &dyn Document) {
        self.push(format!("execution_completed:{}", document.system_id()));
    }

    fn assessment_started(&self, assessment: &dyn Assessment, _document: &dyn Document) {
        self.push(format!("assessment_started:{}", assessment.name(true)));
    }

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        _document: &dyn Document,
        _summary: Option<&AssessmentSummary>,
    ) {
        self.push(format!("assessment_completed:{}", assessment.name(true)));
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        _document: &dyn Document,
        _error: &AssessmentError,
    ) {
        self.push(format!("assessment_error:{}", assessment.name(true)));
    }
}

/// Records notifications, optionally asking for summaries
#[derive(Default)]
pub struct RecordingNotifier {
    summarize: bool,
    events: Mutex<Vec<String>>,
    summaries: Mutex<Vec<AssessmentSummary>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn with_summaries() -> Self {
        Self {
            summarize: true,
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<AssessmentSummary> {
        self.summaries.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

impl AssessmentNotifier for RecordingNotifier {
    fn wants_summary(&self) -> bool {
        self.summarize
    }

    fn execution_started(&self, document: &dyn Document) {
        self.events
            .lock()
            .unwrap()
            .push(format!("execution_started:{}", document.system_id()));
    }

    fn execution_completed(&self, document: &dyn Document) {
        self.events
            .lock()
            .unwrap()
            .push(format!("execution_completed:{}", document.system_id()));
    }

    fn assessment_started(&self, assessment: &dyn Assessment, _document: &dyn Document) {
        self.events
            .lock()
            .unwrap()
            .push(format!("assessment_started:{}", assessment.name(true)));
    }

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        _document: &dyn Document,
        summary: Option<&AssessmentSummary>,
    ) {
        self.events
            .lock()
            .unwrap()
            .push(format!("assessment_completed:{}", assessment.name(true)));
        if let Some(summary) = summary {
            self.summaries.lock().unwrap().push(summary.clone());
        }
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        _document: &dyn Document,
        error: &AssessmentError,
    ) {
        self.events
            .lock()
            .unwrap()
            .push(format!("assessment_error:{}", assessment.name(true)));
        self.errors.lock().unwrap().push(error.to_string());
    }
}
