//! Default, lock-guarded result builder
//!
//! All mutable state lives behind one mutex per builder instance, so every
//! escalation is a single compare-and-raise under that lock. Observer
//! callbacks run after the lock is released.

use super::aggregation;
use super::errors::ProtocolError;
use super::scope::RequirementScope;
use super::traits::AssessmentResultBuilder;
use crate::assessment::Assessment;
use crate::logging::codes;
use crate::notify::{LoggingHandler, NoopLoggingHandler};
use crate::requirements::RequirementsManager;
use crate::results::{
    AssessmentResults, AssessmentSubject, BaseRequirementResult, DerivedRequirementResult,
    HostContext,
};
use crate::types::{Document, SourceInfo, TestResult, TestState};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unstarted,
    Started,
    Ended,
    Built,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Unstarted => "unstarted",
            Phase::Started => "started",
            Phase::Ended => "ended",
            Phase::Built => "built",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct DerivedRecord {
    state: TestState,
    results: Vec<TestResult>,
}

#[derive(Debug)]
struct BuilderState {
    phase: Phase,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    subjects: Vec<AssessmentSubject>,
    subject_index: HashMap<String, usize>,
    derived: HashMap<String, DerivedRecord>,
    properties: BTreeMap<String, String>,
}

impl BuilderState {
    fn new() -> Self {
        Self {
            phase: Phase::Unstarted,
            start: None,
            end: None,
            subjects: Vec::new(),
            subject_index: HashMap::new(),
            derived: HashMap::new(),
            properties: BTreeMap::new(),
        }
    }
}

/// Outcome of an implicit start, reported once the lock is released
#[derive(Clone, Copy, PartialEq, Eq)]
enum StartOutcome {
    AlreadyRunning,
    JustStarted,
    AfterEnd(Phase),
}

/// The builder every assessment of a run writes into
pub struct DefaultAssessmentResultBuilder {
    state: Mutex<BuilderState>,
    scope: RequirementScope,
    logging_handler: Arc<dyn LoggingHandler>,
    host: Option<HostContext>,
}

impl DefaultAssessmentResultBuilder {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BuilderState::new()),
            scope: RequirementScope::all(),
            logging_handler: Arc::new(NoopLoggingHandler),
            host: None,
        }
    }

    pub fn with_scope(mut self, scope: RequirementScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_logging_handler(mut self, handler: Arc<dyn LoggingHandler>) -> Self {
        self.logging_handler = handler;
        self
    }

    /// Fixed host context instead of detecting it at build time
    pub fn with_host(mut self, host: HostContext) -> Self {
        self.host = Some(host);
        self
    }

    pub fn scope(&self) -> &RequirementScope {
        &self.scope
    }

    fn lock(&self) -> MutexGuard<'_, BuilderState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_started(state: &mut BuilderState) -> StartOutcome {
        match state.phase {
            Phase::Unstarted => {
                state.phase = Phase::Started;
                state.start = Some(Utc::now());
                StartOutcome::JustStarted
            }
            Phase::Started => StartOutcome::AlreadyRunning,
            ended => StartOutcome::AfterEnd(ended),
        }
    }

    fn report_start(&self, outcome: StartOutcome, operation: &str) {
        match outcome {
            StartOutcome::JustStarted => self.logging_handler.validation_started(),
            StartOutcome::AfterEnd(phase) => {
                log_warning!(code = codes::builder::MUTATION_AFTER_END,
                    "Result builder mutated after end",
                    "operation" => operation,
                    "phase" => phase.as_str()
                );
            }
            StartOutcome::AlreadyRunning => {}
        }
    }

    /// Start time, if started
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.lock().start
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.lock().phase, Phase::Ended | Phase::Built)
    }

    /// Current state of a derived requirement, if it was ever mutated
    pub fn recorded_state(&self, derived_requirement_id: &str) -> Option<TestState> {
        self.lock()
            .derived
            .get(derived_requirement_id)
            .map(|record| record.state)
    }

    pub fn recorded_results(&self, derived_requirement_id: &str) -> Vec<TestResult> {
        self.lock()
            .derived
            .get(derived_requirement_id)
            .map(|record| record.results.clone())
            .unwrap_or_default()
    }

    pub fn subjects(&self) -> Vec<AssessmentSubject> {
        self.lock().subjects.clone()
    }

    /// Compute the immutable results; requires `end()` to have been called
    pub fn build(
        &self,
        requirements: &dyn RequirementsManager,
    ) -> Result<AssessmentResults, ProtocolError> {
        let snapshot = {
            let mut state = self.lock();
            match state.phase {
                Phase::Unstarted => {
                    return Err(ProtocolError::NotStarted { operation: "build" })
                }
                Phase::Started => return Err(ProtocolError::NotEnded),
                Phase::Built => return Err(ProtocolError::AlreadyBuilt),
                Phase::Ended => {}
            }
            state.phase = Phase::Built;
            Snapshot {
                start: state.start.unwrap_or_else(Utc::now),
                end: state.end.unwrap_or_else(Utc::now),
                subjects: state.subjects.clone(),
                derived: state.derived.clone(),
                properties: state.properties.clone(),
            }
        };

        self.logging_handler.producing_results();

        let results = self.aggregate(snapshot, requirements);

        self.logging_handler.completed_results(&results);
        log_success!(codes::success::RESULTS_PRODUCED, "Assessment results produced",
            "run_id" => &results.run_id,
            "status" => results.overall_status()
        );

        Ok(results)
    }

    fn aggregate(&self, snapshot: Snapshot, requirements: &dyn RequirementsManager) -> AssessmentResults {
        let mut known: HashSet<&str> = HashSet::new();
        let mut base_results = Vec::with_capacity(requirements.base_requirements().len());

        for base in requirements.base_requirements() {
            let base_in_scope = self.scope.includes_base(base);

            let derived_results: Vec<DerivedRequirementResult> = base
                .derived_requirements
                .iter()
                .map(|derived| {
                    known.insert(derived.id.as_str());
                    let record = snapshot.derived.get(&derived.id);
                    let state = record.map(|r| r.state).unwrap_or_default();
                    let results = record.map(|r| r.results.clone()).unwrap_or_default();
                    let status = aggregation::derived_status(
                        self.scope.includes_derived(base, derived),
                        derived,
                        state,
                        &results,
                    );

                    DerivedRequirementResult {
                        id: derived.id.clone(),
                        statement: derived.statement.clone(),
                        requirement_type: derived.requirement_type,
                        conditional: derived.conditional,
                        status,
                        test_state: state,
                        test_results: results,
                    }
                })
                .collect();

            let status =
                aggregation::base_status(base_in_scope, derived_results.iter().map(|d| d.status));

            base_results.push(BaseRequirementResult {
                id: base.id.clone(),
                statement: base.statement.clone(),
                status,
                derived_requirements: derived_results,
            });
        }

        for unknown in snapshot
            .derived
            .keys()
            .filter(|id| !known.contains(id.as_str()))
        {
            log_warning!(code = codes::builder::UNKNOWN_REQUIREMENT,
                "Outcome reported for a requirement missing from the catalogue",
                "requirement" => unknown
            );
        }

        AssessmentResults {
            run_id: uuid::Uuid::new_v4().to_string(),
            start: snapshot.start,
            end: snapshot.end,
            base_requirements: base_results,
            subjects: snapshot.subjects,
            properties: snapshot.properties,
            host: self.host.clone().unwrap_or_else(HostContext::from_system),
        }
    }
}

struct Snapshot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    subjects: Vec<AssessmentSubject>,
    derived: HashMap<String, DerivedRecord>,
    properties: BTreeMap<String, String>,
}

impl Default for DefaultAssessmentResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentResultBuilder for DefaultAssessmentResultBuilder {
    fn start(&self) {
        let outcome = Self::ensure_started(&mut self.lock());
        if outcome == StartOutcome::JustStarted {
            self.logging_handler.validation_started();
        }
    }

    fn end(&self) -> Result<(), ProtocolError> {
        {
            let mut state = self.lock();
            match state.phase {
                Phase::Unstarted => return Err(ProtocolError::NotStarted { operation: "end" }),
                Phase::Ended | Phase::Built => return Err(ProtocolError::AlreadyEnded),
                Phase::Started => {}
            }
            state.phase = Phase::Ended;
            state.end = Some(Utc::now());
        }

        self.logging_handler.validation_ended();
        Ok(())
    }

    fn add_assessment_target(&self, document: &dyn Document) {
        let system_id = document.system_id().to_string();
        let source_infos = document.source_infos();

        let (outcome, conflict) = {
            let mut state = self.lock();
            let outcome = Self::ensure_started(&mut state);
            let conflict = match state.subject_index.get(&system_id).copied() {
                Some(existing) => {
                    let registered = &state.subjects[existing].source_infos;
                    (*registered != source_infos).then(|| registered.clone())
                }
                None => {
                    let index = state.subjects.len();
                    state.subjects.push(AssessmentSubject {
                        system_id: system_id.clone(),
                        source_infos: source_infos.clone(),
                    });
                    state.subject_index.insert(system_id.clone(), index);
                    None
                }
            };
            (outcome, conflict)
        };

        self.report_start(outcome, "add_assessment_target");
        if let Some(registered) = conflict {
            self.logging_handler.duplicate_target(document, &registered);
        }
    }

    fn add_test_result(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        result: TestResult,
    ) {
        let outcome = {
            let mut state = self.lock();
            let outcome = Self::ensure_started(&mut state);
            let record = state
                .derived
                .entry(derived_requirement_id.to_string())
                .or_default();
            record.state = record.state.escalate(TestState::Tested);
            record.results.push(result.clone());
            outcome
        };

        self.report_start(outcome, "add_test_result");
        self.logging_handler
            .add_test_result(assessment, document, derived_requirement_id, &result);
    }

    fn assign_test_status(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        test_state: TestState,
    ) {
        let outcome = {
            let mut state = self.lock();
            let outcome = Self::ensure_started(&mut state);
            let record = state
                .derived
                .entry(derived_requirement_id.to_string())
                .or_default();
            record.state = record.state.escalate(test_state);
            outcome
        };

        self.report_start(outcome, "assign_test_status");
        self.logging_handler
            .assign_test_status(assessment, document, derived_requirement_id, test_state);
    }

    fn assign_property(&self, key: &str, value: &str) {
        let outcome = {
            let mut state = self.lock();
            let outcome = Self::ensure_started(&mut state);
            state.properties.insert(key.to_string(), value.to_string());
            outcome
        };

        self.report_start(outcome, "assign_property");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::AssessmentSequence;
    use crate::logging::{LoggingService, LogLevel, MemoryLogger};
    use crate::notify::EventLoggingHandler;
    use crate::requirements::{
        BaseRequirement, DerivedRequirement, InMemoryRequirementsManager, RequirementType,
    };
    use crate::test_support::{FnAssessment, RecordingHandler, TestDocument};
    use crate::types::{ContextReference, ResultStatus, TestStatus};
    use assert_matches::assert_matches;

    fn catalogue() -> InMemoryRequirementsManager {
        InMemoryRequirementsManager::new(vec![
            BaseRequirement::new("BR-1")
                .with_derived(DerivedRequirement::new("D1", RequirementType::Must))
                .with_derived(DerivedRequirement::new("D2", RequirementType::Must)),
            BaseRequirement::new("BR-2")
                .with_derived(DerivedRequirement::new("D3", RequirementType::Informational)),
            BaseRequirement::new("BR-3")
                .with_derived(DerivedRequirement::new("D4", RequirementType::Should)),
            BaseRequirement::new("BR-4"),
        ])
        .unwrap()
    }

    fn fail(test_id: &str) -> TestResult {
        TestResult::new(test_id, TestStatus::Fail, ContextReference::new("doc"))
    }

    #[test]
    fn test_fail_and_not_applicable_roll_up() {
        let builder = DefaultAssessmentResultBuilder::new();
        let sequence = AssessmentSequence::new();
        let a = FnAssessment::noop(&sequence, "a");
        let b = FnAssessment::noop(&sequence, "b");
        let document = TestDocument::new("doc");

        builder.add_test_result(&a, &document, "D1", fail("t1"));
        builder.assign_test_status(&b, &document, "D2", TestState::NotApplicable);
        builder.end().unwrap();
        let results = builder.build(&catalogue()).unwrap();

        assert_eq!(results.derived_requirement("D1").unwrap().status, ResultStatus::Fail);
        assert_eq!(
            results.derived_requirement("D2").unwrap().status,
            ResultStatus::NotApplicable
        );
        assert_eq!(results.base_requirement("BR-1").unwrap().status, ResultStatus::Fail);
    }

    #[test]
    fn test_tested_informational_without_results() {
        let builder = DefaultAssessmentResultBuilder::new();
        let sequence = AssessmentSequence::new();
        let a = FnAssessment::noop(&sequence, "a");

        builder.assign_test_status(&a, &TestDocument::new("doc"), "D3", TestState::Tested);
        builder.end().unwrap();
        let results = builder.build(&catalogue()).unwrap();

        assert_eq!(
            results.derived_requirement("D3").unwrap().status,
            ResultStatus::Informational
        );
    }

    #[test]
    fn test_untouched_requirements_default_to_not_tested() {
        let builder = DefaultAssessmentResultBuilder::new();
        builder.start();
        builder.end().unwrap();

        let results = builder.build(&catalogue()).unwrap();

        assert_eq!(results.derived_requirement("D4").unwrap().status, ResultStatus::NotTested);
        assert_eq!(results.base_requirement("BR-3").unwrap().status, ResultStatus::NotTested);
        assert_eq!(results.base_requirement("BR-4").unwrap().status, ResultStatus::NotTested);
    }

    #[test]
    fn test_state_escalation_is_order_independent() {
        let sequence = AssessmentSequence::new();
        let a = FnAssessment::noop(&sequence, "a");
        let document = TestDocument::new("doc");
        let orders = [
            [TestState::Tested, TestState::NotApplicable, TestState::NotTested],
            [TestState::NotTested, TestState::Tested, TestState::NotApplicable],
            [TestState::NotApplicable, TestState::NotTested, TestState::Tested],
        ];

        for order in orders {
            let builder = DefaultAssessmentResultBuilder::new();
            for state in order {
                builder.assign_test_status(&a, &document, "D4", state);
            }
            assert_eq!(builder.recorded_state("D4"), Some(TestState::Tested));
        }

        let builder = DefaultAssessmentResultBuilder::new();
        builder.assign_test_status(&a, &document, "D4", TestState::NotApplicable);
        builder.assign_test_status(&a, &document, "D4", TestState::NotTested);
        assert_eq!(builder.recorded_state("D4"), Some(TestState::NotApplicable));
    }

    #[test]
    fn test_out_of_scope_ignores_results() {
        let builder = DefaultAssessmentResultBuilder::new()
            .with_scope(RequirementScope::all().excluding("BR-1").excluding("D3"));
        let sequence = AssessmentSequence::new();
        let a = FnAssessment::noop(&sequence, "a");
        let document = TestDocument::new("doc");

        builder.add_test_result(&a, &document, "D1", fail("t1"));
        builder.add_test_result(&a, &document, "D3", fail("t2"));
        builder.end().unwrap();
        let results = builder.build(&catalogue()).unwrap();

        let br1 = results.base_requirement("BR-1").unwrap();
        assert_eq!(br1.status, ResultStatus::NotInScope);
        assert!(br1
            .derived_requirements
            .iter()
            .all(|d| d.status == ResultStatus::NotInScope));
        assert_eq!(results.derived_requirement("D3").unwrap().status, ResultStatus::NotInScope);
        assert_eq!(results.base_requirement("BR-2").unwrap().status, ResultStatus::NotInScope);
        assert_eq!(results.base_requirement("BR-3").unwrap().status, ResultStatus::NotTested);
    }

    #[test]
    fn test_lifecycle_protocol_errors() {
        let builder = DefaultAssessmentResultBuilder::new();
        assert_matches!(
            builder.build(&catalogue()),
            Err(ProtocolError::NotStarted { operation: "build" })
        );
        assert_matches!(builder.end(), Err(ProtocolError::NotStarted { operation: "end" }));

        builder.start();
        assert_matches!(builder.build(&catalogue()), Err(ProtocolError::NotEnded));

        builder.end().unwrap();
        assert_matches!(builder.end(), Err(ProtocolError::AlreadyEnded));

        assert!(builder.build(&catalogue()).is_ok());
        assert_matches!(builder.build(&catalogue()), Err(ProtocolError::AlreadyBuilt));
    }

    #[test]
    fn test_start_twice_keeps_first_timestamp() {
        let builder = DefaultAssessmentResultBuilder::new();
        builder.start();
        let first = builder.start_time().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        builder.start();
        builder.assign_property("k", "v");

        assert_eq!(builder.start_time(), Some(first));
    }

    #[test]
    fn test_duplicate_targets_tolerated() {
        let handler = Arc::new(RecordingHandler::default());
        let builder = DefaultAssessmentResultBuilder::new().with_logging_handler(handler.clone());

        builder.add_assessment_target(&TestDocument::new("doc"));
        builder.add_assessment_target(&TestDocument::new("doc"));
        builder.add_assessment_target(&TestDocument::with_sources(
            "doc",
            vec![SourceInfo::new("elsewhere")],
        ));

        let subjects = builder.subjects();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].source_infos, vec![SourceInfo::new("doc")]);
        let duplicates: Vec<String> = handler
            .events()
            .into_iter()
            .filter(|e| e.starts_with("duplicate_target"))
            .collect();
        assert_eq!(duplicates, vec!["duplicate_target:doc:doc"]);
    }

    #[test]
    fn test_conflicting_target_logged_with_code() {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        let builder = DefaultAssessmentResultBuilder::new()
            .with_logging_handler(Arc::new(EventLoggingHandler::with_service(service)));

        builder.add_assessment_target(&TestDocument::new("doc"));
        builder.add_assessment_target(&TestDocument::with_sources(
            "doc",
            vec![SourceInfo::new("elsewhere")],
        ));

        let warnings = memory.get_events_with_code(codes::builder::DUPLICATE_TARGET);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_warning());
    }

    #[test]
    fn test_properties_and_subjects_in_results() {
        let builder = DefaultAssessmentResultBuilder::new()
            .with_host(HostContext::new("h", "linux", "x86_64"));
        builder.add_assessment_target(&TestDocument::new("doc-a"));
        builder.add_assessment_target(&TestDocument::new("doc-b"));
        builder.assign_property("profile", "strict");
        builder.end().unwrap();

        let results = builder.build(&catalogue()).unwrap();

        assert_eq!(results.properties.get("profile").map(String::as_str), Some("strict"));
        assert_eq!(
            results.subjects.iter().map(|s| s.system_id.as_str()).collect::<Vec<_>>(),
            vec!["doc-a", "doc-b"]
        );
        assert_eq!(results.host.hostname, "h");
        assert!(results.start <= results.end);
    }

    #[test]
    fn test_lifecycle_notifications() {
        let handler = Arc::new(RecordingHandler::default());
        let builder = DefaultAssessmentResultBuilder::new().with_logging_handler(handler.clone());
        let sequence = AssessmentSequence::new();
        let a = FnAssessment::noop(&sequence, "a");

        builder.start();
        builder.assign_test_status(&a, &TestDocument::new("doc"), "D1", TestState::Tested);
        builder.end().unwrap();
        builder.build(&catalogue()).unwrap();

        assert_eq!(
            handler.events(),
            vec![
                "validation_started",
                "assign_test_status:D1:TESTED",
                "validation_ended",
                "producing_results",
                "completed_results",
            ]
        );
    }

    #[test]
    fn test_mutation_after_end_is_applied() {
        let builder = DefaultAssessmentResultBuilder::new();
        let sequence = AssessmentSequence::new();
        let a = FnAssessment::noop(&sequence, "a");
        builder.start();
        builder.end().unwrap();

        builder.add_test_result(&a, &TestDocument::new("doc"), "D1", fail("late"));

        assert!(builder.is_ended());
        assert_eq!(builder.recorded_results("D1").len(), 1);
    }

    #[test]
    fn test_concurrent_mutations_are_serialized() {
        let builder = Arc::new(DefaultAssessmentResultBuilder::new());
        let sequence = Arc::new(AssessmentSequence::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let builder = builder.clone();
                let sequence = sequence.clone();
                std::thread::spawn(move || {
                    let a = FnAssessment::noop(&sequence, "worker");
                    let document = TestDocument::new("doc");
                    for n in 0..50 {
                        let status = if (i + n) % 7 == 0 { TestStatus::Fail } else { TestStatus::Pass };
                        builder.add_test_result(
                            &a,
                            &document,
                            "D1",
                            TestResult::new(format!("t{}-{}", i, n), status, ContextReference::new("doc")),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        builder.end().unwrap();

        let results = builder.build(&catalogue()).unwrap();
        let d1 = results.derived_requirement("D1").unwrap();
        assert_eq!(d1.test_results.len(), 400);
        assert_eq!(d1.status, ResultStatus::Fail);
    }
}
