//! Per-assessment summarizing decorator

use super::errors::ProtocolError;
use super::traits::AssessmentResultBuilder;
use crate::assessment::Assessment;
use crate::types::{Document, TestResult, TestState, TestStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Tally of what one assessment reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub assessment: String,
    pub results_by_status: BTreeMap<TestStatus, usize>,
    pub states_assigned: BTreeMap<TestState, usize>,
    pub derived_requirements: BTreeSet<String>,
    pub properties_assigned: usize,
}

impl AssessmentSummary {
    pub fn new(assessment: impl Into<String>) -> Self {
        Self {
            assessment: assessment.into(),
            ..Default::default()
        }
    }

    pub fn count(&self, status: TestStatus) -> usize {
        self.results_by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn total_results(&self) -> usize {
        self.results_by_status.values().sum()
    }

    pub fn worst_status(&self) -> Option<TestStatus> {
        self.results_by_status.keys().max().copied()
    }
}

/// Delegates every call and tallies it into an `AssessmentSummary`
///
/// Lifecycle calls (`start`/`end`) pass straight through; the summary only
/// covers mutations.
pub struct SummarizingAssessmentResultBuilder<'a> {
    inner: &'a dyn AssessmentResultBuilder,
    summary: Mutex<AssessmentSummary>,
}

impl<'a> SummarizingAssessmentResultBuilder<'a> {
    pub fn new(inner: &'a dyn AssessmentResultBuilder, assessment: &dyn Assessment) -> Self {
        Self {
            inner,
            summary: Mutex::new(AssessmentSummary::new(assessment.name(true))),
        }
    }

    fn update(&self, f: impl FnOnce(&mut AssessmentSummary)) {
        let mut summary = self
            .summary
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut summary);
    }

    pub fn summary(&self) -> AssessmentSummary {
        self.summary
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn into_summary(self) -> AssessmentSummary {
        self.summary
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AssessmentResultBuilder for SummarizingAssessmentResultBuilder<'_> {
    fn start(&self) {
        self.inner.start();
    }

    fn end(&self) -> Result<(), ProtocolError> {
        self.inner.end()
    }

    fn add_assessment_target(&self, document: &dyn Document) {
        self.inner.add_assessment_target(document);
    }

    fn add_test_result(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        result: TestResult,
    ) {
        let status = result.status();
        self.inner
            .add_test_result(assessment, document, derived_requirement_id, result);
        self.update(|summary| {
            *summary.results_by_status.entry(status).or_insert(0) += 1;
            summary
                .derived_requirements
                .insert(derived_requirement_id.to_string());
        });
    }

    fn assign_test_status(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        derived_requirement_id: &str,
        state: TestState,
    ) {
        self.inner
            .assign_test_status(assessment, document, derived_requirement_id, state);
        self.update(|summary| {
            *summary.states_assigned.entry(state).or_insert(0) += 1;
            summary
                .derived_requirements
                .insert(derived_requirement_id.to_string());
        });
    }

    fn assign_property(&self, key: &str, value: &str) {
        self.inner.assign_property(key, value);
        self.update(|summary| summary.properties_assigned += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::AssessmentSequence;
    use crate::builder::DefaultAssessmentResultBuilder;
    use crate::test_support::{FnAssessment, TestDocument};
    use crate::types::ContextReference;

    #[test]
    fn test_summary_tallies_and_delegates() {
        let builder = DefaultAssessmentResultBuilder::new();
        let sequence = AssessmentSequence::new();
        let assessment = FnAssessment::noop(&sequence, "rules");
        let document = TestDocument::new("doc");
        let summarizing = SummarizingAssessmentResultBuilder::new(&builder, &assessment);

        summarizing.add_test_result(
            &assessment,
            &document,
            "DR-1",
            TestResult::new("t1", TestStatus::Fail, ContextReference::new("doc")),
        );
        summarizing.add_test_result(
            &assessment,
            &document,
            "DR-1",
            TestResult::new("t2", TestStatus::Pass, ContextReference::new("doc")),
        );
        summarizing.assign_test_status(&assessment, &document, "DR-2", TestState::NotApplicable);
        summarizing.assign_property("engine", "test");

        let summary = summarizing.into_summary();
        assert_eq!(summary.assessment, "rules#1");
        assert_eq!(summary.total_results(), 2);
        assert_eq!(summary.count(TestStatus::Fail), 1);
        assert_eq!(summary.worst_status(), Some(TestStatus::Fail));
        assert_eq!(summary.states_assigned.get(&TestState::NotApplicable), Some(&1));
        assert_eq!(summary.derived_requirements.len(), 2);
        assert_eq!(summary.properties_assigned, 1);

        assert_eq!(builder.recorded_state("DR-1"), Some(TestState::Tested));
        assert_eq!(builder.recorded_results("DR-1").len(), 2);
    }
}
