//! Executor-facing notifiers

use super::handler::LoggingHandler;
use crate::assessment::{Assessment, AssessmentError};
use crate::builder::AssessmentSummary;
use crate::types::Document;
use std::sync::Arc;

/// Progress observer called by executors and the execution helper
#[allow(unused_variables)]
pub trait AssessmentNotifier: Send + Sync {
    /// Whether `assessment_completed` should receive a per-assessment summary
    fn wants_summary(&self) -> bool {
        false
    }

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

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAssessmentNotifier;

impl AssessmentNotifier for NoopAssessmentNotifier {}

/// Adapts a `LoggingHandler` to the notifier interface
pub struct HandlerNotifier {
    handler: Arc<dyn LoggingHandler>,
    summarize: bool,
}

impl HandlerNotifier {
    pub fn new(handler: Arc<dyn LoggingHandler>) -> Self {
        Self {
            handler,
            summarize: false,
        }
    }

    pub fn with_summaries(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }
}

impl AssessmentNotifier for HandlerNotifier {
    fn wants_summary(&self) -> bool {
        self.summarize
    }

    fn execution_started(&self, document: &dyn Document) {
        self.handler.execution_started(document);
    }

    fn execution_completed(&self, document: &dyn Document) {
        self.handler.execution_completed(document);
    }

    fn assessment_started(&self, assessment: &dyn Assessment, document: &dyn Document) {
        self.handler.assessment_started(assessment, document);
    }

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        summary: Option<&AssessmentSummary>,
    ) {
        self.handler.assessment_completed(assessment, document, summary);
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        error: &AssessmentError,
    ) {
        self.handler.assessment_error(assessment, document, error);
    }
}

/// Notifies every member; a summary is produced if any member asks for one
#[derive(Default)]
pub struct NotifierChain {
    notifiers: Vec<Arc<dyn AssessmentNotifier>>,
}

impl NotifierChain {
    pub fn new(notifiers: Vec<Arc<dyn AssessmentNotifier>>) -> Self {
        Self { notifiers }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn AssessmentNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }
}

impl AssessmentNotifier for NotifierChain {
    fn wants_summary(&self) -> bool {
        self.notifiers.iter().any(|n| n.wants_summary())
    }

    fn execution_started(&self, document: &dyn Document) {
        self.notifiers.iter().for_each(|n| n.execution_started(document));
    }

    fn execution_completed(&self, document: &dyn Document) {
        self.notifiers.iter().for_each(|n| n.execution_completed(document));
    }

    fn assessment_started(&self, assessment: &dyn Assessment, document: &dyn Document) {
        for notifier in &self.notifiers {
            notifier.assessment_started(assessment, document);
        }
    }

    fn assessment_completed(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        summary: Option<&AssessmentSummary>,
    ) {
        for notifier in &self.notifiers {
            notifier.assessment_completed(assessment, document, summary);
        }
    }

    fn assessment_error(
        &self,
        assessment: &dyn Assessment,
        document: &dyn Document,
        error: &AssessmentError,
    ) {
        for notifier in &self.notifiers {
            notifier.assessment_error(assessment, document, error);
        }
    }
}
