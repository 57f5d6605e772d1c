//! Conditional gating and resolution of configured assessments
//!
//! A configured assessment is either plain or conditional. Only the resolver
//! (`ConfiguredAssessment::executable_assessments`) can produce an
//! `ExecutableAssessment`, so a conditional wrapper can never be executed
//! directly.

use super::errors::AssessmentError;
use super::traits::{Assessment, AssessmentId, AssessmentSequence};
use crate::types::Document;
use std::fmt;
use std::sync::Arc;

/// Predicate over a document gating a conditional assessment
pub trait Condition: Send + Sync {
    fn applies_to(&self, document: &dyn Document) -> Result<bool, AssessmentError>;

    /// Human-readable form used in logs and errors
    fn describe(&self) -> String;
}

/// An assessment that only runs when its condition holds for the document
pub struct ConditionalAssessment {
    id: AssessmentId,
    delegate: Box<ConfiguredAssessment>,
    condition: Arc<dyn Condition>,
}

impl ConditionalAssessment {
    pub fn new(
        sequence: &AssessmentSequence,
        delegate: ConfiguredAssessment,
        condition: Arc<dyn Condition>,
    ) -> Self {
        Self {
            id: sequence.next_id(),
            delegate: Box::new(delegate),
            condition,
        }
    }

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn assessment_type(&self) -> &str {
        "conditional"
    }

    pub fn name(&self, include_id: bool) -> String {
        if include_id {
            format!("{}{}", self.assessment_type(), self.id)
        } else {
            self.assessment_type().to_string()
        }
    }

    pub fn delegate(&self) -> &ConfiguredAssessment {
        &self.delegate
    }

    pub fn condition(&self) -> &dyn Condition {
        self.condition.as_ref()
    }

    /// `[delegate...]` when the condition holds, otherwise empty
    pub fn executable_assessments(
        &self,
        document: &dyn Document,
    ) -> Result<Vec<ExecutableAssessment>, AssessmentError> {
        let applies = self
            .condition
            .applies_to(document)
            .map_err(|source| AssessmentError::ConditionFailed {
                assessment: self.name(true),
                source: Box::new(source),
            })?;

        if applies {
            self.delegate.executable_assessments(document)
        } else {
            log_debug!("Condition not met, skipping delegate",
                "assessment" => self.name(true),
                "condition" => self.condition.describe(),
                "document" => document.system_id()
            );
            Ok(Vec::new())
        }
    }
}

impl fmt::Debug for ConditionalAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalAssessment")
            .field("id", &self.id)
            .field("condition", &self.condition.describe())
            .field("delegate", &self.delegate)
            .finish()
    }
}

/// An assessment as configured by the caller
#[derive(Clone)]
pub enum ConfiguredAssessment {
    Plain(Arc<dyn Assessment>),
    Conditional(Arc<ConditionalAssessment>),
}

impl ConfiguredAssessment {
    pub fn plain<A: Assessment + 'static>(assessment: A) -> Self {
        ConfiguredAssessment::Plain(Arc::new(assessment))
    }

    pub fn conditional(assessment: ConditionalAssessment) -> Self {
        ConfiguredAssessment::Conditional(Arc::new(assessment))
    }

    pub fn id(&self) -> AssessmentId {
        match self {
            ConfiguredAssessment::Plain(assessment) => assessment.id(),
            ConfiguredAssessment::Conditional(conditional) => conditional.id(),
        }
    }

    pub fn name(&self, include_id: bool) -> String {
        match self {
            ConfiguredAssessment::Plain(assessment) => assessment.name(include_id),
            ConfiguredAssessment::Conditional(conditional) => conditional.name(include_id),
        }
    }

    /// Resolve into the assessments that actually run against `document`
    ///
    /// Has no side effects on any result builder.
    pub fn executable_assessments(
        &self,
        document: &dyn Document,
    ) -> Result<Vec<ExecutableAssessment>, AssessmentError> {
        match self {
            ConfiguredAssessment::Plain(assessment) => {
                Ok(vec![ExecutableAssessment::new(assessment.clone())])
            }
            ConfiguredAssessment::Conditional(conditional) => {
                conditional.executable_assessments(document)
            }
        }
    }
}

impl From<Arc<dyn Assessment>> for ConfiguredAssessment {
    fn from(assessment: Arc<dyn Assessment>) -> Self {
        ConfiguredAssessment::Plain(assessment)
    }
}

impl From<ConditionalAssessment> for ConfiguredAssessment {
    fn from(assessment: ConditionalAssessment) -> Self {
        ConfiguredAssessment::conditional(assessment)
    }
}

impl fmt::Debug for ConfiguredAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfiguredAssessment::Plain(assessment) => {
                f.debug_tuple("Plain").field(&assessment.name(true)).finish()
            }
            ConfiguredAssessment::Conditional(conditional) => {
                f.debug_tuple("Conditional").field(conditional).finish()
            }
        }
    }
}

/// A resolved assessment, ready to run
#[derive(Clone)]
pub struct ExecutableAssessment {
    inner: Arc<dyn Assessment>,
}

impl ExecutableAssessment {
    pub(crate) fn new(inner: Arc<dyn Assessment>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> AssessmentId {
        self.inner.id()
    }

    pub fn name(&self) -> String {
        self.inner.name(true)
    }

    pub fn assessment(&self) -> &dyn Assessment {
        self.inner.as_ref()
    }
}

impl fmt::Debug for ExecutableAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExecutableAssessment")
            .field(&self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FailingCondition, FnAssessment, StaticCondition, TestDocument,
    };
    use assert_matches::assert_matches;

    #[test]
    fn test_plain_resolves_to_itself() {
        let sequence = AssessmentSequence::new();
        let plain = ConfiguredAssessment::plain(FnAssessment::noop(&sequence, "schema"));
        let document = TestDocument::new("doc");

        let resolved = plain.executable_assessments(&document).unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id(), plain.id());
    }

    #[test]
    fn test_false_condition_yields_nothing() {
        let sequence = AssessmentSequence::new();
        let delegate = Arc::new(FnAssessment::noop(&sequence, "rules"));
        let conditional = ConditionalAssessment::new(
            &sequence,
            ConfiguredAssessment::Plain(delegate.clone()),
            Arc::new(StaticCondition(false)),
        );
        let document = TestDocument::new("doc");

        let resolved = ConfiguredAssessment::from(conditional)
            .executable_assessments(&document)
            .unwrap();

        assert!(resolved.is_empty());
        assert_eq!(delegate.call_count(), 0);
    }

    #[test]
    fn test_nested_conditions_all_must_hold() {
        let sequence = AssessmentSequence::new();
        let delegate = ConfiguredAssessment::plain(FnAssessment::noop(&sequence, "rules"));
        let inner = ConditionalAssessment::new(&sequence, delegate, Arc::new(StaticCondition(true)));
        let outer = ConfiguredAssessment::conditional(ConditionalAssessment::new(
            &sequence,
            ConfiguredAssessment::conditional(inner),
            Arc::new(StaticCondition(true)),
        ));
        let document = TestDocument::new("doc");

        let resolved = outer.executable_assessments(&document).unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), "rules#1");
    }

    #[test]
    fn test_condition_error_propagates_as_assessment_error() {
        let sequence = AssessmentSequence::new();
        let delegate = ConfiguredAssessment::plain(FnAssessment::noop(&sequence, "rules"));
        let conditional = ConfiguredAssessment::conditional(ConditionalAssessment::new(
            &sequence,
            delegate,
            Arc::new(FailingCondition),
        ));
        let document = TestDocument::new("doc");

        let error = conditional.executable_assessments(&document).unwrap_err();

        assert_matches!(error, AssessmentError::ConditionFailed { ref assessment, .. } if assessment == "conditional#2");
    }
}
