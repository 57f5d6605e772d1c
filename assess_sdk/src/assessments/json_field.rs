//! JSON field assessment
//!
//! Evaluates a list of field rules against a [`JsonDocument`] and reports one
//! test result per applicable rule against the rule's derived requirement.

use super::errors::RuleError;
use crate::documents::JsonDocument;
use assess_engine::assessment::{Assessment, AssessmentError, AssessmentId, AssessmentSequence, CheckError};
use assess_engine::builder::AssessmentResultBuilder;
use assess_engine::types::{ContextReference, Document, TestResult, TestState, TestStatus};
use assess_engine::log_debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Kind of check a rule performs on the value at its pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Exists,
    Equals,
    Matches,
}

/// Status reported when a rule does not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureSeverity {
    #[default]
    Fail,
    Warning,
}

impl FailureSeverity {
    pub fn status(self) -> TestStatus {
        match self {
            FailureSeverity::Fail => TestStatus::Fail,
            FailureSeverity::Warning => TestStatus::Warning,
        }
    }
}

/// Declarative rule as written in an assessment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Test id reported in the result
    pub id: String,
    /// Derived requirement the result is recorded against
    pub requirement: String,
    pub pointer: String,
    pub check: CheckKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub severity: FailureSeverity,
    /// Pointer that must resolve for the rule to apply at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_when: Option<String>,
}

impl FieldRule {
    pub fn exists(id: &str, requirement: &str, pointer: &str) -> Self {
        Self {
            id: id.to_string(),
            requirement: requirement.to_string(),
            pointer: pointer.to_string(),
            check: CheckKind::Exists,
            value: None,
            pattern: None,
            severity: FailureSeverity::Fail,
            applies_when: None,
        }
    }

    pub fn equals(id: &str, requirement: &str, pointer: &str, value: Value) -> Self {
        Self {
            check: CheckKind::Equals,
            value: Some(value),
            ..Self::exists(id, requirement, pointer)
        }
    }

    pub fn matches(id: &str, requirement: &str, pointer: &str, pattern: &str) -> Self {
        Self {
            check: CheckKind::Matches,
            pattern: Some(pattern.to_string()),
            ..Self::exists(id, requirement, pointer)
        }
    }

    pub fn with_severity(mut self, severity: FailureSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn applies_when(mut self, pointer: &str) -> Self {
        self.applies_when = Some(pointer.to_string());
        self
    }
}

#[derive(Debug)]
enum CompiledCheck {
    Exists,
    Equals(Value),
    Matches(Regex),
}

#[derive(Debug)]
struct CompiledRule {
    rule: FieldRule,
    check: CompiledCheck,
}

impl CompiledRule {
    fn compile(rule: FieldRule) -> Result<Self, RuleError> {
        for pointer in std::iter::once(&rule.pointer).chain(rule.applies_when.iter()) {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(RuleError::InvalidPointer {
                    rule: rule.id.clone(),
                    pointer: pointer.clone(),
                });
            }
        }

        let check = match rule.check {
            CheckKind::Exists => CompiledCheck::Exists,
            CheckKind::Equals => match &rule.value {
                Some(value) => CompiledCheck::Equals(value.clone()),
                None => return Err(RuleError::MissingValue { rule: rule.id.clone() }),
            },
            CheckKind::Matches => match &rule.pattern {
                Some(pattern) => {
                    let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
                        rule: rule.id.clone(),
                        source,
                    })?;
                    CompiledCheck::Matches(regex)
                }
                None => return Err(RuleError::MissingPattern { rule: rule.id.clone() }),
            },
        };

        Ok(Self { rule, check })
    }

    /// Whether the rule holds, plus the observed value for reporting
    fn evaluate(&self, actual: Option<&Value>) -> (bool, String) {
        let observed = actual.map(render).unwrap_or_else(|| "<missing>".to_string());
        let holds = match (&self.check, actual) {
            (_, None) => false,
            (CompiledCheck::Exists, Some(_)) => true,
            (CompiledCheck::Equals(expected), Some(actual)) => actual == expected,
            (CompiledCheck::Matches(regex), Some(actual)) => regex.is_match(&render(actual)),
        };
        (holds, observed)
    }

    fn expectation(&self) -> String {
        match &self.check {
            CompiledCheck::Exists => "exists".to_string(),
            CompiledCheck::Equals(value) => format!("== {}", value),
            CompiledCheck::Matches(regex) => format!("=~ {}", regex.as_str()),
        }
    }
}

/// Strings without quotes, everything else as compact JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Last path segment of a system id, reduced to file-name-safe characters
fn report_stem(system_id: &str) -> String {
    let name = system_id.rsplit('/').next().unwrap_or(system_id);
    let name = name.strip_suffix(".json").unwrap_or(name);
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[derive(Debug, Serialize)]
struct Finding<'a> {
    test_id: &'a str,
    requirement: &'a str,
    pointer: &'a str,
    expected: String,
    observed: String,
    status: TestStatus,
}

pub struct JsonFieldAssessment {
    id: AssessmentId,
    rules: Vec<CompiledRule>,
    report_directory: Option<PathBuf>,
}

impl JsonFieldAssessment {
    pub fn new(sequence: &AssessmentSequence, rules: Vec<FieldRule>) -> Result<Self, RuleError> {
        if rules.is_empty() {
            return Err(RuleError::NoRules);
        }
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: sequence.next_id(),
            rules,
            report_directory: None,
        })
    }

    /// Write a findings file into `directory` after each run
    pub fn with_report_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.report_directory = Some(directory.into());
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn write_findings(
        &self,
        directory: &Path,
        document: &dyn Document,
        findings: &[Finding<'_>],
    ) -> Result<(), CheckError> {
        let file = directory.join(format!(
            "{}-{}-{}.json",
            self.assessment_type(),
            self.id.value(),
            report_stem(document.system_id())
        ));
        let json = serde_json::to_string_pretty(findings)?;
        std::fs::write(&file, json)?;
        log_debug!("Findings written",
            "file" => file.display(),
            "findings" => findings.len()
        );
        Ok(())
    }
}

impl Assessment for JsonFieldAssessment {
    fn id(&self) -> AssessmentId {
        self.id
    }

    fn assessment_type(&self) -> &str {
        "json_field"
    }

    fn execute(
        &self,
        document: &dyn Document,
        builder: &dyn AssessmentResultBuilder,
    ) -> Result<(), CheckError> {
        let json = JsonDocument::downcast(document).ok_or_else(|| {
            AssessmentError::check_failed(
                &self.name(true),
                format!("{} is not a JSON document", document.system_id()),
            )
        })?;

        let mut findings = Vec::new();
        for compiled in &self.rules {
            let rule = &compiled.rule;

            if let Some(gate) = &rule.applies_when {
                if json.pointer(gate).is_none() {
                    builder.assign_test_status(self, document, &rule.requirement, TestState::NotApplicable);
                    continue;
                }
            }

            let (holds, observed) = compiled.evaluate(json.pointer(&rule.pointer));
            let status = if holds {
                TestStatus::Pass
            } else {
                rule.severity.status()
            };

            let context = ContextReference::new(document.system_id()).with_locator(rule.pointer.clone());
            let result = TestResult::new(rule.id.clone(), status, context)
                .with_values([rule.pointer.clone(), compiled.expectation(), observed.clone()]);
            builder.add_test_result(self, document, &rule.requirement, result);

            if !holds {
                findings.push(Finding {
                    test_id: &rule.id,
                    requirement: &rule.requirement,
                    pointer: &rule.pointer,
                    expected: compiled.expectation(),
                    observed,
                    status,
                });
            }
        }

        if let Some(directory) = &self.report_directory {
            self.write_findings(directory, document, &findings)?;
        }
        Ok(())
    }
}
