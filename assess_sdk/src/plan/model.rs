//! TOML assessment plan
//!
//! ```toml
//! [scope]
//! excluded = ["NET-3.2"]
//!
//! [[assessment]]
//! name = "tls"
//! result_directory = "reports/tls"
//! condition = { pointer = "/tls" }
//!
//! [[assessment.rule]]
//! id = "tls-enabled"
//! requirement = "NET-1.1"
//! pointer = "/tls/enabled"
//! check = "equals"
//! value = true
//! ```

use super::errors::PlanError;
use crate::assessments::{FieldRule, JsonFieldAssessment};
use crate::conditions::JsonPointerCondition;
use assess_engine::assessment::{
    Assessment, AssessmentSequence, ConditionalAssessment, ConfiguredAssessment,
    ResultDirectoryAssessment,
};
use assess_engine::builder::RequirementScope;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub pointer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Value>,
}

impl ConditionSpec {
    pub fn to_condition(&self) -> JsonPointerCondition {
        let condition = JsonPointerCondition::new(self.pointer.clone());
        match &self.equals {
            Some(expected) => condition.with_expected(expected.clone()),
            None => condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_directory: Option<PathBuf>,
    #[serde(rename = "rule", default)]
    pub rules: Vec<FieldRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPlan {
    #[serde(default)]
    pub scope: RequirementScope,
    #[serde(rename = "assessment", default)]
    pub assessments: Vec<PlannedAssessment>,
}

impl AssessmentPlan {
    pub fn from_toml_str(content: &str) -> Result<Self, PlanError> {
        let plan: Self = toml::from_str(content)?;
        if plan.assessments.is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(plan)
    }

    /// Load a plan file; relative result directories resolve against its directory
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut plan = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            for planned in &mut plan.assessments {
                if let Some(directory) = planned.result_directory.as_mut() {
                    if directory.is_relative() {
                        *directory = base.join(&*directory);
                    }
                }
            }
        }
        Ok(plan)
    }

    pub fn rule_count(&self) -> usize {
        self.assessments.iter().map(|a| a.rules.len()).sum()
    }

    /// Instantiate the planned assessments, drawing ids from `sequence`
    pub fn build(&self, sequence: &AssessmentSequence) -> Result<Vec<ConfiguredAssessment>, PlanError> {
        self.assessments
            .iter()
            .enumerate()
            .map(|(index, planned)| planned.build(index, sequence))
            .collect()
    }
}

impl PlannedAssessment {
    fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("assessment[{}]", index))
    }

    fn build(&self, index: usize, sequence: &AssessmentSequence) -> Result<ConfiguredAssessment, PlanError> {
        let assessment = JsonFieldAssessment::new(sequence, self.rules.clone()).map_err(|source| {
            PlanError::Rule {
                assessment: self.label(index),
                source,
            }
        })?;

        let plain: Arc<dyn Assessment> = match &self.result_directory {
            Some(directory) => Arc::new(ResultDirectoryAssessment::new(
                Arc::new(assessment.with_report_directory(directory.clone())),
                directory.clone(),
            )),
            None => Arc::new(assessment),
        };

        Ok(match &self.condition {
            Some(spec) => ConfiguredAssessment::from(ConditionalAssessment::new(
                sequence,
                ConfiguredAssessment::from(plain),
                Arc::new(spec.to_condition()),
            )),
            None => ConfiguredAssessment::from(plain),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::JsonDocument;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::io::Write;

    const PLAN: &str = r#"
        [scope]
        excluded = ["NET-9"]

        [[assessment]]
        name = "identity"

        [[assessment.rule]]
        id = "name-set"
        requirement = "NET-1"
        pointer = "/name"
        check = "exists"

        [[assessment]]
        name = "tls"
        condition = { pointer = "/tls" }

        [[assessment.rule]]
        id = "tls-enabled"
        requirement = "NET-2"
        pointer = "/tls/enabled"
        check = "equals"
        value = true

        [[assessment.rule]]
        id = "tls-version"
        requirement = "NET-3"
        pointer = "/tls/min_version"
        check = "matches"
        pattern = '^1\.[23]$'
        severity = "warning"
    "#;

    #[test]
    fn test_parse_plan() {
        let plan = AssessmentPlan::from_toml_str(PLAN).unwrap();

        assert_eq!(plan.assessments.len(), 2);
        assert_eq!(plan.rule_count(), 3);
        assert!(plan.scope.excluded.contains("NET-9"));
        assert_eq!(
            plan.assessments[1].condition,
            Some(ConditionSpec {
                pointer: "/tls".to_string(),
                equals: None
            })
        );
    }

    #[test]
    fn test_build_resolves_conditions() {
        let plan = AssessmentPlan::from_toml_str(PLAN).unwrap();
        let configured = plan.build(&AssessmentSequence::new()).unwrap();

        let with_tls = JsonDocument::new("a", json!({"name": "x", "tls": {"enabled": true}}));
        let without_tls = JsonDocument::new("b", json!({"name": "x"}));

        let count = |document: &JsonDocument| -> usize {
            configured
                .iter()
                .map(|c| c.executable_assessments(document).unwrap().len())
                .sum()
        };
        assert_eq!(count(&with_tls), 2);
        assert_eq!(count(&without_tls), 1);
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert_matches!(
            AssessmentPlan::from_toml_str("[scope]\n"),
            Err(PlanError::Empty)
        );
    }

    #[test]
    fn test_bad_rule_names_assessment() {
        let plan = AssessmentPlan::from_toml_str(
            r#"
            [[assessment]]
            [[assessment.rule]]
            id = "r"
            requirement = "D"
            pointer = "/a"
            check = "matches"
            "#,
        )
        .unwrap();

        assert_matches!(
            plan.build(&AssessmentSequence::new()),
            Err(PlanError::Rule { ref assessment, .. }) if assessment == "assessment[0]"
        );
    }

    #[test]
    fn test_relative_result_directory_resolved_against_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            [[assessment]]
            result_directory = "reports"
            [[assessment.rule]]
            id = "r"
            requirement = "D"
            pointer = "/a"
            check = "exists"
            "#
        )
        .unwrap();

        let plan = AssessmentPlan::from_path(&path).unwrap();

        assert_eq!(
            plan.assessments[0].result_directory.as_deref(),
            Some(dir.path().join("reports").as_path())
        );
    }
}
