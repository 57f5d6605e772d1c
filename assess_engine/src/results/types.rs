//! # Assessment Result Types
//!
//! Immutable snapshot produced by the result builder once a run has ended.
//! Serializes to JSON for report rendering and downstream tooling.

use crate::requirements::RequirementType;
use crate::types::{ResultStatus, SourceInfo, TestResult, TestState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requirement hierarchy with computed statuses for one assessment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResults {
    /// Unique identifier for this run
    pub run_id: String,

    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    pub base_requirements: Vec<BaseRequirementResult>,

    /// Documents registered as assessment targets, in registration order
    pub subjects: Vec<AssessmentSubject>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    pub host: HostContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRequirementResult {
    pub id: String,
    #[serde(default)]
    pub statement: String,
    pub status: ResultStatus,
    pub derived_requirements: Vec<DerivedRequirementResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRequirementResult {
    pub id: String,
    #[serde(default)]
    pub statement: String,
    pub requirement_type: RequirementType,
    #[serde(default)]
    pub conditional: bool,
    pub status: ResultStatus,
    pub test_state: TestState,
    #[serde(default)]
    pub test_results: Vec<TestResult>,
}

/// A document registered as a target of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubject {
    pub system_id: String,
    #[serde(default)]
    pub source_infos: Vec<SourceInfo>,
}

/// Host execution context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    pub hostname: String,
    pub os: String,
    pub arch: String,
}

impl HostContext {
    /// Detect from the running system
    pub fn from_system() -> Self {
        Self {
            hostname: hostname::get()
                .unwrap_or_else(|_| std::ffi::OsString::from("unknown"))
                .to_string_lossy()
                .to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    pub fn new(hostname: impl Into<String>, os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            os: os.into(),
            arch: arch.into(),
        }
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::from_system()
    }
}

/// Number of requirements per final status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub not_in_scope: usize,
    pub not_tested: usize,
    pub not_applicable: usize,
    pub informational: usize,
    pub pass: usize,
    pub warning: usize,
    pub fail: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ResultStatus) {
        let slot = match status {
            ResultStatus::NotInScope => &mut self.not_in_scope,
            ResultStatus::NotTested => &mut self.not_tested,
            ResultStatus::NotApplicable => &mut self.not_applicable,
            ResultStatus::Informational => &mut self.informational,
            ResultStatus::Pass => &mut self.pass,
            ResultStatus::Warning => &mut self.warning,
            ResultStatus::Fail => &mut self.fail,
        };
        *slot += 1;
    }

    pub fn get(&self, status: ResultStatus) -> usize {
        match status {
            ResultStatus::NotInScope => self.not_in_scope,
            ResultStatus::NotTested => self.not_tested,
            ResultStatus::NotApplicable => self.not_applicable,
            ResultStatus::Informational => self.informational,
            ResultStatus::Pass => self.pass,
            ResultStatus::Warning => self.warning,
            ResultStatus::Fail => self.fail,
        }
    }

    pub fn total(&self) -> usize {
        ResultStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

impl AssessmentResults {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    /// Most severe base requirement status; `NotInScope` for an empty catalogue
    pub fn overall_status(&self) -> ResultStatus {
        self.base_requirements
            .iter()
            .map(|b| b.status)
            .max()
            .unwrap_or(ResultStatus::NotInScope)
    }

    pub fn is_failure(&self) -> bool {
        self.overall_status().is_failure()
    }

    pub fn base_requirement(&self, id: &str) -> Option<&BaseRequirementResult> {
        self.base_requirements.iter().find(|b| b.id == id)
    }

    pub fn derived_requirement(&self, id: &str) -> Option<&DerivedRequirementResult> {
        self.base_requirements
            .iter()
            .flat_map(|b| b.derived_requirements.iter())
            .find(|d| d.id == id)
    }

    /// Counts over derived requirements
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for derived in self
            .base_requirements
            .iter()
            .flat_map(|b| b.derived_requirements.iter())
        {
            counts.record(derived.status);
        }
        counts
    }

    pub fn total_test_results(&self) -> usize {
        self.base_requirements
            .iter()
            .flat_map(|b| b.derived_requirements.iter())
            .map(|d| d.test_results.len())
            .sum()
    }
}
