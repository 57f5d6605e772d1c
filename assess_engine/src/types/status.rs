use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a derived requirement was exercised during a run
///
/// Ordered by increasing specificity; recorded states only ever escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestState {
    NotTested,
    NotApplicable,
    Tested,
}

impl TestState {
    /// The more specific of `self` and `other`
    pub fn escalate(self, other: TestState) -> TestState {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotTested => "NOT_TESTED",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Tested => "TESTED",
        }
    }
}

impl Default for TestState {
    fn default() -> Self {
        TestState::NotTested
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final aggregated status of a base or derived requirement
///
/// Ordered by increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    NotInScope,
    NotTested,
    NotApplicable,
    Informational,
    Pass,
    Warning,
    Fail,
}

impl ResultStatus {
    /// The more severe of `self` and `other`
    pub fn escalate(self, other: ResultStatus) -> ResultStatus {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInScope => "NOT_IN_SCOPE",
            Self::NotTested => "NOT_TESTED",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Informational => "INFORMATIONAL",
            Self::Pass => "PASS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail)
    }

    pub const ALL: [ResultStatus; 7] = [
        Self::NotInScope,
        Self::NotTested,
        Self::NotApplicable,
        Self::Informational,
        Self::Pass,
        Self::Warning,
        Self::Fail,
    ];
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw outcome of one check instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Informational,
    Pass,
    Warning,
    Fail,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informational => "INFORMATIONAL",
            Self::Pass => "PASS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
        }
    }

    /// Parse from a case-insensitive name (`fail`, `warning`/`warn`, ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" | "failure" => Some(Self::Fail),
            "warn" | "warning" => Some(Self::Warning),
            "pass" => Some(Self::Pass),
            "info" | "informational" => Some(Self::Informational),
            _ => None,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
