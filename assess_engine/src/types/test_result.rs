use super::status::TestStatus;
use serde::{Deserialize, Serialize};

/// Location inside an assessed document a test result refers to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextReference {
    pub system_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Path-like locator (JSON pointer, XPath, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl ContextReference {
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            ..Default::default()
        }
    }

    pub fn at_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }
}

/// One discrete check outcome; immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    test_id: String,
    status: TestStatus,
    context: ContextReference,
    #[serde(default)]
    values: Vec<String>,
}

impl TestResult {
    pub fn new(test_id: impl Into<String>, status: TestStatus, context: ContextReference) -> Self {
        Self {
            test_id: test_id.into(),
            status,
            context,
            values: Vec::new(),
        }
    }

    /// Attach message-substitution values
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn context(&self) -> &ContextReference {
        &self.context
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}
