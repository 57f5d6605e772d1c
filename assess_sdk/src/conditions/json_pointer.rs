use crate::documents::JsonDocument;
use assess_engine::assessment::{AssessmentError, Condition};
use assess_engine::types::Document;
use serde_json::Value;

/// True when a JSON pointer resolves, optionally to an expected value
#[derive(Debug, Clone)]
pub struct JsonPointerCondition {
    pointer: String,
    expected: Option<Value>,
}

impl JsonPointerCondition {
    pub fn new(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            expected: None,
        }
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl Condition for JsonPointerCondition {
    fn applies_to(&self, document: &dyn Document) -> Result<bool, AssessmentError> {
        if !self.pointer.is_empty() && !self.pointer.starts_with('/') {
            return Err(AssessmentError::condition_unevaluable(
                &self.describe(),
                "JSON pointer must be empty or start with '/'",
            ));
        }

        let json = JsonDocument::downcast(document).ok_or_else(|| {
            AssessmentError::condition_unevaluable(
                &self.describe(),
                format!("{} is not a JSON document", document.system_id()),
            )
        })?;

        Ok(match (json.pointer(&self.pointer), &self.expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        })
    }

    fn describe(&self) -> String {
        match &self.expected {
            Some(expected) => format!("{} == {}", self.pointer, expected),
            None => format!("{} exists", self.pointer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_engine::types::SourceInfo;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::any::Any;

    struct PlainText;

    impl Document for PlainText {
        fn system_id(&self) -> &str {
            "notes.txt"
        }

        fn source_infos(&self) -> Vec<SourceInfo> {
            vec![SourceInfo::new("notes.txt")]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn document() -> JsonDocument {
        JsonDocument::new("mem", json!({"kind": "gateway", "tls": {"enabled": false}}))
    }

    #[test]
    fn test_presence() {
        assert!(JsonPointerCondition::new("/tls").applies_to(&document()).unwrap());
        assert!(!JsonPointerCondition::new("/auth").applies_to(&document()).unwrap());
    }

    #[test]
    fn test_expected_value() {
        let gateway = JsonPointerCondition::new("/kind").with_expected(json!("gateway"));
        let proxy = JsonPointerCondition::new("/kind").with_expected(json!("proxy"));

        assert!(gateway.applies_to(&document()).unwrap());
        assert!(!proxy.applies_to(&document()).unwrap());
        assert_eq!(gateway.describe(), "/kind == \"gateway\"");
    }

    #[test]
    fn test_non_json_document_is_unevaluable() {
        assert_matches!(
            JsonPointerCondition::new("/kind").applies_to(&PlainText),
            Err(AssessmentError::ConditionUnevaluable { ref reason, .. }) if reason.contains("notes.txt")
        );
    }

    #[test]
    fn test_malformed_pointer_is_unevaluable() {
        assert_matches!(
            JsonPointerCondition::new("kind").applies_to(&document()),
            Err(AssessmentError::ConditionUnevaluable { .. })
        );
    }
}
