use serde::{Deserialize, Serialize};
use std::any::Any;

/// Where a document came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub system_id: String,
    pub location: Option<String>,
}

impl SourceInfo {
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A document under assessment
///
/// The system id is the registration key for assessment targets. `as_any`
/// lets concrete checks and conditions downcast to the document type they
/// understand.
pub trait Document: Send + Sync {
    fn system_id(&self) -> &str;

    fn source_infos(&self) -> Vec<SourceInfo>;

    fn as_any(&self) -> &dyn Any;
}
