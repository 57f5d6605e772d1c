//! JSON document adapter
//!
//! Wraps a parsed `serde_json::Value` so JSON files can be assessed.

use super::errors::DocumentError;
use assess_engine::types::{Document, SourceInfo};
use serde_json::Value;
use std::any::Any;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonDocument {
    system_id: String,
    value: Value,
    path: Option<PathBuf>,
}

impl JsonDocument {
    /// In-memory document
    pub fn new(system_id: impl Into<String>, value: Value) -> Self {
        Self {
            system_id: system_id.into(),
            value,
            path: None,
        }
    }

    pub fn from_json_str(system_id: impl Into<String>, content: &str) -> Result<Self, DocumentError> {
        let system_id = system_id.into();
        let value = serde_json::from_str(content).map_err(|source| DocumentError::Parse {
            system_id: system_id.clone(),
            source,
        })?;
        Ok(Self::new(system_id, value))
    }

    /// Load a file; the system id is a `file://` URI of the canonical path
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let io_error = |source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io_error)?;
        let content = std::fs::read_to_string(&canonical).map_err(io_error)?;

        let mut document = Self::from_json_str(format!("file://{}", canonical.display()), &content)?;
        document.path = Some(canonical);
        Ok(document)
    }

    /// View a generic document as JSON, if it is one
    pub fn downcast(document: &dyn Document) -> Option<&JsonDocument> {
        document.as_any().downcast_ref::<JsonDocument>()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// RFC 6901 lookup; `None` for a missing member or a malformed pointer
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.value.pointer(pointer)
    }
}

impl Document for JsonDocument {
    fn system_id(&self) -> &str {
        &self.system_id
    }

    fn source_infos(&self) -> Vec<SourceInfo> {
        let source = SourceInfo::new(self.system_id.clone());
        match &self.path {
            Some(path) => vec![source.with_location(path.display().to_string())],
            None => vec![source],
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
