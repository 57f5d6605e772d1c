use super::errors::{AssessmentError, CheckError};
use super::traits::{Assessment, AssessmentId};
use crate::builder::AssessmentResultBuilder;
use crate::types::Document;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Ensures an output directory exists before delegating to the wrapped check
///
/// Shares the delegate's identity; it is the same assessment with an output
/// location attached.
pub struct ResultDirectoryAssessment {
    delegate: Arc<dyn Assessment>,
    directory: PathBuf,
}

impl ResultDirectoryAssessment {
    pub fn new(delegate: Arc<dyn Assessment>, directory: impl Into<PathBuf>) -> Self {
        Self {
            delegate,
            directory: directory.into(),
        }
    }

    pub fn result_directory(&self) -> &Path {
        &self.directory
    }

    fn ensure_directory(&self) -> Result<(), AssessmentError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| {
            AssessmentError::ResultDirectory {
                assessment: self.name(true),
                path: self.directory.clone(),
                source,
            }
        })
    }
}

impl Assessment for ResultDirectoryAssessment {
    fn id(&self) -> AssessmentId {
        self.delegate.id()
    }

    fn assessment_type(&self) -> &str {
        self.delegate.assessment_type()
    }

    fn execute(
        &self,
        document: &dyn Document,
        builder: &dyn AssessmentResultBuilder,
    ) -> Result<(), CheckError> {
        self.ensure_directory()?;
        self.delegate.execute(document, builder)
    }
}
