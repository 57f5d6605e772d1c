//! Assessment contract and identity

use super::errors::CheckError;
use crate::builder::AssessmentResultBuilder;
use crate::types::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Identity
// ============================================================================

/// Numeric identity assigned when an assessment is constructed
///
/// Used for display and ordering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssessmentId(u64);

impl AssessmentId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id generator handed to assessment constructors
#[derive(Debug)]
pub struct AssessmentSequence {
    next: AtomicU64,
}

impl AssessmentSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next_id(&self) -> AssessmentId {
        AssessmentId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Restart numbering at 1; intended for tests
    pub fn reset(&self) {
        self.next.store(1, Ordering::Relaxed);
    }
}

impl Default for AssessmentSequence {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assessment
// ============================================================================

/// One pluggable check run against a document
///
/// Implementations must tolerate concurrent `execute` calls for independent
/// document/builder pairs.
pub trait Assessment: Send + Sync {
    fn id(&self) -> AssessmentId;

    /// Stable identifier of the check kind (`"json-field"`, `"schema"`, ...)
    fn assessment_type(&self) -> &str;

    fn name(&self, include_id: bool) -> String {
        if include_id {
            format!("{}{}", self.assessment_type(), self.id())
        } else {
            self.assessment_type().to_string()
        }
    }

    /// Run the check and report outcomes through `builder`
    fn execute(
        &self,
        document: &dyn Document,
        builder: &dyn AssessmentResultBuilder,
    ) -> Result<(), CheckError>;
}
