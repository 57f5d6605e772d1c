//! Event codes and their metadata
//!
//! Single source of truth for the codes attached to engine log events.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata for a registered code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Assessment execution codes
pub mod execution {
    use super::Code;

    pub const ASSESSMENT_FAILED: Code = Code::new("E100");
    pub const ASSESSMENT_PANICKED: Code = Code::new("E101");
    pub const CONDITION_FAILED: Code = Code::new("E102");
    pub const RESULT_DIRECTORY_FAILED: Code = Code::new("E103");
    pub const EXECUTION_INTERRUPTED: Code = Code::new("E104");
    pub const TASK_FAILURE_SUPPRESSED: Code = Code::new("E105");
}

/// Result builder codes
pub mod builder {
    use super::Code;

    pub const PROTOCOL_VIOLATION: Code = Code::new("E200");
    pub const MUTATION_AFTER_END: Code = Code::new("E201");
    pub const DUPLICATE_TARGET: Code = Code::new("E202");
    pub const UNKNOWN_REQUIREMENT: Code = Code::new("E203");
}

/// Requirement catalogue codes
pub mod requirements {
    use super::Code;

    pub const CATALOGUE_INVALID: Code = Code::new("E300");
    pub const CATALOGUE_IO: Code = Code::new("E301");
}

/// Configuration codes
pub mod config {
    use super::Code;

    pub const CONFIG_INVALID: Code = Code::new("E400");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const EXECUTION_COMPLETED: Code = Code::new("I100");
    pub const ASSESSMENT_COMPLETED: Code = Code::new("I101");
    pub const RESULTS_PRODUCED: Code = Code::new("I200");
    pub const CATALOGUE_LOADED: Code = Code::new("I300");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let entries = [
            ("ERR001", "System", "Internal engine error", "File a bug report"),
            ("ERR002", "System", "Engine initialization failed", "Check configuration"),
            ("E100", "Execution", "Assessment reported a failure", "Inspect the assessment error chain"),
            ("E101", "Execution", "Assessment panicked", "Fix the check implementation"),
            ("E102", "Execution", "Condition evaluation failed", "Verify the condition against the document"),
            ("E103", "Execution", "Result directory could not be created", "Check filesystem permissions"),
            ("E104", "Execution", "Concurrent execution was interrupted", "Verify the worker pool is running"),
            ("E105", "Execution", "Non-assessment task failure was not propagated", "Enable strict task failures"),
            ("E200", "Builder", "Result builder lifecycle violated", "Call start, end and build in order"),
            ("E201", "Builder", "Result builder mutated after end", "Finish all assessments before end"),
            ("E202", "Builder", "Assessment target registered twice", "Use unique document identifiers"),
            ("E203", "Builder", "Result reported for an unknown requirement", "Align assessments with the catalogue"),
            ("E300", "Requirements", "Requirement catalogue is invalid", "Fix the catalogue definition"),
            ("E301", "Requirements", "Requirement catalogue could not be read", "Check the catalogue path"),
            ("E400", "Config", "Engine configuration is invalid", "Fix the configuration value"),
            ("I001", "Success", "Operation completed", "None"),
            ("I004", "Success", "Logging initialized", "None"),
            ("I100", "Success", "Execution completed", "None"),
            ("I101", "Success", "Assessment completed", "None"),
            ("I200", "Success", "Assessment results produced", "None"),
            ("I300", "Success", "Requirement catalogue loaded", "None"),
        ];

        entries
            .into_iter()
            .map(|(code, category, description, recommended_action)| {
                (
                    code,
                    CodeMetadata {
                        code,
                        category,
                        description,
                        recommended_action,
                    },
                )
            })
            .collect()
    })
}

/// Look up metadata for a code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    registry().get(code)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("General")
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown code")
}

pub fn get_action(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}
