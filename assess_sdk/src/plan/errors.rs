use crate::assessments::RuleError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Cannot read plan {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid plan TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Plan declares no assessments")]
    Empty,

    #[error("Assessment '{assessment}': {source}")]
    Rule {
        assessment: String,
        #[source]
        source: RuleError,
    },
}
