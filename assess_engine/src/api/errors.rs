//! # Engine Errors

use crate::assessment::AssessmentError;
use crate::builder::ProtocolError;
use crate::requirements::CatalogueError;
use std::path::PathBuf;

/// Engine configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Everything that can stop a document assessment
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Requirement catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Failures that concern one document; a batch may continue with the next
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::Assessment(_))
    }

    /// Caller misuse rather than a problem with the input
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, EngineError::Protocol(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            EngineError::Assessment(e) => format!("Assessment failed: {}", e),
            EngineError::Protocol(e) => format!("Engine misuse: {}", e),
            EngineError::Catalogue(e) => format!("Cannot load requirements: {}", e),
            EngineError::Config(e) => format!("Configuration error: {}", e),
            EngineError::Io(e) => format!("I/O error: {}", e),
        }
    }
}
