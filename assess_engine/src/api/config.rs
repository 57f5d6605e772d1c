//! # Engine Configuration
//!
//! Defaults come from `ASSESS_*` environment variables; a TOML file or the
//! builder-style setters override them.

use super::errors::ConfigError;
use crate::logging::{LogLevel, Logger, LoggingService};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::sync::Arc;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_max_threads() -> usize {
    env::var("ASSESS_MAX_THREADS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().min(8))
                .unwrap_or(4)
        })
}

/// Configuration for running assessments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dispatch assessments onto a worker pool instead of the calling thread
    pub concurrent: bool,

    /// Worker pool size for concurrent execution
    pub max_threads: usize,

    /// Ask notifiers for per-assessment summaries
    pub summarize: bool,

    /// Report panicking concurrent tasks as errors instead of returning normally
    pub strict_task_failures: bool,

    pub log_level: LogLevel,

    /// Emit JSON lines instead of human-readable console output
    pub structured_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrent: env_flag("ASSESS_CONCURRENT", false),
            max_threads: default_max_threads(),
            summarize: env_flag("ASSESS_SUMMARIZE", false),
            strict_task_failures: env_flag("ASSESS_STRICT_TASK_FAILURES", false),
            log_level: env::var("ASSESS_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or_default(),
            structured_logging: env_flag("ASSESS_STRUCTURED_LOGGING", false),
        }
    }
}

impl EngineConfig {
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }

    pub fn with_summaries(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    pub fn with_strict_task_failures(mut self, strict: bool) -> Self {
        self.strict_task_failures = strict;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_structured_logging(mut self, structured: bool) -> Self {
        self.structured_logging = structured;
        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_threads == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_threads must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Logging service filtered at the configured level
    pub fn logging_service(&self, logger: Arc<dyn Logger>) -> LoggingService {
        LoggingService::new(logger, self.log_level)
    }
}
