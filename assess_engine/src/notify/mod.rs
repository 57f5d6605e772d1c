//! Observer interfaces for progress and summary reporting
//!
//! Observers never influence engine state; the engine behaves identically
//! with the no-op implementations installed.

pub mod handler;
pub mod notifier;

pub use handler::{EventLoggingHandler, LoggingHandler, LoggingHandlerChain, NoopLoggingHandler};
pub use notifier::{AssessmentNotifier, HandlerNotifier, NoopAssessmentNotifier, NotifierChain};
