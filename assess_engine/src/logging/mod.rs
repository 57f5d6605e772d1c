//! Global logging for the assessment engine
//!
//! A process-wide `LoggingService` is installed once; until then every macro is
//! a no-op. Events logged while an assessment runs carry the document and
//! assessment of the current thread as context.

pub mod codes;
pub mod events;
#[macro_use]
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, FacadeLogger, Logger, LoggingService, MemoryLogger, MultiLogger,
    StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static ASSESSMENT_CONTEXT: RefCell<Option<AssessmentContext>> = RefCell::new(None);
}

/// Document and assessment currently executing on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentContext {
    pub document: String,
    pub assessment: String,
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the global logging service
pub fn init_global_logging(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Install a console/JSON service built from a level and format flag
pub fn init_global_logging_with_settings(min_level: LogLevel, structured: bool) -> Result<(), String> {
    init_global_logging(Arc::new(LoggingService::with_settings(min_level, structured)))
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// ASSESSMENT CONTEXT
// ============================================================================

/// Restores the previous context when dropped, including during unwinding
struct ContextGuard {
    previous: Option<AssessmentContext>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ASSESSMENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = previous;
        });
    }
}

/// Run `f` with the given document/assessment attached to every event it logs
pub fn with_assessment_context<F, R>(document: &str, assessment: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let context = AssessmentContext {
        document: document.to_string(),
        assessment: assessment.to_string(),
    };
    let previous = ASSESSMENT_CONTEXT.with(|ctx| ctx.borrow_mut().replace(context));
    let _guard = ContextGuard { previous };
    f()
}

pub fn get_current_assessment_context() -> Option<AssessmentContext> {
    ASSESSMENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn emit(mut event: LogEvent, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(current) = get_current_assessment_context() {
        event = event
            .with_context("document", &current.document)
            .with_context("assessment", &current.assessment);
    }

    logger.log_event(event);
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::error(code, message), context);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::success(code, message), context);
}

pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    emit(event, context);
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::info(message), context);
}

pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::debug(message), context);
}
