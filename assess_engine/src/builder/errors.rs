/// Caller misuse of the result builder lifecycle or executor construction
///
/// These are never recoverable locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Result builder: {operation}() called before start()")]
    NotStarted { operation: &'static str },

    #[error("Result builder: build() called before end()")]
    NotEnded,

    #[error("Result builder: end() called more than once")]
    AlreadyEnded,

    #[error("Result builder: build() called more than once")]
    AlreadyBuilt,

    #[error("Assessment executor requires at least one assessment")]
    EmptyAssessmentList,
}
