pub mod document;
pub mod status;
pub mod test_result;

pub use document::{Document, SourceInfo};
pub use status::{ResultStatus, TestState, TestStatus};
pub use test_result::{ContextReference, TestResult};
