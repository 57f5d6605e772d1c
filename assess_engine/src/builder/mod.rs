//! Result builder: the thread-safe accumulator of a run and the status
//! aggregation applied when results are produced

pub mod aggregation;
pub mod default;
pub mod errors;
pub mod scope;
pub mod summary;
pub mod traits;

pub use default::DefaultAssessmentResultBuilder;
pub use errors::ProtocolError;
pub use scope::RequirementScope;
pub use summary::{AssessmentSummary, SummarizingAssessmentResultBuilder};
pub use traits::AssessmentResultBuilder;
