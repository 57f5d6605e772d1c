//! Requirement catalogue: base requirements grouping derived requirements

pub mod errors;
pub mod manager;
pub mod model;

pub use errors::CatalogueError;
pub use manager::{InMemoryRequirementsManager, RequirementsManager};
pub use model::{BaseRequirement, DerivedRequirement, RequirementType};
