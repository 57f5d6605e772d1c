//! Document adapters

pub mod errors;
pub mod json;

pub use errors::DocumentError;
pub use json::JsonDocument;
