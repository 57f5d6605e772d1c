use std::path::PathBuf;

/// Requirement catalogue loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("Failed to read requirement catalogue '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML requirement catalogue: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON requirement catalogue: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported catalogue format '{extension}' (expected .toml or .json)")]
    UnsupportedFormat { extension: String },

    #[error("Requirement with empty id (parent: {})", .parent.as_deref().unwrap_or("<root>"))]
    EmptyId { parent: Option<String> },

    #[error("Duplicate base requirement id '{id}'")]
    DuplicateBaseRequirement { id: String },

    #[error("Duplicate derived requirement id '{id}' (in '{first}' and '{second}')")]
    DuplicateDerivedRequirement {
        id: String,
        first: String,
        second: String,
    },
}
