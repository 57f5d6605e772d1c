use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Cannot read document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document {system_id} is not valid JSON: {source}")]
    Parse {
        system_id: String,
        #[source]
        source: serde_json::Error,
    },
}
