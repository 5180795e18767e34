//! Error types for the workflow definition model

/// Errors that can occur while classifying memory or moving documents in and out of JSON
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(
        "Unsupported memory type for key '{key}': \
         expected a string or a list of strings and flat string maps, found {found}"
    )]
    UnsupportedMemoryType { key: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for workflow model operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
