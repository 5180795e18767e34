//! Schema validation error types

/// Why a serialized document was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Schema mismatch at {path}: {message}")]
    SchemaMismatch { path: String, message: String },
}

impl SchemaError {
    pub(crate) fn mismatch(path: &str, message: impl Into<String>) -> Self {
        SchemaError::SchemaMismatch {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Location of the violated constraint, if the document parsed
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::MalformedDocument(_) => None,
            SchemaError::SchemaMismatch { path, .. } => Some(path),
        }
    }
}

/// Result type alias for schema validation
pub type SchemaResult<T> = Result<T, SchemaError>;
