//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workflow error: {0}")]
    Workflow(#[from] workflow_types::WorkflowError),

    #[error("Build error: {0}")]
    Build(#[from] workflow_builder::BuildError),

    #[error("Invalid document: {0}")]
    Schema(#[from] workflow_schema::SchemaError),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
