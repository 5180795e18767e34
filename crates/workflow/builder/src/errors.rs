//! Builder error types

use workflow_types::Operator;

/// Errors that can occur while assembling tasks, edges and return bindings
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Either a prompt or a prompt path must be provided, but not both")]
    MissingPromptSource,

    #[error("Failed to read prompt file '{path}': {source}")]
    PromptFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Task '{task}' is missing required inputs: {}", .missing.join(", "))]
    MissingRequiredInputs { task: String, missing: Vec<String> },

    #[error("Task id must not be empty")]
    EmptyTaskId,

    #[error("Task id '{0}' is reserved for the terminal task")]
    ReservedTaskId(String),

    #[error("Task with id '{0}' already exists")]
    DuplicateTaskId(String),

    #[error("Source task '{0}' not found")]
    UnknownSourceTask(String),

    #[error("Target task '{0}' not found")]
    UnknownTargetTask(String),

    #[error("The following tasks have no outgoing edges: {}", .0.join(", "))]
    DanglingTask(Vec<String>),

    #[error("The following edge targets are not valid tasks: {}", .0.join(", "))]
    InvalidEdgeTarget(Vec<String>),

    #[error("Unsupported memory type for key '{key}': {reason}")]
    UnsupportedMemoryType { key: String, reason: String },

    #[error("The key '{0}' does not correspond to any output in the workflow tasks")]
    UnknownReturnKey(String),

    #[error("At least one return key must be given")]
    NoReturnKeys,

    #[error("Operator '{operator}' cannot be used for {context}")]
    UnsupportedOperator {
        operator: Operator,
        context: &'static str,
    },

    #[error("Post-processing requires a return value to be set first")]
    NoReturnValue,

    #[error("Slot '{key}' is {current} and cannot be written as {requested}")]
    ShapeConflict {
        key: String,
        current: String,
        requested: String,
    },

    #[error("Workflow error: {0}")]
    Workflow(#[from] workflow_types::WorkflowError),
}

/// Result type alias for builder operations
pub type BuildResult<T> = Result<T, BuildError>;
