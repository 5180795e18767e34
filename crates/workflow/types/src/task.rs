//! Tasks: the nodes of a workflow graph
//!
//! A Task pairs a prompt template with the memory bindings it reads
//! ([`Input`]) and the slots it writes ([`Output`]). The `{{name}}`
//! placeholders in the prompt are resolved by the runtime through the
//! inputs whose `value.key` matches.

use crate::MemoryAccessKind;
use serde::{Deserialize, Serialize};

/// Identifier of the synthetic terminal task
pub const TERMINAL_TASK_ID: &str = "_end";

/// Value written by an [`Output`]: the result of the task's operator
pub const RESULT_PLACEHOLDER: &str = "__result";

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a task within one workflow
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id of the terminal task (`_end`)
    pub fn terminal() -> Self {
        Self(TERMINAL_TASK_ID.to_string())
    }

    pub fn is_terminal(&self) -> bool {
        self.0 == TERMINAL_TASK_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Operator ─────────────────────────────────────────────────────────

/// What the runtime does when it executes a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Plain text generation
    Generation,
    /// Generation with tool calls executed by the runtime
    FunctionCalling,
    /// Generation with tool calls returned unexecuted
    FunctionCallingRaw,
    /// Web search driven by the prompt
    Search,
    /// Sampling from a memory collection
    Sample,
    /// Legacy comparison step; accepted in loaded documents only
    Check,
    /// The terminal task
    End,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Generation => "generation",
            Operator::FunctionCalling => "function_calling",
            Operator::FunctionCallingRaw => "function_calling_raw",
            Operator::Search => "search",
            Operator::Sample => "sample",
            Operator::Check => "check",
            Operator::End => "end",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Inputs ───────────────────────────────────────────────────────────

/// Secondary lookup used by search-backed reads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub kind: MemoryAccessKind,
    pub key: String,
}

/// A memory access: which slot, and how to read it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValue {
    #[serde(rename = "type")]
    pub kind: MemoryAccessKind,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<SearchQuery>,
}

impl InputValue {
    pub fn new(kind: MemoryAccessKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            index: None,
            search_query: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_search_query(mut self, kind: MemoryAccessKind, key: impl Into<String>) -> Self {
        self.search_query = Some(SearchQuery {
            kind,
            key: key.into(),
        });
        self
    }
}

/// One bound variable a task consumes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub name: String,
    pub value: InputValue,
    pub required: bool,
}

impl Input {
    /// Bind `key` with an explicit access kind, naming the variable after the key
    pub fn new(key: impl Into<String>, kind: MemoryAccessKind, required: bool) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            value: InputValue::new(kind, key),
            required,
        }
    }

    /// Read a scalar slot
    pub fn read(key: impl Into<String>, required: bool) -> Self {
        Self::new(key, MemoryAccessKind::Read, required)
    }

    /// Pop the top of a collection slot
    pub fn pop(key: impl Into<String>, required: bool) -> Self {
        Self::new(key, MemoryAccessKind::Pop, required)
    }

    /// Peek at `index` in a collection slot
    pub fn peek(key: impl Into<String>, index: usize, required: bool) -> Self {
        let mut input = Self::new(key, MemoryAccessKind::Peek, required);
        input.value.index = Some(index);
        input
    }

    /// Read a whole collection slot
    pub fn get_all(key: impl Into<String>, required: bool) -> Self {
        Self::new(key, MemoryAccessKind::GetAll, required)
    }

    /// Read the length of a collection slot
    pub fn size(key: impl Into<String>, required: bool) -> Self {
        Self::new(key, MemoryAccessKind::Size, required)
    }

    /// Bind the variable `name` to a string literal
    pub fn string(name: impl Into<String>, literal: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            value: InputValue::new(MemoryAccessKind::Literal, literal),
            required,
        }
    }

    pub fn key(&self) -> &str {
        &self.value.key
    }
}

impl From<Input> for InputValue {
    fn from(input: Input) -> Self {
        input.value
    }
}

impl From<&Input> for InputValue {
    fn from(input: &Input) -> Self {
        input.value.clone()
    }
}

// ── Outputs ──────────────────────────────────────────────────────────

/// How a task's result lands in memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Overwrite a scalar slot
    Write,
    /// Insert into a collection slot
    Insert,
    /// Append to a collection slot
    Push,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Write => "write",
            OutputKind::Insert => "insert",
            OutputKind::Push => "push",
        }
    }

    /// Whether this output appends to a collection
    pub fn is_append(&self) -> bool {
        matches!(self, OutputKind::Insert | OutputKind::Push)
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A memory write performed after the task runs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "type")]
    pub kind: OutputKind,
    pub key: String,
    pub value: String,
}

impl Output {
    pub fn new(kind: OutputKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            value: RESULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn write(key: impl Into<String>) -> Self {
        Self::new(OutputKind::Write, key)
    }

    pub fn insert(key: impl Into<String>) -> Self {
        Self::new(OutputKind::Insert, key)
    }

    pub fn push(key: impl Into<String>) -> Self {
        Self::new(OutputKind::Push, key)
    }
}

// ── Task ─────────────────────────────────────────────────────────────

/// A node in the workflow graph
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    /// Prompt template with `{{name}}` placeholders
    pub prompt: String,
    #[serde(default)]
    pub inputs: Vec<Input>,
    pub operator: Operator,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

impl Task {
    /// The terminal task appended once when a workflow is finalized
    pub fn terminal() -> Self {
        Self {
            id: TaskId::terminal(),
            name: "Task".to_string(),
            description: "Task Description".to_string(),
            prompt: String::new(),
            inputs: Vec::new(),
            operator: Operator::End,
            outputs: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.id.is_terminal()
    }

    /// Keys this task writes, in declaration order
    pub fn output_keys(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|o| o.key.as_str())
    }

    /// Whether some input of this task reads `key`
    pub fn reads(&self, key: &str) -> bool {
        self.inputs.iter().any(|i| i.value.key == key)
    }
}
