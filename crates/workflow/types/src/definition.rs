//! Workflow definitions: the document handed to the runtime
//!
//! A WorkflowDefinition is a directed graph where:
//! - Nodes are tasks (prompt templates plus memory bindings)
//! - Edges are steps (optionally condition-guarded transitions)
//!
//! The definition owns every task and edge. It is assembled through the
//! builder and treated as immutable once serialized.

use crate::{Config, Edge, InputValue, MemoryValue, Task, TaskId, WorkflowResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ── Workflow Definition ──────────────────────────────────────────────

/// The root aggregate of a workflow document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub config: Config,
    /// Initial memory contents
    #[serde(default)]
    pub external_memory: BTreeMap<String, MemoryValue>,
    pub tasks: Vec<Task>,
    pub steps: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<ReturnSpec>,
}

impl WorkflowDefinition {
    /// Create an empty definition
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_external_memory(mut self, memory: BTreeMap<String, MemoryValue>) -> Self {
        self.external_memory = memory;
        self
    }

    /// Append a task without graph checks
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Append a step without graph checks
    pub fn add_step(&mut self, edge: Edge) {
        self.steps.push(edge);
    }

    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn has_task(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|t| &t.id == id)
    }

    /// Get outgoing steps from a task
    pub fn outgoing_steps(&self, id: &TaskId) -> Vec<&Edge> {
        self.steps.iter().filter(|e| &e.source == id).collect()
    }

    /// Get incoming steps to a task
    pub fn incoming_steps(&self, id: &TaskId) -> Vec<&Edge> {
        self.steps.iter().filter(|e| &e.target == id).collect()
    }

    /// Every key written by some task, in declaration order, duplicates kept out
    pub fn output_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.tasks.iter().flat_map(Task::output_keys) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn terminal_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_terminal())
    }

    /// Total number of tasks, terminal included
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Total number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Serialize to compact JSON, omitting unset optional fields
    pub fn to_json(&self) -> WorkflowResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON, omitting unset optional fields
    pub fn to_json_pretty(&self) -> WorkflowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(document: &str) -> WorkflowResult<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Write the document as indented JSON
    pub fn save(&self, path: impl AsRef<Path>) -> WorkflowResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> WorkflowResult<Self> {
        let document = std::fs::read_to_string(path)?;
        Self::from_json(&document)
    }
}

// ── Return value ─────────────────────────────────────────────────────

/// What the runtime returns when the workflow completes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSpec {
    pub input: ReturnInput,
    /// Whether the runtime serializes the result as JSON
    #[serde(default)]
    pub to_json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_process: Option<Vec<PostProcess>>,
}

impl ReturnSpec {
    pub fn single(input: InputValue, to_json: bool) -> Self {
        Self {
            input: ReturnInput::Single(input),
            to_json,
            post_process: None,
        }
    }

    /// A composite return; always serialized as a JSON object
    pub fn many(inputs: Vec<InputValue>) -> Self {
        Self {
            input: ReturnInput::Many(inputs),
            to_json: true,
            post_process: None,
        }
    }

    pub fn with_post_process(mut self, step: PostProcess) -> Self {
        self.add_post_process(step);
        self
    }

    pub fn add_post_process(&mut self, step: PostProcess) {
        self.post_process.get_or_insert_with(Vec::new).push(step);
    }

    /// The memory keys this return reads
    pub fn keys(&self) -> Vec<&str> {
        match &self.input {
            ReturnInput::Single(input) => vec![input.key.as_str()],
            ReturnInput::Many(inputs) => inputs.iter().map(|i| i.key.as_str()).collect(),
        }
    }
}

/// One binding, or several combined into a JSON object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReturnInput {
    Single(InputValue),
    Many(Vec<InputValue>),
}

/// A string transformation applied to the returned value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcess {
    pub process_type: PostProcessKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lhs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhs: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcessKind {
    Replace,
    Append,
    Prepend,
    Trim,
    TrimStart,
    TrimEnd,
    ToLower,
    ToUpper,
}

impl PostProcess {
    pub fn new(process_type: PostProcessKind) -> Self {
        Self {
            process_type,
            lhs: None,
            rhs: None,
        }
    }

    /// Replace occurrences of `from` with `to`
    pub fn replace(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            process_type: PostProcessKind::Replace,
            lhs: Some(from.into()),
            rhs: Some(to.into()),
        }
    }

    pub fn append(suffix: impl Into<String>) -> Self {
        Self {
            process_type: PostProcessKind::Append,
            lhs: Some(suffix.into()),
            rhs: None,
        }
    }

    pub fn prepend(prefix: impl Into<String>) -> Self {
        Self {
            process_type: PostProcessKind::Prepend,
            lhs: Some(prefix.into()),
            rhs: None,
        }
    }

    pub fn trim() -> Self {
        Self::new(PostProcessKind::Trim)
    }

    pub fn trim_start() -> Self {
        Self::new(PostProcessKind::TrimStart)
    }

    pub fn trim_end() -> Self {
        Self::new(PostProcessKind::TrimEnd)
    }

    pub fn to_lower() -> Self {
        Self::new(PostProcessKind::ToLower)
    }

    pub fn to_upper() -> Self {
        Self::new(PostProcessKind::ToUpper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Input, MemoryAccessKind, Operator, Output};
    use serde_json::json;

    fn make_simple_workflow() -> WorkflowDefinition {
        let mut wf = WorkflowDefinition::new(Config::default());
        wf.add_task(Task {
            id: TaskId::new("write_poem"),
            name: "Task".into(),
            description: "Task Description".into(),
            prompt: "Write a poem about {{topic}}".into(),
            inputs: vec![Input::read("topic", true)],
            operator: Operator::Generation,
            outputs: vec![Output::write("poem")],
        });
        wf.add_task(Task::terminal());
        wf.add_step(Edge::to_end("write_poem"));
        wf.return_value = Some(ReturnSpec::single(
            InputValue::new(MemoryAccessKind::Read, "poem"),
            false,
        ));
        wf
    }

    #[test]
    fn test_create_workflow_definition() {
        let wf = make_simple_workflow();
        assert_eq!(wf.task_count(), 2);
        assert_eq!(wf.step_count(), 1);
        assert!(wf.has_task(&TaskId::new("write_poem")));
        assert!(wf.terminal_task().is_some());
        assert_eq!(wf.output_keys(), vec!["poem"]);
    }

    #[test]
    fn test_outgoing_incoming_steps() {
        let wf = make_simple_workflow();
        let out = wf.outgoing_steps(&TaskId::new("write_poem"));
        assert_eq!(out.len(), 1);
        assert!(out[0].is_terminal());

        let incoming = wf.incoming_steps(&TaskId::terminal());
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].source, "write_poem");
    }

    #[test]
    fn test_document_shape() {
        let wf = make_simple_workflow();
        let value: serde_json::Value = serde_json::from_str(&wf.to_json().unwrap()).unwrap();
        assert_eq!(value["config"]["max_steps"], json!(50));
        assert_eq!(value["external_memory"], json!({}));
        assert_eq!(value["tasks"][1]["id"], json!("_end"));
        assert_eq!(value["tasks"][1]["operator"], json!("end"));
        assert_eq!(value["steps"][0], json!({"source": "write_poem", "target": "_end"}));
        assert_eq!(
            value["return_value"],
            json!({"input": {"type": "read", "key": "poem"}, "to_json": false})
        );
    }

    #[test]
    fn test_unset_return_value_is_omitted() {
        let wf = WorkflowDefinition::new(Config::default());
        let value: serde_json::Value = serde_json::from_str(&wf.to_json().unwrap()).unwrap();
        assert!(value.get("return_value").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.json");

        let wf = make_simple_workflow();
        wf.save(&path).unwrap();
        let loaded = WorkflowDefinition::load(&path).unwrap();
        assert_eq!(loaded, wf);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = WorkflowDefinition::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(crate::WorkflowError::Io(_))));
    }

    #[test]
    fn test_multi_key_return() {
        let spec = ReturnSpec::many(vec![
            InputValue::new(MemoryAccessKind::Read, "a"),
            InputValue::new(MemoryAccessKind::GetAll, "b"),
        ]);
        assert!(spec.to_json);
        assert_eq!(spec.keys(), vec!["a", "b"]);

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value["input"],
            json!([{"type": "read", "key": "a"}, {"type": "get_all", "key": "b"}])
        );
        let parsed: ReturnSpec = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_post_process() {
        let spec = ReturnSpec::single(InputValue::new(MemoryAccessKind::Read, "a"), false)
            .with_post_process(PostProcess::replace("\n", " "))
            .with_post_process(PostProcess::trim());
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value["post_process"],
            json!([
                {"process_type": "replace", "lhs": "\n", "rhs": " "},
                {"process_type": "trim"}
            ])
        );
    }
}
