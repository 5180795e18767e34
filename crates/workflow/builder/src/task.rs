//! Task Assembler
//!
//! Turns a prompt template plus explicit bindings into a [`Task`]. Every
//! `{{name}}` placeholder becomes a required input name; placeholders the
//! tracker knows about are bound automatically with the slot's default
//! access kind.

use crate::errors::{BuildError, BuildResult};
use crate::template::extract_names;
use crate::tracker::MemoryTypeTracker;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use workflow_types::{Input, Operator, Output, Task, TaskId};

/// Default task name when the caller gives none
pub const DEFAULT_TASK_NAME: &str = "Task";

/// Default task description when the caller gives none
pub const DEFAULT_TASK_DESCRIPTION: &str = "Task Description";

// ── Prompt source ────────────────────────────────────────────────────

/// Where a task's template text comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptSource {
    Inline(String),
    File(PathBuf),
}

impl PromptSource {
    /// Pick the source from optional inline text and path; exactly one must be set
    pub fn from_parts(prompt: Option<String>, path: Option<PathBuf>) -> BuildResult<Self> {
        match (prompt, path) {
            (Some(prompt), None) => Ok(PromptSource::Inline(prompt)),
            (None, Some(path)) => Ok(PromptSource::File(path)),
            _ => Err(BuildError::MissingPromptSource),
        }
    }

    /// Produce the effective template text
    pub fn load(&self) -> BuildResult<String> {
        match self {
            PromptSource::Inline(prompt) => Ok(prompt.clone()),
            PromptSource::File(path) => read_prompt_file(path),
        }
    }
}

fn read_prompt_file(path: &Path) -> BuildResult<String> {
    std::fs::read_to_string(path).map_err(|source| BuildError::PromptFile {
        path: path.display().to_string(),
        source,
    })
}

// ── Draft task ───────────────────────────────────────────────────────

/// A task under construction
#[derive(Clone, Debug)]
pub struct DraftTask {
    id: TaskId,
    name: String,
    description: String,
    prompt: String,
    operator: Operator,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    required_inputs: Vec<String>,
}

/// Start a task from a template and explicit inputs
///
/// Inferred inputs come first, in order of first placeholder appearance,
/// followed by `explicit_inputs` in the order given. A placeholder already
/// covered by an explicit input is not inferred again.
pub fn new_task(
    id: impl Into<TaskId>,
    operator: Operator,
    source: &PromptSource,
    explicit_inputs: Vec<Input>,
    tracker: &MemoryTypeTracker,
) -> BuildResult<DraftTask> {
    let id = id.into();
    if id.as_str().is_empty() {
        return Err(BuildError::EmptyTaskId);
    }

    let prompt = source.load()?;
    let names = extract_names(&prompt);

    let mut inputs = Vec::with_capacity(names.len() + explicit_inputs.len());
    for name in &names {
        if explicit_inputs.iter().any(|i| i.key() == name) {
            continue;
        }
        if let Some(kind) = tracker.resolve_default_kind(name) {
            debug!(task = %id, key = %name, kind = %kind, "Inferred input from template");
            inputs.push(Input::new(name.clone(), kind, true));
        }
    }
    inputs.extend(explicit_inputs);

    if !id.is_terminal() {
        debug!(task = %id, placeholders = ?names, "Template scanned");
    }

    Ok(DraftTask {
        id,
        name: DEFAULT_TASK_NAME.to_string(),
        description: DEFAULT_TASK_DESCRIPTION.to_string(),
        prompt,
        operator,
        inputs,
        outputs: Vec::new(),
        required_inputs: names,
    })
}

impl DraftTask {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Placeholder names the finished task must bind
    pub fn required_inputs(&self) -> &[String] {
        &self.required_inputs
    }

    pub fn add_input(&mut self, input: Input) -> &mut Self {
        self.inputs.push(input);
        self
    }

    /// Append an output and record the slot's shape
    pub fn add_output(
        &mut self,
        output: Output,
        tracker: &mut MemoryTypeTracker,
    ) -> BuildResult<&mut Self> {
        tracker.record_output(&output.key, output.kind)?;
        self.outputs.push(output);
        Ok(self)
    }

    /// Required names with no input reading that key
    pub fn missing_inputs(&self) -> Vec<String> {
        self.required_inputs
            .iter()
            .filter(|name| !self.inputs.iter().any(|i| i.key() == name.as_str()))
            .cloned()
            .collect()
    }

    /// Finish the task
    pub fn build(self) -> BuildResult<Task> {
        if !self.id.is_terminal() {
            let missing = self.missing_inputs();
            if !missing.is_empty() {
                return Err(BuildError::MissingRequiredInputs {
                    task: self.id.to_string(),
                    missing,
                });
            }
            if self.outputs.is_empty() {
                warn!(
                    task = %self.id,
                    "Task has no outputs defined; its result is not stored anywhere"
                );
            }
        }

        Ok(Task {
            id: self.id,
            name: self.name,
            description: self.description,
            prompt: self.prompt,
            inputs: self.inputs,
            operator: self.operator,
            outputs: self.outputs,
        })
    }
}
