//! WorkflowBuilder: the incremental construction facade
//!
//! Owns one memory tracker and one graph assembler. Steps are assembled as
//! soon as they are declared; `build` finalizes the graph and consumes the
//! builder.

use crate::errors::{BuildError, BuildResult};
use crate::graph::GraphAssembler;
use crate::resolver::resolve_return;
use crate::task::{new_task, PromptSource, DEFAULT_TASK_DESCRIPTION, DEFAULT_TASK_NAME};
use crate::tracker::MemoryTypeTracker;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;
use workflow_types::{
    Config, CustomToolSpec, Edge, Input, MemoryValue, Operator, Output, PostProcess, TaskId,
    WorkflowDefinition,
};

// ── Task options ─────────────────────────────────────────────────────

/// Per-step options
///
/// | field         | default              |
/// |---------------|----------------------|
/// | `id`          | current task count   |
/// | `name`        | `"Task"`             |
/// | `description` | `"Task Description"` |
/// | `prompt`      | none                 |
/// | `path`        | none                 |
/// | `inputs`      | empty                |
/// | `outputs`     | empty                |
///
/// [`WorkflowBuilder::step`] needs exactly one of `prompt` and `path`;
/// the prompt-taking helpers fill `prompt` themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskOptions {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub prompt: Option<String>,
    pub path: Option<PathBuf>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            id: None,
            name: DEFAULT_TASK_NAME.to_string(),
            description: DEFAULT_TASK_DESCRIPTION.to_string(),
            prompt: None,
            path: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = Input>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = Output>) -> Self {
        self.outputs.extend(outputs);
        self
    }
}

// ── Builder ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct WorkflowBuilder {
    tracker: MemoryTypeTracker,
    graph: GraphAssembler,
}

impl WorkflowBuilder {
    /// A builder with empty memory and default config
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose memory is seeded with classified values
    pub fn with_memory(memory: BTreeMap<String, MemoryValue>) -> BuildResult<Self> {
        let mut tracker = MemoryTypeTracker::new();
        for (key, value) in &memory {
            tracker.seed(key.clone(), value)?;
        }
        let definition = WorkflowDefinition::default().with_external_memory(memory);
        Ok(Self {
            tracker,
            graph: GraphAssembler::new(definition),
        })
    }

    /// A builder seeded from a raw JSON object
    pub fn from_json_memory(memory: Map<String, Value>) -> BuildResult<Self> {
        let mut tracker = MemoryTypeTracker::new();
        let mut seeds = BTreeMap::new();
        for (key, value) in memory {
            let seed = tracker.seed_json(&key, value)?;
            seeds.insert(key, seed);
        }
        let definition = WorkflowDefinition::default().with_external_memory(seeds);
        Ok(Self {
            tracker,
            graph: GraphAssembler::new(definition),
        })
    }

    pub fn tracker(&self) -> &MemoryTypeTracker {
        &self.tracker
    }

    /// The definition assembled so far, without the terminal task
    pub fn definition(&self) -> &WorkflowDefinition {
        self.graph.definition()
    }

    // ── Steps ────────────────────────────────────────────────────────

    /// Add a step that calls a language model
    ///
    /// `operator` is one of generation, function calling (executed or raw)
    /// or sampling.
    pub fn generative_step(
        &mut self,
        prompt: impl Into<String>,
        operator: Operator,
        options: TaskOptions,
    ) -> BuildResult<TaskId> {
        if matches!(operator, Operator::Search | Operator::Check | Operator::End) {
            return Err(BuildError::UnsupportedOperator {
                operator,
                context: "a generative step",
            });
        }
        self.step(operator, options.with_prompt(prompt))
    }

    /// Add a web search step driven by `query`
    pub fn search_step(
        &mut self,
        query: impl Into<String>,
        options: TaskOptions,
    ) -> BuildResult<TaskId> {
        self.step(Operator::Search, options.with_prompt(query))
    }

    /// Add a step with any operator; returns the task's id
    ///
    /// The terminal operator is reserved for the task `build` appends, and
    /// `check` is only read back from existing documents.
    pub fn step(&mut self, operator: Operator, options: TaskOptions) -> BuildResult<TaskId> {
        if matches!(operator, Operator::Check | Operator::End) {
            return Err(BuildError::UnsupportedOperator {
                operator,
                context: "a declared step",
            });
        }
        let TaskOptions {
            id,
            name,
            description,
            prompt,
            path,
            inputs,
            outputs,
        } = options;

        let id = match id {
            Some(id) => TaskId::new(id),
            None => TaskId::new(self.graph.task_count().to_string()),
        };
        self.graph.check_task_id(&id)?;

        // Shapes are committed only once the task is accepted
        let mut tracker = self.tracker.clone();
        let source = PromptSource::from_parts(prompt, path)?;
        let mut draft = new_task(id.clone(), operator, &source, inputs, &tracker)?
            .with_name(name)
            .with_description(description);
        for output in outputs {
            draft.add_output(output, &mut tracker)?;
        }

        self.graph.add_task(draft.build()?)?;
        self.tracker = tracker;
        Ok(id)
    }

    // ── Flow ─────────────────────────────────────────────────────────

    /// Append edges in order; stops at the first invalid edge
    pub fn flow(&mut self, edges: impl IntoIterator<Item = Edge>) -> BuildResult<()> {
        for edge in edges {
            self.graph.add_edge(edge)?;
        }
        Ok(())
    }

    // ── Return value ─────────────────────────────────────────────────

    pub fn set_return_value(&mut self, key: &str) -> BuildResult<()> {
        self.set_return_values(&[key])
    }

    /// Return several keys combined into one JSON object
    pub fn set_return_values<S: AsRef<str>>(&mut self, keys: &[S]) -> BuildResult<()> {
        let definition = self.graph.definition();
        let declared = definition.output_keys();
        let spec = resolve_return(keys, &declared, &self.tracker)?;
        debug!(keys = ?spec.keys(), to_json = spec.to_json, "Return value set");
        self.graph.definition_mut().return_value = Some(spec);
        Ok(())
    }

    /// Append a post-processing step to the return value
    pub fn add_post_process(&mut self, step: PostProcess) -> BuildResult<()> {
        let spec = self
            .graph
            .definition_mut()
            .return_value
            .as_mut()
            .ok_or(BuildError::NoReturnValue)?;
        spec.add_post_process(step);
        Ok(())
    }

    // ── Config ───────────────────────────────────────────────────────

    fn config_mut(&mut self) -> &mut Config {
        &mut self.graph.definition_mut().config
    }

    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.config_mut().max_steps = max_steps;
    }

    pub fn set_max_time(&mut self, max_time: u32) {
        self.config_mut().max_time = max_time;
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.config_mut().max_tokens = Some(max_tokens);
    }

    pub fn set_tools<I, S>(&mut self, tools: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_mut().tools = tools.into_iter().map(Into::into).collect();
    }

    pub fn add_custom_tool(&mut self, tool: CustomToolSpec) {
        self.config_mut().add_custom_tool(tool);
    }

    // ── Build ────────────────────────────────────────────────────────

    /// Finalize the workflow
    pub fn build(self) -> BuildResult<WorkflowDefinition> {
        self.graph.finalize()
    }
}
