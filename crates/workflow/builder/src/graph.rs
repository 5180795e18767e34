//! Graph Assembler
//!
//! Accumulates tasks and edges for one workflow and finalizes them into a
//! [`WorkflowDefinition`]. Finalizing consumes the assembler, so the
//! terminal task is appended exactly once.

use crate::errors::{BuildError, BuildResult};
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};
use workflow_types::{Edge, Task, TaskId, WorkflowDefinition};

#[derive(Clone, Debug, Default)]
pub struct GraphAssembler {
    definition: WorkflowDefinition,
}

impl GraphAssembler {
    /// Start from a definition carrying config, memory and return value
    pub fn new(definition: WorkflowDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut WorkflowDefinition {
        &mut self.definition
    }

    pub fn has_task(&self, id: &TaskId) -> bool {
        self.definition.has_task(id)
    }

    pub fn task_count(&self) -> usize {
        self.definition.task_count()
    }

    /// Check an id before a task is assembled under it
    pub fn check_task_id(&self, id: &TaskId) -> BuildResult<()> {
        if id.as_str().is_empty() {
            return Err(BuildError::EmptyTaskId);
        }
        if id.is_terminal() {
            return Err(BuildError::ReservedTaskId(id.to_string()));
        }
        if self.has_task(id) {
            return Err(BuildError::DuplicateTaskId(id.to_string()));
        }
        Ok(())
    }

    pub fn add_task(&mut self, task: Task) -> BuildResult<()> {
        self.check_task_id(&task.id)?;
        info!(
            task = %task.id,
            operator = %task.operator,
            inputs = task.inputs.len(),
            outputs = task.outputs.len(),
            "Task added"
        );
        self.definition.add_task(task);
        Ok(())
    }

    /// Append an edge whose endpoints are already declared
    pub fn add_edge(&mut self, edge: Edge) -> BuildResult<()> {
        if !self.has_task(&edge.source) {
            return Err(BuildError::UnknownSourceTask(edge.source.to_string()));
        }
        self.check_target(&edge.target)?;
        if let Some(condition) = &edge.condition {
            self.check_target(&condition.target_if_not)?;
        }
        if let Some(fallback) = &edge.fallback {
            self.check_target(fallback)?;
        }
        self.definition.add_step(edge);
        Ok(())
    }

    fn check_target(&self, target: &TaskId) -> BuildResult<()> {
        if target.is_terminal() || self.has_task(target) {
            Ok(())
        } else {
            Err(BuildError::UnknownTargetTask(target.to_string()))
        }
    }

    /// Close the graph and hand back the finished definition
    ///
    /// 1. Append the terminal task.
    /// 2. Fail with `DanglingTask` if some task is never an edge source.
    /// 3. Fail with `InvalidEdgeTarget` if some edge points nowhere.
    /// 4. Connect the last task to the terminal when no edge does.
    /// 5. Warn when no return value is configured.
    pub fn finalize(self) -> BuildResult<WorkflowDefinition> {
        let mut definition = self.definition;
        let last_task = definition.tasks.last().map(|t| t.id.clone());

        definition.add_task(Task::terminal());

        check_dangling(&definition)?;
        check_edge_targets(&definition)?;

        if let Some(last) = last_task {
            let connected = definition
                .steps
                .iter()
                .any(|e| e.source == last && e.is_terminal());
            if !connected {
                definition.add_step(Edge::to_end(last));
            }
        }

        if definition.return_value.is_none() {
            warn!(
                candidates = ?definition.output_keys(),
                "No return value set for the workflow; select one of the declared output keys"
            );
        }

        info!(
            tasks = definition.task_count(),
            steps = definition.step_count(),
            "Workflow finalized"
        );
        Ok(definition)
    }
}

fn check_dangling(definition: &WorkflowDefinition) -> BuildResult<()> {
    let sources: HashSet<&TaskId> = definition.steps.iter().map(|e| &e.source).collect();
    let dangling: Vec<String> = definition
        .tasks
        .iter()
        .filter(|t| !t.is_terminal() && !sources.contains(&t.id))
        .map(|t| t.id.to_string())
        .collect();

    if dangling.is_empty() {
        Ok(())
    } else {
        Err(BuildError::DanglingTask(dangling))
    }
}

fn check_edge_targets(definition: &WorkflowDefinition) -> BuildResult<()> {
    let invalid: BTreeSet<String> = definition
        .steps
        .iter()
        .filter(|e| !e.target.is_terminal() && !definition.has_task(&e.target))
        .map(|e| e.target.to_string())
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(BuildError::InvalidEdgeTarget(invalid.into_iter().collect()))
    }
}
