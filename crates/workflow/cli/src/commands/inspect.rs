//! Document inspection command

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use workflow_types::{Edge, ReturnInput, Task, WorkflowDefinition};

/// Condensed view of a workflow document
#[derive(Debug, Serialize)]
pub struct WorkflowSummary {
    pub max_steps: u32,
    pub max_time: u32,
    pub tools: Vec<String>,
    pub memory_keys: Vec<String>,
    pub tasks: Vec<TaskSummary>,
    pub steps: Vec<StepSummary>,
    pub return_value: Option<ReturnSummary>,
}

#[derive(Debug, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub operator: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StepSummary {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReturnSummary {
    pub bindings: Vec<String>,
    pub to_json: bool,
    pub post_process: usize,
}

impl WorkflowSummary {
    pub fn from_definition(definition: &WorkflowDefinition) -> Self {
        Self {
            max_steps: definition.config.max_steps,
            max_time: definition.config.max_time,
            tools: definition.config.tools.clone(),
            memory_keys: definition.external_memory.keys().cloned().collect(),
            tasks: definition.tasks.iter().map(summarize_task).collect(),
            steps: definition.steps.iter().map(summarize_step).collect(),
            return_value: definition.return_value.as_ref().map(|spec| {
                let bindings = match &spec.input {
                    ReturnInput::Single(value) => vec![format!("{} {}", value.kind, value.key)],
                    ReturnInput::Many(values) => values
                        .iter()
                        .map(|v| format!("{} {}", v.kind, v.key))
                        .collect(),
                };
                ReturnSummary {
                    bindings,
                    to_json: spec.to_json,
                    post_process: spec.post_process.as_ref().map_or(0, Vec::len),
                }
            }),
        }
    }
}

fn summarize_task(task: &Task) -> TaskSummary {
    TaskSummary {
        id: task.id.to_string(),
        operator: task.operator.to_string(),
        inputs: task
            .inputs
            .iter()
            .map(|i| format!("{}:{}", i.value.kind, i.key()))
            .collect(),
        outputs: task
            .outputs
            .iter()
            .map(|o| format!("{}:{}", o.kind, o.key))
            .collect(),
    }
}

fn summarize_step(edge: &Edge) -> StepSummary {
    StepSummary {
        source: edge.source.to_string(),
        target: edge.target.to_string(),
        condition: edge.condition.as_ref().map(|c| {
            format!(
                "{} {} '{}' else {}",
                c.input.key, c.expression, c.expected, c.target_if_not
            )
        }),
        fallback: edge.fallback.as_ref().map(|f| f.to_string()),
    }
}

/// Load the document at `file` and print its summary
pub fn execute(file: &Path, format: OutputFormat) -> CliResult<()> {
    let definition = WorkflowDefinition::load(file)?;
    let summary = WorkflowSummary::from_definition(&definition);
    if !print_structured(&summary, format)? {
        print_table(&summary);
    }
    Ok(())
}

fn print_table(summary: &WorkflowSummary) {
    println!("{}", "Workflow".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  Limits: {} steps, {}s, tools [{}]",
        summary.max_steps,
        summary.max_time,
        summary.tools.join(", ")
    );
    if !summary.memory_keys.is_empty() {
        println!("  Memory: {}", summary.memory_keys.join(", "));
    }
    println!();

    println!("{}", "Tasks".bold());
    for task in &summary.tasks {
        println!("  {} {}", task.id.bold().yellow(), format!("({})", task.operator).dimmed());
        if !task.inputs.is_empty() {
            println!("      in:  {}", task.inputs.join(", "));
        }
        if !task.outputs.is_empty() {
            println!("      out: {}", task.outputs.join(", "));
        }
    }
    println!();

    println!("{}", "Steps".bold());
    for step in &summary.steps {
        println!("  {} {} {}", step.source, "→".dimmed(), step.target);
        if let Some(condition) = &step.condition {
            println!("      if {}", condition);
        }
        if let Some(fallback) = &step.fallback {
            println!("      fallback {}", fallback);
        }
    }
    println!();

    match &summary.return_value {
        Some(spec) => println!(
            "{}: {}{}",
            "Returns".bold(),
            spec.bindings.join(", "),
            if spec.to_json { " (json)" } else { "" }
        ),
        None => println!("{}: {}", "Returns".bold(), "not set".red()),
    }
}
