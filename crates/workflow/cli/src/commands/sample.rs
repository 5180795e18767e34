//! Reference workflow generation

use crate::error::CliResult;
use crate::output::OutputFormat;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;
use workflow_builder::{BuildResult, ConditionBuilder, TaskOptions, WorkflowBuilder};
use workflow_types::{Edge, Expression, Input, MemoryValue, Operator, Output, WorkflowDefinition};

/// Generate a search query for two topics, search, and loop until the
/// evaluator accepts the result.
pub fn search_query_workflow() -> BuildResult<WorkflowDefinition> {
    let memory: BTreeMap<String, MemoryValue> = [
        ("topic_1".to_string(), MemoryValue::from("Linear Algebra")),
        ("topic_2".to_string(), MemoryValue::from("CUDA")),
    ]
    .into_iter()
    .collect();
    let mut builder = WorkflowBuilder::with_memory(memory)?;

    builder.generative_step(
        "Write down a search query related to following topics: {{topic_1}} and {{topic_2}}. \
         If any, avoid asking questions asked before: {{history}}",
        Operator::Generation,
        TaskOptions::new()
            .with_id("create_query")
            .with_input(Input::get_all("history", false))
            .with_output(Output::write("search_query")),
    )?;
    builder.generative_step(
        "{{search_query}}",
        Operator::FunctionCalling,
        TaskOptions::new()
            .with_id("search")
            .with_outputs([Output::write("result"), Output::push("history")]),
    )?;
    builder.generative_step(
        "Evaluate if search result is related and high quality to given question by saying \
         Yes or No. Question: {{search_query}} , Search Result: {{result}}. \
         Only output Yes or No and nothing else.",
        Operator::Generation,
        TaskOptions::new()
            .with_id("evaluate")
            .with_output(Output::write("is_valid")),
    )?;

    builder.flow([
        Edge::new("create_query", "search"),
        Edge::new("search", "evaluate"),
        Edge::to_end("evaluate").with_condition(ConditionBuilder::build(
            "Yes",
            Expression::Contains,
            Input::read("is_valid", true),
            "create_query",
        )),
    ])?;
    builder.set_return_value("result")?;
    builder.build()
}

/// Build the reference workflow and print it, or save it to `out`
pub fn execute(out: Option<&Path>, format: OutputFormat) -> CliResult<()> {
    let workflow = search_query_workflow()?;

    if let Some(path) = out {
        workflow.save(path)?;
        println!(
            "{} {} ({} tasks, {} steps)",
            "Saved".green(),
            path.display().to_string().bold(),
            workflow.task_count(),
            workflow.step_count()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&workflow)?),
        OutputFormat::Json | OutputFormat::Table => println!("{}", workflow.to_json_pretty()?),
    }
    Ok(())
}
