//! Validator: checks serialized workflow documents against the document contract
//!
//! Validation is purely structural. It does not re-run graph completeness
//! checks, so a document produced outside the builder can be schema-valid
//! yet have dangling tasks. Unknown properties are allowed everywhere.

use crate::errors::{SchemaError, SchemaResult};
use serde_json::{Map, Value};
use tracing::debug;
use workflow_types::WorkflowDefinition;

const ACCESS_KINDS: [&str; 7] = ["input", "read", "pop", "peek", "get_all", "size", "string"];

const OPERATORS: [&str; 7] = [
    "generation",
    "function_calling",
    "function_calling_raw",
    "check",
    "search",
    "sample",
    "end",
];

const OUTPUT_KINDS: [&str; 3] = ["write", "insert", "push"];

const EXPRESSIONS: [&str; 9] = [
    "Equal",
    "NotEqual",
    "Contains",
    "NotContains",
    "GreaterThan",
    "LessThan",
    "GreaterThanOrEqual",
    "LessThanOrEqual",
    "HaveSimilar",
];

const POST_PROCESS_KINDS: [&str; 8] = [
    "replace",
    "append",
    "prepend",
    "trim",
    "trim_start",
    "trim_end",
    "to_lower",
    "to_upper",
];

/// Parse and validate a serialized document
pub fn validate(document: &str) -> SchemaResult<()> {
    let value: Value = serde_json::from_str(document)
        .map_err(|e| SchemaError::MalformedDocument(e.to_string()))?;
    validate_value(&value)
}

/// Validate an already parsed document
pub fn validate_value(document: &Value) -> SchemaResult<()> {
    let result = validate_document(document);
    match &result {
        Ok(()) => debug!("Document matches the workflow schema"),
        Err(err) => debug!(error = %err, "Document does not match the workflow schema"),
    }
    result
}

/// Serialize a definition and validate the result
pub fn validate_definition(definition: &WorkflowDefinition) -> SchemaResult<()> {
    let value = serde_json::to_value(definition)
        .map_err(|e| SchemaError::MalformedDocument(e.to_string()))?;
    validate_value(&value)
}

fn validate_document(document: &Value) -> SchemaResult<()> {
    let root = expect_object(document, "$")?;
    require_fields(root, "$", &["config", "tasks", "steps", "return_value"])?;

    validate_config(&root["config"], "$.config")?;
    if let Some(memory) = root.get("external_memory") {
        validate_external_memory(memory, "$.external_memory")?;
    }
    validate_tasks(&root["tasks"], "$.tasks")?;
    validate_steps(&root["steps"], "$.steps")?;
    validate_return_value(&root["return_value"], "$.return_value")?;
    Ok(())
}

// ── Sections ─────────────────────────────────────────────────────────

fn validate_config(value: &Value, path: &str) -> SchemaResult<()> {
    let config = expect_object(value, path)?;
    require_fields(config, path, &["max_steps", "max_time"])?;

    expect_count(&config["max_steps"], &field_path(path, "max_steps"))?;
    expect_count(&config["max_time"], &field_path(path, "max_time"))?;

    if let Some(tools) = config.get("tools") {
        let tools_path = field_path(path, "tools");
        for (i, tool) in expect_array(tools, &tools_path)?.iter().enumerate() {
            expect_string(tool, &index_path(&tools_path, i))?;
        }
    }
    if let Some(custom_tools) = config.get("custom_tools") {
        let tools_path = field_path(path, "custom_tools");
        for (i, tool) in expect_array(custom_tools, &tools_path)?.iter().enumerate() {
            validate_custom_tool(tool, &index_path(&tools_path, i))?;
        }
    }
    if let Some(max_tokens) = config.get("max_tokens") {
        if !max_tokens.is_null() {
            expect_count(max_tokens, &field_path(path, "max_tokens"))?;
        }
    }
    Ok(())
}

fn validate_custom_tool(value: &Value, path: &str) -> SchemaResult<()> {
    let tool = expect_object(value, path)?;
    require_fields(tool, path, &["name", "description", "mode"])?;
    optional_strings(tool, path, &["name", "description", "mode", "url", "method"])?;
    for field in ["headers", "body"] {
        if let Some(value) = tool.get(field) {
            expect_object(value, &field_path(path, field))?;
        }
    }
    Ok(())
}

fn validate_external_memory(value: &Value, path: &str) -> SchemaResult<()> {
    for (key, slot) in expect_object(value, path)? {
        let slot_path = field_path(path, key);
        match slot {
            Value::String(_) => {}
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !(item.is_string() || item.is_object()) {
                        return Err(SchemaError::mismatch(
                            &index_path(&slot_path, i),
                            "expected a string or an object",
                        ));
                    }
                }
            }
            other => {
                return Err(SchemaError::mismatch(
                    &slot_path,
                    format!("expected a string or an array, found {}", type_name(other)),
                ))
            }
        }
    }
    Ok(())
}

fn validate_tasks(value: &Value, path: &str) -> SchemaResult<()> {
    for (i, task) in expect_array(value, path)?.iter().enumerate() {
        validate_task(task, &index_path(path, i))?;
    }
    Ok(())
}

fn validate_task(value: &Value, path: &str) -> SchemaResult<()> {
    let task = expect_object(value, path)?;
    require_fields(task, path, &["id", "name", "description", "prompt", "operator"])?;
    optional_strings(task, path, &["id", "name", "description", "prompt"])?;
    expect_one_of(&task["operator"], &field_path(path, "operator"), &OPERATORS)?;

    if let Some(inputs) = task.get("inputs") {
        let inputs_path = field_path(path, "inputs");
        for (i, input) in expect_array(inputs, &inputs_path)?.iter().enumerate() {
            validate_input(input, &index_path(&inputs_path, i))?;
        }
    }
    if let Some(outputs) = task.get("outputs") {
        let outputs_path = field_path(path, "outputs");
        for (i, output) in expect_array(outputs, &outputs_path)?.iter().enumerate() {
            validate_output(output, &index_path(&outputs_path, i))?;
        }
    }
    Ok(())
}

fn validate_input(value: &Value, path: &str) -> SchemaResult<()> {
    let input = expect_object(value, path)?;
    require_fields(input, path, &["name", "value", "required"])?;
    expect_string(&input["name"], &field_path(path, "name"))?;
    expect_bool(&input["required"], &field_path(path, "required"))?;

    let value_path = field_path(path, "value");
    let access = validate_access(&input["value"], &value_path)?;
    if let Some(index) = access.get("index") {
        if !index.is_null() {
            expect_integer(index, &field_path(&value_path, "index"))?;
        }
    }
    if let Some(query) = access.get("search_query") {
        validate_access(query, &field_path(&value_path, "search_query"))?;
    }
    Ok(())
}

fn validate_output(value: &Value, path: &str) -> SchemaResult<()> {
    let output = expect_object(value, path)?;
    require_fields(output, path, &["type", "key", "value"])?;
    expect_one_of(&output["type"], &field_path(path, "type"), &OUTPUT_KINDS)?;
    optional_strings(output, path, &["key", "value"])?;
    Ok(())
}

fn validate_steps(value: &Value, path: &str) -> SchemaResult<()> {
    for (i, step) in expect_array(value, path)?.iter().enumerate() {
        validate_step(step, &index_path(path, i))?;
    }
    Ok(())
}

fn validate_step(value: &Value, path: &str) -> SchemaResult<()> {
    let step = expect_object(value, path)?;
    require_fields(step, path, &["source", "target"])?;
    optional_strings(step, path, &["source", "target", "fallback"])?;

    if let Some(condition) = step.get("condition") {
        let condition_path = field_path(path, "condition");
        let condition = expect_object(condition, &condition_path)?;
        require_fields(
            condition,
            &condition_path,
            &["input", "expected", "expression", "target_if_not"],
        )?;
        validate_access(&condition["input"], &field_path(&condition_path, "input"))?;
        optional_strings(condition, &condition_path, &["expected", "target_if_not"])?;
        expect_one_of(
            &condition["expression"],
            &field_path(&condition_path, "expression"),
            &EXPRESSIONS,
        )?;
    }
    Ok(())
}

fn validate_return_value(value: &Value, path: &str) -> SchemaResult<()> {
    let spec = expect_object(value, path)?;
    require_fields(spec, path, &["input"])?;

    let input_path = field_path(path, "input");
    match &spec["input"] {
        Value::Array(bindings) => {
            for (i, binding) in bindings.iter().enumerate() {
                validate_access(binding, &index_path(&input_path, i))?;
            }
        }
        single => {
            validate_access(single, &input_path)?;
        }
    }

    if let Some(to_json) = spec.get("to_json") {
        expect_bool(to_json, &field_path(path, "to_json"))?;
    }
    if let Some(steps) = spec.get("post_process") {
        let steps_path = field_path(path, "post_process");
        for (i, step) in expect_array(steps, &steps_path)?.iter().enumerate() {
            let step_path = index_path(&steps_path, i);
            let step = expect_object(step, &step_path)?;
            require_fields(step, &step_path, &["process_type"])?;
            expect_one_of(
                &step["process_type"],
                &field_path(&step_path, "process_type"),
                &POST_PROCESS_KINDS,
            )?;
            optional_strings(step, &step_path, &["lhs", "rhs"])?;
        }
    }
    Ok(())
}

/// A `{type, key}` memory access
fn validate_access<'a>(value: &'a Value, path: &str) -> SchemaResult<&'a Map<String, Value>> {
    let access = expect_object(value, path)?;
    require_fields(access, path, &["type", "key"])?;
    expect_one_of(&access["type"], &field_path(path, "type"), &ACCESS_KINDS)?;
    expect_string(&access["key"], &field_path(path, "key"))?;
    Ok(access)
}

// ── Primitive checks ─────────────────────────────────────────────────

fn field_path(path: &str, field: &str) -> String {
    format!("{}.{}", path, field)
}

fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require_fields(object: &Map<String, Value>, path: &str, fields: &[&str]) -> SchemaResult<()> {
    for field in fields {
        if !object.contains_key(*field) {
            return Err(SchemaError::mismatch(
                path,
                format!("missing required property '{}'", field),
            ));
        }
    }
    Ok(())
}

/// Check that each present field is a string
fn optional_strings(object: &Map<String, Value>, path: &str, fields: &[&str]) -> SchemaResult<()> {
    for field in fields {
        if let Some(value) = object.get(*field) {
            expect_string(value, &field_path(path, field))?;
        }
    }
    Ok(())
}

fn expect_object<'a>(value: &'a Value, path: &str) -> SchemaResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        SchemaError::mismatch(path, format!("expected an object, found {}", type_name(value)))
    })
}

fn expect_array<'a>(value: &'a Value, path: &str) -> SchemaResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        SchemaError::mismatch(path, format!("expected an array, found {}", type_name(value)))
    })
}

fn expect_string<'a>(value: &'a Value, path: &str) -> SchemaResult<&'a str> {
    value.as_str().ok_or_else(|| {
        SchemaError::mismatch(path, format!("expected a string, found {}", type_name(value)))
    })
}

fn expect_bool(value: &Value, path: &str) -> SchemaResult<bool> {
    value.as_bool().ok_or_else(|| {
        SchemaError::mismatch(path, format!("expected a boolean, found {}", type_name(value)))
    })
}

/// An integer; integral floats such as `50.0` count
fn expect_integer(value: &Value, path: &str) -> SchemaResult<f64> {
    let number = match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i as f64)
            .or_else(|| n.as_u64().map(|u| u as f64))
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0)),
        _ => None,
    };
    number.ok_or_else(|| {
        SchemaError::mismatch(path, format!("expected an integer, found {}", value))
    })
}

/// A non-negative integer
fn expect_count(value: &Value, path: &str) -> SchemaResult<()> {
    let number = expect_integer(value, path)?;
    if number < 0.0 {
        return Err(SchemaError::mismatch(
            path,
            format!("{} is less than the minimum of 0", value),
        ));
    }
    Ok(())
}

fn expect_one_of(value: &Value, path: &str, allowed: &[&str]) -> SchemaResult<()> {
    let text = expect_string(value, path)?;
    if allowed.contains(&text) {
        Ok(())
    } else {
        Err(SchemaError::mismatch(
            path,
            format!("'{}' is not one of [{}]", text, allowed.join(", ")),
        ))
    }
}
