//! Workflow configuration and custom tool descriptors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Default step budget for a workflow
pub const DEFAULT_MAX_STEPS: u32 = 50;

/// Default time budget for a workflow, in seconds
pub const DEFAULT_MAX_TIME: u32 = 200;

/// Tool selector that enables every built-in tool
pub const ALL_TOOLS: &str = "ALL";

/// Runtime limits and tool selection for a workflow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of task executions
    pub max_steps: u32,
    /// Maximum wall-clock time (seconds)
    pub max_time: u32,
    /// Built-in tools the runtime may expose
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tools: Option<Vec<CustomToolSpec>>,
    /// Generation budget per model call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_time: DEFAULT_MAX_TIME,
            tools: vec![ALL_TOOLS.to_string()],
            custom_tools: None,
            max_tokens: None,
        }
    }
}

impl Config {
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_time(mut self, max_time: u32) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom_tool(mut self, tool: CustomToolSpec) -> Self {
        self.add_custom_tool(tool);
        self
    }

    pub fn add_custom_tool(&mut self, tool: CustomToolSpec) {
        self.custom_tools.get_or_insert_with(Vec::new).push(tool);
    }
}

// ── Custom tools ─────────────────────────────────────────────────────

/// A tool declared by the workflow author rather than built into the runtime
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomToolSpec {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub mode: ToolMode,
}

impl CustomToolSpec {
    /// A tool whose calls the runtime hands back to the caller
    pub fn custom(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mode: ToolMode::Custom { parameters },
        }
    }

    /// A tool the runtime executes as an HTTP request
    pub fn http_request(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        method: HttpMethod,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mode: ToolMode::HttpRequest {
                url: url.into(),
                method,
                headers: None,
                body: None,
            },
        }
    }

    /// Add a header to an HTTP tool; ignored for custom tools
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let ToolMode::HttpRequest { headers, .. } = &mut self.mode {
            headers
                .get_or_insert_with(BTreeMap::new)
                .insert(key.into(), value.into());
        }
        self
    }

    /// Set the request body of an HTTP tool; ignored for custom tools
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        if let ToolMode::HttpRequest { body: slot, .. } = &mut self.mode {
            *slot = Some(body);
        }
        self
    }

    /// The wire name of this tool's mode
    pub fn mode_name(&self) -> &'static str {
        match self.mode {
            ToolMode::Custom { .. } => "custom",
            ToolMode::HttpRequest { .. } => "http_request",
        }
    }
}

/// How the runtime services a custom tool
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ToolMode {
    Custom {
        parameters: ToolParameters,
    },
    HttpRequest {
        url: String,
        method: HttpMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<BTreeMap<String, String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Map<String, Value>>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// JSON-schema style parameter block of a custom tool
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, ParameterProperty>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            kind: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

impl ToolParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            ParameterProperty {
                kind: kind.into(),
                description: description.into(),
            },
        );
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterProperty {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}
