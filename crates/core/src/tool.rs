//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are what let an agent act: query the university database, read
//! program documents, manage a calendar, search the web, or hand the
//! conversation to another agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::agent::AgentId;
use crate::error::ToolError;

/// One declared parameter of a tool.
///
/// `annotation` is the parameter's declared type name (`"str"`, `"i64"`,
/// `"Vec<String>"`, ...). The schema deriver maps it to a JSON type; a
/// missing or unrecognised annotation becomes `"string"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    /// Declared default. Any default, `null` included, makes the parameter optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ParamSpec {
    /// A parameter with no default value.
    pub fn required(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
            default: None,
        }
    }

    /// A parameter with a default value.
    pub fn optional(
        name: impl Into<String>,
        annotation: impl Into<String>,
        default: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
            default: Some(default),
        }
    }

    /// A parameter declared without any type annotation.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// What a tool call produced.
///
/// The dispatch loop matches on this exhaustively: data goes back to the
/// model as a tool result, a handoff switches the active agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A result value for the model.
    Data(serde_json::Value),

    /// Transfer control to another agent.
    Handoff(AgentId),
}

impl ToolOutput {
    /// A plain text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Data(serde_json::Value::String(text.into()))
    }

    /// Render a data value as tool-result content.
    ///
    /// Strings are passed through unquoted; everything else is compact JSON.
    pub fn render(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Value> for ToolOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::Data(value)
    }
}

/// The core Tool trait.
///
/// Each tool declares its signature explicitly; `SchemaRegistry` derives
/// the model-visible schema from it once per tool name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "web_search").
    fn name(&self) -> &str;

    /// Documentation shown to the model. Surrounding whitespace is trimmed
    /// during derivation.
    fn description(&self) -> &str {
        ""
    }

    /// Declared parameters, in order.
    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    /// Execute the tool with already-parsed JSON arguments.
    async fn execute(&self, arguments: serde_json::Value) -> std::result::Result<ToolOutput, ToolError>;
}
