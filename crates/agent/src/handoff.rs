//! Handoff tools: how one agent passes the conversation to another.

use async_trait::async_trait;
use switchyard_core::agent::AgentId;
use switchyard_core::error::ToolError;
use switchyard_core::tool::{Tool, ToolOutput};

/// A zero-parameter tool that transfers control to `target`.
///
/// Holds only the target's id, so agents can hand off to each other in
/// cycles. Whatever arguments the model sends are ignored.
pub struct HandoffTool {
    name: String,
    description: String,
    target: AgentId,
}

impl HandoffTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target: impl Into<AgentId>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            target: target.into(),
        }
    }

    pub fn target(&self) -> &AgentId {
        &self.target
    }
}

#[async_trait]
impl Tool for HandoffTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::Handoff(self.target.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchyard_core::derive_schema;

    #[tokio::test]
    async fn returns_target_and_ignores_arguments() {
        let tool = HandoffTool::new("transfer_to_db_agent", "Query the database.", "db");
        for args in [json!({}), json!({"reason": "needs data", "n": 3})] {
            assert_eq!(
                tool.execute(args).await.unwrap(),
                ToolOutput::Handoff(AgentId::from("db"))
            );
        }
        assert_eq!(tool.target().as_str(), "db");
    }

    #[test]
    fn schema_has_no_parameters() {
        let tool = HandoffTool::new(
            "transfer_to_calendar_agent",
            "\n    Call this agent for calendar questions.\n    ",
            "calendar",
        );
        let schema = derive_schema(&tool).unwrap();
        assert!(schema.parameters.is_empty());
        assert_eq!(schema.description, "Call this agent for calendar questions.");
        assert_eq!(
            schema.parameters_json(),
            json!({"type": "object", "properties": {}, "required": []})
        );
    }
}
