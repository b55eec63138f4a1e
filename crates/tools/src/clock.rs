//! Clock tool: current local date and time.

use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat};
use switchyard_core::error::ToolError;
use switchyard_core::tool::{Tool, ToolOutput};

pub struct ClockTool;

#[async_trait]
impl Tool for ClockTool {
    fn name(&self) -> &str {
        "get_dateandtime"
    }

    fn description(&self) -> &str {
        "Get the current local date and time in ISO 8601 format. Use it to work out \
         the current semester or to anchor relative dates like \"tomorrow\"."
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(describe(Local::now())))
    }
}

fn describe(now: DateTime<Local>) -> String {
    format!(
        "Current date and time (ISO 8601): {}",
        now.to_rfc3339_opts(SecondsFormat::Secs, false)
    )
}
