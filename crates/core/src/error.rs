//! Error types for the Switchyard domain.
//!
//! Each bounded context has its own `thiserror` enum; [`AgentError`] is what
//! a failed turn surfaces to the caller.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// A tool's declared signature could not be turned into a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Tool name must not be empty")]
    EmptyToolName,

    #[error("Invalid tool name '{0}': use 1-64 characters from [A-Za-z0-9_-]")]
    InvalidToolName(String),

    #[error("Tool '{tool}' declares a parameter with an empty name")]
    EmptyParameterName { tool: String },

    #[error("Tool '{tool}' declares parameter '{param}' more than once")]
    DuplicateParameter { tool: String, param: String },
}

/// Failures that abort a turn of the dispatch loop.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent '{agent}' requested unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Schema derivation failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("Completion failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Turn exceeded {limit} model round-trips without a final reply")]
    IterationLimit { limit: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = AgentError::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn unknown_tool_names_agent_and_tool() {
        let err = AgentError::UnknownTool {
            agent: "triage".into(),
            tool: "launch_rockets".into(),
        };
        let text = err.to_string();
        assert!(text.contains("triage"));
        assert!(text.contains("launch_rockets"));
    }

    #[test]
    fn schema_error_converts_into_agent_error() {
        let err: AgentError = SchemaError::EmptyToolName.into();
        assert!(matches!(err, AgentError::Schema(SchemaError::EmptyToolName)));
        assert!(
            AgentError::IterationLimit { limit: 3 }
                .to_string()
                .contains("3 model round-trips")
        );
    }
}
