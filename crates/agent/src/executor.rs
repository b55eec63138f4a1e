//! The turn executor: runs one user turn across as many agents as the
//! model hands off to.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use switchyard_core::agent::{Agent, AgentId, AgentRegistry};
use switchyard_core::error::AgentError;
use switchyard_core::event::{DomainEvent, EventBus};
use switchyard_core::message::{Message, MessageToolCall};
use switchyard_core::provider::{Provider, ProviderRequest, ToolDefinition};
use switchyard_core::schema::SchemaRegistry;
use switchyard_core::tool::{Tool, ToolOutput};
use tracing::{debug, info, warn};

/// Outcome of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// The agent in control when the turn ended
    pub agent: AgentId,

    /// Every message the turn produced, in order: assistant messages and
    /// tool results. Never includes the system message.
    pub messages: Vec<Message>,
}

/// Drives the completion provider and tools until the active agent answers
/// without tool calls.
pub struct TurnExecutor {
    provider: Arc<dyn Provider>,
    agents: Arc<AgentRegistry>,
    schemas: Arc<SchemaRegistry>,
    temperature: f32,
    max_tokens: Option<u32>,
    /// Model round-trips allowed per turn. `None` = unbounded.
    max_iterations: Option<u32>,
    event_bus: Arc<EventBus>,
}

type ToolMap = HashMap<String, Arc<dyn Tool>>;

impl TurnExecutor {
    pub fn new(
        provider: Arc<dyn Provider>,
        agents: Arc<AgentRegistry>,
        schemas: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            provider,
            agents,
            schemas,
            temperature: 0.7,
            max_tokens: None,
            max_iterations: None,
            event_bus: Arc::new(EventBus::default()),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per completion.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Bound the model round-trips of a single turn.
    pub fn with_max_iterations(mut self, limit: Option<u32>) -> Self {
        self.max_iterations = limit;
        self
    }

    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Run one turn starting with `agent`, given the conversation so far.
    ///
    /// `history` must not contain system messages; the active agent's
    /// instructions are prepended to every request. Tool failures are
    /// reported to the model; unknown tools or agents, schema and provider
    /// errors, and the iteration limit end the turn with an error.
    pub async fn run_turn(
        &self,
        agent: &AgentId,
        history: &[Message],
    ) -> Result<TurnResult, AgentError> {
        match self.run(agent, history).await {
            Ok(result) => Ok(result),
            Err(e) => {
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: format!("turn starting with agent {agent}"),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    async fn run(&self, agent: &AgentId, history: &[Message]) -> Result<TurnResult, AgentError> {
        let mut active = self.agents.resolve(agent)?;
        let mut produced: Vec<Message> = Vec::new();
        let mut iteration: u32 = 0;

        loop {
            iteration += 1;
            if let Some(limit) = self.max_iterations {
                if iteration > limit {
                    warn!(agent = %active.id, limit, "Iteration limit reached");
                    return Err(AgentError::IterationLimit { limit });
                }
            }

            debug!(
                agent = %active.id,
                iteration,
                produced = produced.len(),
                "Dispatch iteration"
            );

            // Tools are fixed for the whole iteration, even if a call
            // in the batch hands off.
            let caller = Arc::clone(&active);
            let (definitions, tools) = self.prepare_tools(&caller)?;

            let mut messages = Vec::with_capacity(1 + history.len() + produced.len());
            messages.push(Message::system(caller.instructions.as_str()));
            messages.extend_from_slice(history);
            messages.extend(produced.iter().cloned());

            let request = ProviderRequest {
                model: caller.model.clone(),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: definitions,
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    agent: caller.id.to_string(),
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: Utc::now(),
                });
            }

            let tool_calls = response.message.tool_calls.clone();
            produced.push(response.message);

            if tool_calls.is_empty() {
                debug!(agent = %active.id, messages = produced.len(), "Turn complete");
                return Ok(TurnResult {
                    agent: active.id.clone(),
                    messages: produced,
                });
            }

            debug!(tool_count = tool_calls.len(), "Executing tool calls");
            for call in &tool_calls {
                let content = self.execute_call(&caller, &tools, call, &mut active).await?;
                produced.push(Message::tool_result(call.id.as_str(), content));
            }
        }
    }

    /// Schemas (through the shared cache) and a name → tool map for one agent.
    fn prepare_tools(&self, agent: &Agent) -> Result<(Vec<ToolDefinition>, ToolMap), AgentError> {
        let mut definitions = Vec::with_capacity(agent.tools.len());
        let mut tools = ToolMap::with_capacity(agent.tools.len());
        for tool in &agent.tools {
            let schema = self.schemas.get_or_create(tool.as_ref())?;
            definitions.push(schema.to_definition());
            tools.insert(tool.name().to_string(), Arc::clone(tool));
        }
        Ok((definitions, tools))
    }

    /// Run one tool call and produce the tool-result content.
    async fn execute_call(
        &self,
        caller: &Agent,
        tools: &ToolMap,
        call: &MessageToolCall,
        active: &mut Arc<Agent>,
    ) -> Result<String, AgentError> {
        let tool = tools.get(&call.name).ok_or_else(|| AgentError::UnknownTool {
            agent: caller.id.to_string(),
            tool: call.name.clone(),
        })?;

        let arguments = match parse_arguments(&call.arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!(agent = %caller.id, tool = %call.name, error = %e, "Malformed tool arguments");
                return Ok(format!("Error: invalid arguments for {}: {e}", call.name));
            }
        };

        let start = Instant::now();
        let result = tool.execute(arguments).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        self.event_bus.publish(DomainEvent::ToolExecuted {
            agent: caller.id.to_string(),
            tool_name: call.name.clone(),
            success: result.is_ok(),
            duration_ms,
            timestamp: Utc::now(),
        });

        match result {
            Ok(ToolOutput::Data(value)) => {
                debug!(tool = %call.name, duration_ms, "Tool executed");
                Ok(ToolOutput::render(&value))
            }
            Ok(ToolOutput::Handoff(target)) => {
                let next = self.agents.resolve(&target)?;
                info!(from = %active.id, to = %next.id, tool = %call.name, "Handoff");
                self.event_bus.publish(DomainEvent::HandoffOccurred {
                    from: active.id.to_string(),
                    to: next.id.to_string(),
                    timestamp: Utc::now(),
                });
                let content = format!("Transferred to {}.", next.name);
                *active = next;
                Ok(content)
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                Ok(format!("Error: {e}"))
            }
        }
    }
}

/// Empty or whitespace-only arguments mean "no arguments".
fn parse_arguments(raw: &str) -> Result<serde_json::Value, serde_json::Error> {
    if raw.trim().is_empty() {
        Ok(serde_json::Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_str(raw)
    }
}
