//! Agent descriptors and the registry that resolves them by id.
//!
//! An agent is a named bundle of instructions, model, and tools. Agents are
//! built once at startup and never mutated; a session switches agents by
//! changing which [`AgentId`] is active. Handoff tools capture an `AgentId`
//! rather than a reference, so agents may hand off to each other in cycles
//! without caring about construction order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::tool::Tool;

/// Stable identifier of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One conversational specialist.
pub struct Agent {
    /// Registry key; what handoff tools point at.
    pub id: AgentId,

    /// Display name shown to the user. Not required to be unique.
    pub name: String,

    /// Model identifier, passed to the provider as-is.
    pub model: String,

    /// System instructions used for every request while this agent is active.
    pub instructions: String,

    /// Callable tools, in the order they are advertised.
    pub tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    pub fn new(
        id: impl Into<AgentId>,
        name: impl Into<String>,
        model: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
        }
    }

    /// Append a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Append several tools.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Names of this agent's tools, in order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools", &self.tool_names())
            .finish()
    }
}

/// All agents known to the process, keyed by id.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: HashMap<AgentId, Arc<Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Replaces any existing agent with the same id.
    pub fn register(&mut self, agent: Agent) -> AgentId {
        let id = agent.id.clone();
        self.agents.insert(id.clone(), Arc::new(agent));
        id
    }

    pub fn get(&self, id: &AgentId) -> Option<Arc<Agent>> {
        self.agents.get(id).cloned()
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn resolve(&self, id: &AgentId) -> Result<Arc<Agent>, AgentError> {
        self.get(id)
            .ok_or_else(|| AgentError::UnknownAgent(id.to_string()))
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Every distinct tool across all agents, first occurrence wins by name.
    pub fn all_tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut seen = std::collections::HashSet::new();
        let mut tools = Vec::new();
        for id in self.ids() {
            if let Some(agent) = self.agents.get(&id) {
                for tool in &agent.tools {
                    if seen.insert(tool.name().to_string()) {
                        tools.push(Arc::clone(tool));
                    }
                }
            }
        }
        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::tool::ToolOutput;
    use async_trait::async_trait;

    struct Clock;

    #[async_trait]
    impl Tool for Clock {
        fn name(&self) -> &str { "get_dateandtime" }
        async fn execute(&self, _: serde_json::Value) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::text("now"))
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = AgentRegistry::new();
        let id = registry.register(Agent::new("triage", "Triage Agent", "gpt-4o", "route"));
        assert_eq!(id, AgentId::from("triage"));
        assert_eq!(registry.resolve(&id).unwrap().name, "Triage Agent");
        assert!(matches!(
            registry.resolve(&AgentId::from("ghost")),
            Err(AgentError::UnknownAgent(name)) if name == "ghost"
        ));
    }

    #[test]
    fn all_tools_deduplicates_by_name() {
        let clock: Arc<dyn Tool> = Arc::new(Clock);
        let mut registry = AgentRegistry::new();
        registry.register(Agent::new("a", "A", "m", "").with_tool(Arc::clone(&clock)));
        registry.register(Agent::new("b", "B", "m", "").with_tool(clock));
        assert_eq!(registry.all_tools().len(), 1);
        assert_eq!(registry.ids(), vec![AgentId::from("a"), AgentId::from("b")]);
    }

    #[test]
    fn debug_lists_tool_names_not_instructions() {
        let agent = Agent::new("a", "A", "m", "secret prompt").with_tool(Arc::new(Clock));
        let text = format!("{agent:?}");
        assert!(text.contains("get_dateandtime"));
        assert!(!text.contains("secret prompt"));
    }
}
