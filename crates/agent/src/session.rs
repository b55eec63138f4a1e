//! Conversation session: history, the active agent, and the user-facing
//! reply for each turn.

use std::fmt;
use std::sync::Arc;

use switchyard_core::agent::AgentId;
use switchyard_core::error::AgentError;
use switchyard_core::message::{Message, Role};
use tracing::{debug, info};

use crate::executor::TurnExecutor;

/// Inputs that end the session (trimmed, case-insensitive).
const END_SENTINELS: [&str; 3] = ["quit", "exit", "bye"];

/// What the user sees after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    /// The agent in control answered. `agent` is its display name.
    Reply { agent: String, text: String },

    /// The user ended the session.
    Ended,
}

impl fmt::Display for SessionReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply { agent, text } => write!(f, "{agent}: {text}"),
            Self::Ended => write!(f, "Goodbye!"),
        }
    }
}

/// One user's conversation with the agent roster.
///
/// History holds user, assistant, and tool messages only; each request
/// gets the active agent's instructions prepended by the executor.
pub struct Session {
    executor: Arc<TurnExecutor>,
    entry_agent: AgentId,
    active_agent: AgentId,
    history: Vec<Message>,
    ended: bool,
}

impl Session {
    pub fn new(executor: Arc<TurnExecutor>, entry_agent: impl Into<AgentId>) -> Self {
        let entry_agent = entry_agent.into();
        Self {
            executor,
            active_agent: entry_agent.clone(),
            entry_agent,
            history: Vec::new(),
            ended: false,
        }
    }

    /// Handle one line of user input.
    ///
    /// On error the user message stays in history, nothing from the failed
    /// turn is kept, and the active agent is unchanged. Once the session has
    /// ended every call returns `Ended` until [`Session::reset`].
    pub async fn handle(&mut self, user_text: &str) -> Result<SessionReply, AgentError> {
        if self.ended {
            debug!("Input after session end ignored");
            return Ok(SessionReply::Ended);
        }

        if is_sentinel(user_text) {
            info!(agent = %self.active_agent, "Session ended by user");
            self.ended = true;
            return Ok(SessionReply::Ended);
        }

        self.history.push(Message::user(user_text));

        let result = self
            .executor
            .run_turn(&self.active_agent, &self.history)
            .await?;

        let text = result
            .messages
            .iter()
            .filter(|m| m.role == Role::Assistant && !m.content.is_empty())
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let agent = self.executor.agents().resolve(&result.agent)?;
        if agent.id != self.active_agent {
            debug!(from = %self.active_agent, to = %agent.id, "Active agent changed");
        }

        self.active_agent = result.agent;
        self.history.extend(result.messages);

        Ok(SessionReply::Reply {
            agent: agent.name.clone(),
            text,
        })
    }

    /// Forget the conversation and return to the entry agent.
    pub fn reset(&mut self) {
        self.history.clear();
        self.active_agent = self.entry_agent.clone();
        self.ended = false;
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn active_agent(&self) -> &AgentId {
        &self.active_agent
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

fn is_sentinel(input: &str) -> bool {
    let input = input.trim();
    END_SENTINELS.iter().any(|s| input.eq_ignore_ascii_case(s))
}
