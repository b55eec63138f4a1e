//! The dispatch loop: the heart of Switchyard.
//!
//! A user turn runs as a **Dispatch → Respond / Act** cycle:
//!
//! 1. **Send** the active agent's instructions, the conversation and its
//!    tool schemas to the completion provider
//! 2. **If tool calls**: run them in order, append one result per call,
//!    switch agents on a handoff, loop back to step 1
//! 3. **If text only**: the turn is done; return the agent now in control
//!    and every message the turn produced
//!
//! [`Session`] wraps the loop with conversation history and the user-facing
//! reply.

pub mod executor;
pub mod handoff;
pub mod session;

pub use executor::{TurnExecutor, TurnResult};
pub use handoff::HandoffTool;
pub use session::{Session, SessionReply};

#[cfg(test)]
pub(crate) mod test_helpers;
