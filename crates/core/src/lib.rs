//! # Switchyard Core
//!
//! Domain types, traits, and error definitions for the Switchyard agent
//! router. This crate has no framework dependencies; it defines the domain
//! model the other crates implement against.
//!
//! - [`tool`]: the `Tool` trait and its tagged output (data or handoff)
//! - [`schema`]: schema derivation from declared signatures, plus the shared cache
//! - [`agent`]: agent descriptors and the id-keyed registry
//! - [`provider`]: the completion-service abstraction
//! - [`message`]: role-tagged conversation messages
//! - [`event`]: domain events published by the dispatch loop

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;
pub mod schema;
pub mod agent;
pub mod event;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, ProviderError, SchemaError, ToolError};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{ParamSpec, Tool, ToolOutput};
pub use schema::{ParamType, SchemaRegistry, ToolParameter, ToolSchema, derive_schema};
pub use agent::{Agent, AgentId, AgentRegistry};
pub use event::{DomainEvent, EventBus};
