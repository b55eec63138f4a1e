//! Wiring: config + provider → toolbox, roster, executor, session.

use std::sync::Arc;

use switchyard_agent::{Session, TurnExecutor};
use switchyard_config::AppConfig;
use switchyard_core::agent::AgentId;
use switchyard_core::event::EventBus;
use switchyard_core::provider::Provider;
use switchyard_core::schema::SchemaRegistry;
use switchyard_tools::Toolbox;
use tracing::{info, warn};

use crate::roster;

/// Build a ready-to-use session from config.
///
/// The database schema is read once here for the database agent's
/// instructions; if the database is unreachable the agent starts without it.
pub async fn build_session(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
    event_bus: Arc<EventBus>,
) -> Result<Session, Box<dyn std::error::Error>> {
    let toolbox = Toolbox::from_config(config);

    let db_schema = match toolbox.database.describe().await {
        Ok(schema) => schema,
        Err(e) => {
            warn!(path = %config.database.path.display(), error = %e, "Database schema unavailable");
            format!("(unavailable: {e}; use get_db_schema once the database is reachable)")
        }
    };

    let agents = roster::build(&toolbox, &config.model, &db_schema);
    let entry = AgentId::new(&config.agent.entry_agent);
    if !agents.contains(&entry) {
        return Err(format!(
            "entry agent '{entry}' is not one of: {}",
            agents.ids().iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
        )
        .into());
    }

    info!(
        provider = provider.name(),
        model = %config.model,
        agents = agents.len(),
        entry = %entry,
        "Roster ready"
    );

    let executor = TurnExecutor::new(provider, Arc::new(agents), Arc::new(SchemaRegistry::new()))
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_max_iterations(config.agent.iteration_limit())
        .with_event_bus(event_bus);

    Ok(Session::new(Arc::new(executor), entry))
}
