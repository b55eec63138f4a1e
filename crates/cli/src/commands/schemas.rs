//! `switchyard schemas`: print the schema every roster tool advertises.

use switchyard_config::AppConfig;
use switchyard_core::schema::SchemaRegistry;
use switchyard_tools::Toolbox;

use crate::roster;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", render(&config)?);
    Ok(())
}

/// All roster tool schemas in wire shape, sorted by name, as pretty JSON.
pub fn render(config: &AppConfig) -> Result<String, Box<dyn std::error::Error>> {
    let toolbox = Toolbox::from_config(config);
    let agents = roster::build(&toolbox, &config.model, "");

    let registry = SchemaRegistry::new();
    for tool in agents.all_tools() {
        registry.get_or_create(tool.as_ref())?;
    }

    let wire: Vec<serde_json::Value> = registry.schemas().iter().map(|s| s.to_wire()).collect();
    Ok(serde_json::to_string_pretty(&wire)?)
}
