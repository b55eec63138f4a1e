//! Built-in tools for the Switchyard student-assistant agents.
//!
//! Tools give the agents access to the world: the clock, the university
//! database, program documents, the student's calendar, and web search.
//! Each tool reports its own failures as data so the model can read them.

pub mod calendar;
pub mod clock;
pub mod programs;
pub mod seed;
pub mod university_db;
pub mod web_search;

use std::sync::Arc;
use switchyard_config::AppConfig;
use switchyard_core::tool::Tool;

pub use calendar::{
    CalendarService, CreateEventTool, DeleteEventTool, GetEventsTool, SetupCredentialsTool,
};
pub use clock::ClockTool;
pub use programs::ProgramDetailsTool;
pub use seed::{SeedReport, seed_database};
pub use university_db::{DbSchemaTool, QueryDbTool, UniversityDb};
pub use web_search::WebSearchTool;

/// One shared instance of every built-in tool, wired from config.
///
/// Agents pick the tools they need; tools that share state (the database
/// pool, the calendar session) share it across agents too.
pub struct Toolbox {
    pub database: Arc<UniversityDb>,
    pub calendar: Arc<CalendarService>,
    pub clock: Arc<dyn Tool>,
    pub query_db: Arc<dyn Tool>,
    pub db_schema: Arc<dyn Tool>,
    pub program_details: Arc<dyn Tool>,
    pub setup_credentials: Arc<dyn Tool>,
    pub create_event: Arc<dyn Tool>,
    pub delete_event: Arc<dyn Tool>,
    pub get_events: Arc<dyn Tool>,
    pub web_search: Arc<dyn Tool>,
}

impl Toolbox {
    /// Build every tool. Must be called inside a tokio runtime (the
    /// database pool is created lazily but registers with the runtime).
    pub fn from_config(config: &AppConfig) -> Self {
        let database = Arc::new(UniversityDb::open(&config.database));
        let calendar = Arc::new(CalendarService::new(&config.calendar));

        Self {
            clock: Arc::new(ClockTool),
            query_db: Arc::new(QueryDbTool::new(database.clone())),
            db_schema: Arc::new(DbSchemaTool::new(database.clone())),
            program_details: Arc::new(ProgramDetailsTool::new(&config.programs.dir)),
            setup_credentials: Arc::new(SetupCredentialsTool::new(calendar.clone())),
            create_event: Arc::new(CreateEventTool::new(calendar.clone())),
            delete_event: Arc::new(DeleteEventTool::new(calendar.clone())),
            get_events: Arc::new(GetEventsTool::new(calendar.clone())),
            web_search: Arc::new(WebSearchTool::new(&config.search)),
            database,
            calendar,
        }
    }

    /// Every tool, in a stable order.
    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            self.clock.clone(),
            self.query_db.clone(),
            self.db_schema.clone(),
            self.program_details.clone(),
            self.setup_credentials.clone(),
            self.create_event.clone(),
            self.delete_event.clone(),
            self.get_events.clone(),
            self.web_search.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::SchemaRegistry;

    #[tokio::test]
    async fn every_tool_derives_a_schema() {
        let toolbox = Toolbox::from_config(&AppConfig::default());
        let registry = SchemaRegistry::new();

        for tool in toolbox.all() {
            let schema = registry.get_or_create(tool.as_ref()).unwrap();
            assert!(!schema.description.is_empty(), "{} has no description", schema.name);
        }
        assert_eq!(
            registry.names(),
            vec![
                "create_event",
                "delete_event",
                "get_db_schema",
                "get_dateandtime",
                "get_events",
                "get_program_details",
                "query_university_db",
                "setup_credentials",
                "web_search",
            ]
        );
    }
}
