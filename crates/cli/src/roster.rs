//! The student-assistant roster: four agents that hand the conversation
//! to each other.
//!
//! ```text
//!   triage ──► program ◄──► db
//!     ▲  ╲        │         ▲ │
//!     │   ╲       ▼         │ ▼
//!     └──── calendar ◄──────┘
//! ```
//! Every specialist can hand back to triage.

use std::sync::Arc;

use switchyard_agent::HandoffTool;
use switchyard_core::agent::{Agent, AgentRegistry};
use switchyard_core::tool::Tool;
use switchyard_tools::Toolbox;

pub const TRIAGE: &str = "triage";
pub const PROGRAM: &str = "program";
pub const CALENDAR: &str = "calendar";
pub const DATABASE: &str = "db";

const TRIAGE_INSTRUCTIONS: &str = "\
You are the triage agent of a university student assistant.
Rules:
- Be concise.
- Do not answer questions yourself. Decide which specialist can help and transfer:
  program and course questions go to the program agent, calendar and schedule
  requests go to the calendar agent, questions about the student's own records
  go to the database agent.";

const PROGRAM_INSTRUCTIONS: &str = "\
You are the program agent of a university student assistant. You help with
degree programs and course questions.
Rules:
- Be concise.
- Look at the conversation first; reuse information other agents already found.
- If you need the student's records (program, completed courses, schedule),
  transfer to the database agent.
- Use get_program_details for program requirements.
Course recommendations:
- Base them on the student's program and completed courses.
- Only offer options without schedule conflicts.";

const CALENDAR_INSTRUCTIONS: &str = "\
You are the calendar agent of a university student assistant. You manage the
student's calendar.
Rules:
- Be concise and act right away; never tell the student to wait.
- Look at the conversation first; reuse information other agents already found.
  Only transfer to the database agent if the student's details are missing.
- Check the current date and time once with get_dateandtime, then call
  setup_credentials with the student's email before any other calendar tool.
- Use create_event, delete_event and get_events to manage events. When adding
  classes, use the course schedule from the database.";

const DATABASE_INSTRUCTIONS: &str = "\
You are the database agent of a university student assistant. You look up the
student's information and help the other agents with it.
Rules:
- Be concise.
- Use query_university_db first. Only if the database has no answer, use
  web_search, and tell the student you searched the web.
- Do not query again for information already in the conversation.
- Checking course time conflicts is your job; do not transfer for it.
- After retrieving what was needed, transfer back to the agent that asked.
Database schema:
";

/// Build the four agents around one shared toolbox.
///
/// `db_schema` is embedded in the database agent's instructions.
pub fn build(toolbox: &Toolbox, model: &str, db_schema: &str) -> AgentRegistry {
    let to_triage: Arc<dyn Tool> = Arc::new(HandoffTool::new(
        "transfer_to_triage_agent",
        "Transfer back to the triage agent when the question needs another agent's help.",
        TRIAGE,
    ));
    let to_program: Arc<dyn Tool> = Arc::new(HandoffTool::new(
        "transfer_to_program_agent",
        "Transfer to the program agent for questions about programs or courses.",
        PROGRAM,
    ));
    let to_calendar: Arc<dyn Tool> = Arc::new(HandoffTool::new(
        "transfer_to_calendar_agent",
        "Transfer to the calendar agent for questions about the calendar.",
        CALENDAR,
    ));
    let to_db: Arc<dyn Tool> = Arc::new(HandoffTool::new(
        "transfer_to_db_agent",
        "Transfer to the database agent when the university database is needed to answer.",
        DATABASE,
    ));

    let mut agents = AgentRegistry::new();

    agents.register(
        Agent::new(TRIAGE, "Triage Agent", model, TRIAGE_INSTRUCTIONS).with_tools([
            to_program.clone(),
            to_calendar.clone(),
            to_db.clone(),
        ]),
    );

    agents.register(
        Agent::new(PROGRAM, "Program Agent", model, PROGRAM_INSTRUCTIONS).with_tools([
            toolbox.clock.clone(),
            toolbox.program_details.clone(),
            to_triage.clone(),
            to_db.clone(),
            to_calendar.clone(),
        ]),
    );

    agents.register(
        Agent::new(CALENDAR, "Calendar Agent", model, CALENDAR_INSTRUCTIONS).with_tools([
            toolbox.clock.clone(),
            toolbox.setup_credentials.clone(),
            toolbox.create_event.clone(),
            toolbox.delete_event.clone(),
            toolbox.get_events.clone(),
            to_triage.clone(),
            to_db,
        ]),
    );

    agents.register(
        Agent::new(
            DATABASE,
            "Database Agent",
            model,
            format!("{DATABASE_INSTRUCTIONS}{db_schema}"),
        )
        .with_tools([
            toolbox.clock.clone(),
            toolbox.query_db.clone(),
            toolbox.db_schema.clone(),
            toolbox.web_search.clone(),
            to_triage,
            to_program,
            to_calendar,
        ]),
    );

    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_config::AppConfig;
    use switchyard_core::agent::AgentId;

    fn tool_names(agents: &AgentRegistry, id: &str) -> Vec<String> {
        agents
            .get(&AgentId::from(id))
            .unwrap()
            .tool_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[tokio::test]
    async fn wiring() {
        let toolbox = Toolbox::from_config(&AppConfig::default());
        let agents = build(&toolbox, "gpt-4o", "Table `students` columns: id (INTEGER).");

        assert_eq!(agents.len(), 4);
        assert_eq!(
            tool_names(&agents, TRIAGE),
            vec![
                "transfer_to_program_agent",
                "transfer_to_calendar_agent",
                "transfer_to_db_agent"
            ]
        );
        assert!(tool_names(&agents, PROGRAM).contains(&"get_program_details".to_string()));
        assert!(tool_names(&agents, CALENDAR).contains(&"setup_credentials".to_string()));
        assert_eq!(
            tool_names(&agents, DATABASE)[..4],
            ["get_dateandtime", "query_university_db", "get_db_schema", "web_search"]
        );

        let db = agents.get(&AgentId::from(DATABASE)).unwrap();
        assert!(db.instructions.ends_with("Table `students` columns: id (INTEGER)."));
        assert_eq!(db.model, "gpt-4o");
    }

    #[tokio::test]
    async fn every_handoff_targets_a_registered_agent() {
        let toolbox = Toolbox::from_config(&AppConfig::default());
        let agents = build(&toolbox, "m", "");
        for id in agents.ids() {
            for name in tool_names(&agents, id.as_str()) {
                if let Some(target) = name
                    .strip_prefix("transfer_to_")
                    .and_then(|s| s.strip_suffix("_agent"))
                {
                    assert!(agents.contains(&AgentId::from(target)), "{name}");
                }
            }
        }
    }
}
