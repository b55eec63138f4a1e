//! `switchyard chat`: interactive or single-message chat.

use std::io::Write;
use std::sync::Arc;

use switchyard_agent::{Session, SessionReply};
use switchyard_config::AppConfig;
use switchyard_core::event::{DomainEvent, EventBus};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::app;

pub async fn run(message: Option<String>, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early: give a clear error
    if !config.has_api_key() && config.provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put them in .env):");
        eprintln!("    AZURE_OPENAI_API_KEY + AZURE_OPENAI_ENDPOINT + AZURE_OPENAI_DEPLOYMENT");
        eprintln!("    OPENAI_API_KEY");
        eprintln!("    SWITCHYARD_API_KEY");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = switchyard_providers::build_from_config(&config)?;

    let event_bus = Arc::new(EventBus::default());
    if verbose {
        watch_events(&event_bus);
    }

    let mut session = app::build_session(&config, provider, event_bus).await?;

    if let Some(msg) = message {
        // Single message mode
        match session.handle(&msg).await? {
            SessionReply::Ended => {}
            reply => println!("{reply}"),
        }
        return Ok(());
    }

    println!();
    println!("  Switchyard student assistant");
    println!("  Provider: {}   Model: {}", config.provider, config.model);
    println!("  Type 'quit', 'exit' or 'bye' to leave, '/reset' to start over.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/reset" {
            session.reset();
            println!("(conversation cleared)\n");
            continue;
        }

        if !chat_turn(&mut session, line).await {
            break;
        }
    }

    Ok(())
}

/// Run one turn and print the outcome. Returns `false` once the session ended.
async fn chat_turn(session: &mut Session, line: &str) -> bool {
    match session.handle(line).await {
        Ok(SessionReply::Ended) => {
            println!("{}", SessionReply::Ended);
            false
        }
        Ok(reply) => {
            println!("{reply}\n");
            true
        }
        Err(e) => {
            // The turn is lost but the conversation continues
            eprintln!("[Error] {e}\n");
            true
        }
    }
}

/// Log handoffs and tool runs from the event bus.
fn watch_events(event_bus: &EventBus) {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match event.as_ref() {
                    DomainEvent::HandoffOccurred { from, to, .. } => {
                        info!(%from, %to, "Handoff");
                    }
                    DomainEvent::ToolExecuted {
                        agent,
                        tool_name,
                        success,
                        duration_ms,
                        ..
                    } => {
                        debug!(%agent, tool = %tool_name, success, duration_ms, "Tool executed");
                    }
                    DomainEvent::ResponseGenerated {
                        agent, tokens_used, ..
                    } => {
                        debug!(%agent, tokens_used, "Model responded");
                    }
                    DomainEvent::ErrorOccurred { context, error_message, .. } => {
                        debug!(%context, error = %error_message, "Turn failed");
                    }
                },
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}
