//! CLI command definitions.
//!
//! Each subcommand maps to one user action of the MediMate chat client.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use medimate_chat::{
    AgentKind, BackendConfig, ChatBackend, ChatController, ChatError, Message, MessageRole,
    BACKEND_URL_ENV,
};

pub mod chat;
pub mod emergency;
pub mod register;
pub mod remind;
pub mod route;
pub mod send;

/// MediMate - AI healthcare assistant in your terminal
#[derive(Parser)]
#[command(name = "medimate")]
#[command(version, about = "MediMate - AI healthcare assistant in your terminal")]
#[command(long_about = r#"
MediMate connects you to specialised medical agents (health check, mental
health, emergency, medicine reminders, diet, COVID-19, registration).

COMMANDS:
  chat       → Interactive chat session
  send       → Send a single message and print the reply
  route      → Show which agent a message would be routed to
  register   → Register as a patient
  emergency  → Send an emergency WhatsApp alert
  remind     → Schedule a daily medicine reminder

For medical emergencies, call 1122 immediately.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Backend failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the MediMate backend
    #[arg(long, global = true, env = BACKEND_URL_ENV)]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the backend config from flags, environment and settings
    pub fn backend_config(&self) -> Result<BackendConfig> {
        let workspace = std::env::current_dir().context("Failed to read current directory")?;
        BackendConfig::resolve(self.backend_url.as_deref(), &workspace)
            .context("Failed to resolve backend configuration")
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat(chat::ChatArgs),

    /// Send one message and print the reply
    Send(send::SendArgs),

    /// Show the agent a message would be routed to
    Route(route::RouteArgs),

    /// Register as a new patient
    Register(register::RegisterArgs),

    /// Send an emergency alert
    Emergency(emergency::EmergencyArgs),

    /// Schedule a daily medicine reminder
    Remind(remind::RemindArgs),
}

/// Parse an agent name given on the command line
pub fn parse_agent(name: &str) -> Result<AgentKind> {
    Ok(name.parse::<AgentKind>()?)
}

/// Print a transcript message
pub fn print_message(message: &Message) {
    match message.role {
        MessageRole::User => println!("🧑 {}", message.content),
        MessageRole::Assistant => println!("{}\n", message.content),
    }
}

/// Turn a failed form submission into an error carrying the alert shown to the user
pub fn form_error<B: ChatBackend>(controller: &mut ChatController<B>, error: ChatError) -> anyhow::Error {
    match controller.session_mut().take_alert() {
        Some(alert) => anyhow::Error::new(error).context(alert),
        None => error.into(),
    }
}
