//! Chat command - interactive session on stdin.

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use medimate_chat::{
    AgentKind, BackendConfig, ChatBackend, ChatController, HttpBackend, SubmitRejected,
    WELCOME_BANNER,
};

use super::{parse_agent, print_message};

#[derive(Args)]
pub struct ChatArgs {
    /// Pin an agent for the whole session (e.g. "diet", "Emergency Agent")
    #[arg(short, long)]
    agent: Option<String>,
}

/// What a typed line asks for
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Message(&'a str),
    PinAgent(&'a str),
    ListAgents,
    History,
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line);
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .unwrap_or((command, ""));
    match name {
        "agent" if !rest.is_empty() => Input::PinAgent(rest),
        "agents" => Input::ListAgents,
        "history" => Input::History,
        "reset" => Input::Reset,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line),
    }
}

const HELP: &str = "Commands: /agent <name>, /agents, /history, /reset, /help, /quit";

pub async fn execute(args: ChatArgs, config: BackendConfig) -> Result<()> {
    info!("Connecting to {}", config.base_url);

    let mut controller = ChatController::new(HttpBackend::new(config));
    if let Some(name) = &args.agent {
        controller.session_mut().select_agent(parse_agent(name)?);
    }

    println!("{}\n", WELCOME_BANNER);
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let prompt = format!("[{}] > ", controller.session().selected_agent().short_name());
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        if !handle_line(&mut controller, &line).await? {
            break;
        }
    }

    println!("👋 Take care!");
    Ok(())
}

/// Apply one typed line; returns false when the user wants to leave
async fn handle_line<B: ChatBackend>(controller: &mut ChatController<B>, line: &str) -> Result<bool> {
    match parse_input(line) {
        Input::Message(text) => match controller.submit(text).await {
            Ok(reply) => print_message(reply),
            Err(SubmitRejected::EmptyInput) => {}
            Err(SubmitRejected::Invalid(_)) => {
                if let Some(message) = controller.session().last_message() {
                    print_message(message);
                }
            }
            Err(e) => println!("⚠️  {}", e),
        },
        Input::PinAgent(name) => match name.parse::<AgentKind>() {
            Ok(agent) => {
                controller.session_mut().select_agent(agent);
                println!("✅ Now talking to the {}", agent);
            }
            Err(e) => println!("⚠️  {}", e),
        },
        Input::ListAgents => {
            for agent in AgentKind::ALL {
                println!("  {:<24} {}", agent.display_name(), agent.description());
            }
        }
        Input::History => {
            for message in controller.session().messages() {
                print_message(message);
            }
        }
        Input::Reset => {
            controller.reset();
            println!("🔄 Started a new session ({})", controller.session().id());
        }
        Input::Help => println!("{}", HELP),
        Input::Quit => return Ok(false),
        Input::Unknown(text) => println!("⚠️  Unknown command: {}. {}", text, HELP),
    }
    Ok(true)
}
