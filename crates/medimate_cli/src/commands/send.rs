//! Send command - one message, one reply.

use anyhow::Result;
use clap::Args;
use tracing::info;

use medimate_chat::{BackendConfig, ChatController, HttpBackend};

use super::{parse_agent, print_message};

#[derive(Args)]
pub struct SendArgs {
    /// Message to send
    #[arg(required = true, num_args = 1..)]
    message: Vec<String>,

    /// Pin an agent instead of routing by keyword
    #[arg(short, long)]
    agent: Option<String>,
}

pub async fn execute(args: SendArgs, config: BackendConfig) -> Result<()> {
    let text = args.message.join(" ");
    let mut controller = ChatController::new(HttpBackend::new(config));
    if let Some(name) = &args.agent {
        controller.session_mut().select_agent(parse_agent(name)?);
    }

    let reply = match controller.submit(&text).await {
        Ok(reply) => reply.clone(),
        Err(rejected) => {
            if let Some(message) = controller.session().last_message() {
                print_message(message);
            }
            return Err(rejected.into());
        }
    };

    info!(agent = %controller.session().selected_agent(), "Reply received");
    print_message(&reply);

    match controller.take_last_failure() {
        Some(error) => {
            Err(anyhow::Error::new(error).context("The MediMate backend could not be reached"))
        }
        None => Ok(()),
    }
}
