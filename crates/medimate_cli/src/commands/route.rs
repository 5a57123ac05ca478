//! Route command - show the agent a message would go to.

use anyhow::Result;
use clap::Args;

use medimate_chat::{select_agent, AgentKind};

use super::parse_agent;

#[derive(Args)]
pub struct RouteArgs {
    /// Message to classify
    #[arg(required = true, num_args = 1..)]
    message: Vec<String>,

    /// Agent to fall back on when no keyword matches
    #[arg(short, long)]
    current: Option<String>,
}

pub fn execute(args: RouteArgs) -> Result<()> {
    let current: Option<AgentKind> = args.current.as_deref().map(parse_agent).transpose()?;
    let agent = select_agent(&args.message.join(" "), current);

    println!("🧭 {}", agent);
    println!("   {}", agent.description());
    Ok(())
}
