//! Register command - patient registration form.

use anyhow::Result;
use clap::Args;

use medimate_chat::{BackendConfig, ChatController, Dialog, HttpBackend, RegistrationForm, SERVICES};

use super::{form_error, print_message};

#[derive(Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(short, long)]
    name: String,

    /// Phone number in international format (e.g. +923001112233)
    #[arg(short, long)]
    phone: String,

    /// Age in years
    #[arg(short, long)]
    age: String,

    /// Service to register for (see `--help` for the list)
    #[arg(short, long, long_help = services_help())]
    service: String,
}

fn services_help() -> String {
    format!("Service to register for, one of: {}", SERVICES.join(", "))
}

pub async fn execute(args: RegisterArgs, config: BackendConfig) -> Result<()> {
    let form = RegistrationForm {
        name: args.name,
        phone: args.phone,
        age: args.age,
        service: args.service,
    };

    let mut controller = ChatController::new(HttpBackend::new(config));
    controller.session_mut().open_dialog(Dialog::Registration);

    match controller.submit_registration(&form).await {
        Ok(message) => {
            print_message(message);
            Ok(())
        }
        Err(e) => Err(form_error(&mut controller, e)),
    }
}
