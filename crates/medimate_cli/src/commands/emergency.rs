//! Emergency command - send an emergency WhatsApp alert.

use anyhow::Result;
use clap::Args;
use tracing::warn;

use medimate_chat::{BackendConfig, ChatController, Dialog, EmergencyForm, HttpBackend};

use super::{form_error, print_message};

#[derive(Args)]
pub struct EmergencyArgs {
    /// Patient phone number in international format (e.g. +923001112233)
    #[arg(short, long)]
    phone: String,

    /// What is happening
    #[arg(short, long)]
    condition: String,
}

pub async fn execute(args: EmergencyArgs, config: BackendConfig) -> Result<()> {
    warn!("For medical emergencies, call 1122 immediately");

    let form = EmergencyForm {
        patient_phone: args.phone,
        condition: args.condition,
    };

    let mut controller = ChatController::new(HttpBackend::new(config));
    controller.session_mut().open_dialog(Dialog::Emergency);

    match controller.submit_emergency(&form).await {
        Ok(message) => {
            print_message(message);
            Ok(())
        }
        Err(e) => Err(form_error(&mut controller, e)),
    }
}
