//! Remind command - schedule a daily medicine reminder.

use anyhow::Result;
use clap::Args;

use medimate_chat::{BackendConfig, ChatController, Dialog, HttpBackend, ReminderForm};

use super::{form_error, print_message};

#[derive(Args)]
pub struct RemindArgs {
    /// WhatsApp number in international format (e.g. +923001112233)
    #[arg(short, long)]
    phone: String,

    /// Medicine to take
    #[arg(short, long)]
    medicine: String,

    /// Daily time in 24-hour HH:MM
    #[arg(short, long)]
    time: String,
}

pub async fn execute(args: RemindArgs, config: BackendConfig) -> Result<()> {
    let form = ReminderForm {
        phone: args.phone,
        medicine_name: args.medicine,
        reminder_time: args.time,
    };

    let mut controller = ChatController::new(HttpBackend::new(config));
    controller.session_mut().open_dialog(Dialog::Reminder);

    match controller.submit_reminder(&form).await {
        Ok(message) => {
            print_message(message);
            Ok(())
        }
        Err(e) => Err(form_error(&mut controller, e)),
    }
}
