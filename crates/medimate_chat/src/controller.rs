//! Chat controller.
//!
//! Drives one [`ChatSession`] against one [`ChatBackend`]: each accepted
//! submission makes exactly one backend call, and every outcome is folded
//! back into the session. Backend failures never escape as errors from
//! [`ChatController::submit`]; they become an apology in the transcript and
//! the error is kept until [`ChatController::take_last_failure`].

use tracing::{info, warn};

use crate::agents::AgentRouter;
use crate::backend::{ChatBackend, ChatReply};
use crate::error::{ChatError, ChatResult, SubmitRejected};
use crate::forms::{EmergencyForm, Form, RegistrationForm, ReminderForm};
use crate::session::{ChatSession, Dialog};
use crate::types::{AgentKind, Message};

pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const EMERGENCY_FAILED: &str = "Failed to send emergency alert. Please call 1122 directly.";
pub const REMINDER_FAILED: &str =
    "Failed to set medicine reminder. Please check your inputs and try again.";

/// Session plus backend
pub struct ChatController<B: ChatBackend> {
    session: ChatSession,
    backend: B,
    router: AgentRouter,
    last_failure: Option<ChatError>,
}

impl<B: ChatBackend> ChatController<B> {
    /// Create a controller with a fresh session
    pub fn new(backend: B) -> Self {
        Self::with_router(backend, AgentRouter::new())
    }

    pub fn with_router(backend: B, router: AgentRouter) -> Self {
        Self {
            session: ChatSession::new(),
            backend,
            router,
            last_failure: None,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start over with a new session
    pub fn reset(&mut self) {
        self.session.reset();
        self.last_failure = None;
    }

    /// Backend error behind the last apology, if the last chat request failed
    pub fn last_failure(&self) -> Option<&ChatError> {
        self.last_failure.as_ref()
    }

    /// Return and clear the last chat request error
    pub fn take_last_failure(&mut self) -> Option<ChatError> {
        self.last_failure.take()
    }

    /// Send `input` and wait for the reply.
    ///
    /// Returns the assistant message appended for this submission, which is
    /// the apology text when the backend request failed.
    pub async fn submit(&mut self, input: &str) -> Result<&Message, SubmitRejected> {
        let pending = self.session.begin_submission(input, &self.router)?;
        let outcome = self.backend.chat(&pending.request).await;
        let reply = self
            .session
            .complete_submission(pending, outcome.as_ref().map(ChatReply::clone));
        self.last_failure = outcome.err();
        reply.ok_or(SubmitRejected::Superseded)
    }

    /// Register a patient through the registration form
    pub async fn submit_registration(&mut self, form: &RegistrationForm) -> ChatResult<&Message> {
        let registration = self.validate(form)?;
        self.session.begin_form()?;

        match self.backend.register(&registration).await {
            Ok(reply) => {
                info!(name = %registration.name, "Patient registered");
                let content = format!(
                    "✅ Registration successful! Welcome {}. {}",
                    registration.name,
                    reply.response.unwrap_or_default()
                );
                let message = Message::assistant(content.trim_end(), AgentKind::Registration);
                Ok(self.session.form_succeeded(Dialog::Registration, message))
            }
            Err(e) => Err(self.fail_form(e, REGISTRATION_FAILED)),
        }
    }

    /// Send an emergency alert through the emergency form
    pub async fn submit_emergency(&mut self, form: &EmergencyForm) -> ChatResult<&Message> {
        let alert = self.validate(form)?;
        self.session.begin_form()?;

        match self.backend.emergency(&alert).await {
            Ok(_) => {
                info!(phone = %alert.patient_phone, "Emergency alert sent");
                let content = format!(
                    "🚨 Emergency alert sent for {}! A WhatsApp notification is being sent to emergency services. Please call 1122 or visit the nearest hospital immediately.",
                    alert.patient_phone
                );
                let message = Message::assistant(content, AgentKind::Emergency);
                Ok(self.session.form_succeeded(Dialog::Emergency, message))
            }
            Err(e) => Err(self.fail_form(e, EMERGENCY_FAILED)),
        }
    }

    /// Schedule a daily reminder through the reminder form
    pub async fn submit_reminder(&mut self, form: &ReminderForm) -> ChatResult<&Message> {
        let reminder = self.validate(form)?;
        self.session.begin_form()?;

        match self.backend.set_reminder(&reminder).await {
            Ok(confirmation) => {
                info!(medicine = %confirmation.medicine, time = %confirmation.time, "Reminder scheduled");
                let content = format!(
                    "✅ Medicine reminder set for **{}** at **{}** daily to {}.",
                    confirmation.medicine, confirmation.time, confirmation.to
                );
                let message = Message::assistant(content, AgentKind::MedicineReminder);
                Ok(self.session.form_succeeded(Dialog::Reminder, message))
            }
            Err(e) => Err(self.fail_form(e, REMINDER_FAILED)),
        }
    }

    fn validate<F: Form>(&mut self, form: &F) -> ChatResult<F::Payload> {
        form.validate().map_err(|e| {
            self.session.raise_alert(e.to_string());
            ChatError::Validation(e)
        })
    }

    fn fail_form(&mut self, error: ChatError, alert: &str) -> ChatError {
        warn!(session_id = %self.session.id(), error = %error, "Form submission failed");
        self.session.form_failed(alert);
        error
    }
}
