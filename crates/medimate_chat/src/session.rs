//! Chat session state machine.
//!
//! A [`ChatSession`] is a plain value. User actions and backend outcomes are
//! applied through its transition methods; nothing here performs I/O.
//!
//! ```text
//!            begin_submission            complete_submission
//!   Idle ────────────────────▶ Submitting ─────────────────────▶ Idle
//!     ▲                            │
//!     └──────────── reset ─────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::agents::AgentRouter;
use crate::backend::{ChatReply, ChatRequest};
use crate::error::{ChatError, SubmitRejected};
use crate::forms::validate_inline_phone;
use crate::types::{new_session_id, AgentKind, Message, SessionId};

/// Shown in place of a reply when the backend request fails
pub const CONNECTION_ERROR_MESSAGE: &str = "I apologize, but I'm having trouble connecting to the medical AI service. Please check your connection and try again. If the issue persists, please contact support.";

/// Used when the backend answers without any text
pub const DEFAULT_REPLY: &str = "I received your message and I'm here to help!";

/// Whether a request is outstanding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Submitting,
}

/// Transient UI surfaces
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Dialog {
    Registration,
    Emergency,
    Reminder,
    Sidebar,
    AgentDropdown,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
struct DialogFlags {
    registration: bool,
    emergency: bool,
    reminder: bool,
    sidebar: bool,
    agent_dropdown: bool,
}

impl DialogFlags {
    fn slot(&mut self, dialog: Dialog) -> &mut bool {
        match dialog {
            Dialog::Registration => &mut self.registration,
            Dialog::Emergency => &mut self.emergency,
            Dialog::Reminder => &mut self.reminder,
            Dialog::Sidebar => &mut self.sidebar,
            Dialog::AgentDropdown => &mut self.agent_dropdown,
        }
    }

    fn get(&self, dialog: Dialog) -> bool {
        match dialog {
            Dialog::Registration => self.registration,
            Dialog::Emergency => self.emergency,
            Dialog::Reminder => self.reminder,
            Dialog::Sidebar => self.sidebar,
            Dialog::AgentDropdown => self.agent_dropdown,
        }
    }
}

/// Shortcut cards on the landing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    HealthCheck,
    EmergencyAlert,
    MedicineReminder,
}

impl QuickAction {
    pub fn agent(&self) -> AgentKind {
        match self {
            Self::HealthCheck => AgentKind::HealthCheck,
            Self::EmergencyAlert => AgentKind::Emergency,
            Self::MedicineReminder => AgentKind::MedicineReminder,
        }
    }

    /// Draft placed in the input box
    pub fn template(&self) -> &'static str {
        match self {
            Self::HealthCheck => "I have symptoms that I need help diagnosing...",
            Self::EmergencyAlert => {
                "I need to send an emergency alert. Patient: [Name], Condition: [Description]"
            }
            Self::MedicineReminder => "Set a reminder for Paracetamol at 08:00 for +923001112233",
        }
    }
}

/// A submission that has been accepted and is waiting on the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub request: ChatRequest,
}

/// One continuous chat interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    id: SessionId,
    messages: Vec<Message>,
    selected_agent: AgentKind,
    /// Set once the user picks an agent explicitly; disables routing
    pinned: bool,
    busy: bool,
    dialogs: DialogFlags,
    draft: String,
    alert: Option<String>,
    registered: bool,
    created_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create a fresh idle session
    pub fn new() -> Self {
        let session = Self {
            id: new_session_id(),
            messages: Vec::new(),
            selected_agent: AgentKind::Welcome,
            pinned: false,
            busy: false,
            dialogs: DialogFlags::default(),
            draft: String::new(),
            alert: None,
            registered: false,
            created_at: Utc::now(),
        };
        info!(session_id = %session.id, "Started chat session");
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn selected_agent(&self) -> AgentKind {
        self.selected_agent
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        if self.busy {
            SessionState::Submitting
        } else {
            SessionState::Idle
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Pending alert text, if any
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Return and clear the pending alert
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub(crate) fn raise_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
    }

    /// Replace this session with a fresh one
    pub fn reset(&mut self) {
        let previous = std::mem::take(&mut self.id);
        *self = Self::new();
        info!(previous = %previous, session_id = %self.id, "Session reset");
    }

    /// Pin an agent chosen by the user
    pub fn select_agent(&mut self, agent: AgentKind) {
        self.selected_agent = agent;
        self.pinned = true;
        self.dialogs.agent_dropdown = false;
    }

    /// Pick an agent from the service catalog and pre-fill its sample query
    pub fn select_service(&mut self, agent: AgentKind) {
        self.select_agent(agent);
        self.draft = agent.sample_query().unwrap_or_default().to_string();
        self.dialogs.sidebar = false;
    }

    pub fn apply_quick_action(&mut self, action: QuickAction) {
        self.select_agent(action.agent());
        self.draft = action.template().to_string();
    }

    pub fn is_open(&self, dialog: Dialog) -> bool {
        self.dialogs.get(dialog)
    }

    pub fn open_dialog(&mut self, dialog: Dialog) {
        *self.dialogs.slot(dialog) = true;
    }

    pub fn close_dialog(&mut self, dialog: Dialog) {
        *self.dialogs.slot(dialog) = false;
    }

    pub fn toggle_dialog(&mut self, dialog: Dialog) {
        let slot = self.dialogs.slot(dialog);
        *slot = !*slot;
    }

    /// Accept `input` for sending.
    ///
    /// Rejected without any change when the input is blank or a request is
    /// already in flight. A request going to the Medicine Reminder agent,
    /// pinned or routed, with a malformed phone number is rejected after
    /// appending an explanatory assistant message.
    pub fn begin_submission(
        &mut self,
        input: &str,
        router: &AgentRouter,
    ) -> Result<PendingSubmission, SubmitRejected> {
        if self.busy {
            debug!(session_id = %self.id, "Submission rejected: busy");
            return Err(SubmitRejected::Busy);
        }
        if input.trim().is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }

        let agent = if self.pinned {
            self.selected_agent
        } else {
            router.select_agent(input, Some(self.selected_agent))
        };

        if agent == AgentKind::MedicineReminder {
            if let Err(e) = validate_inline_phone(input) {
                self.messages.push(Message::assistant(
                    agent_reply(agent, &e.to_string()),
                    agent,
                ));
                return Err(e.into());
            }
        }

        self.selected_agent = agent;
        self.busy = true;
        self.draft.clear();
        self.messages.push(Message::user(input));

        Ok(PendingSubmission {
            request: ChatRequest {
                message: input.to_string(),
                agent,
                timestamp: Utc::now(),
                session_id: self.id.clone(),
            },
        })
    }

    /// Apply the backend outcome of a pending submission.
    ///
    /// Returns the appended assistant message, or `None` when the submission
    /// belongs to a session that has since been reset. The error is borrowed
    /// so the caller keeps it for reporting.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<ChatReply, &ChatError>,
    ) -> Option<&Message> {
        if pending.request.session_id != self.id || !self.busy {
            debug!(
                session_id = %pending.request.session_id,
                "Dropping response for a superseded submission"
            );
            return None;
        }

        let agent = pending.request.agent;
        let content = match outcome {
            Ok(reply) => agent_reply(agent, reply.display_text().unwrap_or(DEFAULT_REPLY)),
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Chat request failed");
                CONNECTION_ERROR_MESSAGE.to_string()
            }
        };

        self.messages.push(Message::assistant(content, agent));
        self.busy = false;
        self.messages.last()
    }

    /// Mark the session busy for a form submission
    pub fn begin_form(&mut self) -> Result<(), SubmitRejected> {
        if self.busy {
            return Err(SubmitRejected::Busy);
        }
        self.busy = true;
        Ok(())
    }

    /// Close the form's dialog and post its confirmation
    pub fn form_succeeded(&mut self, dialog: Dialog, confirmation: Message) -> &Message {
        if dialog == Dialog::Registration {
            self.registered = true;
        }
        self.close_dialog(dialog);
        self.busy = false;
        self.messages.push(confirmation);
        &self.messages[self.messages.len() - 1]
    }

    /// Keep the dialog open and surface `alert`
    pub fn form_failed(&mut self, alert: impl Into<String>) {
        self.busy = false;
        self.raise_alert(alert);
    }
}

/// Prefix a reply with the agent header shown in the transcript
pub fn agent_reply(agent: AgentKind, text: &str) -> String {
    format!("👨‍⚕️ **{}**\n\n{}", agent.short_name(), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::MessageRole;

    fn router() -> AgentRouter {
        AgentRouter::new()
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ChatSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.messages().is_empty());
        assert_eq!(session.selected_agent(), AgentKind::Welcome);
        assert!(!session.is_pinned());
        assert!(session.id().starts_with("session-"));
    }

    #[test]
    fn test_blank_input_is_rejected_without_change() {
        let mut session = ChatSession::new();
        for input in ["", "   ", "\n\t"] {
            assert_eq!(
                session.begin_submission(input, &router()),
                Err(SubmitRejected::EmptyInput)
            );
        }
        assert!(session.messages().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_busy_guard() {
        let mut session = ChatSession::new();
        let pending = session.begin_submission("hello", &router()).unwrap();
        assert_eq!(session.state(), SessionState::Submitting);
        assert_eq!(pending.request.message, "hello");
        assert_eq!(pending.request.session_id, session.id());

        assert_eq!(
            session.begin_submission("again", &router()),
            Err(SubmitRejected::Busy)
        );
        assert_eq!(session.begin_form(), Err(SubmitRejected::Busy));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_successful_round_trip() {
        let mut session = ChatSession::new();
        let pending = session
            .begin_submission("I have a headache and fever", &router())
            .unwrap();
        assert_eq!(pending.request.agent, AgentKind::HealthCheck);
        assert_eq!(session.selected_agent(), AgentKind::HealthCheck);

        let reply = session
            .complete_submission(pending, Ok(ChatReply::text("Rest and hydrate.")))
            .unwrap();
        assert_eq!(reply.content, "👨‍⚕️ **Health Check**\n\nRest and hydrate.");
        assert_eq!(reply.agent, Some(AgentKind::HealthCheck));

        let roles: Vec<MessageRole> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_failed_round_trip() {
        let mut session = ChatSession::new();
        let pending = session.begin_submission("hello", &router()).unwrap();
        let error = ChatError::Http {
            status: 500,
            detail: "boom".to_string(),
        };
        let reply = session.complete_submission(pending, Err(&error)).unwrap();
        assert_eq!(reply.content, CONNECTION_ERROR_MESSAGE);

        assert_eq!(session.messages().len(), 2);
        assert!(session.messages()[0].is_user());
        assert!(!session.is_busy());

        // retry is allowed
        assert!(session.begin_submission("hello", &router()).is_ok());
    }

    #[test]
    fn test_empty_reply_uses_default_text() {
        let mut session = ChatSession::new();
        let pending = session.begin_submission("hi", &router()).unwrap();
        let reply = session
            .complete_submission(pending, Ok(ChatReply::default()))
            .unwrap();
        assert!(reply.content.ends_with(DEFAULT_REPLY));
        assert!(reply.content.contains("**Welcome**"));
    }

    #[test]
    fn test_pinned_agent_skips_routing() {
        let mut session = ChatSession::new();
        session.select_agent(AgentKind::Diet);
        let pending = session
            .begin_submission("this is an emergency", &router())
            .unwrap();
        assert_eq!(pending.request.agent, AgentKind::Diet);
    }

    #[test]
    fn test_unpinned_routing_falls_back_to_selected() {
        let mut session = ChatSession::new();
        let pending = session.begin_submission("what should I eat", &router()).unwrap();
        assert_eq!(pending.request.agent, AgentKind::Welcome);
        session.complete_submission(pending, Ok(ChatReply::text("ok")));

        let pending = session.begin_submission("covid tests?", &router()).unwrap();
        assert_eq!(pending.request.agent, AgentKind::Covid19);
        session.complete_submission(pending, Ok(ChatReply::text("ok")));

        // no keyword: stays on the routed agent
        let pending = session.begin_submission("thanks!", &router()).unwrap();
        assert_eq!(pending.request.agent, AgentKind::Covid19);
    }

    #[test]
    fn test_reminder_with_bad_phone_is_rejected() {
        let mut session = ChatSession::new();
        session.select_agent(AgentKind::MedicineReminder);
        let result = session.begin_submission("Remind me at 08:00 for 923001112233", &router());
        assert!(matches!(result, Err(SubmitRejected::Invalid(_))));
        assert!(!session.is_busy());
        assert_eq!(session.messages().len(), 1);
        assert!(session.messages()[0]
            .content
            .contains("valid phone number in international format"));

        let ok = session.begin_submission(
            "Set a reminder for Paracetamol at 08:00 for +923001112233",
            &router(),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_routed_reminder_with_bad_phone_is_rejected() {
        let mut session = ChatSession::new();
        assert!(!session.is_pinned());

        let result = session.begin_submission("take my pill for 923001112233", &router());
        assert!(matches!(
            result,
            Err(SubmitRejected::Invalid(ValidationError::InvalidPhone(_)))
        ));
        assert!(!session.is_busy());
        assert_eq!(session.selected_agent(), AgentKind::Welcome);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].agent, Some(AgentKind::MedicineReminder));

        // short numbers are not taken for a phone
        let pending = session
            .begin_submission("take my pill for 92300", &router())
            .unwrap();
        assert_eq!(pending.request.agent, AgentKind::MedicineReminder);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = ChatSession::new();
        session.select_agent(AgentKind::Emergency);
        session.open_dialog(Dialog::Emergency);
        let pending = session.begin_submission("help", &router()).unwrap();
        let old_id = session.id().to_string();

        session.reset();
        assert!(session.messages().is_empty());
        assert_eq!(session.selected_agent(), AgentKind::Welcome);
        assert!(!session.is_busy());
        assert!(!session.is_pinned());
        assert!(!session.is_open(Dialog::Emergency));
        assert_ne!(session.id(), old_id);

        // a late response for the old session is dropped
        assert!(session
            .complete_submission(pending, Ok(ChatReply::text("late")))
            .is_none());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_service_and_quick_action_drafts() {
        let mut session = ChatSession::new();
        session.open_dialog(Dialog::Sidebar);
        session.select_service(AgentKind::Diet);
        assert!(session.is_pinned());
        assert_eq!(session.draft(), "What should I eat for better health?");
        assert!(!session.is_open(Dialog::Sidebar));

        session.select_service(AgentKind::Emergency);
        assert_eq!(session.draft(), "");

        session.apply_quick_action(QuickAction::MedicineReminder);
        assert_eq!(session.selected_agent(), AgentKind::MedicineReminder);
        assert!(session.draft().contains("Paracetamol"));

        session.begin_submission("take my pill", &router()).unwrap();
        assert_eq!(session.draft(), "");
    }

    #[test]
    fn test_dialog_toggles() {
        let mut session = ChatSession::new();
        session.toggle_dialog(Dialog::Sidebar);
        assert!(session.is_open(Dialog::Sidebar));
        session.toggle_dialog(Dialog::Sidebar);
        assert!(!session.is_open(Dialog::Sidebar));

        session.open_dialog(Dialog::AgentDropdown);
        session.select_agent(AgentKind::Covid19);
        assert!(!session.is_open(Dialog::AgentDropdown));
    }

    #[test]
    fn test_form_outcomes() {
        let mut session = ChatSession::new();
        session.open_dialog(Dialog::Registration);
        session.begin_form().unwrap();
        session.form_failed("Registration failed. Please try again.");
        assert!(session.is_open(Dialog::Registration));
        assert!(!session.is_busy());
        assert_eq!(
            session.take_alert().as_deref(),
            Some("Registration failed. Please try again.")
        );
        assert!(session.alert().is_none());

        session.begin_form().unwrap();
        let msg = session.form_succeeded(
            Dialog::Registration,
            Message::assistant("welcome", AgentKind::Registration),
        );
        assert_eq!(msg.content, "welcome");
        assert!(session.is_registered());
        assert!(!session.is_open(Dialog::Registration));
        assert!(!session.is_busy());
    }
}
