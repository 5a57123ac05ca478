//! Core types for the MediMate chat core.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Opaque identifier for a chat session
pub type SessionId = String;

/// Generate a fresh session id of the form `session-<unix millis>-<suffix>`.
pub fn new_session_id() -> SessionId {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("session-{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single chat message. Never mutated once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message ID (UUID)
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Message content (markdown)
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Agent that produced an assistant message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentKind>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            agent: None,
        }
    }

    /// Create a new assistant message attributed to an agent
    pub fn assistant(content: impl Into<String>, agent: AgentKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            agent: Some(agent),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// Agents the backend knows about.
///
/// Serialized as the display name, which is what the backend expects in the
/// `agent` field of a chat request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AgentKind {
    #[default]
    #[serde(rename = "Welcome Agent")]
    Welcome,
    #[serde(rename = "Health Check Agent")]
    HealthCheck,
    #[serde(rename = "Mental Health Agent")]
    MentalHealth,
    #[serde(rename = "Emergency Agent")]
    Emergency,
    #[serde(rename = "Medicine Reminder Agent")]
    MedicineReminder,
    #[serde(rename = "Diet Agent")]
    Diet,
    #[serde(rename = "COVID-19 Agent")]
    Covid19,
    #[serde(rename = "Registration Agent")]
    Registration,
}

impl AgentKind {
    /// Every agent, in catalog order
    pub const ALL: [AgentKind; 8] = [
        Self::Welcome,
        Self::HealthCheck,
        Self::MentalHealth,
        Self::Emergency,
        Self::MedicineReminder,
        Self::Diet,
        Self::Covid19,
        Self::Registration,
    ];

    /// Get the display name for this agent (also the wire value)
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome Agent",
            Self::HealthCheck => "Health Check Agent",
            Self::MentalHealth => "Mental Health Agent",
            Self::Emergency => "Emergency Agent",
            Self::MedicineReminder => "Medicine Reminder Agent",
            Self::Diet => "Diet Agent",
            Self::Covid19 => "COVID-19 Agent",
            Self::Registration => "Registration Agent",
        }
    }

    /// Display name without the trailing " Agent"
    pub fn short_name(&self) -> &'static str {
        let name = self.display_name();
        name.strip_suffix(" Agent").unwrap_or(name)
    }

    /// Get a brief description of this agent's role
    pub fn description(&self) -> &'static str {
        match self {
            Self::Welcome => "General health information and service overview",
            Self::HealthCheck => "Symptoms analysis and health assessments",
            Self::MentalHealth => "Emotional support and mental wellness",
            Self::Emergency => "Immediate emergency assistance and WhatsApp alerts",
            Self::MedicineReminder => "Medication schedules and WhatsApp reminders",
            Self::Diet => "Nutrition advice and dietary guidance",
            Self::Covid19 => "COVID-19 information and guidance",
            Self::Registration => "Patient registration and routing",
        }
    }

    /// Example query shown when the agent is picked from the catalog
    pub fn sample_query(&self) -> Option<&'static str> {
        match self {
            Self::Welcome => Some("Hello, can you help me with my health?"),
            Self::HealthCheck => Some("I have a headache and feeling unwell"),
            Self::MentalHealth => Some("I feel anxious and need emotional support"),
            Self::MedicineReminder => {
                Some("Set a reminder for Paracetamol at 08:00 for +923001112233")
            }
            Self::Diet => Some("What should I eat for better health?"),
            Self::Covid19 => Some("I have COVID-19 symptoms, what should I do?"),
            Self::Emergency | Self::Registration => None,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AgentKind {
    type Err = ChatError;

    /// Accepts the display name or the short name, case-insensitively.
    /// Spaces, dashes and underscores are ignored so `health-check` works too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |v: &str| -> String {
            v.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .collect::<String>()
                .to_lowercase()
        };
        let wanted = normalize(s.trim());
        Self::ALL
            .into_iter()
            .find(|agent| {
                normalize(agent.display_name()) == wanted || normalize(agent.short_name()) == wanted
            })
            .ok_or_else(|| ChatError::UnknownAgent(s.to_string()))
    }
}
