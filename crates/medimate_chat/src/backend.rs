//! REST backend client.
//!
//! The backend does all the real work (language understanding, dispatching
//! alerts, scheduling reminders). This module only shapes requests and reads
//! back the text to display.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{ChatError, ChatResult};
use crate::forms::{
    EmergencyAlert, EmergencyForm, Form, Registration, RegistrationForm, ReminderConfirmation,
    ReminderForm,
};
use crate::types::{AgentKind, SessionId};

/// Body of `POST {base}/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub agent: AgentKind,
    pub timestamp: DateTime<Utc>,
    pub session_id: SessionId,
}

/// Reply to a chat request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    /// Reply carrying only response text
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::default()
        }
    }

    /// First non-empty of `response` and `message`
    pub fn display_text(&self) -> Option<&str> {
        self.response
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Reply carrying a free-form `response` text (registration, emergency)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// The external MediMate service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a chat message to an agent
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatReply>;

    /// Register a patient
    async fn register(&self, registration: &Registration) -> ChatResult<TextReply>;

    /// Raise an emergency alert
    async fn emergency(&self, alert: &EmergencyAlert) -> ChatResult<TextReply>;

    /// Schedule a daily medicine reminder
    async fn set_reminder(&self, reminder: &ReminderForm) -> ChatResult<ReminderConfirmation>;
}

/// Backend reached over HTTP(S)
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a backend sharing an existing client
    pub fn with_client(config: BackendConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> ChatResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            warn!(%url, status = status.as_u16(), %detail, "Backend returned an error");
            return Err(ChatError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatReply> {
        self.post_json("chat", request).await
    }

    async fn register(&self, registration: &Registration) -> ChatResult<TextReply> {
        self.post_json(RegistrationForm::PATH, registration).await
    }

    async fn emergency(&self, alert: &EmergencyAlert) -> ChatResult<TextReply> {
        self.post_json(EmergencyForm::PATH, alert).await
    }

    async fn set_reminder(&self, reminder: &ReminderForm) -> ChatResult<ReminderConfirmation> {
        self.post_json(ReminderForm::PATH, reminder).await
    }
}
