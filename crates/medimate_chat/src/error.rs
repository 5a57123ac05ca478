//! Error types for the chat core.

use thiserror::Error;

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Why a submission was turned away before any request was made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("Message is empty")]
    EmptyInput,

    #[error("A request is already in flight")]
    Busy,

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("Session was reset while the request was in flight")]
    Superseded,
}

/// Local input that never reaches the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields ({0} is missing)")]
    MissingField(&'static str),

    #[error("Please enter a valid phone number in international format (e.g., +923001112233).")]
    InvalidPhone(String),

    #[error("Please enter a valid time in HH:MM (24-hour) format (e.g., 09:30 or 14:00).")]
    InvalidTime(String),

    #[error("Please enter a valid age.")]
    InvalidAge(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),
}

/// Chat system errors
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend request failed ({status}): {detail}")]
    Http { status: u16, detail: String },

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Submission rejected: {0}")]
    Rejected(#[from] SubmitRejected),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatError {
    /// True for failures of the backend request itself
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }
}
