//! Backend configuration.
//!
//! The base URL is resolved from, in order: an explicit value, the
//! `MEDIMATE_BACKEND_URL` environment variable, `.medimate/settings.json`
//! in the workspace, and finally the hosted default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChatError, ChatResult};

/// Hosted MediMate backend
pub const DEFAULT_BACKEND_URL: &str = "https://medimate-backend-coral.vercel.app/api";

/// Environment variable overriding the backend URL
pub const BACKEND_URL_ENV: &str = "MEDIMATE_BACKEND_URL";

/// Where the REST backend lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(rename = "backendUrl")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Create a config for an explicit base URL
    pub fn new(base_url: impl AsRef<str>) -> ChatResult<Self> {
        let trimmed = base_url.as_ref().trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ChatError::Config(format!(
                "backend URL must start with http:// or https://, got '{}'",
                base_url.as_ref()
            )));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Read `MEDIMATE_BACKEND_URL`
    pub fn from_env() -> Option<ChatResult<Self>> {
        std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Self::new)
    }

    /// Read `<workspace>/.medimate/settings.json` (`{"backendUrl": "..."}`)
    pub fn from_settings(workspace_root: &Path) -> ChatResult<Option<Self>> {
        let settings_path = workspace_root.join(".medimate").join("settings.json");
        if !settings_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&settings_path)?;
        let settings: serde_json::Value = serde_json::from_str(&content)?;
        match settings.get("backendUrl").and_then(|v| v.as_str()) {
            Some(url) => {
                debug!(path = %settings_path.display(), "Loaded backend URL from settings");
                Self::new(url).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Resolve the effective config
    pub fn resolve(explicit: Option<&str>, workspace_root: &Path) -> ChatResult<Self> {
        if let Some(url) = explicit {
            return Self::new(url);
        }
        if let Some(config) = Self::from_env() {
            return config;
        }
        Ok(Self::from_settings(workspace_root)?.unwrap_or_default())
    }

    /// Full URL for an endpoint path such as `chat`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
