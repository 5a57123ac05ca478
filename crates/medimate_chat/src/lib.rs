//! # medimate_chat - Chat core for the MediMate assistant
//!
//! The MediMate backend does the medical work; this crate holds everything
//! the client decides on its own:
//! - **Agent routing**: keyword rules picking an agent for free text
//! - **Session state**: transcript, busy guard, selected agent, dialogs
//! - **Forms**: registration, emergency alert and medicine reminder, with
//!   local validation
//! - **Backend client**: thin REST calls over `reqwest`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ ChatController  │────▶│   ChatSession   │────▶│   AgentRouter   │
//! └────────┬────────┘     └─────────────────┘     └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │   ChatBackend   │────▶│  MediMate REST  │
//! └─────────────────┘     └─────────────────┘
//! ```

pub mod agents;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod forms;
pub mod session;
pub mod types;

pub use agents::*;
pub use backend::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use forms::*;
pub use session::*;
pub use types::*;

/// Greeting shown when a chat starts. Not part of the transcript.
pub const WELCOME_BANNER: &str = r#"# 🏥 Welcome to MediMate!

I'm your **AI healthcare assistant**. Here's how I can help you:

## Available Services:
- 🩺 **General Checkup** - Health advice and consultations
- 🚨 **Emergency Services** - Immediate medical assistance
- 🦠 **COVID-19 Information** - Testing, vaccines, and prevention
- 💊 **Medicine Reminders** - Medication schedules and alerts
- 🍎 **Dietary Advice** - Nutritional guidance for health conditions
- 🧠 **Mental Health Support** - Counseling and crisis resources

> **Important**: For medical emergencies, call **1122** immediately!

Please **register first** or select a service to get started. How can I assist you today?"#;
