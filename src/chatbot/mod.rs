//! Chatbot widget module
//!
//! A rule-based responder keyed by user role and message keywords, with
//! an optional external text-generation assistant consulted first. Any
//! assistant failure (missing credential, network error, malformed
//! response) silently falls back to the canned table; the user never
//! sees assistant errors. No state is retained beyond the transcript the
//! caller passes in.

pub mod assistant;
pub mod rules;

use tracing::warn;

use crate::config::{AssistantConfig, FeaturesConfig};
use crate::models::Role;

pub use assistant::ChatAssistant;
pub use rules::{respond, BotReply};

/// One turn of the visible conversation transcript
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub from_user: bool,
    pub text: String,
}

/// Chat service combining the optional assistant with the canned rules
#[derive(Debug, Clone)]
pub struct ChatService {
    assistant: Option<ChatAssistant>,
}

impl ChatService {
    /// Create a new ChatService instance. The assistant path activates
    /// only when the feature flag is on and a credential is configured.
    pub fn new(config: &AssistantConfig, features: &FeaturesConfig) -> Self {
        let assistant = if features.assistant {
            ChatAssistant::from_config(config)
        } else {
            None
        };
        Self { assistant }
    }

    /// Answer a user message for the given role
    pub async fn respond(&self, message: &str, role: Role, history: &[ChatTurn]) -> BotReply {
        if let Some(assistant) = &self.assistant {
            match assistant.respond(message, role, history).await {
                Ok(reply) => return reply,
                Err(e) => {
                    warn!(error = %e, "Assistant call failed; using canned response");
                }
            }
        }

        rules::respond(message, role)
    }

    /// Whether the external assistant path is active
    pub fn assistant_enabled(&self) -> bool {
        self.assistant.is_some()
    }
}
