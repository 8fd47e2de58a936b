//! External text-generation assistant
//!
//! Optional path consulted before the canned rule table. The request uses
//! a role-specific instruction preamble and the visible transcript; every
//! failure mode surfaces as an error to the caller, which falls back to
//! the canned table.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssistantConfig;
use crate::models::Role;
use crate::utils::errors::{EventDeskError, Result};

use super::rules;
use super::{BotReply, ChatTurn};

#[derive(Debug, Serialize)]
struct GenerationMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<GenerationMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    choices: Vec<GenerationChoice>,
}

#[derive(Debug, Deserialize)]
struct GenerationChoice {
    message: GenerationReply,
}

#[derive(Debug, Deserialize)]
struct GenerationReply {
    content: String,
}

fn preamble(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => {
            "You are the support assistant of an event-management platform, \
             talking to a platform administrator. Answer concisely about \
             events, registrations, waitlists, refunds, reminders, streaming \
             and exports."
        }
        Role::Organizer => {
            "You are the support assistant of an event-management platform, \
             talking to an event organizer. Answer concisely about managing \
             events, registrations, waitlists, refunds, reminders and \
             streaming."
        }
        Role::Participant => {
            "You are the support assistant of an event-management platform, \
             talking to an attendee. Answer concisely about registering, \
             tickets, waitlists, cancellations and refunds."
        }
    }
}

/// Client for the external text-generation endpoint
#[derive(Debug, Clone)]
pub struct ChatAssistant {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ChatAssistant {
    /// Build the assistant when a credential is configured; a missing
    /// credential disables the external path entirely.
    pub fn from_config(config: &AssistantConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .ok()?;

        Some(Self {
            http,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Ask the external endpoint for a reply
    pub async fn respond(&self, message: &str, role: Role, history: &[ChatTurn]) -> Result<BotReply> {
        let mut messages = vec![GenerationMessage {
            role: "system",
            content: preamble(role),
        }];
        for turn in history {
            messages.push(GenerationMessage {
                role: if turn.from_user { "user" } else { "assistant" },
                content: &turn.text,
            });
        }
        messages.push(GenerationMessage {
            role: "user",
            content: message,
        });

        debug!(model = %self.model, turns = history.len(), "Assistant request");
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequest {
                model: &self.model,
                max_tokens: self.max_tokens,
                messages,
            })
            .send()
            .await
            .map_err(EventDeskError::Http)?;

        if !response.status().is_success() {
            return Err(EventDeskError::ServiceUnavailable(format!(
                "Assistant endpoint returned {}",
                response.status()
            )));
        }

        let generation: GenerationResponse =
            response.json().await.map_err(EventDeskError::Http)?;
        let text = generation
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                EventDeskError::ServiceUnavailable("Assistant returned no content".to_string())
            })?;

        // Suggestions stay canned; the assistant only writes prose.
        let suggestions = rules::respond(message, role).suggestions;
        Ok(BotReply { text, suggestions })
    }
}
