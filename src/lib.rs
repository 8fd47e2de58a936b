//! EventDesk client
//!
//! A headless administrative client for an event-management platform.
//! This library provides the API client with session handling, a
//! client-side event state store, the registration-and-payment workflow,
//! waitlist/refund/reminder/streaming management services, and a
//! rule-based chatbot with an optional text-generation assistant.

pub mod api;
pub mod chatbot;
pub mod config;
pub mod models;
pub mod payment;
pub mod services;
pub mod session;
pub mod store;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ApiError, ApiErrorKind, EventDeskError, Result};

// Re-export main components for easy access
pub use api::ApiClient;
pub use chatbot::{BotReply, ChatService};
pub use services::ServiceFactory;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use store::EventStore;
pub use workflow::RegistrationFlow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
