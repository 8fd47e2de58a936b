//! Services module
//!
//! This module contains the per-endpoint-family services and the factory
//! wiring them to a shared API client.

pub mod auth;
pub mod events;
pub mod refunds;
pub mod registrations;
pub mod reminders;
pub mod streaming;
pub mod waitlist;

// Re-export commonly used services
pub use auth::AuthService;
pub use events::EventService;
pub use refunds::{RefundService, RefundSnapshot};
pub use registrations::{ExportFormat, RegistrationService};
pub use reminders::ReminderService;
pub use streaming::{StreamSettings, StreamState, StreamStatus, StreamingService};
pub use waitlist::{BulkActionOutcome, WaitlistService, WaitlistSnapshot};

use std::sync::Arc;

use crate::api::ApiClient;
use crate::chatbot::ChatService;
use crate::config::Settings;
use crate::payment::{HttpPaymentProcessor, PaymentProcessor};
use crate::session::SessionStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub waitlist_service: WaitlistService,
    pub refund_service: RefundService,
    pub reminder_service: ReminderService,
    pub streaming_service: StreamingService,
    pub chat_service: ChatService,
    api: ApiClient,
    payment_processor: Arc<dyn PaymentProcessor>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        let api = ApiClient::new(&settings.api, sessions)?;
        let payment_processor: Arc<dyn PaymentProcessor> =
            Arc::new(HttpPaymentProcessor::new(&settings.payment)?);

        Ok(Self {
            auth_service: AuthService::new(api.clone()),
            event_service: EventService::new(api.clone()),
            registration_service: RegistrationService::new(api.clone()),
            waitlist_service: WaitlistService::new(api.clone()),
            refund_service: RefundService::new(api.clone()),
            reminder_service: ReminderService::new(api.clone()),
            streaming_service: StreamingService::new(api.clone()),
            chat_service: ChatService::new(&settings.assistant, &settings.features),
            api,
            payment_processor,
        })
    }

    /// The shared API client
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The configured payment processor
    pub fn payment_processor(&self) -> Arc<dyn PaymentProcessor> {
        Arc::clone(&self.payment_processor)
    }

    /// Replace the payment processor (used by tests and the backend's
    /// test mode tooling)
    pub fn with_payment_processor(mut self, processor: Arc<dyn PaymentProcessor>) -> Self {
        self.payment_processor = processor;
        self
    }
}
