//! Registration service implementation
//!
//! Wrappers over the registration endpoints: creation, listing,
//! cancellation, the payment-intent/confirm/cancel trio used by the
//! registration workflow, and file export.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::models::{Page, Registration, RegistrationFilters, RegistrationRequest};
use crate::payment::PaymentIntent;
use crate::utils::errors::Result;

/// Export formats offered for registration lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Serialize)]
struct PaymentIntentRequest {
    event_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket_type_id: Option<i64>,
    amount_cents: i64,
}

/// Registration service for attendee operations
#[derive(Debug, Clone)]
pub struct RegistrationService {
    api: ApiClient,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create a registration. For paid selections this must only be
    /// called after card validation succeeded; the workflow enforces it.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Registration> {
        let registration: Registration = self.api.post("registrations", request).await?;
        info!(
            registration_id = registration.id,
            event_id = registration.event_id,
            status = ?registration.status,
            "Registration created"
        );
        Ok(registration)
    }

    /// List registrations matching the given filters
    pub async fn list(&self, filters: &RegistrationFilters) -> Result<Page<Registration>> {
        self.api.get("registrations", &filters.to_query()).await
    }

    /// Cancel a registration on behalf of its owner
    pub async fn cancel(&self, registration_id: i64) -> Result<Registration> {
        self.api
            .post(&format!("registrations/{}/cancel", registration_id), &json!({}))
            .await
    }

    /// Obtain a temporary payment intent for the exact selected price
    pub async fn create_payment_intent(
        &self,
        event_id: i64,
        ticket_type_id: Option<i64>,
        amount_cents: i64,
    ) -> Result<PaymentIntent> {
        debug!(event_id = event_id, amount_cents = amount_cents, "Creating payment intent");
        self.api
            .post(
                "payments/intent",
                &PaymentIntentRequest {
                    event_id,
                    ticket_type_id,
                    amount_cents,
                },
            )
            .await
    }

    /// Server-side payment confirmation for a created registration
    pub async fn confirm_payment(
        &self,
        registration_id: i64,
        payment_intent_id: &str,
    ) -> Result<Registration> {
        self.api
            .post(
                &format!("registrations/{}/confirm_payment", registration_id),
                &json!({ "payment_intent_id": payment_intent_id }),
            )
            .await
    }

    /// Compensating cancel for a registration whose confirmation failed
    pub async fn cancel_payment(&self, registration_id: i64) -> Result<()> {
        self.api
            .post_no_content(
                &format!("registrations/{}/cancel_payment", registration_id),
                &json!({}),
            )
            .await
    }

    /// Export an event's registrations as a file
    pub async fn export(&self, event_id: i64, format: ExportFormat) -> Result<Vec<u8>> {
        self.api
            .get_bytes(
                &format!("events/{}/registrations/export", event_id),
                &[("format", format.as_str().to_string())],
            )
            .await
    }
}
