//! Payment processor integration
//!
//! The registration workflow validates a card against a backend-issued
//! payment intent before any registration record exists. That validation
//! goes through the [`PaymentProcessor`] trait so tests can substitute a
//! scripted processor; the HTTP implementation talks to the real
//! processor's method and intent endpoints. Test mode performs
//! method-only validation and skips intent confirmation, mirroring the
//! backend's distinction; it applies when the client is configured for
//! it or when the backend marks the intent itself as a test intent.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::PaymentConfig;
use crate::utils::errors::{EventDeskError, Result};

/// A backend-issued payment intent for one exact amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount_cents: i64,
    pub currency: String,
    pub test_mode: bool,
}

/// Card details captured from the registrant. Never logged.
#[derive(Debug, Clone, Serialize)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

/// Client-side payment processor operations
pub trait PaymentProcessor: Send + Sync + std::fmt::Debug {
    /// Validate the card and obtain a reusable payment-method id
    fn create_payment_method<'a>(&'a self, card: &'a CardDetails) -> BoxFuture<'a, Result<String>>;

    /// Confirm the intent with the validated method. In test mode this is
    /// a no-op beyond logging.
    fn confirm_card_payment<'a>(
        &'a self,
        intent: &'a PaymentIntent,
        method_id: &'a str,
    ) -> BoxFuture<'a, Result<()>>;
}

#[derive(Debug, Deserialize)]
struct PaymentMethodResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ConfirmResponse {
    status: String,
    #[serde(default)]
    decline_reason: Option<String>,
}

/// HTTP implementation against the processor's REST surface
#[derive(Debug, Clone)]
pub struct HttpPaymentProcessor {
    http: Client,
    base_url: Url,
    test_mode: bool,
}

impl HttpPaymentProcessor {
    /// Create a new HttpPaymentProcessor instance
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(EventDeskError::Http)?;

        Ok(Self {
            http,
            base_url,
            test_mode: config.test_mode,
        })
    }
}

impl PaymentProcessor for HttpPaymentProcessor {
    fn create_payment_method<'a>(&'a self, card: &'a CardDetails) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let url = self.base_url.join("v1/payment_methods")?;
            debug!("Validating payment method");

            let response = self
                .http
                .post(url)
                .json(card)
                .send()
                .await
                .map_err(EventDeskError::Http)?;

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                let reason = if text.trim().is_empty() {
                    "Card was rejected by the payment processor".to_string()
                } else {
                    text
                };
                return Err(EventDeskError::PaymentDeclined(reason));
            }

            let method: PaymentMethodResponse =
                response.json().await.map_err(EventDeskError::Http)?;
            debug!(method_id = %method.id, "Payment method validated");
            Ok(method.id)
        })
    }

    fn confirm_card_payment<'a>(
        &'a self,
        intent: &'a PaymentIntent,
        method_id: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.test_mode || intent.test_mode {
                info!(intent_id = %intent.id, "Test mode: skipping intent confirmation");
                return Ok(());
            }

            let url = self
                .base_url
                .join(&format!("v1/payment_intents/{}/confirm", intent.id))?;
            debug!(intent_id = %intent.id, "Confirming card payment");

            let response = self
                .http
                .post(url)
                .json(&serde_json::json!({
                    "payment_method": method_id,
                    "client_secret": intent.client_secret,
                }))
                .send()
                .await
                .map_err(EventDeskError::Http)?;

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                let reason = if text.trim().is_empty() {
                    "Payment confirmation failed".to_string()
                } else {
                    text
                };
                return Err(EventDeskError::PaymentDeclined(reason));
            }

            let confirmation: ConfirmResponse =
                response.json().await.map_err(EventDeskError::Http)?;
            if confirmation.status != "succeeded" {
                let reason = confirmation
                    .decline_reason
                    .unwrap_or_else(|| format!("Payment ended in status '{}'", confirmation.status));
                return Err(EventDeskError::PaymentDeclined(reason));
            }

            info!(intent_id = %intent.id, "Card payment confirmed");
            Ok(())
        })
    }
}
