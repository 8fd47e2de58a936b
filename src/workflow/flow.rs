//! Registration workflow driver
//!
//! [`RegistrationFlow`] owns one registration attempt: selection state,
//! the machine phase, and the services it orchestrates. Submission
//! sequences the payment ordering invariant; failure semantics follow
//! the phase reached:
//! - card-validation failure aborts before any server mutation;
//! - registration-creation failure aborts before confirmation;
//! - confirmation failure after creation triggers exactly one
//!   compensating cancel-payment call, never retried.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::models::{Event, GuestDetails, Registration, RegistrationRequest};
use crate::payment::{CardDetails, PaymentProcessor};
use crate::services::{EventService, RegistrationService};
use crate::utils::errors::{ApiError, EventDeskError, Result};
use crate::utils::logging::log_workflow_step;

use super::machine::{apply, RegistrationPhase, WorkflowEvent};

/// A guest-identity input field, used to clear server errors that
/// implicate the field the user is re-editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestField {
    FullName,
    Email,
    Phone,
    Country,
}

impl GuestField {
    fn api_name(self) -> &'static str {
        match self {
            GuestField::FullName => "full_name",
            GuestField::Email => "email",
            GuestField::Phone => "phone",
            GuestField::Country => "country",
        }
    }
}

/// Result of a settled registration attempt. The event is refetched from
/// the server so availability and counts reflect concurrent activity.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub registration: Registration,
    pub event: Event,
}

/// One registration attempt against one event
#[derive(Debug)]
pub struct RegistrationFlow {
    registrations: RegistrationService,
    events: EventService,
    processor: Arc<dyn PaymentProcessor>,
    event: Event,
    authenticated: bool,
    ticket_type_id: Option<i64>,
    session_type_id: Option<i64>,
    guest: Option<GuestDetails>,
    phase: RegistrationPhase,
    last_error: Option<ApiError>,
}

impl RegistrationFlow {
    /// Create a new RegistrationFlow instance for one event
    pub fn new(
        event: Event,
        registrations: RegistrationService,
        events: EventService,
        processor: Arc<dyn PaymentProcessor>,
        authenticated: bool,
    ) -> Self {
        Self {
            registrations,
            events,
            processor,
            event,
            authenticated,
            ticket_type_id: None,
            session_type_id: None,
            guest: None,
            phase: RegistrationPhase::Selecting,
            last_error: None,
        }
    }

    /// Current machine phase
    pub fn phase(&self) -> &RegistrationPhase {
        &self.phase
    }

    /// The last server error, if any. Cleared when the user re-edits the
    /// implicated field.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// The event this flow registers for, as last seen from the server
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Choose a ticket type. Sold-out types without an open waitlist are
    /// not selectable.
    pub fn choose_ticket_type(&mut self, ticket_type_id: i64) -> Result<()> {
        let ticket = self.event.ticket_type(ticket_type_id).ok_or_else(|| {
            EventDeskError::InvalidInput("Unknown ticket type for this event".to_string())
        })?;
        if !ticket.is_selectable() {
            return Err(EventDeskError::InvalidInput(format!(
                "Ticket type '{}' is sold out",
                ticket.name
            )));
        }
        self.ticket_type_id = Some(ticket_type_id);
        Ok(())
    }

    /// Fall back to the event's flat default price and terms
    pub fn clear_ticket_type(&mut self) {
        self.ticket_type_id = None;
    }

    /// Choose a session. Only active session types are valid choices.
    pub fn choose_session_type(&mut self, session_type_id: i64) -> Result<()> {
        let session = self.event.session_type(session_type_id).ok_or_else(|| {
            EventDeskError::InvalidInput("Unknown session for this event".to_string())
        })?;
        if !session.is_active {
            return Err(EventDeskError::InvalidInput(format!(
                "Session '{}' is not open for registration",
                session.name
            )));
        }
        self.session_type_id = Some(session_type_id);
        Ok(())
    }

    /// Replace the guest identity wholesale
    pub fn set_guest_details(&mut self, guest: GuestDetails) {
        self.guest = Some(guest);
    }

    /// Edit one guest field. A server error implicating that field is
    /// cleared, so the user can fix a duplicate email without resetting
    /// the form.
    pub fn edit_guest_field(&mut self, field: GuestField, value: impl Into<String>) {
        let guest = self.guest.get_or_insert_with(|| GuestDetails {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            country: String::new(),
        });
        let value = value.into();
        match field {
            GuestField::FullName => guest.full_name = value,
            GuestField::Email => guest.email = value,
            GuestField::Phone => guest.phone = value,
            GuestField::Country => guest.country = value,
        }

        if self
            .last_error
            .as_ref()
            .is_some_and(|e| e.implicates_field(field.api_name()))
        {
            self.last_error = None;
        }
    }

    /// The exact amount the selection costs: ticket-type price overrides
    /// the event's flat price when a ticket type is selected
    pub fn resolved_amount_cents(&self) -> i64 {
        self.ticket_type_id
            .and_then(|id| self.event.ticket_type(id))
            .map(|t| t.effective_price_cents())
            .unwrap_or(self.event.price_cents)
    }

    /// Return a failed attempt to the selection phase, keeping the
    /// filled fields
    pub fn reset(&mut self) {
        if matches!(self.phase, RegistrationPhase::Failed { .. }) {
            self.phase = RegistrationPhase::Selecting;
        }
    }

    /// Submit the current selection. Paid selections require card
    /// details; free ones ignore them.
    pub async fn submit(&mut self, card: Option<&CardDetails>) -> Result<RegistrationOutcome> {
        if !matches!(self.phase, RegistrationPhase::Selecting) {
            return Err(EventDeskError::InvalidStateTransition {
                from: self.phase.name().to_string(),
                to: "submit".to_string(),
            });
        }

        self.validate_selection()?;

        let amount_cents = self.resolved_amount_cents();
        let result = if amount_cents == 0 {
            self.submit_free().await
        } else {
            self.submit_paid(amount_cents, card).await
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if let EventDeskError::Api(api) = &e {
                    self.last_error = Some(api.clone());
                }
                // Settled phases reject the failure event; anything else
                // lands in Failed.
                let _ = self.advance(WorkflowEvent::WorkflowFailed {
                    message: e.user_message(),
                });
                Err(e)
            }
        }
    }

    fn advance(&mut self, event: WorkflowEvent) -> Result<()> {
        self.phase = apply(&self.phase, event)?;
        log_workflow_step(self.event.id, self.phase.name(), None);
        Ok(())
    }

    /// Client-side gating before any call leaves the process
    fn validate_selection(&self) -> Result<()> {
        if self.event.requires_session_choice() {
            let chosen = self.session_type_id.ok_or_else(|| {
                EventDeskError::InvalidInput(
                    "Please choose a session before registering".to_string(),
                )
            })?;
            let valid = self
                .event
                .session_type(chosen)
                .map(|s| s.is_active)
                .unwrap_or(false);
            if !valid {
                return Err(EventDeskError::InvalidInput(
                    "The chosen session is no longer available".to_string(),
                ));
            }
        }

        if let Some(id) = self.ticket_type_id {
            let ticket = self.event.ticket_type(id).ok_or_else(|| {
                EventDeskError::InvalidInput("Unknown ticket type for this event".to_string())
            })?;
            if !ticket.is_selectable() {
                return Err(EventDeskError::InvalidInput(format!(
                    "Ticket type '{}' is sold out",
                    ticket.name
                )));
            }
        }

        if !self.authenticated {
            let guest = self.guest.as_ref().ok_or_else(|| {
                EventDeskError::InvalidInput(
                    "Guest details are required to register without an account".to_string(),
                )
            })?;
            guest.validate()?;
        }

        Ok(())
    }

    fn registration_request(&self, payment_intent_id: Option<String>) -> RegistrationRequest {
        RegistrationRequest {
            event_id: self.event.id,
            ticket_type_id: self.ticket_type_id,
            session_type_id: self.session_type_id,
            guest: if self.authenticated { None } else { self.guest.clone() },
            payment_intent_id,
        }
    }

    async fn submit_free(&mut self) -> Result<RegistrationOutcome> {
        self.advance(WorkflowEvent::FreeSelectionSubmitted)?;

        let registration = self
            .registrations
            .register(&self.registration_request(None))
            .await?;
        self.advance(WorkflowEvent::RegistrationCreated {
            registration: registration.clone(),
        })?;

        info!(
            registration_id = registration.id,
            event_id = self.event.id,
            phase = self.phase.name(),
            "Free registration settled"
        );
        Ok(self.finish(registration).await)
    }

    async fn submit_paid(
        &mut self,
        amount_cents: i64,
        card: Option<&CardDetails>,
    ) -> Result<RegistrationOutcome> {
        let card = card.ok_or_else(|| {
            EventDeskError::InvalidInput(
                "Card details are required for a paid registration".to_string(),
            )
        })?;

        let intent = self
            .registrations
            .create_payment_intent(self.event.id, self.ticket_type_id, amount_cents)
            .await?;
        self.advance(WorkflowEvent::PaymentIntentReady {
            intent: intent.clone(),
        })?;

        // Card validation happens before any registration exists, so a
        // failure here leaves nothing to roll back.
        let method_id = self.processor.create_payment_method(card).await?;
        self.processor.confirm_card_payment(&intent, &method_id).await?;

        let registration = self
            .registrations
            .register(&self.registration_request(Some(intent.id.clone())))
            .await?;
        self.advance(WorkflowEvent::RegistrationCreated {
            registration: registration.clone(),
        })?;

        match self
            .registrations
            .confirm_payment(registration.id, &intent.id)
            .await
        {
            Ok(confirmed) => {
                self.advance(WorkflowEvent::PaymentConfirmed {
                    registration: confirmed.clone(),
                })?;
                info!(
                    registration_id = confirmed.id,
                    event_id = self.event.id,
                    phase = self.phase.name(),
                    "Paid registration settled"
                );
                Ok(self.finish(confirmed).await)
            }
            Err(e) => {
                // One compensating cancel; its own failure is surfaced in
                // the log but not retried.
                if let Err(cancel_err) = self.registrations.cancel_payment(registration.id).await {
                    error!(
                        registration_id = registration.id,
                        error = %cancel_err,
                        "Compensating cancel-payment failed"
                    );
                }
                Err(e)
            }
        }
    }

    /// Refetch the event so availability and registration counts come
    /// from the server; a refetch failure keeps the settled outcome.
    async fn finish(&mut self, registration: Registration) -> RegistrationOutcome {
        let event = match self.events.get_event(self.event.id).await {
            Ok(event) => {
                self.event = event.clone();
                event
            }
            Err(e) => {
                warn!(event_id = self.event.id, error = %e, "Post-registration event refresh failed");
                self.event.clone()
            }
        };

        RegistrationOutcome { registration, event }
    }
}
