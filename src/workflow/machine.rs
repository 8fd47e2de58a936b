//! Registration workflow state machine
//!
//! Phases carry exactly the data that is valid to hold in them, so
//! illegal states ("payment confirmed but no registration id") are
//! unrepresentable. All transitions go through [`apply`]; anything not
//! listed there is an invalid transition error.

use crate::models::{Registration, RegistrationStatus};
use crate::payment::PaymentIntent;
use crate::utils::errors::{EventDeskError, Result};

/// Phase of one registration attempt
#[derive(Debug, Clone)]
pub enum RegistrationPhase {
    /// Ticket/session/guest fields are being filled
    Selecting,
    /// Selection is free; no payment step occurs
    FreeConfirm,
    /// Payment UI is live against a backend intent; no registration
    /// record exists yet
    AwaitingPayment { intent: PaymentIntent },
    /// The registration exists and server-side confirmation is running
    ConfirmingPayment { registration_id: i64, intent_id: String },
    Confirmed { registration: Registration },
    Waitlisted { registration: Registration },
    Failed { message: String },
}

impl RegistrationPhase {
    /// Short phase name for logging and error messages
    pub fn name(&self) -> &'static str {
        match self {
            RegistrationPhase::Selecting => "selecting",
            RegistrationPhase::FreeConfirm => "free_confirm",
            RegistrationPhase::AwaitingPayment { .. } => "awaiting_payment",
            RegistrationPhase::ConfirmingPayment { .. } => "confirming_payment",
            RegistrationPhase::Confirmed { .. } => "confirmed",
            RegistrationPhase::Waitlisted { .. } => "waitlisted",
            RegistrationPhase::Failed { .. } => "failed",
        }
    }

    /// Whether the attempt reached a successful end state
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            RegistrationPhase::Confirmed { .. } | RegistrationPhase::Waitlisted { .. }
        )
    }
}

/// Something that happened while driving the workflow
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// A free selection passed validation
    FreeSelectionSubmitted,
    /// The backend issued a payment intent for the exact selected price
    PaymentIntentReady { intent: PaymentIntent },
    /// The registration record was created server-side
    RegistrationCreated { registration: Registration },
    /// Server-side payment confirmation succeeded
    PaymentConfirmed { registration: Registration },
    /// Any step failed
    WorkflowFailed { message: String },
}

impl WorkflowEvent {
    fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::FreeSelectionSubmitted => "free_selection_submitted",
            WorkflowEvent::PaymentIntentReady { .. } => "payment_intent_ready",
            WorkflowEvent::RegistrationCreated { .. } => "registration_created",
            WorkflowEvent::PaymentConfirmed { .. } => "payment_confirmed",
            WorkflowEvent::WorkflowFailed { .. } => "workflow_failed",
        }
    }
}

/// The server decides confirmed vs waitlisted at confirmation time; the
/// client only maps the returned status onto a phase
fn settled(registration: Registration) -> RegistrationPhase {
    if registration.status == RegistrationStatus::Waitlisted {
        RegistrationPhase::Waitlisted { registration }
    } else {
        RegistrationPhase::Confirmed { registration }
    }
}

/// Apply one event to the current phase, producing the next phase or an
/// invalid-transition error
pub fn apply(current: &RegistrationPhase, event: WorkflowEvent) -> Result<RegistrationPhase> {
    match (current, event) {
        (RegistrationPhase::Selecting, WorkflowEvent::FreeSelectionSubmitted) => {
            Ok(RegistrationPhase::FreeConfirm)
        }
        (RegistrationPhase::Selecting, WorkflowEvent::PaymentIntentReady { intent }) => {
            Ok(RegistrationPhase::AwaitingPayment { intent })
        }
        (RegistrationPhase::FreeConfirm, WorkflowEvent::RegistrationCreated { registration }) => {
            Ok(settled(registration))
        }
        (
            RegistrationPhase::AwaitingPayment { intent },
            WorkflowEvent::RegistrationCreated { registration },
        ) => Ok(RegistrationPhase::ConfirmingPayment {
            registration_id: registration.id,
            intent_id: intent.id.clone(),
        }),
        (
            RegistrationPhase::ConfirmingPayment { .. },
            WorkflowEvent::PaymentConfirmed { registration },
        ) => Ok(settled(registration)),
        (current, WorkflowEvent::WorkflowFailed { message })
            if !current.is_settled() =>
        {
            Ok(RegistrationPhase::Failed { message })
        }
        (current, event) => Err(EventDeskError::InvalidStateTransition {
            from: current.name().to_string(),
            to: event.name().to_string(),
        }),
    }
}
