//! Registration workflow module
//!
//! The registration-and-payment workflow is an explicit state machine:
//! phases and events live in [`machine`], with a single transition
//! function that rejects illegal moves, and [`flow`] drives it against
//! the services. The ordering invariant — no registration record before
//! successful card validation, server-side confirmation after creation,
//! compensating cancel when confirmation fails — is enforced by the
//! driver's sequencing plus the machine's transition checks.

pub mod cancellation;
pub mod flow;
pub mod machine;

pub use cancellation::{can_cancel, CANCELLATION_CUTOFF_HOURS};
pub use flow::{GuestField, RegistrationFlow, RegistrationOutcome};
pub use machine::{apply, RegistrationPhase, WorkflowEvent};
