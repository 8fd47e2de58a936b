//! Utility modules
//!
//! Common error types, helpers, logging setup, and the polling handle.

pub mod errors;
pub mod helpers;
pub mod logging;
pub mod polling;

pub use errors::{ApiError, ApiErrorKind, EventDeskError, FieldError, Result};
pub use polling::{start_polling, PollHandle};
