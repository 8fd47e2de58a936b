//! Registrant cancellation guard
//!
//! The cancel control is offered only for certain statuses and disabled
//! within a cutoff window before the event starts. This is a UX guard:
//! the backend enforces the authoritative cutoff and the service still
//! forwards the call, surfacing server rejections.

use chrono::{DateTime, Utc};

use crate::models::{Registration, RegistrationStatus};
use crate::utils::helpers::hours_until;

/// Client-side cutoff before event start. The backend contract is
/// assumed to match; see DESIGN.md.
pub const CANCELLATION_CUTOFF_HOURS: i64 = 12;

/// Statuses whose owner may still cancel
pub fn status_allows_cancellation(status: RegistrationStatus) -> bool {
    matches!(
        status,
        RegistrationStatus::Pending
            | RegistrationStatus::Confirmed
            | RegistrationStatus::Waitlisted
            | RegistrationStatus::Attended
    )
}

/// Whether the cancel control should be enabled for this registration
pub fn can_cancel(
    registration: &Registration,
    event_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status_allows_cancellation(registration.status)
        && hours_until(event_start, now) >= CANCELLATION_CUTOFF_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;
    use chrono::Duration;

    fn registration(status: RegistrationStatus) -> Registration {
        let now = Utc::now();
        Registration {
            id: 1,
            event_id: 1,
            user_id: Some(1),
            guest: None,
            ticket_type_id: None,
            session_type_id: None,
            status,
            payment_status: PaymentStatus::Paid,
            amount_paid_cents: 5000,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_gate() {
        assert!(status_allows_cancellation(RegistrationStatus::Pending));
        assert!(status_allows_cancellation(RegistrationStatus::Confirmed));
        assert!(status_allows_cancellation(RegistrationStatus::Waitlisted));
        assert!(status_allows_cancellation(RegistrationStatus::Attended));
        assert!(!status_allows_cancellation(RegistrationStatus::Cancelled));
        assert!(!status_allows_cancellation(RegistrationStatus::NoShow));
    }

    #[test]
    fn test_cutoff_window() {
        let now = Utc::now();
        let reg = registration(RegistrationStatus::Confirmed);

        assert!(can_cancel(&reg, now + Duration::hours(13), now));
        assert!(can_cancel(&reg, now + Duration::hours(12), now));
        assert!(!can_cancel(&reg, now + Duration::hours(11), now));
        assert!(!can_cancel(&reg, now - Duration::hours(1), now));
    }

    #[test]
    fn test_cancelled_registration_never_cancellable() {
        let now = Utc::now();
        let reg = registration(RegistrationStatus::Cancelled);
        assert!(!can_cancel(&reg, now + Duration::days(30), now));
    }
}
