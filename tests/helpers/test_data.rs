//! Test data builders

use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use eventdesk::models::{
    Event, EventStatus, GuestDetails, PaymentStatus, PlaceType, Registration, RegistrationStatus,
    SessionType, TicketType,
};
use eventdesk::payment::{CardDetails, PaymentIntent};

/// A published event one week out with the given flat price
pub fn event(id: i64, price_cents: i64) -> Event {
    let now = Utc::now();
    Event {
        id,
        title: format!("Event {}", id),
        description: Some("An event".to_string()),
        start_time: now + Duration::days(7),
        end_time: now + Duration::days(7) + Duration::hours(3),
        location: Some("Main hall".to_string()),
        place_type: PlaceType::Unlimited,
        max_capacity: None,
        waitlist_enabled: false,
        price_cents,
        currency: "USD".to_string(),
        status: EventStatus::Published,
        organizer_id: 1,
        current_registrations: 0,
        ticket_types: Vec::new(),
        session_types: Vec::new(),
        category: None,
        tags: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn ticket_type(
    id: i64,
    event_id: i64,
    name: &str,
    price_cents: i64,
    quantity: Option<i32>,
    sold_count: i32,
) -> TicketType {
    TicketType {
        id,
        event_id,
        name: name.to_string(),
        price_cents,
        discounted_price_cents: None,
        quantity,
        sold_count,
        waitlist_enabled: false,
    }
}

pub fn session_type(id: i64, event_id: i64, name: &str, is_active: bool) -> SessionType {
    SessionType {
        id,
        event_id,
        name: name.to_string(),
        is_active,
        is_mandatory: true,
        display_order: id as i32,
    }
}

pub fn registration(id: i64, event_id: i64, status: RegistrationStatus) -> Registration {
    let now = Utc::now();
    Registration {
        id,
        event_id,
        user_id: Some(1),
        guest: None,
        ticket_type_id: None,
        session_type_id: None,
        status,
        payment_status: PaymentStatus::Pending,
        amount_paid_cents: 0,
        created_at: now,
        updated_at: now,
    }
}

/// A complete guest identity with generated name/email
pub fn guest() -> GuestDetails {
    GuestDetails {
        full_name: Name().fake(),
        email: SafeEmail().fake(),
        phone: "+1 555 010 7788".to_string(),
        country: "US".to_string(),
    }
}

pub fn card() -> CardDetails {
    CardDetails {
        number: "4242424242424242".to_string(),
        exp_month: 12,
        exp_year: 2030,
        cvc: "123".to_string(),
    }
}

pub fn intent(id: &str, amount_cents: i64, test_mode: bool) -> PaymentIntent {
    PaymentIntent {
        id: id.to_string(),
        client_secret: format!("{}_secret", id),
        amount_cents,
        currency: "USD".to_string(),
        test_mode,
    }
}

/// Wrap entities in the backend's pagination envelope
pub fn page_of<T: serde::Serialize>(items: &[T]) -> serde_json::Value {
    serde_json::json!({
        "results": items,
        "count": items.len(),
    })
}
