//! Event, ticket type and session type models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
    Postponed,
}

/// Capacity policy discriminator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Unlimited,
    Limited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub place_type: PlaceType,
    /// Required by the backend when `place_type` is `limited`
    pub max_capacity: Option<i32>,
    pub waitlist_enabled: bool,
    /// Flat price applied when no ticket type is selected; 0 means free
    pub price_cents: i64,
    pub currency: String,
    pub status: EventStatus,
    pub organizer_id: i64,
    /// Server-maintained count; never derived locally
    pub current_registrations: i32,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub session_types: Vec<SessionType>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the flat price makes this event free
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// Active session types in display order
    pub fn active_session_types(&self) -> Vec<&SessionType> {
        let mut active: Vec<&SessionType> =
            self.session_types.iter().filter(|s| s.is_active).collect();
        active.sort_by_key(|s| s.display_order);
        active
    }

    /// A registration must carry a session choice when any active
    /// session type exists
    pub fn requires_session_choice(&self) -> bool {
        !self.active_session_types().is_empty()
    }

    pub fn ticket_type(&self, ticket_type_id: i64) -> Option<&TicketType> {
        self.ticket_types.iter().find(|t| t.id == ticket_type_id)
    }

    pub fn session_type(&self, session_type_id: i64) -> Option<&SessionType> {
        self.session_types.iter().find(|s| s.id == session_type_id)
    }
}

/// A named, priced, quantity-limited admission variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketType {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub price_cents: i64,
    pub discounted_price_cents: Option<i64>,
    /// None means unlimited quantity
    pub quantity: Option<i32>,
    pub sold_count: i32,
    pub waitlist_enabled: bool,
}

impl TicketType {
    /// Remaining quantity; None when unlimited
    pub fn available_quantity(&self) -> Option<i32> {
        self.quantity.map(|q| (q - self.sold_count).max(0))
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_quantity() == Some(0)
    }

    /// Sold-out types remain selectable only when their waitlist is open
    pub fn is_selectable(&self) -> bool {
        !self.is_sold_out() || self.waitlist_enabled
    }

    /// Price actually charged, honoring the discount when present
    pub fn effective_price_cents(&self) -> i64 {
        self.discounted_price_cents.unwrap_or(self.price_cents)
    }
}

/// A sub-choice (track or time-slot) attached to a registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionType {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub is_active: bool,
    pub is_mandatory: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub place_type: PlaceType,
    pub max_capacity: Option<i32>,
    pub waitlist_enabled: bool,
    pub price_cents: i64,
    pub currency: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Query filters for event list endpoints
#[derive(Debug, Clone, Default)]
pub struct EventFilters {
    pub search: Option<String>,
    pub status: Option<EventStatus>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl EventFilters {
    /// Render the filters as query parameters
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = &self.status {
            // serde's snake_case rendering, without the quotes
            let rendered = serde_json::to_string(status).unwrap_or_default();
            query.push(("status", rendered.trim_matches('"').to_string()));
        }
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}
