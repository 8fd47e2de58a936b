//! Registration models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{EventDeskError, Result};
use crate::utils::helpers::{is_valid_email, is_valid_phone};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Waitlisted,
    Cancelled,
    Attended,
    NoShow,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    None,
    Pending,
    Paid,
    Refunded,
    Failed,
}

/// Identity supplied by an unauthenticated registrant. All four fields
/// are mandatory when this branch is active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuestDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
}

impl GuestDetails {
    /// Validate the guest identity before submission
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Full name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Email is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(EventDeskError::InvalidInput("Email address is not valid".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Phone number is required".to_string()));
        }
        if !is_valid_phone(&self.phone) {
            return Err(EventDeskError::InvalidInput("Phone number is not valid".to_string()));
        }
        if self.country.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Country is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: Option<i64>,
    pub guest: Option<GuestDetails>,
    pub ticket_type_id: Option<i64>,
    pub session_type_id: Option<i64>,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub amount_paid_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for the registration-create endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub event_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestDetails>,
    /// Present only for paid registrations, after card validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

/// Query filters for registration list endpoints
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilters {
    pub event_id: Option<i64>,
    pub status: Option<RegistrationStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl RegistrationFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(event_id) = self.event_id {
            query.push(("event", event_id.to_string()));
        }
        if let Some(status) = &self.status {
            let rendered = serde_json::to_string(status).unwrap_or_default();
            query.push(("status", rendered.trim_matches('"').to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn guest() -> GuestDetails {
        GuestDetails {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0958".to_string(),
            country: "GB".to_string(),
        }
    }

    #[test]
    fn test_complete_guest_validates() {
        assert!(guest().validate().is_ok());
    }

    #[test]
    fn test_each_field_is_mandatory() {
        for field in ["full_name", "email", "phone", "country"] {
            let mut g = guest();
            match field {
                "full_name" => g.full_name = "  ".to_string(),
                "email" => g.email = String::new(),
                "phone" => g.phone = String::new(),
                _ => g.country = String::new(),
            }
            assert!(g.validate().is_err(), "expected {} to be mandatory", field);
        }
    }

    #[test]
    fn test_malformed_email_rejected() {
        let mut g = guest();
        g.email = "ada-at-example".to_string();
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_status_serialization_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Waitlisted).unwrap(),
            "\"waitlisted\""
        );
    }
}
