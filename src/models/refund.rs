//! Refund request models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Pending,
    Approved,
    Processed,
    Rejected,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    pub id: i64,
    pub registration_id: i64,
    pub event_id: i64,
    pub amount_paid_cents: i64,
    pub refund_amount_cents: i64,
    pub refund_percentage: i32,
    pub status: RefundStatus,
    pub reason: Option<String>,
    /// Reference id assigned by the payment processor once processed
    pub processor_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Organizer decision on a pending refund request
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefundDecision {
    Approve,
    Reject,
}

/// Query filters for refund list endpoints
#[derive(Debug, Clone, Default)]
pub struct RefundFilters {
    pub event_id: Option<i64>,
    pub status: Option<RefundStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl RefundFilters {
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
