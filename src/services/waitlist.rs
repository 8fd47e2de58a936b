//! Waitlist management service
//!
//! List-plus-bulk-action operations over waitlisted registrations. No
//! optimistic updates: after every mutation the pending list and the
//! parent event are refetched so counts always come from the server.

use futures::future::try_join;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::ApiClient;
use crate::models::{
    Event, Page, Registration, RegistrationFilters, RegistrationStatus,
};
use crate::utils::errors::Result;

/// Outcome of a bulk waitlist action as reported by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct BulkActionOutcome {
    pub processed: i64,
    pub failed: i64,
}

/// Fresh server state after a waitlist mutation
#[derive(Debug, Clone)]
pub struct WaitlistSnapshot {
    pub pending: Vec<Registration>,
    pub total: i64,
    pub event: Event,
}

/// Waitlist service for organizer approval flows
#[derive(Debug, Clone)]
pub struct WaitlistService {
    api: ApiClient,
}

impl WaitlistService {
    /// Create a new WaitlistService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List waitlisted registrations for an event. The status filter is
    /// forced; other filters pass through.
    pub async fn list_pending(&self, filters: &RegistrationFilters) -> Result<Page<Registration>> {
        let mut filters = filters.clone();
        filters.status = Some(RegistrationStatus::Waitlisted);
        self.api.get("registrations", &filters.to_query()).await
    }

    /// Approve one waitlisted registration
    pub async fn approve(&self, registration_id: i64) -> Result<Registration> {
        let registration: Registration = self
            .api
            .post(
                &format!("registrations/{}/approve_waitlist", registration_id),
                &json!({}),
            )
            .await?;
        info!(registration_id = registration_id, "Waitlist entry approved");
        Ok(registration)
    }

    /// Reject one waitlisted registration
    pub async fn reject(&self, registration_id: i64) -> Result<Registration> {
        let registration: Registration = self
            .api
            .post(
                &format!("registrations/{}/reject_waitlist", registration_id),
                &json!({}),
            )
            .await?;
        info!(registration_id = registration_id, "Waitlist entry rejected");
        Ok(registration)
    }

    /// Approve several entries through the dedicated bulk endpoint
    pub async fn bulk_approve(&self, registration_ids: &[i64]) -> Result<BulkActionOutcome> {
        self.api
            .post(
                "registrations/waitlist/bulk_approve",
                &json!({ "registration_ids": registration_ids }),
            )
            .await
    }

    /// Reject several entries through the dedicated bulk endpoint
    pub async fn bulk_reject(&self, registration_ids: &[i64]) -> Result<BulkActionOutcome> {
        self.api
            .post(
                "registrations/waitlist/bulk_reject",
                &json!({ "registration_ids": registration_ids }),
            )
            .await
    }

    /// Refetch the pending list and the parent event together
    pub async fn refresh(
        &self,
        event_id: i64,
        filters: &RegistrationFilters,
    ) -> Result<WaitlistSnapshot> {
        let mut filters = filters.clone();
        filters.event_id = Some(event_id);

        let pending = self.list_pending(&filters);
        let event_path = format!("events/{}", event_id);
        let event = self.api.get::<Event>(&event_path, &[]);
        let (page, event) = try_join(pending, event).await?;

        Ok(WaitlistSnapshot {
            pending: page.results,
            total: page.count,
            event,
        })
    }

    /// Approve one entry, then re-derive state from the server
    pub async fn approve_then_refresh(
        &self,
        registration_id: i64,
        event_id: i64,
        filters: &RegistrationFilters,
    ) -> Result<WaitlistSnapshot> {
        self.approve(registration_id).await?;
        self.refresh(event_id, filters).await
    }

    /// Reject one entry, then re-derive state from the server
    pub async fn reject_then_refresh(
        &self,
        registration_id: i64,
        event_id: i64,
        filters: &RegistrationFilters,
    ) -> Result<WaitlistSnapshot> {
        self.reject(registration_id).await?;
        self.refresh(event_id, filters).await
    }

    /// Bulk approve, then re-derive state from the server
    pub async fn bulk_approve_then_refresh(
        &self,
        registration_ids: &[i64],
        event_id: i64,
        filters: &RegistrationFilters,
    ) -> Result<(BulkActionOutcome, WaitlistSnapshot)> {
        let outcome = self.bulk_approve(registration_ids).await?;
        let snapshot = self.refresh(event_id, filters).await?;
        Ok((outcome, snapshot))
    }
}
