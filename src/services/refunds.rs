//! Refund management service
//!
//! Same list-plus-bulk-action shape as the waitlist: mutations go through
//! dedicated endpoints and state is always re-derived from the server
//! afterwards.

use futures::future::try_join;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::api::ApiClient;
use crate::models::{Event, Page, RefundDecision, RefundFilters, RefundRequest};
use crate::services::waitlist::BulkActionOutcome;
use crate::utils::errors::Result;

#[derive(Debug, Serialize)]
struct ProcessRefundRequest {
    decision: RefundDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    refund_amount_cents: Option<i64>,
}

/// Fresh server state after a refund mutation
#[derive(Debug, Clone)]
pub struct RefundSnapshot {
    pub requests: Vec<RefundRequest>,
    pub total: i64,
    pub event: Event,
}

/// Refund service for organizer approval flows
#[derive(Debug, Clone)]
pub struct RefundService {
    api: ApiClient,
}

impl RefundService {
    /// Create a new RefundService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List refund requests matching the given filters
    pub async fn list(&self, filters: &RefundFilters) -> Result<Page<RefundRequest>> {
        self.api.get("refunds", &filters.to_query()).await
    }

    /// Process one refund request with an approve/reject decision. An
    /// explicit amount overrides the backend's percentage-derived amount.
    pub async fn process(
        &self,
        refund_id: i64,
        decision: RefundDecision,
        refund_amount_cents: Option<i64>,
    ) -> Result<RefundRequest> {
        let refund: RefundRequest = self
            .api
            .post(
                &format!("refunds/{}/process", refund_id),
                &ProcessRefundRequest {
                    decision,
                    refund_amount_cents,
                },
            )
            .await?;
        info!(refund_id = refund_id, decision = ?decision, "Refund request processed");
        Ok(refund)
    }

    /// Process several refund requests through the bulk endpoint
    pub async fn bulk_process(
        &self,
        refund_ids: &[i64],
        decision: RefundDecision,
    ) -> Result<BulkActionOutcome> {
        self.api
            .post(
                "refunds/bulk_process",
                &json!({ "refund_ids": refund_ids, "decision": decision }),
            )
            .await
    }

    /// Refetch the refund list and the parent event together
    pub async fn refresh(&self, event_id: i64, filters: &RefundFilters) -> Result<RefundSnapshot> {
        let mut filters = filters.clone();
        filters.event_id = Some(event_id);

        let requests = self.list(&filters);
        let event_path = format!("events/{}", event_id);
        let event = self.api.get::<Event>(&event_path, &[]);
        let (page, event) = try_join(requests, event).await?;

        Ok(RefundSnapshot {
            requests: page.results,
            total: page.count,
            event,
        })
    }

    /// Process one request, then re-derive state from the server
    pub async fn process_then_refresh(
        &self,
        refund_id: i64,
        decision: RefundDecision,
        refund_amount_cents: Option<i64>,
        event_id: i64,
        filters: &RefundFilters,
    ) -> Result<RefundSnapshot> {
        self.process(refund_id, decision, refund_amount_cents).await?;
        self.refresh(event_id, filters).await
    }

    /// Bulk process, then re-derive state from the server
    pub async fn bulk_process_then_refresh(
        &self,
        refund_ids: &[i64],
        decision: RefundDecision,
        event_id: i64,
        filters: &RefundFilters,
    ) -> Result<(BulkActionOutcome, RefundSnapshot)> {
        let outcome = self.bulk_process(refund_ids, decision).await?;
        let snapshot = self.refresh(event_id, filters).await?;
        Ok((outcome, snapshot))
    }
}
