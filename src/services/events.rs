//! Event service implementation
//!
//! Thin wrappers over the event endpoints: list families, detail,
//! mutations, taxonomy, and ticket availability (including the polled
//! refresh used while a registration dialog is open).

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::{
    Category, CreateEventRequest, Event, EventFilters, Page, Tag, TicketType, UpdateEventRequest,
};
use crate::utils::errors::Result;
use crate::utils::polling::{start_polling, PollHandle};

/// Event service for catalog and mutation operations
#[derive(Debug, Clone)]
pub struct EventService {
    api: ApiClient,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List events matching the given filters
    pub async fn list_events(&self, filters: &EventFilters) -> Result<Page<Event>> {
        self.api.get("events", &filters.to_query()).await
    }

    /// Events owned by the current user
    pub async fn my_events(&self, filters: &EventFilters) -> Result<Page<Event>> {
        self.api.get("events/my", &filters.to_query()).await
    }

    /// Featured events for the landing dashboard
    pub async fn featured_events(&self) -> Result<Page<Event>> {
        self.api.get("events/featured", &[]).await
    }

    /// Events starting in the future
    pub async fn upcoming_events(&self) -> Result<Page<Event>> {
        self.api.get("events/upcoming", &[]).await
    }

    /// Events currently in progress
    pub async fn ongoing_events(&self) -> Result<Page<Event>> {
        self.api.get("events/ongoing", &[]).await
    }

    /// Fetch a single event with its ticket and session types
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.api.get(&format!("events/{}", event_id), &[]).await
    }

    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<Event> {
        self.api.post("events", request).await
    }

    pub async fn update_event(&self, event_id: i64, request: &UpdateEventRequest) -> Result<Event> {
        self.api.patch(&format!("events/{}", event_id), request).await
    }

    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        self.api.delete(&format!("events/{}", event_id)).await
    }

    pub async fn publish_event(&self, event_id: i64) -> Result<Event> {
        self.api
            .post(&format!("events/{}/publish", event_id), &serde_json::json!({}))
            .await
    }

    pub async fn cancel_event(&self, event_id: i64) -> Result<Event> {
        self.api
            .post(&format!("events/{}/cancel", event_id), &serde_json::json!({}))
            .await
    }

    /// Available event categories
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let page: Page<Category> = self.api.get("categories", &[]).await?;
        Ok(page.results)
    }

    /// Available event tags
    pub async fn tags(&self) -> Result<Vec<Tag>> {
        let page: Page<Tag> = self.api.get("tags", &[]).await?;
        Ok(page.results)
    }

    /// Current ticket-type availability for an event. Counts come from
    /// the server; the client never derives them locally.
    pub async fn ticket_availability(&self, event_id: i64) -> Result<Vec<TicketType>> {
        let page: Page<TicketType> = self
            .api
            .get(&format!("events/{}/ticket_types", event_id), &[])
            .await?;
        Ok(page.results)
    }

    /// Poll ticket availability while a registration dialog is open.
    ///
    /// Snapshots are delivered on the returned channel; polling errors are
    /// logged and skipped. Stop the handle when the dialog closes.
    pub fn watch_availability(
        &self,
        event_id: i64,
        interval: Duration,
    ) -> (PollHandle, mpsc::Receiver<Vec<TicketType>>) {
        let (tx, rx) = mpsc::channel(8);
        let service = self.clone();

        let handle = start_polling(interval, move || {
            let service = service.clone();
            let tx = tx.clone();
            async move {
                match service.ticket_availability(event_id).await {
                    Ok(types) => {
                        debug!(event_id = event_id, "Availability snapshot received");
                        let _ = tx.send(types).await;
                    }
                    Err(e) => {
                        warn!(event_id = event_id, error = %e, "Availability poll failed");
                    }
                }
            }
        });

        (handle, rx)
    }
}
