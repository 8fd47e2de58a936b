//! Custom reminder service implementation
//!
//! CRUD plus the send-now and schedule actions. Requests are validated
//! client-side before any call leaves the process; the backend remains
//! authoritative for delivery.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use crate::api::ApiClient;
use crate::models::{CreateReminderRequest, CustomReminder, Page, UpdateReminderRequest};
use crate::utils::errors::{EventDeskError, Result};

/// Reminder service for organizer messaging
#[derive(Debug, Clone)]
pub struct ReminderService {
    api: ApiClient,
}

impl ReminderService {
    /// Create a new ReminderService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List reminders attached to an event
    pub async fn list(&self, event_id: i64) -> Result<Vec<CustomReminder>> {
        let page: Page<CustomReminder> = self
            .api
            .get(&format!("events/{}/reminders", event_id), &[])
            .await?;
        Ok(page.results)
    }

    /// Create a reminder after client-side validation
    pub async fn create(&self, request: &CreateReminderRequest) -> Result<CustomReminder> {
        request.validate(Utc::now())?;
        let reminder: CustomReminder = self.api.post("reminders", request).await?;
        info!(reminder_id = reminder.id, event_id = reminder.event_id, "Reminder created");
        Ok(reminder)
    }

    pub async fn update(
        &self,
        reminder_id: i64,
        request: &UpdateReminderRequest,
    ) -> Result<CustomReminder> {
        self.api.patch(&format!("reminders/{}", reminder_id), request).await
    }

    pub async fn delete(&self, reminder_id: i64) -> Result<()> {
        self.api.delete(&format!("reminders/{}", reminder_id)).await
    }

    /// Dispatch a draft reminder immediately
    pub async fn send_now(&self, reminder_id: i64) -> Result<CustomReminder> {
        let reminder: CustomReminder = self
            .api
            .post(&format!("reminders/{}/send_now", reminder_id), &json!({}))
            .await?;
        info!(reminder_id = reminder_id, "Reminder dispatched");
        Ok(reminder)
    }

    /// Schedule a reminder for automatic delivery at a future time
    pub async fn schedule(
        &self,
        reminder_id: i64,
        scheduled_at: DateTime<Utc>,
    ) -> Result<CustomReminder> {
        if scheduled_at <= Utc::now() {
            return Err(EventDeskError::InvalidInput(
                "Scheduled time must be in the future".to_string(),
            ));
        }

        let reminder: CustomReminder = self
            .api
            .post(
                &format!("reminders/{}/schedule", reminder_id),
                &json!({ "scheduled_at": scheduled_at }),
            )
            .await?;
        info!(reminder_id = reminder_id, scheduled_at = %scheduled_at, "Reminder scheduled");
        Ok(reminder)
    }
}
