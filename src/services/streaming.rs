//! Streaming control service
//!
//! Wrappers over the per-event streaming endpoints and a polled status
//! subscription for open streaming dialogs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::utils::errors::Result;
use crate::utils::polling::{start_polling, PollHandle};

/// Lifecycle state of an event stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Idle,
    Live,
    Paused,
    Ended,
}

/// Streaming status as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamStatus {
    pub state: StreamState,
    pub viewer_count: i64,
    pub recording: bool,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Provider settings pushed before a stream starts
#[derive(Debug, Clone, Serialize)]
pub struct StreamSettings {
    pub provider: String,
    pub stream_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtmp_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinInfo {
    pub url: String,
}

/// Streaming service for organizer broadcast control
#[derive(Debug, Clone)]
pub struct StreamingService {
    api: ApiClient,
}

impl StreamingService {
    /// Create a new StreamingService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn path(event_id: i64, action: &str) -> String {
        format!("events/{}/streaming/{}", event_id, action)
    }

    pub async fn configure(&self, event_id: i64, settings: &StreamSettings) -> Result<StreamStatus> {
        self.api.post(&Self::path(event_id, "configure"), settings).await
    }

    pub async fn start(&self, event_id: i64) -> Result<StreamStatus> {
        let status = self.api.post(&Self::path(event_id, "start"), &json!({})).await?;
        info!(event_id = event_id, "Stream started");
        Ok(status)
    }

    pub async fn stop(&self, event_id: i64) -> Result<StreamStatus> {
        let status = self.api.post(&Self::path(event_id, "stop"), &json!({})).await?;
        info!(event_id = event_id, "Stream stopped");
        Ok(status)
    }

    pub async fn pause(&self, event_id: i64) -> Result<StreamStatus> {
        self.api.post(&Self::path(event_id, "pause"), &json!({})).await
    }

    pub async fn start_recording(&self, event_id: i64) -> Result<StreamStatus> {
        self.api.post(&Self::path(event_id, "start_recording"), &json!({})).await
    }

    pub async fn stop_recording(&self, event_id: i64) -> Result<StreamStatus> {
        self.api.post(&Self::path(event_id, "stop_recording"), &json!({})).await
    }

    pub async fn status(&self, event_id: i64) -> Result<StreamStatus> {
        self.api.get(&Self::path(event_id, "status"), &[]).await
    }

    /// Join URL for a viewer
    pub async fn join(&self, event_id: i64) -> Result<JoinInfo> {
        self.api.post(&Self::path(event_id, "join"), &json!({})).await
    }

    /// Poll streaming status while the control dialog is open. Stop the
    /// handle when the dialog closes.
    pub fn watch_status(
        &self,
        event_id: i64,
        interval: Duration,
    ) -> (PollHandle, mpsc::Receiver<StreamStatus>) {
        let (tx, rx) = mpsc::channel(8);
        let service = self.clone();

        let handle = start_polling(interval, move || {
            let service = service.clone();
            let tx = tx.clone();
            async move {
                match service.status(event_id).await {
                    Ok(status) => {
                        let _ = tx.send(status).await;
                    }
                    Err(e) => {
                        warn!(event_id = event_id, error = %e, "Streaming status poll failed");
                    }
                }
            }
        });

        (handle, rx)
    }
}
