//! Custom reminder models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{EventDeskError, Result};

/// Target audience for a reminder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    All,
    Confirmed,
    Waitlisted,
    Attended,
    /// Requires an explicit recipient id list
    Custom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    /// Kept as a draft until the organizer triggers `send_now`
    Manual,
    /// Dispatched by the backend at `scheduled_at`
    Automatic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Draft,
    Scheduled,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomReminder {
    pub id: i64,
    pub event_id: i64,
    pub title: String,
    pub message: String,
    pub audience: Audience,
    #[serde(default)]
    pub recipients: Vec<i64>,
    pub send_email: bool,
    pub send_sms: bool,
    pub send_mode: SendMode,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: ReminderStatus,
    pub emails_sent: i32,
    pub emails_failed: i32,
    pub sms_sent: i32,
    pub sms_failed: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReminderRequest {
    pub event_id: i64,
    pub title: String,
    pub message: String,
    pub audience: Audience,
    pub recipients: Vec<i64>,
    pub send_email: bool,
    pub send_sms: bool,
    pub send_mode: SendMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CreateReminderRequest {
    /// Client-side validation before the create call
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Reminder title is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(EventDeskError::InvalidInput("Reminder message is required".to_string()));
        }
        if !self.send_email && !self.send_sms {
            return Err(EventDeskError::InvalidInput(
                "At least one delivery channel must be selected".to_string(),
            ));
        }
        if self.audience == Audience::Custom && self.recipients.is_empty() {
            return Err(EventDeskError::InvalidInput(
                "A custom audience requires at least one recipient".to_string(),
            ));
        }
        match (self.send_mode, self.scheduled_at) {
            (SendMode::Automatic, None) => Err(EventDeskError::InvalidInput(
                "Automatic reminders require a scheduled time".to_string(),
            )),
            (SendMode::Automatic, Some(at)) if at <= now => Err(EventDeskError::InvalidInput(
                "Scheduled time must be in the future".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReminderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_sms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request() -> CreateReminderRequest {
        CreateReminderRequest {
            event_id: 1,
            title: "Doors open soon".to_string(),
            message: "See you at 19:00".to_string(),
            audience: Audience::Confirmed,
            recipients: Vec::new(),
            send_email: true,
            send_sms: false,
            send_mode: SendMode::Manual,
            scheduled_at: None,
        }
    }

    #[test]
    fn test_valid_manual_reminder() {
        assert!(request().validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_custom_audience_requires_recipients() {
        let mut r = request();
        r.audience = Audience::Custom;
        assert!(r.validate(Utc::now()).is_err());

        r.recipients = vec![7, 8];
        assert!(r.validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_automatic_requires_future_timestamp() {
        let now = Utc::now();
        let mut r = request();
        r.send_mode = SendMode::Automatic;
        assert!(r.validate(now).is_err());

        r.scheduled_at = Some(now - Duration::minutes(5));
        assert!(r.validate(now).is_err());

        r.scheduled_at = Some(now + Duration::hours(1));
        assert!(r.validate(now).is_ok());
    }

    #[test]
    fn test_channel_required() {
        let mut r = request();
        r.send_email = false;
        assert!(r.validate(Utc::now()).is_err());
    }
}
