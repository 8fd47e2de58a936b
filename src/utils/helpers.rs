//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the client.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Format a cent-denominated amount for display, e.g. `format_price_cents(5000, "USD")` -> "50.00 USD"
pub fn format_price_cents(amount_cents: i64, currency: &str) -> String {
    format!("{}.{:02} {}", amount_cents / 100, (amount_cents % 100).abs(), currency)
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Whole hours remaining until a future timestamp; negative once it has passed
pub fn hours_until(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    timestamp.signed_duration_since(now).num_hours()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("hardcoded pattern"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-()]{6,19}$").expect("hardcoded pattern"))
}

/// Check an email address has a plausible shape
pub fn is_valid_email(input: &str) -> bool {
    email_regex().is_match(input.trim())
}

/// Check a phone number has a plausible shape
pub fn is_valid_phone(input: &str) -> bool {
    phone_regex().is_match(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_price_cents() {
        assert_eq!(format_price_cents(5000, "USD"), "50.00 USD");
        assert_eq!(format_price_cents(99, "EUR"), "0.99 EUR");
        assert_eq!(format_price_cents(100050, "USD"), "1000.50 USD");
        assert_eq!(format_price_cents(0, "USD"), "0.00 USD");
    }

    #[test]
    fn test_hours_until() {
        let now = Utc::now();
        assert_eq!(hours_until(now + Duration::hours(13), now), 13);
        assert_eq!(hours_until(now + Duration::minutes(30), now), 0);
        assert!(hours_until(now - Duration::hours(2), now) < 0);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer piece of text", 10), "a longe...");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("guest@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(is_valid_phone("0049-30-1234567"));
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("phone me"));
    }
}
