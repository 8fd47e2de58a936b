//! Configuration validation module
//!
//! This module provides validation functions for client configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{EventDeskError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_payment_config(&settings.payment)?;
    validate_polling_config(&settings.polling)?;
    validate_logging_config(&settings.logging)?;

    if settings.features.assistant {
        validate_assistant_config(&settings.assistant)?;
    }

    Ok(())
}

/// Validate platform API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(EventDeskError::Config("API base URL is required".to_string()));
    }

    Url::parse(&config.base_url)
        .map_err(|e| EventDeskError::Config(format!("API base URL is invalid: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(EventDeskError::Config(
            "API timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate payment processor configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(EventDeskError::Config(
            "Payment processor base URL is required".to_string(),
        ));
    }

    Url::parse(&config.base_url)
        .map_err(|e| EventDeskError::Config(format!("Payment processor URL is invalid: {}", e)))?;

    Ok(())
}

/// Validate assistant configuration when the feature is enabled
fn validate_assistant_config(config: &super::AssistantConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(EventDeskError::Config(
            "Assistant API URL is required when the assistant feature is enabled".to_string(),
        ));
    }

    if config.max_tokens == 0 {
        return Err(EventDeskError::Config(
            "Assistant max_tokens must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate polling configuration
fn validate_polling_config(config: &super::PollingConfig) -> Result<()> {
    if config.availability_interval_seconds == 0 || config.streaming_interval_seconds == 0 {
        return Err(EventDeskError::Config(
            "Polling intervals must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventDeskError::Config("Logging level is required".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_base_url_rejected() {
        let mut settings = Settings::default();
        settings.api.base_url = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let mut settings = Settings::default();
        settings.api.base_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_polling_interval_rejected() {
        let mut settings = Settings::default();
        settings.polling.availability_interval_seconds = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_assistant_only_validated_when_enabled() {
        let mut settings = Settings::default();
        settings.assistant.max_tokens = 0;
        assert!(validate_settings(&settings).is_ok());

        settings.features.assistant = true;
        assert!(validate_settings(&settings).is_err());
    }
}
