//! Client settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main client configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub payment: PaymentConfig,
    pub assistant: AssistantConfig,
    pub session: SessionConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Platform API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Payment processor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Test mode performs method-only validation; no intent confirmation
    pub test_mode: bool,
}

/// External text-generation assistant configuration.
/// A missing `api_key` disables the external path entirely.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// When set, sessions are persisted to this JSON file; otherwise
    /// they live in memory only
    pub file_path: Option<String>,
}

/// Polling intervals for open dialogs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    pub availability_interval_seconds: u64,
    pub streaming_interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub assistant: bool,
    pub streaming: bool,
    pub exports: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("EVENTDESK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventDeskError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8000/api/".to_string(),
                timeout_seconds: 30,
            },
            payment: PaymentConfig {
                base_url: "https://api.payments.example.com".to_string(),
                timeout_seconds: 30,
                test_mode: true,
            },
            assistant: AssistantConfig {
                api_url: "https://api.textgen.example.com/v1/chat/completions".to_string(),
                api_key: None,
                model: "assistant-small".to_string(),
                max_tokens: 512,
                timeout_seconds: 15,
            },
            session: SessionConfig { file_path: None },
            polling: PollingConfig {
                availability_interval_seconds: 15,
                streaming_interval_seconds: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "./logs".to_string(),
            },
            features: FeaturesConfig {
                assistant: false,
                streaming: true,
                exports: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("EVENTDESK__API__BASE_URL", "https://api.example.com/v2/");
        let settings = Settings::new();
        std::env::remove_var("EVENTDESK__API__BASE_URL");

        // A bare environment cannot supply every section, so deserialization
        // may fail; the override itself must not produce a builder error.
        if let Ok(settings) = settings {
            assert_eq!(settings.api.base_url, "https://api.example.com/v2/");
        }
    }
}
