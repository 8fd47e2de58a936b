//! Authentication service implementation
//!
//! This service handles login/logout against the platform's auth
//! endpoints and keeps the session repository in sync. Token refresh on
//! 401 lives in the API client, not here.

use serde_json::json;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::models::{LoginRequest, LoginResponse, TokenPair, User};
use crate::session::SessionRecord;
use crate::utils::errors::Result;

/// Authentication service for session lifecycle
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Log in and store the resulting session as the active one
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let response: LoginResponse = self
            .api
            .post(
                "auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let user = response.user.clone();
        let record = SessionRecord::new(
            TokenPair {
                access: response.access,
                refresh: response.refresh,
            },
            response.user,
        );
        self.api.sessions().set_active_session(record)?;

        info!(user_id = user.id, "Logged in");
        Ok(user)
    }

    /// Log out: best-effort server call, then unconditional local teardown
    pub async fn logout(&self) -> Result<()> {
        if self.api.sessions().active_session().is_some() {
            if let Err(e) = self.api.post_no_content("auth/logout", &json!({})).await {
                warn!(error = %e, "Server logout failed; clearing local session anyway");
            }
        }
        self.api.sessions().clear_active_session()
    }

    /// The user of the active session, if any
    pub fn current_user(&self) -> Option<User> {
        self.api.sessions().active_session().map(|record| record.user)
    }

    /// Whether an active session exists
    pub fn is_authenticated(&self) -> bool {
        self.api.sessions().active_session().is_some()
    }
}
