//! Platform API client implementation
//!
//! Every request resolves its bearer token from the injected session
//! repository. A 401 on a non-auth endpoint triggers exactly one token
//! refresh followed by a single replay of the original request, so
//! callers never observe the intermediate 401. If the refresh fails, or
//! the failing endpoint is itself an auth endpoint, the active session is
//! torn down and an auth-kind error is returned; callers treat that as
//! "go to login". Teardown is idempotent.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::session::SessionStore;
use crate::utils::errors::{normalize_error_body, ApiError, EventDeskError, Result};

const USER_AGENT: &str = concat!("EventDesk/", env!("CARGO_PKG_VERSION"));

/// Endpoints under this prefix never trigger a refresh attempt
const AUTH_PREFIX: &str = "auth/";

/// Refresh endpoint, relative to the base URL
pub const TOKEN_REFRESH_PATH: &str = "auth/token/refresh";

#[derive(Debug, Clone, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct RefreshResponse {
    access: String,
    refresh: Option<String>,
}

/// HTTP client for the platform API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    sessions: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(config: &ApiConfig, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(EventDeskError::Http)?;

        Ok(Self {
            http,
            base_url,
            sessions,
        })
    }

    /// The session repository this client resolves tokens from
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Ok(response.json().await.map_err(EventDeskError::Http)?)
    }

    /// POST a JSON body and deserialize the JSON response
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::POST, path, &[], Some(body)).await?;
        Ok(response.json().await.map_err(EventDeskError::Http)?)
    }

    /// POST a JSON body, discarding any response payload
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// PATCH a JSON body and deserialize the JSON response
    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PATCH, path, &[], Some(body)).await?;
        Ok(response.json().await.map_err(EventDeskError::Http)?)
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// GET a binary payload (file exports)
    pub async fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>> {
        let response = self.execute(Method::GET, path, query, None).await?;
        let bytes = response.bytes().await.map_err(EventDeskError::Http)?;
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn is_auth_endpoint(path: &str) -> bool {
        path.starts_with(AUTH_PREFIX)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        let mut refreshed = false;

        loop {
            let mut request = self.http.request(method.clone(), url.clone());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(token) = self.sessions.active_access_token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }

            debug!(method = %method, path = path, "API request");
            let response = request.send().await.map_err(Self::transport_error)?;
            let status = response.status();
            debug!(method = %method, path = path, status = %status, "API response");

            if status == StatusCode::UNAUTHORIZED {
                if Self::is_auth_endpoint(path) {
                    // Failed login/refresh attempts invalidate whatever
                    // session is active; teardown is idempotent.
                    self.sessions.clear_active_session()?;
                    let text = response.text().await.unwrap_or_default();
                    return Err(normalize_error_body(status.as_u16(), &text).into());
                }
                if !refreshed {
                    refreshed = true;
                    self.refresh_tokens().await?;
                    continue;
                }
                let text = response.text().await.unwrap_or_default();
                return Err(normalize_error_body(status.as_u16(), &text).into());
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(normalize_error_body(status.as_u16(), &text).into());
            }

            return Ok(response);
        }
    }

    /// Exchange the stored refresh token for a new access token, rewriting
    /// the active session record. Any failure tears the session down.
    async fn refresh_tokens(&self) -> Result<()> {
        let record = match self.sessions.active_session() {
            Some(record) => record,
            None => return Err(EventDeskError::NotAuthenticated),
        };

        debug!(session_id = %record.id, "Refreshing access token");
        let url = self.endpoint(TOKEN_REFRESH_PATH)?;
        let outcome = self
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh: &record.tokens.refresh,
            })
            .send()
            .await;

        let response = match outcome {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = %response.status(), "Token refresh rejected; clearing session");
                self.sessions.clear_active_session()?;
                return Err(ApiError::auth("Session expired, please sign in again").into());
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed; clearing session");
                self.sessions.clear_active_session()?;
                return Err(ApiError::auth("Session expired, please sign in again").into());
            }
        };

        let tokens: RefreshResponse = match response.json().await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Token refresh returned malformed payload; clearing session");
                self.sessions.clear_active_session()?;
                return Err(ApiError::auth("Session expired, please sign in again").into());
            }
        };

        self.sessions.update_tokens(tokens.access, tokens.refresh)?;
        debug!("Access token refreshed");
        Ok(())
    }

    fn transport_error(e: reqwest::Error) -> EventDeskError {
        if e.is_timeout() {
            ApiError::network("Request timed out").into()
        } else if e.is_connect() {
            ApiError::network("Could not reach the server").into()
        } else {
            EventDeskError::Http(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_endpoint_detection() {
        assert!(ApiClient::is_auth_endpoint("auth/login"));
        assert!(ApiClient::is_auth_endpoint("auth/token/refresh"));
        assert!(!ApiClient::is_auth_endpoint("events"));
        assert!(!ApiClient::is_auth_endpoint("registrations/5/confirm_payment"));
    }
}
