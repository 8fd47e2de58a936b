//! Mock platform backend for testing
//!
//! Wraps a wiremock server standing in for both the platform API and the
//! payment processor (their paths do not overlap), plus helpers for
//! settings and pre-authenticated service factories.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventdesk::config::Settings;
use eventdesk::models::{Role, TokenPair, User};
use eventdesk::session::{MemorySessionStore, SessionRecord, SessionStore};
use eventdesk::ServiceFactory;

/// Mock backend shared by the platform API and the payment processor
pub struct PlatformMock {
    pub server: MockServer,
}

impl PlatformMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Settings pointing every external surface at the mock server
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.api.base_url = format!("{}/", self.server.uri());
        settings.payment.base_url = self.server.uri();
        settings
    }

    /// A session store holding one active login
    pub fn seeded_sessions(access: &str, refresh: &str, role: Role) -> Arc<MemorySessionStore> {
        let store = Arc::new(MemorySessionStore::new());
        let record = SessionRecord::new(
            TokenPair {
                access: access.to_string(),
                refresh: refresh.to_string(),
            },
            User {
                id: 1,
                email: "admin@example.com".to_string(),
                full_name: "Admin User".to_string(),
                role,
                created_at: Utc::now(),
            },
        );
        store
            .set_active_session(record)
            .expect("seeding session store");
        store
    }

    /// Service factory wired to the mock server
    pub fn factory(&self, sessions: Arc<dyn SessionStore>) -> ServiceFactory {
        ServiceFactory::new(&self.settings(), sessions).expect("building service factory")
    }

    /// Service factory with an already-authenticated organizer session
    pub fn authenticated_factory(&self) -> (ServiceFactory, Arc<MemorySessionStore>) {
        let sessions = Self::seeded_sessions("valid-access", "valid-refresh", Role::Organizer);
        let factory = self.factory(sessions.clone());
        (factory, sessions)
    }

    /// Mount a catch-all payment-method success mock
    pub async fn mock_payment_method_ok(&self, method_id: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/payment_methods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": method_id })))
            .mount(&self.server)
            .await;
    }
}
