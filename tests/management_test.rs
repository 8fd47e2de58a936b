//! Waitlist/refund management, reminders, export, the event state store,
//! and the chatbot's fallback behavior.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use tokio_test::assert_ok;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use eventdesk::chatbot::ChatService;
use eventdesk::models::{
    Audience, CreateReminderRequest, EventFilters, RefundDecision, RegistrationFilters,
    RegistrationStatus, Role, SendMode,
};
use eventdesk::services::ExportFormat;
use eventdesk::store::EventStore;
use eventdesk::EventDeskError;
use helpers::api_mock::PlatformMock;
use helpers::test_data;

#[tokio::test]
async fn waitlist_approval_rederives_state_from_the_server() {
    let mock = PlatformMock::start().await;
    let (factory, _sessions) = mock.authenticated_factory();

    let approved = test_data::registration(5, 10, RegistrationStatus::Confirmed);
    Mock::given(method("POST"))
        .and(path("/registrations/5/approve_waitlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&approved))
        .expect(1)
        .mount(&mock.server)
        .await;

    // After the mutation: one list refetch, one parent-event refetch
    let still_pending = [test_data::registration(6, 10, RegistrationStatus::Waitlisted)];
    Mock::given(method("GET"))
        .and(path("/registrations"))
        .and(query_param("event", "10"))
        .and(query_param("status", "waitlisted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::page_of(&still_pending)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let mut refreshed = test_data::event(10, 0);
    refreshed.current_registrations = 42;
    Mock::given(method("GET"))
        .and(path("/events/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&refreshed))
        .expect(1)
        .mount(&mock.server)
        .await;

    let snapshot = factory
        .waitlist_service
        .approve_then_refresh(5, 10, &RegistrationFilters::default())
        .await
        .expect("approve and refresh");

    assert_eq!(snapshot.pending.len(), 1);
    assert_eq!(snapshot.pending[0].id, 6);
    assert_eq!(snapshot.event.current_registrations, 42);
}

#[tokio::test]
async fn bulk_refund_processing_hits_the_dedicated_endpoint_once() {
    let mock = PlatformMock::start().await;
    let (factory, _sessions) = mock.authenticated_factory();

    Mock::given(method("POST"))
        .and(path("/refunds/bulk_process"))
        .and(body_partial_json(json!({
            "refund_ids": [3, 4, 9],
            "decision": "approve",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"processed": 3, "failed": 0})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/refunds"))
        .and(query_param("event", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [], "count": 0})))
        .expect(1)
        .mount(&mock.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::event(10, 0)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let (outcome, snapshot) = factory
        .refund_service
        .bulk_process_then_refresh(
            &[3, 4, 9],
            RefundDecision::Approve,
            10,
            &Default::default(),
        )
        .await
        .expect("bulk process and refresh");

    assert_eq!(outcome.processed, 3);
    assert_eq!(outcome.failed, 0);
    assert!(snapshot.requests.is_empty());
}

#[tokio::test]
async fn invalid_reminders_are_rejected_before_any_call() {
    let mock = PlatformMock::start().await;
    let (factory, _sessions) = mock.authenticated_factory();

    let mut request = CreateReminderRequest {
        event_id: 10,
        title: "Doors".to_string(),
        message: "Open at 19:00".to_string(),
        audience: Audience::Custom,
        recipients: Vec::new(),
        send_email: true,
        send_sms: false,
        send_mode: SendMode::Manual,
        scheduled_at: None,
    };

    // Custom audience without recipients
    let err = factory
        .reminder_service
        .create(&request)
        .await
        .expect_err("empty custom audience");
    assert_matches!(err, EventDeskError::InvalidInput(_));

    // Automatic mode with a past timestamp
    request.audience = Audience::Confirmed;
    request.send_mode = SendMode::Automatic;
    request.scheduled_at = Some(Utc::now() - Duration::hours(1));
    let err = factory
        .reminder_service
        .create(&request)
        .await
        .expect_err("past schedule");
    assert_matches!(err, EventDeskError::InvalidInput(_));

    let requests = mock.server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "validation failures must not reach the API");
}

#[tokio::test]
async fn registration_export_returns_raw_bytes() {
    let mock = PlatformMock::start().await;
    let (factory, _sessions) = mock.authenticated_factory();

    let csv = "id,email\n1,guest@example.com\n";
    Mock::given(method("GET"))
        .and(path("/events/10/registrations/export"))
        .and(query_param("format", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(csv.as_bytes()))
        .expect(1)
        .mount(&mock.server)
        .await;

    let bytes = assert_ok!(
        factory
            .registration_service
            .export(10, ExportFormat::Csv)
            .await
    );
    assert_eq!(bytes, csv.as_bytes());
}

#[tokio::test]
async fn store_unwraps_envelopes_and_keeps_error_slots_separate() {
    let mock = PlatformMock::start().await;
    let (factory, _sessions) = mock.authenticated_factory();
    let mut store = EventStore::new(
        factory.event_service.clone(),
        factory.registration_service.clone(),
    );

    let events = [test_data::event(1, 0), test_data::event(2, 5000)];
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": events, "count": 37})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    store
        .fetch_events(&EventFilters { page: Some(2), page_size: Some(20), ..Default::default() })
        .await
        .expect("list fetch");
    assert_eq!(store.state.events.len(), 2);
    assert_eq!(store.state.pagination.count, 37);
    assert_eq!(store.state.pagination.page, 2);
    assert!(!store.state.loading.events);
    assert!(store.state.error.is_none());

    // A failing registration lands in registration_error only
    Mock::given(method("POST"))
        .and(path("/registrations"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "email": ["a registration with this email already exists"],
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let request = eventdesk::models::RegistrationRequest {
        event_id: 1,
        ticket_type_id: None,
        session_type_id: None,
        guest: Some(test_data::guest()),
        payment_intent_id: None,
    };
    store.register(&request).await.expect_err("conflict");

    assert!(store.state.error.is_none(), "general error slot untouched");
    let message = store.state.registration_error.clone().unwrap();
    assert!(message.contains("email"));

    // Editing the implicated field clears it without touching anything else
    store.clear_registration_error();
    assert!(store.state.registration_error.is_none());
    assert_eq!(store.state.events.len(), 2);
}

#[tokio::test]
async fn store_merges_mutated_event_into_every_list() {
    let mock = PlatformMock::start().await;
    let (factory, _sessions) = mock.authenticated_factory();
    let mut store = EventStore::new(
        factory.event_service.clone(),
        factory.registration_service.clone(),
    );

    // Seed two lists containing event 1
    store.state.events = vec![test_data::event(1, 0), test_data::event(2, 0)];
    store.state.my_events = vec![test_data::event(1, 0)];

    let mut published = test_data::event(1, 0);
    published.current_registrations = 9;
    Mock::given(method("POST"))
        .and(path("/events/1/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&published))
        .expect(1)
        .mount(&mock.server)
        .await;

    store.publish_event(1).await.expect("publish");
    assert_eq!(store.state.events[0].current_registrations, 9);
    assert_eq!(store.state.my_events[0].current_registrations, 9);
    assert_eq!(store.state.events[1].current_registrations, 0);
}

#[tokio::test]
async fn chatbot_falls_back_to_canned_table_when_assistant_fails() {
    let mock = PlatformMock::start().await;
    let mut settings = mock.settings();
    settings.features.assistant = true;
    settings.assistant.api_key = Some("test-key".to_string());
    settings.assistant.api_url = format!("{}/v1/chat/completions", mock.server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock.server)
        .await;

    let chat = ChatService::new(&settings.assistant, &settings.features);
    assert!(chat.assistant_enabled());

    let reply = chat.respond("how do refunds work?", Role::Participant, &[]).await;
    assert!(reply.text.contains("Refund requests"), "canned fallback expected");
}

#[tokio::test]
async fn chatbot_uses_assistant_reply_when_available() {
    let mock = PlatformMock::start().await;
    let mut settings = mock.settings();
    settings.features.assistant = true;
    settings.assistant.api_key = Some("test-key".to_string());
    settings.assistant.api_url = format!("{}/v1/chat/completions", mock.server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": settings.assistant.model})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Refunds take 3-5 business days."}}],
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let chat = ChatService::new(&settings.assistant, &settings.features);
    let reply = chat.respond("how do refunds work?", Role::Participant, &[]).await;
    assert_eq!(reply.text, "Refunds take 3-5 business days.");
    assert!(!reply.suggestions.is_empty(), "suggestions stay canned");
}

#[tokio::test]
async fn chatbot_without_credential_never_calls_out() {
    let mock = PlatformMock::start().await;
    let mut settings = mock.settings();
    settings.features.assistant = true;
    settings.assistant.api_key = None;
    settings.assistant.api_url = format!("{}/v1/chat/completions", mock.server.uri());

    let chat = ChatService::new(&settings.assistant, &settings.features);
    assert!(!chat.assistant_enabled());

    let reply = chat.respond("hello", Role::Organizer, &[]).await;
    assert!(!reply.text.is_empty());

    let requests = mock.server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
