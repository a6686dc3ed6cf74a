#![allow(clippy::unwrap_used)]
// System status store against a mocked backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwctl_core::{
    ApiClient, HealthSnapshot, HealthStatus, Notifier, SystemInfo, SystemState,
    SystemStatusStore,
};

#[derive(Default)]
struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_owned());
    }

    fn confirm_reauth(&self, _prompt: &str) -> bool {
        false
    }
}

async fn setup() -> (MockServer, SystemStatusStore, Arc<RecordingNotifier>) {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        &Url::parse(&server.uri()).unwrap(),
        "/api/v1",
        notifier.clone(),
    );
    (server, SystemStatusStore::new(Arc::new(api)), notifier)
}

fn info_body() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "name": "SecureFingerprint",
            "version": "v1.4.2",
            "status": "running",
            "uptime": "3d 4h",
            "userRegistrationAllowed": true
        }
    })
}

fn health_body() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "status": "healthy",
            "services": { "redis": "connected", "mysql": "connected" },
            "timestamp": "2026-10-19T08:00:00Z"
        }
    })
}

#[tokio::test]
async fn init_system_populates_both_halves() {
    let (server, store, notifier) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
        .mount(&server)
        .await;

    store.init_system().await;

    assert_eq!(store.system_version(), "v1.4.2");
    assert!(store.is_registration_allowed());
    assert!(store.is_healthy());
    assert_eq!(
        store.health_status().services.get("redis").map(String::as_str),
        Some("connected")
    );
    assert!(!store.is_loading());
    assert!(notifier.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn init_system_fetches_both_halves_concurrently() {
    let (server, store, _notifier) = setup().await;
    let delay = Duration::from_millis(300);
    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(info_body())
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(health_body())
                .set_delay(delay),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    store.init_system().await;
    let elapsed = started.elapsed();

    assert!(store.is_healthy());
    assert_eq!(store.system_version(), "v1.4.2");
    assert!(
        elapsed < delay * 2 - Duration::from_millis(100),
        "fetches ran back to back: {elapsed:?}"
    );
}

#[tokio::test]
async fn health_failure_marks_unhealthy_while_info_still_lands() {
    let (server, store, notifier) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    store.init_system().await;

    assert!(!store.is_healthy());
    assert_eq!(store.health_status().status, HealthStatus::Unhealthy);
    assert_eq!(store.system_info().uptime, "3d 4h");
    assert_eq!(
        *notifier.errors.lock().unwrap(),
        vec!["service unavailable".to_owned()]
    );
}

#[tokio::test]
async fn info_failure_keeps_previous_value() {
    let (server, store, _notifier) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "maintenance" })),
        )
        .mount(&server)
        .await;

    store.fetch_system_info().await;

    assert_eq!(store.system_info(), SystemInfo::default());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn health_failure_keeps_last_known_services() {
    let (server, store, _notifier) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    store.fetch_health_status().await;
    assert!(store.is_healthy());

    store.fetch_health_status().await;
    let snapshot = store.health_status();
    assert_eq!(snapshot.status, HealthStatus::Unhealthy);
    assert_eq!(snapshot.services.len(), 2);
}

#[tokio::test]
async fn reset_restores_injected_state() {
    let server = MockServer::start().await;
    let api = ApiClient::with_client(
        reqwest::Client::new(),
        &Url::parse(&server.uri()).unwrap(),
        "/api/v1",
        Arc::new(RecordingNotifier::default()),
    );
    let initial = SystemState {
        health: HealthSnapshot {
            status: HealthStatus::Unhealthy,
            services: BTreeMap::new(),
            timestamp: None,
        },
        ..SystemState::default()
    };
    let store = SystemStatusStore::with_initial(Arc::new(api), initial.clone());
    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
        .mount(&server)
        .await;

    store.fetch_health_status().await;
    assert!(store.is_healthy());

    store.reset();
    assert_eq!(store.state(), initial);
}
