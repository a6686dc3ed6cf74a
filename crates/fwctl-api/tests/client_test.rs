#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwctl_api::{
    ApiClient, BanRequest, Error, HealthStatus, LogExportQuery, Notifier, Page, ReauthHandler,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    prompts: AtomicUsize,
    accept: bool,
}

impl RecordingNotifier {
    fn accepting() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_owned());
    }

    fn confirm_reauth(&self, _prompt: &str) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.accept
    }
}

#[derive(Default)]
struct CountingReauth(AtomicUsize);

impl ReauthHandler for CountingReauth {
    fn reauthenticate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn setup_with(notifier: RecordingNotifier) -> (MockServer, ApiClient, Arc<RecordingNotifier>) {
    let server = MockServer::start().await;
    let notifier = Arc::new(notifier);
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        &Url::parse(&server.uri()).unwrap(),
        "/api/v1",
        notifier.clone(),
    );
    (server, client, notifier)
}

async fn setup() -> (MockServer, ApiClient, Arc<RecordingNotifier>) {
    setup_with(RecordingNotifier::default()).await
}

fn api(suffix: &str) -> String {
    format!("/api/v1/{suffix}")
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn success_envelope_resolves_with_data_and_no_notification() {
    let (server, client, notifier) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("rule/stats")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"banned": 4, "whitelisted": 2},
            "message": "ok"
        })))
        .mount(&server)
        .await;

    let stats = client.get_rule_stats().await.unwrap();

    assert_eq!(stats, json!({"banned": 4, "whitelisted": 2}));
    assert!(notifier.errors().is_empty());
    assert_eq!(notifier.prompts(), 0);
}

#[tokio::test]
async fn typed_success_decodes_data() {
    let (server, client, notifier) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("system/health")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "status": "healthy",
                "timestamp": "2024-01-15T10:00:00Z",
                "services": {"redis": "connected", "mysql": "connected"}
            }
        })))
        .mount(&server)
        .await;

    let health = client.get_health_check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.services["redis"], "connected");
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn failure_envelope_notifies_once_with_precedence() {
    let cases = [
        (json!({"success": false, "error": "E", "message": "M"}), "E"),
        (json!({"success": false, "message": "M"}), "M"),
        (json!({"success": false}), "operation failed"),
    ];

    for (body, expected) in cases {
        let (server, client, notifier) = setup().await;
        Mock::given(method("GET"))
            .and(path(api("config")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let err = client.get_system_config().await.unwrap_err();

        assert!(matches!(err, Error::Business { .. }), "got {err:?}");
        assert_eq!(err.to_string(), expected);
        assert_eq!(notifier.errors(), vec![expected.to_owned()]);
        assert_eq!(notifier.prompts(), 0);
    }
}

#[tokio::test]
async fn auth_failure_code_prompts_for_reauth() {
    for code in [401, 403] {
        let (server, client, notifier) = setup().await;
        Mock::given(method("GET"))
            .and(path(api("users")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "token expired",
                "code": code
            })))
            .mount(&server)
            .await;

        let err = client.get_user_list(Page::default()).await.unwrap_err();

        assert!(err.is_auth_failure());
        assert_eq!(notifier.errors(), vec!["token expired".to_owned()]);
        assert_eq!(notifier.prompts(), 1, "code {code}");
    }
}

#[tokio::test]
async fn accepted_reauth_clears_token_and_runs_handler() {
    let (server, client, notifier) = setup_with(RecordingNotifier::accepting()).await;
    let handler = Arc::new(CountingReauth::default());
    client.set_reauth_handler(handler.clone());
    client.set_token(Some("stale".to_string().into()));

    Mock::given(method("GET"))
        .and(path(api("rule/stats")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "login required",
            "code": 401
        })))
        .mount(&server)
        .await;

    let result = client.get_rule_stats().await;

    assert!(result.is_err());
    assert_eq!(notifier.prompts(), 1);
    assert_eq!(handler.0.load(Ordering::SeqCst), 1);
    assert!(!client.has_token());
}

#[tokio::test]
async fn declined_reauth_keeps_token() {
    let (server, client, notifier) = setup().await;
    let handler = Arc::new(CountingReauth::default());
    client.set_reauth_handler(handler.clone());
    client.set_token(Some("current".to_string().into()));

    Mock::given(method("GET"))
        .and(path(api("rule/stats")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": 403
        })))
        .mount(&server)
        .await;

    let _ = client.get_rule_stats().await;

    assert_eq!(notifier.prompts(), 1);
    assert_eq!(handler.0.load(Ordering::SeqCst), 0);
    assert!(client.has_token());
}

#[tokio::test]
async fn non_object_payload_is_returned_unchanged() {
    let (server, client, notifier) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("config")))
        .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let value = client.get_system_config().await.unwrap();

    assert_eq!(value, json!("maintenance"));
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn binary_download_bypasses_envelope() {
    let (server, client, notifier) = setup().await;
    let raw = br#"{"success":false,"error":"looks like an envelope"}"#;

    Mock::given(method("GET"))
        .and(path(api("logs/export")))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(raw.to_vec()))
        .mount(&server)
        .await;

    let query = LogExportQuery {
        format: Some("json".into()),
        ..LogExportQuery::default()
    };
    let bytes = client.export_logs(&query).await.unwrap();

    assert_eq!(bytes.as_ref(), raw);
    assert!(notifier.errors().is_empty());
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn http_status_table_produces_one_fixed_message() {
    let table = [
        (400, "request parameter error"),
        (401, "unauthorized, please log in"),
        (403, "access denied"),
        (404, "requested resource not found"),
        (408, "request timeout"),
        (500, "internal server error"),
        (501, "service not implemented"),
        (502, "bad gateway"),
        (503, "service unavailable"),
        (504, "gateway timeout"),
        (505, "HTTP version not supported"),
    ];

    for (status, expected) in table {
        let (server, client, notifier) = setup().await;
        Mock::given(method("GET"))
            .and(path(api("system/info")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client.get_system_info().await.unwrap_err();

        match &err {
            Error::Http { status: got, message } => {
                assert_eq!(*got, status);
                assert_eq!(message, expected);
            }
            other => panic!("expected Http error for {status}, got {other:?}"),
        }
        assert_eq!(notifier.errors(), vec![expected.to_owned()], "status {status}");
        assert_eq!(notifier.prompts(), 0);
    }
}

#[tokio::test]
async fn unlisted_status_uses_generic_message() {
    let (server, client, notifier) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("system/info")))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client.get_system_info().await.unwrap_err();

    assert_eq!(err.to_string(), "connection error 429");
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn bad_request_uses_backend_error_text() {
    let (server, client, notifier) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("rule/ban")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "ban duration cannot exceed 7 days"
        })))
        .mount(&server)
        .await;

    let request = BanRequest {
        fingerprint: "fp-1".into(),
        reason: "abuse".into(),
        duration: "200h".into(),
    };
    let err = client.ban_user(&request).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        notifier.errors(),
        vec!["ban duration cannot exceed 7 days".to_owned()]
    );
}

#[tokio::test]
async fn connection_refused_reports_network_timeout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let notifier = Arc::new(RecordingNotifier::default());
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        &Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        "/api/v1",
        notifier.clone(),
    );

    let err = client.get_system_info().await.unwrap_err();

    assert!(err.is_no_response(), "got {err:?}");
    assert_eq!(notifier.errors(), vec!["network connection timeout".to_owned()]);
}

#[tokio::test]
async fn slow_response_hits_transport_timeout() {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = ApiClient::with_client(
        http,
        &Url::parse(&server.uri()).unwrap(),
        "/api/v1",
        notifier.clone(),
    );

    Mock::given(method("GET"))
        .and(path(api("system/health")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"status": "healthy"}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.get_health_check().await.unwrap_err();

    assert!(err.is_no_response(), "got {err:?}");
    assert_eq!(notifier.errors().len(), 1);
}

// ── Request construction ────────────────────────────────────────────

#[tokio::test]
async fn session_token_is_sent_as_bearer() {
    let (server, client, _notifier) = setup().await;
    client.set_token(Some("mock-token-1".to_string().into()));

    Mock::given(method("GET"))
        .and(path(api("score/stats")))
        .and(header("authorization", "Bearer mock-token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"average": 71.5}
        })))
        .mount(&server)
        .await;

    let stats = client.get_score_stats().await.unwrap();
    assert_eq!(stats["average"], json!(71.5));
}

#[tokio::test]
async fn query_parameters_follow_backend_names() {
    let (server, client, _notifier) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("logs/recent")))
        .and(query_param("minutes", "15"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": []
        })))
        .mount(&server)
        .await;

    let logs = client.get_recent_access_logs(15, 10).await.unwrap();
    assert_eq!(logs, json!([]));
}

#[tokio::test]
async fn fingerprint_path_segment_is_encoded() {
    let (server, client, _notifier) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api("rule/whitelist/fp%2F1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "removed"
        })))
        .mount(&server)
        .await;

    let value = client.remove_from_whitelist("fp/1").await.unwrap();
    assert_eq!(value, serde_json::Value::Null);
}
