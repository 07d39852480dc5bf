//! End-to-end client flows against a mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use courier_application::{
    ApiClient, ClientEvent, CredentialStore, ExampleService, PaginatedCursor, ProgressCallback,
    UploadTracker,
};
use courier_domain::{
    ApiEnvelope, ClientSettings, CreateExample, FilePart, HttpMethod, NETWORK_ERROR,
    NETWORK_ERROR_MESSAGE, QueryParams, RequestConfig,
};
use courier_infrastructure::{FileCredentialStore, ReqwestTransport, build_client};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    client: ApiClient,
    store: Arc<FileCredentialStore>,
    _dir: TempDir,
}

async fn harness(timeout_ms: u64) -> Harness {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = ClientSettings {
        base_url: format!("{}/api", server.uri()),
        timeout_ms,
    };
    let store = Arc::new(FileCredentialStore::new(dir.path()));
    let client = ApiClient::new(
        Arc::new(ReqwestTransport::new(&settings).unwrap()),
        Arc::clone(&store) as Arc<dyn CredentialStore>,
    );
    Harness {
        server,
        client,
        store,
        _dir: dir,
    }
}

fn example(id: u32) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("Example {id}"),
        "description": "generated",
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

fn page_body(page: u32, total_pages: u32) -> Value {
    json!({
        "items": [example(page * 10)],
        "meta": {
            "currentPage": page,
            "totalPages": total_pages,
            "totalItems": 25,
            "perPage": 10,
            "hasNextPage": page < total_pages,
            "hasPrevPage": page > 1
        }
    })
}

fn progress_recorder() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
    (callback, seen)
}

#[tokio::test]
async fn test_bearer_token_is_sent_and_cleared_on_unauthorized() {
    let h = harness(2_000).await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.set_auth("abc").await.unwrap();
    let mut events = h.client.subscribe();

    let error = h.client.get::<Value>("/me", None).await.unwrap_err();

    assert_eq!(error.status, Some(401));
    assert_eq!(error.message, "Token expired");
    assert_eq!(h.store.get().await.unwrap(), None);
    assert!(!h.client.is_authenticated().await);
    assert_eq!(
        events.recv().await.unwrap(),
        ClientEvent::Unauthorized {
            method: HttpMethod::Get,
            path: "/me".to_string(),
            error_handler_skipped: false,
        }
    );
}

#[tokio::test]
async fn test_skip_auth_omits_the_header() {
    let h = harness(2_000).await;
    Mock::given(method("GET"))
        .and(path("/api/public"))
        .respond_with(|request: &wiremock::Request| {
            ResponseTemplate::new(200).set_body_json(json!({
                "authorized": request.headers.contains_key("authorization")
            }))
        })
        .mount(&h.server)
        .await;
    h.client.set_auth("abc").await.unwrap();

    let body: Value = h
        .client
        .get("/public", Some(RequestConfig::new().skip_auth()))
        .await
        .unwrap();

    assert_eq!(body, json!({"authorized": false}));
    assert!(h.client.is_authenticated().await);
}

#[tokio::test]
async fn test_server_error_is_normalized() {
    let h = harness(2_000).await;
    let body = json!({"message": "Server exploded", "code": "BOOM"});
    Mock::given(method("POST"))
        .and(path("/api/examples"))
        .respond_with(ResponseTemplate::new(500).set_body_json(body.clone()))
        .mount(&h.server)
        .await;

    let error = ExampleService::new(h.client.clone())
        .create(&CreateExample {
            name: "x".to_string(),
            description: "y".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.message, "Server exploded");
    assert_eq!(error.code.as_deref(), Some("BOOM"));
    assert_eq!(error.status, Some(500));
    assert_eq!(error.payload, Some(body));
}

#[tokio::test]
async fn test_timeout_is_a_network_error() {
    let h = harness(200).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&h.server)
        .await;

    let error = h.client.get::<Value>("/slow", None).await.unwrap_err();

    assert_eq!(error.message, NETWORK_ERROR_MESSAGE);
    assert_eq!(error.code.as_deref(), Some(NETWORK_ERROR));
    assert_eq!(error.status, None);
}

#[tokio::test]
async fn test_wrapped_responses_decode_the_envelope() {
    let h = harness(2_000).await;
    Mock::given(method("GET"))
        .and(path("/api/examples/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": example(1),
            "message": "found"
        })))
        .mount(&h.server)
        .await;

    let envelope: ApiEnvelope<Value> = h.client.get_wrapped("/examples/1", None).await.unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.data.unwrap()["id"], "1");
}

#[tokio::test]
async fn test_cursor_navigates_pages() {
    let h = harness(2_000).await;
    for page in 1..=3 {
        Mock::given(method("GET"))
            .and(path("/api/examples"))
            .and(query_param("page", page.to_string()))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(page, 3)))
            .mount(&h.server)
            .await;
    }
    let cursor = ExampleService::new(h.client.clone()).cursor(&QueryParams::new());

    cursor.refresh().await.unwrap();
    assert_eq!(cursor.total_pages(), 3);
    cursor.next_page().await.unwrap().unwrap();
    assert_eq!(cursor.current_page(), 2);
    assert!(cursor.go_to_page(4).await.unwrap().is_none());

    let requested: Vec<String> = h
        .server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query().unwrap_or_default().to_string())
        .collect();
    assert_eq!(requested, vec!["page=1&limit=10", "page=2&limit=10"]);
    assert_eq!(cursor.items()[0].id, "20");
}

#[tokio::test]
async fn test_cursor_over_generic_endpoint() {
    let h = harness(2_000).await;
    Mock::given(method("GET"))
        .and(path("/api/examples"))
        .and(query_param("search", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1)))
        .expect(1)
        .mount(&h.server)
        .await;

    let cursor: PaginatedCursor<Value> = PaginatedCursor::new(
        h.client.clone(),
        "/examples",
        &QueryParams::new().with("search", "abc"),
    );
    cursor.refresh().await.unwrap();

    assert!(!cursor.has_next_page());
    assert!(!cursor.has_prev_page());
    assert!(cursor.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_upload_reports_progress_up_to_completion() {
    let h = harness(5_000).await;
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"stored": true})))
        .mount(&h.server)
        .await;
    let tracker = UploadTracker::new(h.client.clone(), "/uploads");
    let mut updates = tracker.subscribe();

    let body: Value = tracker
        .upload(FilePart::new("big.bin", vec![3u8; 100_000]))
        .await
        .unwrap();

    assert_eq!(body, json!({"stored": true}));
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.progress, 100);
    assert!(!snapshot.uploading);
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn test_upload_progress_never_decreases() {
    let h = harness(5_000).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&h.server)
        .await;
    let (callback, seen) = progress_recorder();

    let _: () = h
        .client
        .upload_file(
            "/uploads",
            FilePart::new("big.bin", vec![1u8; 200_000]),
            Some(callback),
            None,
        )
        .await
        .unwrap();

    let seen = seen.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last().copied(), Some(100));
}

#[tokio::test]
async fn test_download_returns_bytes_with_progress() {
    let h = harness(5_000).await;
    let payload: Vec<u8> = (0..=255u8).cycle().take(50_000).collect();
    Mock::given(method("GET"))
        .and(path("/api/files/report.bin"))
        .and(header("accept", "*/*"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&h.server)
        .await;
    let (callback, seen) = progress_recorder();

    let bytes = h
        .client
        .download_file("/files/report.bin", Some(callback), None)
        .await
        .unwrap();

    assert_eq!(bytes, payload);
    let seen = seen.lock().unwrap().clone();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last().copied(), Some(100));
}

#[tokio::test]
async fn test_build_client_persists_token_across_instances() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = ClientSettings {
        base_url: server.uri(),
        timeout_ms: 1_000,
    };

    build_client(&settings, dir.path())
        .unwrap()
        .set_auth("persisted")
        .await
        .unwrap();

    assert!(
        build_client(&settings, dir.path())
            .unwrap()
            .is_authenticated()
            .await
    );
}
