//! Typed request facade.
//!
//! `ApiClient` exposes one method per verb, each in a raw form returning the
//! decoded payload and a `*_wrapped` form returning an [`ApiEnvelope`]. All of
//! them funnel into a single perform-request operation that runs the
//! [`InterceptorPipeline`] and decodes the body. Failures reach the caller as
//! the pipeline's [`ApiError`], never re-wrapped.

use std::sync::Arc;

use courier_domain::{
    ApiEnvelope, ApiError, AuthToken, HttpMethod, OutgoingRequest, PaginatedResponse,
    ProgressTracker, QueryParams, RequestBody, RequestConfig, ResponseKind, TransportResponse,
    UploadPayload,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{instrument, warn};

use crate::pipeline::{ClientEvent, InterceptorPipeline, RequestInterceptor};
use crate::ports::{CredentialStore, CredentialStoreError, TransferObserver, Transport};

/// Receives transfer progress as an integer percentage.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Typed client over a [`Transport`].
///
/// Cheap to clone; clones share the pipeline, the credential store and the
/// event channel.
#[derive(Clone)]
pub struct ApiClient {
    pipeline: Arc<InterceptorPipeline>,
    credentials: Arc<dyn CredentialStore>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    event_capacity: usize,
}

impl ApiClientBuilder {
    /// Adds a request interceptor; it runs after the auth interceptor.
    #[must_use]
    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Sets how many undelivered events a slow subscriber may lag behind.
    #[must_use]
    pub const fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Builds the client.
    #[must_use]
    pub fn build(self) -> ApiClient {
        let pipeline = InterceptorPipeline::new(
            self.transport,
            Arc::clone(&self.credentials),
            self.interceptors,
            self.event_capacity,
        );
        ApiClient {
            pipeline: Arc::new(pipeline),
            credentials: self.credentials,
        }
    }
}

impl ApiClient {
    /// Creates a client with the default pipeline.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self::builder(transport, credentials).build()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> ApiClientBuilder {
        ApiClientBuilder {
            transport,
            credentials,
            interceptors: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Subscribes to client events such as [`ClientEvent::Unauthorized`].
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.pipeline.subscribe()
    }

    /// Stores the bearer token used for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot persist the token.
    pub async fn set_auth(&self, token: impl Into<AuthToken>) -> Result<(), CredentialStoreError> {
        self.credentials.set(token.into()).await
    }

    /// Removes the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be updated.
    pub async fn clear_auth(&self) -> Result<(), CredentialStoreError> {
        self.credentials.clear().await
    }

    /// Returns true if a bearer token is stored.
    pub async fn is_authenticated(&self) -> bool {
        match self.credentials.get().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "could not read stored credential");
                false
            }
        }
    }

    /// GET, decoding the payload.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, RequestBody::Empty, config)
            .await
    }

    /// GET, decoding an [`ApiEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn get_wrapped<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.get(path, config).await
    }

    /// POST a JSON body, decoding the payload.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        let body = json_body(data)?;
        self.request(HttpMethod::Post, path, body, config).await
    }

    /// POST a JSON body, decoding an [`ApiEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn post_wrapped<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        config: Option<RequestConfig>,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.post(path, data, config).await
    }

    /// PUT a JSON body (full replacement), decoding the payload.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        let body = json_body(data)?;
        self.request(HttpMethod::Put, path, body, config).await
    }

    /// PUT a JSON body, decoding an [`ApiEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn put_wrapped<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        config: Option<RequestConfig>,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.put(path, data, config).await
    }

    /// PATCH a JSON body (partial update), decoding the payload.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        let body = json_body(data)?;
        self.request(HttpMethod::Patch, path, body, config).await
    }

    /// PATCH a JSON body, decoding an [`ApiEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn patch_wrapped<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
        config: Option<RequestConfig>,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.patch(path, data, config).await
    }

    /// DELETE, decoding the payload. Use `()` for empty responses.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Delete, path, RequestBody::Empty, config)
            .await
    }

    /// DELETE, decoding an [`ApiEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn delete_wrapped<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        self.delete(path, config).await
    }

    /// GET with `params` merged over the config's params.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        let config = config.unwrap_or_default().with_merged_params(params);
        self.get(path, Some(config)).await
    }

    /// GET one page of a list endpoint.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        config: Option<RequestConfig>,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        self.get_with_query(path, params, config).await
    }

    /// POSTs a multipart upload, reporting upload progress.
    ///
    /// A bare file is sent under the `file` field. The multipart content type
    /// replaces any caller-supplied `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    #[instrument(skip(self, payload, on_progress, config))]
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: impl Into<UploadPayload>,
        on_progress: Option<ProgressCallback>,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        let form = payload.into().into_form();
        let mut config = config.unwrap_or_default();
        config.headers.remove("Content-Type");

        let request =
            OutgoingRequest::new(HttpMethod::Post, path).with_body(RequestBody::Multipart(form));
        let observer = on_progress.map(percentage_observer);
        let response = self.pipeline.execute(request, config, observer).await?;
        decode(&response)
    }

    /// GETs a binary body, reporting download progress.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    #[instrument(skip(self, on_progress, config))]
    pub async fn download_file(
        &self,
        path: &str,
        on_progress: Option<ProgressCallback>,
        config: Option<RequestConfig>,
    ) -> Result<Vec<u8>, ApiError> {
        let config = config.unwrap_or_default().header("Accept", "*/*");
        let request =
            OutgoingRequest::new(HttpMethod::Get, path).with_response_kind(ResponseKind::Binary);
        let observer = on_progress.map(percentage_observer);
        let response = self.pipeline.execute(request, config, observer).await?;
        Ok(response.body)
    }

    /// The single perform-request operation behind every verb.
    #[instrument(skip(self, body, config))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: RequestBody,
        config: Option<RequestConfig>,
    ) -> Result<T, ApiError> {
        let request = OutgoingRequest::new(method, path).with_body(body);
        let response = self
            .pipeline
            .execute(request, config.unwrap_or_default(), None)
            .await?;
        decode(&response)
    }
}

fn json_body<B: Serialize + ?Sized>(data: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(data)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::unknown(format!("failed to serialize request body: {e}")))
}

/// Decodes a 2xx body; an empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(response: &TransportResponse) -> Result<T, ApiError> {
    let decoded = if response.is_body_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(&response.body)
    };
    decoded.map_err(|e| ApiError::invalid_response(response.status, e, response.text()))
}

/// Adapts a percentage callback to raw byte events, one tracker per transfer.
fn percentage_observer(callback: ProgressCallback) -> TransferObserver {
    let tracker = ProgressTracker::new();
    Arc::new(move |loaded, total| {
        if let Some(percent) = tracker.observe(loaded, total) {
            callback(percent);
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::InMemoryCredentialStore;
    use crate::test_support::ScriptedTransport;
    use courier_domain::{FilePart, INVALID_RESPONSE, MultipartForm, UNKNOWN_ERROR};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    fn client(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(
            Arc::clone(transport) as Arc<dyn Transport>,
            Arc::new(InMemoryCredentialStore::new()),
        )
    }

    fn recording_callback() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
        (callback, seen)
    }

    #[tokio::test]
    async fn test_get_decodes_payload() {
        let transport = Arc::new(ScriptedTransport::replying(200, json!({"id": 7, "name": "seven"})));

        let item: Item = client(&transport).get("/items/7", None).await.unwrap();

        assert_eq!(item, Item { id: 7, name: "seven".to_string() });
        let sent = transport.last_sent();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.path, "/items/7");
        assert!(sent.body.is_empty());
    }

    #[tokio::test]
    async fn test_verbs_send_json_bodies() {
        let transport = Arc::new(ScriptedTransport::replying(200, json!({"id": 1, "name": "x"})));
        let client = client(&transport);
        let body = json!({"name": "x"});

        let _: Item = client.post("/items", &body, None).await.unwrap();
        let _: Item = client.put("/items/1", &body, None).await.unwrap();
        let _: Item = client.patch("/items/1", &body, None).await.unwrap();

        let methods: Vec<_> = transport.sent().iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch]);
        assert_eq!(transport.last_sent().body, RequestBody::Json(body));
    }

    #[tokio::test]
    async fn test_wrapped_variants_decode_envelope() {
        let transport = Arc::new(ScriptedTransport::replying(
            200,
            json!({"success": true, "data": {"id": 2, "name": "two"}, "message": "ok"}),
        ));

        let envelope: ApiEnvelope<Item> = client(&transport).get_wrapped("/items/2", None).await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert_eq!(envelope.data.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_delete_with_empty_body_decodes_unit() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(TransportResponse::new(204, ""))));

        let result: Result<(), ApiError> = client(&transport).delete("/items/1", None).await;

        assert!(result.is_ok());
        assert_eq!(transport.last_sent().method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_delete_wrapped_reports_server_envelope() {
        let transport = Arc::new(ScriptedTransport::replying(
            200,
            json!({"success": false, "message": "already gone"}),
        ));

        let envelope: ApiEnvelope<()> = client(&transport).delete_wrapped("/items/1", None).await.unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("already gone"));
    }

    #[tokio::test]
    async fn test_errors_propagate_unwrapped() {
        let body = json!({"message": "Server exploded", "code": "BOOM"});
        let transport = Arc::new(ScriptedTransport::replying(500, body.clone()));

        let error = client(&transport).get::<Item>("/items", None).await.unwrap_err();

        assert_eq!(error.message, "Server exploded");
        assert_eq!(error.code.as_deref(), Some("BOOM"));
        assert_eq!(error.status, Some(500));
        assert_eq!(error.payload, Some(body));
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_invalid_response() {
        let transport = Arc::new(ScriptedTransport::replying(200, json!({"unexpected": true})));

        let error = client(&transport).get::<Item>("/items/1", None).await.unwrap_err();

        assert_eq!(error.code.as_deref(), Some(INVALID_RESPONSE));
        assert_eq!(error.status, Some(200));
    }

    #[tokio::test]
    async fn test_unserializable_body_is_unknown_error() {
        use std::collections::HashMap;

        let transport = Arc::new(ScriptedTransport::replying(200, json!({})));
        // JSON object keys must be strings
        let mut body = HashMap::new();
        body.insert((1, 2), "tuple key");

        let error = client(&transport).post::<Value, _>("/items", &body, None).await.unwrap_err();

        assert_eq!(error.code.as_deref(), Some(UNKNOWN_ERROR));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_query_merges_params() {
        let transport = Arc::new(ScriptedTransport::replying(200, json!([])));
        let config = RequestConfig::new().param("search", "old").param("sortBy", "name");
        let params = QueryParams::new().with("search", "new");

        let _: Vec<Item> = client(&transport)
            .get_with_query("/items", &params, Some(config))
            .await
            .unwrap();

        let sent = transport.last_sent();
        assert_eq!(sent.query.get("search"), Some("new"));
        assert_eq!(sent.query.get("sortBy"), Some("name"));
    }

    #[tokio::test]
    async fn test_get_paginated_decodes_page() {
        let transport = Arc::new(ScriptedTransport::replying(
            200,
            json!({
                "items": [{"id": 1, "name": "a"}],
                "meta": {"currentPage": 1, "totalPages": 1, "totalItems": 1, "perPage": 10,
                         "hasNextPage": false, "hasPrevPage": false}
            }),
        ));

        let page: PaginatedResponse<Item> = client(&transport)
            .get_paginated("/items", &QueryParams::new().with("page", 1), None)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert!(page.meta.is_consistent());
    }

    #[tokio::test]
    async fn test_upload_wraps_file_and_reports_monotonic_progress() {
        let transport = Arc::new(
            ScriptedTransport::replying(201, json!({"id": 9, "name": "upload"}))
                .with_progress(vec![(0, None), (25, Some(100)), (10, Some(100)), (100, Some(100))]),
        );
        let (callback, seen) = recording_callback();
        let config = RequestConfig::new().header("Content-Type", "application/json");

        let item: Item = client(&transport)
            .upload_file(
                "/uploads",
                FilePart::new("a.txt", b"hello".to_vec()),
                Some(callback),
                Some(config),
            )
            .await
            .unwrap();

        assert_eq!(item.id, 9);
        assert_eq!(*seen.lock().unwrap(), vec![25, 25, 100]);

        let sent = transport.last_sent();
        assert_eq!(sent.method, HttpMethod::Post);
        assert!(!sent.headers.contains("Content-Type"));
        match sent.body {
            RequestBody::Multipart(form) => assert_eq!(form.fields()[0].name, "file"),
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_sends_prebuilt_form_as_is() {
        let transport = Arc::new(ScriptedTransport::replying(200, json!(null)));
        let form = MultipartForm::new()
            .text("title", "report")
            .file("attachment", FilePart::new("r.pdf", vec![1, 2, 3]));

        let _: () = client(&transport)
            .upload_file("/uploads", form.clone(), None, None)
            .await
            .unwrap();

        assert_eq!(transport.last_sent().body, RequestBody::Multipart(form));
    }

    #[tokio::test]
    async fn test_download_returns_bytes_and_progress() {
        let transport = Arc::new(
            ScriptedTransport::new(|_| Ok(TransportResponse::new(200, vec![1u8, 2, 3, 4])))
                .with_progress(vec![(2, Some(4)), (4, Some(4))]),
        );
        let (callback, seen) = recording_callback();

        let bytes = client(&transport)
            .download_file("/files/report.bin", Some(callback), None)
            .await
            .unwrap();

        assert_eq!(bytes, vec![1, 2, 3, 4]);
        assert_eq!(*seen.lock().unwrap(), vec![50, 100]);
        let sent = transport.last_sent();
        assert_eq!(sent.response_kind, ResponseKind::Binary);
        assert_eq!(sent.headers.get("accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn test_each_transfer_starts_from_zero() {
        let transport = Arc::new(
            ScriptedTransport::new(|_| Ok(TransportResponse::new(200, vec![0u8; 4])))
                .with_progress(vec![(1, Some(4))]),
        );
        let client = client(&transport);

        let (first, first_seen) = recording_callback();
        client.download_file("/a", Some(first), None).await.unwrap();
        let (second, second_seen) = recording_callback();
        client.download_file("/b", Some(second), None).await.unwrap();

        assert_eq!(*first_seen.lock().unwrap(), vec![25]);
        assert_eq!(*second_seen.lock().unwrap(), vec![25]);
    }

    #[tokio::test]
    async fn test_auth_helpers() {
        let transport = Arc::new(ScriptedTransport::replying(200, json!({})));
        let client = client(&transport);

        assert!(!client.is_authenticated().await);
        client.set_auth("token-1").await.unwrap();
        assert!(client.is_authenticated().await);

        let _: Value = client.get("/me", None).await.unwrap();
        assert_eq!(
            transport.last_sent().headers.get("Authorization"),
            Some("Bearer token-1")
        );

        let _: Value = client
            .get("/public", Some(RequestConfig::new().skip_auth()))
            .await
            .unwrap();
        assert!(!transport.last_sent().headers.contains("Authorization"));

        client.clear_auth().await.unwrap();
        assert!(!client.is_authenticated().await);
    }
}
