//! Observable upload progress for one endpoint.

use std::sync::Arc;

use courier_domain::{ApiError, RequestConfig, UploadPayload};
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::client::{ApiClient, ProgressCallback};

/// Point-in-time view of an [`UploadTracker`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSnapshot {
    /// Last reported percentage, 0 to 100.
    pub progress: u8,
    /// True while an upload is in flight.
    pub uploading: bool,
    /// Error of the last upload, if it failed.
    pub error: Option<ApiError>,
}

/// Uploads to a fixed path and publishes progress.
pub struct UploadTracker {
    client: ApiClient,
    path: String,
    config: RequestConfig,
    state: Arc<watch::Sender<UploadSnapshot>>,
}

impl UploadTracker {
    /// Creates a tracker bound to `path`.
    #[must_use]
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        let (state, _) = watch::channel(UploadSnapshot::default());
        Self {
            client,
            path: path.into(),
            config: RequestConfig::default(),
            state: Arc::new(state),
        }
    }

    /// Sets the request options used for every upload.
    #[must_use]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribes to progress changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.state.subscribe()
    }

    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> UploadSnapshot {
        self.state.borrow().clone()
    }

    /// Zeroes progress and clears the error.
    pub fn reset(&self) {
        self.state.send_replace(UploadSnapshot::default());
    }

    /// Uploads `payload`, publishing progress as it goes.
    ///
    /// # Errors
    ///
    /// Returns the upload's [`ApiError`]; it is also recorded on the tracker.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        payload: impl Into<UploadPayload>,
    ) -> Result<T, ApiError> {
        self.state.send_replace(UploadSnapshot {
            progress: 0,
            uploading: true,
            error: None,
        });

        let sink = Arc::clone(&self.state);
        let on_progress: ProgressCallback = Arc::new(move |percent| {
            sink.send_modify(|s| s.progress = percent);
        });

        let result = self
            .client
            .upload_file(&self.path, payload, Some(on_progress), Some(self.config.clone()))
            .await;

        self.state.send_modify(|s| {
            s.uploading = false;
            if let Err(error) = &result {
                s.error = Some(error.clone());
            }
        });
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::InMemoryCredentialStore;
    use crate::ports::Transport;
    use crate::test_support::ScriptedTransport;
    use courier_domain::FilePart;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn tracker(transport: &Arc<ScriptedTransport>) -> UploadTracker {
        let client = ApiClient::new(
            Arc::clone(transport) as Arc<dyn Transport>,
            Arc::new(InMemoryCredentialStore::new()),
        );
        UploadTracker::new(client, "/uploads")
    }

    #[tokio::test]
    async fn test_successful_upload_records_progress() {
        let transport = Arc::new(
            ScriptedTransport::replying(201, json!({"url": "/files/1"}))
                .with_progress(vec![(3, Some(4)), (4, Some(4))]),
        );
        let tracker = tracker(&transport);

        let body: Value = tracker
            .upload(FilePart::new("a.bin", vec![0u8; 4]))
            .await
            .unwrap();

        assert_eq!(body["url"], "/files/1");
        assert_eq!(
            tracker.snapshot(),
            UploadSnapshot {
                progress: 100,
                uploading: false,
                error: None,
            }
        );
        assert_eq!(transport.last_sent().path, "/uploads");
    }

    #[tokio::test]
    async fn test_failed_upload_records_error() {
        let transport = Arc::new(
            ScriptedTransport::replying(413, json!({"message": "Too large"}))
                .with_progress(vec![(1, Some(4))]),
        );
        let tracker = tracker(&transport);

        let error = tracker
            .upload::<Value>(FilePart::new("big.bin", vec![0u8; 4]))
            .await
            .unwrap_err();

        let snapshot = tracker.snapshot();
        assert_eq!(error.message, "Too large");
        assert_eq!(snapshot.error, Some(error));
        assert!(!snapshot.uploading);
        assert_eq!(snapshot.progress, 25);
    }

    #[tokio::test]
    async fn test_new_upload_starts_from_zero_and_reset_clears() {
        let transport = Arc::new(
            ScriptedTransport::replying(200, json!(null)).with_progress(vec![(2, Some(4))]),
        );
        let tracker = tracker(&transport);
        tracker.state.send_modify(|s| {
            s.progress = 90;
            s.error = Some(ApiError::network());
        });

        let _: () = tracker.upload(FilePart::new("a", vec![1u8])).await.unwrap();
        assert_eq!(tracker.snapshot().progress, 50);
        assert_eq!(tracker.snapshot().error, None);

        tracker.reset();
        assert_eq!(tracker.snapshot(), UploadSnapshot::default());
    }
}
