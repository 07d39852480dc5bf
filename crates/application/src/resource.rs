//! Observable state for one async operation.
//!
//! A [`Resource`] holds the last data, the last error and a [`LoadingState`].
//! Observers follow it through a `tokio::sync::watch` receiver.

use std::future::Future;

use courier_domain::{ApiError, LoadingState};
use tokio::sync::watch;

type SuccessHook<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorHook = Box<dyn Fn(&ApiError) + Send + Sync>;

/// Point-in-time view of a [`Resource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot<T> {
    /// Data of the last successful run. Kept when a later run fails.
    pub data: Option<T>,
    /// Error of the last run, cleared when a new run starts.
    pub error: Option<ApiError>,
    /// Where the resource is in its lifecycle.
    pub state: LoadingState,
}

impl<T> Default for ResourceSnapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            state: LoadingState::Idle,
        }
    }
}

impl<T> ResourceSnapshot<T> {
    /// Returns true while a run is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

/// Tracks the data, error and loading state of repeated async runs.
pub struct Resource<T> {
    state: watch::Sender<ResourceSnapshot<T>>,
    on_success: Option<SuccessHook<T>>,
    on_error: Option<ErrorHook>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Resource<T> {
    /// Creates an idle resource.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ResourceSnapshot::default());
        Self {
            state,
            on_success: None,
            on_error: None,
        }
    }

    /// Registers a hook run after every successful execution.
    #[must_use]
    pub fn on_success(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// Registers a hook run after every failed execution.
    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&ApiError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResourceSnapshot<T>> {
        self.state.subscribe()
    }

    /// Reads the current state without cloning it.
    pub fn inspect<R>(&self, f: impl FnOnce(&ResourceSnapshot<T>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Current loading state.
    #[must_use]
    pub fn state(&self) -> LoadingState {
        self.inspect(|s| s.state)
    }

    /// Returns true while a run is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inspect(ResourceSnapshot::is_loading)
    }

    /// Error of the last run, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<ApiError> {
        self.inspect(|s| s.error.clone())
    }

    /// Returns to idle with no data and no error.
    pub fn reset(&self) {
        self.state.send_replace(ResourceSnapshot::default());
    }
}

impl<T: Clone> Resource<T> {
    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        self.state.borrow().clone()
    }

    /// Data of the last successful run.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.inspect(|s| s.data.clone())
    }

    /// Runs `operation`, recording its outcome.
    ///
    /// The error is recorded and then returned to the caller as well.
    ///
    /// # Errors
    ///
    /// Returns the operation's [`ApiError`].
    pub async fn execute<F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.state.send_modify(|s| {
            s.state = LoadingState::Loading;
            s.error = None;
        });

        let result = operation.await;

        match &result {
            Ok(data) => {
                self.state.send_modify(|s| {
                    s.data = Some(data.clone());
                    s.state = LoadingState::Success;
                });
                if let Some(hook) = &self.on_success {
                    hook(data);
                }
            }
            Err(error) => {
                self.state.send_modify(|s| {
                    s.error = Some(error.clone());
                    s.state = LoadingState::Error;
                });
                if let Some(hook) = &self.on_error {
                    hook(error);
                }
            }
        }
        result
    }
}
