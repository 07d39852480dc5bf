//! Client-side cursor over a paginated list endpoint.

use std::sync::{Mutex, PoisonError};

use courier_domain::{ApiError, PaginatedResponse, PaginationMeta, QueryParams, RequestConfig};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ApiClient;
use crate::resource::Resource;

/// Page requested before any navigation.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used unless the caller sets `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Page/limit state plus the last fetched page of one list endpoint.
///
/// Navigation is not serialized: when two fetches overlap, whichever response
/// completes last determines the state.
pub struct PaginatedCursor<T> {
    client: ApiClient,
    path: String,
    config: RequestConfig,
    params: Mutex<QueryParams>,
    resource: Resource<PaginatedResponse<T>>,
}

impl<T> PaginatedCursor<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a cursor; `initial` params override the page/limit defaults.
    #[must_use]
    pub fn new(client: ApiClient, path: impl Into<String>, initial: &QueryParams) -> Self {
        let mut params = QueryParams::new()
            .with("page", DEFAULT_PAGE)
            .with("limit", DEFAULT_LIMIT);
        params.merge(initial);
        Self {
            client,
            path: path.into(),
            config: RequestConfig::default(),
            params: Mutex::new(params),
            resource: Resource::new(),
        }
    }

    /// Sets the request options used for every fetch.
    #[must_use]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Current query parameters.
    #[must_use]
    pub fn params(&self) -> QueryParams {
        self.params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Underlying resource state (data, error, loading).
    #[must_use]
    pub const fn resource(&self) -> &Resource<PaginatedResponse<T>> {
        &self.resource
    }

    /// Meta of the last successful fetch.
    #[must_use]
    pub fn meta(&self) -> Option<PaginationMeta> {
        self.resource
            .inspect(|s| s.data.as_ref().map(|page| page.meta))
    }

    /// Items of the last successful fetch.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.resource
            .inspect(|s| s.data.as_ref().map(|page| page.items.clone()))
            .unwrap_or_default()
    }

    /// One-based page of the last fetch, 1 before any fetch.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.meta().map_or(DEFAULT_PAGE, |m| m.current_page)
    }

    /// Number of pages, 0 before any fetch.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.meta().map_or(0, |m| m.total_pages)
    }

    /// Number of items across all pages, 0 before any fetch.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.meta().map_or(0, |m| m.total_items)
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.meta().is_some_and(|m| m.has_next_page)
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_prev_page(&self) -> bool {
        self.meta().is_some_and(|m| m.has_prev_page)
    }

    /// Fetches with the current parameters.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the fetch; it is also recorded on the
    /// resource.
    pub async fn refresh(&self) -> Result<PaginatedResponse<T>, ApiError> {
        let params = self.params();
        debug!(path = %self.path, page = ?params.get("page"), "fetching page");
        self.resource
            .execute(
                self.client
                    .get_paginated(&self.path, &params, Some(self.config.clone())),
            )
            .await
    }

    /// Moves to the next page. Returns `Ok(None)` without fetching when there
    /// is none.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the fetch.
    pub async fn next_page(&self) -> Result<Option<PaginatedResponse<T>>, ApiError> {
        let target = self.current_page().checked_add(1);
        match target {
            Some(page) if self.has_next_page() => self.fetch_page(page).await.map(Some),
            _ => Ok(None),
        }
    }

    /// Moves to the previous page. Returns `Ok(None)` without fetching when
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the fetch.
    pub async fn prev_page(&self) -> Result<Option<PaginatedResponse<T>>, ApiError> {
        let target = self.current_page().checked_sub(1).filter(|page| *page >= 1);
        match target {
            Some(page) if self.has_prev_page() => self.fetch_page(page).await.map(Some),
            _ => Ok(None),
        }
    }

    /// Jumps to `page`. Pages outside `1..=total_pages` are ignored and
    /// return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the fetch.
    pub async fn go_to_page(&self, page: u32) -> Result<Option<PaginatedResponse<T>>, ApiError> {
        if page < 1 || page > self.total_pages() {
            return Ok(None);
        }
        self.fetch_page(page).await.map(Some)
    }

    async fn fetch_page(&self, page: u32) -> Result<PaginatedResponse<T>, ApiError> {
        self.params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set("page", page);
        self.refresh().await
    }
}
