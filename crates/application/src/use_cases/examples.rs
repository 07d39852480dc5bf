//! Operations on the `/examples` endpoint.

use courier_domain::{
    ApiError, CreateExample, ExampleItem, PaginatedResponse, QueryParams, UpdateExample,
    encode_path_segment,
};

use crate::client::ApiClient;
use crate::pagination::PaginatedCursor;

/// Collection path of the example resource.
pub const EXAMPLES_PATH: &str = "/examples";

/// Typed access to `/examples`.
#[derive(Clone)]
pub struct ExampleService {
    client: ApiClient,
}

impl ExampleService {
    /// Creates a service over `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists one page of examples.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn find_all(
        &self,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<ExampleItem>, ApiError> {
        self.client.get_paginated(EXAMPLES_PATH, params, None).await
    }

    /// Fetches one example.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn find_one(&self, id: &str) -> Result<ExampleItem, ApiError> {
        self.client.get(&item_path(id), None).await
    }

    /// Creates an example.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn create(&self, dto: &CreateExample) -> Result<ExampleItem, ApiError> {
        self.client.post(EXAMPLES_PATH, dto, None).await
    }

    /// Partially updates an example.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn update(&self, id: &str, dto: &UpdateExample) -> Result<ExampleItem, ApiError> {
        self.client.patch(&item_path(id), dto, None).await
    }

    /// Deletes an example.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] on any failure.
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&item_path(id), None).await
    }

    /// A cursor over the example list starting from `params`.
    #[must_use]
    pub fn cursor(&self, params: &QueryParams) -> PaginatedCursor<ExampleItem> {
        PaginatedCursor::new(self.client.clone(), EXAMPLES_PATH, params)
    }
}

fn item_path(id: &str) -> String {
    format!("{EXAMPLES_PATH}/{}", encode_path_segment(id))
}
